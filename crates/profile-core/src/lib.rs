//! # Profile Core
//!
//! This crate provides the configuration profile domain model shared by the
//! profile manager and its clients.
//!
//! ## Overview
//!
//! The profile-core crate handles:
//! - **Profiles**: Stored configuration documents with owner, labels and protection state
//! - **Handles**: Stable, path-like profile identifiers
//! - **Caller Context**: The identity each request acts as
//! - **Confirmations**: Acknowledgement tokens for irreversible operations
//! - **Snapshots**: Read-only projections for display and listings
//! - **Directives**: Detection of import-time configuration directives
//!
//! ## Architecture
//!
//! ```text
//! Profile
//!   ├─ ProfileHandle (immutable)
//!   ├─ owner: Identity (immutable)
//!   ├─ name / alias
//!   ├─ ProtectionFlags ──▶ Protection (Open … Sealed)
//!   ├─ AccessList
//!   └─ usage (created, last used, use count)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use profile_acl::{Identity, Protection};
//! use profile_core::{Profile, ProfileHandle};
//!
//! let owner = Identity::new(1000);
//! let mut profile = Profile::new(ProfileHandle::generate("/profiles"), owner, "office", "client\n");
//!
//! profile.grant(Identity::new(1001)).unwrap();
//! profile.set_public_access(true).unwrap();
//! assert_eq!(profile.protection(), Protection::Public);
//!
//! profile.seal().unwrap();
//! assert!(profile.rename("home").is_err());
//! ```
//!
//! ## Integration
//!
//! This crate is designed to work with:
//! - `profile-acl`: Identities, access lists and the protection state machine
//! - `profile-manager`: The service enforcing these rules per request
//! - `profile-events`: Change notifications

pub mod caller;
pub mod confirmation;
pub mod directives;
pub mod profile;
pub mod snapshot;

// Re-export main types for convenience
pub use caller::CallerContext;
pub use confirmation::{Confirmation, Outcome, RemovalMode, CONFIRMATION_PHRASE};
pub use directives::declares_persist_tun;
pub use profile::{Profile, ProfileHandle};
pub use snapshot::{ProfileSnapshot, ProfileSummary};
