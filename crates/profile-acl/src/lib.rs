//! # Profile ACL
//!
//! This crate provides the access-control primitives for stored
//! configuration profiles.
//!
//! ## Overview
//!
//! The profile-acl crate handles:
//! - **Identities**: Numeric user identities
//! - **Access Lists**: Ordered, duplicate-free sets of granted identities
//! - **Protection**: The Open / Restricted / Public / LockedDown / Sealed state machine
//! - **Policy**: The authorization predicate and management rights
//! - **Operations**: Every operation a caller can issue against a profile
//!
//! ## Architecture
//!
//! ```text
//! authorized(id) = id == owner
//!               OR (NOT locked_down AND (public_access OR id ∈ acl))
//!
//! manage(id)     = id == owner OR administrator
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use profile_acl::{is_authorized, AccessList, Identity, Protection, ProtectionFlags};
//!
//! let owner = Identity::new(1000);
//! let user = Identity::new(1001);
//!
//! let mut acl = AccessList::new();
//! let mut flags = ProtectionFlags::default();
//!
//! // First grant moves the profile from Open to Restricted
//! acl.grant(user);
//! flags.record_grant().unwrap();
//! assert_eq!(flags.protection(), Protection::Restricted);
//! assert!(is_authorized(user, owner, &flags, &acl));
//!
//! // Lock-down blocks everyone but the owner
//! flags.set_locked_down(true).unwrap();
//! assert!(!is_authorized(user, owner, &flags, &acl));
//! assert!(is_authorized(owner, owner, &flags, &acl));
//! ```
//!
//! ## Sealing
//!
//! Sealing is one-way. Once sealed, every operation for which
//! [`Operation::is_blocked_when_sealed`] holds fails with
//! [`TransitionError::Sealed`], and the flags in effect at seal time keep
//! governing retrieval.

pub mod access_list;
pub mod identity;
pub mod operations;
pub mod policy;
pub mod protection;

// Re-export main types for convenience
pub use access_list::AccessList;
pub use identity::Identity;
pub use operations::Operation;
pub use policy::{can_manage, evaluate, is_authorized, AccessDecision};
pub use protection::{Protection, ProtectionFlags, TransitionError, TransitionResult};
