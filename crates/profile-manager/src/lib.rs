//! # Profile Manager
//!
//! This crate provides the access-controlled lifecycle service for
//! configuration profiles: import, access grants, protection changes,
//! sealing, labelling, retrieval and removal.
//!
//! ## Overview
//!
//! The profile-manager crate handles:
//! - **Authorization**: Owner/administrator management rights and the retrieval predicate
//! - **Lifecycle**: Import, rename, alias, seal and remove
//! - **Batch ACL updates**: Per-item results with an overall status
//! - **Concurrency**: Per-handle serialization of read-validate-write cycles
//! - **Resilience**: Bounded timeouts and retries around the resolver and the store
//!
//! ## Architecture
//!
//! ```text
//! caller ──▶ ProfileManager ──▶ HandleLocks (one mutex per handle)
//!                 │
//!                 ├──▶ IdentityResolver  (token → Identity, timeout)
//!                 ├──▶ ProfileStore      (load/save, timeout + retry)
//!                 └──▶ EventBus          (change notifications)
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use profile_acl::Identity;
//! use profile_core::{CallerContext, Confirmation, Outcome};
//! use profile_manager::{
//!     ImportRequest, ManagerConfig, MemoryProfileStore, ProfileManager, StaticIdentityResolver,
//! };
//!
//! async fn example() -> profile_manager::ProfileResult<()> {
//!     let manager = ProfileManager::new(
//!         ManagerConfig::from_env(),
//!         Arc::new(MemoryProfileStore::new()),
//!         Arc::new(StaticIdentityResolver::new().with_account("alice", Identity::new(1001))),
//!     )?;
//!
//!     let owner = CallerContext::new(Identity::new(1000));
//!     let handle = manager.import(&owner, ImportRequest::new("office", "client\n")).await?;
//!
//!     let report = manager.grant(&owner, &handle, &["alice", "nobody"]).await?;
//!     assert_eq!(report.exit_status(), 3);
//!
//!     let outcome = manager.seal(&owner, &handle, &Confirmation::new("YES")).await?;
//!     assert_eq!(outcome, Outcome::Applied);
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod locks;
pub mod manager;
pub mod resolver;
pub mod retry;
pub mod store;

// Re-export main types for convenience
pub use batch::{BatchItem, BatchReport, BatchSummary, ItemOutcome, PARTIAL_FAILURE_STATUS};
pub use config::{ConfigError, ManagerConfig};
pub use error::{ProfileError, ProfileResult};
pub use manager::{FetchedProfile, ImportRequest, ProfileManager};
pub use resolver::{IdentityResolver, ResolveError, StaticIdentityResolver};
pub use retry::RetryConfig;
pub use store::{MemoryProfileStore, ProfileStore, StoreError, StoreResult};
