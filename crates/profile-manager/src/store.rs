//! Backing profile store
//!
//! The manager never touches storage directly; it goes through
//! [`ProfileStore`]. Physical persistence is up to the implementation.

use async_trait::async_trait;
use profile_core::{Profile, ProfileHandle};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Backing store errors.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The store refused the request
    #[error("Store rejected request: {0}")]
    Rejected(String),

    /// The store could not be reached
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete in time
    #[error("Store call timed out after {0:?}")]
    Timeout(Duration),
}

impl StoreError {
    /// Check if the same call may succeed later.
    pub fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_) | StoreError::Timeout(_))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Storage for profiles, keyed by handle.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Insert a new profile. Fails if the handle is taken.
    async fn insert(&self, profile: Profile) -> StoreResult<()>;

    /// Load a profile.
    async fn load(&self, handle: &ProfileHandle) -> StoreResult<Option<Profile>>;

    /// Replace an existing profile.
    async fn save(&self, profile: Profile) -> StoreResult<()>;

    /// Delete a profile.
    ///
    /// # Returns
    ///
    /// `true` if a profile was deleted
    async fn delete(&self, handle: &ProfileHandle) -> StoreResult<bool>;

    /// List all profiles.
    async fn list(&self) -> StoreResult<Vec<Profile>>;
}

/// In-memory profile store.
///
/// Suitable for single-process deployments and testing.
#[derive(Debug, Clone, Default)]
pub struct MemoryProfileStore {
    profiles: Arc<RwLock<HashMap<ProfileHandle, Profile>>>,
    capacity: Option<usize>,
}

impl MemoryProfileStore {
    /// Create an unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects inserts beyond `capacity` profiles.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            profiles: Arc::new(RwLock::new(HashMap::new())),
            capacity: Some(capacity),
        }
    }

    /// Number of stored profiles.
    pub async fn len(&self) -> usize {
        self.profiles.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.profiles.read().await.is_empty()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn insert(&self, profile: Profile) -> StoreResult<()> {
        let mut profiles = self.profiles.write().await;

        if profiles.contains_key(profile.handle()) {
            return Err(StoreError::Rejected(format!(
                "handle {} already exists",
                profile.handle()
            )));
        }
        if let Some(capacity) = self.capacity {
            if profiles.len() >= capacity {
                return Err(StoreError::Rejected(format!(
                    "store is full ({} profiles)",
                    capacity
                )));
            }
        }

        profiles.insert(profile.handle().clone(), profile);
        Ok(())
    }

    async fn load(&self, handle: &ProfileHandle) -> StoreResult<Option<Profile>> {
        Ok(self.profiles.read().await.get(handle).cloned())
    }

    async fn save(&self, profile: Profile) -> StoreResult<()> {
        let mut profiles = self.profiles.write().await;

        match profiles.get_mut(profile.handle()) {
            Some(slot) => {
                *slot = profile;
                Ok(())
            }
            None => Err(StoreError::Rejected(format!(
                "handle {} does not exist",
                profile.handle()
            ))),
        }
    }

    async fn delete(&self, handle: &ProfileHandle) -> StoreResult<bool> {
        Ok(self.profiles.write().await.remove(handle).is_some())
    }

    async fn list(&self) -> StoreResult<Vec<Profile>> {
        Ok(self.profiles.read().await.values().cloned().collect())
    }
}
