//! Per-handle mutual exclusion
//!
//! Every operation on a handle runs load, validate and save under that
//! handle's lock, so two concurrent grants can never both start from the
//! same access list. Different handles never contend.

use profile_core::ProfileHandle;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-handle locks.
#[derive(Debug, Default)]
pub struct HandleLocks {
    locks: Mutex<HashMap<ProfileHandle, Arc<Mutex<()>>>>,
}

impl HandleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a handle.
    pub async fn acquire(&self, handle: &ProfileHandle) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(handle.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry of a removed handle.
    ///
    /// Tasks already waiting keep their reference and find the profile gone.
    pub async fn forget(&self, handle: &ProfileHandle) {
        self.locks.lock().await.remove(handle);
    }

    /// Number of tracked handles.
    pub async fn len(&self) -> usize {
        self.locks.lock().await.len()
    }
}
