//! Configuration profile domain model
//!
//! This module provides the `Profile` entity: a stored configuration document
//! together with its owner, labels, protection state and usage bookkeeping.
//! Every mutator consults the protection state machine first, so a sealed
//! profile rejects changes no matter who asks.

use chrono::{DateTime, Utc};
use profile_acl::{
    can_manage, evaluate, AccessDecision, AccessList, Identity, Operation, Protection,
    ProtectionFlags, TransitionResult,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snapshot::{ProfileSnapshot, ProfileSummary};

/// Stable opaque identifier of a profile.
///
/// Handles are path-like strings (`/profiles/0190...`). They are unique per
/// profile and never change after creation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileHandle(String);

impl ProfileHandle {
    /// Wrap an existing handle string.
    pub fn new(handle: impl Into<String>) -> Self {
        Self(handle.into())
    }

    /// Generate a fresh handle below `prefix`.
    ///
    /// # Examples
    ///
    /// ```
    /// use profile_core::ProfileHandle;
    ///
    /// let handle = ProfileHandle::generate("/profiles/");
    /// assert!(handle.as_str().starts_with("/profiles/"));
    /// assert!(!handle.as_str().contains("//"));
    /// ```
    pub fn generate(prefix: &str) -> Self {
        Self(format!(
            "{}/{}",
            prefix.trim_end_matches('/'),
            Uuid::now_v7().simple()
        ))
    }

    /// Get the handle as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ProfileHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProfileHandle {
    fn from(handle: &str) -> Self {
        Self::new(handle)
    }
}

/// A stored configuration profile.
///
/// # Architecture
///
/// ```text
/// Profile
///   ├─ owner (fixed at import)
///   ├─ name / alias
///   ├─ ProtectionFlags (restricted, public, locked-down, sealed)
///   ├─ AccessList
///   └─ usage bookkeeping (last used, use count)
/// ```
///
/// # Examples
///
/// ```
/// use profile_acl::{Identity, Protection};
/// use profile_core::{Profile, ProfileHandle};
///
/// let owner = Identity::new(1000);
/// let mut profile = Profile::new(ProfileHandle::new("/profiles/1"), owner, "office", "remote vpn.example.com");
/// assert_eq!(profile.protection(), Protection::Open);
///
/// profile.grant(Identity::new(1001)).unwrap();
/// assert_eq!(profile.protection(), Protection::Restricted);
/// assert!(profile.is_authorized(Identity::new(1001)));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    handle: ProfileHandle,

    owner: Identity,

    name: String,

    alias: Option<String>,

    protection: ProtectionFlags,

    acl: AccessList,

    /// Keep the tunnel device across reconnects. Not an access-control flag.
    persist_tun: bool,

    content: String,

    /// Survives service restarts
    pub persistent: bool,

    /// Removed automatically after the first successful retrieval
    pub single_use: bool,

    /// When the profile was imported
    pub created_at: DateTime<Utc>,

    updated_at: DateTime<Utc>,

    last_used_at: Option<DateTime<Utc>>,

    used_count: u32,
}

impl Profile {
    /// Creates a new profile in the `Open` state with an empty access list.
    ///
    /// # Arguments
    ///
    /// * `handle` - The stable handle for this profile
    /// * `owner` - The importing identity; never reassigned
    /// * `name` - Human-readable name
    /// * `content` - The configuration document
    pub fn new(
        handle: ProfileHandle,
        owner: Identity,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            handle,
            owner,
            name: name.into(),
            alias: None,
            protection: ProtectionFlags::default(),
            acl: AccessList::new(),
            persist_tun: false,
            content: content.into(),
            persistent: false,
            single_use: false,
            created_at: now,
            updated_at: now,
            last_used_at: None,
            used_count: 0,
        }
    }

    /// Mark the profile as persistent.
    pub fn with_persistent(mut self, persistent: bool) -> Self {
        self.persistent = persistent;
        self
    }

    /// Mark the profile as single-use.
    pub fn with_single_use(mut self, single_use: bool) -> Self {
        self.single_use = single_use;
        self
    }

    /// Set the initial persistent tunnel flag.
    ///
    /// Import-time default only; later changes go through
    /// [`Profile::set_persist_tun`].
    pub fn with_persist_tun(mut self, persist_tun: bool) -> Self {
        self.persist_tun = persist_tun;
        self
    }

    pub fn handle(&self) -> &ProfileHandle {
        &self.handle
    }

    pub fn owner(&self) -> Identity {
        self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn persist_tun(&self) -> bool {
        self.persist_tun
    }

    pub fn flags(&self) -> &ProtectionFlags {
        &self.protection
    }

    pub fn acl(&self) -> &AccessList {
        &self.acl
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn last_used_at(&self) -> Option<DateTime<Utc>> {
        self.last_used_at
    }

    pub fn used_count(&self) -> u32 {
        self.used_count
    }

    /// Get the dominant protection state.
    pub fn protection(&self) -> Protection {
        self.protection.protection()
    }

    /// Check if the profile is sealed (read-only).
    pub fn is_sealed(&self) -> bool {
        self.protection.sealed
    }

    /// Evaluate an identity against this profile's access policy.
    pub fn access(&self, identity: Identity) -> AccessDecision {
        evaluate(identity, self.owner, &self.protection, &self.acl)
    }

    /// Check if an identity may retrieve this profile.
    pub fn is_authorized(&self, identity: Identity) -> bool {
        self.access(identity).is_allowed()
    }

    /// Check if an identity may manage this profile.
    ///
    /// # Arguments
    ///
    /// * `identity` - The calling identity
    /// * `is_admin` - Whether the caller is a service administrator
    pub fn can_manage(&self, identity: Identity, is_admin: bool) -> bool {
        can_manage(identity, self.owner, is_admin)
    }

    /// Check whether an operation is legal in the current protection state.
    pub fn permits(&self, operation: Operation) -> TransitionResult<()> {
        self.protection.permits(operation)
    }

    /// Grant access to an identity.
    ///
    /// The first successful grant moves an open profile to restricted.
    ///
    /// # Returns
    ///
    /// `true` if the identity was added, `false` if it was already granted
    pub fn grant(&mut self, identity: Identity) -> TransitionResult<bool> {
        self.protection.permits(Operation::Grant)?;
        if !self.acl.grant(identity) {
            return Ok(false);
        }
        self.protection.record_grant()?;
        self.touch();
        Ok(true)
    }

    /// Revoke access from an identity.
    ///
    /// # Returns
    ///
    /// `true` if the identity was removed, `false` if it was never granted
    pub fn revoke(&mut self, identity: Identity) -> TransitionResult<bool> {
        self.protection.permits(Operation::Revoke)?;
        let removed = self.acl.revoke(identity);
        if removed {
            self.touch();
        }
        Ok(removed)
    }

    /// Set or clear public access. The access list is kept either way.
    pub fn set_public_access(&mut self, enabled: bool) -> TransitionResult<bool> {
        let changed = self.protection.set_public_access(enabled)?;
        if changed {
            self.touch();
        }
        Ok(changed)
    }

    /// Set or clear the lock-down overlay.
    pub fn set_locked_down(&mut self, enabled: bool) -> TransitionResult<bool> {
        let changed = self.protection.set_locked_down(enabled)?;
        if changed {
            self.touch();
        }
        Ok(changed)
    }

    /// Seal the profile, making it permanently read-only.
    pub fn seal(&mut self) -> TransitionResult<()> {
        self.protection.seal()?;
        self.touch();
        Ok(())
    }

    /// Rename the profile.
    pub fn rename(&mut self, name: impl Into<String>) -> TransitionResult<()> {
        self.protection.permits(Operation::Rename)?;
        self.name = name.into();
        self.touch();
        Ok(())
    }

    /// Set the profile alias.
    pub fn set_alias(&mut self, alias: impl Into<String>) -> TransitionResult<()> {
        self.protection.permits(Operation::SetAlias)?;
        self.alias = Some(alias.into());
        self.touch();
        Ok(())
    }

    /// Delete the profile alias.
    ///
    /// # Returns
    ///
    /// `true` if an alias was set before
    pub fn clear_alias(&mut self) -> TransitionResult<bool> {
        self.protection.permits(Operation::ClearAlias)?;
        let had_alias = self.alias.take().is_some();
        if had_alias {
            self.touch();
        }
        Ok(had_alias)
    }

    /// Set or clear the persistent tunnel flag.
    pub fn set_persist_tun(&mut self, enabled: bool) -> TransitionResult<bool> {
        self.protection.permits(Operation::SetPersistTun)?;
        let changed = self.persist_tun != enabled;
        self.persist_tun = enabled;
        if changed {
            self.touch();
        }
        Ok(changed)
    }

    /// Record a successful retrieval.
    ///
    /// Only retrieval moves the usage counters; management operations never do.
    pub fn record_use(&mut self) {
        self.used_count = self.used_count.saturating_add(1);
        self.last_used_at = Some(Utc::now());
    }

    /// Build a read-only projection for display.
    pub fn snapshot(&self) -> ProfileSnapshot {
        ProfileSnapshot::from_profile(self)
    }

    /// Build a list entry.
    pub fn summary(&self) -> ProfileSummary {
        ProfileSummary::from_profile(self)
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
