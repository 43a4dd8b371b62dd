//! # Protection States
//!
//! The protection state machine of a configuration profile.
//!
//! ```text
//! Open ──first grant──▶ Restricted
//!   │                      │
//!   ├── public access ◀────┤   (overlay, ACL kept)
//!   ├── lock-down ◀────────┤   (overlay, blocks retrieval)
//!   ▼                      ▼
//! Sealed (terminal, flags frozen)
//! ```
//!
//! Public access and lock-down are independent overlays stored as flags.
//! [`ProtectionFlags::protection`] folds them into the single dominant
//! [`Protection`] state used for display and reporting.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::operations::Operation;

/// Error raised when an operation is illegal in the current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The profile is sealed; no mutation is ever permitted again.
    #[error("profile is sealed and read-only, {0} is not permitted")]
    Sealed(Operation),
}

/// Result type for state transitions.
pub type TransitionResult<T> = Result<T, TransitionError>;

/// Dominant protection state of a profile.
///
/// Ordered from least to most restrictive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Protection {
    /// Freshly imported, nobody but the owner has been granted access.
    Open,
    /// At least one identity has been granted access.
    Restricted,
    /// Everyone is authorized; the ACL is kept but ignored.
    Public,
    /// Retrieval is blocked for everyone except the owner.
    LockedDown,
    /// Permanently read-only.
    Sealed,
}

impl Protection {
    /// Get the string representation of the state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protection::Open => "open",
            Protection::Restricted => "restricted",
            Protection::Public => "public",
            Protection::LockedDown => "locked_down",
            Protection::Sealed => "sealed",
        }
    }

    /// Check if this is the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Protection::Sealed)
    }
}

impl std::fmt::Display for Protection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Protection flags carried by every profile.
///
/// # Example
///
/// ```
/// use profile_acl::{Protection, ProtectionFlags};
///
/// let mut flags = ProtectionFlags::default();
/// assert_eq!(flags.protection(), Protection::Open);
///
/// flags.record_grant().unwrap();
/// assert_eq!(flags.protection(), Protection::Restricted);
///
/// flags.set_public_access(true).unwrap();
/// assert_eq!(flags.protection(), Protection::Public);
///
/// flags.seal().unwrap();
/// assert!(flags.set_public_access(false).is_err());
/// assert!(flags.public_access); // frozen as it was when sealed
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtectionFlags {
    /// Set when the ACL gained its first entry; never cleared.
    pub restricted: bool,
    /// Everyone is authorized regardless of the ACL.
    pub public_access: bool,
    /// Retrieval is blocked for non-owners.
    pub locked_down: bool,
    /// Terminal read-only state.
    pub sealed: bool,
}

impl ProtectionFlags {
    /// Derive the dominant protection state.
    ///
    /// Precedence: Sealed, LockedDown, Public, Restricted, Open.
    pub fn protection(&self) -> Protection {
        if self.sealed {
            Protection::Sealed
        } else if self.locked_down {
            Protection::LockedDown
        } else if self.public_access {
            Protection::Public
        } else if self.restricted {
            Protection::Restricted
        } else {
            Protection::Open
        }
    }

    /// Check whether an operation is legal in the current state.
    pub fn permits(&self, operation: Operation) -> TransitionResult<()> {
        if self.sealed && operation.is_blocked_when_sealed() {
            return Err(TransitionError::Sealed(operation));
        }
        Ok(())
    }

    /// Record that the ACL gained an entry.
    ///
    /// Moves an open profile to restricted. An emptied ACL does not move it
    /// back; a restricted profile with no grants is owner-only.
    pub fn record_grant(&mut self) -> TransitionResult<()> {
        self.permits(Operation::Grant)?;
        self.restricted = true;
        Ok(())
    }

    /// Set or clear the public access overlay.
    ///
    /// # Returns
    ///
    /// `true` if the flag changed
    pub fn set_public_access(&mut self, enabled: bool) -> TransitionResult<bool> {
        self.permits(Operation::SetPublicAccess)?;
        let changed = self.public_access != enabled;
        self.public_access = enabled;
        Ok(changed)
    }

    /// Set or clear the lock-down overlay.
    ///
    /// # Returns
    ///
    /// `true` if the flag changed
    pub fn set_locked_down(&mut self, enabled: bool) -> TransitionResult<bool> {
        self.permits(Operation::SetLockedDown)?;
        let changed = self.locked_down != enabled;
        self.locked_down = enabled;
        Ok(changed)
    }

    /// Seal the profile. There is no way back.
    pub fn seal(&mut self) -> TransitionResult<()> {
        self.permits(Operation::Seal)?;
        self.sealed = true;
        Ok(())
    }
}
