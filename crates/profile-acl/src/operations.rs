//! # Operations
//!
//! Catalogue of every operation a caller can issue against a configuration
//! profile, together with the rights and protection state each one needs.

use serde::{Deserialize, Serialize};

/// Operations that can be performed on a configuration profile.
///
/// Operations fall into three groups:
/// - **Lifecycle**: Import, Remove
/// - **Management**: Grant, Revoke, SetPublicAccess, SetLockedDown, Seal,
///   Rename, SetAlias, ClearAlias, SetPersistTun
/// - **Read**: Show, Fetch, List
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Create a new profile from configuration content.
    Import,

    /// Add identities to the access control list.
    Grant,

    /// Remove identities from the access control list.
    Revoke,

    /// Toggle the public access flag.
    SetPublicAccess,

    /// Toggle the lock-down overlay.
    ///
    /// A locked-down profile cannot be retrieved by anyone but its owner.
    SetLockedDown,

    /// Make the profile permanently read-only.
    Seal,

    /// Change the profile name.
    Rename,

    /// Set the profile alias.
    SetAlias,

    /// Delete the profile alias.
    ClearAlias,

    /// Toggle the persistent tunnel flag.
    SetPersistTun,

    /// Permanently delete the profile.
    Remove,

    /// Read the profile metadata.
    Show,

    /// Retrieve the profile content for use.
    Fetch,

    /// Enumerate the profiles visible to the caller.
    List,
}

impl Operation {
    /// Get the string representation of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Import => "import",
            Operation::Grant => "grant",
            Operation::Revoke => "revoke",
            Operation::SetPublicAccess => "set_public_access",
            Operation::SetLockedDown => "set_locked_down",
            Operation::Seal => "seal",
            Operation::Rename => "rename",
            Operation::SetAlias => "set_alias",
            Operation::ClearAlias => "clear_alias",
            Operation::SetPersistTun => "set_persist_tun",
            Operation::Remove => "remove",
            Operation::Show => "show",
            Operation::Fetch => "fetch",
            Operation::List => "list",
        }
    }

    /// Parse an operation from its string representation.
    ///
    /// Accepts the canonical snake_case names as well as the dashed
    /// command-style spellings (`public-access`, `lock-down`, `alias-delete`).
    ///
    /// # Example
    ///
    /// ```
    /// use profile_acl::operations::Operation;
    ///
    /// assert_eq!(Operation::parse("grant"), Some(Operation::Grant));
    /// assert_eq!(Operation::parse("lock-down"), Some(Operation::SetLockedDown));
    /// assert_eq!(Operation::parse("alias-delete"), Some(Operation::ClearAlias));
    /// assert_eq!(Operation::parse("chmod"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "import" => Some(Operation::Import),
            "grant" => Some(Operation::Grant),
            "revoke" => Some(Operation::Revoke),
            "set_public_access" | "public_access" => Some(Operation::SetPublicAccess),
            "set_locked_down" | "lock_down" | "set_lock_down" => Some(Operation::SetLockedDown),
            "seal" => Some(Operation::Seal),
            "rename" => Some(Operation::Rename),
            "set_alias" | "alias" => Some(Operation::SetAlias),
            "clear_alias" | "alias_delete" => Some(Operation::ClearAlias),
            "set_persist_tun" | "persist_tun" => Some(Operation::SetPersistTun),
            "remove" | "delete" => Some(Operation::Remove),
            "show" => Some(Operation::Show),
            "fetch" | "retrieve" => Some(Operation::Fetch),
            "list" => Some(Operation::List),
            _ => None,
        }
    }

    /// Get all operations.
    pub fn all() -> Vec<Self> {
        vec![
            Operation::Import,
            Operation::Grant,
            Operation::Revoke,
            Operation::SetPublicAccess,
            Operation::SetLockedDown,
            Operation::Seal,
            Operation::Rename,
            Operation::SetAlias,
            Operation::ClearAlias,
            Operation::SetPersistTun,
            Operation::Remove,
            Operation::Show,
            Operation::Fetch,
            Operation::List,
        ]
    }

    /// Check if this operation requires management rights on the profile.
    ///
    /// Management rights are held by the profile owner and by administrators.
    /// Access list membership never confers them.
    ///
    /// # Returns
    ///
    /// `true` for every management operation and for `Remove`
    pub fn requires_management(&self) -> bool {
        matches!(
            self,
            Operation::Grant
                | Operation::Revoke
                | Operation::SetPublicAccess
                | Operation::SetLockedDown
                | Operation::Seal
                | Operation::Rename
                | Operation::SetAlias
                | Operation::ClearAlias
                | Operation::SetPersistTun
                | Operation::Remove
        )
    }

    /// Check if this operation is rejected once the profile is sealed.
    ///
    /// `Remove` stays available: sealing freezes contents and protection,
    /// it does not pin the profile in storage.
    pub fn is_blocked_when_sealed(&self) -> bool {
        self.requires_management() && !matches!(self, Operation::Remove)
    }

    /// Check if this operation is destructive and irreversible.
    pub fn is_destructive(&self) -> bool {
        matches!(self, Operation::Seal | Operation::Remove)
    }

    /// Check if this is a read-only operation.
    pub fn is_read_only(&self) -> bool {
        matches!(self, Operation::Show | Operation::Fetch | Operation::List)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
