//! # Access Policy
//!
//! The authorization predicate shared by every profile operation.
//!
//! ```text
//! authorized(id) = id == owner
//!               OR (NOT locked_down AND (public_access OR id ∈ acl))
//! ```
//!
//! Lock-down overrides both public access and ACL membership, but never
//! ownership. Management rights (changing the ACL or the flags, renaming,
//! removing) are a separate question answered by [`can_manage`].

use serde::{Deserialize, Serialize};

use crate::access_list::AccessList;
use crate::identity::Identity;
use crate::protection::ProtectionFlags;

/// Outcome of evaluating an identity against a profile's access policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AccessDecision {
    /// The identity owns the profile.
    Owner,
    /// The profile is public.
    Public,
    /// The identity is on the access list.
    Granted,
    /// The profile is locked down and the identity is not the owner.
    DeniedLockedDown,
    /// The identity is neither owner nor granted and the profile is not public.
    DeniedNotGranted,
}

impl AccessDecision {
    /// Check if the decision allows access.
    pub fn is_allowed(&self) -> bool {
        matches!(
            self,
            AccessDecision::Owner | AccessDecision::Public | AccessDecision::Granted
        )
    }

    /// Get the string representation of the decision.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Owner => "owner",
            AccessDecision::Public => "public",
            AccessDecision::Granted => "granted",
            AccessDecision::DeniedLockedDown => "denied_locked_down",
            AccessDecision::DeniedNotGranted => "denied_not_granted",
        }
    }
}

/// Evaluate an identity against a profile's owner, flags and access list.
///
/// # Example
///
/// ```
/// use profile_acl::{evaluate, AccessDecision, AccessList, Identity, ProtectionFlags};
///
/// let owner = Identity::new(1000);
/// let guest = Identity::new(2000);
/// let mut acl = AccessList::new();
/// acl.grant(guest);
///
/// let mut flags = ProtectionFlags::default();
/// assert_eq!(evaluate(guest, owner, &flags, &acl), AccessDecision::Granted);
///
/// flags.set_locked_down(true).unwrap();
/// assert_eq!(evaluate(guest, owner, &flags, &acl), AccessDecision::DeniedLockedDown);
/// assert_eq!(evaluate(owner, owner, &flags, &acl), AccessDecision::Owner);
/// ```
pub fn evaluate(
    identity: Identity,
    owner: Identity,
    flags: &ProtectionFlags,
    acl: &AccessList,
) -> AccessDecision {
    if identity == owner {
        return AccessDecision::Owner;
    }
    if flags.locked_down {
        return AccessDecision::DeniedLockedDown;
    }
    if flags.public_access {
        return AccessDecision::Public;
    }
    if acl.contains(identity) {
        return AccessDecision::Granted;
    }
    AccessDecision::DeniedNotGranted
}

/// Check if an identity is authorized to use a profile.
pub fn is_authorized(
    identity: Identity,
    owner: Identity,
    flags: &ProtectionFlags,
    acl: &AccessList,
) -> bool {
    evaluate(identity, owner, flags, acl).is_allowed()
}

/// Check if an identity holds management rights on a profile.
///
/// Only the owner and administrators may manage a profile; neither the ACL
/// nor public access confers management rights.
pub fn can_manage(identity: Identity, owner: Identity, is_admin: bool) -> bool {
    identity == owner || is_admin
}
