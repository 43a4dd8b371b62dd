//! # Access Lists
//!
//! Ordered, duplicate-free list of identities granted access to a profile.

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Identities explicitly granted access to a profile.
///
/// Membership is what authorization looks at; insertion order is kept only
/// so listings are stable. Granting an identity twice and revoking an absent
/// identity are both no-ops.
///
/// # Example
///
/// ```
/// use profile_acl::{AccessList, Identity};
///
/// let mut acl = AccessList::new();
/// assert!(acl.grant(Identity::new(1001)));
/// assert!(!acl.grant(Identity::new(1001))); // already present
/// assert_eq!(acl.len(), 1);
///
/// assert!(!acl.revoke(Identity::new(2002))); // never granted
/// assert!(acl.revoke(Identity::new(1001)));
/// assert!(acl.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Identity>", into = "Vec<Identity>")]
pub struct AccessList {
    entries: Vec<Identity>,
}

impl AccessList {
    /// Create a new empty access list.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Grant access to an identity.
    ///
    /// # Returns
    ///
    /// `true` if the identity was added, `false` if it was already present
    pub fn grant(&mut self, identity: Identity) -> bool {
        if self.contains(identity) {
            return false;
        }
        self.entries.push(identity);
        true
    }

    /// Revoke access from an identity.
    ///
    /// # Returns
    ///
    /// `true` if the identity was present, `false` otherwise
    pub fn revoke(&mut self, identity: Identity) -> bool {
        let before = self.entries.len();
        self.entries.retain(|id| *id != identity);
        self.entries.len() != before
    }

    /// Check if an identity has been granted access.
    pub fn contains(&self, identity: Identity) -> bool {
        self.entries.contains(&identity)
    }

    /// Iterate over granted identities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.entries.iter()
    }

    /// Get the granted identities in insertion order.
    pub fn to_vec(&self) -> Vec<Identity> {
        self.entries.clone()
    }

    /// Get the number of granted identities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no identity has been granted access.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<Identity>> for AccessList {
    fn from(entries: Vec<Identity>) -> Self {
        entries.into_iter().collect()
    }
}

impl From<AccessList> for Vec<Identity> {
    fn from(acl: AccessList) -> Self {
        acl.entries
    }
}

impl FromIterator<Identity> for AccessList {
    fn from_iter<T: IntoIterator<Item = Identity>>(iter: T) -> Self {
        let mut acl = AccessList::new();
        for identity in iter {
            acl.grant(identity);
        }
        acl
    }
}

impl<'a> IntoIterator for &'a AccessList {
    type Item = &'a Identity;
    type IntoIter = std::slice::Iter<'a, Identity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
