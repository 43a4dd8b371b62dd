//! # Identities
//!
//! Numeric caller identities as used by access control lists.

use serde::{Deserialize, Serialize};

/// Canonical numeric identity of a user account.
///
/// Identity tokens supplied by callers (user names or decimal ids) are
/// mapped onto this type by an identity resolver before they reach an
/// access control list.
///
/// # Example
///
/// ```
/// use profile_acl::Identity;
///
/// let id = Identity::new(1000);
/// assert_eq!(id.to_string(), "1000");
/// assert_eq!(Identity::parse("1000"), Some(id));
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct Identity(u32);

impl Identity {
    /// Identity of the superuser account.
    pub const ROOT: Identity = Identity(0);

    /// Reserved value that never names an account (`(uid_t)-1`).
    pub const INVALID: u32 = u32::MAX;

    /// Create an identity from its numeric value.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the numeric value.
    pub const fn as_u32(&self) -> u32 {
        self.0
    }

    /// Parse a decimal identity token.
    ///
    /// Surrounding whitespace is ignored. Names, signs, empty tokens and
    /// the reserved [`Identity::INVALID`] value return `None`; whether a
    /// numeric id maps to an existing account is for the resolver to decide.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match token.parse() {
            Ok(id) if id != Self::INVALID => Some(Self(id)),
            _ => None,
        }
    }
}

impl From<u32> for Identity {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
