//! Identity resolution
//!
//! Callers name identities by decimal id or by account name. The resolver
//! maps those tokens onto canonical [`Identity`] values, and identities back
//! onto display names for `show` output. Production deployments back this
//! with the host's account database or a directory service.

use async_trait::async_trait;
use profile_acl::Identity;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use thiserror::Error;

/// Identity resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The token names no known identity
    #[error("Unknown identity: {0}")]
    Unknown(String),

    /// The resolver backend could not be reached
    #[error("Identity resolver unavailable: {0}")]
    Unavailable(String),
}

/// Maps identity tokens to canonical identities.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve a token (decimal id or account name).
    async fn resolve(&self, token: &str) -> Result<Identity, ResolveError>;

    /// Look up the display name of an identity.
    async fn display_name(&self, identity: Identity) -> Option<String>;
}

/// Resolver backed by a fixed table of accounts.
///
/// Decimal tokens resolve to the numeric identity directly unless
/// [`StaticIdentityResolver::known_only`] is set, in which case they must
/// belong to a registered account.
///
/// # Example
///
/// ```
/// use profile_acl::Identity;
/// use profile_manager::StaticIdentityResolver;
///
/// let resolver = StaticIdentityResolver::new()
///     .with_account("alice", Identity::new(1001))
///     .with_account("bob", Identity::new(1002));
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticIdentityResolver {
    accounts: Arc<RwLock<HashMap<String, Identity>>>,
    known_only: bool,
}

impl StaticIdentityResolver {
    /// Create an empty resolver that accepts any decimal id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account.
    ///
    /// Clones share one table, so the account is visible through every clone.
    pub fn with_account(self, name: impl Into<String>, identity: Identity) -> Self {
        self.add_account(name, identity);
        self
    }

    /// Only resolve decimal ids that belong to a registered account.
    pub fn known_only(mut self) -> Self {
        self.known_only = true;
        self
    }

    /// Register an account on a shared resolver.
    pub fn add_account(&self, name: impl Into<String>, identity: Identity) {
        self.accounts
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), identity);
    }

    fn accounts(&self) -> RwLockReadGuard<'_, HashMap<String, Identity>> {
        self.accounts.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl IdentityResolver for StaticIdentityResolver {
    async fn resolve(&self, token: &str) -> Result<Identity, ResolveError> {
        let accounts = self.accounts();

        if let Some(identity) = accounts.get(token.trim()) {
            return Ok(*identity);
        }

        match Identity::parse(token) {
            Some(identity) if !self.known_only || accounts.values().any(|id| *id == identity) => {
                Ok(identity)
            }
            _ => Err(ResolveError::Unknown(token.to_string())),
        }
    }

    async fn display_name(&self, identity: Identity) -> Option<String> {
        self.accounts()
            .iter()
            .find(|(_, id)| **id == identity)
            .map(|(name, _)| name.clone())
    }
}
