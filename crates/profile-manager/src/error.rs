//! Error types for profile operations
//!
//! This module defines every error a profile manager call can return. The
//! kinds are distinct so presentation layers can tell a refused request
//! (authorization, state, naming) from a service that is temporarily
//! unreachable.

use profile_acl::TransitionError;
use profile_core::ProfileHandle;
use thiserror::Error;

use crate::config::ConfigError;
use crate::resolver::ResolveError;
use crate::store::StoreError;

/// Profile operation error types.
#[derive(Debug, Clone, Error)]
pub enum ProfileError {
    /// Caller lacks the rights the operation needs
    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    /// Operation is illegal in the current protection state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Handle does not resolve to a profile
    #[error("Profile not found: {0}")]
    NotFound(ProfileHandle),

    /// Identity token could not be resolved
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// Backing service unreachable or timed out
    #[error("Transient error: {0}")]
    Transient(String),

    /// Another profile already uses the name
    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    /// Backing store rejected the request
    #[error("Storage error: {0}")]
    Storage(String),

    /// Manager configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

impl ProfileError {
    /// Check if retrying the same request later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProfileError::Transient(_))
    }

    /// Check if this error should be logged at error level.
    ///
    /// Refused requests are expected and are not server errors.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            ProfileError::Transient(_) | ProfileError::Storage(_) | ProfileError::Config(_)
        )
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ProfileError::NotAuthorized(_) => "NOT_AUTHORIZED",
            ProfileError::InvalidState(_) => "INVALID_STATE",
            ProfileError::NotFound(_) => "NOT_FOUND",
            ProfileError::InvalidIdentity(_) => "INVALID_IDENTITY",
            ProfileError::Transient(_) => "TRANSIENT_ERROR",
            ProfileError::DuplicateName(_) => "DUPLICATE_NAME",
            ProfileError::Storage(_) => "STORAGE_ERROR",
            ProfileError::Config(_) => "CONFIG_ERROR",
        }
    }

    /// Get the process exit status for command-line front ends.
    ///
    /// `1` for service failures, `2` for refused requests. Partial batch
    /// failures use [`crate::batch::PARTIAL_FAILURE_STATUS`].
    pub fn exit_code(&self) -> i32 {
        if self.is_server_error() {
            1
        } else {
            2
        }
    }
}

impl From<TransitionError> for ProfileError {
    fn from(err: TransitionError) -> Self {
        ProfileError::InvalidState(err.to_string())
    }
}

impl From<StoreError> for ProfileError {
    fn from(err: StoreError) -> Self {
        if err.is_transient() {
            ProfileError::Transient(err.to_string())
        } else {
            ProfileError::Storage(err.to_string())
        }
    }
}

impl From<ResolveError> for ProfileError {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::Unknown(token) => ProfileError::InvalidIdentity(token),
            ResolveError::Unavailable(_) => ProfileError::Transient(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_acl::Operation;
    use std::time::Duration;

    #[test]
    fn test_transition_error_is_invalid_state() {
        let err: ProfileError = TransitionError::Sealed(Operation::Grant).into();
        assert!(matches!(err, ProfileError::InvalidState(_)));
        assert_eq!(err.error_code(), "INVALID_STATE");
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_store_error_mapping() {
        let err: ProfileError = StoreError::Rejected("full".into()).into();
        assert!(matches!(err, ProfileError::Storage(_)));

        let err: ProfileError = StoreError::Timeout(Duration::from_millis(10)).into();
        assert!(err.is_transient());
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_resolve_error_mapping() {
        let err: ProfileError = ResolveError::Unknown("nobody".into()).into();
        assert!(matches!(err, ProfileError::InvalidIdentity(ref token) if token == "nobody"));

        let err: ProfileError = ResolveError::Unavailable("directory down".into()).into();
        assert!(err.is_transient());
    }
}
