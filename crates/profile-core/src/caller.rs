//! Caller context passed into every profile operation
//!
//! There is no process-wide session state: each request carries the
//! identity it acts as and an optional correlation id for tracing.

use profile_acl::Identity;
use serde::{Deserialize, Serialize};

/// Identity and tracing context of a single request.
///
/// # Examples
///
/// ```
/// use profile_acl::Identity;
/// use profile_core::CallerContext;
///
/// let caller = CallerContext::new(Identity::new(1000)).with_correlation_id("req-42");
/// assert_eq!(caller.identity, Identity::new(1000));
/// assert_eq!(caller.correlation_id.as_deref(), Some("req-42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    /// Identity the request acts as
    pub identity: Identity,

    /// Request correlation ID
    pub correlation_id: Option<String>,
}

impl CallerContext {
    /// Create a context for an identity.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            correlation_id: None,
        }
    }

    /// Set correlation ID.
    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }
}

impl From<Identity> for CallerContext {
    fn from(identity: Identity) -> Self {
        Self::new(identity)
    }
}
