//! Per-item results of batch grant and revoke calls
//!
//! A batch resolves and applies every identity token independently. A bad
//! token never aborts the rest; it is reported here next to the successes.

use profile_acl::{Identity, Operation};
use serde::Serialize;

use crate::error::ProfileError;

/// Exit status when at least one item of a batch failed.
pub const PARTIAL_FAILURE_STATUS: i32 = 3;

/// Result of one token in a batch.
#[derive(Debug, Clone)]
pub enum ItemOutcome {
    /// The access list changed
    Applied(Identity),
    /// Idempotent no-op (already granted, or never granted)
    Unchanged(Identity),
    /// The token could not be applied
    Failed(ProfileError),
}

impl ItemOutcome {
    pub fn is_ok(&self) -> bool {
        !matches!(self, ItemOutcome::Failed(_))
    }

    /// Get the resolved identity, if any.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            ItemOutcome::Applied(identity) | ItemOutcome::Unchanged(identity) => Some(*identity),
            ItemOutcome::Failed(_) => None,
        }
    }

    /// Get the failure, if any.
    pub fn error(&self) -> Option<&ProfileError> {
        match self {
            ItemOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// One token and what happened to it.
#[derive(Debug, Clone)]
pub struct BatchItem {
    /// Token as supplied by the caller
    pub token: String,
    /// Outcome
    pub outcome: ItemOutcome,
}

/// Report of a batch grant or revoke.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// `Grant` or `Revoke`
    pub operation: Operation,
    /// Items in the order the tokens were supplied
    pub items: Vec<BatchItem>,
}

impl BatchReport {
    pub(crate) fn new(operation: Operation) -> Self {
        Self {
            operation,
            items: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, token: impl Into<String>, outcome: ItemOutcome) {
        self.items.push(BatchItem {
            token: token.into(),
            outcome,
        });
    }

    /// Check if every item succeeded.
    pub fn is_success(&self) -> bool {
        self.items.iter().all(|item| item.outcome.is_ok())
    }

    /// Overall status: `0` if every item succeeded, otherwise
    /// [`PARTIAL_FAILURE_STATUS`].
    pub fn exit_status(&self) -> i32 {
        if self.is_success() {
            0
        } else {
            PARTIAL_FAILURE_STATUS
        }
    }

    /// Identities whose membership changed.
    pub fn applied(&self) -> Vec<Identity> {
        self.items
            .iter()
            .filter_map(|item| match item.outcome {
                ItemOutcome::Applied(identity) => Some(identity),
                _ => None,
            })
            .collect()
    }

    /// Items that failed.
    pub fn failures(&self) -> impl Iterator<Item = &BatchItem> {
        self.items.iter().filter(|item| !item.outcome.is_ok())
    }

    /// Build the serializable summary of this report.
    pub fn summary(&self) -> BatchSummary {
        BatchSummary {
            operation: self.operation.as_str(),
            status: self.exit_status(),
            items: self
                .items
                .iter()
                .map(|item| ItemSummary {
                    token: item.token.clone(),
                    identity: item.outcome.identity(),
                    changed: matches!(item.outcome, ItemOutcome::Applied(_)),
                    error: item.outcome.error().map(|err| err.error_code()),
                    message: item.outcome.error().map(|err| err.to_string()),
                })
                .collect(),
        }
    }
}

/// Serializable form of a [`BatchReport`].
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    pub operation: &'static str,
    pub status: i32,
    pub items: Vec<ItemSummary>,
}

/// Serializable form of a [`BatchItem`].
#[derive(Debug, Clone, Serialize)]
pub struct ItemSummary {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<Identity>,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
