//! Confirmation tokens for destructive operations
//!
//! Sealing and removing a profile cannot be undone. The caller must hand
//! over the exact acknowledgement phrase it obtained from the operator;
//! anything else cancels the operation. How the phrase is collected (a
//! prompt, a form, a flag) is up to the presentation layer.

use serde::{Deserialize, Serialize};

/// The literal acknowledgement an operator must enter.
pub const CONFIRMATION_PHRASE: &str = "YES";

/// Operator response to a destructive-operation prompt.
///
/// The response is compared byte for byte; strip line terminators before
/// building it.
///
/// # Examples
///
/// ```
/// use profile_core::Confirmation;
///
/// assert!(Confirmation::new("YES").is_acknowledged());
/// assert!(!Confirmation::new("yes").is_acknowledged());
/// assert!(!Confirmation::new("").is_acknowledged());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Confirmation {
    response: String,
}

impl Confirmation {
    /// Wrap an operator response.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }

    /// A confirmation carrying the acknowledgement phrase.
    pub fn acknowledged() -> Self {
        Self::new(CONFIRMATION_PHRASE)
    }

    /// Check if the response is the exact acknowledgement phrase.
    pub fn is_acknowledged(&self) -> bool {
        self.response == CONFIRMATION_PHRASE
    }
}

/// How a removal request was authorized by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RemovalMode {
    /// Skip the confirmation step.
    Force,
    /// Proceed only if the operator acknowledged.
    Confirmed(Confirmation),
}

impl RemovalMode {
    /// Check if the removal may proceed.
    pub fn may_proceed(&self) -> bool {
        match self {
            RemovalMode::Force => true,
            RemovalMode::Confirmed(confirmation) => confirmation.is_acknowledged(),
        }
    }
}

/// Result of an operation that the caller may cancel.
///
/// Cancellation is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The operation was carried out.
    Applied,
    /// The operator did not acknowledge; nothing changed.
    Cancelled,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_exact_phrase_acknowledges() {
        assert!(Confirmation::acknowledged().is_acknowledged());
        for response in ["yes", "Yes", "YES ", " YES", "YES\n", "y", "NO"] {
            assert!(
                !Confirmation::new(response).is_acknowledged(),
                "{response:?} must not acknowledge"
            );
        }
    }

    #[test]
    fn test_removal_mode() {
        assert!(RemovalMode::Force.may_proceed());
        assert!(RemovalMode::Confirmed(Confirmation::acknowledged()).may_proceed());
        assert!(!RemovalMode::Confirmed(Confirmation::new("no")).may_proceed());
    }
}
