//! Error types for action primitives

use thiserror::Error;

/// Errors raised by page interactions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ActionError {
    /// Page could not be loaded
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Bounded wait expired before the condition held
    #[error("Wait timeout: {0}")]
    WaitTimeout(String),

    /// No element matched the locator
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Element exists but cannot receive a click
    #[error("Element not clickable: {0}")]
    NotClickable(String),

    /// Expected modal dialog never appeared
    #[error("Dialog missing: {0}")]
    DialogMissing(String),

    /// Page state does not allow the step to proceed
    #[error("Condition not met: {0}")]
    ConditionNotMet(String),

    /// Browser driver transport or protocol error
    #[error("Driver error: {0}")]
    Driver(String),

    /// Session was already released
    #[error("Session closed")]
    SessionClosed,

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ActionError {
    /// Timeouts and missing elements are usually caused by slow rendering
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ActionError::WaitTimeout(_) | ActionError::NotClickable(_) | ActionError::Driver(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_classification() {
        assert!(ActionError::WaitTimeout("x".into()).is_transient());
        assert!(!ActionError::SessionClosed.is_transient());
        assert!(!ActionError::ConditionNotMet("qty".into()).is_transient());
    }
}
