//! Failure handling strategies

use crate::errors::FlowError;
use crate::types::{FailureStrategy, Step};
use action_primitives::ActionError;
use tracing::{error, warn};

/// What to do after a step failed
#[derive(Debug, Clone, PartialEq)]
pub enum FailureDecision {
    /// Stop the flow with this error
    Abort(FlowError),

    /// Record the reason and continue with the next step
    Continue(String),
}

/// Failure handler trait
pub trait FailureHandler: Send + Sync {
    /// Decide how a failed step affects the flow
    fn handle_failure(&self, step: &Step, error: &ActionError) -> FailureDecision;
}

/// Applies each step's own failure strategy
#[derive(Debug, Default)]
pub struct DefaultFailureHandler;

impl DefaultFailureHandler {
    /// Create a new default failure handler
    pub fn new() -> Self {
        Self
    }
}

impl FailureHandler for DefaultFailureHandler {
    fn handle_failure(&self, step: &Step, err: &ActionError) -> FailureDecision {
        match step.strategy {
            FailureStrategy::Abort => {
                error!(
                    step = %step.name,
                    kind = %step.kind,
                    cause = %err,
                    "{}",
                    step.failure_message
                );
                FailureDecision::Abort(FlowError::StepFailed {
                    step: step.name.clone(),
                    kind: step.kind,
                    message: step.failure_message.clone(),
                    cause: err.to_string(),
                })
            }

            FailureStrategy::Continue => {
                warn!(
                    step = %step.name,
                    cause = %err,
                    "step failed, continuing to next step"
                );
                FailureDecision::Continue(format!("{}: {}", step.failure_message, err))
            }
        }
    }
}
