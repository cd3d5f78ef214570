//! Flow execution error types

use crate::types::FailureKind;
use thiserror::Error;

/// Flow execution errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FlowError {
    /// A fatal step failed; the remainder of the flow was not run
    #[error("{message}")]
    StepFailed {
        step: String,
        kind: FailureKind,
        message: String,
        cause: String,
    },

    /// Invalid flow structure
    #[error("Invalid flow structure: {0}")]
    InvalidStructure(String),
}

impl FlowError {
    pub fn step(&self) -> Option<&str> {
        match self {
            FlowError::StepFailed { step, .. } => Some(step),
            FlowError::InvalidStructure(_) => None,
        }
    }

    pub fn kind(&self) -> FailureKind {
        match self {
            FlowError::StepFailed { kind, .. } => *kind,
            FlowError::InvalidStructure(_) => FailureKind::Unhandled,
        }
    }
}
