//! Error types for dialog classification

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GateError {
    /// Order pattern failed to compile
    #[error("Invalid order pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
