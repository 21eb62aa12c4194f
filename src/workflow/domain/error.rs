//! Error types for workflow graph domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing workflow domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowDomainError {
    /// The stage name is empty after trimming.
    #[error("stage name must not be empty")]
    EmptyStageName,
}

/// Error returned while parsing stage types from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown stage type: {0}")]
pub struct ParseStageTypeError(pub String);
