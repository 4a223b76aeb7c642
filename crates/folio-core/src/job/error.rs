/*
 * job/error.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Job pipeline error types.
 */

//! Error types for the render job pipeline.
//!
//! [`JobError`] covers pipeline execution; [`PipelineValidationError`]
//! covers pipeline construction. The supervisor is the only place
//! these turn into job status transitions.

use thiserror::Error;

use super::data::JobDataKind;
use crate::repository::RepositoryError;

/// Error in pipeline construction.
#[derive(Debug, Clone, Error)]
pub enum PipelineValidationError {
    #[error("Pipeline has no stages")]
    Empty,

    #[error(
        "Type mismatch: stage '{stage_a}' produces {output} but stage '{stage_b}' expects {input}"
    )]
    TypeMismatch {
        stage_a: String,
        stage_b: String,
        output: JobDataKind,
        input: JobDataKind,
    },
}

/// Error during pipeline execution.
#[derive(Debug, Error)]
pub enum JobError {
    /// Wrong input type for a stage.
    #[error("Stage '{stage}' expected input type {expected} but got {got}")]
    UnexpectedInput {
        stage: String,
        expected: JobDataKind,
        got: JobDataKind,
    },

    /// Stage execution failed.
    #[error("{message}")]
    StageError { stage: String, message: String },

    /// The job's cancellation token fired at a stage boundary.
    ///
    /// The display form is the exact message recorded on the job.
    #[error("Job was cancelled")]
    Cancelled,

    /// Domain error from loading or resolving job inputs.
    #[error(transparent)]
    Folio(#[from] crate::error::FolioError),

    #[error("Pipeline validation error: {0}")]
    Validation(#[from] PipelineValidationError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl JobError {
    /// Create an UnexpectedInput error.
    pub fn unexpected_input(
        stage: impl Into<String>,
        expected: JobDataKind,
        got: JobDataKind,
    ) -> Self {
        Self::UnexpectedInput {
            stage: stage.into(),
            expected,
            got,
        }
    }

    /// Create a StageError.
    pub fn stage_error(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::StageError {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// Check if this is a cancellation error.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = PipelineValidationError::Empty;
        assert!(err.to_string().contains("no stages"));

        let err = PipelineValidationError::TypeMismatch {
            stage_a: "load".to_string(),
            stage_b: "compose".to_string(),
            output: JobDataKind::LoadedIssue,
            input: JobDataKind::DecidedIssue,
        };
        let msg = err.to_string();
        assert!(msg.contains("load"));
        assert!(msg.contains("compose"));
        assert!(msg.contains("LoadedIssue"));
        assert!(msg.contains("DecidedIssue"));
    }

    #[test]
    fn test_cancelled_message_is_exact() {
        let err = JobError::Cancelled;
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "Job was cancelled");
    }

    #[test]
    fn test_stage_error_display_is_bare_message() {
        let err = JobError::stage_error("load", "Issue not found: 2025-07");
        assert_eq!(err.to_string(), "Issue not found: 2025-07");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: JobError = io_err.into();
        assert!(matches!(err, JobError::Io(_)));
    }
}
