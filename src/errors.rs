use std::time::Duration;

use thiserror::Error;

use crate::orchestrator::Step;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid upload request: {0}")]
    InvalidRequest(String),

    #[error("Failed to read uploaded file: {reason}")]
    LocalFile { path: String, reason: String },

    #[error("Object storage rejected the request: {0}")]
    Remote(String),
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Failed to submit document analysis: {0}")]
    Submit(String),

    #[error("Failed to poll analysis job {job_id}: {reason}")]
    Poll { job_id: String, reason: String },

    #[error("Analysis job {job_id} finished with status {status}: {reason}")]
    JobFailed {
        job_id: String,
        status: String,
        reason: String,
    },

    #[error("Analysis job {job_id} did not finish within {waited:?}")]
    TimedOut { job_id: String, waited: Duration },
}

#[derive(Debug, Error)]
pub enum SummarizationError {
    #[error("Failed to build inference request: {0}")]
    InvalidRequest(String),

    #[error("Inference service error: {0}")]
    Service(String),

    #[error("Malformed inference response: {0}")]
    MalformedResponse(String),

    #[error("Inference response has no generation field")]
    MissingGeneration,
}

/// Rejected inbound input, reported to the caller as a 400.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Uploaded file is empty")]
    EmptyFile,

    #[error("Invalid file name: {0:?}")]
    InvalidFilename(String),

    #[error("Invalid request body: {0}")]
    InvalidBody(String),
}

/// A failed pipeline run. Each variant names the step that halted the run.
#[derive(Debug, Error)]
pub enum OrchestrationError {
    #[error("upload step failed: {0}")]
    Upload(#[source] StorageError),

    #[error("extract step failed: {0}")]
    Extract(#[source] ExtractionError),

    #[error("summarize step failed: {0}")]
    Summarize(#[source] SummarizationError),
}

impl OrchestrationError {
    #[must_use]
    pub fn step(&self) -> Step {
        match self {
            Self::Upload(_) => Step::Upload,
            Self::Extract(_) => Step::Extract,
            Self::Summarize(_) => Step::Summarize,
        }
    }
}

impl From<StorageError> for OrchestrationError {
    fn from(error: StorageError) -> Self {
        OrchestrationError::Upload(error)
    }
}

impl From<ExtractionError> for OrchestrationError {
    fn from(error: ExtractionError) -> Self {
        OrchestrationError::Extract(error)
    }
}

impl From<SummarizationError> for OrchestrationError {
    fn from(error: SummarizationError) -> Self {
        OrchestrationError::Summarize(error)
    }
}

#[derive(Debug, Error)]
pub enum RequestError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Failed to stage uploaded file: {0}")]
    Staging(String),

    #[error(transparent)]
    Orchestration(#[from] OrchestrationError),

    #[error("Request timed out after {0:?}")]
    TimedOut(Duration),
}

impl RequestError {
    /// HTTP status reported for this failure.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            RequestError::Validation(_) => 400,
            _ => 500,
        }
    }
}
