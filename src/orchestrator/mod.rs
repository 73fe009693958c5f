//! Upload → extract → summarize pipeline.
//!
//! A run is a forward-only state machine. Each stage starts only after the
//! previous one returned, receives its output, and the first failing stage
//! ends the run with an [`OrchestrationError`] naming that step.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{Instrument, error, info, info_span};

use crate::core::models::{ObjectLocation, UploadAck, UploadRequest};
use crate::errors::{ExtractionError, OrchestrationError, StorageError, SummarizationError};
use crate::extraction::{AnalysisService, Extractor};
use crate::storage::{ObjectStore, Uploader};
use crate::summarization::{InferenceService, Summarizer};

#[async_trait]
pub trait Upload: Send + Sync {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadAck, StorageError>;
}

#[async_trait]
pub trait Extract: Send + Sync {
    async fn extract(&self, location: &ObjectLocation) -> Result<String, ExtractionError>;
}

#[async_trait]
pub trait Summarize: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String, SummarizationError>;
}

#[async_trait]
impl<S: ObjectStore> Upload for Uploader<S> {
    async fn upload(&self, request: &UploadRequest) -> Result<UploadAck, StorageError> {
        Uploader::upload(self, request).await
    }
}

#[async_trait]
impl<A: AnalysisService> Extract for Extractor<A> {
    async fn extract(&self, location: &ObjectLocation) -> Result<String, ExtractionError> {
        Extractor::extract(self, location).await
    }
}

#[async_trait]
impl<I: InferenceService> Summarize for Summarizer<I> {
    async fn summarize(&self, text: &str) -> Result<String, SummarizationError> {
        Summarizer::summarize(self, text).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Upload,
    Extract,
    Summarize,
}

impl Step {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Upload => "upload",
            Step::Extract => "extract",
            Step::Summarize => "summarize",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline state, carrying the input of the pending step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Uploading(UploadRequest),
    Extracting(ObjectLocation),
    Summarizing(String),
    Done(String),
}

impl Stage {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Stage::Uploading(_) => "UPLOADING",
            Stage::Extracting(_) => "EXTRACTING",
            Stage::Summarizing(_) => "SUMMARIZING",
            Stage::Done(_) => "DONE",
        }
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    bucket: String,
    uploader: Arc<dyn Upload>,
    extractor: Arc<dyn Extract>,
    summarizer: Arc<dyn Summarize>,
}

impl Orchestrator {
    pub fn new(
        bucket: &str,
        uploader: Arc<dyn Upload>,
        extractor: Arc<dyn Extract>,
        summarizer: Arc<dyn Summarize>,
    ) -> Self {
        Self {
            bucket: bucket.to_string(),
            uploader,
            extractor,
            summarizer,
        }
    }

    #[must_use]
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Uploads `local_path` as `object_name`, extracts its text and returns
    /// the generated summary.
    ///
    /// # Errors
    ///
    /// Returns the first step failure wrapped with the name of that step.
    pub async fn run(
        &self,
        local_path: &Path,
        object_name: &str,
    ) -> Result<String, OrchestrationError> {
        let span = info_span!("orchestrate", bucket = %self.bucket, object = %object_name);

        async move {
            let mut stage = Stage::Uploading(UploadRequest::new(
                local_path,
                &self.bucket,
                object_name,
            ));

            loop {
                let from = stage.name();
                stage = match self.advance(stage).await {
                    Ok(Stage::Done(summary)) => {
                        info!("{} -> DONE", from);
                        return Ok(summary);
                    }
                    Ok(next) => {
                        info!("{} -> {}", from, next.name());
                        next
                    }
                    Err(e) => {
                        error!("{} -> FAILED({}): {}", from, e.step(), e);
                        return Err(e);
                    }
                };
            }
        }
        .instrument(span)
        .await
    }

    async fn advance(&self, stage: Stage) -> Result<Stage, OrchestrationError> {
        match stage {
            Stage::Uploading(request) => {
                let ack = self.uploader.upload(&request).await?;
                Ok(Stage::Extracting(ack.location))
            }
            Stage::Extracting(location) => {
                let text = self.extractor.extract(&location).await?;
                Ok(Stage::Summarizing(text))
            }
            Stage::Summarizing(text) => {
                let summary = self.summarizer.summarize(&text).await?;
                Ok(Stage::Done(summary))
            }
            Stage::Done(summary) => Ok(Stage::Done(summary)),
        }
    }
}
