//! Text extraction through an asynchronous document-analysis service.
//!
//! A job is submitted with table and form recognition enabled, polled on the
//! schedule given by [`PollPolicy`], and on success reduced to the text of its
//! line blocks in service order, joined by single spaces. Table and form
//! blocks are requested but only counted; they are not part of the output.
//! A failed job is an [`ExtractionError::JobFailed`], never a status string.

pub mod poll;
pub mod textract;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

use crate::core::models::ObjectLocation;
use crate::errors::ExtractionError;

pub use poll::PollPolicy;
pub use textract::TextractService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    InProgress,
    Succeeded,
    Failed,
    PartialSuccess,
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::InProgress)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::PartialSuccess => "PARTIAL_SUCCESS",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Page,
    Line,
    Word,
    Table,
    Cell,
    KeyValueSet,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisBlock {
    pub kind: BlockKind,
    pub text: Option<String>,
}

impl AnalysisBlock {
    pub fn line(text: &str) -> Self {
        Self {
            kind: BlockKind::Line,
            text: Some(text.to_string()),
        }
    }
}

/// One page of a `GetDocumentAnalysis`-style response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPage {
    pub status: JobStatus,
    pub status_message: Option<String>,
    pub blocks: Vec<AnalysisBlock>,
    pub next_token: Option<String>,
}

/// Remote document-analysis API.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Starts a table+form analysis of the object and returns the job id.
    async fn start_analysis(&self, location: &ObjectLocation) -> Result<String, ExtractionError>;

    async fn get_analysis(
        &self,
        job_id: &str,
        next_token: Option<&str>,
    ) -> Result<AnalysisPage, ExtractionError>;
}

/// State of one analysis job while it is being driven to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionJob {
    pub location: ObjectLocation,
    pub job_id: String,
    pub status: JobStatus,
    pub lines: Vec<String>,
}

impl ExtractionJob {
    fn new(location: ObjectLocation, job_id: String) -> Self {
        Self {
            location,
            job_id,
            status: JobStatus::InProgress,
            lines: Vec::new(),
        }
    }

    fn absorb(&mut self, blocks: Vec<AnalysisBlock>) -> BlockTally {
        let mut tally = BlockTally::default();
        for block in blocks {
            match block.kind {
                BlockKind::Line => {
                    if let Some(text) = block.text {
                        self.lines.push(text);
                    }
                }
                BlockKind::Table => tally.tables += 1,
                BlockKind::KeyValueSet => tally.key_values += 1,
                _ => {}
            }
        }
        tally
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.lines.join(" ")
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct BlockTally {
    tables: usize,
    key_values: usize,
}

pub struct Extractor<A> {
    service: A,
    policy: PollPolicy,
}

impl<A: AnalysisService> Extractor<A> {
    pub fn new(service: A, policy: PollPolicy) -> Self {
        Self { service, policy }
    }

    /// # Errors
    ///
    /// Returns an error if the job cannot be submitted or polled, finishes
    /// with a non-success status, or does not finish within the poll policy.
    #[instrument(level = "info", skip(self), fields(object = %location))]
    pub async fn extract(&self, location: &ObjectLocation) -> Result<String, ExtractionError> {
        let job_id = self.service.start_analysis(location).await?;
        if job_id.is_empty() {
            return Err(ExtractionError::Submit(
                "service returned an empty job id".to_string(),
            ));
        }
        info!("Analysis job started with ID: {}", job_id);

        let mut job = ExtractionJob::new(location.clone(), job_id);
        let first_page = self.wait_for_completion(&mut job).await?;
        self.collect_lines(&mut job, first_page).await?;

        let text = job.text();
        info!(
            "Analysis job {} produced {} lines ({} chars)",
            job.job_id,
            job.lines.len(),
            text.len()
        );

        #[cfg(feature = "debug-logs")]
        info!("Extracted text:\n{}", text);

        Ok(text)
    }

    /// Polls until the job reaches a terminal status. Returns the first result
    /// page of a succeeded job.
    async fn wait_for_completion(
        &self,
        job: &mut ExtractionJob,
    ) -> Result<AnalysisPage, ExtractionError> {
        let started = Instant::now();
        let mut delays = self.policy.delays();
        let mut polls = 0u32;

        loop {
            let page = self.service.get_analysis(&job.job_id, None).await?;
            polls += 1;
            job.status = page.status;

            match page.status {
                JobStatus::Succeeded => {
                    debug!("Job {} succeeded after {} polls", job.job_id, polls);
                    return Ok(page);
                }
                JobStatus::Failed | JobStatus::PartialSuccess => {
                    warn!(
                        "Job {} finished with status {}",
                        job.job_id,
                        page.status.as_str()
                    );
                    return Err(ExtractionError::JobFailed {
                        job_id: job.job_id.clone(),
                        status: page.status.as_str().to_string(),
                        reason: page
                            .status_message
                            .unwrap_or_else(|| "no status message".to_string()),
                    });
                }
                JobStatus::InProgress => {}
            }

            let delay = delays.next().unwrap_or(self.policy.max_interval);
            let waited = started.elapsed();
            if waited + delay > self.policy.max_wait {
                warn!(
                    "Giving up on job {} after {} polls ({:?})",
                    job.job_id, polls, waited
                );
                return Err(ExtractionError::TimedOut {
                    job_id: job.job_id.clone(),
                    waited,
                });
            }
            tokio::time::sleep(delay).await;
        }
    }

    /// Reads every result page of a succeeded job into `job.lines`.
    async fn collect_lines(
        &self,
        job: &mut ExtractionJob,
        first_page: AnalysisPage,
    ) -> Result<(), ExtractionError> {
        let mut next_token = first_page.next_token;
        let mut tally = job.absorb(first_page.blocks);
        let mut pages = 1u32;

        while let Some(token) = next_token {
            let page = self.service.get_analysis(&job.job_id, Some(&token)).await?;
            let page_tally = job.absorb(page.blocks);
            tally.tables += page_tally.tables;
            tally.key_values += page_tally.key_values;
            next_token = page.next_token;
            pages += 1;
        }

        debug!(
            "Job {}: {} result pages, {} tables and {} key-value sets not included in text",
            job.job_id, pages, tally.tables, tally.key_values
        );
        Ok(())
    }
}
