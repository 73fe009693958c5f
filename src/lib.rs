//! docsum - uploads a document, extracts its text and summarizes it.
//!
//! Every request runs the same three-step pipeline:
//! 1. Upload the file to an S3 bucket
//! 2. Extract its text with an asynchronous Textract document analysis
//! 3. Summarize the text with a Bedrock-hosted model
//!
//! # Architecture
//!
//! The system uses:
//! - AWS Lambda behind an API Gateway proxy integration for the upload endpoint
//! - aws-sdk-s3, aws-sdk-textract and aws-sdk-bedrockruntime for the three steps
//! - A forward-only state machine (`orchestrator`) to sequence them
//! - Tokio for async runtime
//!
//! AWS clients are built once per cold start and injected into each step, so
//! tests can swap in their own `Upload`/`Extract`/`Summarize` implementations.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use docsum::api::AppState;
//! use docsum::core::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     docsum::setup_logging();
//!
//!     let config = AppConfig::from_env()?;
//!     let state = AppState::from_config(&config).await;
//!
//!     let summary = state
//!         .orchestrator
//!         .run(Path::new("/tmp/report.pdf"), "reports/report.pdf")
//!         .await?;
//!     println!("Summary: {}", summary);
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod core;
pub mod errors;
pub mod extraction;
pub mod orchestrator;
pub mod storage;
pub mod summarization;

pub use errors::{
    ExtractionError, OrchestrationError, RequestError, StorageError, SummarizationError,
    ValidationError,
};
pub use orchestrator::{Orchestrator, Step};

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// Log level comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; only the first call installs the subscriber.
///
/// # Example
///
/// ```
/// docsum::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
