use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::core::aws::load_sdk_config;
use crate::core::config::AppConfig;
use crate::extraction::{Extractor, TextractService};
use crate::orchestrator::Orchestrator;
use crate::storage::{S3ObjectStore, Uploader};
use crate::summarization::{BedrockService, Summarizer};

/// Everything a request needs, built once per cold start and shared by
/// reference across invocations.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub media_dir: PathBuf,
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, media_dir: PathBuf, request_timeout: Duration) -> Self {
        Self {
            orchestrator,
            media_dir,
            request_timeout,
        }
    }

    /// Builds the AWS-backed pipeline described by `config`.
    pub async fn from_config(config: &AppConfig) -> Self {
        let sdk_config = load_sdk_config(config).await;

        let uploader = Uploader::new(S3ObjectStore::new(aws_sdk_s3::Client::new(&sdk_config)));
        let extractor = Extractor::new(
            TextractService::new(aws_sdk_textract::Client::new(&sdk_config)),
            config.poll_policy(),
        );
        let summarizer = Summarizer::new(BedrockService::new(aws_sdk_bedrockruntime::Client::new(
            &sdk_config,
        )))
        .with_model(&config.bedrock_model_id)
        .with_temperature(config.summary_temperature)
        .with_max_gen_len(config.summary_max_gen_len);

        let orchestrator = Orchestrator::new(
            &config.s3_bucket,
            Arc::new(uploader),
            Arc::new(extractor),
            Arc::new(summarizer),
        );

        Self::new(
            orchestrator,
            config.media_dir.clone(),
            config.request_timeout,
        )
    }
}
