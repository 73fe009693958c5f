//! Summary generation through a hosted text model.

pub mod bedrock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::core::config::{DEFAULT_MODEL_ID, DEFAULT_TEMPERATURE};
use crate::core::models::SummaryRequest;
use crate::errors::SummarizationError;

pub use bedrock::BedrockService;

/// Fixed instruction wrapped around the extracted text.
pub const INSTRUCTION_TEMPLATE: &str =
    "As an expert researcher and technical expert, please summarize the following text: {text}";

/// Remote model invocation with raw JSON request and response bodies.
#[async_trait]
pub trait InferenceService: Send + Sync {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, SummarizationError>;
}

#[derive(Debug, Serialize)]
struct InvokeBody<'a> {
    prompt: &'a str,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_gen_len: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct InvokeResponse {
    generation: Option<String>,
}

/// Summarizes text with a single model call. Input length is not capped, the
/// model's own context limit is the only bound.
pub struct Summarizer<I> {
    service: I,
    model_id: String,
    temperature: f32,
    max_gen_len: Option<u32>,
}

impl<I: InferenceService> Summarizer<I> {
    pub fn new(service: I) -> Self {
        Self {
            service,
            model_id: DEFAULT_MODEL_ID.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_gen_len: None,
        }
    }

    #[must_use]
    pub fn with_model(mut self, model_id: &str) -> Self {
        self.model_id = model_id.to_string();
        self
    }

    #[must_use]
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn with_max_gen_len(mut self, max_gen_len: Option<u32>) -> Self {
        self.max_gen_len = max_gen_len;
        self
    }

    #[must_use]
    pub fn request_for(&self, text: &str) -> SummaryRequest {
        SummaryRequest {
            source_text: text.to_string(),
            instruction_template: INSTRUCTION_TEMPLATE.to_string(),
            temperature: self.temperature,
        }
    }

    /// # Errors
    ///
    /// Returns an error if the service call fails, the response is not valid
    /// JSON, or it carries no `generation` field.
    #[instrument(level = "info", skip(self, text), fields(model = %self.model_id, chars = text.len()))]
    pub async fn summarize(&self, text: &str) -> Result<String, SummarizationError> {
        let request = self.request_for(text);
        let prompt = request.prompt();

        #[cfg(feature = "debug-logs")]
        info!("Using summary prompt:\n{}", prompt);

        let body = serde_json::to_vec(&InvokeBody {
            prompt: &prompt,
            temperature: request.temperature,
            max_gen_len: self.max_gen_len,
        })
        .map_err(|e| SummarizationError::InvalidRequest(e.to_string()))?;

        let raw = self.service.invoke(&self.model_id, body).await?;
        let summary = parse_generation(&raw)?;

        info!("Generated summary of {} chars", summary.len());
        Ok(summary)
    }
}

fn parse_generation(raw: &[u8]) -> Result<String, SummarizationError> {
    let response: InvokeResponse = serde_json::from_slice(raw)
        .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;

    response
        .generation
        .map(|g| g.trim().to_string())
        .ok_or(SummarizationError::MissingGeneration)
}
