use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::primitives::Blob;
use tracing::error;

use super::InferenceService;
use crate::core::aws::describe_sdk_error;
use crate::errors::SummarizationError;

/// [`InferenceService`] backed by Bedrock Runtime `InvokeModel`.
#[derive(Debug, Clone)]
pub struct BedrockService {
    client: BedrockClient,
}

impl BedrockService {
    #[must_use]
    pub fn new(client: BedrockClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl InferenceService for BedrockService {
    async fn invoke(&self, model_id: &str, body: Vec<u8>) -> Result<Vec<u8>, SummarizationError> {
        let response = self
            .client
            .invoke_model()
            .model_id(model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                let reason = describe_sdk_error(&e);
                error!("bedrock invoke_model {} failed: {}", model_id, reason);
                SummarizationError::Service(reason)
            })?;

        Ok(response.body.into_inner())
    }
}
