use async_trait::async_trait;
use aws_sdk_textract::Client as TextractClient;
use aws_sdk_textract::types::{
    Block, BlockType, DocumentLocation, FeatureType, JobStatus as TextractJobStatus, S3Object,
};
use tracing::error;

use super::{AnalysisBlock, AnalysisPage, AnalysisService, BlockKind, JobStatus};
use crate::core::aws::describe_sdk_error;
use crate::core::models::ObjectLocation;
use crate::errors::ExtractionError;

/// [`AnalysisService`] backed by Amazon Textract's asynchronous document analysis.
#[derive(Debug, Clone)]
pub struct TextractService {
    client: TextractClient,
}

impl TextractService {
    #[must_use]
    pub fn new(client: TextractClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl AnalysisService for TextractService {
    async fn start_analysis(&self, location: &ObjectLocation) -> Result<String, ExtractionError> {
        let document = DocumentLocation::builder()
            .s3_object(
                S3Object::builder()
                    .bucket(&location.bucket)
                    .name(&location.object_name)
                    .build(),
            )
            .build();

        let response = self
            .client
            .start_document_analysis()
            .document_location(document)
            .feature_types(FeatureType::Tables)
            .feature_types(FeatureType::Forms)
            .send()
            .await
            .map_err(|e| {
                let reason = describe_sdk_error(&e);
                error!("textract start_document_analysis for {} failed: {}", location, reason);
                ExtractionError::Submit(reason)
            })?;

        response
            .job_id()
            .map(ToString::to_string)
            .ok_or_else(|| ExtractionError::Submit("response did not include a job id".to_string()))
    }

    async fn get_analysis(
        &self,
        job_id: &str,
        next_token: Option<&str>,
    ) -> Result<AnalysisPage, ExtractionError> {
        let response = self
            .client
            .get_document_analysis()
            .job_id(job_id)
            .set_next_token(next_token.map(ToString::to_string))
            .send()
            .await
            .map_err(|e| ExtractionError::Poll {
                job_id: job_id.to_string(),
                reason: describe_sdk_error(&e),
            })?;

        let status = match response.job_status() {
            Some(TextractJobStatus::InProgress) => JobStatus::InProgress,
            Some(TextractJobStatus::Succeeded) => JobStatus::Succeeded,
            Some(TextractJobStatus::PartialSuccess) => JobStatus::PartialSuccess,
            Some(TextractJobStatus::Failed) => JobStatus::Failed,
            Some(other) => {
                return Err(ExtractionError::Poll {
                    job_id: job_id.to_string(),
                    reason: format!("unrecognised job status {}", other.as_str()),
                });
            }
            None => {
                return Err(ExtractionError::Poll {
                    job_id: job_id.to_string(),
                    reason: "response did not include a job status".to_string(),
                });
            }
        };

        Ok(AnalysisPage {
            status,
            status_message: response.status_message().map(ToString::to_string),
            blocks: response.blocks().iter().map(convert_block).collect(),
            next_token: response.next_token().map(ToString::to_string),
        })
    }
}

fn convert_block(block: &Block) -> AnalysisBlock {
    let kind = match block.block_type() {
        Some(BlockType::Page) => BlockKind::Page,
        Some(BlockType::Line) => BlockKind::Line,
        Some(BlockType::Word) => BlockKind::Word,
        Some(BlockType::Table) => BlockKind::Table,
        Some(BlockType::Cell) => BlockKind::Cell,
        Some(BlockType::KeyValueSet) => BlockKind::KeyValueSet,
        _ => BlockKind::Other,
    };

    AnalysisBlock {
        kind,
        text: block.text().map(ToString::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_block_keeps_type_and_text() {
        let line = Block::builder()
            .block_type(BlockType::Line)
            .text("Total revenue")
            .build();
        assert_eq!(convert_block(&line), AnalysisBlock::line("Total revenue"));

        let kv = Block::builder().block_type(BlockType::KeyValueSet).build();
        assert_eq!(convert_block(&kv).kind, BlockKind::KeyValueSet);

        let signature = Block::builder().block_type(BlockType::Signature).build();
        assert_eq!(convert_block(&signature).kind, BlockKind::Other);
    }
}
