use std::sync::Arc;

use docsum::api::{AppState, handler};
use docsum::core::config::AppConfig;
use lambda_runtime::{Error, LambdaEvent, service_fn};
use serde_json::Value;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Error> {
    docsum::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        Error::from(e)
    })?;
    info!(
        bucket = %config.s3_bucket,
        region = %config.aws_region,
        model = %config.bedrock_model_id,
        "Starting document summarizer"
    );

    let state = Arc::new(AppState::from_config(&config).await);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let state = Arc::clone(&state);
        async move { handler(&state, event).await }
    }))
    .await
}
