//! Lambda handler for the upload endpoint.
//!
//! Routes:
//! - `GET  .../health` — liveness probe
//! - `POST /`          — upload a document, returns `{"summary": ...}`

use lambda_runtime::{Error, LambdaEvent};
use serde_json::{Value, json};
use tracing::{error, info, warn};

use super::state::AppState;
use super::transient::TransientFile;
use super::{helpers, parsing};
use crate::errors::RequestError;

/// Lambda entry point: delegates to [`handle_request`] with the invocation's
/// request id.
///
/// # Errors
///
/// Never fails; every failure is encoded in the returned response payload.
#[tracing::instrument(level = "info", skip(state, event), fields(request_id = %event.context.request_id))]
pub async fn function_handler(state: &AppState, event: LambdaEvent<Value>) -> Result<Value, Error> {
    Ok(handle_request(state, &event.payload, &event.context.request_id).await)
}

/// Handles one proxy event and builds the response payload.
pub async fn handle_request(state: &AppState, payload: &Value, request_id: &str) -> Value {
    let path = payload
        .get("rawPath")
        .and_then(|v| v.as_str())
        .or_else(|| payload.get("path").and_then(|v| v.as_str()))
        .unwrap_or("/");
    let method = payload
        .get("requestContext")
        .and_then(|c| c.get("http"))
        .and_then(|h| h.get("method"))
        .and_then(|m| m.as_str())
        .or_else(|| payload.get("httpMethod").and_then(|m| m.as_str()))
        .unwrap_or("POST");
    info!(raw_path = %path, method = %method, "Request received");

    if path.ends_with("/health") {
        return helpers::ok_json(&json!({ "status": "ok" }));
    }

    if !method.eq_ignore_ascii_case("POST") {
        return helpers::err_response(405, "Method not allowed");
    }

    match process_document(state, payload, request_id).await {
        Ok(summary) => {
            info!("Document summarized ({} chars)", summary.len());
            helpers::ok_summary(&summary)
        }
        Err(e) => {
            let status = e.status_code();
            if status >= 500 {
                error!("Request failed: {}", e);
            } else {
                warn!("Rejected request: {}", e);
            }
            helpers::err_response(status, &format!("An error occurred: {e}"))
        }
    }
}

/// Stages the uploaded file, runs the pipeline under the request timeout and
/// removes the staged file on every path out.
pub async fn process_document(
    state: &AppState,
    payload: &Value,
    request_id: &str,
) -> Result<String, RequestError> {
    let file = parsing::parse_upload(payload)?;
    let object_name = object_name_for(request_id, &file.filename);
    info!(
        "Processing {} ({} bytes) as {}",
        file.filename,
        file.bytes.len(),
        object_name
    );

    let staged = TransientFile::create(&state.media_dir, &file.filename, &file.bytes).await?;

    let outcome = tokio::time::timeout(
        state.request_timeout,
        state.orchestrator.run(staged.path(), &object_name),
    )
    .await;

    staged.close();

    match outcome {
        Ok(result) => Ok(result?),
        Err(_) => Err(RequestError::TimedOut(state.request_timeout)),
    }
}

/// Object key for an upload: the request id keeps concurrent uploads of the
/// same filename apart.
#[must_use]
pub fn object_name_for(request_id: &str, filename: &str) -> String {
    let prefix: String = request_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect();
    if prefix.is_empty() {
        format!("{}/{}", uuid::Uuid::new_v4(), filename)
    } else {
        format!("{prefix}/{filename}")
    }
}
