//! Response builders for the API Gateway proxy integration.

use serde_json::{Value, json};

use crate::core::models::SummaryResponse;

#[must_use]
pub fn ok_json(body: &Value) -> Value {
    json!({
        "statusCode": 200,
        "headers": { "Content-Type": "application/json" },
        "body": body.to_string()
    })
}

#[must_use]
pub fn ok_summary(summary: &str) -> Value {
    let body = SummaryResponse {
        summary: summary.to_string(),
    };
    ok_json(&json!(body))
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> Value {
    json!({
        "statusCode": status_code,
        "headers": { "Content-Type": "application/json" },
        "body": json!({ "error": message }).to_string()
    })
}
