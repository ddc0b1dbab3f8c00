//! JSON output formatting.

use serde::Serialize;
use serde_json::{Value, json};

use crate::error::{ClientError, ToolError, ToolResult};

/// Serialize a payload the way tools return it.
pub fn to_json<T: Serialize>(payload: &T) -> ToolResult<String> {
    serde_json::to_string_pretty(payload)
        .map_err(|e| ToolError::internal(format!("failed to serialize payload: {e}")))
}

/// Failure descriptor returned to the caller instead of a payload.
///
/// ```json
/// {"error": "not_found", "message": "...", "retryAfterSecs": 30}
/// ```
#[must_use]
pub fn failure_descriptor(err: &ClientError, message: &str) -> Value {
    let mut obj = json!({
        "error": err.kind(),
        "message": message,
    });

    if let Some(wait) = err.retry_after() {
        obj["retryAfterSecs"] = json!(wait.as_secs());
    }

    obj
}
