//! Wire types for the chat backend.

use chatline_application::TransportError;
use serde::{Deserialize, Serialize};

/// Shown when a failed response carries no usable `error` field.
pub const GENERIC_FAILURE: &str = "An error occurred";

/// Buffered-mode body lacking the reply or the thread id.
pub const INVALID_RESPONSE: &str = "invalid response from server";

/// Request body for both chat endpoints.
#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub message: &'a str,
    pub thread_id: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SyncResponse {
    data: Option<SyncData>,
}

#[derive(Debug, Deserialize)]
struct SyncData {
    response: Option<String>,
    thread_id: Option<String>,
}

/// Message to surface for a non-success response body.
pub(crate) fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

/// Parse a buffered reply into `(reply, thread_id)`. Both must be present
/// and non-empty.
pub(crate) fn parse_sync_response(body: &[u8]) -> Result<(String, String), TransportError> {
    let invalid = || TransportError::InvalidResponse(INVALID_RESPONSE.to_string());

    let parsed: SyncResponse = serde_json::from_slice(body).map_err(|_| invalid())?;
    let data = parsed.data.ok_or_else(invalid)?;
    let non_empty = |v: Option<String>| v.filter(|s| !s.is_empty());
    match (non_empty(data.response), non_empty(data.thread_id)) {
        (Some(response), Some(thread_id)) => Ok((response, thread_id)),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_null_thread() {
        let body = serde_json::to_value(ChatRequest {
            message: "Hello",
            thread_id: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"message": "Hello", "thread_id": null}));
    }

    #[test]
    fn error_field_is_surfaced() {
        assert_eq!(error_message(br#"{"error": "rate limited"}"#), "rate limited");
    }

    #[test]
    fn missing_or_unparsable_error_falls_back() {
        assert_eq!(error_message(br#"{"detail": "nope"}"#), GENERIC_FAILURE);
        assert_eq!(error_message(br#"{"error": ""}"#), GENERIC_FAILURE);
        assert_eq!(error_message(b"<html>502</html>"), GENERIC_FAILURE);
        assert_eq!(error_message(b""), GENERIC_FAILURE);
    }

    #[test]
    fn sync_response_requires_both_fields() {
        let ok = parse_sync_response(br#"{"data": {"response": "Hi", "thread_id": "t1"}}"#);
        assert_eq!(ok.unwrap(), ("Hi".to_string(), "t1".to_string()));

        for body in [
            &br#"{"data": {"response": "Hi"}}"#[..],
            br#"{"data": {"thread_id": "t1"}}"#,
            br#"{"response": "Hi", "thread_id": "t1"}"#,
            br#"{"data": {"response": "", "thread_id": "t1"}}"#,
            br#"{"data": {"response": "Hi", "thread_id": ""}}"#,
            b"not json",
        ] {
            let err = parse_sync_response(body).unwrap_err();
            assert_eq!(err.to_string(), INVALID_RESPONSE);
        }
    }
}
