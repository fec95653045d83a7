/// Centralized helper for WebSocket error payloads.
///
/// Used for errors raised before or outside the typed message path (invalid
/// JSON, unauthenticated senders, flood kicks) so every error reaching a
/// client has the same envelope as `ServerWsMessage::Error`.

/// Formats a WebSocket error message as a JSON string.
///
/// # Arguments
/// - `code`: Unique error code (e.g. "INVALID_MESSAGE").
/// - `message`: Human-readable error message (in English).
pub fn ws_error_message(code: &str, message: &str) -> String {
    format!(
        r#"{{"action":"Error","data":{{"code":"{}","message":"{}"}}}}"#,
        code, message
    )
}
