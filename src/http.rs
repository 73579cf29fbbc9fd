//! Shared handling of `ureq` responses for the portal and Bugzilla clients.

use serde::de::DeserializeOwned;

use crate::Error;

/// Longest response body echoed back inside an error message.
const MAX_ERROR_BODY: usize = 800;

/// Convert a failed `ureq` call into an [`Error::Http`], keeping the status
/// code and (truncated) body for non-success responses.
pub(crate) fn request_error(operation: &str, err: ureq::Error) -> Error {
    match err {
        ureq::Error::Status(code, resp) => {
            let body = resp.into_string().unwrap_or_default();
            Error::Http(format!(
                "{} failed with HTTP {}: {}",
                operation,
                code,
                truncate(&body, MAX_ERROR_BODY)
            ))
        }
        ureq::Error::Transport(transport) => {
            Error::Http(format!("{} request failed: {}", operation, transport))
        }
    }
}

/// Decode a successful response body as JSON.
pub(crate) fn decode_json<T: DeserializeOwned>(
    operation: &str,
    resp: ureq::Response,
) -> Result<T, Error> {
    resp.into_json()
        .map_err(|e| Error::Decode(format!("{}: {}", operation, e)))
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
