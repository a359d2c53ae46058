//! Classification of remote call failures.
//!
//! Every failure of a protected call maps to exactly one kind, based solely
//! on the outcome of that single call. `SessionInvalid` is reserved for the
//! server's distinguished 401 (the signal that the presented credential is
//! no longer accepted) and is never conflated with other statuses.

use reqwest::StatusCode;
use thiserror::Error;

/// Maximum length of a response body carried in an error message.
const MAX_ERROR_BODY_LEN: usize = 500;

/// A remote call's failure, classified.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The call never reached the server.
    #[error("cannot connect to server at {url}: {source} (is the server running and the address correct?)")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server rejected the presented credential; re-authentication is required.
    #[error("{message}")]
    SessionInvalid { message: String },

    /// Any other non-success response.
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

impl ApiError {
    /// Classify a call that failed before producing a response.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source,
        }
    }

    /// Classify a non-success response from its status and body.
    ///
    /// Server-side failures (5xx) are normalized to a generic phrasing;
    /// other client-side statuses carry the server's message verbatim.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = extract_message(body);
        match status.as_u16() {
            401 => Self::SessionInvalid {
                message: if message.is_empty() {
                    "session is no longer valid".to_string()
                } else {
                    message
                },
            },
            code @ 500..=599 => Self::Api {
                status: code,
                message: "server error, please try again later".to_string(),
            },
            code => Self::Api {
                status: code,
                message,
            },
        }
    }

    /// True iff this failure means the credential was rejected.
    pub fn is_session_invalid(&self) -> bool {
        matches!(self, Self::SessionInvalid { .. })
    }

    pub(crate) fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pull a human message out of an error body: JSON `{"error": …}` or
/// `{"message": …}` when present, otherwise the (truncated) raw text.
fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    truncate_body(body.trim())
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LEN {
        body.to_string()
    } else {
        let mut end = MAX_ERROR_BODY_LEN;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }
}
