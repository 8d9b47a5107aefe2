use serde::Deserialize;
use thiserror::Error;

/// Shown when the backend gives no usable message of its own.
pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("unexpected backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Operator-facing text: the server message when it sent one, else the fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Backend { message, .. } if !message.trim().is_empty() => message.clone(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Backend { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            ApiError::Decode(_) => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Error bodies seen from the backend: `{ "message": ... }` or `{ "error": ... }`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Pull a readable message out of a failed response body.
pub(crate) fn extract_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .message
            .or(parsed.error)
            .unwrap_or_default(),
        Err(_) => {
            // Plain-text bodies are passed through when short enough to be a message.
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.len() <= 200 && !text.starts_with('<') {
                text
            } else {
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_is_surfaced() {
        let e = ApiError::Backend { status: 400, message: "Chest number already taken".into() };
        assert_eq!(e.user_message(), "Chest number already taken");
        assert_eq!(e.status(), Some(400));
    }

    #[test]
    fn blank_message_falls_back() {
        let e = ApiError::Backend { status: 500, message: "  ".into() };
        assert_eq!(e.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn decode_error_falls_back() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        let e = ApiError::from(err);
        assert_eq!(e.user_message(), GENERIC_FAILURE);
        assert!(e.status().is_none());
    }

    #[test]
    fn extracts_message_then_error_field() {
        assert_eq!(extract_message(br#"{"message":"Name is required"}"#), "Name is required");
        assert_eq!(extract_message(br#"{"error":"Forbidden"}"#), "Forbidden");
        assert_eq!(extract_message(br#"{"success":false}"#), "");
    }

    #[test]
    fn plain_text_bodies_pass_through_but_html_does_not() {
        assert_eq!(extract_message(b"Team not found"), "Team not found");
        assert_eq!(extract_message(b"<html><body>502</body></html>"), "");
    }

    #[test]
    fn status_helpers() {
        assert!(ApiError::Backend { status: 404, message: String::new() }.is_not_found());
        assert!(ApiError::Backend { status: 401, message: String::new() }.is_unauthorized());
    }
}
