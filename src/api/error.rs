use thiserror::Error;

/// Maximum number of error body characters kept in [`ApiError::Http`].
pub const MAX_ERROR_CHARS: usize = 200;

/// Failures returned by [`ApiClient`](super::ApiClient) calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Timeout: {0}")]
    Timeout(String),
    #[error("Request failed ({status}): {message}")]
    Http { status: u16, message: String },
    #[error("Response error: {0}")]
    Parse(String),
    #[error("Request error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Whether repeating the same request may succeed.
    ///
    /// Connection problems, timeouts, `408`, `429` and `5xx` responses are
    /// transient. Client errors and undecodable bodies are not.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout(_) => true,
            ApiError::Http { status, .. } => matches!(status, 408 | 429 | 500..=599),
            ApiError::Config(_) | ApiError::Parse(_) | ApiError::Serialization(_) => false,
        }
    }

    /// HTTP status of the failed response, if the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout("Request timed out. Please try again.".to_string())
        } else if err.is_builder() {
            ApiError::Config(format!("Failed to build request: {err}"))
        } else if err.is_decode() {
            ApiError::Parse(format!("Failed to decode response: {err}"))
        } else {
            ApiError::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

/// Trims and truncates an error body so it can be surfaced to users.
pub(crate) fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_transient() {
        for status in [408, 429, 500, 502, 503, 599] {
            let err = ApiError::Http {
                status,
                message: String::new(),
            };
            assert!(err.is_transient(), "{status} should be transient");
        }
    }

    #[test]
    fn client_errors_are_terminal() {
        for status in [400, 401, 403, 404, 409, 422] {
            let err = ApiError::Http {
                status,
                message: String::new(),
            };
            assert!(!err.is_transient(), "{status} should be terminal");
        }
        assert!(!ApiError::Parse("bad json".to_string()).is_transient());
        assert!(!ApiError::Config("bad url".to_string()).is_transient());
        assert!(ApiError::Network("refused".to_string()).is_transient());
    }

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("   "), "Request failed.");
        assert_eq!(sanitize_body("  not found \n"), "not found");
        let long = "x".repeat(MAX_ERROR_CHARS + 50);
        assert_eq!(sanitize_body(&long).chars().count(), MAX_ERROR_CHARS);
    }

    #[test]
    fn display_includes_status() {
        let err = ApiError::Http {
            status: 503,
            message: "down".to_string(),
        };
        assert_eq!(err.to_string(), "Request failed (503): down");
        assert_eq!(err.status(), Some(503));
    }
}
