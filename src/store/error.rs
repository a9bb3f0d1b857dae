use crate::api::ApiError;
use thiserror::Error;
use tracing::error;

/// Terminal failure of a store operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("{0} has no self link")]
    MissingLink(&'static str),
}

/// Receives every terminal store failure exactly once.
///
/// Stores forward failures here after clearing their loading flag, then return
/// the same error to the caller.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, error: &StoreError);
}

/// Logs failures together with the message a user should see.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingErrorHandler;

impl ErrorHandler for TracingErrorHandler {
    fn handle(&self, failure: &StoreError) {
        error!(error = %failure, "{}", user_message(failure));
    }
}

/// Translates a failure into a short message for end users.
#[must_use]
pub fn user_message(failure: &StoreError) -> String {
    match failure {
        StoreError::MissingLink(kind) => {
            format!("The {kind} cannot be changed because the server did not provide its link.")
        }
        StoreError::Api(api) => match api {
            ApiError::Http { status: 401, .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::Http { status: 403, .. } => {
                "You are not allowed to perform this operation.".to_string()
            }
            ApiError::Http { status: 404, .. } => "The requested item was not found.".to_string(),
            ApiError::Http { status: 409, .. } => {
                "The item was changed or is still in use. Reload and try again.".to_string()
            }
            ApiError::Http { status, message } if *status >= 500 => {
                format!("The server failed to process the request ({status}): {message}")
            }
            ApiError::Http { message, .. } => message.clone(),
            ApiError::Timeout(message) => message.clone(),
            ApiError::Network(_) => "Unable to reach the server. Check your connection.".to_string(),
            ApiError::Parse(_) => "The server sent an unexpected response.".to_string(),
            ApiError::Config(message) | ApiError::Serialization(message) => message.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, message: &str) -> StoreError {
        StoreError::Api(ApiError::Http {
            status,
            message: message.to_string(),
        })
    }

    #[test]
    fn translates_common_statuses() {
        assert_eq!(
            user_message(&http(401, "")),
            "Your session has expired. Please sign in again."
        );
        assert_eq!(
            user_message(&http(404, "")),
            "The requested item was not found."
        );
        assert_eq!(
            user_message(&http(503, "down")),
            "The server failed to process the request (503): down"
        );
        assert_eq!(user_message(&http(422, "name is blank")), "name is blank");
    }

    #[test]
    fn missing_link_names_the_record() {
        assert_eq!(
            user_message(&StoreError::MissingLink("bus point")),
            "The bus point cannot be changed because the server did not provide its link."
        );
        assert_eq!(
            StoreError::MissingLink("carrier").to_string(),
            "carrier has no self link"
        );
    }

    #[test]
    fn api_errors_display_transparently() {
        let err = StoreError::from(ApiError::Network("refused".to_string()));
        assert_eq!(err.to_string(), "Network error: refused");
    }
}
