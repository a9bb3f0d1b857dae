//! Runtime configuration shared by every CLI action.
//!
//! `GlobalArgs` is built once from the parsed command line and knows how to
//! turn itself into the API client and retry policy the stores need.

use crate::api::{ApiClient, ApiError, ResourceServer};
use crate::store::RetryPolicy;
use secrecy::SecretString;
use std::time::Duration;

#[derive(Clone)]
pub struct GlobalArgs {
    /// Base URL of the transit-management API.
    pub api_url: String,
    /// Bearer token presented to allowed URLs.
    pub access_token: Option<SecretString>,
    /// URL prefixes that may receive the token. Empty means the API URL only.
    pub allowed_urls: Vec<String>,
    pub send_access_token: bool,
    pub retry_attempts: u32,
    pub retry_backoff: Duration,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String) -> Self {
        Self {
            api_url,
            access_token: None,
            allowed_urls: Vec::new(),
            send_access_token: true,
            retry_attempts: crate::store::retry::DEFAULT_MAX_ATTEMPTS,
            retry_backoff: crate::store::retry::DEFAULT_BACKOFF_BASE,
            timeout: crate::api::DEFAULT_TIMEOUT,
        }
    }

    pub fn set_token(&mut self, token: SecretString) {
        self.access_token = Some(token);
    }

    #[must_use]
    pub fn resource_server(&self) -> ResourceServer {
        if self.allowed_urls.is_empty() {
            ResourceServer::new([self.api_url.as_str()], self.send_access_token)
        } else {
            ResourceServer::new(&self.allowed_urls, self.send_access_token)
        }
    }

    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.retry_attempts, self.retry_backoff)
    }

    /// # Errors
    /// Returns [`ApiError::Config`] if the API URL is invalid.
    pub fn api_client(&self) -> Result<ApiClient, ApiError> {
        ApiClient::new(
            &self.api_url,
            self.resource_server(),
            self.access_token.clone(),
            self.timeout,
        )
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("api_url", &self.api_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("allowed_urls", &self.allowed_urls)
            .field("send_access_token", &self.send_access_token)
            .field("retry_attempts", &self.retry_attempts)
            .field("retry_backoff", &self.retry_backoff)
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_global_args_defaults() {
        let args = GlobalArgs::new("http://127.0.0.1:8080/api".to_string());
        assert!(args.access_token.is_none());
        assert!(args.send_access_token);
        assert_eq!(args.retry_policy().max_attempts(), 3);
        assert_eq!(
            args.resource_server().allowed_urls(),
            ["http://127.0.0.1:8080/api".to_string()]
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut args = GlobalArgs::new("http://127.0.0.1:8080/api".to_string());
        args.set_token(SecretString::from("super-secret".to_string()));
        let debug = format!("{args:?}");
        assert!(debug.contains("***"));
        assert!(!debug.contains("super-secret"));
    }

    #[test]
    fn test_explicit_allow_list_replaces_api_url() {
        let mut args = GlobalArgs::new("http://127.0.0.1:8080/api".to_string());
        args.allowed_urls = vec!["https://Transit.example.com/".to_string()];
        let server = args.resource_server();
        assert!(server.allows("https://transit.example.com/busPoints"));
        assert!(!server.allows("http://127.0.0.1:8080/api/busPoints"));
    }

    #[test]
    fn test_api_client_rejects_bad_url() {
        let args = GlobalArgs::new("ftp://example.com".to_string());
        assert!(args.api_client().is_err());
    }
}
