//! HTTP client for the transit-management HAL API.
//!
//! All requests go through [`ApiClient`], which applies the user agent, the
//! request timeout and the bearer token policy of [`ResourceServer`], and maps
//! every failure into an [`ApiError`]. The client holds no per-request state and
//! is cheap to clone.

pub mod auth;
pub mod error;
pub mod hal;

pub use auth::ResourceServer;
pub use error::ApiError;
pub use hal::{
    BusPointDto, BusPointRequest, BusPointTypeDto, BusPointTypeRequest, CarrierDto,
    CarrierRequest, Link, Links, PageData, PagedCollection,
};

use reqwest::{header, Client, Method, Response};
use secrecy::SecretString;
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, info_span, Instrument};
use url::Url;

/// Default request timeout applied to every call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const ACCEPT_HAL: &str = "application/hal+json, application/json";

#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    resource_server: ResourceServer,
    access_token: Option<SecretString>,
}

impl ApiClient {
    /// Build a client for the API rooted at `base_url`.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if `base_url` is not an absolute http(s) URL or
    /// the underlying HTTP client cannot be created.
    pub fn new(
        base_url: &str,
        resource_server: ResourceServer,
        access_token: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let base_url = normalize_base_url(base_url)?;

        let http = Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            base_url,
            resource_server,
            access_token,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the API base URL.
    #[must_use]
    pub fn endpoint_url(&self, path: &str) -> String {
        build_url_with_base(&self.base_url, path)
    }

    /// GET `url` and decode the JSON body.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on network failure, non-success status or an
    /// undecodable body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        let response = self.send::<()>(Method::GET, url, None).await?;
        handle_json_response(response).await
    }

    /// POST a JSON body to `url` and decode the JSON response.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on encoding failure, network failure, non-success
    /// status or an undecodable body.
    pub async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, url, Some(body)).await?;
        handle_json_response(response).await
    }

    /// PATCH a JSON body to `url` and decode the JSON response.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on encoding failure, network failure, non-success
    /// status or an undecodable body.
    pub async fn patch_json<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::PATCH, url, Some(body)).await?;
        handle_json_response(response).await
    }

    /// DELETE `url`, ignoring any response body.
    ///
    /// # Errors
    /// Returns an [`ApiError`] on network failure or non-success status.
    pub async fn delete(&self, url: &str) -> Result<(), ApiError> {
        let response = self.send::<()>(Method::DELETE, url, None).await?;
        handle_empty_response(response).await
    }

    async fn send<B: Serialize>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let mut builder = self
            .http
            .request(method.clone(), url)
            .header(header::ACCEPT, ACCEPT_HAL);

        if let Some(token) = self
            .resource_server
            .token_for(url, self.access_token.as_ref())
        {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = body {
            let payload = serde_json::to_vec(body)
                .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))?;
            builder = builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(payload);
        }

        let span = info_span!("api.request", http.method = %method, url = %url);
        let response = builder.send().instrument(span).await?;

        debug!(status = response.status().as_u16(), "{} {}", method, url);

        Ok(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("resource_server", &self.resource_server)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

fn normalize_base_url(base_url: &str) -> Result<String, ApiError> {
    let trimmed = base_url.trim();
    let url = Url::parse(trimmed)
        .map_err(|err| ApiError::Config(format!("Invalid API URL {trimmed}: {err}")))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ApiError::Config(format!(
                "Invalid API URL {trimmed}: unsupported scheme {scheme}"
            )))
        }
    }

    if url.host().is_none() {
        return Err(ApiError::Config(format!(
            "Invalid API URL {trimmed}: no host specified"
        )));
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        serde_json::from_str(&body)
            .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
    } else {
        Err(ApiError::Http {
            status: status.as_u16(),
            message: error::sanitize_body(&body),
        })
    }
}

async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Http {
            status: status.as_u16(),
            message: error::sanitize_body(&body),
        })
    }
}
