//! HTTP plumbing shared by the Calendar and Gmail clients.
//!
//! Requests are shaped through explicit [`RequestHook`]s registered on the
//! client instead of by patching the client after the fact.

use crate::config::Config;
use crate::error::{config_error, AppResult};
use reqwest::{Client, Method, RequestBuilder, Response};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Shapes every outgoing request before it is sent
pub trait RequestHook: Send + Sync {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder;
}

/// Adds a fixed header to every request
#[derive(Debug, Clone)]
pub struct HeaderHook {
    name: String,
    value: String,
}

impl HeaderHook {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl RequestHook for HeaderHook {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        request.header(self.name.as_str(), self.value.as_str())
    }
}

/// Authorized client for the Google REST APIs
#[derive(Clone)]
pub struct GoogleApiClient {
    client: Client,
    access_token: String,
    base_url: Url,
    hooks: Vec<Arc<dyn RequestHook>>,
}

impl GoogleApiClient {
    /// Create a client without hooks
    pub fn new(access_token: &str, base_url: &str, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| config_error(&format!("Invalid API base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(config_error(&format!("API base URL '{}' cannot be a base", base_url)));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| config_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            access_token: access_token.to_string(),
            base_url,
            hooks: Vec::new(),
        })
    }

    /// Create a client from configuration, registering the configured headers as hooks
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let mut api = Self::new(
            &config.google_access_token,
            &config.api_base_url,
            Duration::from_secs(config.request_timeout_secs),
        )?;

        let mut headers: Vec<_> = config.headers.iter().collect();
        headers.sort();
        for (name, value) in headers {
            api = api.with_hook(HeaderHook::new(name.as_str(), value.as_str()));
        }

        Ok(api)
    }

    /// Register a hook; hooks run in registration order after authorization
    pub fn with_hook<H: RequestHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Build an URL below the base from unencoded path segments
    pub fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Start an authorized request with all hooks applied
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request = self
            .client
            .request(method, url)
            .bearer_auth(&self.access_token);

        self.hooks
            .iter()
            .fold(request, |request, hook| hook.apply(request))
    }
}

/// Send a request and turn transport failures and non-2xx answers into errors
pub async fn send_checked<F>(request: RequestBuilder, action: &str, to_error: F) -> AppResult<Response>
where
    F: Fn(&str) -> crate::error::Error,
{
    let response = request
        .send()
        .await
        .map_err(|e| to_error(&format!("Failed to {}: {}", action, e)))?;

    if !response.status().is_success() {
        let status = response.status();
        let error_body = response
            .text()
            .await
            .unwrap_or_else(|_| "Could not read error response".to_string());
        return Err(to_error(&format!(
            "Failed to {}: HTTP {} - {}",
            action, status, error_body
        )));
    }

    Ok(response)
}
