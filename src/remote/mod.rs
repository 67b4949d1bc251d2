//! Marketplace API access.
//!
//! This module provides the [`ListSource`] seam the list controller fetches
//! through, and an HTTP implementation of it for the marketplace list
//! endpoints.

pub mod error;
pub mod resources;

use std::future::Future;

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::config::Config;
use crate::error::{Result, StorefrontError};
use crate::list::ListPage;
use crate::query::ListQuery;

pub use error::ApiError;
pub use resources::{QueryParams, Resource, ResourceSource};

/// Common interface for anything a list can be fetched from
pub trait ListSource: Send + Sync + 'static {
    type Item: Send + 'static;

    /// Fetch one page for `query`.
    ///
    /// Implementations should stop work and return
    /// [`StorefrontError::Cancelled`] once `cancel` fires.
    fn fetch_page(
        &self,
        query: &ListQuery,
        cancel: &CancellationToken,
    ) -> impl Future<Output = Result<ListPage<Self::Item>>> + Send;
}

/// HTTP client for the marketplace REST API.
///
/// Responses are wrapped as `{ "data": { <field>: [...] } }`.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| StorefrontError::InvalidUrl(base_url.to_string(), e.to_string()))?;
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            token: None,
        })
    }

    /// Create a client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = config.api_base_url().ok_or_else(|| {
            StorefrontError::Config(
                "API base URL not configured. Set STOREFRONT_API_URL or run: storefront config set api_base_url <url>".to_string(),
            )
        })?;

        let client = Self::new(&base_url)?;
        Ok(match config.api_token() {
            Some(token) => client.with_token(token),
            None => client,
        })
    }

    pub fn with_token(mut self, token: SecretString) -> Self {
        self.token = Some(token);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn endpoint_url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| StorefrontError::InvalidUrl(path.to_string(), e.to_string()))
    }

    /// GET a list endpoint and decode the array under `data.<field>`.
    ///
    /// The request races `cancel`; a cancelled request yields
    /// [`StorefrontError::Cancelled`].
    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
        field: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<T>> {
        let url = self.endpoint_url(path)?;
        let mut request = self.http.get(url).query(params);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let send = async {
            let response = request.send().await?;
            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ApiError::from_response(status, &body).into());
            }
            Ok::<Value, StorefrontError>(response.json::<Value>().await?)
        };

        let body = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(StorefrontError::Cancelled),
            body = send => body?,
        };

        extract_items(body, field)
    }
}

/// Pull the item array out of a response envelope.
///
/// A `null` array is treated as empty; a missing one is a shape error.
pub fn extract_items<T: DeserializeOwned>(mut body: Value, field: &str) -> Result<Vec<T>> {
    let data = body
        .get_mut("data")
        .ok_or_else(|| StorefrontError::ResponseShape("missing 'data' object".to_string()))?;

    let items = match data.get_mut(field).map(Value::take) {
        Some(Value::Null) => return Ok(Vec::new()),
        Some(items @ Value::Array(_)) => items,
        Some(other) => {
            return Err(StorefrontError::ResponseShape(format!(
                "'data.{field}' is not an array (found {})",
                json_kind(&other)
            )));
        }
        None => {
            return Err(StorefrontError::ResponseShape(format!(
                "missing 'data.{field}' array"
            )));
        }
    };

    Ok(serde_json::from_value(items)?)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
