//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::api::{CreditsApi, FunctionGroupsApi, FunctionsApi, SessionsApi};
use crate::error::{Error, Result};

/// Default server for the engine API.
pub const DEFAULT_BASE_URL: &str = "https://agentverse.ai";

/// API version prefix shared by every endpoint.
const API_PREFIX: &str = "v1beta1/";

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// AI engine API client.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```no_run
/// use aiengine_client::EngineClient;
///
/// # async fn example() -> aiengine_client::Result<()> {
/// let client = EngineClient::builder()
///     .api_key("secret")
///     .build()?;
///
/// let groups = client.function_groups().list().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EngineClient {
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
}

impl EngineClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the function groups API.
    pub fn function_groups(&self) -> FunctionGroupsApi {
        FunctionGroupsApi::new(self.clone())
    }

    /// Access the functions API.
    pub fn functions(&self) -> FunctionsApi {
        FunctionsApi::new(self.clone())
    }

    /// Access the credits and models API.
    pub fn credits(&self) -> CreditsApi {
        CreditsApi::new(self.clone())
    }

    /// Access the chat sessions API.
    pub fn sessions(&self) -> SessionsApi {
        SessionsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner
            .base_url
            .join(&format!("{}{}", API_PREFIX, path))
            .map_err(Error::from)
    }

    /// Make a GET request.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let request = self.inner.http.get(url.clone());
        let response = self.send("GET", url.path(), request).await?;
        Ok(response.json().await?)
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let request = self.inner.http.get(url.clone()).query(query);
        let response = self.send("GET", url.path(), request).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let request = self.inner.http.post(url.clone()).json(body);
        let response = self.send("POST", url.path(), request).await?;
        Ok(response.json().await?)
    }

    /// Make a POST request whose response body is not needed.
    pub(crate) async fn post_no_content<B>(&self, path: &str, body: &B) -> Result<()>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let request = self.inner.http.post(url.clone()).json(body);
        self.send("POST", url.path(), request).await?;
        Ok(())
    }

    /// Make a PUT request.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let request = self.inner.http.put(url.clone()).json(body);
        let response = self.send("PUT", url.path(), request).await?;
        Ok(response.json().await?)
    }

    /// Make a DELETE request.
    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        let url = self.url(path)?;
        let request = self.inner.http.delete(url.clone());
        self.send("DELETE", url.path(), request).await?;
        Ok(())
    }

    /// Send a request, turning any non-2xx status into an [`Error::Api`].
    async fn send(&self, method: &str, path: &str, request: RequestBuilder) -> Result<Response> {
        tracing::debug!(method, path, "Sending engine request");
        let response = request.timeout(self.inner.timeout).send().await?;

        if response.status().is_success() {
            Ok(response)
        } else {
            Err(Self::extract_error(method, path, response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(method: &str, path: &str, response: Response) -> Error {
        let status = response.status().as_u16();
        let message = match response.text().await {
            Ok(body) if !body.trim().is_empty() => body,
            _ => format!("HTTP {}", status),
        };
        tracing::debug!(method, path, status, "Engine request failed");

        Error::Api {
            method: method.to_string(),
            path: path.to_string(),
            status,
            message,
        }
    }
}

/// Builder for creating an [`EngineClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
        }
    }

    /// Set the base URL for the server (defaults to [`DEFAULT_BASE_URL`]).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key sent as a bearer token.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<EngineClient> {
        let api_key = self
            .api_key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| Error::Config("api_key is required".to_string()))?;

        // Parse and normalize base URL
        let base_url = self
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| Error::Config("Invalid API key".to_string()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("aiengine-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(EngineClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_api_key() {
        let result = ClientBuilder::new().build();
        assert!(matches!(result, Err(Error::Config(_))));

        let result = ClientBuilder::new().api_key("").build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_builder_defaults_base_url() {
        let client = ClientBuilder::new().api_key("key").build().unwrap();
        assert_eq!(client.base_url().as_str(), "https://agentverse.ai/");
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8080/")
            .api_key("key")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_builder_rejects_invalid_url() {
        let result = ClientBuilder::new()
            .base_url("not a url")
            .api_key("key")
            .build();
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_url_building() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8080")
            .api_key("key")
            .build()
            .unwrap();

        let url = client.url("function-groups/").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1beta1/function-groups/"
        );

        let url = client.url("/engine/chat/sessions").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/v1beta1/engine/chat/sessions"
        );
    }

    #[test]
    fn test_url_building_keeps_base_path() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8080/proxy")
            .api_key("key")
            .build()
            .unwrap();

        let url = client.url("functions/").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/v1beta1/functions/");
    }
}
