//! Client configuration and the shared transport adapter.
//!
//! The [`Client`] type is the main entry point. It owns the immutable
//! configuration (API host, API key, HTTP connection pool) and hands out the
//! resource APIs through [`Client::persons`], [`Client::measurements`] and
//! [`Client::queue`].

use crate::{
    measurement_api::MeasurementApi, metadata::RequestMetadata, person_api::PersonApi,
    queue::QueueApi, Error, Result,
};
use http::{header, HeaderValue};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// Production API host used when none is configured.
pub const DEFAULT_API_HOST: &str = "https://saia.3dlook.me/api/v2";

/// Configuration used to construct a [`Client`].
///
/// All fields have defaults except `api_key`, which must be set.
///
/// # Examples
///
/// ```no_run
/// use saia::{Client, ClientConfig};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), saia::Error> {
/// let client = Client::from_config(ClientConfig {
///     api_key: "my-api-key".to_string(),
///     timeout: Some(Duration::from_secs(30)),
///     ..ClientConfig::default()
/// })?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API key sent as `Authorization: APIKey <key>` on every request.
    pub api_key: String,

    /// Base URL of the API, e.g. `https://saia.3dlook.me/api/v2`.
    pub api_host: String,

    /// HTTP client to send requests with. A new pooled client is created when `None`.
    pub http_client: Option<reqwest::Client>,

    /// Deadline applied to each individual request.
    pub timeout: Option<Duration>,

    /// Log request and response bodies at `debug` level. Meant for development only.
    pub debug: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_host: DEFAULT_API_HOST.to_string(),
            http_client: None,
            timeout: None,
            debug: false,
        }
    }
}

/// A client for the SAIA body-measurement API.
///
/// The client is cheap to clone and safe to share between tasks: every clone
/// refers to the same immutable configuration and connection pool.
///
/// # Examples
///
/// ```no_run
/// use saia::{Client, CreatePersonParams, Gender};
///
/// # async fn example() -> Result<(), saia::Error> {
/// let client = Client::builder()
///     .api_key("my-api-key")
///     .build()?;
///
/// let created = client
///     .persons()
///     .create(&CreatePersonParams {
///         gender: Gender::Female,
///         height: 170,
///         weight: 70.1,
///     })
///     .await?;
/// println!("Created person {}", created.id);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
    cancellation: Option<CancellationToken>,
}

struct ClientInner {
    http_client: reqwest::Client,
    api_host: String,
    authorization: HeaderValue,
    timeout: Option<Duration>,
    debug: bool,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("api_host", &self.inner.api_host)
            .field("timeout", &self.inner.timeout)
            .field("debug", &self.inner.debug)
            .field("cancellable", &self.cancellation.is_some())
            .finish()
    }
}

impl Client {
    /// Creates a client for the production host with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is empty or not a valid header value.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig {
            api_key: api_key.into(),
            ..ClientConfig::default()
        })
    }

    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Validates `config` and creates a client from it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigurationError`] if the API key is missing or
    /// malformed, or the host is not an absolute `http`/`https` URL, and
    /// [`Error::InvalidUrl`] if the host cannot be parsed at all.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        let api_key = config.api_key.trim();
        if api_key.is_empty() {
            return Err(Error::ConfigurationError("API key is required".to_string()));
        }
        let mut authorization = HeaderValue::try_from(format!("APIKey {}", api_key))
            .map_err(|e| Error::ConfigurationError(format!("Invalid API key: {}", e)))?;
        authorization.set_sensitive(true);

        let host = Url::parse(config.api_host.trim())?;
        if !matches!(host.scheme(), "http" | "https") || host.cannot_be_a_base() {
            return Err(Error::ConfigurationError(format!(
                "API host must be an http(s) URL, got {}",
                config.api_host
            )));
        }
        if host.query().is_some() || host.fragment().is_some() {
            return Err(Error::ConfigurationError(format!(
                "API host must not carry a query or fragment, got {}",
                config.api_host
            )));
        }

        let http_client = match config.http_client {
            Some(client) => client,
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::ConfigurationError(format!("Failed to build HTTP client: {}", e))
            })?,
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                api_host: host.as_str().trim_end_matches('/').to_string(),
                authorization,
                timeout: config.timeout,
                debug: config.debug,
            }),
            cancellation: None,
        })
    }

    /// Returns a clone of this client whose calls fail with [`Error::Cancelled`]
    /// as soon as `token` is cancelled.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use saia::{CancellationToken, Client};
    ///
    /// # async fn example() -> Result<(), saia::Error> {
    /// let client = Client::new("my-api-key")?;
    /// let token = CancellationToken::new();
    ///
    /// let scoped = client.with_cancellation(token.clone());
    /// tokio::spawn(async move {
    ///     tokio::time::sleep(std::time::Duration::from_secs(5)).await;
    ///     token.cancel();
    /// });
    ///
    /// let person = scoped.persons().get(1).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Client {
            inner: Arc::clone(&self.inner),
            cancellation: Some(token),
        }
    }

    /// The normalized API host, without a trailing slash.
    pub fn api_host(&self) -> &str {
        &self.inner.api_host
    }

    /// Person lifecycle operations.
    pub fn persons(&self) -> PersonApi<'_> {
        PersonApi::new(self)
    }

    /// Measurement retrieval operations.
    pub fn measurements(&self) -> MeasurementApi<'_> {
        MeasurementApi::new(self)
    }

    /// Task-set polling.
    pub fn queue(&self) -> QueueApi<'_> {
        QueueApi::new(self)
    }

    /// Makes a typed request, honoring the bound cancellation token.
    pub(crate) async fn call<Req, Res>(
        &self,
        metadata: RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let Some(token) = &self.cancellation else {
            return self.call_once(&metadata, body).await;
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => {
                tracing::warn!(
                    method = %metadata.method,
                    path = %metadata.path,
                    "Request cancelled"
                );
                Err(Error::Cancelled)
            }
            result = self.call_once(&metadata, body) => result,
        }
    }

    async fn call_once<Req, Res>(
        &self,
        metadata: &RequestMetadata,
        body: Option<&Req>,
    ) -> Result<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let start_time = Instant::now();
        let response = self.execute_request(metadata, body).await?;
        let result = self.parse_response(response, start_time.elapsed()).await;

        if let Err(e) = &result {
            tracing::warn!(
                error = %e,
                method = %metadata.method,
                path = %metadata.path,
                "Request failed"
            );
        }
        result
    }

    /// Builds the absolute URL for `metadata` against the configured host.
    pub(crate) fn build_url(&self, metadata: &RequestMetadata) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{}", self.inner.api_host, metadata.path))?;

        for (key, value) in &metadata.query_params {
            url.query_pairs_mut().append_pair(key, value);
        }

        Ok(url)
    }

    /// Sends a single request.
    async fn execute_request<Req>(
        &self,
        metadata: &RequestMetadata,
        body: Option<&Req>,
    ) -> Result<reqwest::Response>
    where
        Req: Serialize,
    {
        let url = self.build_url(metadata)?;

        tracing::debug!(
            method = %metadata.method,
            url = %url,
            "Executing HTTP request"
        );

        let mut request = self
            .inner
            .http_client
            .request(metadata.method.clone(), url)
            .header(header::AUTHORIZATION, self.inner.authorization.clone())
            .header(header::CONTENT_TYPE, "application/json");

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            let json =
                serde_json::to_vec(body).map_err(|e| Error::SerializationFailed(e.to_string()))?;
            if self.inner.debug {
                tracing::debug!(body_len = json.len(), "Request body encoded");
            }
            request = request.body(json);
        }

        request.send().await.map_err(Error::from_transport)
    }

    /// Checks the status and decodes the body of a response.
    async fn parse_response<Res>(&self, response: reqwest::Response, latency: Duration) -> Result<Res>
    where
        Res: DeserializeOwned,
    {
        let status = response.status();
        let headers = response.headers().clone();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        if !status.is_success() {
            let raw_response = response.text().await.unwrap_or_default();

            if status.is_server_error() {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Server error (5xx)"
                );
            } else {
                tracing::error!(
                    status = status.as_u16(),
                    response = %raw_response,
                    "Unsuccessful status"
                );
            }

            return Err(Error::HttpError {
                status,
                raw_response,
                headers,
            });
        }

        let raw_body = response.text().await.map_err(Error::from_transport)?;

        if self.inner.debug {
            tracing::debug!(body = %raw_body, "Response body");
        }

        serde_json::from_str::<Res>(&raw_body).map_err(|e| {
            tracing::error!(
                error = %e,
                raw_response = %raw_body,
                "Failed to deserialize response"
            );

            Error::DeserializationFailed {
                raw_response: raw_body,
                serde_error: e.to_string(),
                status,
            }
        })
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use saia::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), saia::Error> {
/// let client = ClientBuilder::new()
///     .api_key("my-api-key")
///     .api_host("https://saia.3dlook.me/api/v2")
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = api_key.into();
        self
    }

    /// Sets the API host base URL.
    pub fn api_host(mut self, api_host: impl Into<String>) -> Self {
        self.config.api_host = api_host.into();
        self
    }

    /// Uses an existing `reqwest::Client`, sharing its connection pool.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.config.http_client = Some(http_client);
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Enables verbose body logging.
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Returns the configuration collected so far.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// See [`Client::from_config`].
    pub fn build(self) -> Result<Client> {
        Client::from_config(self.config)
    }
}
