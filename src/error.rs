//! Error types for SAIA API calls.
//!
//! Every public operation returns either a fully decoded value or a single
//! [`Error`]. Errors keep the raw response body and status around whenever the
//! server produced one, so a failed call can be debugged from the error alone.

use http::{HeaderMap, StatusCode};

/// The phase of a call in which an [`Error`] was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Building the URL, headers or body of the request.
    BuildRequest,
    /// Sending the request and waiting for a successful status.
    SendRequest,
    /// Decoding the response body into the expected shape.
    DecodeResponse,
    /// Interpreting an already decoded response (e.g. pulling an id out of a URL).
    PostProcess,
}

/// The main error type for SAIA API calls.
///
/// # Examples
///
/// ```no_run
/// use saia::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new("my-api-key")?;
///
/// match client.persons().get(42).await {
///     Ok(person) => println!("Person {} is {} cm", person.id, person.height),
///     Err(Error::HttpError { status, raw_response, .. }) => {
///         eprintln!("HTTP error {}: {}", status, raw_response);
///     }
///     Err(Error::DeserializationFailed { raw_response, serde_error, .. }) => {
///         eprintln!("Unexpected body {}: {}", raw_response, serde_error);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A network-level error occurred (connection failed, DNS lookup failed, etc.).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// The cancellation token bound to the client fired before the call completed.
    #[error("Request cancelled")]
    Cancelled,

    /// Failed to deserialize the response body into the expected type.
    ///
    /// This covers both syntactically invalid JSON and JSON that does not
    /// match the expected shape.
    #[error("Failed to deserialize response (status {status}): {serde_error}")]
    DeserializationFailed {
        /// The raw response body that failed to deserialize
        raw_response: String,
        /// The serde error message
        serde_error: String,
        /// The HTTP status code
        status: StatusCode,
    },

    /// The server returned a non-2xx HTTP status code.
    #[error("HTTP error {status}: {raw_response}")]
    HttpError {
        /// The HTTP status code
        status: StatusCode,
        /// The raw response body
        raw_response: String,
        /// The response headers
        headers: HeaderMap,
    },

    /// A task-set URL returned by the API did not contain a task-set UUID.
    #[error("No task set id found in url: {url:?}")]
    TaskSetIdNotFound {
        /// The URL that was searched
        url: String,
    },

    /// Invalid client configuration was provided.
    ///
    /// Raised by [`Client::from_config`](crate::Client::from_config) for a
    /// missing API key, an unsupported host scheme and similar problems.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// An argument passed to an operation is out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Failed to serialize the request body.
    #[error("Failed to serialize request: {0}")]
    SerializationFailed(String),

    /// An invalid URL was provided or built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Returns the phase of the call this error belongs to.
    ///
    /// # Examples
    ///
    /// ```
    /// use saia::{Error, Stage};
    ///
    /// let err = Error::TaskSetIdNotFound { url: "https://example.com/queue/".to_string() };
    /// assert_eq!(err.stage(), Stage::PostProcess);
    /// assert_eq!(Error::Timeout.stage(), Stage::SendRequest);
    /// ```
    pub fn stage(&self) -> Stage {
        match self {
            Error::ConfigurationError(_)
            | Error::InvalidArgument(_)
            | Error::SerializationFailed(_)
            | Error::InvalidUrl(_) => Stage::BuildRequest,
            Error::Network(_) | Error::Timeout | Error::Cancelled | Error::HttpError { .. } => {
                Stage::SendRequest
            }
            Error::DeserializationFailed { .. } => Stage::DecodeResponse,
            Error::TaskSetIdNotFound { .. } => Stage::PostProcess,
        }
    }

    /// Returns the HTTP status code if this error has one.
    ///
    /// Returns `Some(status)` for `HttpError` and `DeserializationFailed` errors,
    /// `None` for other error types.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::HttpError { status, .. } => Some(*status),
            Error::DeserializationFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::HttpError { raw_response, .. } => Some(raw_response),
            Error::DeserializationFailed { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Maps a transport error, singling out timeouts.
    pub(crate) fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(error)
        }
    }
}

/// A specialized `Result` type for SAIA API calls.
pub type Result<T> = std::result::Result<T, Error>;
