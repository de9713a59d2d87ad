use std::fmt::Display;

/// Errors that can occur when dispatching through a typed client.
///
/// Transport, URL and decoding failures are forwarded as-is from the crates that
/// produce them. The struct variants describe failures detected by this crate
/// while preparing a request or reading its response.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ClientError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs when network requests fail, timeouts occur, or connection issues arise.
    ReqwestError(reqwest::Error),

    /// URL parsing error when constructing request URLs.
    ///
    /// Occurs when the prefix URL or the rendered path do not form a valid URL.
    UrlError(url::ParseError),

    /// Invalid HTTP header name.
    InvalidHeaderName(http::header::InvalidHeaderName),

    /// Invalid HTTP header value.
    InvalidHeaderValue(http::header::InvalidHeaderValue),

    /// JSON serialization error.
    ///
    /// Occurs when request parameters or bodies cannot be converted to JSON.
    JsonValueError(serde_json::Error),

    /// Query parameter serialization error.
    QuerySerializationError(serde_urlencoded::ser::Error),

    /// The response body is not valid UTF-8.
    Utf8Error(std::str::Utf8Error),

    /// JSON response deserialization failure.
    ///
    /// Occurs when the response body cannot be parsed as the expected JSON structure.
    #[display("Failed to deserialize JSON at '{path}': {error}\n{body}")]
    #[from(skip)]
    JsonError {
        /// The JSON path where deserialization stopped.
        path: String,
        /// The underlying JSON parsing error.
        error: serde_json::Error,
        /// The response body that failed to parse.
        body: String,
    },

    /// Path template contains unresolved placeholders.
    ///
    /// Only raised when strict paths are enabled, lenient rendering leaves the
    /// placeholders in the path.
    #[display("Path '{path}' is missing required arguments: {missings:?}")]
    #[from(skip)]
    PathUnresolved {
        /// The path as far as it could be rendered.
        path: String,
        /// List of missing parameter names.
        missings: Vec<String>,
    },

    /// Query parameter value type is not supported.
    ///
    /// Occurs when attempting to use arrays or objects as query parameter values.
    #[display(
        "Unsupported query parameter value: only scalars are supported for query parameters. Got: {value}"
    )]
    #[from(skip)]
    UnsupportedQueryParameterValue {
        /// The unsupported value that was provided.
        value: serde_json::Value,
    },

    /// Path parameter value cannot be used in a path.
    #[display("Unsupported parameter value: {message}. Got: {value}")]
    #[from(skip)]
    UnsupportedParameterValue {
        /// Specific error message describing the conversion failure.
        message: String,
        /// The value that failed to convert.
        value: serde_json::Value,
    },

    /// Server returned a non-success HTTP status code.
    ///
    /// Raised by [`ReqwestBackend`](crate::ReqwestBackend) unless
    /// `throw_http_errors` is disabled.
    #[display("Unexpected status code {status_code}: {body}")]
    #[from(skip)]
    UnexpectedStatusCode {
        /// The HTTP status code received.
        status_code: u16,
        /// The response body for debugging.
        body: String,
    },

    /// Failure reported by a custom [`HttpBackend`](crate::HttpBackend).
    #[display("Backend failure: {message}")]
    #[from(skip)]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

impl ClientError {
    /// Wraps any displayable error coming from a custom backend.
    pub fn backend(error: impl Display) -> Self {
        Self::Backend {
            message: error.to_string(),
        }
    }
}
