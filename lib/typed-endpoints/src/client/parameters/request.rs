use std::time::Duration;

use bytes::Bytes;
use headers::ContentType;
use indexmap::IndexMap;
use serde::Serialize;

use super::SearchParams;
use crate::client::ClientError;

/// A request body with its content type.
#[derive(Clone, PartialEq, derive_more::Debug)]
pub struct RequestBody {
    content_type: ContentType,
    #[debug(ignore)]
    data: Bytes,
}

impl RequestBody {
    /// Serializes `value` as a JSON body.
    pub fn json<T>(value: &T) -> Result<Self, ClientError>
    where
        T: Serialize + ?Sized,
    {
        let data = serde_json::to_vec(value)?;
        Ok(Self {
            content_type: ContentType::json(),
            data: data.into(),
        })
    }

    /// A `text/plain` body.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content_type: ContentType::text_utf8(),
            data: Bytes::from(text.into()),
        }
    }

    /// A body with an explicit content type.
    pub fn raw(content_type: ContentType, data: impl Into<Bytes>) -> Self {
        Self {
            content_type,
            data: data.into(),
        }
    }

    /// The content type sent with the body.
    pub fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// The encoded body.
    pub fn data(&self) -> &Bytes {
        &self.data
    }
}

/// Per-call options forwarded to the [`HttpBackend`](crate::HttpBackend).
///
/// Only `search_params` is examined by the dispatcher; everything else is passed
/// through untouched.
///
/// # Examples
///
/// ```rust
/// use std::time::Duration;
/// use typed_endpoints::{QueryValue, RequestOptions, SearchParams};
///
/// let options = RequestOptions::new()
///     .with_header("Authorization", "Bearer token")
///     .with_search_params(SearchParams::from_iter([("limit", QueryValue::from(20))]))
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(options.headers().get("Authorization").map(String::as_str), Some("Bearer token"));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    headers: IndexMap<String, String>,
    search_params: Option<SearchParams>,
    body: Option<RequestBody>,
    timeout: Option<Duration>,
    throw_http_errors: Option<bool>,
}

impl RequestOptions {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header, replacing a previous value with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Adds several headers.
    pub fn with_headers<K, V>(mut self, headers: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.headers.extend(
            headers
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        self
    }

    /// Sets the search parameters.
    pub fn with_search_params(mut self, search_params: impl Into<SearchParams>) -> Self {
        self.search_params = Some(search_params.into());
        self
    }

    /// Sets a JSON body.
    pub fn with_json<T>(self, value: &T) -> Result<Self, ClientError>
    where
        T: Serialize + ?Sized,
    {
        let body = RequestBody::json(value)?;
        Ok(self.with_body(body))
    }

    /// Sets the body.
    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Overrides the default timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides whether a non-success status fails the call.
    pub fn with_throw_http_errors(mut self, throw_http_errors: bool) -> Self {
        self.throw_http_errors = Some(throw_http_errors);
        self
    }

    /// The headers, in insertion order.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// The search parameters, if any.
    pub fn search_params(&self) -> Option<&SearchParams> {
        self.search_params.as_ref()
    }

    /// The body, if any.
    pub fn body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// The timeout override, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// The `throw_http_errors` override, if any.
    pub fn throw_http_errors(&self) -> Option<bool> {
        self.throw_http_errors
    }

    /// Sanitizes the search parameters, see [`SearchParams::sanitize`].
    #[must_use]
    pub fn sanitized(mut self) -> Self {
        self.search_params = self.search_params.map(SearchParams::sanitize);
        self
    }
}
