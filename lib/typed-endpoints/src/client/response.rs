use std::future::{Future, IntoFuture, ready};
use std::marker::PhantomData;
use std::pin::Pin;

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;

use super::ClientError;

/// The future a backend returns for a single request.
pub type ResponseFuture = Pin<Box<dyn Future<Output = Result<RawResponse, ClientError>> + Send>>;

/// A response as produced by an [`HttpBackend`](crate::HttpBackend).
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Full response body.
    pub body: Bytes,
}

impl RawResponse {
    /// A `200 OK` response with a JSON body.
    pub fn json(body: impl Into<Bytes>) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        Self {
            status: StatusCode::OK,
            headers,
            body: body.into(),
        }
    }
}

/// Handle on a request that has been dispatched but not awaited yet.
///
/// `T` is the payload the endpoint declares, it only drives deserialization.
///
/// # Usage
///
/// - `.json().await` - wait for the response and parse its body as `T`
/// - `.await` - wait for the [`Response<T>`], then use [`Response::json`] or the raw accessors
#[derive(derive_more::Debug)]
#[must_use = "a response handle does nothing until awaited"]
pub struct ResponseHandle<T = serde_json::Value> {
    path: String,
    #[debug(skip)]
    future: ResponseFuture,
    #[debug(skip)]
    payload: PhantomData<fn() -> T>,
}

impl<T> ResponseHandle<T> {
    /// Wraps the future a backend produced for `path`.
    pub fn new(path: impl Into<String>, future: ResponseFuture) -> Self {
        Self {
            path: path.into(),
            future,
            payload: PhantomData,
        }
    }

    /// A handle resolving immediately to `error`.
    pub fn failed(path: impl Into<String>, error: ClientError) -> Self {
        Self::new(path, Box::pin(ready(Err::<RawResponse, _>(error))))
    }

    /// The path the request was sent to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Changes the expected payload type.
    pub fn typed<U>(self) -> ResponseHandle<U> {
        ResponseHandle {
            path: self.path,
            future: self.future,
            payload: PhantomData,
        }
    }
}

impl<T> ResponseHandle<T>
where
    T: DeserializeOwned + 'static,
{
    /// Waits for the response and parses its body as JSON.
    pub async fn json(self) -> Result<T, ClientError> {
        let response = self.await?;
        response.json()
    }
}

impl<T> IntoFuture for ResponseHandle<T>
where
    T: 'static,
{
    type Output = Result<Response<T>, ClientError>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        let Self { path, future, .. } = self;
        Box::pin(async move {
            let raw = future.await?;
            Ok(Response::new(path, raw))
        })
    }
}

/// A received response whose JSON body is expected to be a `T`.
#[derive(derive_more::Debug)]
pub struct Response<T = serde_json::Value> {
    path: String,
    status: StatusCode,
    headers: HeaderMap,
    #[debug(ignore)]
    body: Bytes,
    #[debug(skip)]
    payload: PhantomData<fn() -> T>,
}

impl<T> Response<T> {
    fn new(path: String, raw: RawResponse) -> Self {
        let RawResponse {
            status,
            headers,
            body,
        } = raw;
        Self {
            path,
            status,
            headers,
            body,
            payload: PhantomData,
        }
    }

    /// The path the request was sent to.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The HTTP status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The raw body.
    pub fn bytes(&self) -> &Bytes {
        &self.body
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> Result<&str, ClientError> {
        let text = std::str::from_utf8(&self.body)?;
        Ok(text)
    }
}

impl<T> Response<T>
where
    T: DeserializeOwned,
{
    /// Parses the body as JSON.
    pub fn json(&self) -> Result<T, ClientError> {
        let deserializer = &mut serde_json::Deserializer::from_slice(&self.body);
        serde_path_to_error::deserialize(deserializer).map_err(|err| ClientError::JsonError {
            path: err.path().to_string(),
            error: err.into_inner(),
            body: String::from_utf8_lossy(&self.body).into_owned(),
        })
    }
}
