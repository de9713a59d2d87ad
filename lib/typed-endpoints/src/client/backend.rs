use http::Method;

use super::{RequestOptions, ResponseHandle};

/// The underlying HTTP client the dispatcher delegates to.
///
/// Implement [`request`](Self::request) to plug another transport (a platform
/// shim, a recording mock, ...). The verb methods forward to it by default.
/// Retries, redirects, timeouts and status handling all belong to the backend.
///
/// # Example
///
/// ```rust
/// use http::Method;
/// use typed_endpoints::{ClientError, HttpBackend, RawResponse, RequestOptions, ResponseHandle};
///
/// struct Canned;
///
/// impl HttpBackend for Canned {
///     fn request(
///         &self,
///         _method: Method,
///         path: &str,
///         _options: Option<RequestOptions>,
///     ) -> ResponseHandle {
///         let raw = RawResponse::json(r#"{"ok":true}"#);
///         ResponseHandle::new(path, Box::pin(async move { Ok::<_, ClientError>(raw) }))
///     }
/// }
/// ```
pub trait HttpBackend: Send + Sync {
    /// Sends one request to `path` with the given options.
    fn request(&self, method: Method, path: &str, options: Option<RequestOptions>)
    -> ResponseHandle;

    /// Sends a `GET` request.
    fn get(&self, path: &str, options: Option<RequestOptions>) -> ResponseHandle {
        self.request(Method::GET, path, options)
    }

    /// Sends a `POST` request.
    fn post(&self, path: &str, options: Option<RequestOptions>) -> ResponseHandle {
        self.request(Method::POST, path, options)
    }

    /// Sends a `PUT` request.
    fn put(&self, path: &str, options: Option<RequestOptions>) -> ResponseHandle {
        self.request(Method::PUT, path, options)
    }

    /// Sends a `DELETE` request.
    fn delete(&self, path: &str, options: Option<RequestOptions>) -> ResponseHandle {
        self.request(Method::DELETE, path, options)
    }

    /// Sends a `PATCH` request.
    fn patch(&self, path: &str, options: Option<RequestOptions>) -> ResponseHandle {
        self.request(Method::PATCH, path, options)
    }
}
