use std::sync::{Arc, LazyLock};

use tracing::{debug, warn};

use super::{
    ClientError, ClientOptions, HttpBackend, ParamEncoding, ParamLookup, PathParams, PathTemplate,
    RequestOptions, ResponseHandle,
};

static NO_PARAMS: LazyLock<PathParams> = LazyLock::new(PathParams::default);

/// The untyped method bindings.
///
/// Every binding renders the endpoint path with the supplied parameters,
/// sanitizes the search parameters of the options, then delegates to the
/// matching verb of the [`HttpBackend`], exactly once.
///
/// The sanitized options are the ones forwarded to the backend: falsy entries of
/// a plain search parameter map never reach the wire.
///
/// # Example
///
/// ```rust,no_run
/// use typed_endpoints::{ClientOptions, Dispatcher, PathParams, ReqwestBackend};
///
/// # async fn example() -> Result<(), typed_endpoints::ClientError> {
/// let options = ClientOptions::default().with_prefix_url("https://dog.ceo/api")?;
/// let dispatcher = Dispatcher::new(ReqwestBackend::create(&options)?, &options);
///
/// let params = PathParams::new().with("breed", "hound");
/// let images: serde_json::Value = dispatcher
///     .get("breed/:breed/images", Some(&params), None)
///     .json()
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(derive_more::Debug)]
pub struct Dispatcher<B> {
    #[debug(skip)]
    backend: Arc<B>,
    lookup: ParamLookup,
    encoding: ParamEncoding,
    strict_paths: bool,
}

impl<B> Clone for Dispatcher<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            lookup: self.lookup,
            encoding: self.encoding,
            strict_paths: self.strict_paths,
        }
    }
}

impl<B> Dispatcher<B>
where
    B: HttpBackend,
{
    /// Binds a backend with the path policy of `options`.
    pub fn new(backend: B, options: &ClientOptions) -> Self {
        Self {
            backend: Arc::new(backend),
            lookup: options.param_lookup(),
            encoding: options.param_encoding(),
            strict_paths: options.strict_paths(),
        }
    }

    /// The underlying client.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Delegates a `GET` call to the backend, with the rendered endpoint path.
    pub fn get(
        &self,
        endpoint: &str,
        params: Option<&PathParams>,
        options: Option<RequestOptions>,
    ) -> ResponseHandle {
        match self.prepare(endpoint, params, options) {
            Ok((path, options)) => self.backend.get(&path, options),
            Err(error) => ResponseHandle::failed(endpoint, error),
        }
    }

    /// Delegates a `POST` call to the backend, with the rendered endpoint path.
    pub fn post(
        &self,
        endpoint: &str,
        params: Option<&PathParams>,
        options: Option<RequestOptions>,
    ) -> ResponseHandle {
        match self.prepare(endpoint, params, options) {
            Ok((path, options)) => self.backend.post(&path, options),
            Err(error) => ResponseHandle::failed(endpoint, error),
        }
    }

    /// Delegates a `PUT` call to the backend, with the rendered endpoint path.
    pub fn put(
        &self,
        endpoint: &str,
        params: Option<&PathParams>,
        options: Option<RequestOptions>,
    ) -> ResponseHandle {
        match self.prepare(endpoint, params, options) {
            Ok((path, options)) => self.backend.put(&path, options),
            Err(error) => ResponseHandle::failed(endpoint, error),
        }
    }

    /// Delegates a `DELETE` call to the backend, with the rendered endpoint path.
    pub fn delete(
        &self,
        endpoint: &str,
        params: Option<&PathParams>,
        options: Option<RequestOptions>,
    ) -> ResponseHandle {
        match self.prepare(endpoint, params, options) {
            Ok((path, options)) => self.backend.delete(&path, options),
            Err(error) => ResponseHandle::failed(endpoint, error),
        }
    }

    /// Delegates a `PATCH` call to the backend, with the rendered endpoint path.
    pub fn patch(
        &self,
        endpoint: &str,
        params: Option<&PathParams>,
        options: Option<RequestOptions>,
    ) -> ResponseHandle {
        match self.prepare(endpoint, params, options) {
            Ok((path, options)) => self.backend.patch(&path, options),
            Err(error) => ResponseHandle::failed(endpoint, error),
        }
    }

    fn prepare(
        &self,
        endpoint: &str,
        params: Option<&PathParams>,
        options: Option<RequestOptions>,
    ) -> Result<(String, Option<RequestOptions>), ClientError> {
        let params = params.unwrap_or(&NO_PARAMS);
        let rendered = PathTemplate::new(endpoint)
            .with_encoding(self.encoding)
            .render(params, self.lookup);

        let path = if self.strict_paths {
            rendered.into_strict()?
        } else {
            if !rendered.is_complete() {
                warn!(
                    endpoint,
                    unresolved = ?rendered.unresolved(),
                    "sending a path with unresolved placeholders"
                );
            }
            rendered.into_path()
        };
        debug!(endpoint, %path, "path resolved");

        Ok((path, options.map(RequestOptions::sanitized)))
    }
}
