use std::time::Duration;

use indexmap::IndexMap;
use url::Url;

use super::{ClientError, ParamEncoding, ParamLookup};

/// Default options applied to every call of a client.
///
/// Per-call [`RequestOptions`](crate::RequestOptions) are merged on top of them:
/// per-call headers override default headers with the same name, a per-call
/// timeout or `throw_http_errors` flag overrides the default one.
///
/// # Default Configuration
///
/// - **Prefix URL**: None (paths must then be absolute URLs)
/// - **Headers**: none
/// - **Timeout**: none
/// - **Throw on HTTP errors**: `true`
/// - **Parameter lookup**: [`ParamLookup::Present`]
/// - **Parameter encoding**: [`ParamEncoding::Raw`]
/// - **Strict paths**: `false`
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use typed_endpoints::ClientOptions;
///
/// # fn example() -> Result<(), typed_endpoints::ClientError> {
/// let options = ClientOptions::default()
///     .with_prefix_url("https://dog.ceo/api/")?
///     .with_header("Accept", "application/json")
///     .with_timeout(Duration::from_secs(10));
///
/// assert_eq!(
///     options.prefix_url().map(|url| url.as_str()),
///     Some("https://dog.ceo/api/")
/// );
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    prefix_url: Option<Url>,
    headers: IndexMap<String, String>,
    timeout: Option<Duration>,
    throw_http_errors: bool,
    param_lookup: ParamLookup,
    param_encoding: ParamEncoding,
    strict_paths: bool,
    client: Option<reqwest::Client>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            prefix_url: None,
            headers: IndexMap::new(),
            timeout: None,
            throw_http_errors: true,
            param_lookup: ParamLookup::default(),
            param_encoding: ParamEncoding::default(),
            strict_paths: false,
            client: None,
        }
    }
}

impl ClientOptions {
    /// Sets the URL every endpoint path is joined to.
    ///
    /// # Errors
    ///
    /// Fails with [`ClientError::UrlError`] if `prefix_url` is not an absolute URL.
    pub fn with_prefix_url(mut self, prefix_url: impl AsRef<str>) -> Result<Self, ClientError> {
        let url = Url::parse(prefix_url.as_ref())?;
        self.prefix_url = Some(url);
        Ok(self)
    }

    /// Adds a default header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the default timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether a non-success status fails the call, `true` by default.
    pub fn with_throw_http_errors(mut self, throw_http_errors: bool) -> Self {
        self.throw_http_errors = throw_http_errors;
        self
    }

    /// Selects how placeholders find their parameter.
    pub fn with_param_lookup(mut self, param_lookup: ParamLookup) -> Self {
        self.param_lookup = param_lookup;
        self
    }

    /// Percent-encodes path parameters so each one stays inside a single segment.
    ///
    /// Off by default: values are inserted as they are, and `a/b` spans two segments.
    pub fn with_encoded_params(mut self, encoded: bool) -> Self {
        self.param_encoding = if encoded {
            ParamEncoding::Segment
        } else {
            ParamEncoding::Raw
        };
        self
    }

    /// Fails the call instead of sending a path with unresolved placeholders.
    pub fn with_strict_paths(mut self, strict_paths: bool) -> Self {
        self.strict_paths = strict_paths;
        self
    }

    /// Uses a pre-configured `reqwest` client for the default backend.
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// The URL endpoint paths are joined to.
    pub fn prefix_url(&self) -> Option<&Url> {
        self.prefix_url.as_ref()
    }

    /// The default headers.
    pub fn headers(&self) -> &IndexMap<String, String> {
        &self.headers
    }

    /// The default timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Whether a non-success status fails the call.
    pub fn throw_http_errors(&self) -> bool {
        self.throw_http_errors
    }

    /// How placeholders find their parameter.
    pub fn param_lookup(&self) -> ParamLookup {
        self.param_lookup
    }

    /// How path parameters are written into the path.
    pub fn param_encoding(&self) -> ParamEncoding {
        self.param_encoding
    }

    /// Whether unresolved placeholders fail the call.
    pub fn strict_paths(&self) -> bool {
        self.strict_paths
    }

    /// The injected `reqwest` client, if any.
    pub fn client(&self) -> Option<&reqwest::Client> {
        self.client.as_ref()
    }
}
