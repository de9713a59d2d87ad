//! The compile-time description of an API.
//!
//! An API is a set of endpoint paths, each supporting some HTTP verbs. For every
//! supported verb an endpoint declares its path parameters, its query
//! parameters, its JSON body and its result, see [`Endpoint`]. The
//! [`endpoints!`](crate::endpoints) macro writes these declarations.

use std::time::Duration;

use http::Method;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};

use super::{ClientError, RequestBody, RequestOptions, SearchParams};

/// Untyped JSON, the default result of an endpoint.
pub type Json = serde_json::Value;

mod sealed {
    pub trait Sealed {}
}

/// An HTTP verb supported by the typed client.
pub trait Verb: sealed::Sealed {
    /// The matching HTTP method.
    const METHOD: Method;
}

macro_rules! verbs {
    ($($(#[$meta:meta])* $name:ident => $method:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            pub struct $name;

            impl sealed::Sealed for $name {}

            impl Verb for $name {
                const METHOD: Method = Method::$method;
            }
        )*
    };
}

verbs! {
    /// `GET`
    Get => GET,
    /// `POST`
    Post => POST,
    /// `PUT`
    Put => PUT,
    /// `DELETE`
    Delete => DELETE,
    /// `PATCH`
    Patch => PATCH,
}

/// One verb of one endpoint path of the API `Api`.
///
/// Implementing `Endpoint<Get>` for a marker type declares that `GET` is
/// supported on [`PATH`](Self::PATH). Calling a verb that is not implemented, or
/// an endpoint of another API, does not compile.
pub trait Endpoint<V: Verb> {
    /// The API the endpoint belongs to.
    type Api;

    /// The endpoint path, with `:name` placeholders.
    const PATH: &'static str;

    /// Values for the path placeholders, [`NoParams`] when there are none.
    type Params: Serialize;

    /// Search parameters, [`NoQuery`] when not accepted.
    type Query: Serialize;

    /// JSON body, [`NoBody`] when not accepted.
    type Json: Serialize;

    /// Payload of the response.
    type Result: DeserializeOwned;
}

/// Path parameters of an endpoint without placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct NoParams;

/// Query of an endpoint that does not accept search parameters.
///
/// It has no value, so `search_params` can only be left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoQuery {}

impl Serialize for NoQuery {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {}
    }
}

/// Body of an endpoint that does not accept a JSON body.
///
/// It has no value, so `json` can only be left unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoBody {}

impl Serialize for NoBody {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match *self {}
    }
}

/// Per-call options of a typed call.
///
/// `Q` and `J` are the query and body types declared by the endpoint.
///
/// # Example
///
/// ```rust
/// use serde::Serialize;
/// use typed_endpoints::{EndpointOptions, NoBody};
///
/// #[derive(Serialize)]
/// struct Page {
///     limit: u32,
///     cursor: Option<String>,
/// }
///
/// let options: EndpointOptions<Page, NoBody> = EndpointOptions::new()
///     .with_header("Accept", "application/json")
///     .with_search_params(Page { limit: 20, cursor: None });
/// ```
#[derive(Debug, Clone)]
pub struct EndpointOptions<Q = NoQuery, J = NoBody> {
    headers: IndexMap<String, String>,
    search_params: Option<Q>,
    json: Option<J>,
    timeout: Option<Duration>,
    throw_http_errors: Option<bool>,
}

impl<Q, J> Default for EndpointOptions<Q, J> {
    fn default() -> Self {
        Self {
            headers: IndexMap::new(),
            search_params: None,
            json: None,
            timeout: None,
            throw_http_errors: None,
        }
    }
}

impl<Q, J> EndpointOptions<Q, J> {
    /// Empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Sets the search parameters.
    pub fn with_search_params(mut self, search_params: Q) -> Self {
        self.search_params = Some(search_params);
        self
    }

    /// Sets the JSON body.
    pub fn with_json(mut self, json: J) -> Self {
        self.json = Some(json);
        self
    }

    /// Overrides the default timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides whether a non-success status fails the call.
    pub fn with_throw_http_errors(mut self, throw_http_errors: bool) -> Self {
        self.throw_http_errors = Some(throw_http_errors);
        self
    }
}

impl<Q, J> EndpointOptions<Q, J>
where
    Q: Serialize,
    J: Serialize,
{
    /// Converts to the untyped options the dispatcher works with.
    ///
    /// # Errors
    ///
    /// Fails if the search parameters are not a flat object of scalars, or if
    /// the body cannot be serialized.
    pub fn into_request_options(self) -> Result<RequestOptions, ClientError> {
        let Self {
            headers,
            search_params,
            json,
            timeout,
            throw_http_errors,
        } = self;

        let mut options = RequestOptions::new().with_headers(headers);
        if let Some(search_params) = search_params {
            options = options.with_search_params(SearchParams::from_serialize(&search_params)?);
        }
        if let Some(json) = json {
            options = options.with_body(RequestBody::json(&json)?);
        }
        if let Some(timeout) = timeout {
            options = options.with_timeout(timeout);
        }
        if let Some(throw_http_errors) = throw_http_errors {
            options = options.with_throw_http_errors(throw_http_errors);
        }
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use headers::ContentType;
    use serde::Serialize;

    use super::*;
    use crate::QueryValue;

    #[derive(Debug, Serialize)]
    struct Dog {
        name: String,
    }

    #[derive(Debug, Serialize)]
    struct Filter {
        breed: Option<String>,
        limit: u32,
    }

    #[test]
    fn should_expose_verb_methods() {
        assert_eq!(Get::METHOD, Method::GET);
        assert_eq!(Post::METHOD, Method::POST);
        assert_eq!(Put::METHOD, Method::PUT);
        assert_eq!(Delete::METHOD, Method::DELETE);
        assert_eq!(Patch::METHOD, Method::PATCH);
    }

    #[test]
    fn should_convert_empty_options() {
        let options = EndpointOptions::<NoQuery, NoBody>::new()
            .into_request_options()
            .expect("no payload");

        assert_eq!(options, RequestOptions::new());
    }

    #[test]
    fn should_convert_typed_options() {
        let options = EndpointOptions::<Filter, Dog>::new()
            .with_header("x-trace", "1")
            .with_search_params(Filter {
                breed: None,
                limit: 20,
            })
            .with_json(Dog {
                name: "Rex".to_string(),
            })
            .with_timeout(Duration::from_secs(2))
            .with_throw_http_errors(false)
            .into_request_options()
            .expect("valid payload");

        assert_eq!(
            options.headers().get("x-trace").map(String::as_str),
            Some("1")
        );
        assert_eq!(
            options.search_params(),
            Some(&SearchParams::from_iter([
                ("breed", QueryValue::Null),
                ("limit", QueryValue::from(20)),
            ]))
        );
        let body = options.body().expect("a body");
        assert_eq!(body.content_type(), &ContentType::json());
        insta::assert_snapshot!(String::from_utf8_lossy(body.data()), @r#"{"name":"Rex"}"#);
        assert_eq!(options.timeout(), Some(Duration::from_secs(2)));
        assert_eq!(options.throw_http_errors(), Some(false));
    }

    #[test]
    fn should_serialize_no_params_as_unit() {
        let value = serde_json::to_value(NoParams).expect("serializable");

        assert_eq!(value, serde_json::Value::Null);
    }
}
