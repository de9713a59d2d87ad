//! # Typed Endpoints
//!
//! Strongly-typed endpoint maps over a pluggable HTTP client.
//!
//! Describe an API once, as a set of endpoint paths and the verbs each of them
//! supports, then call it through a [`TypedClient`] that only accepts declared
//! endpoints, with their declared path parameters, query, body and result.
//!
//! The crate is a thin layer:
//! - **Path templating** - `:name` placeholders are replaced by the supplied path
//!   parameters, see [`substitute`]
//! - **Query sanitization** - falsy entries of a plain search parameter map are
//!   dropped before dispatch, see [`SearchParams::sanitize`]
//! - **Method bindings** - [`Dispatcher`] exposes `get`, `post`, `put`, `delete`
//!   and `patch`, each delegating once to the underlying [`HttpBackend`]
//!
//! Transport concerns (retries, timeouts, status handling, body encoding) belong
//! to the backend. The default one is [`ReqwestBackend`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde::{Deserialize, Serialize};
//! use typed_endpoints::{ClientOptions, EndpointOptions, TypedClient, endpoints};
//!
//! #[derive(Debug, Deserialize)]
//! pub struct Breeds {
//!     pub message: serde_json::Map<String, serde_json::Value>,
//! }
//!
//! #[derive(Debug, Serialize)]
//! pub struct Sub {
//!     pub breed: String,
//! }
//!
//! #[derive(Debug, Serialize)]
//! pub struct Page {
//!     pub limit: u32,
//!     pub cursor: Option<String>,
//! }
//!
//! endpoints! {
//!     /// The dog.ceo API.
//!     pub DogsApi {
//!         AllBreeds = "breeds/list/all" {
//!             get { query: Page, result: Breeds, }
//!         }
//!         SubBreeds = "breed/:breed/list" {
//!             get { params: Sub, }
//!         }
//!     }
//! }
//!
//! # async fn example() -> Result<(), typed_endpoints::ClientError> {
//! let client = TypedClient::<DogsApi>::new(
//!     ClientOptions::default().with_prefix_url("https://dog.ceo/api")?,
//! )?;
//!
//! // `cursor: None` is dropped from the query string
//! let options = EndpointOptions::new().with_search_params(Page { limit: 10, cursor: None });
//! let breeds = client
//!     .get::<AllBreeds>(Default::default(), Some(options))
//!     .json()
//!     .await?;
//!
//! // Untyped JSON when the endpoint declares no result
//! let hounds = client
//!     .get::<SubBreeds>(Sub { breed: "hound".to_string() }, None)
//!     .json()
//!     .await?;
//! # let _ = (breeds, hounds);
//! # Ok(())
//! # }
//! ```
//!
//! ## Compile-time checks
//!
//! Calling a verb an endpoint does not declare does not compile:
//!
//! ```rust,compile_fail
//! use typed_endpoints::{ClientOptions, TypedClient, endpoints};
//!
//! endpoints! {
//!     pub Api {
//!         Health = "health" {
//!             get {}
//!         }
//!     }
//! }
//!
//! let client = TypedClient::<Api>::new(ClientOptions::default()).unwrap();
//! let _ = client.post::<Health>(Default::default(), None);
//! ```
//!
//! Nor does calling an endpoint of another API:
//!
//! ```rust,compile_fail
//! use typed_endpoints::{ClientOptions, TypedClient, endpoints};
//!
//! endpoints! {
//!     pub Api {
//!         Health = "health" { get {} }
//!     }
//! }
//!
//! endpoints! {
//!     pub OtherApi {
//!         Status = "status" { get {} }
//!     }
//! }
//!
//! let client = TypedClient::<Api>::new(ClientOptions::default()).unwrap();
//! let _ = client.get::<Status>(Default::default(), None);
//! ```
//!
//! Nor does sending a body to an endpoint that declares none:
//!
//! ```rust,compile_fail
//! use typed_endpoints::{ClientOptions, EndpointOptions, TypedClient, endpoints};
//!
//! endpoints! {
//!     pub Api {
//!         Health = "health" { get {} }
//!     }
//! }
//!
//! let client = TypedClient::<Api>::new(ClientOptions::default()).unwrap();
//! let options = EndpointOptions::new().with_json(serde_json::json!({ "ping": true }));
//! let _ = client.get::<Health>(Default::default(), Some(options));
//! ```
//!
//! Nor does passing a query to an endpoint that declares none:
//!
//! ```rust,compile_fail
//! use typed_endpoints::{ClientOptions, EndpointOptions, TypedClient, endpoints};
//!
//! endpoints! {
//!     pub Api {
//!         Health = "health" { get {} }
//!     }
//! }
//!
//! let client = TypedClient::<Api>::new(ClientOptions::default()).unwrap();
//! let options = EndpointOptions::new().with_search_params([("verbose", "1")]);
//! let _ = client.get::<Health>(Default::default(), Some(options));
//! ```

mod client;

pub use self::client::{
    ClientError, ClientOptions, Delete, Dispatcher, Endpoint, EndpointOptions, Get, HttpBackend,
    Json, NoBody, NoParams, NoQuery, ParamEncoding, ParamLookup, Patch, PathParam, PathParams,
    PathTemplate, Post, Put, QueryValue, RawResponse, RenderedPath, RequestBody, RequestOptions,
    ReqwestBackend, Response, ResponseFuture, ResponseHandle, SearchParams, TypedClient, Verb,
    substitute, substitute_with,
};

/// Declares an endpoint map and the endpoints it contains.
///
/// The macro generates a marker type for the API and one marker type per
/// endpoint path, implementing [`Endpoint`] for every declared verb.
///
/// # Syntax
///
/// ```text
/// endpoints! {
///     <vis> ApiName {
///         EndpointName = "path/:param" {
///             <verb> { params: Type, query: Type, json: Type, result: Type, }
///             ...
///         }
///         ...
///     }
/// }
/// ```
///
/// - `<verb>` is one of `get`, `post`, `put`, `delete`, `patch`
/// - every field is optional but must follow this order
/// - `params` defaults to [`NoParams`], `query` to [`NoQuery`], `json` to
///   [`NoBody`] and `result` to [`Json`]
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use typed_endpoints::{Endpoint, Get, NoQuery, Post, endpoints};
///
/// #[derive(Serialize)]
/// pub struct UserId {
///     pub id: u64,
/// }
///
/// #[derive(Serialize)]
/// pub struct NewComment {
///     pub text: String,
/// }
///
/// #[derive(Deserialize)]
/// pub struct Comment {
///     pub id: u64,
///     pub text: String,
/// }
///
/// endpoints! {
///     pub BlogApi {
///         UserComments = "user/:id/comments" {
///             get { params: UserId, result: Vec<Comment>, }
///             post { params: UserId, json: NewComment, result: Comment, }
///         }
///     }
/// }
///
/// assert_eq!(<UserComments as Endpoint<Get>>::PATH, "user/:id/comments");
/// fn no_query<E: Endpoint<Post, Query = NoQuery>>() {}
/// no_query::<UserComments>();
/// ```
#[macro_export]
macro_rules! endpoints {
    (
        $(#[$api_meta:meta])*
        $api_vis:vis $api:ident {
            $(
                $(#[$meta:meta])*
                $name:ident = $path:literal {
                    $(
                        $verb:ident {
                            $(params: $params:ty,)?
                            $(query: $query:ty,)?
                            $(json: $json:ty,)?
                            $(result: $result:ty,)?
                        }
                    )+
                }
            )*
        }
    ) => {
        $(#[$api_meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
        $api_vis struct $api;

        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
            $api_vis struct $name;

            $(
                impl $crate::Endpoint<$crate::__verb!($verb)> for $name {
                    type Api = $api;
                    const PATH: &'static str = $path;
                    type Params = $crate::__or_default!($($params)? ; $crate::NoParams);
                    type Query = $crate::__or_default!($($query)? ; $crate::NoQuery);
                    type Json = $crate::__or_default!($($json)? ; $crate::NoBody);
                    type Result = $crate::__or_default!($($result)? ; $crate::Json);
                }
            )+
        )*
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __or_default {
    (; $default:ty) => {
        $default
    };
    ($ty:ty ; $default:ty) => {
        $ty
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __verb {
    (get) => {
        $crate::Get
    };
    (post) => {
        $crate::Post
    };
    (put) => {
        $crate::Put
    };
    (delete) => {
        $crate::Delete
    };
    (patch) => {
        $crate::Patch
    };
}
