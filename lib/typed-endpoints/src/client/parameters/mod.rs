//! Runtime inputs of a call.
//!
//! - [`PathParams`] and [`PathTemplate`] - `:name` placeholder substitution
//! - [`SearchParams`] - query parameters, sanitized before dispatch
//! - [`RequestOptions`] - the per-call options bag

mod path;
pub use self::path::{
    ParamEncoding, ParamLookup, PathParam, PathParams, PathTemplate, RenderedPath, substitute,
    substitute_with,
};

mod query;
pub use self::query::{QueryValue, SearchParams};

mod request;
pub use self::request::{RequestBody, RequestOptions};
