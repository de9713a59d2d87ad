use std::marker::PhantomData;

use http::Method;
use serde::Serialize;
use tracing::debug;

mod backend;
pub use self::backend::HttpBackend;

mod dispatch;
pub use self::dispatch::Dispatcher;

mod endpoint;
pub use self::endpoint::{
    Delete, Endpoint, EndpointOptions, Get, Json, NoBody, NoParams, NoQuery, Patch, Post, Put, Verb,
};

mod error;
pub use self::error::ClientError;

mod options;
pub use self::options::ClientOptions;

mod parameters;
pub use self::parameters::{
    ParamEncoding, ParamLookup, PathParam, PathParams, PathTemplate, QueryValue, RenderedPath,
    RequestBody, RequestOptions, SearchParams, substitute, substitute_with,
};

mod reqwest_backend;
pub use self::reqwest_backend::ReqwestBackend;

mod response;
pub use self::response::{RawResponse, Response, ResponseFuture, ResponseHandle};

type Binding<B> =
    fn(&Dispatcher<B>, &str, Option<&PathParams>, Option<RequestOptions>) -> ResponseHandle;

/// A client bound to the endpoint map `A`.
///
/// Each typed method only accepts endpoints declaring the matching verb on `A`,
/// with their declared parameters, options and result. Calls go through a
/// [`Dispatcher`] over the backend `B`.
///
/// # Example
///
/// ```rust,no_run
/// use serde::Deserialize;
/// use typed_endpoints::{ClientOptions, TypedClient, endpoints};
///
/// #[derive(Debug, Deserialize)]
/// pub struct Images {
///     message: Vec<String>,
/// }
///
/// endpoints! {
///     pub DogsApi {
///         BreedImages = "breed/:breed/images" {
///             get { params: BreedParams, result: Images, }
///         }
///     }
/// }
///
/// #[derive(serde::Serialize)]
/// pub struct BreedParams {
///     breed: String,
/// }
///
/// # async fn example() -> Result<(), typed_endpoints::ClientError> {
/// let options = ClientOptions::default().with_prefix_url("https://dog.ceo/api")?;
/// let client = TypedClient::<DogsApi>::new(options)?;
///
/// let images = client
///     .get::<BreedImages>(BreedParams { breed: "hound".to_string() }, None)
///     .json()
///     .await?;
/// println!("{} hounds", images.message.len());
/// # Ok(())
/// # }
/// ```
#[derive(derive_more::Debug)]
pub struct TypedClient<A, B = ReqwestBackend> {
    dispatcher: Dispatcher<B>,
    #[debug(skip)]
    api: PhantomData<fn() -> A>,
}

impl<A, B> Clone for TypedClient<A, B> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
            api: PhantomData,
        }
    }
}

impl<A> TypedClient<A, ReqwestBackend> {
    /// Creates a client over the default [`ReqwestBackend`].
    ///
    /// # Errors
    ///
    /// Fails if the `reqwest` client cannot be built.
    pub fn new(options: ClientOptions) -> Result<Self, ClientError> {
        Self::with_backend(options, ReqwestBackend::create)
    }
}

impl<A, B> TypedClient<A, B>
where
    B: HttpBackend,
{
    /// Creates a client over the backend built by `create` from the default options.
    ///
    /// # Errors
    ///
    /// Forwards the error of `create`.
    pub fn with_backend<F>(options: ClientOptions, create: F) -> Result<Self, ClientError>
    where
        F: FnOnce(&ClientOptions) -> Result<B, ClientError>,
    {
        let backend = create(&options)?;
        Ok(Self {
            dispatcher: Dispatcher::new(backend, &options),
            api: PhantomData,
        })
    }

    /// The underlying client instance.
    pub fn backend(&self) -> &B {
        self.dispatcher.backend()
    }

    /// The untyped method bindings.
    pub fn dispatcher(&self) -> &Dispatcher<B> {
        &self.dispatcher
    }

    /// Sends a `GET` request to the endpoint `E`.
    pub fn get<E>(
        &self,
        params: E::Params,
        options: Option<EndpointOptions<E::Query, E::Json>>,
    ) -> ResponseHandle<E::Result>
    where
        E: Endpoint<Get, Api = A>,
    {
        self.dispatch(Get::METHOD, E::PATH, &params, options, Dispatcher::get)
    }

    /// Sends a `POST` request to the endpoint `E`.
    pub fn post<E>(
        &self,
        params: E::Params,
        options: Option<EndpointOptions<E::Query, E::Json>>,
    ) -> ResponseHandle<E::Result>
    where
        E: Endpoint<Post, Api = A>,
    {
        self.dispatch(Post::METHOD, E::PATH, &params, options, Dispatcher::post)
    }

    /// Sends a `PUT` request to the endpoint `E`.
    pub fn put<E>(
        &self,
        params: E::Params,
        options: Option<EndpointOptions<E::Query, E::Json>>,
    ) -> ResponseHandle<E::Result>
    where
        E: Endpoint<Put, Api = A>,
    {
        self.dispatch(Put::METHOD, E::PATH, &params, options, Dispatcher::put)
    }

    /// Sends a `DELETE` request to the endpoint `E`.
    pub fn delete<E>(
        &self,
        params: E::Params,
        options: Option<EndpointOptions<E::Query, E::Json>>,
    ) -> ResponseHandle<E::Result>
    where
        E: Endpoint<Delete, Api = A>,
    {
        self.dispatch(Delete::METHOD, E::PATH, &params, options, Dispatcher::delete)
    }

    /// Sends a `PATCH` request to the endpoint `E`.
    pub fn patch<E>(
        &self,
        params: E::Params,
        options: Option<EndpointOptions<E::Query, E::Json>>,
    ) -> ResponseHandle<E::Result>
    where
        E: Endpoint<Patch, Api = A>,
    {
        self.dispatch(Patch::METHOD, E::PATH, &params, options, Dispatcher::patch)
    }

    fn dispatch<P, Q, J, T>(
        &self,
        method: Method,
        path: &'static str,
        params: &P,
        options: Option<EndpointOptions<Q, J>>,
        binding: Binding<B>,
    ) -> ResponseHandle<T>
    where
        P: Serialize,
        Q: Serialize,
        J: Serialize,
    {
        debug!(%method, path, "typed call");
        let params = match PathParams::from_serialize(params) {
            Ok(params) => params,
            Err(error) => return ResponseHandle::failed(path, error),
        };
        let options = match options.map(EndpointOptions::into_request_options).transpose() {
            Ok(options) => options,
            Err(error) => return ResponseHandle::failed(path, error),
        };

        binding(&self.dispatcher, path, Some(&params), options).typed()
    }
}
