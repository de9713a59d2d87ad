use std::time::Duration;

use headers::HeaderMapExt;
use http::header::{HeaderName, HeaderValue};
use http::Method;
use indexmap::IndexMap;
use reqwest::{Body, Request};
use tracing::debug;
use url::Url;

use super::{ClientError, ClientOptions, HttpBackend, RawResponse, RequestOptions, ResponseHandle};

const BODY_MAX_LENGTH: usize = 1024;

/// The default [`HttpBackend`], sending requests with [`reqwest`].
///
/// Paths are joined to the configured prefix URL. Without a prefix URL, the
/// path must be an absolute URL.
///
/// A response whose status is not a success fails with
/// [`ClientError::UnexpectedStatusCode`], unless `throw_http_errors` is
/// disabled in the default or per-call options.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
    prefix_url: Option<Url>,
    headers: IndexMap<String, String>,
    timeout: Option<Duration>,
    throw_http_errors: bool,
}

impl ReqwestBackend {
    /// Creates the backend from the default client options.
    ///
    /// # Errors
    ///
    /// Fails if the default `reqwest` client cannot be built.
    pub fn create(options: &ClientOptions) -> Result<Self, ClientError> {
        let client = match options.client() {
            Some(client) => client.clone(),
            None => reqwest::Client::builder().build()?,
        };

        Ok(Self {
            client,
            prefix_url: options.prefix_url().cloned(),
            headers: options.headers().clone(),
            timeout: options.timeout(),
            throw_http_errors: options.throw_http_errors(),
        })
    }

    /// The wrapped `reqwest` client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn build_url(&self, path: &str, options: Option<&RequestOptions>) -> Result<Url, ClientError> {
        let mut url = match &self.prefix_url {
            Some(prefix_url) => {
                let url = format!(
                    "{}/{}",
                    prefix_url.as_str().trim_end_matches('/'),
                    path.trim_start_matches('/')
                );
                url.parse::<Url>()?
            }
            None => path.parse::<Url>()?,
        };

        if let Some(search_params) = options.and_then(RequestOptions::search_params) {
            let query_string = search_params.to_query_string()?;
            if !query_string.is_empty() {
                url.set_query(Some(&query_string));
            }
        }

        Ok(url)
    }

    fn build_request(
        &self,
        method: Method,
        url: Url,
        options: Option<&RequestOptions>,
    ) -> Result<Request, ClientError> {
        let mut request = Request::new(method, url);
        let req_headers = request.headers_mut();

        // Default headers first, per-call headers override them
        let call_headers = options.into_iter().flat_map(|options| options.headers());
        for (name, value) in self.headers.iter().chain(call_headers) {
            req_headers.insert(
                HeaderName::from_bytes(name.as_bytes())?,
                HeaderValue::from_str(value)?,
            );
        }

        if let Some(body) = options.and_then(RequestOptions::body) {
            req_headers.typed_insert(body.content_type().clone());
            let req_body = request.body_mut();
            *req_body = Some(Body::from(body.data().clone()));
        }

        let timeout = options.and_then(RequestOptions::timeout).or(self.timeout);
        *request.timeout_mut() = timeout;

        Ok(request)
    }

    fn throw_http_errors(&self, options: Option<&RequestOptions>) -> bool {
        options
            .and_then(RequestOptions::throw_http_errors)
            .unwrap_or(self.throw_http_errors)
    }
}

impl HttpBackend for ReqwestBackend {
    fn request(
        &self,
        method: Method,
        path: &str,
        options: Option<RequestOptions>,
    ) -> ResponseHandle {
        let options = options.as_ref();
        let request = match self
            .build_url(path, options)
            .and_then(|url| self.build_request(method, url, options))
        {
            Ok(request) => request,
            Err(error) => return ResponseHandle::failed(path, error),
        };
        let throw_http_errors = self.throw_http_errors(options);
        let client = self.client.clone();

        ResponseHandle::new(
            path,
            Box::pin(async move {
                debug!(method = %request.method(), url = %request.url(), "sending...");
                let response = client.execute(request).await?;
                debug!(?response, "...receiving");

                let status = response.status();
                let headers = response.headers().clone();
                let body = response.bytes().await?;

                if throw_http_errors && !status.is_success() {
                    return Err(ClientError::UnexpectedStatusCode {
                        status_code: status.as_u16(),
                        body: truncate_body(&String::from_utf8_lossy(&body)),
                    });
                }

                Ok(RawResponse {
                    status,
                    headers,
                    body,
                })
            }),
        )
    }
}

fn truncate_body(text: &str) -> String {
    if text.len() <= BODY_MAX_LENGTH {
        return text.to_string();
    }
    let end = (0..=BODY_MAX_LENGTH)
        .rev()
        .find(|&end| text.is_char_boundary(end))
        .unwrap_or_default();
    let kept = text.get(..end).unwrap_or_default();
    format!("{kept}... (truncated)")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QueryValue, SearchParams};

    fn backend(options: &ClientOptions) -> ReqwestBackend {
        ReqwestBackend::create(options).expect("a backend")
    }

    fn prefixed(prefix_url: &str) -> ReqwestBackend {
        let options = ClientOptions::default()
            .with_prefix_url(prefix_url)
            .expect("a valid prefix");
        backend(&options)
    }

    #[test]
    fn should_join_prefix_and_path_with_single_slash() {
        let url = prefixed("https://dog.ceo/api/")
            .build_url("/breeds/list/all", None)
            .expect("a valid url");

        insta::assert_snapshot!(url.as_str(), @"https://dog.ceo/api/breeds/list/all");
    }

    #[test]
    fn should_use_absolute_path_without_prefix() {
        let url = backend(&ClientOptions::default())
            .build_url("https://dog.ceo/api/breeds/list/all", None)
            .expect("a valid url");

        assert_eq!(url.as_str(), "https://dog.ceo/api/breeds/list/all");
    }

    #[test]
    fn should_reject_relative_path_without_prefix() {
        let result = backend(&ClientOptions::default()).build_url("breeds/list/all", None);

        assert!(matches!(result, Err(ClientError::UrlError(_))));
    }

    #[test]
    fn should_append_search_params() {
        let options = RequestOptions::new().with_search_params(SearchParams::from_iter([
            ("limit", QueryValue::from(20)),
            ("q", QueryValue::from("hound dog")),
        ]));

        let url = prefixed("https://dog.ceo/api")
            .build_url("breeds", Some(&options))
            .expect("a valid url");

        insta::assert_snapshot!(url.as_str(), @"https://dog.ceo/api/breeds?limit=20&q=hound+dog");
    }

    #[test]
    fn should_skip_empty_query() {
        let options = RequestOptions::new().with_search_params(SearchParams::from_iter(
            Vec::<(String, QueryValue)>::new(),
        ));

        let url = prefixed("https://dog.ceo/api")
            .build_url("breeds", Some(&options))
            .expect("a valid url");

        assert_eq!(url.query(), None);
    }

    #[test]
    fn should_override_default_headers() {
        let options = ClientOptions::default()
            .with_header("Authorization", "Bearer default")
            .with_header("Accept", "application/json");
        let call = RequestOptions::new().with_header("Authorization", "Bearer call");
        let url = Url::parse("https://dog.ceo/api").expect("a valid url");

        let request = backend(&options)
            .build_request(Method::GET, url, Some(&call))
            .expect("a valid request");

        let headers = request.headers();
        assert_eq!(
            headers.get("authorization").map(HeaderValue::as_bytes),
            Some(&b"Bearer call"[..])
        );
        assert_eq!(
            headers.get("accept").map(HeaderValue::as_bytes),
            Some(&b"application/json"[..])
        );
    }

    #[test]
    fn should_reject_invalid_header_name() {
        let call = RequestOptions::new().with_header("bad header", "value");
        let url = Url::parse("https://dog.ceo/api").expect("a valid url");

        let result =
            backend(&ClientOptions::default()).build_request(Method::GET, url, Some(&call));

        assert!(matches!(result, Err(ClientError::InvalidHeaderName(_))));
    }

    #[test]
    fn should_set_json_body_and_content_type() {
        let call = RequestOptions::new()
            .with_json(&serde_json::json!({"token": "abc"}))
            .expect("serializable");
        let url = Url::parse("https://dog.ceo/api").expect("a valid url");

        let request = backend(&ClientOptions::default())
            .build_request(Method::POST, url, Some(&call))
            .expect("a valid request");

        assert_eq!(
            request
                .headers()
                .get(http::header::CONTENT_TYPE)
                .map(HeaderValue::as_bytes),
            Some(&b"application/json"[..])
        );
        assert!(request.body().is_some());
    }

    #[test]
    fn should_prefer_call_timeout() {
        let options = ClientOptions::default().with_timeout(Duration::from_secs(30));
        let backend = backend(&options);
        let url = Url::parse("https://dog.ceo/api").expect("a valid url");

        let default = backend
            .build_request(Method::GET, url.clone(), None)
            .expect("a valid request");
        let call = RequestOptions::new().with_timeout(Duration::from_secs(1));
        let overridden = backend
            .build_request(Method::GET, url, Some(&call))
            .expect("a valid request");

        assert_eq!(default.timeout(), Some(&Duration::from_secs(30)));
        assert_eq!(overridden.timeout(), Some(&Duration::from_secs(1)));
    }

    #[test]
    fn should_resolve_throw_http_errors() {
        let backend = backend(&ClientOptions::default());
        let call = RequestOptions::new().with_throw_http_errors(false);

        assert!(backend.throw_http_errors(None));
        assert!(!backend.throw_http_errors(Some(&call)));
    }

    #[test]
    fn should_truncate_long_bodies() {
        let body = "é".repeat(BODY_MAX_LENGTH);

        let truncated = truncate_body(&body);

        assert!(truncated.ends_with("... (truncated)"));
        assert!(truncated.len() <= BODY_MAX_LENGTH + "... (truncated)".len());
    }

    #[test]
    fn should_truncate_on_char_boundary() {
        let body = format!("a{}", "é".repeat(BODY_MAX_LENGTH));

        let truncated = truncate_body(&body);

        let kept = truncated.trim_end_matches("... (truncated)");
        assert_eq!(kept.len(), BODY_MAX_LENGTH - 1);
        assert!(body.starts_with(kept));
    }

    #[test]
    fn should_keep_short_bodies() {
        assert_eq!(truncate_body("not found"), "not found");
    }
}
