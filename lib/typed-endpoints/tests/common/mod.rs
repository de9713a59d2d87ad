#![allow(dead_code, missing_docs, clippy::expect_used)]

use std::sync::{Arc, Mutex};

use http::Method;
use rstest::fixture;
use tracing::info;
use typed_endpoints::{ClientError, HttpBackend, RawResponse, RequestOptions, ResponseHandle};

mod test_server;
pub use self::test_server::*;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

/// A call received by the [`MockBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub options: Option<RequestOptions>,
}

/// Records every call and answers with a canned JSON body.
#[derive(Debug, Clone)]
pub struct MockBackend {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    body: serde_json::Value,
}

impl MockBackend {
    pub fn new(body: serde_json::Value) -> Self {
        Self {
            calls: Arc::default(),
            body,
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().expect("not poisoned").clone()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new(serde_json::Value::Null)
    }
}

impl HttpBackend for MockBackend {
    fn request(
        &self,
        method: Method,
        path: &str,
        options: Option<RequestOptions>,
    ) -> ResponseHandle {
        info!(%method, path, "mock call");
        self.calls.lock().expect("not poisoned").push(RecordedCall {
            method,
            path: path.to_string(),
            options,
        });

        let body = self.body.to_string();
        ResponseHandle::new(
            path,
            Box::pin(async move { Ok::<_, ClientError>(RawResponse::json(body)) }),
        )
    }
}

#[fixture]
pub async fn server() -> TestServer {
    init_tracing();
    match TestServer::start().await {
        Ok(server) => server,
        Err(error) => {
            panic!("fail to start test server: {error:?}");
        }
    }
}
