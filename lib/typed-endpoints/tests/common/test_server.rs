use axum::extract::{Path, RawQuery};
use axum::http::{HeaderMap, Method, StatusCode, header};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::info;

/// An axum server bound to a random local port, stopped on drop.
#[derive(Debug)]
pub struct TestServer {
    base_url: String,
    handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start() -> anyhow::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        info!(%addr, "launching test server");

        let handle = tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, router()).await {
                tracing::error!(?error, "test server stopped");
            }
        });

        Ok(Self {
            base_url: format!("http://{addr}"),
            handle,
        })
    }

    /// `http://127.0.0.1:<port>`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn router() -> Router {
    Router::new()
        .route(
            "/user/{id}",
            get(user).post(user).put(user).delete(user).patch(user),
        )
        .route("/echo", get(echo).post(echo))
        .route("/fail", get(fail))
}

async fn user(method: Method, Path(id): Path<String>) -> Json<Value> {
    Json(json!({ "method": method.as_str(), "id": id }))
}

async fn echo(
    method: Method,
    RawQuery(query): RawQuery,
    headers: HeaderMap,
    body: String,
) -> Json<Value> {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };

    Json(json!({
        "method": method.as_str(),
        "query": query,
        "authorization": header_value(header::AUTHORIZATION),
        "accept": header_value(header::ACCEPT),
        "content_type": header_value(header::CONTENT_TYPE),
        "body": body,
    }))
}

async fn fail() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database is on fire")
}
