//! Gateway Client
//!
//! HTTP/1 client the front-end uses to reach the achievement gateway.

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{ACCEPT, CONTENT_TYPE};
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::network::protocol::{Achievement, ErrorBody, SaveAchievement, SaveResponse};

/// Client errors.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Base URL plus path is not a valid URI.
    #[error("Invalid gateway URL: {0}")]
    InvalidUri(String),

    /// Request could not be built.
    #[error("Invalid request: {0}")]
    Request(#[from] hyper::http::Error),

    /// Connection or protocol failure.
    #[error("Gateway unreachable: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    /// Response body could not be read.
    #[error("Failed to read response: {0}")]
    Body(#[from] hyper::Error),

    /// Non-success status.
    #[error("Gateway returned {status}: {message}")]
    Status {
        /// HTTP status
        status: StatusCode,
        /// `error` field of the body, or the raw body
        message: String,
    },

    /// Body is not the expected JSON.
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Achievement gateway client. Cheap to clone.
#[derive(Clone, Debug)]
pub struct GatewayClient {
    base_url: String,
    http: Client<HttpConnector, Full<Bytes>>,
}

impl GatewayClient {
    /// Create a client for `base_url` (e.g. `http://127.0.0.1:4000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder(TokioExecutor::new()).build(HttpConnector::new());
        Self { base_url, http }
    }

    /// Gateway base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch every achievement, best first.
    pub async fn list_achievements(&self) -> Result<Vec<Achievement>, ClientError> {
        let request = Request::builder()
            .method(Method::GET)
            .uri(self.uri("/achievements")?)
            .header(ACCEPT, "application/json")
            .body(Full::new(Bytes::new()))?;
        self.send(request).await
    }

    /// Record an achievement. Returns the gateway's `success` flag.
    pub async fn save_achievement(&self, name: &str, level: u32) -> Result<bool, ClientError> {
        let body = serde_json::to_vec(&SaveAchievement {
            name: name.to_string(),
            level,
        })?;
        let request = Request::builder()
            .method(Method::POST)
            .uri(self.uri("/achievements")?)
            .header(CONTENT_TYPE, "application/json")
            .body(Full::new(Bytes::from(body)))?;

        let response: SaveResponse = self.send(request).await?;
        Ok(response.success)
    }

    fn uri(&self, path: &str) -> Result<Uri, ClientError> {
        let url = format!("{}{}", self.base_url, path);
        url.parse().map_err(|_| ClientError::InvalidUri(url))
    }

    async fn send<T: DeserializeOwned>(&self, request: Request<Full<Bytes>>) -> Result<T, ClientError> {
        debug!("{} {}", request.method(), request.uri());

        let response = self.http.request(request).await?;
        let status = response.status();
        let bytes = response.into_body().collect().await?.to_bytes();

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorBody>(&bytes)
                .map(|body| body.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(ClientError::Status { status, message });
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    use crate::config::AllowedOrigin;
    use crate::network::server::router;
    use crate::network::store::{MemoryAchievementStore, SharedStore, UnavailableStore};

    async fn spawn_gateway(store: SharedStore) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(store, &AllowedOrigin::Any);
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_save_and_list() {
        let url = spawn_gateway(Arc::new(MemoryAchievementStore::new())).await;
        let client = GatewayClient::new(format!("{}/", url));
        assert_eq!(client.base_url(), url);

        assert!(client.list_achievements().await.unwrap().is_empty());
        assert!(client.save_achievement("Ana", 2).await.unwrap());
        assert!(client.save_achievement("Bruno", 4).await.unwrap());

        let list = client.list_achievements().await.unwrap();
        let names: Vec<&str> = list.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno", "Ana"]);
    }

    #[tokio::test]
    async fn test_error_status_carries_message() {
        let url = spawn_gateway(Arc::new(UnavailableStore)).await;
        let client = GatewayClient::new(url);

        match client.list_achievements().await {
            Err(ClientError::Status { status, message }) => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(message, "Database not connected");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_input_is_status_error() {
        let url = spawn_gateway(Arc::new(MemoryAchievementStore::new())).await;
        let client = GatewayClient::new(url);

        let err = client.save_achievement("", 3).await.unwrap_err();
        assert!(matches!(err, ClientError::Status { status, .. } if status == StatusCode::BAD_REQUEST));
    }

    #[tokio::test]
    async fn test_unreachable_gateway() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = GatewayClient::new(format!("http://{}", addr));
        assert!(matches!(
            client.list_achievements().await,
            Err(ClientError::Transport(_))
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        let client = GatewayClient::new("not a url");
        assert!(matches!(client.uri("/achievements"), Err(ClientError::InvalidUri(_))));
    }
}
