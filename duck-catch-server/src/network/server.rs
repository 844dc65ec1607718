//! Achievement Gateway
//!
//! HTTP front of the achievement store: list and record achievements.
//! Stateless apart from the shared store handle.

use std::future::Future;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, instrument, warn};

use crate::config::{AllowedOrigin, GatewayConfig};
use crate::network::protocol::{Achievement, ErrorBody, SaveAchievementPayload, SaveResponse};
use crate::network::store::{AchievementStore, SharedStore, StoreError};

/// Liveness text served on `/`.
pub const LIVENESS_TEXT: &str = "Duck catch gateway is running";

/// Gateway errors, rendered as `{ "error": ... }`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Malformed or incomplete request body.
    #[error("{0}")]
    InvalidInput(String),

    /// Store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Listener failure.
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GatewayError {
    fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::Store(_) | GatewayError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        let body = ErrorBody {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct GatewayState {
    store: SharedStore,
}

/// Build the gateway router.
///
/// `/api/achievements` is served as an alias of `/achievements`.
pub fn router(store: SharedStore, allowed_origin: &AllowedOrigin) -> Router {
    let state = GatewayState { store };

    Router::new()
        .route("/", get(liveness))
        .route("/achievements", get(list_achievements).post(save_achievement))
        .route("/api/achievements", get(list_achievements).post(save_achievement))
        .layer(cors_layer(allowed_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(allowed_origin: &AllowedOrigin) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match allowed_origin {
        AllowedOrigin::Any => cors.allow_origin(Any),
        AllowedOrigin::Exact(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => cors.allow_origin(value),
            Err(_) => {
                warn!("Ignoring invalid ALLOWED_ORIGIN {:?}", origin);
                cors
            }
        },
    }
}

async fn liveness() -> &'static str {
    LIVENESS_TEXT
}

async fn list_achievements(
    State(state): State<GatewayState>,
) -> Result<Json<Vec<Achievement>>, GatewayError> {
    let records = state.store.list().await?;
    Ok(Json(records))
}

async fn save_achievement(
    State(state): State<GatewayState>,
    payload: Result<Json<SaveAchievementPayload>, JsonRejection>,
) -> Result<Json<SaveResponse>, GatewayError> {
    let Json(payload) = payload.map_err(|rejection| {
        GatewayError::InvalidInput(format!("Invalid request body: {}", rejection.body_text()))
    })?;
    let request = payload
        .validate()
        .map_err(|reason| GatewayError::InvalidInput(reason.to_string()))?;

    let record = Achievement::new(request.name, request.level, Utc::now());
    info!("Recording achievement: {} reached level {}", record.name, record.level);
    state.store.insert(record).await?;

    Ok(Json(SaveResponse { success: true }))
}

/// Achievement gateway server.
pub struct GatewayServer {
    config: GatewayConfig,
    store: SharedStore,
}

impl GatewayServer {
    /// Create a new gateway server.
    pub fn new(config: GatewayConfig, store: SharedStore) -> Self {
        Self { config, store }
    }

    /// Router serving this gateway.
    pub fn router(&self) -> Router {
        router(self.store.clone(), &self.config.allowed_origin)
    }

    /// Run until Ctrl-C.
    #[instrument(skip(self), fields(store = self.store.backend()))]
    pub async fn run(&self) -> Result<(), GatewayError> {
        let listener = TcpListener::bind(self.config.bind_addr).await?;
        info!(
            "Gateway v{} listening on {}",
            self.config.version, self.config.bind_addr
        );
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Gateway stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::network::store::{MemoryAchievementStore, UnavailableStore};

    fn test_app() -> (Router, Arc<MemoryAchievementStore>) {
        let store = Arc::new(MemoryAchievementStore::new());
        (router(store.clone(), &AllowedOrigin::Any), store)
    }

    async fn json_body(res: Response) -> Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_liveness() {
        let (app, _) = test_app();
        let res = app.oneshot(get_req("/")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], LIVENESS_TEXT.as_bytes());
    }

    #[tokio::test]
    async fn test_empty_list() {
        let (app, _) = test_app();
        let res = app.oneshot(get_req("/achievements")).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await, json!([]));
    }

    #[tokio::test]
    async fn test_save_then_list() {
        let (app, store) = test_app();

        let res = app
            .clone()
            .oneshot(post("/achievements", r#"{"name":"Ana","level":3}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await, json!({ "success": true }));

        let res = app
            .clone()
            .oneshot(post("/api/achievements", r#"{"name":"Bruno","level":5}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(store.list().await.unwrap().len(), 2);

        let res = app.oneshot(get_req("/api/achievements")).await.unwrap();
        let body = json_body(res).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["name"], "Bruno");
        assert_eq!(entries[0]["level"], 5);
        assert_eq!(entries[1]["name"], "Ana");

        let date = entries[1]["date"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(date).is_ok());
        assert!(date.ends_with('Z'));
        assert!(entries[1]["id"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_invalid_saves_are_rejected() {
        let (app, store) = test_app();

        for body in [
            r#"{"level":2}"#,
            r#"{"name":"","level":2}"#,
            r#"{"name":"Ana","level":0}"#,
            r#"{"name":"Ana","level":"two"}"#,
            r#"{"name":"Ana"}"#,
            "not json",
        ] {
            let res = app.clone().oneshot(post("/achievements", body)).await.unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body {}", body);
            assert!(json_body(res).await["error"].as_str().is_some());
        }

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unavailable_store_returns_500() {
        let app = router(Arc::new(UnavailableStore), &AllowedOrigin::Any);

        let res = app.clone().oneshot(get_req("/achievements")).await.unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(res).await["error"], "Database not connected");

        let res = app
            .oneshot(post("/achievements", r#"{"name":"Ana","level":1}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_cors_origin_header() {
        let store = Arc::new(MemoryAchievementStore::new());
        let app = router(store, &AllowedOrigin::Exact("http://localhost:5173".into()));

        let req = Request::builder()
            .uri("/achievements")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let res = app.oneshot(req).await.unwrap();
        assert_eq!(
            res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }
}
