//! Router construction and server host for the API.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::Request,
    middleware,
    routing::{delete, get, post, put},
};
use nexart_config::AppConfig;
use nexart_telemetry::{Metrics, build_sha};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::{Span, info};

use crate::error::{ApiServerError, ApiServerResult};
use crate::http::constants::HEADER_REQUEST_ID;
use crate::http::health::{health, metrics};
use crate::http::jfrog::{delete_repository, get_repository, list_repositories, update_repository};
use crate::http::nexus::{list_source_repositories, push_repositories};
use crate::http::telemetry::record_http_request;
use crate::state::ApiState;

/// Axum router wrapper that hosts the migration API.
pub struct ApiServer {
    router: Router,
}

impl ApiServer {
    /// Construct the API server with shared state derived from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the outbound HTTP client cannot be built.
    pub fn new(config: &AppConfig, telemetry: Metrics) -> ApiServerResult<Self> {
        let state = ApiState::from_config(config, telemetry.clone())
            .map_err(|source| ApiServerError::HttpClient { source })?;
        Ok(Self::with_state(Arc::new(state), telemetry))
    }

    fn with_state(state: Arc<ApiState>, telemetry: Metrics) -> Self {
        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let method = request.method().clone();
                let uri_path = request.uri().path();
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();

                tracing::info_span!(
                    "http.request",
                    method = %method,
                    route = %uri_path,
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_request(|_request: &Request<_>, _span: &Span| {})
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    let status = response.status().as_u16();
                    span.record("status_code", status);
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(nexart_telemetry::set_request_id_layer())
            .layer(nexart_telemetry::propagate_request_id_layer())
            .layer(trace_layer)
            .layer(middleware::from_fn_with_state(telemetry, record_http_request));

        let router = Self::build_router()
            .route_layer(layered)
            .with_state(state);

        Self { router }
    }

    fn build_router() -> Router<Arc<ApiState>> {
        Self::public_routes()
            .merge(Self::nexus_routes())
            .merge(Self::jfrog_routes())
    }

    fn public_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/health", get(health))
            .route("/metrics", get(metrics))
    }

    fn nexus_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/nexus/repositories", get(list_source_repositories))
            .route("/nexus/push-repos", post(push_repositories))
    }

    fn jfrog_routes() -> Router<Arc<ApiState>> {
        Router::new()
            .route("/jfrog/repository", delete(delete_repository))
            .route("/jfrog/repository/update", put(update_repository))
            .route("/jfrog/repositories", get(list_repositories))
            .route("/jfrog/repositories/{repositoryKey}", get(get_repository))
    }

    /// Router with all middleware and state applied.
    #[must_use]
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `addr` until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound or the server fails.
    pub async fn serve<F>(self, addr: SocketAddr, shutdown: F) -> ApiServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ApiServerError::Bind { addr, source })?;
        info!(%addr, "serving migration api");
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|source| ApiServerError::Serve { source })
    }
}
