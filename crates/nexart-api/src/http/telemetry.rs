//! Request counting keyed by matched route and response status.

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use nexart_telemetry::Metrics;

/// Route label for requests that reach the middleware without a matched path.
const UNMATCHED_ROUTE: &str = "unmatched";

pub(crate) async fn record_http_request(
    State(metrics): State<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map_or(UNMATCHED_ROUTE, MatchedPath::as_str)
        .to_string();
    let response = next.run(request).await;
    metrics.inc_http_request(&route, response.status().as_u16());
    response
}
