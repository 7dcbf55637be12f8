use axum::{
    Extension,
    body::Body,
    extract::MatchedPath,
    http::Request,
    middleware::Next,
    response::Response,
};
use shared::utils::{Method, Metrics, Status};
use tokio::time::Instant;

pub async fn track_metrics(
    Extension(metrics): Extension<Metrics>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = Method::from(req.method());
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    let status = if response.status().is_server_error() || response.status().is_client_error() {
        Status::Error
    } else {
        Status::Success
    };

    metrics.record(method, status, &route, start.elapsed().as_secs_f64());

    response
}
