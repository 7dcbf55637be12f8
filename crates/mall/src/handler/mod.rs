mod admin;
mod category;
mod email;
mod index;
mod member;
mod product;

use crate::{
    middleware::{metrics::track_metrics, session::session_middleware},
    state::AppState,
};
use anyhow::Result;
use axum::{
    Extension, Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use prometheus_client::encoding::text::encode;
use serde_json::json;
use shared::utils::shutdown_signal;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};
use utoipa::OpenApi;

pub use self::admin::admin_routes;
pub use self::category::category_routes;
pub use self::email::email_routes;
pub use self::index::index_routes;
pub use self::member::member_routes;
pub use self::product::product_routes;

const MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        health_checker_handler,

        category::get_second_categories,

        product::get_products,
        product::get_product_edit,
        product::image_display,

        member::id_check,
        member::id_search,
        member::temp_password,

        email::send_auth_code,
        email::confirm_auth_code,
    ),
    tags(
        (name = "Health", description = "Liveness probe"),
        (name = "Category", description = "Category lookups for the admin product forms"),
        (name = "Product", description = "Admin product catalog"),
        (name = "Member", description = "Member lookups"),
        (name = "Email", description = "Sign-up email verification"),
    )
)]
pub struct ApiDoc;

#[utoipa::path(
    get,
    path = "/api/healthchecker",
    tag = "Health",
    responses((status = 200, description = "Service is up"))
)]
pub async fn health_checker_handler() -> impl IntoResponse {
    Json(json!({
        "status": "success",
        "message": "DocMall is running",
    }))
}

async fn openapi_handler() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let mut buffer = String::new();

    let registry = state.registry.lock().await;

    if let Err(e) = encode(&mut buffer, &registry) {
        error!("❌ Failed to encode metrics: {e}");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buffer,
    )
        .into_response()
}

pub struct AppRouter;

impl AppRouter {
    /// The full application: every page and API route behind the session,
    /// metrics and body-limit layers.
    pub fn build(app_state: Arc<AppState>) -> Router {
        let system_routes = Router::new()
            .route("/metrics", get(metrics_handler))
            .route("/api/healthchecker", get(health_checker_handler))
            .route("/api-docs/openapi.json", get(openapi_handler))
            .with_state(app_state.clone());

        Router::new()
            .merge(system_routes)
            .merge(index_routes(app_state.clone()))
            .merge(admin_routes(app_state.clone()))
            .merge(category_routes(app_state.clone()))
            .merge(product_routes(app_state.clone()))
            .merge(member_routes(app_state.clone()))
            .merge(email_routes(app_state.clone()))
            .layer(middleware::from_fn(session_middleware))
            .layer(middleware::from_fn(track_metrics))
            .layer(Extension(app_state.sessions.clone()))
            .layer(Extension(app_state.metrics.clone()))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
    }

    pub async fn serve(port: u16, app_state: AppState) -> Result<()> {
        let app = Self::build(Arc::new(app_state));

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr).await?;

        info!("🚀 Server running on http://{}", listener.local_addr()?);
        info!("📚 OpenAPI document: http://localhost:{port}/api-docs/openapi.json");
        info!("📊 Metrics: http://localhost:{port}/metrics");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        Ok(())
    }
}
