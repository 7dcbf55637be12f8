use crate::{
    abstract_trait::category::DynCategoryService,
    domain::response::category::CategoryResponse,
    middleware::auth::require_admin,
    state::AppState,
};
use axum::{
    Extension, Json, Router,
    extract::Path,
    middleware,
    response::IntoResponse,
    routing::get,
};
use shared::errors::HttpError;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/admin/category/secondcategory/{parentCode}",
    tag = "Category",
    params(("parentCode" = i32, Path, description = "First-level category code")),
    responses(
        (status = 200, description = "Child categories", body = Vec<CategoryResponse>),
        (status = 303, description = "Not logged in as admin")
    )
)]
pub async fn get_second_categories(
    Extension(service): Extension<DynCategoryService>,
    Path(parent_code): Path<i32>,
) -> Result<impl IntoResponse, HttpError> {
    let categories = service.second_categories(parent_code).await?;
    Ok(Json(categories))
}

pub fn category_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/admin/category/secondcategory/{parentCode}",
            get(get_second_categories),
        )
        .route_layer(middleware::from_fn(require_admin))
        .layer(Extension(app_state.di_container.category_service.clone()))
}
