use crate::{
    domain::response::{api::ViewResponse, member::MemberResponse},
    middleware::session::CurrentSession,
    state::AppState,
};
use axum::{Json, Router, response::IntoResponse, routing::get};
use std::sync::Arc;

pub async fn index(session: CurrentSession) -> impl IntoResponse {
    let flash = session.take_flash().await;
    let member = session.login_auth().await.map(MemberResponse::from);

    Json(ViewResponse::new("index", flash, member))
}

pub fn index_routes(_app_state: Arc<AppState>) -> Router {
    Router::new().route("/", get(index))
}
