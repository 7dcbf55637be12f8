use crate::{
    abstract_trait::admin::{AdminLoginOutcome, DynAdminService},
    domain::{requests::admin::AdminLoginRequest, response::api::ViewResponse},
    middleware::{auth::require_admin, session::CurrentSession, validate::ValidatedForm},
    state::AppState,
};
use axum::{
    Extension, Json, Router,
    middleware,
    response::{IntoResponse, Redirect},
    routing::{get, post},
};
use shared::errors::HttpError;
use std::sync::Arc;
use tracing::info;

pub async fn login_form(session: CurrentSession) -> impl IntoResponse {
    let flash = session.take_flash().await;
    Json(ViewResponse::new("admin/ad_login", flash, ()))
}

pub async fn admin_ok(
    Extension(service): Extension<DynAdminService>,
    session: CurrentSession,
    ValidatedForm(req): ValidatedForm<AdminLoginRequest>,
) -> Result<Redirect, HttpError> {
    match service.login(&req).await? {
        AdminLoginOutcome::Success(auth) => {
            info!("🔓 Admin session opened for {}", auth.ad_userid);
            session.update(|s| s.admin_auth = Some(auth)).await;
            Ok(Redirect::to("/admin/ad_menu"))
        }
        AdminLoginOutcome::UnknownId => {
            session.set_flash("msg", "idfail").await;
            Ok(Redirect::to("/admin/"))
        }
        AdminLoginOutcome::WrongPassword => {
            session.set_flash("msg", "pwfail").await;
            Ok(Redirect::to("/admin/"))
        }
    }
}

pub async fn logout(session: CurrentSession) -> Redirect {
    session.invalidate().await;
    Redirect::to("/admin/")
}

pub async fn ad_menu(session: CurrentSession) -> impl IntoResponse {
    let flash = session.take_flash().await;
    let auth = session.admin_auth().await;
    Json(ViewResponse::new("admin/ad_menu", flash, auth))
}

pub fn admin_routes(app_state: Arc<AppState>) -> Router {
    let public = Router::new()
        .route("/admin/", get(login_form))
        .route("/admin/admin_ok", post(admin_ok))
        .route("/admin/logout", get(logout));

    let protected = Router::new()
        .route("/admin/ad_menu", get(ad_menu))
        .route_layer(middleware::from_fn(require_admin));

    public
        .merge(protected)
        .layer(Extension(app_state.di_container.admin_service.clone()))
}
