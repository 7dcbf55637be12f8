use crate::{
    abstract_trait::member::DynMemberService,
    domain::requests::email::{AuthCodeQuery, ConfirmAuthCodeQuery},
    middleware::session::CurrentSession,
    state::AppState,
};
use axum::{Extension, Router, extract::Query, routing::get};
use shared::errors::{HttpError, ServiceError};
use std::sync::Arc;
use tracing::{info, warn};

#[utoipa::path(
    get,
    path = "/email/authcode",
    tag = "Email",
    params(AuthCodeQuery),
    responses(
        (status = 200, description = "`success` once the code is mailed, `fail` for an invalid address", body = String),
        (status = 503, description = "Mail could not be sent")
    )
)]
pub async fn send_auth_code(
    Extension(service): Extension<DynMemberService>,
    session: CurrentSession,
    Query(query): Query<AuthCodeQuery>,
) -> Result<&'static str, HttpError> {
    let code = match service.send_auth_code(&query.receiver_mail).await {
        Ok(code) => code,
        Err(ServiceError::Validation(errors)) => {
            warn!("Verification code not sent: {}", errors.join("; "));
            return Ok("fail");
        }
        Err(e) => return Err(e.into()),
    };

    session.update(|s| s.authcode = Some(code)).await;
    Ok("success")
}

#[utoipa::path(
    get,
    path = "/email/confirm_authcode",
    tag = "Email",
    params(ConfirmAuthCodeQuery),
    responses((
        status = 200,
        description = "`success` on a match, `fail` on a mismatch, `request` when no code was issued",
        body = String
    ))
)]
pub async fn confirm_auth_code(
    session: CurrentSession,
    Query(query): Query<ConfirmAuthCodeQuery>,
) -> &'static str {
    let Some(issued) = session.read(|s| s.authcode.clone()).await else {
        return "request";
    };

    if issued != query.authcode.trim() {
        return "fail";
    }

    session.update(|s| s.authcode = None).await;
    info!("📧 Email verification code confirmed");
    "success"
}

pub fn email_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/email/authcode", get(send_auth_code))
        .route("/email/confirm_authcode", get(confirm_auth_code))
        .layer(Extension(app_state.di_container.member_service.clone()))
}
