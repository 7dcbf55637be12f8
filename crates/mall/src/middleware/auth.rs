use crate::middleware::session::CurrentSession;
use axum::{
    body::{Body, to_bytes},
    http::{Method, Request, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, warn};

const MAX_SAVED_BODY: usize = 64 * 1024;

/// Admin-only routes: no `admin_auth`, back to the admin login page.
pub async fn require_admin(session: CurrentSession, req: Request<Body>, next: Next) -> Response {
    if session.admin_auth().await.is_some() {
        return next.run(req).await;
    }

    warn!("🚫 Admin area requested without admin login: {}", req.uri().path());
    Redirect::to("/admin/").into_response()
}

/// Member-only routes: remembers where the visitor was going, including the
/// query string or urlencoded form body, then sends them to the login page.
pub async fn require_member(session: CurrentSession, req: Request<Body>, next: Next) -> Response {
    if session.login_auth().await.is_some() {
        return next.run(req).await;
    }

    let target_url = req.uri().path().to_string();
    let is_form = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/x-www-form-urlencoded"));

    let post_data = if req.method() == Method::GET {
        req.uri().query().map(str::to_string)
    } else if req.method() == Method::POST && is_form {
        match to_bytes(req.into_body(), MAX_SAVED_BODY).await {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                warn!("Could not keep form data for {target_url}: {e}");
                None
            }
        }
    } else {
        None
    };

    let post_data = post_data.filter(|d| !d.is_empty());

    info!("🔐 Login required for {target_url}");

    session
        .update(|s| {
            s.target_url = Some(target_url);
            s.post_data = post_data;
        })
        .await;

    Redirect::to("/member/login").into_response()
}
