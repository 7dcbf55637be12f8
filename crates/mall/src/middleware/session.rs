use crate::{
    abstract_trait::session::DynSessionStore,
    domain::response::session::{AdminAuth, SessionData},
    model::member::Member,
};
use axum::{
    Extension,
    body::Body,
    extract::FromRequestParts,
    http::{Request, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Duration;
use shared::{errors::HttpError, utils::generate_random_string};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, error};

pub const SESSION_COOKIE: &str = "DOCMALL_SESSION";
const SESSION_ID_LEN: usize = 48;

#[derive(Clone)]
pub struct SessionManager {
    pub store: DynSessionStore,
    pub ttl: Duration,
}

impl SessionManager {
    pub fn new(store: DynSessionStore, ttl: Duration) -> Self {
        Self { store, ttl }
    }
}

#[derive(Default)]
struct SessionState {
    data: SessionData,
    dirty: bool,
    invalidated: bool,
}

/// The session of the current request. Changes are written back to the
/// store once the handler has produced its response.
#[derive(Clone, Default)]
pub struct CurrentSession {
    inner: Arc<Mutex<SessionState>>,
}

impl CurrentSession {
    pub fn new(data: SessionData) -> Self {
        Self {
            inner: Arc::new(Mutex::new(SessionState {
                data,
                ..Default::default()
            })),
        }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&SessionData) -> R) -> R {
        let state = self.inner.lock().await;
        f(&state.data)
    }

    pub async fn update<R>(&self, f: impl FnOnce(&mut SessionData) -> R) -> R {
        let mut state = self.inner.lock().await;
        state.dirty = true;
        f(&mut state.data)
    }

    pub async fn login_auth(&self) -> Option<Member> {
        self.read(|s| s.login_auth.clone()).await
    }

    pub async fn admin_auth(&self) -> Option<AdminAuth> {
        self.read(|s| s.admin_auth.clone()).await
    }

    pub async fn set_flash(&self, key: &str, value: &str) {
        self.update(|s| {
            s.flash.insert(key.to_string(), value.to_string());
        })
        .await;
    }

    /// Returns and clears the flash attributes left by the previous request.
    pub async fn take_flash(&self) -> BTreeMap<String, String> {
        let mut state = self.inner.lock().await;
        if state.data.flash.is_empty() {
            return BTreeMap::new();
        }
        state.dirty = true;
        std::mem::take(&mut state.data.flash)
    }

    /// Drops every attribute and retires the session id.
    pub async fn invalidate(&self) {
        let mut state = self.inner.lock().await;
        state.data = SessionData::default();
        state.dirty = false;
        state.invalidated = true;
    }

    async fn finish(&self) -> (SessionData, bool, bool) {
        let state = self.inner.lock().await;
        (state.data.clone(), state.dirty, state.invalidated)
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentSession>()
            .cloned()
            .ok_or_else(|| HttpError::Internal("Session layer is not installed".to_string()))
    }
}

fn new_session_id() -> Result<String, HttpError> {
    generate_random_string(SESSION_ID_LEN).map_err(|e| {
        error!("❌ Failed to generate session id: {e}");
        HttpError::Internal("Failed to create session".to_string())
    })
}

fn session_cookie(id: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Loads the session named by the cookie (or starts an empty one), exposes
/// it to handlers as [`CurrentSession`] and persists whatever they changed.
pub async fn session_middleware(
    Extension(manager): Extension<SessionManager>,
    jar: CookieJar,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HttpError> {
    let existing = match jar.get(SESSION_COOKIE).map(|c| c.value().to_string()) {
        Some(id) => manager
            .store
            .load(&id)
            .await?
            .map(|data| (id, data)),
        None => None,
    };

    let (session_id, data, is_new) = match existing {
        Some((id, data)) => (id, data, false),
        None => (new_session_id()?, SessionData::default(), true),
    };

    let session = CurrentSession::new(data);
    req.extensions_mut().insert(session.clone());

    let response = next.run(req).await;

    let (data, dirty, invalidated) = session.finish().await;

    if invalidated {
        if !is_new {
            manager.store.delete(&session_id).await?;
            debug!("🔒 Session invalidated");
        }

        if dirty {
            let fresh_id = new_session_id()?;
            manager.store.save(&fresh_id, &data, manager.ttl).await?;
            return Ok((jar.add(session_cookie(fresh_id)), response).into_response());
        }

        let removal = Cookie::build((SESSION_COOKIE, "")).path("/");
        return Ok((jar.remove(removal), response).into_response());
    }

    if dirty {
        manager.store.save(&session_id, &data, manager.ttl).await?;
        if is_new {
            return Ok((jar.add(session_cookie(session_id)), response).into_response());
        }
    } else if !is_new {
        manager.store.refresh(&session_id, manager.ttl).await?;
    }

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn taking_flash_empties_it() {
        let session = CurrentSession::new(SessionData::default());
        session.set_flash("msg", "idfail").await;

        let flash = session.take_flash().await;
        assert_eq!(flash.get("msg").map(String::as_str), Some("idfail"));
        assert!(session.take_flash().await.is_empty());
    }

    #[tokio::test]
    async fn invalidate_clears_everything() {
        let session = CurrentSession::new(SessionData {
            admin_auth: Some(AdminAuth {
                ad_userid: "admin".into(),
                login_date: None,
            }),
            ..Default::default()
        });

        session.invalidate().await;

        assert!(session.admin_auth().await.is_none());
        let (_, dirty, invalidated) = session.finish().await;
        assert!(!dirty);
        assert!(invalidated);
    }

    #[tokio::test]
    async fn reading_does_not_mark_dirty() {
        let session = CurrentSession::new(SessionData::default());
        assert!(session.login_auth().await.is_none());
        assert!(session.take_flash().await.is_empty());

        let (_, dirty, _) = session.finish().await;
        assert!(!dirty);
    }
}
