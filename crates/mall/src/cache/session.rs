use crate::{abstract_trait::session::SessionStoreTrait, domain::response::session::SessionData};
use async_trait::async_trait;
use chrono::Duration;
use deadpool_redis::{Connection, Pool, redis::AsyncCommands};
use shared::errors::ServiceError;
use tracing::{debug, error};

#[derive(Clone)]
pub struct SessionStore {
    pool: Pool,
}

impl SessionStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn key(session_id: &str) -> String {
        format!("session:{session_id}")
    }

    async fn get_conn(&self) -> Result<Connection, ServiceError> {
        self.pool.get().await.map_err(|e| {
            error!("Failed to get Redis connection from pool: {:?}", e);
            ServiceError::Internal(format!("session store unavailable: {e}"))
        })
    }
}

#[async_trait]
impl SessionStoreTrait for SessionStore {
    async fn load(&self, session_id: &str) -> Result<Option<SessionData>, ServiceError> {
        let mut conn = self.get_conn().await?;
        let key = Self::key(session_id);

        let raw: Option<String> = conn.get(&key).await.map_err(|e| {
            error!("Redis get error for session {}: {:?}", session_id, e);
            ServiceError::Internal(format!("session read failed: {e}"))
        })?;

        match raw {
            Some(data) => match serde_json::from_str::<SessionData>(&data) {
                Ok(session) => {
                    debug!("Session retrieved for session_id: {}", session_id);
                    Ok(Some(session))
                }
                Err(e) => {
                    // unreadable payloads are treated as expired
                    error!("Failed to deserialize session {}: {:?}", session_id, e);
                    Ok(None)
                }
            },
            None => {
                debug!("Session not found: {}", session_id);
                Ok(None)
            }
        }
    }

    async fn save(
        &self,
        session_id: &str,
        data: &SessionData,
        ttl: Duration,
    ) -> Result<(), ServiceError> {
        let json_data = serde_json::to_string(data).map_err(|e| {
            error!("Failed to serialize session: {:?}", e);
            ServiceError::Internal(format!("session serialization failed: {e}"))
        })?;

        let mut conn = self.get_conn().await?;
        let _: () = conn
            .set_ex(Self::key(session_id), &json_data, ttl.num_seconds().max(1) as u64)
            .await
            .map_err(|e| {
                error!("Failed to save session {}: {:?}", session_id, e);
                ServiceError::Internal(format!("session write failed: {e}"))
            })?;

        debug!("Session saved for session_id: {}", session_id);
        Ok(())
    }

    async fn refresh(&self, session_id: &str, ttl: Duration) -> Result<(), ServiceError> {
        let mut conn = self.get_conn().await?;
        let _: bool = conn
            .expire(Self::key(session_id), ttl.num_seconds().max(1))
            .await
            .map_err(|e| {
                error!("Failed to refresh session TTL {}: {:?}", session_id, e);
                ServiceError::Internal(format!("session refresh failed: {e}"))
            })?;

        debug!("Session TTL refreshed for session_id: {}", session_id);
        Ok(())
    }

    async fn delete(&self, session_id: &str) -> Result<(), ServiceError> {
        let mut conn = self.get_conn().await?;
        let _: () = conn.del(Self::key(session_id)).await.map_err(|e| {
            error!("Failed to delete session {}: {:?}", session_id, e);
            ServiceError::Internal(format!("session delete failed: {e}"))
        })?;

        debug!("Session deleted: {}", session_id);
        Ok(())
    }
}
