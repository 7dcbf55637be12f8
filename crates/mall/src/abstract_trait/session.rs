use crate::domain::response::session::SessionData;
use async_trait::async_trait;
use chrono::Duration;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynSessionStore = Arc<dyn SessionStoreTrait + Send + Sync>;

#[async_trait]
pub trait SessionStoreTrait {
    async fn load(&self, session_id: &str) -> Result<Option<SessionData>, ServiceError>;
    async fn save(
        &self,
        session_id: &str,
        data: &SessionData,
        ttl: Duration,
    ) -> Result<(), ServiceError>;
    async fn refresh(&self, session_id: &str, ttl: Duration) -> Result<(), ServiceError>;
    async fn delete(&self, session_id: &str) -> Result<(), ServiceError>;
}
