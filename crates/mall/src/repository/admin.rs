use crate::{abstract_trait::admin::AdminRepositoryTrait, model::admin::Admin};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;

#[derive(Clone)]
pub struct AdminRepository {
    db: ConnectionPool,
}

impl AdminRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AdminRepositoryTrait for AdminRepository {
    async fn find_by_id(&self, ad_userid: &str) -> Result<Option<Admin>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE ad_userid = $1")
            .bind(ad_userid)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch admin {}: {:?}", ad_userid, e);
                RepositoryError::from(e)
            })
    }

    async fn update_login_date(&self, ad_userid: &str) -> Result<Admin, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Admin>(
            "UPDATE admins SET login_date = CURRENT_TIMESTAMP WHERE ad_userid = $1 RETURNING *",
        )
        .bind(ad_userid)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to update login date for {}: {:?}", ad_userid, e);
            RepositoryError::from(e)
        })
    }

    async fn create_if_absent(
        &self,
        ad_userid: &str,
        password_hash: &str,
    ) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            "INSERT INTO admins (ad_userid, ad_passwd) VALUES ($1, $2) ON CONFLICT (ad_userid) DO NOTHING",
        )
        .bind(ad_userid)
        .bind(password_hash)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to create admin {}: {:?}", ad_userid, e);
            RepositoryError::from(e)
        })?;

        Ok(result.rows_affected() > 0)
    }
}
