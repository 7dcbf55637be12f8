use crate::{
    abstract_trait::member::MemberRepositoryTrait,
    domain::requests::member::{JoinMemberRequest, ModifyMemberRequest},
    model::member::Member,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

#[derive(Clone)]
pub struct MemberRepository {
    db: ConnectionPool,
}

impl MemberRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MemberRepositoryTrait for MemberRepository {
    async fn find_by_id(&self, mbsp_id: &str) -> Result<Option<Member>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE mbsp_id = $1")
            .bind(mbsp_id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch member {}: {:?}", mbsp_id, e);
                RepositoryError::from(e)
            })
    }

    async fn exists(&self, mbsp_id: &str) -> Result<bool, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let found: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM members WHERE mbsp_id = $1)")
                .bind(mbsp_id)
                .fetch_one(&mut *conn)
                .await
                .map_err(|e| {
                    error!("❌ Failed to check member id {}: {:?}", mbsp_id, e);
                    RepositoryError::from(e)
                })?;

        Ok(found)
    }

    async fn find_by_name_and_email(
        &self,
        mbsp_name: &str,
        mbsp_email: &str,
    ) -> Result<Option<Member>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Member>(
            "SELECT * FROM members WHERE mbsp_name = $1 AND mbsp_email = $2 LIMIT 1",
        )
        .bind(mbsp_name)
        .bind(mbsp_email)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to search member by name and email: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_by_id_and_email(
        &self,
        mbsp_id: &str,
        mbsp_email: &str,
    ) -> Result<Option<Member>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Member>("SELECT * FROM members WHERE mbsp_id = $1 AND mbsp_email = $2")
            .bind(mbsp_id)
            .bind(mbsp_email)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to search member {} by email: {:?}", mbsp_id, e);
                RepositoryError::from(e)
            })
    }

    async fn create(
        &self,
        req: &JoinMemberRequest,
        password_hash: &str,
    ) -> Result<Member, RepositoryError> {
        info!("🆕 Inserting member {}", req.mbsp_id);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Member>(
            r#"
            INSERT INTO members (
                mbsp_id, mbsp_name, mbsp_email, mbsp_password, mbsp_zipcode,
                mbsp_addr, mbsp_deaddr, mbsp_phone, mbsp_nick, mbsp_receive
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(&req.mbsp_id)
        .bind(&req.mbsp_name)
        .bind(&req.mbsp_email)
        .bind(password_hash)
        .bind(&req.mbsp_zipcode)
        .bind(&req.mbsp_addr)
        .bind(&req.mbsp_deaddr)
        .bind(&req.mbsp_phone)
        .bind(&req.mbsp_nick)
        .bind(&req.mbsp_receive)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to insert member {}: {:?}", req.mbsp_id, e);
            RepositoryError::from(e)
        })
    }

    async fn update_profile(
        &self,
        mbsp_id: &str,
        req: &ModifyMemberRequest,
    ) -> Result<Member, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Member>(
            r#"
            UPDATE members
            SET mbsp_name = $2,
                mbsp_email = $3,
                mbsp_zipcode = $4,
                mbsp_addr = $5,
                mbsp_deaddr = $6,
                mbsp_phone = $7,
                mbsp_nick = $8,
                mbsp_receive = $9,
                mbsp_updatedate = CURRENT_TIMESTAMP
            WHERE mbsp_id = $1
            RETURNING *
            "#,
        )
        .bind(mbsp_id)
        .bind(&req.mbsp_name)
        .bind(&req.mbsp_email)
        .bind(&req.mbsp_zipcode)
        .bind(&req.mbsp_addr)
        .bind(&req.mbsp_deaddr)
        .bind(&req.mbsp_phone)
        .bind(&req.mbsp_nick)
        .bind(&req.mbsp_receive)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to update member {}: {:?}", mbsp_id, e);
            RepositoryError::from(e)
        })
    }

    async fn update_password(
        &self,
        mbsp_id: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let result = sqlx::query(
            "UPDATE members SET mbsp_password = $2, mbsp_updatedate = CURRENT_TIMESTAMP WHERE mbsp_id = $1",
        )
        .bind(mbsp_id)
        .bind(password_hash)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to update password for {}: {:?}", mbsp_id, e);
            RepositoryError::from(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn update_last_login(&self, mbsp_id: &str) -> Result<(), RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query("UPDATE members SET mbsp_lastlogin = CURRENT_TIMESTAMP WHERE mbsp_id = $1")
            .bind(mbsp_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to record login for {}: {:?}", mbsp_id, e);
                RepositoryError::from(e)
            })?;

        Ok(())
    }
}
