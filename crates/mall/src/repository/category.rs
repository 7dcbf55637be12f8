use crate::{abstract_trait::category::CategoryRepositoryTrait, model::category::Category};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::error;

#[derive(Clone)]
pub struct CategoryRepository {
    db: ConnectionPool,
}

impl CategoryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    async fn find_first_level(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Category>(
            "SELECT cate_code, cate_prtcode, cate_name FROM categories WHERE cate_prtcode IS NULL ORDER BY cate_code",
        )
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch first-level categories: {:?}", e);
            RepositoryError::from(e)
        })
    }

    async fn find_children(&self, cate_prtcode: i32) -> Result<Vec<Category>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Category>(
            "SELECT cate_code, cate_prtcode, cate_name FROM categories WHERE cate_prtcode = $1 ORDER BY cate_code",
        )
        .bind(cate_prtcode)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch children of category {}: {:?}", cate_prtcode, e);
            RepositoryError::from(e)
        })
    }

    async fn find_by_code(&self, cate_code: i32) -> Result<Option<Category>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Category>(
            "SELECT cate_code, cate_prtcode, cate_name FROM categories WHERE cate_code = $1",
        )
        .bind(cate_code)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to fetch category {}: {:?}", cate_code, e);
            RepositoryError::from(e)
        })
    }
}
