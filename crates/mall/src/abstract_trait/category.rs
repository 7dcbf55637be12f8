use crate::{domain::response::category::CategoryResponse, model::category::Category};
use async_trait::async_trait;
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;

pub type DynCategoryRepository = Arc<dyn CategoryRepositoryTrait + Send + Sync>;
pub type DynCategoryService = Arc<dyn CategoryServiceTrait + Send + Sync>;

#[async_trait]
pub trait CategoryRepositoryTrait {
    async fn find_first_level(&self) -> Result<Vec<Category>, RepositoryError>;
    async fn find_children(&self, cate_prtcode: i32) -> Result<Vec<Category>, RepositoryError>;
    async fn find_by_code(&self, cate_code: i32) -> Result<Option<Category>, RepositoryError>;
}

#[async_trait]
pub trait CategoryServiceTrait {
    async fn first_categories(&self) -> Result<Vec<CategoryResponse>, ServiceError>;
    async fn second_categories(
        &self,
        cate_prtcode: i32,
    ) -> Result<Vec<CategoryResponse>, ServiceError>;
    /// The category that `cate_code` hangs under, `None` for a top-level
    /// code.
    async fn parent_of(&self, cate_code: i32) -> Result<Option<CategoryResponse>, ServiceError>;
}
