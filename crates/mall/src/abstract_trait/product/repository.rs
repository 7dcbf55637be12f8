use crate::{
    domain::requests::product::{ProductDeleteFilter, ProductForm},
    model::product::Product,
    utils::SearchCriteria,
};
use async_trait::async_trait;
use shared::errors::RepositoryError;
use std::sync::Arc;

pub type DynProductQueryRepository = Arc<dyn ProductQueryRepositoryTrait + Send + Sync>;
pub type DynProductCommandRepository = Arc<dyn ProductCommandRepositoryTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryRepositoryTrait {
    async fn find_all(&self, cri: &SearchCriteria) -> Result<Vec<Product>, RepositoryError>;
    async fn count(&self, cri: &SearchCriteria) -> Result<i64, RepositoryError>;
    async fn find_by_id(&self, pro_num: i32) -> Result<Option<Product>, RepositoryError>;
}

#[async_trait]
pub trait ProductCommandRepositoryTrait {
    async fn create(
        &self,
        form: &ProductForm,
        pro_up_folder: &str,
        pro_img: &str,
    ) -> Result<Product, RepositoryError>;
    async fn update(
        &self,
        pro_num: i32,
        form: &ProductForm,
        pro_up_folder: &str,
        pro_img: &str,
    ) -> Result<Product, RepositoryError>;
    /// Deleted row, `None` when it did not exist.
    async fn delete(&self, pro_num: i32) -> Result<Option<Product>, RepositoryError>;
    async fn delete_selected(
        &self,
        filter: &ProductDeleteFilter,
    ) -> Result<Vec<Product>, RepositoryError>;
}
