use crate::{
    domain::{
        requests::product::{CreateProductRequest, ProductDeleteFilter, UpdateProductRequest},
        response::product::{ProductListResponse, ProductResponse},
    },
    utils::{SearchCriteria, StoredFile},
};
use async_trait::async_trait;
use shared::errors::ServiceError;
use std::sync::Arc;

pub type DynProductQueryService = Arc<dyn ProductQueryServiceTrait + Send + Sync>;
pub type DynProductCommandService = Arc<dyn ProductCommandServiceTrait + Send + Sync>;

#[async_trait]
pub trait ProductQueryServiceTrait {
    async fn find_all(&self, cri: &SearchCriteria) -> Result<ProductListResponse, ServiceError>;
    async fn find_by_id(&self, pro_num: i32) -> Result<ProductResponse, ServiceError>;
    async fn image(&self, date_folder: &str, file_name: &str) -> Result<StoredFile, ServiceError>;
}

#[async_trait]
pub trait ProductCommandServiceTrait {
    async fn create(&self, req: CreateProductRequest) -> Result<ProductResponse, ServiceError>;
    async fn update(&self, req: UpdateProductRequest) -> Result<ProductResponse, ServiceError>;
    async fn delete(&self, pro_num: i32) -> Result<(), ServiceError>;
    /// Number of rows removed.
    async fn delete_selected(&self, filter: &ProductDeleteFilter) -> Result<usize, ServiceError>;
}
