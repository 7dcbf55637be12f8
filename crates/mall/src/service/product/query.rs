use crate::{
    abstract_trait::product::{DynProductQueryRepository, ProductQueryServiceTrait},
    domain::response::{
        pagination::Pagination,
        product::{ProductListResponse, ProductResponse},
    },
    utils::{FileStorage, SearchCriteria, StoredFile},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::TracingContext};
use tracing::{error, info};

const TRACER: &str = "product-query-service";

#[derive(Clone)]
pub struct ProductQueryService {
    query: DynProductQueryRepository,
    storage: FileStorage,
}

impl ProductQueryService {
    pub fn new(query: DynProductQueryRepository, storage: FileStorage) -> Self {
        Self { query, storage }
    }
}

#[async_trait]
impl ProductQueryServiceTrait for ProductQueryService {
    async fn find_all(&self, cri: &SearchCriteria) -> Result<ProductListResponse, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "product_find_all",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("page", cri.criteria.page().to_string()),
                KeyValue::new("per_page_num", cri.criteria.per_page_num().to_string()),
                KeyValue::new("keyword", cri.keyword.clone().unwrap_or_default()),
            ],
        );

        let products = match self.query.find_all(cri).await {
            Ok(products) => products,
            Err(e) => {
                error!("❌ Failed to fetch products: {e:?}");
                ctx.complete(false, &e.to_string());
                return Err(ServiceError::Repo(e));
            }
        };

        let total = match self.query.count(cri).await {
            Ok(total) => total,
            Err(e) => {
                error!("❌ Failed to count products: {e:?}");
                ctx.complete(false, &e.to_string());
                return Err(ServiceError::Repo(e));
            }
        };

        info!("✅ Found {} products (total: {total})", products.len());
        ctx.complete(true, "products listed");

        Ok(ProductListResponse {
            items: products.into_iter().map(ProductResponse::from).collect(),
            pagination: Pagination::new(&cri.criteria, total),
            search_type: cri.search_type.map(|t| t.as_str().to_string()),
            keyword: cri.keyword.clone(),
        })
    }

    async fn find_by_id(&self, pro_num: i32) -> Result<ProductResponse, ServiceError> {
        self.query
            .find_by_id(pro_num)
            .await?
            .map(ProductResponse::from)
            .ok_or_else(|| ServiceError::NotFound(format!("Product {pro_num} not found")))
    }

    async fn image(&self, date_folder: &str, file_name: &str) -> Result<StoredFile, ServiceError> {
        Ok(self.storage.get_file(date_folder, file_name).await?)
    }
}
