use crate::{
    abstract_trait::product::{ProductCommandRepositoryTrait, ProductQueryRepositoryTrait},
    domain::requests::product::{ProductDeleteFilter, ProductForm},
    model::product::Product,
    utils::SearchCriteria,
};
use async_trait::async_trait;
use shared::{config::ConnectionPool, errors::RepositoryError};
use tracing::{error, info};

/// `N` matches the name, `P` the publisher, `NP` either. Without a keyword
/// every row matches.
const SEARCH_FILTER: &str = r#"
    $1::TEXT IS NULL
    OR ($2::TEXT = 'N' AND pro_name ILIKE '%' || $1 || '%')
    OR ($2::TEXT = 'P' AND pro_publisher ILIKE '%' || $1 || '%')
    OR ($2::TEXT = 'NP' AND (pro_name ILIKE '%' || $1 || '%' OR pro_publisher ILIKE '%' || $1 || '%'))
"#;

fn escape_like(keyword: &str) -> String {
    let mut out = String::with_capacity(keyword.len());
    for c in keyword.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn search_binds(cri: &SearchCriteria) -> (Option<String>, Option<&'static str>) {
    match cri.search() {
        Some((search_type, keyword)) => (Some(escape_like(keyword)), Some(search_type.as_str())),
        None => (None, None),
    }
}

#[derive(Clone)]
pub struct ProductQueryRepository {
    db: ConnectionPool,
}

impl ProductQueryRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for ProductQueryRepository {
    async fn find_all(&self, cri: &SearchCriteria) -> Result<Vec<Product>, RepositoryError> {
        info!(
            "🔍 Fetching products | page: {}, size: {}, search: {:?}",
            cri.criteria.page(),
            cri.criteria.per_page_num(),
            cri.search()
        );

        let mut conn = self.db.acquire().await.map_err(|e| {
            error!("❌ Failed to acquire DB connection: {:?}", e);
            RepositoryError::from(e)
        })?;

        let (keyword, search_type) = search_binds(cri);
        let sql = format!(
            "SELECT * FROM products WHERE {SEARCH_FILTER} ORDER BY pro_num DESC LIMIT $3 OFFSET $4"
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(keyword)
            .bind(search_type)
            .bind(i64::from(cri.criteria.per_page_num()))
            .bind(cri.criteria.page_start())
            .fetch_all(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch products: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn count(&self, cri: &SearchCriteria) -> Result<i64, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        let (keyword, search_type) = search_binds(cri);
        let sql = format!("SELECT COUNT(*) FROM products WHERE {SEARCH_FILTER}");

        sqlx::query_scalar::<_, i64>(&sql)
            .bind(keyword)
            .bind(search_type)
            .fetch_one(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to count products: {:?}", e);
                RepositoryError::from(e)
            })
    }

    async fn find_by_id(&self, pro_num: i32) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Product>("SELECT * FROM products WHERE pro_num = $1")
            .bind(pro_num)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to fetch product {}: {:?}", pro_num, e);
                RepositoryError::from(e)
            })
    }
}

#[derive(Clone)]
pub struct ProductCommandRepository {
    db: ConnectionPool,
}

impl ProductCommandRepository {
    pub fn new(db: ConnectionPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for ProductCommandRepository {
    async fn create(
        &self,
        form: &ProductForm,
        pro_up_folder: &str,
        pro_img: &str,
    ) -> Result<Product, RepositoryError> {
        info!("🆕 Inserting product '{}'", form.pro_name);

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (
                cate_code, pro_name, pro_price, pro_discount, pro_publisher,
                pro_content, pro_up_folder, pro_img, pro_amount, pro_buy
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(form.cate_code)
        .bind(&form.pro_name)
        .bind(form.pro_price)
        .bind(form.pro_discount)
        .bind(&form.pro_publisher)
        .bind(&form.pro_content)
        .bind(pro_up_folder)
        .bind(pro_img)
        .bind(form.pro_amount)
        .bind(&form.pro_buy)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to insert product '{}': {:?}", form.pro_name, e);
            RepositoryError::from(e)
        })
    }

    async fn update(
        &self,
        pro_num: i32,
        form: &ProductForm,
        pro_up_folder: &str,
        pro_img: &str,
    ) -> Result<Product, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET cate_code = $2,
                pro_name = $3,
                pro_price = $4,
                pro_discount = $5,
                pro_publisher = $6,
                pro_content = $7,
                pro_up_folder = $8,
                pro_img = $9,
                pro_amount = $10,
                pro_buy = $11,
                pro_updatedate = CURRENT_TIMESTAMP
            WHERE pro_num = $1
            RETURNING *
            "#,
        )
        .bind(pro_num)
        .bind(form.cate_code)
        .bind(&form.pro_name)
        .bind(form.pro_price)
        .bind(form.pro_discount)
        .bind(&form.pro_publisher)
        .bind(&form.pro_content)
        .bind(pro_up_folder)
        .bind(pro_img)
        .bind(form.pro_amount)
        .bind(&form.pro_buy)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to update product {}: {:?}", pro_num, e);
            RepositoryError::from(e)
        })
    }

    async fn delete(&self, pro_num: i32) -> Result<Option<Product>, RepositoryError> {
        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Product>("DELETE FROM products WHERE pro_num = $1 RETURNING *")
            .bind(pro_num)
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                error!("❌ Failed to delete product {}: {:?}", pro_num, e);
                RepositoryError::from(e)
            })
    }

    async fn delete_selected(
        &self,
        filter: &ProductDeleteFilter,
    ) -> Result<Vec<Product>, RepositoryError> {
        info!(
            "🗑️ Deleting products {:?} (name filter: {:?})",
            filter.pro_nums, filter.pro_name
        );

        let mut conn = self.db.acquire().await.map_err(RepositoryError::from)?;

        sqlx::query_as::<_, Product>(
            r#"
            DELETE FROM products
            WHERE pro_num = ANY($1)
              AND ($2::TEXT IS NULL OR pro_name = $2)
            RETURNING *
            "#,
        )
        .bind(&filter.pro_nums)
        .bind(&filter.pro_name)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| {
            error!("❌ Failed to delete selected products: {:?}", e);
            RepositoryError::from(e)
        })
    }
}
