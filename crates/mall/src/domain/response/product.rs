use crate::{
    domain::response::{category::CategoryResponse, pagination::Pagination},
    model::product::Product,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductResponse {
    pub pro_num: i32,
    pub cate_code: i32,
    pub pro_name: String,
    pub pro_price: i32,
    pub pro_discount: i32,
    pub pro_publisher: String,
    pub pro_content: String,
    pub pro_up_folder: String,
    pub pro_img: String,
    pub pro_amount: i32,
    pub pro_buy: String,
    pub pro_review: i32,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub pro_date: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub pro_updatedate: Option<NaiveDateTime>,
}

impl From<Product> for ProductResponse {
    fn from(value: Product) -> Self {
        ProductResponse {
            pro_num: value.pro_num,
            cate_code: value.cate_code,
            pro_name: value.pro_name,
            pro_price: value.pro_price,
            pro_discount: value.pro_discount,
            pro_publisher: value.pro_publisher,
            pro_content: value.pro_content,
            pro_up_folder: value.pro_up_folder,
            pro_img: value.pro_img,
            pro_amount: value.pro_amount,
            pro_buy: value.pro_buy,
            pro_review: value.pro_review,
            pro_date: value.pro_date,
            pro_updatedate: value.pro_updatedate,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub items: Vec<ProductResponse>,
    pub pagination: Pagination,
    #[serde(rename = "searchType")]
    pub search_type: Option<String>,
    pub keyword: Option<String>,
}

/// Everything the product edit form needs in one payload.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductEditResponse {
    pub product: ProductResponse,
    pub first_categories: Vec<CategoryResponse>,
    pub second_categories: Vec<CategoryResponse>,
    pub parent_category: Option<CategoryResponse>,
    /// Query string of the listing the edit was opened from.
    pub criteria: String,
}
