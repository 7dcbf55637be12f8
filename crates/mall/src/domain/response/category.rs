use crate::model::category::Category;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct CategoryResponse {
    pub cate_code: i32,
    pub cate_prtcode: Option<i32>,
    pub cate_name: String,
}

impl From<Category> for CategoryResponse {
    fn from(value: Category) -> Self {
        CategoryResponse {
            cate_code: value.cate_code,
            cate_prtcode: value.cate_prtcode,
            cate_name: value.cate_name,
        }
    }
}
