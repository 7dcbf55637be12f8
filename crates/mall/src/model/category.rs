use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A node of the two-level category tree. `cate_prtcode` is `None` for a
/// first-level category.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub cate_code: i32,
    pub cate_prtcode: Option<i32>,
    pub cate_name: String,
}
