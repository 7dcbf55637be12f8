use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
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
    pub pro_date: Option<NaiveDateTime>,
    pub pro_updatedate: Option<NaiveDateTime>,
}
