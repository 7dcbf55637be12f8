use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Admin {
    pub ad_userid: String,
    pub ad_passwd: String,
    pub login_date: Option<NaiveDateTime>,
}
