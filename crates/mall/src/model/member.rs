use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Member {
    pub mbsp_id: String,
    pub mbsp_name: String,
    pub mbsp_email: String,
    pub mbsp_password: String,
    pub mbsp_zipcode: Option<String>,
    pub mbsp_addr: Option<String>,
    pub mbsp_deaddr: Option<String>,
    pub mbsp_phone: Option<String>,
    pub mbsp_nick: Option<String>,
    /// `Y` when the member accepts marketing mail.
    pub mbsp_receive: String,
    pub mbsp_point: i32,
    pub mbsp_lastlogin: Option<NaiveDateTime>,
    pub mbsp_datesub: Option<NaiveDateTime>,
    pub mbsp_updatedate: Option<NaiveDateTime>,
}
