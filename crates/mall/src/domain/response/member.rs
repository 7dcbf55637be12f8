use crate::model::member::Member;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A member as shown to the member, never carrying the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemberResponse {
    pub mbsp_id: String,
    pub mbsp_name: String,
    pub mbsp_email: String,
    pub mbsp_zipcode: Option<String>,
    pub mbsp_addr: Option<String>,
    pub mbsp_deaddr: Option<String>,
    pub mbsp_phone: Option<String>,
    pub mbsp_nick: Option<String>,
    pub mbsp_receive: String,
    pub mbsp_point: i32,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub mbsp_lastlogin: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub mbsp_datesub: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = DateTime)]
    pub mbsp_updatedate: Option<NaiveDateTime>,
}

impl From<Member> for MemberResponse {
    fn from(value: Member) -> Self {
        MemberResponse {
            mbsp_id: value.mbsp_id,
            mbsp_name: value.mbsp_name,
            mbsp_email: value.mbsp_email,
            mbsp_zipcode: value.mbsp_zipcode,
            mbsp_addr: value.mbsp_addr,
            mbsp_deaddr: value.mbsp_deaddr,
            mbsp_phone: value.mbsp_phone,
            mbsp_nick: value.mbsp_nick,
            mbsp_receive: value.mbsp_receive,
            mbsp_point: value.mbsp_point,
            mbsp_lastlogin: value.mbsp_lastlogin,
            mbsp_datesub: value.mbsp_datesub,
            mbsp_updatedate: value.mbsp_updatedate,
        }
    }
}
