use crate::model::member::Member;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminAuth {
    pub ad_userid: String,
    pub login_date: Option<NaiveDateTime>,
}

/// Server-side session state, stored as JSON under `session:{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default)]
    pub admin_auth: Option<AdminAuth>,
    /// Logged-in member with the password hash blanked.
    #[serde(default)]
    pub login_auth: Option<Member>,
    #[serde(default, rename = "targetUrl")]
    pub target_url: Option<String>,
    #[serde(default, rename = "postData")]
    pub post_data: Option<String>,
    #[serde(default)]
    pub authcode: Option<String>,
    #[serde(default)]
    pub flash: BTreeMap<String, String>,
}
