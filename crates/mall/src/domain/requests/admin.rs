use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct AdminLoginRequest {
    #[validate(length(min = 1, message = "Admin id is required"))]
    pub ad_userid: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub ad_passwd: String,
}
