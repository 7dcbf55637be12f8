use serde::{Deserialize, Deserializer};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// HTML checkboxes send `Y` when ticked and nothing otherwise.
fn yes_no<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw.as_deref().map(str::trim) {
        Some("Y") | Some("y") | Some("on") | Some("true") => "Y".to_string(),
        _ => "N".to_string(),
    })
}

fn default_no() -> String {
    "N".to_string()
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct JoinMemberRequest {
    #[validate(length(min = 4, max = 20, message = "Id must be 4 to 20 characters"))]
    pub mbsp_id: String,

    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub mbsp_name: String,

    #[validate(
        email(message = "Email is invalid"),
        length(max = 100, message = "Email is at most 100 characters")
    )]
    pub mbsp_email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub mbsp_password: String,

    #[validate(length(max = 10, message = "Zipcode is at most 10 characters"))]
    pub mbsp_zipcode: Option<String>,

    #[validate(length(max = 100, message = "Address is at most 100 characters"))]
    pub mbsp_addr: Option<String>,

    #[validate(length(max = 100, message = "Detail address is at most 100 characters"))]
    pub mbsp_deaddr: Option<String>,

    #[validate(length(max = 20, message = "Phone is at most 20 characters"))]
    pub mbsp_phone: Option<String>,

    #[validate(length(max = 30, message = "Nickname is at most 30 characters"))]
    pub mbsp_nick: Option<String>,

    #[serde(default = "default_no", deserialize_with = "yes_no")]
    pub mbsp_receive: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub mbsp_id: String,
    pub mbsp_password: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct ModifyMemberRequest {
    #[validate(length(min = 1, max = 50, message = "Name is required"))]
    pub mbsp_name: String,

    #[validate(
        email(message = "Email is invalid"),
        length(max = 100, message = "Email is at most 100 characters")
    )]
    pub mbsp_email: String,

    #[validate(length(max = 10, message = "Zipcode is at most 10 characters"))]
    pub mbsp_zipcode: Option<String>,

    #[validate(length(max = 100, message = "Address is at most 100 characters"))]
    pub mbsp_addr: Option<String>,

    #[validate(length(max = 100, message = "Detail address is at most 100 characters"))]
    pub mbsp_deaddr: Option<String>,

    #[validate(length(max = 20, message = "Phone is at most 20 characters"))]
    pub mbsp_phone: Option<String>,

    #[validate(length(max = 30, message = "Nickname is at most 30 characters"))]
    pub mbsp_nick: Option<String>,

    #[serde(default = "default_no", deserialize_with = "yes_no")]
    pub mbsp_receive: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct PasswordChangeRequest {
    pub cur_pw: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub new_pw: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdCheckQuery {
    pub mbsp_id: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IdSearchQuery {
    pub mbsp_name: String,
    pub mbsp_email: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TempPasswordQuery {
    pub mbsp_id: String,
    pub mbsp_email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receive_flag_defaults_to_no() {
        let req: JoinMemberRequest = serde_json::from_value(serde_json::json!({
            "mbsp_id": "kim01",
            "mbsp_name": "Kim",
            "mbsp_email": "kim@example.com",
            "mbsp_password": "secret1",
        }))
        .unwrap();
        assert_eq!(req.mbsp_receive, "N");

        let req: JoinMemberRequest = serde_json::from_value(serde_json::json!({
            "mbsp_id": "kim01",
            "mbsp_name": "Kim",
            "mbsp_email": "kim@example.com",
            "mbsp_password": "secret1",
            "mbsp_receive": "on",
        }))
        .unwrap();
        assert_eq!(req.mbsp_receive, "Y");
    }

    #[test]
    fn join_validation_checks_id_password_and_email() {
        let req = JoinMemberRequest {
            mbsp_id: "ab".into(),
            mbsp_name: "Kim".into(),
            mbsp_email: "not-an-email".into(),
            mbsp_password: "123".into(),
            mbsp_zipcode: None,
            mbsp_addr: None,
            mbsp_deaddr: None,
            mbsp_phone: None,
            mbsp_nick: None,
            mbsp_receive: "N".into(),
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("mbsp_id"));
        assert!(fields.contains_key("mbsp_email"));
        assert!(fields.contains_key("mbsp_password"));
        assert!(!fields.contains_key("mbsp_name"));
    }

    #[test]
    fn profile_fields_are_bounded_by_their_columns() {
        let req = ModifyMemberRequest {
            mbsp_name: "Kim".into(),
            mbsp_email: format!("{}@example.com", "k".repeat(90)),
            mbsp_zipcode: Some("12345".into()),
            mbsp_addr: Some("x".repeat(100)),
            mbsp_deaddr: Some("y".repeat(101)),
            mbsp_phone: None,
            mbsp_nick: Some("n".repeat(31)),
            mbsp_receive: "N".into(),
        };

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("mbsp_email"));
        assert!(fields.contains_key("mbsp_deaddr"));
        assert!(fields.contains_key("mbsp_nick"));
        assert!(!fields.contains_key("mbsp_addr"));
        assert!(!fields.contains_key("mbsp_zipcode"));
    }

    #[test]
    fn new_password_needs_six_characters() {
        let short = PasswordChangeRequest {
            cur_pw: "whatever".into(),
            new_pw: "12345".into(),
        };
        assert!(short.validate().is_err());

        let ok = PasswordChangeRequest {
            cur_pw: "whatever".into(),
            new_pw: "123456".into(),
        };
        assert!(ok.validate().is_ok());
    }
}
