use serde::Deserialize;
use utoipa::IntoParams;

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthCodeQuery {
    #[serde(rename = "receiverMail")]
    pub receiver_mail: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConfirmAuthCodeQuery {
    pub authcode: String,
}
