use askama::{Error, Template};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// Content of a transactional mail: signup auth code or temporary password.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailTemplateData {
    pub title: String,
    pub message: String,
    pub code: String,
    pub link: String,
}

#[derive(Template, Debug)]
#[template(path = "email.html")]
pub struct EmailTemplate<'a> {
    pub title: &'a str,
    pub message: &'a str,
    pub code: &'a str,
    pub link: &'a str,
}

impl<'a> From<&'a EmailTemplateData> for EmailTemplate<'a> {
    fn from(data: &'a EmailTemplateData) -> Self {
        EmailTemplate {
            title: data.title.as_str(),
            message: data.message.as_str(),
            code: data.code.as_str(),
            link: data.link.as_str(),
        }
    }
}

pub fn render_email(data: &EmailTemplateData) -> Result<String, Error> {
    info!("📧 Rendering email template: {}", data.title);

    let template = EmailTemplate::from(data);
    match template.render() {
        Ok(result) => {
            info!("✅ Successfully rendered email template.");
            Ok(result)
        }
        Err(e) => {
            error!("❌ Failed to render email template: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_mail_contains_code_and_escapes_message() {
        let data = EmailTemplateData {
            title: "DocMall sign-up code".into(),
            message: "<b>welcome</b>".into(),
            code: "482913".into(),
            link: "http://localhost:8080/member/join".into(),
        };

        let html = render_email(&data).unwrap();

        assert!(html.contains("482913"));
        assert!(html.contains("DocMall sign-up code"));
        assert!(!html.contains("<b>welcome</b>"));
    }
}
