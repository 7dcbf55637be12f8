use crate::utils::CriteriaParams;
use serde::Deserialize;
use std::collections::HashMap;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Text fields of the product insert and edit forms.
#[derive(Debug, Clone, Default, Validate, ToSchema)]
pub struct ProductForm {
    #[validate(range(min = 1, message = "Category is required"))]
    pub cate_code: i32,

    #[validate(length(min = 1, max = 100, message = "Product name is required"))]
    pub pro_name: String,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub pro_price: i32,

    #[validate(range(min = 0, max = 100, message = "Discount must be 0 to 100"))]
    pub pro_discount: i32,

    #[validate(length(min = 1, max = 100, message = "Publisher is required"))]
    pub pro_publisher: String,

    pub pro_content: String,

    #[validate(range(min = 0, message = "Amount must not be negative"))]
    pub pro_amount: i32,

    #[validate(length(equal = 1, message = "Buyable flag must be Y or N"))]
    pub pro_buy: String,
}

impl ProductForm {
    /// Builds the form from multipart text fields. Numbers that do not parse
    /// are reported per field.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();

        let mut number = |name: &str, required: bool| -> i32 {
            match fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
                Some(raw) => raw.parse::<i32>().unwrap_or_else(|_| {
                    errors.push(format!("{name}: must be a number"));
                    0
                }),
                None if required => {
                    errors.push(format!("{name}: is required"));
                    0
                }
                None => 0,
            }
        };

        let cate_code = number("cate_code", true);
        let pro_price = number("pro_price", true);
        let pro_discount = number("pro_discount", false);
        let pro_amount = number("pro_amount", false);

        let text = |name: &str| fields.get(name).map(|v| v.trim().to_string()).unwrap_or_default();

        let pro_buy = match text("pro_buy").as_str() {
            "N" | "n" => "N".to_string(),
            _ => "Y".to_string(),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            cate_code,
            pro_name: text("pro_name"),
            pro_price,
            pro_discount,
            pro_publisher: text("pro_publisher"),
            pro_content: fields.get("pro_content").cloned().unwrap_or_default(),
            pro_amount,
            pro_buy,
        })
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct CreateProductRequest {
    pub form: ProductForm,
    pub image: UploadedFile,
}

#[derive(Debug, Clone)]
pub struct UpdateProductRequest {
    pub pro_num: i32,
    pub form: ProductForm,
    pub image: Option<UploadedFile>,
}

/// Lookup for a selection delete: the checked ids, optionally narrowed to
/// rows whose name matches exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductDeleteFilter {
    pub pro_nums: Vec<i32>,
    pub pro_name: Option<String>,
}

impl ProductDeleteFilter {
    pub fn new(pro_nums: Vec<i32>, pro_name: Option<String>) -> Self {
        let pro_name = pro_name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self { pro_nums, pro_name }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductSelectDeleteForm {
    #[serde(default)]
    pub check: Vec<i32>,
    pub pro_name: Option<String>,
    pub page: Option<String>,
    #[serde(rename = "perPageNum")]
    pub per_page_num: Option<String>,
    #[serde(rename = "searchType")]
    pub search_type: Option<String>,
    pub keyword: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ProductDeleteForm {
    pub pro_num: i32,
    pub page: Option<String>,
    #[serde(rename = "perPageNum")]
    pub per_page_num: Option<String>,
    #[serde(rename = "searchType")]
    pub search_type: Option<String>,
    pub keyword: Option<String>,
}

macro_rules! criteria_params {
    ($ty:ty) => {
        impl $ty {
            pub fn criteria_params(&self) -> CriteriaParams {
                CriteriaParams {
                    page: self.page.clone(),
                    per_page_num: self.per_page_num.clone(),
                    search_type: self.search_type.clone(),
                    keyword: self.keyword.clone(),
                }
            }
        }
    };
}

criteria_params!(ProductSelectDeleteForm);
criteria_params!(ProductDeleteForm);

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductEditQuery {
    pub pro_num: i32,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ImageDisplayQuery {
    #[serde(rename = "dateFolderName")]
    pub date_folder_name: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn form_parses_multipart_fields() {
        let form = ProductForm::from_fields(&fields(&[
            ("cate_code", "11"),
            ("pro_name", " Rust in Action "),
            ("pro_price", "32000"),
            ("pro_discount", "10"),
            ("pro_publisher", "Manning"),
            ("pro_content", "<p>systems</p>"),
            ("pro_amount", "5"),
            ("pro_buy", "N"),
        ]))
        .unwrap();

        assert_eq!(form.cate_code, 11);
        assert_eq!(form.pro_name, "Rust in Action");
        assert_eq!(form.pro_discount, 10);
        assert_eq!(form.pro_buy, "N");
        assert!(form.validate().is_ok());
    }

    #[test]
    fn form_reports_bad_numbers() {
        let errors = ProductForm::from_fields(&fields(&[
            ("cate_code", "eleven"),
            ("pro_name", "x"),
        ]))
        .unwrap_err();

        assert!(errors.iter().any(|e| e.starts_with("cate_code")));
        assert!(errors.iter().any(|e| e.starts_with("pro_price")));
    }

    #[test]
    fn discount_over_hundred_fails_validation() {
        let form = ProductForm {
            cate_code: 11,
            pro_name: "Book".into(),
            pro_price: 1000,
            pro_discount: 150,
            pro_publisher: "Pub".into(),
            pro_content: String::new(),
            pro_amount: 1,
            pro_buy: "Y".into(),
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn blank_name_filter_is_dropped() {
        let filter = ProductDeleteFilter::new(vec![1, 2], Some("  ".into()));
        assert_eq!(filter.pro_name, None);
    }
}
