use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
}

/// What a server-rendered page needs: the view to render, the flash
/// attributes consumed by this request and the page model.
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct ViewResponse<T> {
    pub status: String,
    pub view: String,
    pub flash: BTreeMap<String, String>,
    pub data: T,
}

impl<T> ViewResponse<T> {
    pub fn new(view: impl Into<String>, flash: BTreeMap<String, String>, data: T) -> Self {
        Self {
            status: "success".to_string(),
            view: view.into(),
            flash,
            data,
        }
    }
}
