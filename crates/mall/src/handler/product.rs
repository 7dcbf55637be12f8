use crate::{
    abstract_trait::{
        category::DynCategoryService,
        product::{DynProductCommandService, DynProductQueryService},
    },
    domain::{
        requests::product::{
            CreateProductRequest, ImageDisplayQuery, ProductDeleteFilter, ProductDeleteForm,
            ProductEditQuery, ProductForm, ProductSelectDeleteForm, UpdateProductRequest,
            UploadedFile,
        },
        response::{
            api::ViewResponse,
            category::CategoryResponse,
            product::{ProductEditResponse, ProductListResponse},
        },
    },
    middleware::{auth::require_admin, session::CurrentSession},
    state::AppState,
    utils::{CriteriaParams, SearchCriteria},
};
use axum::{
    Extension, Json, Router,
    extract::{Multipart, Query},
    http::{StatusCode, header::CONTENT_TYPE},
    middleware,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::Form;
use shared::errors::HttpError;
use std::{collections::HashMap, sync::Arc};
use tracing::{info, warn};

const IMAGE_FIELD: &str = "pro_img_upload";
const LIST_PATH: &str = "/admin/product/pro_list";

/// Text fields and the optional image of a product multipart form.
struct ProductMultipart {
    fields: HashMap<String, String>,
    image: Option<UploadedFile>,
}

impl ProductMultipart {
    async fn read(mut multipart: Multipart) -> Result<Self, HttpError> {
        let mut fields = HashMap::new();
        let mut image = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| HttpError::BadRequest(format!("Invalid multipart body: {e}")))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| HttpError::BadRequest(format!("Failed to read upload: {e}")))?;

                // browsers send an empty part when no file was chosen
                if !file_name.is_empty() && !bytes.is_empty() {
                    image = Some(UploadedFile {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
                continue;
            }

            let value = field
                .text()
                .await
                .map_err(|e| HttpError::BadRequest(format!("Failed to read field {name}: {e}")))?;
            fields.insert(name, value);
        }

        Ok(Self { fields, image })
    }

    fn form(&self) -> Result<ProductForm, HttpError> {
        ProductForm::from_fields(&self.fields).map_err(|errors| HttpError::BadRequest(errors.join("; ")))
    }

    fn criteria(&self) -> SearchCriteria {
        SearchCriteria::from(CriteriaParams {
            page: self.fields.get("page").cloned(),
            per_page_num: self.fields.get("perPageNum").cloned(),
            search_type: self.fields.get("searchType").cloned(),
            keyword: self.fields.get("keyword").cloned(),
        })
    }
}

fn back_to_list(cri: &SearchCriteria) -> Redirect {
    Redirect::to(&format!("{LIST_PATH}?{}", cri.to_query_string()))
}

pub async fn insert_form(
    Extension(categories): Extension<DynCategoryService>,
    session: CurrentSession,
) -> Result<impl IntoResponse, HttpError> {
    let flash = session.take_flash().await;
    let first_categories = categories.first_categories().await?;

    Ok(Json(ViewResponse::new(
        "admin/product/pro_insert",
        flash,
        first_categories,
    )))
}

pub async fn insert(
    Extension(service): Extension<DynProductCommandService>,
    multipart: Multipart,
) -> Result<Redirect, HttpError> {
    let upload = ProductMultipart::read(multipart).await?;
    let form = upload.form()?;

    let Some(image) = upload.image else {
        return Err(HttpError::BadRequest(format!(
            "{IMAGE_FIELD}: a product image is required"
        )));
    };

    let product = service.create(CreateProductRequest { form, image }).await?;
    info!("📦 Product {} registered", product.pro_num);

    Ok(Redirect::to(LIST_PATH))
}

#[utoipa::path(
    get,
    path = "/admin/product/pro_list",
    tag = "Product",
    params(CriteriaParams),
    responses(
        (status = 200, description = "One page of products", body = ViewResponse<ProductListResponse>),
        (status = 303, description = "Not logged in as admin")
    )
)]
pub async fn get_products(
    Extension(service): Extension<DynProductQueryService>,
    session: CurrentSession,
    Query(params): Query<CriteriaParams>,
) -> Result<impl IntoResponse, HttpError> {
    let cri = SearchCriteria::from(params);
    let flash = session.take_flash().await;
    let list = service.find_all(&cri).await?;

    Ok(Json(ViewResponse::new("admin/product/pro_list", flash, list)))
}

pub async fn delete_selected(
    Extension(service): Extension<DynProductCommandService>,
    Form(form): Form<ProductSelectDeleteForm>,
) -> Result<Redirect, HttpError> {
    let cri = SearchCriteria::from(form.criteria_params());
    let filter = ProductDeleteFilter::new(form.check, form.pro_name);

    let deleted = service.delete_selected(&filter).await?;
    if deleted < filter.pro_nums.len() {
        warn!(
            "⚠️ Only {deleted} of {} selected products matched",
            filter.pro_nums.len()
        );
    }

    Ok(back_to_list(&cri))
}

#[utoipa::path(
    get,
    path = "/admin/product/pro_edit",
    tag = "Product",
    params(ProductEditQuery, CriteriaParams),
    responses(
        (status = 200, description = "Edit form data", body = ViewResponse<ProductEditResponse>),
        (status = 404, description = "No such product")
    )
)]
pub async fn get_product_edit(
    Extension(products): Extension<DynProductQueryService>,
    Extension(categories): Extension<DynCategoryService>,
    session: CurrentSession,
    Query(query): Query<ProductEditQuery>,
    Query(params): Query<CriteriaParams>,
) -> Result<impl IntoResponse, HttpError> {
    let flash = session.take_flash().await;
    let cri = SearchCriteria::from(params);

    let product = products.find_by_id(query.pro_num).await?;
    let first_categories = categories.first_categories().await?;
    let parent_category = categories.parent_of(product.cate_code).await?;

    let second_categories: Vec<CategoryResponse> = match &parent_category {
        Some(parent) => categories.second_categories(parent.cate_code).await?,
        None => Vec::new(),
    };

    Ok(Json(ViewResponse::new(
        "admin/product/pro_edit",
        flash,
        ProductEditResponse {
            product,
            first_categories,
            second_categories,
            parent_category,
            criteria: cri.to_query_string(),
        },
    )))
}

pub async fn edit(
    Extension(service): Extension<DynProductCommandService>,
    multipart: Multipart,
) -> Result<Redirect, HttpError> {
    let upload = ProductMultipart::read(multipart).await?;
    let form = upload.form()?;
    let cri = upload.criteria();

    let pro_num = upload
        .fields
        .get("pro_num")
        .and_then(|v| v.trim().parse::<i32>().ok())
        .ok_or_else(|| HttpError::BadRequest("pro_num: must be a number".to_string()))?;

    service
        .update(UpdateProductRequest {
            pro_num,
            form,
            image: upload.image,
        })
        .await?;

    Ok(back_to_list(&cri))
}

pub async fn delete(
    Extension(service): Extension<DynProductCommandService>,
    Form(form): Form<ProductDeleteForm>,
) -> Result<Redirect, HttpError> {
    let cri = SearchCriteria::from(form.criteria_params());
    service.delete(form.pro_num).await?;

    Ok(back_to_list(&cri))
}

#[utoipa::path(
    get,
    path = "/admin/product/image_display",
    tag = "Product",
    params(ImageDisplayQuery),
    responses(
        (status = 200, description = "Stored file bytes"),
        (status = 400, description = "Path escapes the upload root"),
        (status = 404, description = "File not found")
    )
)]
pub async fn image_display(
    Extension(service): Extension<DynProductQueryService>,
    Query(query): Query<ImageDisplayQuery>,
) -> Result<Response, HttpError> {
    let file = service
        .image(&query.date_folder_name, &query.file_name)
        .await?;

    Ok((StatusCode::OK, [(CONTENT_TYPE, file.content_type)], file.bytes).into_response())
}

pub fn product_routes(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/admin/product/pro_insert", get(insert_form).post(insert))
        .route("/admin/product/pro_list", get(get_products))
        .route(
            "/admin/product/pro_sel_delete",
            post(delete_selected),
        )
        .route("/admin/product/pro_edit", get(get_product_edit).post(edit))
        .route("/admin/product/pro_delete", post(delete))
        .route("/admin/product/image_display", get(image_display))
        .route_layer(middleware::from_fn(require_admin))
        .layer(Extension(app_state.di_container.product_query.clone()))
        .layer(Extension(app_state.di_container.product_command.clone()))
        .layer(Extension(app_state.di_container.category_service.clone()))
}
