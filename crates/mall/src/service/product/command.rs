use crate::{
    abstract_trait::product::{
        DynProductCommandRepository, DynProductQueryRepository, ProductCommandServiceTrait,
    },
    domain::{
        requests::product::{
            CreateProductRequest, ProductDeleteFilter, ProductForm, UpdateProductRequest,
        },
        response::product::ProductResponse,
    },
    model::product::Product,
    utils::FileStorage,
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use shared::{errors::ServiceError, utils::TracingContext};
use tracing::{error, info, warn};
use validator::Validate;

const TRACER: &str = "product-command-service";

#[derive(Clone)]
pub struct ProductCommandService {
    command: DynProductCommandRepository,
    query: DynProductQueryRepository,
    storage: FileStorage,
}

impl ProductCommandService {
    pub fn new(
        command: DynProductCommandRepository,
        query: DynProductQueryRepository,
        storage: FileStorage,
    ) -> Self {
        Self {
            command,
            query,
            storage,
        }
    }

    fn validate(form: &ProductForm) -> Result<(), ServiceError> {
        form.validate().map_err(|errors| {
            let mut messages: Vec<String> = errors
                .field_errors()
                .into_iter()
                .map(|(field, errs)| {
                    let detail = errs
                        .first()
                        .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                        .unwrap_or_else(|| "invalid".to_string());
                    format!("{field}: {detail}")
                })
                .collect();
            messages.sort();
            ServiceError::Validation(messages)
        })
    }

    /// Removes a file written for a row change that did not happen. The
    /// original failure is what the caller sees.
    async fn discard_upload(&self, folder: &str, file_name: &str) {
        if let Err(e) = self.storage.delete(folder, file_name).await {
            error!("❌ Failed to discard upload {folder}/{file_name}: {e}");
        }
    }

    async fn remove_images(&self, products: &[Product]) -> Result<(), ServiceError> {
        let mut first_error = None;

        for product in products {
            if let Err(e) = self
                .storage
                .delete(&product.pro_up_folder, &product.pro_img)
                .await
            {
                error!(
                    "❌ Failed to remove image {}/{} of product {}: {e}",
                    product.pro_up_folder, product.pro_img, product.pro_num
                );
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ProductCommandServiceTrait for ProductCommandService {
    async fn create(&self, req: CreateProductRequest) -> Result<ProductResponse, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "product_create",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("pro_name", req.form.pro_name.clone()),
            ],
        );

        if let Err(e) = Self::validate(&req.form) {
            ctx.complete(false, "validation failed");
            return Err(e);
        }

        let folder = FileStorage::date_folder();
        let stored = match self
            .storage
            .upload_file(&folder, &req.image.file_name, &req.image.bytes)
            .await
        {
            Ok(name) => name,
            Err(e) => {
                ctx.complete(false, &e.to_string());
                return Err(e.into());
            }
        };

        match self.command.create(&req.form, &folder, &stored).await {
            Ok(product) => {
                info!("✅ Product created: {} ({})", product.pro_name, product.pro_num);
                ctx.complete(true, "product created");
                Ok(ProductResponse::from(product))
            }
            Err(e) => {
                error!("❌ Product insert failed, discarding upload: {e:?}");
                self.discard_upload(&folder, &stored).await;
                ctx.complete(false, &e.to_string());
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn update(&self, req: UpdateProductRequest) -> Result<ProductResponse, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "product_update",
            vec![
                KeyValue::new("component", "product"),
                KeyValue::new("pro_num", req.pro_num.to_string()),
            ],
        );

        if let Err(e) = Self::validate(&req.form) {
            ctx.complete(false, "validation failed");
            return Err(e);
        }

        let Some(existing) = self.query.find_by_id(req.pro_num).await? else {
            ctx.complete(false, "product not found");
            return Err(ServiceError::NotFound(format!(
                "Product {} not found",
                req.pro_num
            )));
        };

        let Some(image) = req.image else {
            let product = self
                .command
                .update(
                    req.pro_num,
                    &req.form,
                    &existing.pro_up_folder,
                    &existing.pro_img,
                )
                .await?;
            ctx.complete(true, "product updated");
            return Ok(ProductResponse::from(product));
        };

        let folder = FileStorage::date_folder();
        let stored = match self
            .storage
            .upload_file(&folder, &image.file_name, &image.bytes)
            .await
        {
            Ok(name) => name,
            Err(e) => {
                ctx.complete(false, &e.to_string());
                return Err(e.into());
            }
        };

        let product = match self
            .command
            .update(req.pro_num, &req.form, &folder, &stored)
            .await
        {
            Ok(product) => product,
            Err(e) => {
                error!("❌ Product update failed, discarding new image: {e:?}");
                self.discard_upload(&folder, &stored).await;
                ctx.complete(false, &e.to_string());
                return Err(ServiceError::Repo(e));
            }
        };

        if let Err(e) = self.remove_images(std::slice::from_ref(&existing)).await {
            warn!("⚠️ Product {} updated but the old image remains", req.pro_num);
            ctx.complete(false, &e.to_string());
            return Err(e);
        }

        info!("✅ Product {} updated with a new image", req.pro_num);
        ctx.complete(true, "product updated");
        Ok(ProductResponse::from(product))
    }

    async fn delete(&self, pro_num: i32) -> Result<(), ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "product_delete",
            vec![KeyValue::new("pro_num", pro_num.to_string())],
        );

        let Some(product) = self.command.delete(pro_num).await? else {
            ctx.complete(false, "product not found");
            return Err(ServiceError::NotFound(format!("Product {pro_num} not found")));
        };

        if let Err(e) = self.remove_images(std::slice::from_ref(&product)).await {
            ctx.complete(false, &e.to_string());
            return Err(e);
        }

        info!("🗑️ Product {} deleted", pro_num);
        ctx.complete(true, "product deleted");
        Ok(())
    }

    async fn delete_selected(&self, filter: &ProductDeleteFilter) -> Result<usize, ServiceError> {
        if filter.pro_nums.is_empty() {
            info!("Nothing selected for deletion");
            return Ok(0);
        }

        let ctx = TracingContext::start(
            TRACER,
            "product_delete_selected",
            vec![KeyValue::new("count", filter.pro_nums.len().to_string())],
        );

        let deleted = match self.command.delete_selected(filter).await {
            Ok(rows) => rows,
            Err(e) => {
                ctx.complete(false, &e.to_string());
                return Err(ServiceError::Repo(e));
            }
        };

        if let Err(e) = self.remove_images(&deleted).await {
            ctx.complete(false, &e.to_string());
            return Err(e);
        }

        info!("🗑️ Deleted {} of {} selected products", deleted.len(), filter.pro_nums.len());
        ctx.complete(true, "selected products deleted");
        Ok(deleted.len())
    }
}
