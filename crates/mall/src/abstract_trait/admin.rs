use crate::{
    domain::{requests::admin::AdminLoginRequest, response::session::AdminAuth},
    model::admin::Admin,
};
use async_trait::async_trait;
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;

pub type DynAdminRepository = Arc<dyn AdminRepositoryTrait + Send + Sync>;
pub type DynAdminService = Arc<dyn AdminServiceTrait + Send + Sync>;

#[async_trait]
pub trait AdminRepositoryTrait {
    async fn find_by_id(&self, ad_userid: &str) -> Result<Option<Admin>, RepositoryError>;
    async fn update_login_date(&self, ad_userid: &str) -> Result<Admin, RepositoryError>;
    /// Inserts the account unless one with the same id exists. Returns
    /// whether a row was written.
    async fn create_if_absent(
        &self,
        ad_userid: &str,
        password_hash: &str,
    ) -> Result<bool, RepositoryError>;
}

#[derive(Debug, Clone)]
pub enum AdminLoginOutcome {
    Success(AdminAuth),
    UnknownId,
    WrongPassword,
}

#[async_trait]
pub trait AdminServiceTrait {
    async fn login(&self, req: &AdminLoginRequest) -> Result<AdminLoginOutcome, ServiceError>;
    async fn ensure_admin(&self, ad_userid: &str, password: &str) -> Result<(), ServiceError>;
}
