use crate::{
    domain::{
        requests::member::{
            JoinMemberRequest, LoginRequest, ModifyMemberRequest, PasswordChangeRequest,
        },
        response::member::MemberResponse,
    },
    model::member::Member,
};
use async_trait::async_trait;
use shared::errors::{RepositoryError, ServiceError};
use std::sync::Arc;

pub type DynMemberRepository = Arc<dyn MemberRepositoryTrait + Send + Sync>;
pub type DynMemberService = Arc<dyn MemberServiceTrait + Send + Sync>;

#[async_trait]
pub trait MemberRepositoryTrait {
    async fn find_by_id(&self, mbsp_id: &str) -> Result<Option<Member>, RepositoryError>;
    async fn exists(&self, mbsp_id: &str) -> Result<bool, RepositoryError>;
    async fn find_by_name_and_email(
        &self,
        mbsp_name: &str,
        mbsp_email: &str,
    ) -> Result<Option<Member>, RepositoryError>;
    async fn find_by_id_and_email(
        &self,
        mbsp_id: &str,
        mbsp_email: &str,
    ) -> Result<Option<Member>, RepositoryError>;
    async fn create(
        &self,
        req: &JoinMemberRequest,
        password_hash: &str,
    ) -> Result<Member, RepositoryError>;
    async fn update_profile(
        &self,
        mbsp_id: &str,
        req: &ModifyMemberRequest,
    ) -> Result<Member, RepositoryError>;
    async fn update_password(
        &self,
        mbsp_id: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError>;
    async fn update_last_login(&self, mbsp_id: &str) -> Result<(), RepositoryError>;
}

/// Result of a member login attempt. The failure kinds drive the
/// `idFail` / `pwFail` flash flags.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// The member with the password hash blanked.
    Success(Member),
    UnknownId,
    WrongPassword,
}

#[async_trait]
pub trait MemberServiceTrait {
    /// `true` when the id is still free.
    async fn id_check(&self, mbsp_id: &str) -> Result<bool, ServiceError>;
    async fn join(&self, req: &JoinMemberRequest) -> Result<MemberResponse, ServiceError>;
    async fn login(&self, req: &LoginRequest) -> Result<LoginOutcome, ServiceError>;
    async fn find_profile(&self, mbsp_id: &str) -> Result<MemberResponse, ServiceError>;
    async fn modify(
        &self,
        mbsp_id: &str,
        req: &ModifyMemberRequest,
    ) -> Result<MemberResponse, ServiceError>;
    /// `false` when `cur_pw` does not match the stored hash.
    async fn change_password(
        &self,
        mbsp_id: &str,
        req: &PasswordChangeRequest,
    ) -> Result<bool, ServiceError>;
    /// Mails the member id when name and email match. `false` otherwise.
    async fn id_search(&self, mbsp_name: &str, mbsp_email: &str) -> Result<bool, ServiceError>;
    /// Mails and stores a temporary password when id and email match.
    async fn issue_temp_password(
        &self,
        mbsp_id: &str,
        mbsp_email: &str,
    ) -> Result<bool, ServiceError>;
    /// Mails a fresh verification code and returns it.
    async fn send_auth_code(&self, receiver_mail: &str) -> Result<String, ServiceError>;
}
