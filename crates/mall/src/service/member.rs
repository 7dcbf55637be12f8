use crate::{
    abstract_trait::member::{DynMemberRepository, LoginOutcome, MemberServiceTrait},
    domain::{
        requests::member::{
            JoinMemberRequest, LoginRequest, ModifyMemberRequest, PasswordChangeRequest,
        },
        response::member::MemberResponse,
    },
};
use async_trait::async_trait;
use chrono::Local;
use opentelemetry::KeyValue;
use shared::{
    abstract_trait::{DynEmailService, DynHashing, EmailRequest},
    errors::{RepositoryError, ServiceError},
    utils::{EmailTemplateData, TracingContext, generate_numeric_code, generate_random_string},
};
use tracing::{error, info, warn};
use validator::{Validate, ValidateEmail};

const TRACER: &str = "member-service";
const AUTH_CODE_LEN: usize = 6;
const TEMP_PASSWORD_LEN: usize = 10;

#[derive(Clone)]
pub struct MemberService {
    repo: DynMemberRepository,
    hashing: DynHashing,
    mailer: DynEmailService,
    base_url: String,
}

impl MemberService {
    pub fn new(
        repo: DynMemberRepository,
        hashing: DynHashing,
        mailer: DynEmailService,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            repo,
            hashing,
            mailer,
            base_url: base_url.into(),
        }
    }

    fn validation_errors(errors: validator::ValidationErrors) -> ServiceError {
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
    }

    async fn mail(
        &self,
        to: &str,
        subject: &str,
        message: &str,
        code: &str,
        path: &str,
    ) -> Result<(), ServiceError> {
        let req = EmailRequest {
            to: to.to_string(),
            subject: subject.to_string(),
            data: EmailTemplateData {
                title: subject.to_string(),
                message: message.to_string(),
                code: code.to_string(),
                link: format!("{}{}", self.base_url.trim_end_matches('/'), path),
            },
        };

        self.mailer.send(&req).await
    }
}

#[async_trait]
impl MemberServiceTrait for MemberService {
    async fn id_check(&self, mbsp_id: &str) -> Result<bool, ServiceError> {
        let taken = self.repo.exists(mbsp_id.trim()).await?;
        info!("🔎 Id check for '{}': {}", mbsp_id, if taken { "taken" } else { "free" });
        Ok(!taken)
    }

    async fn join(&self, req: &JoinMemberRequest) -> Result<MemberResponse, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "member_join",
            vec![KeyValue::new("mbsp_id", req.mbsp_id.clone())],
        );

        if let Err(errors) = req.validate() {
            ctx.complete(false, "validation failed");
            return Err(Self::validation_errors(errors));
        }

        if self.repo.exists(&req.mbsp_id).await? {
            warn!("⚠️ Member id already taken: {}", req.mbsp_id);
            ctx.complete(false, "id already taken");
            return Err(ServiceError::Repo(RepositoryError::AlreadyExists(format!(
                "Member id '{}' is already taken",
                req.mbsp_id
            ))));
        }

        let hashed = self.hashing.hash_password(&req.mbsp_password).await?;

        match self.repo.create(req, &hashed).await {
            Ok(member) => {
                info!("✅ Member joined: {}", member.mbsp_id);
                ctx.complete(true, "member created");
                Ok(MemberResponse::from(member))
            }
            Err(e) => {
                error!("❌ Failed to create member {}: {e:?}", req.mbsp_id);
                ctx.complete(false, &e.to_string());
                Err(ServiceError::Repo(e))
            }
        }
    }

    async fn login(&self, req: &LoginRequest) -> Result<LoginOutcome, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "member_login",
            vec![KeyValue::new("mbsp_id", req.mbsp_id.clone())],
        );

        let mut member = match self.repo.find_by_id(&req.mbsp_id).await {
            Ok(Some(member)) => member,
            Ok(None) => {
                info!("🚫 Login with unknown id: {}", req.mbsp_id);
                ctx.complete(false, "unknown id");
                return Ok(LoginOutcome::UnknownId);
            }
            Err(e) => {
                ctx.complete(false, &e.to_string());
                return Err(ServiceError::Repo(e));
            }
        };

        match self
            .hashing
            .compare_password(&member.mbsp_password, &req.mbsp_password)
            .await
        {
            Ok(()) => {}
            Err(ServiceError::InvalidCredentials) => {
                info!("🚫 Wrong password for {}", req.mbsp_id);
                ctx.complete(false, "wrong password");
                return Ok(LoginOutcome::WrongPassword);
            }
            Err(e) => {
                ctx.complete(false, &e.to_string());
                return Err(e);
            }
        }

        self.repo.update_last_login(&member.mbsp_id).await?;

        member.mbsp_password.clear();
        member.mbsp_lastlogin = Some(Local::now().naive_local());

        info!("✅ Member logged in: {}", member.mbsp_id);
        ctx.complete(true, "login succeeded");

        Ok(LoginOutcome::Success(member))
    }

    async fn find_profile(&self, mbsp_id: &str) -> Result<MemberResponse, ServiceError> {
        self.repo
            .find_by_id(mbsp_id)
            .await?
            .map(MemberResponse::from)
            .ok_or_else(|| ServiceError::NotFound(format!("Member {mbsp_id} not found")))
    }

    async fn modify(
        &self,
        mbsp_id: &str,
        req: &ModifyMemberRequest,
    ) -> Result<MemberResponse, ServiceError> {
        req.validate().map_err(Self::validation_errors)?;

        let member = self.repo.update_profile(mbsp_id, req).await?;
        info!("✅ Member profile updated: {}", mbsp_id);

        Ok(MemberResponse::from(member))
    }

    async fn change_password(
        &self,
        mbsp_id: &str,
        req: &PasswordChangeRequest,
    ) -> Result<bool, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "member_change_password",
            vec![KeyValue::new("mbsp_id", mbsp_id.to_string())],
        );

        if let Err(errors) = req.validate() {
            ctx.complete(false, "validation failed");
            return Err(Self::validation_errors(errors));
        }

        let member = self
            .repo
            .find_by_id(mbsp_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Member {mbsp_id} not found")))?;

        match self.hashing.compare_password(&member.mbsp_password, &req.cur_pw).await {
            Ok(()) => {}
            Err(ServiceError::InvalidCredentials) => {
                ctx.complete(false, "current password mismatch");
                return Ok(false);
            }
            Err(e) => {
                ctx.complete(false, &e.to_string());
                return Err(e);
            }
        }

        let hashed = self.hashing.hash_password(&req.new_pw).await?;
        self.repo.update_password(mbsp_id, &hashed).await?;

        info!("🔑 Password changed for {}", mbsp_id);
        ctx.complete(true, "password changed");
        Ok(true)
    }

    async fn id_search(&self, mbsp_name: &str, mbsp_email: &str) -> Result<bool, ServiceError> {
        let Some(member) = self
            .repo
            .find_by_name_and_email(mbsp_name.trim(), mbsp_email.trim())
            .await?
        else {
            info!("🔎 No member matches the given name and email");
            return Ok(false);
        };

        self.mail(
            &member.mbsp_email,
            "DocMall member id",
            "Here is the id registered with this address.",
            &member.mbsp_id,
            "/member/login",
        )
        .await?;

        Ok(true)
    }

    async fn issue_temp_password(
        &self,
        mbsp_id: &str,
        mbsp_email: &str,
    ) -> Result<bool, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "member_issue_temp_password",
            vec![KeyValue::new("mbsp_id", mbsp_id.to_string())],
        );

        let Some(member) = self
            .repo
            .find_by_id_and_email(mbsp_id.trim(), mbsp_email.trim())
            .await?
        else {
            ctx.complete(false, "id and email do not match");
            return Ok(false);
        };

        let temp_password = generate_random_string(TEMP_PASSWORD_LEN)
            .map_err(|e| ServiceError::Internal(format!("Failed to generate password: {e}")))?;

        // the stored hash only changes once the member can read the new password
        if let Err(e) = self
            .mail(
                &member.mbsp_email,
                "DocMall temporary password",
                "Log in with this temporary password and change it from My Page.",
                &temp_password,
                "/member/login",
            )
            .await
        {
            ctx.complete(false, &e.to_string());
            return Err(e);
        }

        let hashed = self.hashing.hash_password(&temp_password).await?;
        self.repo.update_password(&member.mbsp_id, &hashed).await?;

        info!("🔑 Temporary password issued for {}", member.mbsp_id);
        ctx.complete(true, "temporary password issued");
        Ok(true)
    }

    async fn send_auth_code(&self, receiver_mail: &str) -> Result<String, ServiceError> {
        let receiver_mail = receiver_mail.trim();
        if !receiver_mail.validate_email() {
            return Err(ServiceError::Validation(vec![
                "receiverMail: Invalid email format".to_string(),
            ]));
        }

        let code = generate_numeric_code(AUTH_CODE_LEN)
            .map_err(|e| ServiceError::Internal(format!("Failed to generate code: {e}")))?;

        self.mail(
            receiver_mail,
            "DocMall sign-up verification code",
            "Enter this code on the sign-up page to verify your email address.",
            &code,
            "/member/join",
        )
        .await?;

        info!("📧 Verification code sent to {}", receiver_mail);
        Ok(code)
    }
}
