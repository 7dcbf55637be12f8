use crate::{
    abstract_trait::admin::{AdminLoginOutcome, AdminServiceTrait, DynAdminRepository},
    domain::{requests::admin::AdminLoginRequest, response::session::AdminAuth},
};
use async_trait::async_trait;
use opentelemetry::KeyValue;
use shared::{
    abstract_trait::DynHashing,
    errors::ServiceError,
    utils::TracingContext,
};
use tracing::info;

const TRACER: &str = "admin-service";

#[derive(Clone)]
pub struct AdminService {
    repo: DynAdminRepository,
    hashing: DynHashing,
}

impl AdminService {
    pub fn new(repo: DynAdminRepository, hashing: DynHashing) -> Self {
        Self { repo, hashing }
    }
}

#[async_trait]
impl AdminServiceTrait for AdminService {
    async fn login(&self, req: &AdminLoginRequest) -> Result<AdminLoginOutcome, ServiceError> {
        let ctx = TracingContext::start(
            TRACER,
            "admin_login",
            vec![KeyValue::new("ad_userid", req.ad_userid.clone())],
        );

        let Some(admin) = self.repo.find_by_id(&req.ad_userid).await? else {
            info!("🚫 Admin login with unknown id: {}", req.ad_userid);
            ctx.complete(false, "unknown id");
            return Ok(AdminLoginOutcome::UnknownId);
        };

        match self
            .hashing
            .compare_password(&admin.ad_passwd, &req.ad_passwd)
            .await
        {
            Ok(()) => {}
            Err(ServiceError::InvalidCredentials) => {
                info!("🚫 Wrong admin password for {}", req.ad_userid);
                ctx.complete(false, "wrong password");
                return Ok(AdminLoginOutcome::WrongPassword);
            }
            Err(e) => {
                ctx.complete(false, &e.to_string());
                return Err(e);
            }
        }

        let admin = self.repo.update_login_date(&admin.ad_userid).await?;

        info!("✅ Admin logged in: {}", admin.ad_userid);
        ctx.complete(true, "admin login succeeded");

        Ok(AdminLoginOutcome::Success(AdminAuth {
            ad_userid: admin.ad_userid,
            login_date: admin.login_date,
        }))
    }

    async fn ensure_admin(&self, ad_userid: &str, password: &str) -> Result<(), ServiceError> {
        let hashed = self.hashing.hash_password(password).await?;

        if self.repo.create_if_absent(ad_userid, &hashed).await? {
            info!("👤 Created admin account '{}'", ad_userid);
        } else {
            info!("👤 Admin account '{}' already present", ad_userid);
        }

        Ok(())
    }
}
