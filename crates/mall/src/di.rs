use crate::{
    abstract_trait::{
        admin::{DynAdminRepository, DynAdminService},
        category::{DynCategoryRepository, DynCategoryService},
        member::{DynMemberRepository, DynMemberService},
        product::{
            DynProductCommandRepository, DynProductCommandService, DynProductQueryRepository,
            DynProductQueryService,
        },
    },
    repository::{
        AdminRepository, CategoryRepository, MemberRepository, ProductCommandRepository,
        ProductQueryRepository,
    },
    service::{
        AdminService, CategoryService, MemberService, ProductCommandService, ProductQueryService,
    },
    utils::FileStorage,
};
use shared::{
    abstract_trait::{DynEmailService, DynHashing},
    config::ConnectionPool,
};
use std::{fmt, sync::Arc};

#[derive(Clone)]
pub struct DependenciesInject {
    pub member_service: DynMemberService,
    pub admin_service: DynAdminService,
    pub category_service: DynCategoryService,
    pub product_query: DynProductQueryService,
    pub product_command: DynProductCommandService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("member_service", &"DynMemberService")
            .field("admin_service", &"DynAdminService")
            .field("category_service", &"DynCategoryService")
            .field("product_query", &"DynProductQueryService")
            .field("product_command", &"DynProductCommandService")
            .finish()
    }
}

/// Repositories the services are built on. Postgres in production, swapped
/// out in tests.
#[derive(Clone)]
pub struct Repositories {
    pub member: DynMemberRepository,
    pub admin: DynAdminRepository,
    pub category: DynCategoryRepository,
    pub product_query: DynProductQueryRepository,
    pub product_command: DynProductCommandRepository,
}

impl Repositories {
    pub fn postgres(pool: ConnectionPool) -> Self {
        Self {
            member: Arc::new(MemberRepository::new(pool.clone())),
            admin: Arc::new(AdminRepository::new(pool.clone())),
            category: Arc::new(CategoryRepository::new(pool.clone())),
            product_query: Arc::new(ProductQueryRepository::new(pool.clone())),
            product_command: Arc::new(ProductCommandRepository::new(pool)),
        }
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub repositories: Repositories,
    pub hashing: DynHashing,
    pub mailer: DynEmailService,
    pub storage: FileStorage,
    pub base_url: String,
}

impl DependenciesInject {
    pub fn new(deps: DependenciesInjectDeps) -> Self {
        let DependenciesInjectDeps {
            repositories,
            hashing,
            mailer,
            storage,
            base_url,
        } = deps;

        let member_service: DynMemberService = Arc::new(MemberService::new(
            repositories.member.clone(),
            hashing.clone(),
            mailer,
            base_url,
        ));

        let admin_service: DynAdminService =
            Arc::new(AdminService::new(repositories.admin.clone(), hashing));

        let category_service: DynCategoryService =
            Arc::new(CategoryService::new(repositories.category.clone()));

        let product_query: DynProductQueryService = Arc::new(ProductQueryService::new(
            repositories.product_query.clone(),
            storage.clone(),
        ));

        let product_command: DynProductCommandService = Arc::new(ProductCommandService::new(
            repositories.product_command.clone(),
            repositories.product_query.clone(),
            storage,
        ));

        Self {
            member_service,
            admin_service,
            category_service,
            product_query,
            product_command,
        }
    }
}
