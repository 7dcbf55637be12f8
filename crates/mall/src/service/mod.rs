mod admin;
mod category;
mod email;
mod member;
mod product;

pub use self::admin::AdminService;
pub use self::category::CategoryService;
pub use self::email::EmailService;
pub use self::member::MemberService;
pub use self::product::{ProductCommandService, ProductQueryService};
