mod admin;
mod category;
mod member;
mod product;

pub use self::admin::AdminRepository;
pub use self::category::CategoryRepository;
pub use self::member::MemberRepository;
pub use self::product::{ProductCommandRepository, ProductQueryRepository};
