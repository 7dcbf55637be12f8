pub mod admin;
pub mod category;
pub mod member;
pub mod product;
pub mod session;
