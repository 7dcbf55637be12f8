pub mod admin;
pub mod email;
pub mod member;
pub mod product;
