pub mod api;
pub mod category;
pub mod member;
pub mod pagination;
pub mod product;
pub mod session;
