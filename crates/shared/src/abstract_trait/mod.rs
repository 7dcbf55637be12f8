mod email;
mod hashing;

pub use self::email::{DynEmailService, EmailRequest, EmailServiceTrait};
pub use self::hashing::{DynHashing, HashingTrait};
