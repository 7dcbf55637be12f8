mod database;
mod email;
mod hashing;
mod redis;

pub use self::database::{ConnectionManager, ConnectionPool};
pub use self::email::EmailConfig;
pub use self::hashing::Hashing;
pub use self::redis::{RedisClient, RedisConfig};
