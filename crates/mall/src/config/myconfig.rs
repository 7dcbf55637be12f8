use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub run_migrations: bool,
    pub port: u16,
    pub db_min_conn: u32,
    pub db_max_conn: u32,
    pub upload_path: PathBuf,
    pub app_base_url: String,
    pub session_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    pub otel_endpoint: String,
    pub admin_userid: Option<String>,
    pub admin_password: Option<String>,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow!("{key} has an invalid value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url =
            std::env::var("DATABASE_URL").context("Missing environment variable: DATABASE_URL")?;
        let run_migrations_str = std::env::var("RUN_MIGRATIONS")
            .context("Missing environment variable: RUN_MIGRATIONS")?;
        let port_str = std::env::var("PORT").context("Missing environment variable: PORT")?;

        let run_migrations = match run_migrations_str.as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(anyhow!(
                    "RUN_MIGRATIONS must be 'true' or 'false', got '{}'",
                    other
                ));
            }
        };

        let port = port_str
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let db_min_conn = env_or("DB_MIN_CONN", 1u32)?;
        let db_max_conn = env_or("DB_MAX_CONN", 5u32)?;
        if db_min_conn > db_max_conn {
            return Err(anyhow!(
                "DB_MIN_CONN ({db_min_conn}) must not exceed DB_MAX_CONN ({db_max_conn})"
            ));
        }

        let upload_path = PathBuf::from(
            std::env::var("UPLOAD_PATH").unwrap_or_else(|_| "./upload".to_string()),
        );
        let app_base_url = std::env::var("APP_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"));

        let session_ttl_minutes = env_or("SESSION_TTL_MINUTES", 30i64)?;
        if session_ttl_minutes <= 0 {
            return Err(anyhow!("SESSION_TTL_MINUTES must be positive"));
        }

        let bcrypt_cost = env_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        let otel_endpoint = std::env::var("OTEL_ENDPOINT")
            .unwrap_or_else(|_| "http://otel-collector:4317".to_string());

        let admin_userid = std::env::var("ADMIN_USERID").ok().filter(|v| !v.is_empty());
        let admin_password = std::env::var("ADMIN_PASSWORD").ok().filter(|v| !v.is_empty());

        Ok(Self {
            database_url,
            run_migrations,
            port,
            db_min_conn,
            db_max_conn,
            upload_path,
            app_base_url,
            session_ttl_minutes,
            bcrypt_cost,
            otel_endpoint,
            admin_userid,
            admin_password,
        })
    }
}
