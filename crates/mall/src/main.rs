use anyhow::{Context, Result};
use mall::{
    abstract_trait::admin::AdminServiceTrait, config::Config, handler::AppRouter,
    state::AppState,
};
use shared::{
    config::{ConnectionManager, ConnectionPool},
    utils::{Telemetry, init_logger},
};
use tracing::{error, info, warn};

const SERVICE_NAME: &str = "docmall";

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let is_dev = std::env::var("DEV_MODE")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);
    let is_enable_file = std::env::var("ENABLE_FILE_LOG")
        .map(|v| v == "true")
        .unwrap_or(false);

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::new(SERVICE_NAME, config.otel_endpoint.clone());
    let logger_provider = telemetry
        .init_logger()
        .context("Failed to initialize OpenTelemetry logger")?;
    telemetry
        .init_meter()
        .context("Failed to initialize OpenTelemetry meter")?;
    telemetry
        .init_tracer()
        .context("Failed to initialize OpenTelemetry tracer")?;

    init_logger(logger_provider, SERVICE_NAME, is_dev, is_enable_file);

    info!("🚀 Starting DocMall initialization...");

    let db_pool = ConnectionManager::new_pool(
        &config.database_url,
        config.db_min_conn,
        config.db_max_conn,
    )
    .await
    .context("Failed to initialize database pool")?;

    if config.run_migrations {
        run_migrations(&db_pool)
            .await
            .context("Failed to run database migrations")?;
        info!("✅ Database migrations applied");
    }

    tokio::fs::create_dir_all(&config.upload_path)
        .await
        .with_context(|| format!("Failed to create upload root {:?}", config.upload_path))?;

    let state = AppState::new(&config, db_pool)
        .await
        .context("Failed to create AppState")?;

    match (&config.admin_userid, &config.admin_password) {
        (Some(userid), Some(password)) => state
            .di_container
            .admin_service
            .ensure_admin(userid, password)
            .await
            .context("Failed to provision the bootstrap admin")?,
        (Some(_), None) | (None, Some(_)) => {
            warn!("⚠️ ADMIN_USERID and ADMIN_PASSWORD must be set together, skipping admin bootstrap")
        }
        (None, None) => {}
    }

    info!("✅ Application setup completed successfully.");

    let result = AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server");

    info!("🛑 Shutting down DocMall...");

    if let Err(e) = telemetry.shutdown().await {
        error!("Failed to shutdown telemetry: {}", e);
    }

    result
}

async fn run_migrations(pool: &ConnectionPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
