use crate::{
    abstract_trait::session::DynSessionStore,
    cache::SessionStore,
    config::Config,
    di::{DependenciesInject, DependenciesInjectDeps, Repositories},
    middleware::session::SessionManager,
    service::EmailService,
    utils::FileStorage,
};
use anyhow::{Context, Result};
use prometheus_client::registry::Registry;
use shared::{
    abstract_trait::{DynEmailService, DynHashing},
    config::{ConnectionPool, EmailConfig, Hashing, RedisClient, RedisConfig},
    utils::{Metrics, SystemMetrics, run_metrics_collector},
};
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub sessions: SessionManager,
    pub registry: Arc<Mutex<Registry>>,
    pub metrics: Metrics,
    pub system_metrics: Arc<SystemMetrics>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("system_metrics", &self.system_metrics)
            .finish()
    }
}

impl AppState {
    pub async fn new(config: &Config, pool: ConnectionPool) -> Result<Self> {
        info!("Initializing Redis connection for sessions");
        let redis_config = RedisConfig::init().context("Failed to load Redis configuration")?;
        let redis = RedisClient::new(&redis_config).context("Failed to connect to Redis")?;

        redis
            .ping()
            .await
            .context("Failed to ping Redis server")?;

        let email_config = EmailConfig::init().context("Failed to load SMTP configuration")?;
        let mailer: DynEmailService =
            Arc::new(EmailService::new(&email_config).context("Failed to create mailer")?);

        let hashing: DynHashing = Arc::new(Hashing::with_cost(config.bcrypt_cost));

        let di_container = DependenciesInject::new(DependenciesInjectDeps {
            repositories: Repositories::postgres(pool),
            hashing,
            mailer,
            storage: FileStorage::new(config.upload_path.clone()),
            base_url: config.app_base_url.clone(),
        });

        let session_store: DynSessionStore = Arc::new(SessionStore::new(redis.pool.clone()));
        let ttl = chrono::Duration::minutes(config.session_ttl_minutes);

        let state = Self::with_dependencies(di_container, session_store, ttl).await;

        tokio::spawn(run_metrics_collector(state.system_metrics.clone()));

        Ok(state)
    }

    /// Wires an already built container and session store, registering the
    /// HTTP and process metrics.
    pub async fn with_dependencies(
        di_container: DependenciesInject,
        session_store: DynSessionStore,
        session_ttl: chrono::Duration,
    ) -> Self {
        let registry = Arc::new(Mutex::new(Registry::default()));
        let metrics = Metrics::new();
        let system_metrics = Arc::new(SystemMetrics::new());

        {
            let mut registry = registry.lock().await;
            metrics.register(&mut registry);
            registry.register_metrics(&system_metrics);
        }

        Self {
            di_container,
            sessions: SessionManager::new(session_store, session_ttl),
            registry,
            metrics,
            system_metrics,
        }
    }
}

trait MetricsRegister {
    fn register_metrics(&mut self, metrics: &SystemMetrics);
}

impl MetricsRegister for Registry {
    fn register_metrics(&mut self, metrics: &SystemMetrics) {
        metrics.register(self);
    }
}
