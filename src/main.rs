mod audit;
mod auth;
mod calendar;
mod config;
mod error;
mod extractors;
mod handlers;
mod leave;
mod license;
mod middleware;
mod models;
mod openapi;
mod startup;
mod store;

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use handlers::MetricsState;

use audit::{AuditSink, StoreAuditSink};
use license::{ActivationClient, CodeSender, HttpCodeSender, OtpCache};
use store::{FileStore, KvStore, Tenant, TenantStore};

pub struct AppState {
    pub kv: Arc<dyn KvStore>,
    pub audit: Arc<dyn AuditSink>,
    pub activation: ActivationClient,
    pub sender: Arc<dyn CodeSender>,
    pub otp: OtpCache,
    pub config: AppConfig,
    pub metrics: Arc<MetricsState>,
}

impl AppState {
    /// The namespace the persisted activation status points at. Resolved
    /// on every request so activating a different code switches the
    /// visible data immediately.
    pub fn active_tenant(&self) -> Tenant {
        match license::activation::load_status(self.kv.as_ref()) {
            Ok(Some(status)) => status.tenant(),
            Ok(None) => Tenant::Default,
            Err(e) => {
                tracing::error!(error = %e, "failed to read activation status");
                Tenant::Default
            }
        }
    }

    pub fn tenant_store(&self) -> TenantStore {
        TenantStore::new(self.kv.clone(), self.active_tenant())
    }

    pub fn store_for(&self, tenant: Tenant) -> TenantStore {
        TenantStore::new(self.kv.clone(), tenant)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing with conditional JSON/text output
    let use_json = std::env::var("LOG_FORMAT")
        .unwrap_or_else(|_| "text".to_string()) == "json";

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,morakhasi_axum=debug,tower_http=debug".into());

    if use_json {
        // Structured JSON logging for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        // Human-readable for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env().map_err(|e| {
        tracing::error!("Configuration error: {}", e);
        e
    })?;

    // Open the store
    let kv: Arc<dyn KvStore> = Arc::new(FileStore::open(&config.data_file).map_err(|e| {
        tracing::error!("Failed to open store at {}: {}", config.data_file.display(), e);
        e
    })?);

    tracing::info!(path = %config.data_file.display(), "store opened");

    // The device identity sent to the remote validator; created on first
    // start and stable afterwards.
    let device = license::activation::device_id(kv.as_ref())?;
    tracing::debug!(device_id = %device, "device identity ready");

    // Initialize metrics recorder
    let metrics_state = Arc::new(handlers::setup_metrics_recorder());
    tracing::info!("Metrics recorder initialized");

    // Create application state
    let state = Arc::new(AppState {
        audit: Arc::new(StoreAuditSink::new(kv.clone())),
        activation: ActivationClient::new(config.activation_api_url.clone()),
        sender: Arc::new(HttpCodeSender::new(config.code_sender_url.clone())),
        otp: OtpCache::new(),
        kv,
        config,
        metrics: metrics_state,
    });

    // Build router
    let app = startup::build_router(state.clone());

    // Start server
    let listener = TcpListener::bind(&state.config.bind_addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
