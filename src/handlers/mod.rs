pub mod activation_handler;
pub mod admin_handler;
pub mod audit_handler;
pub mod auth_handler;
pub mod backup_handler;
pub mod employees_handler;
pub mod health;
pub mod leaves_handler;
pub mod metrics;
pub mod reports_handler;
pub mod settings_handler;
pub mod users_handler;

pub use health::health_check;
pub use metrics::{metrics_handler, setup_metrics_recorder, MetricsState};
