use axum::{
    http::{header, HeaderValue, Method},
    response::Html,
    routing::{delete, get, post, put},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::{handlers, middleware, openapi::ApiDoc};

pub fn build_router(state: Arc<crate::AppState>) -> Router {
    // CORS configuration
    let origin = state
        .config
        .cors_origin
        .parse::<HeaderValue>()
        .unwrap_or_else(|_| HeaderValue::from_static("http://localhost:3000"));
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .allow_credentials(true);

    // Auth routes
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth_handler::login))
        .route("/logout", post(handlers::auth_handler::logout))
        .route("/me", get(handlers::auth_handler::get_me));

    // Employee routes
    let employee_routes = Router::new()
        .route("/", get(handlers::employees_handler::get_employees))
        .route("/", post(handlers::employees_handler::create_employee))
        .route("/{id}", get(handlers::employees_handler::get_employee))
        .route("/{id}", put(handlers::employees_handler::update_employee))
        .route("/{id}", delete(handlers::employees_handler::delete_employee))
        .route("/{id}/balance", get(handlers::employees_handler::get_employee_balance));

    // Leave routes
    let leave_routes = Router::new()
        .route("/", get(handlers::leaves_handler::get_leaves))
        .route("/", post(handlers::leaves_handler::create_leave))
        .route("/{id}", put(handlers::leaves_handler::update_leave))
        .route("/{id}", delete(handlers::leaves_handler::delete_leave));

    // Settings routes
    let settings_routes = Router::new()
        .route("/", get(handlers::settings_handler::get_settings))
        .route("/", put(handlers::settings_handler::update_settings));

    // User routes
    let user_routes = Router::new()
        .route("/", get(handlers::users_handler::get_users))
        .route("/", post(handlers::users_handler::create_user))
        .route("/{id}", put(handlers::users_handler::update_user))
        .route("/{id}", delete(handlers::users_handler::delete_user));

    // Report routes
    let report_routes =
        Router::new().route("/balance", get(handlers::reports_handler::get_balance_report));

    // Audit routes
    let audit_routes = Router::new().route("/", get(handlers::audit_handler::get_audit));

    // Activation routes
    let activation_routes = Router::new()
        .route("/", get(handlers::activation_handler::get_activation))
        .route("/", post(handlers::activation_handler::activate))
        .route("/", delete(handlers::activation_handler::deactivate))
        .route("/request-code", post(handlers::activation_handler::request_code))
        .route("/verify-code", post(handlers::activation_handler::verify_code));

    // Backup routes
    let backup_routes = Router::new()
        .route("/", get(handlers::backup_handler::export_backup))
        .route("/restore", post(handlers::backup_handler::restore_backup));

    // Back-office routes
    let admin_routes = Router::new()
        .route("/customers", get(handlers::admin_handler::get_customers))
        .route("/customers", post(handlers::admin_handler::create_customer))
        .route("/customers/{id}", delete(handlers::admin_handler::delete_customer))
        .route("/logs", get(handlers::admin_handler::get_admin_logs));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .nest("/api/auth", auth_routes)
        .nest("/api/employees", employee_routes)
        .nest("/api/leaves", leave_routes)
        .nest("/api/settings", settings_routes)
        .nest("/api/users", user_routes)
        .nest("/api/reports", report_routes)
        .nest("/api/audit", audit_routes)
        .nest("/api/activation", activation_routes)
        .nest("/api/backup", backup_routes)
        .nest("/api/admin", admin_routes)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/swagger-ui", get(swagger_ui))
        .layer(axum::middleware::from_fn(middleware::metrics_middleware))
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn swagger_ui() -> Html<&'static str> {
    Html(r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Morakhasi API Documentation</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = () => {
            window.ui = SwaggerUIBundle({
                url: '/api-docs/openapi.json',
                dom_id: '#swagger-ui',
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
    "#)
}
