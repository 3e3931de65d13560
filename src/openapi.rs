use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::Modify;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Morakhasi API",
        version = "1.0.0",
        description = "Backend API for the Morakhasi leave and attendance management system",
        contact(
            name = "API Support",
            email = "support@morakhasi.ir"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    paths(
        // Health
        crate::handlers::health::health_check,

        // Auth
        crate::handlers::auth_handler::login,
        crate::handlers::auth_handler::logout,
        crate::handlers::auth_handler::get_me,

        // Employees
        crate::handlers::employees_handler::get_employees,
        crate::handlers::employees_handler::get_employee,
        crate::handlers::employees_handler::create_employee,
        crate::handlers::employees_handler::update_employee,
        crate::handlers::employees_handler::delete_employee,
        crate::handlers::employees_handler::get_employee_balance,

        // Leaves
        crate::handlers::leaves_handler::get_leaves,
        crate::handlers::leaves_handler::create_leave,
        crate::handlers::leaves_handler::update_leave,
        crate::handlers::leaves_handler::delete_leave,

        // Settings
        crate::handlers::settings_handler::get_settings,
        crate::handlers::settings_handler::update_settings,

        // Users
        crate::handlers::users_handler::get_users,
        crate::handlers::users_handler::create_user,
        crate::handlers::users_handler::update_user,
        crate::handlers::users_handler::delete_user,

        // Reports
        crate::handlers::reports_handler::get_balance_report,

        // Audit
        crate::handlers::audit_handler::get_audit,

        // Activation
        crate::handlers::activation_handler::get_activation,
        crate::handlers::activation_handler::activate,
        crate::handlers::activation_handler::deactivate,
        crate::handlers::activation_handler::request_code,
        crate::handlers::activation_handler::verify_code,

        // Backup
        crate::handlers::backup_handler::export_backup,
        crate::handlers::backup_handler::restore_backup,

        // Admin back office
        crate::handlers::admin_handler::get_customers,
        crate::handlers::admin_handler::create_customer,
        crate::handlers::admin_handler::delete_customer,
        crate::handlers::admin_handler::get_admin_logs,
    ),
    components(
        schemas(
            // Core models
            crate::models::Employee,
            crate::models::LeaveRecord,
            crate::models::LeaveDetail,
            crate::models::LeaveCategory,
            crate::models::Settings,
            crate::models::UserView,
            crate::models::Role,
            crate::models::Customer,
            crate::models::AuditLogEntry,
            crate::models::AuditAction,
            crate::models::AuditEntity,
            crate::calendar::JalaaliDate,
            crate::leave::BalanceSummary,

            // Input models
            crate::models::CreateEmployeeInput,
            crate::models::UpdateEmployeeInput,
            crate::models::EmployeeMutationResponse,
            crate::models::CreateLeaveInput,
            crate::models::UpdateLeaveInput,
            crate::models::LeaveMutationResponse,
            crate::models::LeaveKind,
            crate::models::UpdateSettingsInput,
            crate::models::CreateUserInput,
            crate::models::UpdateUserInput,
            crate::models::UserMutationResponse,
            crate::models::CreateCustomerInput,
            crate::models::CustomerMutationResponse,

            // Handler types
            crate::handlers::auth_handler::LoginInput,
            crate::handlers::auth_handler::LoginResponse,
            crate::handlers::auth_handler::LogoutResponse,
            crate::handlers::auth_handler::MeResponse,
            crate::handlers::reports_handler::EmployeeBalanceRow,
            crate::handlers::activation_handler::ActivationStatusResponse,
            crate::handlers::activation_handler::ActivateInput,
            crate::handlers::activation_handler::DeactivateResponse,
            crate::handlers::activation_handler::RequestCodeInput,
            crate::handlers::activation_handler::RequestCodeResponse,
            crate::handlers::activation_handler::VerifyCodeInput,
            crate::handlers::activation_handler::VerifyCodeResponse,
            crate::handlers::backup_handler::RestoreResponse,
            crate::store::BackupDocument,
        )
    ),
    tags(
        (name = "health", description = "Health check"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "employees", description = "Employee management"),
        (name = "leaves", description = "Leave request management"),
        (name = "settings", description = "Tenant settings"),
        (name = "users", description = "User management"),
        (name = "reports", description = "Reporting feeds"),
        (name = "audit", description = "Audit trail"),
        (name = "activation", description = "Licensing and activation"),
        (name = "backup", description = "Backup and restore"),
        (name = "admin", description = "Customer back office"),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "cookie_auth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session"))),
            )
        }
    }
}
