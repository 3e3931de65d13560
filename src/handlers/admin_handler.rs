use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    audit,
    extractors::{permissions, AuthenticatedUser},
    license::activation,
    models::{
        AuditAction, AuditEntity, AuditLogEntry, CreateCustomerInput, Customer,
        CustomerMutationResponse,
    },
    store::Tenant,
    AppError, AppResult, AppState,
};

/// GET /api/admin/customers
#[utoipa::path(
    get,
    path = "/api/admin/customers",
    responses(
        (status = 200, description = "Registered customers", body = Vec<Customer>),
        (status = 403, description = "Super administrator access required")
    ),
    tag = "admin",
    security(("cookie_auth" = []))
)]
pub async fn get_customers(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<Customer>>> {
    permissions::require_super_admin(&auth)?;
    Ok(Json(state.store_for(Tenant::SuperAdmin).customers()?))
}

/// POST /api/admin/customers
#[utoipa::path(
    post,
    path = "/api/admin/customers",
    request_body = CreateCustomerInput,
    responses(
        (status = 200, description = "Customer registered", body = Customer),
        (status = 403, description = "Super administrator access required"),
        (status = 409, description = "Activation code already registered"),
        (status = 422, description = "Invalid input")
    ),
    tag = "admin",
    security(("cookie_auth" = []))
)]
pub async fn create_customer(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<CreateCustomerInput>,
) -> AppResult<Json<Customer>> {
    permissions::require_super_admin(&auth)?;

    if input.name.trim().is_empty() {
        return Err(AppError::Validation("customer name is required".to_string()));
    }

    let code = activation::normalize_code(&input.activation_code);
    if !activation::is_well_formed(&code) {
        return Err(AppError::Validation("activation code is not valid".to_string()));
    }

    let store = state.store_for(Tenant::SuperAdmin);
    let mut customers = store.customers()?;

    if customers.iter().any(|c| c.activation_code == code) {
        return Err(AppError::Conflict("activation code already registered".to_string()));
    }

    let customer = Customer {
        id: Uuid::new_v4(),
        name: input.name.trim().to_string(),
        email: input.email.filter(|e| !e.trim().is_empty()),
        activation_code: code,
        created_at: Utc::now(),
    };

    customers.push(customer.clone());
    store.save_customers(&customers)?;

    audit::record(
        state.audit.as_ref(),
        &Tenant::SuperAdmin,
        &auth.audit_context(),
        AuditAction::Create,
        AuditEntity::Customer,
        Some(customer.id),
        format!("registered customer {}", customer.name),
    );

    Ok(Json(customer))
}

/// DELETE /api/admin/customers/{id}
///
/// Removes the registry entry only; the tenant's data stays under its
/// prefix and becomes unreachable rather than deleted.
#[utoipa::path(
    delete,
    path = "/api/admin/customers/{id}",
    params(
        ("id" = Uuid, Path, description = "Customer ID")
    ),
    responses(
        (status = 200, description = "Customer removed", body = CustomerMutationResponse),
        (status = 403, description = "Super administrator access required"),
        (status = 404, description = "Customer not found")
    ),
    tag = "admin",
    security(("cookie_auth" = []))
)]
pub async fn delete_customer(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CustomerMutationResponse>> {
    permissions::require_super_admin(&auth)?;

    let store = state.store_for(Tenant::SuperAdmin);
    let mut customers = store.customers()?;
    let customer = customers
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("customer not found".to_string()))?;

    customers.retain(|c| c.id != id);
    store.save_customers(&customers)?;

    audit::record(
        state.audit.as_ref(),
        &Tenant::SuperAdmin,
        &auth.audit_context(),
        AuditAction::Delete,
        AuditEntity::Customer,
        Some(id),
        format!("removed customer {}", customer.name),
    );

    Ok(Json(CustomerMutationResponse { success: true, message: None }))
}

/// GET /api/admin/logs
#[utoipa::path(
    get,
    path = "/api/admin/logs",
    responses(
        (status = 200, description = "Back-office audit entries, newest first", body = Vec<AuditLogEntry>),
        (status = 403, description = "Super administrator access required")
    ),
    tag = "admin",
    security(("cookie_auth" = []))
)]
pub async fn get_admin_logs(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
) -> AppResult<Json<Vec<AuditLogEntry>>> {
    permissions::require_super_admin(&auth)?;

    let mut entries = state.audit.entries(&Tenant::SuperAdmin)?;
    entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    Ok(Json(entries))
}
