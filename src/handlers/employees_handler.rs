use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::{
    audit, calendar,
    extractors::AuthenticatedUser,
    leave,
    leave::BalanceSummary,
    models::{
        AuditAction, AuditEntity, CreateEmployeeInput, Employee, EmployeeMutationResponse,
        UpdateEmployeeInput,
    },
    AppError, AppResult, AppState,
};

/// GET /api/employees
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "List of all employees", body = Vec<Employee>)
    ),
    tag = "employees",
    security(("cookie_auth" = []))
)]
pub async fn get_employees(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
) -> AppResult<Json<Vec<Employee>>> {
    let mut employees = state.tenant_store().employees()?;
    employees.sort_by(|a, b| a.last_name.cmp(&b.last_name));
    Ok(Json(employees))
}

/// GET /api/employees/{id}
#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(
        ("id" = Uuid, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "employees",
    security(("cookie_auth" = []))
)]
pub async fn get_employee(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Employee>> {
    let employees = state.tenant_store().employees()?;
    let employee = employees
        .into_iter()
        .find(|e| e.id == id)
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;
    Ok(Json(employee))
}

/// POST /api/employees
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployeeInput,
    responses(
        (status = 200, description = "Employee created", body = Employee),
        (status = 422, description = "Missing required field")
    ),
    tag = "employees",
    security(("cookie_auth" = []))
)]
pub async fn create_employee(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Json(input): Json<CreateEmployeeInput>,
) -> AppResult<Json<Employee>> {
    for (value, label) in [
        (&input.first_name, "first name"),
        (&input.last_name, "last name"),
        (&input.employee_code, "employee code"),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{} is required", label)));
        }
    }

    let store = state.tenant_store();
    let mut employees = store.employees()?;

    // Personnel codes are expected to be unique but duplicates are not
    // rejected; the original system behaves the same way.
    if employees.iter().any(|e| e.employee_code == input.employee_code.trim()) {
        tracing::warn!(code = %input.employee_code, "duplicate employee code");
    }

    let employee = Employee {
        id: Uuid::new_v4(),
        first_name: input.first_name.trim().to_string(),
        last_name: input.last_name.trim().to_string(),
        employee_code: input.employee_code.trim().to_string(),
        position: input.position.trim().to_string(),
        created_at: Utc::now(),
    };

    employees.push(employee.clone());
    store.save_employees(&employees)?;

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &auth.audit_context(),
        AuditAction::Create,
        AuditEntity::Employee,
        Some(employee.id),
        format!("created employee {}", employee.full_name()),
    );

    Ok(Json(employee))
}

/// PUT /api/employees/{id}
#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(
        ("id" = Uuid, Path, description = "Employee ID")
    ),
    request_body = UpdateEmployeeInput,
    responses(
        (status = 200, description = "Employee updated", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    tag = "employees",
    security(("cookie_auth" = []))
)]
pub async fn update_employee(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateEmployeeInput>,
) -> AppResult<Json<Employee>> {
    let store = state.tenant_store();
    let mut employees = store.employees()?;
    let employee = employees
        .iter_mut()
        .find(|e| e.id == id)
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;

    if let Some(first_name) = input.first_name {
        employee.first_name = first_name.trim().to_string();
    }
    if let Some(last_name) = input.last_name {
        employee.last_name = last_name.trim().to_string();
    }
    if let Some(employee_code) = input.employee_code {
        employee.employee_code = employee_code.trim().to_string();
    }
    if let Some(position) = input.position {
        employee.position = position.trim().to_string();
    }

    let updated = employee.clone();
    store.save_employees(&employees)?;

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &auth.audit_context(),
        AuditAction::Update,
        AuditEntity::Employee,
        Some(id),
        format!("updated employee {}", updated.full_name()),
    );

    Ok(Json(updated))
}

/// DELETE /api/employees/{id}
///
/// Cascades to the employee's leave records; the cascade is covered by
/// the single employee-deletion audit entry.
#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(
        ("id" = Uuid, Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee and their leave records deleted", body = EmployeeMutationResponse),
        (status = 404, description = "Employee not found")
    ),
    tag = "employees",
    security(("cookie_auth" = []))
)]
pub async fn delete_employee(
    State(state): State<Arc<AppState>>,
    auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EmployeeMutationResponse>> {
    let store = state.tenant_store();
    let mut employees = store.employees()?;
    let employee = employees
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .ok_or_else(|| AppError::NotFound("employee not found".to_string()))?;

    employees.retain(|e| e.id != id);
    store.save_employees(&employees)?;

    let mut leaves = store.leaves()?;
    let before = leaves.len();
    leaves.retain(|l| l.employee_id != id);
    let removed = before - leaves.len();
    if removed > 0 {
        store.save_leaves(&leaves)?;
    }

    audit::record(
        state.audit.as_ref(),
        store.tenant(),
        &auth.audit_context(),
        AuditAction::Delete,
        AuditEntity::Employee,
        Some(id),
        format!("deleted employee {} and {} leave records", employee.full_name(), removed),
    );

    Ok(Json(EmployeeMutationResponse { success: true, message: None }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GetBalanceQuery {
    /// Jalaali year; defaults to the current year.
    pub year: Option<i32>,
}

/// GET /api/employees/{id}/balance?year=
///
/// Computed from the current records on every call; nothing is cached.
#[utoipa::path(
    get,
    path = "/api/employees/{id}/balance",
    params(
        ("id" = Uuid, Path, description = "Employee ID"),
        GetBalanceQuery
    ),
    responses(
        (status = 200, description = "Leave balance for the requested Jalaali year", body = BalanceSummary),
        (status = 404, description = "Employee not found")
    ),
    tag = "employees",
    security(("cookie_auth" = []))
)]
pub async fn get_employee_balance(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Query(query): Query<GetBalanceQuery>,
) -> AppResult<Json<BalanceSummary>> {
    let store = state.tenant_store();
    let employees = store.employees()?;
    if !employees.iter().any(|e| e.id == id) {
        return Err(AppError::NotFound("employee not found".to_string()));
    }

    let year = match query.year {
        Some(year) => year,
        None => calendar::to_jalaali(Utc::now().date_naive())?.year,
    };

    let records: Vec<_> =
        store.leaves()?.into_iter().filter(|l| l.employee_id == id).collect();
    let limit = store.settings()?.annual_leave_limit;

    Ok(Json(leave::summarize(&records, year, limit)?))
}
