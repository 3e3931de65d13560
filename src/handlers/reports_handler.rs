use axum::{
    extract::{Query, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

use crate::{
    calendar,
    extractors::AuthenticatedUser,
    leave,
    leave::BalanceSummary,
    models::Employee,
    AppResult, AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct BalanceReportQuery {
    /// Jalaali year; defaults to the current year.
    pub year: Option<i32>,
}

/// One row of the all-employee balance report.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EmployeeBalanceRow {
    pub employee: Employee,
    pub summary: BalanceSummary,
}

/// GET /api/reports/balance?year=
///
/// The data feed behind the exported report: every employee's consumed
/// and remaining balance for one Jalaali year. File formatting happens
/// client-side.
#[utoipa::path(
    get,
    path = "/api/reports/balance",
    params(BalanceReportQuery),
    responses(
        (status = 200, description = "Balance rows for all employees", body = Vec<EmployeeBalanceRow>)
    ),
    tag = "reports",
    security(("cookie_auth" = []))
)]
pub async fn get_balance_report(
    State(state): State<Arc<AppState>>,
    _auth: AuthenticatedUser,
    Query(query): Query<BalanceReportQuery>,
) -> AppResult<Json<Vec<EmployeeBalanceRow>>> {
    let store = state.tenant_store();
    let year = match query.year {
        Some(year) => year,
        None => calendar::to_jalaali(Utc::now().date_naive())?.year,
    };

    let mut employees = store.employees()?;
    employees.sort_by(|a, b| a.last_name.cmp(&b.last_name));
    let leaves = store.leaves()?;
    let limit = store.settings()?.annual_leave_limit;

    let mut rows = Vec::with_capacity(employees.len());
    for employee in employees {
        let records: Vec<_> =
            leaves.iter().filter(|l| l.employee_id == employee.id).cloned().collect();
        let summary = leave::summarize(&records, year, limit)?;
        rows.push(EmployeeBalanceRow { employee, summary });
    }

    Ok(Json(rows))
}
