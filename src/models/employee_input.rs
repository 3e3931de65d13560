use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Input DTO for creating an employee
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateEmployeeInput {
    pub first_name: String,
    pub last_name: String,
    pub employee_code: String,
    pub position: String,
}

/// Input DTO for updating an employee
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateEmployeeInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub employee_code: Option<String>,
    pub position: Option<String>,
}

/// Response after employee mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmployeeMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}
