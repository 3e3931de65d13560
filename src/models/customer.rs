use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A customer record in the super-admin back office: one entry per
/// issued activation code.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub activation_code: String,
    pub created_at: DateTime<Utc>,
}

/// Input DTO for registering a customer
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCustomerInput {
    pub name: String,
    pub email: Option<String>,
    pub activation_code: String,
}

/// Response after customer mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomerMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}
