use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::Role;

/// Input DTO for creating a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserInput {
    pub username: String,
    pub password: String,
    pub role: Role,
}

/// Input DTO for updating a user
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserInput {
    pub password: Option<String>,
    pub role: Option<Role>,
}

/// Response after user mutations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserMutationResponse {
    pub success: bool,
    pub message: Option<String>,
}
