use crate::auth::SessionRole;
use crate::error::AppError;

use super::auth::AuthenticatedUser;

/// User management, settings, audit reads, and backup restore require
/// the admin role; the super administrator passes everywhere.
pub fn require_admin(auth: &AuthenticatedUser) -> Result<(), AppError> {
    match auth.role {
        SessionRole::Admin | SessionRole::SuperAdmin => Ok(()),
        SessionRole::User => {
            Err(AppError::Forbidden("admin role required".to_string()))
        }
    }
}

/// The back office is reserved for the super administrator.
pub fn require_super_admin(auth: &AuthenticatedUser) -> Result<(), AppError> {
    if auth.is_super_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden("super administrator access required".to_string()))
    }
}
