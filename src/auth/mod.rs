pub mod session;

pub use session::{issue_token, validate_token, SessionClaims, SessionRole, SESSION_TTL_HOURS};
