pub mod audit;
pub mod customer;
pub mod employee;
pub mod employee_input;
pub mod leave;
pub mod leave_input;
pub mod settings;
pub mod user;
pub mod user_input;

pub use audit::{AuditAction, AuditEntity, AuditLogEntry};
pub use customer::{CreateCustomerInput, Customer, CustomerMutationResponse};
pub use employee::Employee;
pub use employee_input::{CreateEmployeeInput, EmployeeMutationResponse, UpdateEmployeeInput};
pub use leave::{LeaveCategory, LeaveDetail, LeaveRecord};
pub use leave_input::{CreateLeaveInput, LeaveKind, LeaveMutationResponse, UpdateLeaveInput};
pub use settings::{Settings, UpdateSettingsInput, DEFAULT_ANNUAL_LEAVE_LIMIT};
pub use user::{Role, User, UserView};
pub use user_input::{CreateUserInput, UpdateUserInput, UserMutationResponse};
