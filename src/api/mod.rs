//! HTTP API module for the HR system.
//!
//! This module provides the JSON REST API over the store: login sessions,
//! user accounts, employees and their records, payroll and payslip PDFs.

mod extract;
mod handlers;
mod request;
mod response;
mod state;

pub use extract::CurrentUser;
pub use handlers::create_router;
pub use request::{
    ChangePasswordRequest, CreateUserRequest, GeneratePayrollRequest, LoginRequest, MonthField,
    RegisterRequest,
};
pub use response::{ApiError, ApiErrorResponse, ApiResult, HealthResponse, LoginResponse};
pub use state::AppState;
