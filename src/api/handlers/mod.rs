//! HTTP request handlers for the HR API.
//!
//! Handlers are grouped by resource. Every handler except health, login
//! and register takes a [`CurrentUser`](super::extract::CurrentUser), so an
//! unauthenticated request is rejected with 401 before its body is read.

mod auth;
mod employees;
mod payroll;

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    routing::{delete, get, post},
};
use uuid::Uuid;

use super::response::{ApiResult, HealthResponse, json_rejection};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/register", post(auth::register))
        .route("/auth/me", get(auth::me))
        .route("/auth/password", post(auth::change_password))
        .route("/users", get(auth::list_users).post(auth::create_user))
        .route("/users/:id", delete(auth::delete_user))
        .route(
            "/employees",
            get(employees::list_employees).post(employees::create_employee),
        )
        .route(
            "/employees/:id",
            get(employees::get_employee)
                .put(employees::update_employee)
                .delete(employees::delete_employee),
        )
        .route(
            "/employees/:id/performance",
            get(employees::list_performance).post(employees::add_performance),
        )
        .route(
            "/employees/:id/leaves",
            get(employees::list_leaves).post(employees::add_leave),
        )
        .route(
            "/employees/:id/attendance",
            get(employees::list_attendance).post(employees::mark_attendance),
        )
        .route("/employees/:id/payroll", get(payroll::employee_payroll))
        .route("/performance/:id", delete(employees::delete_performance))
        .route("/leaves/:id", delete(employees::delete_leave))
        .route("/attendance/:id", delete(employees::delete_attendance))
        .route("/payroll", post(payroll::generate_payroll))
        .route("/payroll/preview", post(payroll::preview_payroll))
        .route(
            "/payroll/:id",
            get(payroll::get_payroll).delete(payroll::delete_payroll),
        )
        .route("/payroll/:id/payslip", get(payroll::download_payslip))
        .with_state(state)
}

/// Handler for GET /health.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Unwraps a JSON body or turns the rejection into a 400.
fn parse_body<T>(payload: Result<Json<T>, JsonRejection>, correlation_id: Uuid) -> ApiResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| json_rejection(rejection, correlation_id))
}
