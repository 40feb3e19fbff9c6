//! Employees and their performance, leave and attendance records.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::info;

use crate::api::extract::CurrentUser;
use crate::api::response::ApiResult;
use crate::api::state::AppState;
use crate::models::{
    AttendanceInput, AttendanceRecord, Employee, EmployeeInput, LeaveInput, LeaveRecord,
    PerformanceInput, PerformanceReview,
};

use super::parse_body;

/// Handler for GET /employees.
///
/// Admins see every employee; anyone else sees only their own record.
pub(super) async fn list_employees(
    caller: CurrentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<Employee>>> {
    if caller.user.is_admin() {
        return Ok(Json(state.store().list_employees().await?));
    }
    let own = match caller.user.emp_id {
        Some(emp_id) => vec![state.store().get_employee(emp_id).await?],
        None => Vec::new(),
    };
    Ok(Json(own))
}

/// Handler for POST /employees.
pub(super) async fn create_employee(
    caller: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<EmployeeInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Employee>)> {
    caller.require_admin()?;
    let input = parse_body(payload, caller.correlation_id)?;
    let employee = state.store().create_employee(input).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

/// Handler for GET /employees/:id.
pub(super) async fn get_employee(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(emp_id): Path<i64>,
) -> ApiResult<Json<Employee>> {
    caller.require_access(emp_id)?;
    Ok(Json(state.store().get_employee(emp_id).await?))
}

/// Handler for PUT /employees/:id.
pub(super) async fn update_employee(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(emp_id): Path<i64>,
    payload: Result<Json<EmployeeInput>, JsonRejection>,
) -> ApiResult<Json<Employee>> {
    caller.require_admin()?;
    let input = parse_body(payload, caller.correlation_id)?;
    Ok(Json(state.store().update_employee(emp_id, input).await?))
}

/// Handler for DELETE /employees/:id.
pub(super) async fn delete_employee(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(emp_id): Path<i64>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    state.store().delete_employee(emp_id).await?;
    info!(
        correlation_id = %caller.correlation_id,
        emp_id,
        "Employee removed"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /employees/:id/performance.
pub(super) async fn list_performance(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(emp_id): Path<i64>,
) -> ApiResult<Json<Vec<PerformanceReview>>> {
    caller.require_access(emp_id)?;
    state.store().get_employee(emp_id).await?;
    Ok(Json(state.store().list_performance(emp_id).await?))
}

/// Handler for POST /employees/:id/performance.
pub(super) async fn add_performance(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(emp_id): Path<i64>,
    payload: Result<Json<PerformanceInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<PerformanceReview>)> {
    caller.require_admin()?;
    let input = parse_body(payload, caller.correlation_id)?;
    let review = state.store().add_performance(emp_id, input).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Handler for GET /employees/:id/leaves.
pub(super) async fn list_leaves(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(emp_id): Path<i64>,
) -> ApiResult<Json<Vec<LeaveRecord>>> {
    caller.require_access(emp_id)?;
    state.store().get_employee(emp_id).await?;
    Ok(Json(state.store().list_leaves(emp_id).await?))
}

/// Handler for POST /employees/:id/leaves.
pub(super) async fn add_leave(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(emp_id): Path<i64>,
    payload: Result<Json<LeaveInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<LeaveRecord>)> {
    caller.require_access(emp_id)?;
    let input = parse_body(payload, caller.correlation_id)?;
    let leave = state.store().add_leave(emp_id, input).await?;
    Ok((StatusCode::CREATED, Json(leave)))
}

/// Handler for GET /employees/:id/attendance.
pub(super) async fn list_attendance(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(emp_id): Path<i64>,
) -> ApiResult<Json<Vec<AttendanceRecord>>> {
    caller.require_access(emp_id)?;
    state.store().get_employee(emp_id).await?;
    Ok(Json(state.store().list_attendance(emp_id).await?))
}

/// Handler for POST /employees/:id/attendance.
pub(super) async fn mark_attendance(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(emp_id): Path<i64>,
    payload: Result<Json<AttendanceInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AttendanceRecord>)> {
    caller.require_access(emp_id)?;
    let input = parse_body(payload, caller.correlation_id)?;
    let record = state.store().mark_attendance(emp_id, input).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Handler for DELETE /performance/:id.
pub(super) async fn delete_performance(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(perf_id): Path<i64>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    state.store().delete_performance(perf_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /leaves/:id.
pub(super) async fn delete_leave(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(leave_id): Path<i64>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    state.store().delete_leave(leave_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE /attendance/:id.
pub(super) async fn delete_attendance(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    state.store().delete_attendance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
