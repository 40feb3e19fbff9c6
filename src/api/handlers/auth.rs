//! Login, sessions and user accounts.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::extract::CurrentUser;
use crate::api::request::{
    ChangePasswordRequest, CreateUserRequest, LoginRequest, RegisterRequest,
};
use crate::api::response::{ApiResult, LoginResponse};
use crate::api::state::AppState;
use crate::error::HrError;
use crate::models::{Role, User};
use crate::store::NewUser;

use super::parse_body;

/// Handler for POST /auth/login.
pub(super) async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(payload, correlation_id)?;

    let Some(user) = state
        .store()
        .authenticate(&request.username, &request.password)
        .await?
    else {
        warn!(
            correlation_id = %correlation_id,
            username = %request.username,
            "Login failed"
        );
        return Err(HrError::InvalidCredentials.into());
    };

    let session = state.sessions().create(user);
    info!(
        correlation_id = %correlation_id,
        user_id = session.user.user_id,
        role = %session.user.role,
        "Login succeeded"
    );
    Ok(Json(LoginResponse {
        token: session.token,
        expires_at: session.expires_at,
        user: session.user,
    }))
}

/// Handler for POST /auth/logout.
pub(super) async fn logout(caller: CurrentUser, State(state): State<AppState>) -> StatusCode {
    state.sessions().revoke(&caller.token);
    info!(
        correlation_id = %caller.correlation_id,
        user_id = caller.user.user_id,
        "Logged out"
    );
    StatusCode::NO_CONTENT
}

/// Handler for POST /auth/register.
pub(super) async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let correlation_id = Uuid::new_v4();
    let request = parse_body(payload, correlation_id)?;

    let user = state
        .store()
        .create_user(
            NewUser {
                username: &request.username,
                password: &request.password,
                role: Role::Employee,
                emp_id: None,
            },
            &state.config().auth,
        )
        .await?;
    info!(correlation_id = %correlation_id, user_id = user.user_id, "Registered user");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for GET /auth/me.
pub(super) async fn me(caller: CurrentUser) -> Json<User> {
    Json(caller.user)
}

/// Handler for POST /auth/password.
///
/// Every session of the user, including the current one, ends on success.
pub(super) async fn change_password(
    caller: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> ApiResult<StatusCode> {
    let request = parse_body(payload, caller.correlation_id)?;
    state
        .store()
        .change_password(
            caller.user.user_id,
            &request.current_password,
            &request.new_password,
            &state.config().auth,
        )
        .await?;
    let revoked = state.sessions().revoke_user(caller.user.user_id);
    info!(
        correlation_id = %caller.correlation_id,
        user_id = caller.user.user_id,
        revoked_sessions = revoked,
        "Password changed"
    );
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /users.
pub(super) async fn list_users(
    caller: CurrentUser,
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<User>>> {
    caller.require_admin()?;
    Ok(Json(state.store().list_users().await?))
}

/// Handler for POST /users.
pub(super) async fn create_user(
    caller: CurrentUser,
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<User>)> {
    caller.require_admin()?;
    let request = parse_body(payload, caller.correlation_id)?;

    let user = state
        .store()
        .create_user(
            NewUser {
                username: &request.username,
                password: &request.password,
                role: request.role,
                emp_id: request.emp_id,
            },
            &state.config().auth,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Handler for DELETE /users/:id.
pub(super) async fn delete_user(
    caller: CurrentUser,
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<StatusCode> {
    caller.require_admin()?;
    if user_id == caller.user.user_id {
        return Err(HrError::forbidden("cannot delete your own account").into());
    }
    state.store().delete_user(user_id).await?;
    state.sessions().revoke_user(user_id);
    info!(
        correlation_id = %caller.correlation_id,
        user_id,
        "Deleted user account"
    );
    Ok(StatusCode::NO_CONTENT)
}
