//! Bearer-token authentication for handlers.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};
use tracing::debug;
use uuid::Uuid;

use crate::error::{HrError, HrResult};
use crate::models::User;

use super::response::ApiErrorResponse;
use super::state::AppState;

/// The authenticated caller of a request.
///
/// Extracting this from a request fails with 401 unless the request carries
/// `Authorization: Bearer <token>` for a live session. The user is re-read
/// from the database so role and employee link changes apply immediately.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The caller.
    pub user: User,
    /// The session token used.
    pub token: Uuid,
    /// Identifier for log correlation.
    pub correlation_id: Uuid,
}

impl CurrentUser {
    /// Fails with `Forbidden` unless the caller is an admin.
    pub fn require_admin(&self) -> HrResult<()> {
        if self.user.is_admin() {
            Ok(())
        } else {
            Err(HrError::forbidden("administrator access required"))
        }
    }

    /// Fails with `Forbidden` unless the caller may see the employee's records.
    pub fn require_access(&self, emp_id: i64) -> HrResult<()> {
        if self.user.can_access_employee(emp_id) {
            Ok(())
        } else {
            Err(HrError::forbidden(format!(
                "no access to records of employee {}",
                emp_id
            )))
        }
    }
}

fn unauthorized(message: &str) -> ApiErrorResponse {
    HrError::Unauthorized {
        message: message.to_string(),
    }
    .into()
}

/// Pulls the token out of an `Authorization: Bearer` header value.
fn bearer_token(value: &str) -> Option<Uuid> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Uuid::parse_str(token.trim()).ok()
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiErrorResponse;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("missing bearer token"))?;
        let token = bearer_token(value).ok_or_else(|| unauthorized("malformed bearer token"))?;

        let session = state
            .sessions()
            .get(&token)
            .ok_or_else(|| unauthorized("session expired or unknown"))?;

        let user = match state.store().get_user(session.user.user_id).await {
            Ok(user) => user,
            Err(HrError::NotFound { .. }) => {
                state.sessions().revoke(&token);
                return Err(unauthorized("account no longer exists"));
            }
            Err(err) => return Err(err.into()),
        };

        let correlation_id = Uuid::new_v4();
        debug!(
            correlation_id = %correlation_id,
            user_id = user.user_id,
            path = %parts.uri.path(),
            "Authenticated request"
        );
        Ok(Self {
            user,
            token,
            correlation_id,
        })
    }
}
