//! User accounts and authentication.

use tracing::{info, warn};

use crate::auth::{hash_password, verify_password};
use crate::config::AuthConfig;
use crate::error::{HrError, HrResult};
use crate::models::{Role, User};

use super::{HrStore, conflict_on_unique, parse_column};

#[derive(sqlx::FromRow)]
struct UserRow {
    user_id: i64,
    username: String,
    password_hash: String,
    role: String,
    emp_id: Option<i64>,
}

impl UserRow {
    fn into_user(self) -> HrResult<(User, String)> {
        let role: Role = parse_column("role", &self.role)?;
        Ok((
            User {
                user_id: self.user_id,
                username: self.username,
                role,
                emp_id: self.emp_id,
            },
            self.password_hash,
        ))
    }
}

/// Fields for a new user account.
#[derive(Debug, Clone)]
pub struct NewUser<'a> {
    /// Login name; surrounding whitespace is trimmed.
    pub username: &'a str,
    /// Clear-text password.
    pub password: &'a str,
    /// Role of the account.
    pub role: Role,
    /// Employee the account belongs to.
    pub emp_id: Option<i64>,
}

const USER_COLUMNS: &str = "user_id, username, password_hash, role, emp_id";

impl HrStore {
    /// Creates a user account.
    ///
    /// # Errors
    ///
    /// - `Validation` for an empty username or a too-short password.
    /// - `NotFound` if `emp_id` names no employee.
    /// - `Conflict` if the username is taken or the employee already has an account.
    pub async fn create_user(&self, new_user: NewUser<'_>, auth: &AuthConfig) -> HrResult<User> {
        let username = new_user.username.trim();
        if username.is_empty() {
            return Err(HrError::validation("username", "must not be empty"));
        }
        if new_user.password.chars().count() < auth.min_password_length {
            return Err(HrError::validation(
                "password",
                format!(
                    "must be at least {} characters",
                    auth.min_password_length
                ),
            ));
        }
        if let Some(emp_id) = new_user.emp_id {
            self.get_employee(emp_id).await?;
        }

        let password_hash = hash_password(new_user.password, auth.pbkdf2_rounds)?;

        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, role, emp_id) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(username)
        .bind(&password_hash)
        .bind(new_user.role.as_str())
        .bind(new_user.emp_id)
        .execute(self.pool())
        .await
        .map_err(|e| {
            conflict_on_unique(e, || match new_user.emp_id {
                Some(emp_id) => format!(
                    "username '{}' is taken or employee {} already has an account",
                    username, emp_id
                ),
                None => format!("username '{}' is taken", username),
            })
        })?;

        let user = User {
            user_id: result.last_insert_rowid(),
            username: username.to_string(),
            role: new_user.role,
            emp_id: new_user.emp_id,
        };
        info!(user_id = user.user_id, username = %user.username, role = %user.role, "Created user");
        Ok(user)
    }

    /// Checks a username and password.
    ///
    /// Returns `None` for an unknown user or a wrong password alike.
    pub async fn authenticate(&self, username: &str, password: &str) -> HrResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE username = ?1",
            USER_COLUMNS
        ))
        .bind(username.trim())
        .fetch_optional(self.pool())
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let (user, hash) = row.into_user()?;
        if verify_password(password, &hash) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Fetches a user by id.
    pub async fn get_user(&self, user_id: i64) -> HrResult<User> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE user_id = ?1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| HrError::not_found("user", user_id))?;
        Ok(row.into_user()?.0)
    }

    /// Lists every user ordered by id.
    pub async fn list_users(&self) -> HrResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users ORDER BY user_id",
            USER_COLUMNS
        ))
        .fetch_all(self.pool())
        .await?;
        rows.into_iter()
            .map(|row| row.into_user().map(|(user, _)| user))
            .collect()
    }

    /// Number of user accounts.
    pub async fn count_users(&self) -> HrResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }

    /// Deletes a user account.
    pub async fn delete_user(&self, user_id: i64) -> HrResult<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = ?1")
            .bind(user_id)
            .execute(self.pool())
            .await?;
        if result.rows_affected() == 0 {
            return Err(HrError::not_found("user", user_id));
        }
        info!(user_id, "Deleted user");
        Ok(())
    }

    /// Replaces a user's password after checking the current one.
    pub async fn change_password(
        &self,
        user_id: i64,
        current_password: &str,
        new_password: &str,
        auth: &AuthConfig,
    ) -> HrResult<()> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {} FROM users WHERE user_id = ?1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| HrError::not_found("user", user_id))?;

        if !verify_password(current_password, &row.password_hash) {
            return Err(HrError::InvalidCredentials);
        }
        if new_password.chars().count() < auth.min_password_length {
            return Err(HrError::validation(
                "new_password",
                format!(
                    "must be at least {} characters",
                    auth.min_password_length
                ),
            ));
        }

        let password_hash = hash_password(new_password, auth.pbkdf2_rounds)?;
        sqlx::query("UPDATE users SET password_hash = ?1 WHERE user_id = ?2")
            .bind(password_hash)
            .bind(user_id)
            .execute(self.pool())
            .await?;
        info!(user_id, "Password changed");
        Ok(())
    }

    /// Creates the configured admin account when no users exist.
    ///
    /// Returns the new admin, or `None` if accounts already existed.
    pub async fn ensure_default_admin(&self, auth: &AuthConfig) -> HrResult<Option<User>> {
        if self.count_users().await? > 0 {
            return Ok(None);
        }

        let admin = &auth.default_admin;
        let user = self
            .create_user(
                NewUser {
                    username: &admin.username,
                    password: &admin.password,
                    role: Role::Admin,
                    emp_id: None,
                },
                auth,
            )
            .await?;
        warn!(
            username = %user.username,
            "Created default admin account; change its password"
        );
        Ok(Some(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HrConfig;
    use crate::models::EmployeeInput;
    use rust_decimal::Decimal;

    fn auth() -> AuthConfig {
        HrConfig::in_memory().auth
    }

    async fn store_with_employee() -> (HrStore, i64) {
        let store = HrStore::in_memory().await.unwrap();
        let employee = store
            .create_employee(EmployeeInput {
                name: "Asha Rao".to_string(),
                department: "Finance".to_string(),
                designation: "Accountant".to_string(),
                basic_salary: Decimal::new(30000, 0),
            })
            .await
            .unwrap();
        (store, employee.emp_id)
    }

    fn new_user<'a>(username: &'a str, password: &'a str, emp_id: Option<i64>) -> NewUser<'a> {
        NewUser {
            username,
            password,
            role: Role::Employee,
            emp_id,
        }
    }

    #[tokio::test]
    async fn test_default_admin_created_once() {
        let store = HrStore::in_memory().await.unwrap();
        let auth = auth();

        let admin = store.ensure_default_admin(&auth).await.unwrap().unwrap();
        assert_eq!(admin.username, "Admin");
        assert_eq!(admin.role, Role::Admin);

        assert!(store.ensure_default_admin(&auth).await.unwrap().is_none());
        assert_eq!(store.count_users().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_default_admin_can_log_in() {
        let store = HrStore::in_memory().await.unwrap();
        store.ensure_default_admin(&auth()).await.unwrap();

        let user = store.authenticate("Admin", "admin@123").await.unwrap();
        assert!(user.is_some_and(|u| u.is_admin()));
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password_and_unknown_user() {
        let store = HrStore::in_memory().await.unwrap();
        store
            .create_user(new_user("ravi", "password1", None), &auth())
            .await
            .unwrap();

        assert!(store.authenticate("ravi", "password2").await.unwrap().is_none());
        assert!(store.authenticate("nobody", "password1").await.unwrap().is_none());
        assert!(store.authenticate("ravi", "password1").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let store = HrStore::in_memory().await.unwrap();
        store
            .create_user(new_user("ravi", "password1", None), &auth())
            .await
            .unwrap();
        let result = store
            .create_user(new_user(" ravi ", "password2", None), &auth())
            .await;
        assert!(matches!(result, Err(HrError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_employee_can_only_have_one_account() {
        let (store, emp_id) = store_with_employee().await;
        store
            .create_user(new_user("asha", "password1", Some(emp_id)), &auth())
            .await
            .unwrap();
        let result = store
            .create_user(new_user("asha2", "password1", Some(emp_id)), &auth())
            .await;
        assert!(matches!(result, Err(HrError::Conflict { .. })));
    }

    #[tokio::test]
    async fn test_unknown_employee_link_rejected() {
        let store = HrStore::in_memory().await.unwrap();
        let result = store
            .create_user(new_user("ghost", "password1", Some(404)), &auth())
            .await;
        assert!(matches!(result, Err(HrError::NotFound { entity: "employee", .. })));
    }

    #[tokio::test]
    async fn test_short_password_and_blank_username_rejected() {
        let store = HrStore::in_memory().await.unwrap();
        let short = store.create_user(new_user("ravi", "abc", None), &auth()).await;
        assert!(matches!(short, Err(HrError::Validation { field, .. }) if field == "password"));

        let blank = store
            .create_user(new_user("   ", "password1", None), &auth())
            .await;
        assert!(matches!(blank, Err(HrError::Validation { field, .. }) if field == "username"));
    }

    #[tokio::test]
    async fn test_change_password() {
        let store = HrStore::in_memory().await.unwrap();
        let user = store
            .create_user(new_user("ravi", "password1", None), &auth())
            .await
            .unwrap();

        let wrong = store
            .change_password(user.user_id, "nope", "password2", &auth())
            .await;
        assert!(matches!(wrong, Err(HrError::InvalidCredentials)));

        store
            .change_password(user.user_id, "password1", "password2", &auth())
            .await
            .unwrap();
        assert!(store.authenticate("ravi", "password1").await.unwrap().is_none());
        assert!(store.authenticate("ravi", "password2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_list_and_delete_users() {
        let store = HrStore::in_memory().await.unwrap();
        store.ensure_default_admin(&auth()).await.unwrap();
        let ravi = store
            .create_user(new_user("ravi", "password1", None), &auth())
            .await
            .unwrap();

        let users = store.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[1].username, "ravi");

        store.delete_user(ravi.user_id).await.unwrap();
        assert!(matches!(
            store.get_user(ravi.user_id).await,
            Err(HrError::NotFound { .. })
        ));
        assert!(matches!(
            store.delete_user(ravi.user_id).await,
            Err(HrError::NotFound { .. })
        ));
    }
}
