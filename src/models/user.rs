//! User account model and roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HrError;

/// The role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full access to every employee and every operation.
    Admin,
    /// Access limited to the linked employee's own records.
    Employee,
}

impl Role {
    /// Returns the stored representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = HrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            other => Err(HrError::validation(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// A user account.
///
/// The password hash is never part of the serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user.
    pub user_id: i64,
    /// Unique login name.
    pub username: String,
    /// The user's role.
    pub role: Role,
    /// The employee this account belongs to, if any.
    pub emp_id: Option<i64>,
}

impl User {
    /// Returns true if the user is an administrator.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Returns true if the user may see records of the given employee.
    ///
    /// Admins see everyone; other users only see their linked employee.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_system::models::{Role, User};
    ///
    /// let user = User {
    ///     user_id: 2,
    ///     username: "asha".to_string(),
    ///     role: Role::Employee,
    ///     emp_id: Some(7),
    /// };
    /// assert!(user.can_access_employee(7));
    /// assert!(!user.can_access_employee(8));
    /// ```
    pub fn can_access_employee(&self, emp_id: i64) -> bool {
        self.is_admin() || self.emp_id == Some(emp_id)
    }
}
