//! Request types for the HR API.
//!
//! Record bodies (employees, reviews, leave, attendance) reuse the input
//! types from [`crate::models`]; this module holds the rest.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::HrResult;
use crate::models::{PayPeriod, Role};
use crate::store::PayrollRequest;

/// Body of `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Login name.
    pub username: String,
    /// Clear-text password.
    pub password: String,
}

/// Body of `POST /auth/register`.
///
/// Self-registered accounts always get the employee role and no employee
/// link; an admin links accounts through `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Login name.
    pub username: String,
    /// Clear-text password.
    pub password: String,
}

/// Body of `POST /users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    /// Login name.
    pub username: String,
    /// Clear-text password.
    pub password: String,
    /// Role, `employee` unless given.
    #[serde(default = "default_role")]
    pub role: Role,
    /// Employee to link the account to.
    #[serde(default)]
    pub emp_id: Option<i64>,
}

fn default_role() -> Role {
    Role::Employee
}

/// Body of `POST /auth/password`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordRequest {
    /// The password in use now.
    pub current_password: String,
    /// The replacement.
    pub new_password: String,
}

/// A month given either as a number (1-12) or an English name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MonthField {
    /// 1 = January.
    Number(u32),
    /// "January", "jan", ...
    Name(String),
}

/// Body of `POST /payroll` and `POST /payroll/preview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratePayrollRequest {
    /// The employee to pay.
    pub emp_id: i64,
    /// The month to pay.
    pub month: MonthField,
    /// The calendar year.
    pub year: i32,
    /// Extra allowances.
    #[serde(default)]
    pub allowances: Decimal,
    /// Extra deductions.
    #[serde(default)]
    pub deductions: Decimal,
}

impl GeneratePayrollRequest {
    /// Resolves the month and builds the store request.
    pub fn to_payroll_request(&self) -> HrResult<PayrollRequest> {
        let period = match &self.month {
            MonthField::Number(month) => PayPeriod::new(self.year, *month)?,
            MonthField::Name(name) => PayPeriod::from_month_name(self.year, name)?,
        };
        Ok(PayrollRequest {
            emp_id: self.emp_id,
            period,
            allowances: self.allowances,
            deductions: self.deductions,
        })
    }
}
