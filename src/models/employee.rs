//! Employee model.
//!
//! This module defines the Employee struct and the payload used to
//! create or update one.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{HrError, HrResult};

/// Represents an employee on the payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub emp_id: i64,
    /// Full name.
    pub name: String,
    /// Department (e.g. "Engineering").
    pub department: String,
    /// Job title (e.g. "Analyst").
    pub designation: String,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
}

/// The editable fields of an employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeInput {
    /// Full name.
    pub name: String,
    /// Department.
    #[serde(default)]
    pub department: String,
    /// Job title.
    #[serde(default)]
    pub designation: String,
    /// Monthly basic salary.
    #[serde(default)]
    pub basic_salary: Decimal,
}

impl EmployeeInput {
    /// Trims text fields and checks the name and salary.
    ///
    /// # Examples
    ///
    /// ```
    /// use hr_system::models::EmployeeInput;
    /// use rust_decimal::Decimal;
    ///
    /// let input = EmployeeInput {
    ///     name: "  Asha Rao ".to_string(),
    ///     department: "Finance".to_string(),
    ///     designation: "Accountant".to_string(),
    ///     basic_salary: Decimal::new(3000000, 2),
    /// };
    /// let clean = input.validated().unwrap();
    /// assert_eq!(clean.name, "Asha Rao");
    /// ```
    pub fn validated(self) -> HrResult<Self> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(HrError::validation("name", "must not be empty"));
        }
        if self.basic_salary < Decimal::ZERO {
            return Err(HrError::validation("basic_salary", "must not be negative"));
        }
        Ok(Self {
            name,
            department: self.department.trim().to_string(),
            designation: self.designation.trim().to_string(),
            basic_salary: self.basic_salary,
        })
    }
}
