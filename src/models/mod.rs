//! Core data models for the HR system.
//!
//! This module contains all the domain models used throughout the system.

mod employee;
mod pay_period;
mod payroll;
mod records;
mod user;

pub use employee::{Employee, EmployeeInput};
pub use pay_period::PayPeriod;
pub use payroll::{ComponentKind, PayComponent, PayrollComputation, PayrollRecord, PayrollTotals};
pub use records::{
    AttendanceInput, AttendanceRecord, AttendanceStatus, AttendanceSummary, LeaveInput,
    LeaveRecord, LeaveType, MAX_LEAVE_DAYS, MAX_RATING, MIN_RATING, PerformanceInput, PerformanceReview,
};
pub use user::{Role, User};
