//! HR management service.
//!
//! This crate keeps employee records, performance reviews, leave and
//! attendance in SQLite, computes monthly payroll and renders PDF payslips.
//! Everything is served over a JSON HTTP API with password login and
//! admin/employee roles.

#![warn(missing_docs)]

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod payroll;
pub mod payslip;
pub mod store;
