//! Configuration loading and management for the HR system.
//!
//! This module loads the server, database, authentication, payroll and
//! payslip settings from YAML files, with an optional secrets file and
//! environment variable overrides layered on top.
//!
//! # Example
//!
//! ```no_run
//! use hr_system::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config").unwrap();
//! println!("Database: {}", config.config().database.url);
//! ```

mod loader;
mod types;

pub use loader::{
    ConfigLoader, ENV_ADMIN_PASSWORD, ENV_ADMIN_USERNAME, ENV_BIND_ADDRESS, ENV_DATABASE_URL,
};
pub use types::{
    AuthConfig, DatabaseConfig, DefaultAdmin, HrConfig, PayrollRules, PayslipSettings, Secrets,
    ServerConfig,
};
