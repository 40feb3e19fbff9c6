//! Configuration types for the HR system.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files. Every field has a
//! default so a partial `hr.yaml` is always valid.

use rust_decimal::Decimal;
use serde::Deserialize;

/// HTTP server settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// The socket address the server binds to.
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Database connection settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite connection URL (e.g. `sqlite://data/hr_system.db` or `sqlite::memory:`).
    pub url: String,
    /// Maximum number of pooled connections.
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://data/hr_system.db".to_string(),
            max_connections: 5,
        }
    }
}

/// Credentials for the administrator account created on first start.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DefaultAdmin {
    /// The admin username.
    pub username: String,
    /// The admin password in clear text.
    pub password: String,
}

impl Default for DefaultAdmin {
    fn default() -> Self {
        Self {
            username: "Admin".to_string(),
            password: "admin@123".to_string(),
        }
    }
}

/// Authentication settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// How long a login session stays valid.
    pub session_ttl_minutes: i64,
    /// Minimum accepted password length.
    pub min_password_length: usize,
    /// PBKDF2 iteration count for new hashes.
    pub pbkdf2_rounds: u32,
    /// Account created when the users table is empty.
    pub default_admin: DefaultAdmin,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_ttl_minutes: 480,
            min_password_length: 6,
            pbkdf2_rounds: 29_000,
            default_admin: DefaultAdmin::default(),
        }
    }
}

/// Rules applied when computing payroll.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayrollRules {
    /// House rent allowance as a fraction of basic salary.
    pub hra_rate: Decimal,
    /// Whether unpaid leave days reduce pay.
    pub unpaid_leave_deduction: bool,
}

impl Default for PayrollRules {
    fn default() -> Self {
        Self {
            hra_rate: Decimal::new(20, 2),
            unpaid_leave_deduction: true,
        }
    }
}

/// Payslip presentation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PayslipSettings {
    /// Company name printed in the payslip header.
    pub company_name: String,
    /// Currency label printed next to amounts.
    pub currency: String,
}

impl Default for PayslipSettings {
    fn default() -> Self {
        Self {
            company_name: "HR System".to_string(),
            currency: "INR".to_string(),
        }
    }
}

/// Optional secret overrides loaded from `secrets.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Secrets {
    /// Overrides `database.url`.
    pub database_url: Option<String>,
    /// Overrides `auth.default_admin.username`.
    pub admin_username: Option<String>,
    /// Overrides `auth.default_admin.password`.
    pub admin_password: Option<String>,
}

/// The complete HR system configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct HrConfig {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Database settings.
    pub database: DatabaseConfig,
    /// Authentication settings.
    pub auth: AuthConfig,
    /// Payroll rules.
    pub payroll: PayrollRules,
    /// Payslip settings.
    pub payslip: PayslipSettings,
}

impl HrConfig {
    /// Applies secret overrides on top of this configuration.
    pub fn apply_secrets(&mut self, secrets: Secrets) {
        if let Some(url) = secrets.database_url {
            self.database.url = url;
        }
        if let Some(username) = secrets.admin_username {
            self.auth.default_admin.username = username;
        }
        if let Some(password) = secrets.admin_password {
            self.auth.default_admin.password = password;
        }
    }

    /// Returns a configuration backed by an in-memory database.
    ///
    /// Uses a low PBKDF2 round count so tests stay fast.
    pub fn in_memory() -> Self {
        let mut config = Self::default();
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;
        config.auth.pbkdf2_rounds = 1_000;
        config
    }
}
