//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the HR system
//! configuration from YAML files and the environment.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{HrError, HrResult};

use super::types::{HrConfig, Secrets};

/// Environment variable overriding `database.url`.
pub const ENV_DATABASE_URL: &str = "HR_DATABASE_URL";
/// Environment variable overriding `server.bind_address`.
pub const ENV_BIND_ADDRESS: &str = "HR_BIND_ADDRESS";
/// Environment variable overriding the default admin username.
pub const ENV_ADMIN_USERNAME: &str = "HR_ADMIN_USERNAME";
/// Environment variable overriding the default admin password.
pub const ENV_ADMIN_PASSWORD: &str = "HR_ADMIN_PASSWORD";

/// Loads and provides access to the HR system configuration.
///
/// # Directory Structure
///
/// ```text
/// config/
/// ├── hr.yaml        # Server, database, auth, payroll and payslip settings
/// └── secrets.yaml   # Optional, not committed: credentials overrides
/// ```
///
/// Values are layered: environment variables win over `secrets.yaml`,
/// which wins over `hr.yaml`, which wins over built-in defaults.
///
/// # Example
///
/// ```no_run
/// use hr_system::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config")?;
/// println!("Binding to {}", loader.config().server.bind_address);
/// # Ok::<(), hr_system::error::HrError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: HrConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if `hr.yaml` is missing or if either file contains
    /// invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> HrResult<Self> {
        let mut loader = Self::load_files(path)?;
        loader.apply_env(|key| std::env::var(key).ok());
        Ok(loader)
    }

    /// Loads configuration from the directory without consulting the environment.
    pub fn load_files<P: AsRef<Path>>(path: P) -> HrResult<Self> {
        let path = path.as_ref();

        let mut config = Self::load_yaml::<HrConfig>(&path.join("hr.yaml"))?;

        let secrets_path = path.join("secrets.yaml");
        if secrets_path.exists() {
            debug!(path = %secrets_path.display(), "Applying secrets file");
            let secrets = Self::load_yaml::<Secrets>(&secrets_path)?;
            config.apply_secrets(secrets);
        }

        Ok(Self { config })
    }

    /// Applies overrides from a variable lookup (normally the process environment).
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let secrets = Secrets {
            database_url: lookup(ENV_DATABASE_URL),
            admin_username: lookup(ENV_ADMIN_USERNAME),
            admin_password: lookup(ENV_ADMIN_PASSWORD),
        };
        self.config.apply_secrets(secrets);

        if let Some(bind) = lookup(ENV_BIND_ADDRESS) {
            self.config.server.bind_address = bind;
        }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> HrResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| HrError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| HrError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the loaded configuration.
    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    /// Consumes the loader, returning the configuration.
    pub fn into_config(self) -> HrConfig {
        self.config
    }
}
