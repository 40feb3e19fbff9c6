//! SQLite persistence for the HR system.
//!
//! [`HrStore`] owns the connection pool and exposes one method per
//! operation, grouped by table in the submodules. The schema is created by
//! the embedded migrations in `migrations/`.

mod employees;
mod payroll;
mod records;
mod users;

pub use payroll::PayrollRequest;
pub use users::NewUser;

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::config::DatabaseConfig;
use crate::error::{HrError, HrResult};

/// Handle to the HR database.
///
/// Cloning is cheap; clones share the pool.
#[derive(Debug, Clone)]
pub struct HrStore {
    pool: SqlitePool,
}

impl HrStore {
    /// Connects to the configured database and applies migrations.
    ///
    /// File databases are created (with their parent directory) if missing.
    /// In-memory databases use a single long-lived connection so every
    /// caller sees the same data.
    pub async fn connect(config: &DatabaseConfig) -> HrResult<Self> {
        let in_memory = config.url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(&config.url)?.create_if_missing(true);

        if !in_memory {
            if let Some(parent) = options.clone().get_filename().parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(sqlx::Error::Io)?;
                }
            }
        }

        let max_connections = if in_memory {
            1
        } else {
            config.max_connections.max(1)
        };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        info!(url = %config.url, max_connections, "Connected to database");
        Ok(store)
    }

    /// Connects to a fresh in-memory database.
    pub async fn in_memory() -> HrResult<Self> {
        Self::connect(&DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        })
        .await
    }

    /// Applies the embedded migrations.
    pub async fn run_migrations(&self) -> HrResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Turns a unique-constraint violation into a `Conflict` error.
fn conflict_on_unique(error: sqlx::Error, message: impl FnOnce() -> String) -> HrError {
    match &error {
        sqlx::Error::Database(db) if db.is_unique_violation() => HrError::Conflict {
            message: message(),
        },
        _ => HrError::Database(error),
    }
}

/// Parses a decimal amount stored as TEXT.
fn parse_amount(column: &str, text: &str) -> HrResult<Decimal> {
    Decimal::from_str(text).map_err(|e| {
        HrError::Database(sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        })
    })
}

/// Parses an enum stored as TEXT.
fn parse_column<T>(column: &str, text: &str) -> HrResult<T>
where
    T: FromStr<Err = HrError>,
{
    text.parse().map_err(|e: HrError| {
        HrError::Database(sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: e.to_string().into(),
        })
    })
}
