//! Chooses and prepares the employee store at startup.
//!
//! # Environment Variables
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `STORAGE_MODE` | `in_memory` (default) or `postgres` |
//! | `DATABASE_URL` | connection string, mandatory for `postgres` |
//! | `EMPLOYEE_SEED_PATH` | JSON array of employee documents inserted at startup |
//!
//! # Example
//!
//! ```ignore
//! use nodebucket::infrastructure::{RepositoryConfig, RepositoryFactory};
//!
//! let config = RepositoryConfig::from_env()?;
//! let repository = RepositoryFactory::new(config).create().await?;
//! let employee = repository.find_by_emp_id(EmpId::new(1007)).await?;
//! ```

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;

use super::{
    EmployeeRepository, InMemoryEmployeeRepository, PostgresEmployeeRepository, RepositoryError,
};
use crate::domain::Employee;

// =============================================================================
// Configuration Types
// =============================================================================

/// Where employee documents live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageMode {
    /// A map inside this process; lost on restart.
    #[default]
    InMemory,
    /// One JSONB row per employee.
    Postgres,
}

impl FromStr for StorageMode {
    type Err = ConfigurationError;

    /// Accepts a few spellings of each mode, case-insensitively.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "in_memory" | "in-memory" | "memory" => Ok(Self::InMemory),
            "pg" | "postgres" | "postgresql" => Ok(Self::Postgres),
            other => Err(ConfigurationError::InvalidStorageMode(other.to_string())),
        }
    }
}

/// Settings read by [`RepositoryFactory`].
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfig {
    /// Selected backend.
    pub storage_mode: StorageMode,
    /// Connection string; only read in `Postgres` mode.
    pub database_url: Option<String>,
    /// Employee documents to load at startup.
    pub seed_path: Option<PathBuf>,
}

impl RepositoryConfig {
    /// Starts from the in-memory defaults.
    #[must_use]
    pub fn builder() -> RepositoryConfigBuilder {
        RepositoryConfigBuilder::default()
    }

    /// Reads the settings from the process environment.
    ///
    /// Blank values are treated as absent.
    ///
    /// # Errors
    ///
    /// Fails on an unknown `STORAGE_MODE`, or on `postgres` without a
    /// `DATABASE_URL`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        let storage_mode = match env::var_os("STORAGE_MODE") {
            None => StorageMode::default(),
            Some(raw) => raw
                .to_str()
                .ok_or_else(|| {
                    ConfigurationError::InvalidStorageMode(raw.to_string_lossy().into_owned())
                })?
                .parse()?,
        };

        let database_url = non_empty_var("DATABASE_URL");
        let seed_path = non_empty_var("EMPLOYEE_SEED_PATH").map(PathBuf::from);

        Self::builder()
            .storage_mode(storage_mode)
            .optional_database_url(database_url)
            .optional_seed_path(seed_path)
            .build()
    }

    /// Checks that the selected backend has what it needs.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::MissingDatabaseUrl`] for `Postgres` without a URL.
    pub const fn validate(&self) -> Result<(), ConfigurationError> {
        if matches!(self.storage_mode, StorageMode::Postgres) && self.database_url.is_none() {
            return Err(ConfigurationError::MissingDatabaseUrl);
        }
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Step-by-step construction of a [`RepositoryConfig`].
///
/// ```ignore
/// let config = RepositoryConfig::builder()
///     .storage_mode(StorageMode::Postgres)
///     .database_url("postgres://localhost/nodebucket")
///     .build()?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct RepositoryConfigBuilder {
    storage_mode: StorageMode,
    database_url: Option<String>,
    seed_path: Option<PathBuf>,
}

impl RepositoryConfigBuilder {
    /// Selects the backend.
    #[must_use]
    pub const fn storage_mode(mut self, mode: StorageMode) -> Self {
        self.storage_mode = mode;
        self
    }

    /// Connection string for the `Postgres` backend.
    #[must_use]
    pub fn database_url(self, url: impl Into<String>) -> Self {
        self.optional_database_url(Some(url.into()))
    }

    #[must_use]
    fn optional_database_url(mut self, url: Option<String>) -> Self {
        self.database_url = url;
        self
    }

    /// File of employee documents to insert at startup.
    #[must_use]
    pub fn seed_path(self, path: impl Into<PathBuf>) -> Self {
        self.optional_seed_path(Some(path.into()))
    }

    #[must_use]
    fn optional_seed_path(mut self, path: Option<PathBuf>) -> Self {
        self.seed_path = path;
        self
    }

    /// Finishes the configuration.
    ///
    /// # Errors
    ///
    /// Same checks as [`RepositoryConfig::validate`].
    pub fn build(self) -> Result<RepositoryConfig, ConfigurationError> {
        let Self {
            storage_mode,
            database_url,
            seed_path,
        } = self;
        let config = RepositoryConfig {
            storage_mode,
            database_url,
            seed_path,
        };

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Error Types
// =============================================================================

/// Rejected storage settings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `STORAGE_MODE` names no known backend.
    #[error("unknown storage mode '{0}' (use in_memory or postgres)")]
    InvalidStorageMode(String),

    /// `postgres` was selected without a connection string.
    #[error("STORAGE_MODE=postgres needs DATABASE_URL to be set")]
    MissingDatabaseUrl,
}

/// Startup failures while preparing the store.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// See [`ConfigurationError`].
    #[error("invalid storage configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The pool could not reach the database.
    #[error("cannot connect to PostgreSQL: {0}")]
    DatabaseConnection(String),

    /// The seed file could not be read or parsed.
    #[error("cannot load seed file {}: {message}", .path.display())]
    Seed { path: PathBuf, message: String },

    /// A repository operation failed during initialization.
    #[error("store rejected startup work: {0}")]
    Repository(#[from] RepositoryError),
}

// =============================================================================
// Repository Factory
// =============================================================================

/// Turns a [`RepositoryConfig`] into a ready [`EmployeeRepository`].
#[derive(Debug, Clone)]
pub struct RepositoryFactory {
    config: RepositoryConfig,
}

impl RepositoryFactory {
    /// Wraps validated settings.
    #[must_use]
    pub const fn new(config: RepositoryConfig) -> Self {
        Self { config }
    }

    /// Connects the backend, prepares its schema, and applies the seed file.
    ///
    /// # Errors
    ///
    /// Returns `FactoryError` if the configuration is invalid, the database
    /// is unreachable, or the seed file cannot be loaded.
    pub async fn create(&self) -> Result<Arc<dyn EmployeeRepository>, FactoryError> {
        self.config.validate()?;

        let repository: Arc<dyn EmployeeRepository> = match self.config.storage_mode {
            StorageMode::InMemory => {
                tracing::info!("Using in-memory employee storage");
                Arc::new(InMemoryEmployeeRepository::new())
            }
            StorageMode::Postgres => {
                let url = self
                    .config
                    .database_url
                    .as_deref()
                    .ok_or(ConfigurationError::MissingDatabaseUrl)?;
                let pool = PgPool::connect(url)
                    .await
                    .map_err(|error| FactoryError::DatabaseConnection(error.to_string()))?;
                let repository = PostgresEmployeeRepository::new(pool);
                repository.ensure_schema().await?;
                tracing::info!("Using PostgreSQL employee storage");
                Arc::new(repository)
            }
        };

        if let Some(path) = &self.config.seed_path {
            let employees = load_seed_file(path)?;
            let inserted = seed_employees(repository.as_ref(), employees).await?;
            tracing::info!(inserted, path = %path.display(), "Employee seed applied");
        }

        Ok(repository)
    }
}

/// Reads a JSON array of employee documents.
///
/// # Errors
///
/// Returns `FactoryError::Seed` if the file is unreadable or is not an
/// array of employee documents.
pub fn load_seed_file(path: &Path) -> Result<Vec<Employee>, FactoryError> {
    let seed_error = |message: String| FactoryError::Seed {
        path: path.to_path_buf(),
        message,
    };
    let contents = std::fs::read_to_string(path).map_err(|error| seed_error(error.to_string()))?;
    serde_json::from_str(&contents).map_err(|error| seed_error(error.to_string()))
}

/// Inserts employees, skipping ones that already exist.
///
/// Returns the number of inserted documents.
///
/// # Errors
///
/// Returns the first repository error other than a duplicate.
pub async fn seed_employees(
    repository: &dyn EmployeeRepository,
    employees: Vec<Employee>,
) -> Result<usize, RepositoryError> {
    let mut inserted = 0;
    for employee in employees {
        match repository.insert(employee).await {
            Ok(()) => inserted += 1,
            Err(RepositoryError::Duplicate(emp_id)) => {
                tracing::debug!(%emp_id, "Employee already present, skipping seed entry");
            }
            Err(error) => return Err(error),
        }
    }
    Ok(inserted)
}

// =============================================================================
// Tests
// =============================================================================
