//! Infrastructure module for external services.
//!
//! This module contains the employee repositories and the factory that
//! selects one at startup.

pub mod factory;
pub mod in_memory;
pub mod postgres;
pub mod repository;

pub use factory::{
    ConfigurationError, FactoryError, RepositoryConfig, RepositoryConfigBuilder, RepositoryFactory,
    StorageMode, load_seed_file, seed_employees,
};
pub use in_memory::InMemoryEmployeeRepository;
pub use postgres::PostgresEmployeeRepository;
pub use repository::{EmployeeRepository, RepositoryError, RepositoryFuture, UpdateOutcome};
