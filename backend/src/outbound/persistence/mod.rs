//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! The user store is backed by PostgreSQL via `diesel-async` with `bb8`
//! connection pooling. Row structs (`models.rs`) and the table definition
//! (`schema.rs`) stay private to this module; callers only see domain types
//! and `UserPersistenceError`.
//!
//! # Example
//!
//! ```ignore
//! use notes_backend::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/notes")).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations, run_migrations_blocking};
pub use pool::{DbPool, PoolConfig, PoolError};
