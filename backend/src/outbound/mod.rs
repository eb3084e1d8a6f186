//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL user store using Diesel ORM
//! - **memory**: process-local user store for tests and local runs
//! - **security**: bcrypt password hashing and HS512 JWT session tokens
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
pub mod persistence;
pub mod security;
