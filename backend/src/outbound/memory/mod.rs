//! Process-local adapters for tests and local development.

mod in_memory_user_repository;

pub use in_memory_user_repository::{InMemoryUserRepository, UserSession};
