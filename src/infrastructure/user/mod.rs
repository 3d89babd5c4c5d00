//! User infrastructure module
//!
//! This module provides the in-memory user directory, the in-memory DAO used
//! when no other collaborator is supplied, and seed data loading.

mod repository;
mod seed;
mod service;

pub use repository::InMemoryUserDao;
pub use seed::{default_users, load_seed, parse_seed};
pub use service::{UserDirectory, MISSING_CREDENTIALS_MESSAGE};
