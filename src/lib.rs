//! User Directory
//!
//! An in-memory registry of user records with:
//! - Ordered storage with unique IDs and usernames
//! - Exact-match credential lookup
//! - Deletes delegated to a pluggable `UserDao` collaborator

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{DomainError, User, UserDao, UserId};
pub use infrastructure::user::{InMemoryUserDao, UserDirectory};
