//! Domain layer - Core entities and collaborator traits

pub mod error;
pub mod user;

pub use error::DomainError;
pub use user::{User, UserDao, UserId};
