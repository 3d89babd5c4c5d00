//! User domain
//!
//! Domain types for the user directory: the user record and the persistence
//! collaborator trait.

mod entity;
mod repository;

pub use entity::{User, UserId};
pub use repository::UserDao;

#[cfg(test)]
pub use repository::MockUserDao;
