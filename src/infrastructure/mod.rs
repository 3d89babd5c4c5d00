//! Infrastructure layer - Implementations of domain collaborators

pub mod logging;
pub mod user;
