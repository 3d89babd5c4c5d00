//! Seed data for populating a directory at start-up

use std::path::Path;

use serde::Deserialize;

use crate::domain::user::User;
use crate::domain::DomainError;

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    users: Vec<User>,
}

/// Parse a TOML seed document with a `[[users]]` array
pub fn parse_seed(content: &str) -> Result<Vec<User>, DomainError> {
    let seed: SeedFile = toml::from_str(content)
        .map_err(|e| DomainError::configuration(format!("Invalid seed file: {}", e)))?;

    Ok(seed.users)
}

/// Read and parse a TOML seed file
pub fn load_seed(path: &Path) -> Result<Vec<User>, DomainError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        DomainError::configuration(format!(
            "Failed to read seed file '{}': {}",
            path.display(),
            e
        ))
    })?;

    parse_seed(&content)
}

/// Sample users used when no seed file is configured
pub fn default_users() -> Vec<User> {
    vec![User::new(1, "Ivan", "213"), User::new(2, "Petr", "421")]
}
