//! Command execution against a directory

use std::collections::BTreeMap;
use std::io::Write;
use std::time::Duration;

use super::Command;
use crate::domain::user::{User, UserDao, UserId};
use crate::infrastructure::user::UserDirectory;

/// Execute a command and write its result to `out`
pub async fn execute<D, W>(
    directory: &mut UserDirectory<D>,
    command: Command,
    login_timeout: Duration,
    out: &mut W,
) -> anyhow::Result<()>
where
    D: UserDao,
    W: Write,
{
    match command {
        Command::List => {
            serde_json::to_writer_pretty(&mut *out, &directory.get_all())?;
            writeln!(out)?;
        }
        Command::Map => {
            let users: BTreeMap<UserId, User> =
                directory.get_all_converted_by_id().into_iter().collect();
            serde_json::to_writer_pretty(&mut *out, &users)?;
            writeln!(out)?;
        }
        Command::Login(args) => {
            let user = directory
                .login_within(
                    login_timeout,
                    args.username.as_deref(),
                    args.password.as_deref(),
                )
                .await?;

            match user {
                Some(user) => {
                    serde_json::to_writer_pretty(&mut *out, &user)?;
                    writeln!(out)?;
                }
                None => writeln!(out, "no matching user")?,
            }
        }
        Command::Delete { id } => {
            let deleted = directory.delete(UserId::new(id)).await?;
            writeln!(out, "{}", deleted)?;
        }
    }

    Ok(())
}
