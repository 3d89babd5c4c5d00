//! User directory: in-memory registry of users backed by a UserDao

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::domain::user::{User, UserDao, UserId};
use crate::domain::DomainError;

/// Message returned when login is called without a username or password
pub const MISSING_CREDENTIALS_MESSAGE: &str = "Username or password is null";

/// In-memory user directory.
///
/// Users are kept in insertion order. IDs and usernames are unique within the
/// directory. Deletes are delegated to the DAO.
pub struct UserDirectory<D: UserDao> {
    users: Vec<User>,
    dao: Arc<D>,
}

impl<D: UserDao> UserDirectory<D> {
    /// Create an empty directory
    pub fn new(dao: Arc<D>) -> Self {
        Self {
            users: Vec::new(),
            dao,
        }
    }

    /// Add users in order. The batch is rejected as a whole if any user
    /// collides with a stored user or an earlier user of the same batch.
    pub fn add<I>(&mut self, users: I) -> Result<(), DomainError>
    where
        I: IntoIterator<Item = User>,
    {
        let batch: Vec<User> = users.into_iter().collect();

        for (index, user) in batch.iter().enumerate() {
            let mut existing = self.users.iter().chain(&batch[..index]);

            if existing.clone().any(|u| u.id() == user.id()) {
                warn!(user_id = %user.id(), "Rejected user with duplicate ID");
                return Err(DomainError::conflict(format!(
                    "User with ID '{}' already exists",
                    user.id()
                )));
            }

            if existing.any(|u| u.username() == user.username()) {
                warn!(username = user.username(), "Rejected user with duplicate username");
                return Err(DomainError::conflict(format!(
                    "Username '{}' already exists",
                    user.username()
                )));
            }
        }

        debug!(count = batch.len(), "Adding users to directory");
        self.users.extend(batch);

        Ok(())
    }

    /// All users in insertion order
    pub fn get_all(&self) -> Vec<User> {
        self.users.clone()
    }

    /// All users keyed by ID
    pub fn get_all_converted_by_id(&self) -> HashMap<UserId, User> {
        self.users
            .iter()
            .map(|user| (user.id(), user.clone()))
            .collect()
    }

    /// Find the user whose username and password both match exactly.
    ///
    /// Fails with an invalid-argument error when either credential is missing.
    pub fn login(
        &self,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<User>, DomainError> {
        let (username, password) = require_credentials(username, password)?;
        Ok(find_by_credentials(&self.users, username, password))
    }

    /// Run `login` on the blocking pool and give up once `limit` elapses.
    ///
    /// The lookup works on a snapshot of the users taken at call time.
    pub async fn login_within(
        &self,
        limit: Duration,
        username: Option<&str>,
        password: Option<&str>,
    ) -> Result<Option<User>, DomainError> {
        let (username, password) = require_credentials(username, password)?;
        let users = self.users.clone();
        let username = username.to_string();
        let password = password.to_string();

        run_within(limit, move || find_by_credentials(&users, &username, &password)).await
    }

    /// Delete a user through the DAO and return its result.
    ///
    /// DAO errors propagate unchanged. The user is dropped from the directory
    /// only when the DAO reports a removal.
    pub async fn delete(&mut self, id: UserId) -> Result<bool, DomainError> {
        let deleted = self.dao.delete(id).await?;

        if deleted {
            self.users.retain(|u| u.id() != id);
        }

        info!(user_id = %id, deleted, "Delete delegated to user DAO");

        Ok(deleted)
    }

    /// Number of stored users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether no users are stored
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

fn require_credentials<'a>(
    username: Option<&'a str>,
    password: Option<&'a str>,
) -> Result<(&'a str, &'a str), DomainError> {
    match (username, password) {
        (Some(username), Some(password)) => Ok((username, password)),
        _ => {
            warn!("Login attempted without username or password");
            Err(DomainError::invalid_argument(MISSING_CREDENTIALS_MESSAGE))
        }
    }
}

fn find_by_credentials(users: &[User], username: &str, password: &str) -> Option<User> {
    let user = users
        .iter()
        .find(|u| u.matches_credentials(username, password))
        .cloned();

    debug!(username, found = user.is_some(), "Login lookup");

    user
}

/// Run a lookup on the blocking pool, abandoning it once `limit` elapses
async fn run_within<F>(limit: Duration, lookup: F) -> Result<Option<User>, DomainError>
where
    F: FnOnce() -> Option<User> + Send + 'static,
{
    match timeout(limit, tokio::task::spawn_blocking(lookup)).await {
        Ok(Ok(user)) => Ok(user),
        Ok(Err(e)) => Err(DomainError::internal(format!("Login lookup failed: {}", e))),
        Err(_) => Err(DomainError::timeout(format!(
            "Login did not complete within {}ms",
            limit.as_millis()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::MockUserDao;
    use mockall::predicate::eq;
    use std::time::Instant;
    use tokio_test::{assert_err, assert_ok};

    fn ivan() -> User {
        User::new(1, "Ivan", "213")
    }

    fn petr() -> User {
        User::new(2, "Petr", "421")
    }

    fn create_directory(dao: MockUserDao) -> UserDirectory<MockUserDao> {
        UserDirectory::new(Arc::new(dao))
    }

    fn empty_directory() -> UserDirectory<MockUserDao> {
        create_directory(MockUserDao::new())
    }

    #[test]
    fn test_users_empty_if_no_users_added() {
        let directory = empty_directory();

        let users = directory.get_all();
        assert!(users.is_empty(), "List of users is empty");
        assert!(directory.is_empty());
    }

    #[test]
    fn test_users_size_if_users_added() {
        let mut directory = empty_directory();

        directory.add([ivan()]).unwrap();
        directory.add([petr()]).unwrap();

        let users = directory.get_all();
        assert_eq!(users.len(), 2);
        assert_eq!(users, vec![ivan(), petr()]);
    }

    #[test]
    fn test_users_converted_to_map_by_id() {
        let mut directory = empty_directory();
        directory.add([ivan(), petr()]).unwrap();

        let users = directory.get_all_converted_by_id();

        assert_eq!(users.len(), 2);
        assert_eq!(users.get(&ivan().id()), Some(&ivan()));
        assert_eq!(users.get(&petr().id()), Some(&petr()));
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut directory = empty_directory();
        directory.add([ivan()]).unwrap();

        let err = assert_err!(directory.add([User::new(1, "Other", "pw")]));
        assert!(matches!(err, DomainError::Conflict { .. }));
        assert_eq!(directory.len(), 1);
    }

    #[test]
    fn test_add_rejects_duplicate_username() {
        let mut directory = empty_directory();
        directory.add([ivan()]).unwrap();

        let err = assert_err!(directory.add([User::new(3, "Ivan", "pw")]));
        assert_eq!(err, DomainError::conflict("Username 'Ivan' already exists"));
    }

    #[test]
    fn test_add_rejects_whole_batch_on_conflict() {
        let mut directory = empty_directory();

        let result = directory.add([ivan(), petr(), User::new(1, "Ivan2", "pw")]);
        assert!(result.is_err());
        assert!(directory.is_empty());
    }

    mod login {
        use super::*;

        #[test]
        fn test_login_fail_if_password_is_not_correct() {
            let mut directory = empty_directory();
            directory.add([ivan()]).unwrap();

            let maybe_user = directory.login(Some("Ivan"), Some("test")).unwrap();
            assert!(maybe_user.is_none());
        }

        #[test]
        fn test_login_fail_if_user_does_not_exist() {
            for _ in 0..5 {
                let mut directory = empty_directory();
                directory.add([ivan()]).unwrap();

                let maybe_user = directory.login(Some("test"), Some(ivan().password())).unwrap();
                assert!(maybe_user.is_none());
            }
        }

        #[test]
        fn test_login_is_case_sensitive() {
            let mut directory = empty_directory();
            directory.add([ivan()]).unwrap();

            let maybe_user = directory.login(Some("ivan"), Some("213")).unwrap();
            assert!(maybe_user.is_none());
        }

        #[tokio::test]
        async fn test_login_completes_within_deadline() {
            let mut directory = empty_directory();
            directory.add([ivan(), petr()]).unwrap();

            let maybe_user = directory
                .login_within(Duration::from_millis(200), Some("test"), Some(ivan().password()))
                .await
                .unwrap();

            assert!(maybe_user.is_none());
        }

        #[tokio::test]
        async fn test_slow_lookup_times_out() {
            let started = Instant::now();

            let result = run_within(Duration::from_millis(50), || {
                std::thread::sleep(Duration::from_millis(400));
                Some(ivan())
            })
            .await;

            let err = assert_err!(result);
            assert!(matches!(err, DomainError::Timeout { .. }));
            assert_eq!(err.to_string(), "Timeout: Login did not complete within 50ms");
            assert!(started.elapsed() < Duration::from_millis(400));
        }

        #[tokio::test]
        async fn test_fast_lookup_within_deadline() {
            let result = run_within(Duration::from_millis(200), || Some(petr())).await;

            assert_eq!(assert_ok!(result), Some(petr()));
        }

        #[tokio::test]
        async fn test_login_within_rejects_missing_credentials() {
            let directory = empty_directory();

            let err = directory
                .login_within(Duration::from_millis(200), None, Some("213"))
                .await
                .unwrap_err();

            assert_eq!(err, DomainError::invalid_argument(MISSING_CREDENTIALS_MESSAGE));
        }

        #[tokio::test]
        async fn test_login_within_returns_matching_user() {
            let mut directory = empty_directory();
            directory.add([ivan()]).unwrap();

            let maybe_user = directory
                .login_within(Duration::from_millis(200), Some("Ivan"), Some("213"))
                .await
                .unwrap();

            assert_eq!(maybe_user, Some(ivan()));
        }

        #[test]
        fn test_login_success_if_user_exists() {
            let mut directory = empty_directory();
            directory.add([ivan()]).unwrap();

            let maybe_user = directory
                .login(Some(ivan().username()), Some(ivan().password()))
                .unwrap();

            assert_eq!(maybe_user, Some(ivan()));
        }

        #[test]
        fn test_error_if_username_or_password_is_missing() {
            let directory = empty_directory();

            let err = directory.login(None, Some("test")).unwrap_err();
            assert!(matches!(err, DomainError::InvalidArgument { .. }));
            assert_eq!(err.to_string(), "Username or password is null");

            let err = directory.login(Some("test"), None).unwrap_err();
            assert_eq!(err, DomainError::invalid_argument(MISSING_CREDENTIALS_MESSAGE));

            assert!(directory.login(None, None).is_err());
        }

        #[test]
        fn test_login_cases() {
            let cases = [
                ("Ivan", "213", Some(ivan())),
                ("Petr", "421", Some(petr())),
                ("Petr", "test", None),
                ("test", "213", None),
            ];

            for (username, password, expected) in cases {
                let mut directory = empty_directory();
                directory.add([ivan(), petr()]).unwrap();

                let maybe_user = directory.login(Some(username), Some(password)).unwrap();
                assert_eq!(maybe_user, expected, "{} / {}", username, password);
            }
        }
    }

    mod delete {
        use super::*;

        #[tokio::test]
        async fn test_delete_existing_user() {
            let mut dao = MockUserDao::new();
            dao.expect_delete()
                .with(eq(ivan().id()))
                .times(2)
                .returning(|_| Ok(true));

            let mut directory = create_directory(dao);
            directory.add([ivan()]).unwrap();

            let delete_result = directory.delete(ivan().id()).await.unwrap();
            let second_result = directory.delete(ivan().id()).await.unwrap();

            assert!(delete_result);
            assert!(second_result);
            assert!(directory.is_empty());
        }

        #[tokio::test]
        async fn test_delete_keeps_user_when_dao_reports_nothing_removed() {
            let mut dao = MockUserDao::new();
            dao.expect_delete()
                .with(eq(petr().id()))
                .times(1)
                .returning(|_| Ok(false));

            let mut directory = create_directory(dao);
            directory.add([petr()]).unwrap();

            let deleted = directory.delete(petr().id()).await.unwrap();

            assert!(!deleted);
            assert_eq!(directory.get_all(), vec![petr()]);
        }

        #[tokio::test]
        async fn test_error_if_database_is_not_available() {
            let mut dao = MockUserDao::new();
            dao.expect_delete()
                .with(eq(ivan().id()))
                .times(1)
                .returning(|_| Err(DomainError::storage("Database is not available")));

            let mut directory = create_directory(dao);
            directory.add([ivan()]).unwrap();

            let err = directory.delete(ivan().id()).await.unwrap_err();

            assert_eq!(err, DomainError::storage("Database is not available"));
            assert_eq!(directory.len(), 1);
        }
    }
}
