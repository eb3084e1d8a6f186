//! In-memory `UserRepository` adapter.
//!
//! The session type is a [`UserSession`]: a snapshot of the table plus the
//! rows inserted through it. Callers that want transactional grouping take
//! one with [`InMemoryUserRepository::begin`], pass it to each call, then
//! publish it with [`InMemoryUserRepository::commit`]. Dropping the session
//! discards the work. Without a session, calls operate on the shared table
//! directly.
//!
//! Ids come from a counter shared by every session, so an id is never handed
//! out twice even when a session is discarded.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{EmailAddress, NewUser, User, UserId};

/// Stored users keyed by id.
#[derive(Debug, Clone, Default)]
struct UserTable {
    rows: BTreeMap<i64, User>,
}

impl UserTable {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn has_email(&self, email: &EmailAddress) -> bool {
        self.rows.values().any(|user| user.email() == email)
    }

    fn insert(&mut self, user: User) -> Result<User, UserPersistenceError> {
        if self.has_email(user.email()) {
            return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
        }
        self.rows.insert(user.id().get(), user.clone());
        Ok(user)
    }

    fn by_email(&self, email: &EmailAddress) -> Result<User, UserPersistenceError> {
        self.rows
            .values()
            .find(|user| user.email() == email)
            .cloned()
            .ok_or(UserPersistenceError::NotFound)
    }

    fn by_id(&self, id: UserId) -> Result<User, UserPersistenceError> {
        self.rows
            .get(&id.get())
            .cloned()
            .ok_or(UserPersistenceError::NotFound)
    }
}

/// Pending unit of work against an [`InMemoryUserRepository`].
#[derive(Debug, Clone)]
pub struct UserSession {
    view: UserTable,
    inserted: Vec<User>,
}

impl UserSession {
    /// Number of users visible inside the session.
    pub fn len(&self) -> usize {
        self.view.len()
    }

    /// Whether the session sees no users.
    pub fn is_empty(&self) -> bool {
        self.view.len() == 0
    }

    fn insert(&mut self, user: User) -> Result<User, UserPersistenceError> {
        let user = self.view.insert(user)?;
        self.inserted.push(user.clone());
        Ok(user)
    }
}

/// Thread-safe user store held in process memory.
pub struct InMemoryUserRepository {
    table: Mutex<UserTable>,
    next_id: AtomicI64,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl InMemoryUserRepository {
    /// Empty store stamping rows with the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty store stamping rows with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            table: Mutex::new(UserTable::default()),
            next_id: AtomicI64::new(1),
            clock,
        }
    }

    /// Open a session over a snapshot of the current table.
    pub fn begin(&self) -> Result<UserSession, UserPersistenceError> {
        Ok(UserSession {
            view: self.lock()?.clone(),
            inserted: Vec::new(),
        })
    }

    /// Apply the session's inserts to the shared table.
    ///
    /// Rows written outside the session since [`Self::begin`] are kept. If any
    /// session insert now clashes with a stored email, nothing is applied and
    /// [`UserPersistenceError::DuplicateEmail`] is returned.
    pub fn commit(&self, session: UserSession) -> Result<(), UserPersistenceError> {
        let mut table = self.lock()?;
        if let Some(clash) = session
            .inserted
            .iter()
            .find(|user| table.has_email(user.email()))
        {
            return Err(UserPersistenceError::duplicate_email(clash.email().as_ref()));
        }
        for user in session.inserted {
            table.rows.insert(user.id().get(), user);
        }
        Ok(())
    }

    /// Number of users visible outside any session.
    pub fn len(&self) -> Result<usize, UserPersistenceError> {
        Ok(self.lock()?.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, UserTable>, UserPersistenceError> {
        self.table
            .lock()
            .map_err(|_| UserPersistenceError::connection("user table lock poisoned"))
    }

    fn stamp(&self, record: &NewUser) -> Result<User, UserPersistenceError> {
        let id = UserId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
            .map_err(|err| UserPersistenceError::query(err.to_string()))?;
        let now = self.clock.utc();
        Ok(User::new(id, record.clone(), now, now))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    type Session = UserSession;

    async fn create(
        &self,
        user: &NewUser,
        session: Option<&mut UserSession>,
    ) -> Result<User, UserPersistenceError> {
        match session {
            Some(session) => {
                if session.view.has_email(user.email()) {
                    return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
                }
                session.insert(self.stamp(user)?)
            }
            None => {
                let mut table = self.lock()?;
                if table.has_email(user.email()) {
                    return Err(UserPersistenceError::duplicate_email(user.email().as_ref()));
                }
                table.insert(self.stamp(user)?)
            }
        }
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
        session: Option<&mut UserSession>,
    ) -> Result<User, UserPersistenceError> {
        match session {
            Some(session) => session.view.by_email(email),
            None => self.lock()?.by_email(email),
        }
    }

    async fn find_by_id(
        &self,
        id: UserId,
        session: Option<&mut UserSession>,
    ) -> Result<User, UserPersistenceError> {
        match session {
            Some(session) => session.view.by_id(id),
            None => self.lock()?.by_id(id),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Contract coverage for the in-memory store.
    use super::*;
    use crate::domain::{DisplayName, PasswordHash};
    use rstest::{fixture, rstest};

    fn record(name: &str, email: &str) -> NewUser {
        NewUser::new(
            DisplayName::new(name).expect("valid name"),
            EmailAddress::new(email).expect("valid email"),
            PasswordHash::from_stored("$2b$04$fixturehashfixturehash"),
        )
    }

    #[fixture]
    fn repository() -> InMemoryUserRepository {
        InMemoryUserRepository::new()
    }

    #[rstest]
    #[tokio::test]
    async fn create_assigns_sequential_ids(repository: InMemoryUserRepository) {
        let first = repository
            .create(&record("Ada", "ada@example.com"), None)
            .await
            .expect("first insert");
        let second = repository
            .create(&record("Grace", "grace@example.com"), None)
            .await
            .expect("second insert");

        assert_eq!(first.id().get(), 1);
        assert_eq!(second.id().get(), 2);
        assert_eq!(first.created_at(), first.updated_at());
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_email_is_rejected_without_mutation(repository: InMemoryUserRepository) {
        repository
            .create(&record("Ada", "ada@example.com"), None)
            .await
            .expect("first insert");

        let err = repository
            .create(&record("Imposter", "ada@example.com"), None)
            .await
            .expect_err("duplicate must fail");

        assert_eq!(err, UserPersistenceError::duplicate_email("ada@example.com"));
        assert_eq!(repository.len().expect("len"), 1);
        let stored = repository
            .find_by_email(&EmailAddress::new("ada@example.com").expect("email"), None)
            .await
            .expect("original user remains");
        assert_eq!(stored.name().as_ref(), "Ada");
    }

    #[rstest]
    #[tokio::test]
    async fn lookups_report_not_found(repository: InMemoryUserRepository) {
        let by_email = repository
            .find_by_email(&EmailAddress::new("ghost@example.com").expect("email"), None)
            .await;
        let by_id = repository
            .find_by_id(UserId::new(99).expect("id"), None)
            .await;

        assert_eq!(by_email, Err(UserPersistenceError::NotFound));
        assert_eq!(by_id, Err(UserPersistenceError::NotFound));
    }

    #[rstest]
    #[tokio::test]
    async fn session_writes_are_invisible_until_commit(repository: InMemoryUserRepository) {
        let mut session = repository.begin().expect("begin");
        let created = repository
            .create(&record("Ada", "ada@example.com"), Some(&mut session))
            .await
            .expect("insert in session");

        let outside = repository.find_by_id(created.id(), None).await;
        assert_eq!(outside, Err(UserPersistenceError::NotFound));

        let inside = repository
            .find_by_id(created.id(), Some(&mut session))
            .await
            .expect("visible in session");
        assert_eq!(inside, created);

        repository.commit(session).expect("commit");
        let after = repository
            .find_by_id(created.id(), None)
            .await
            .expect("visible after commit");
        assert_eq!(after, created);
    }

    #[rstest]
    #[tokio::test]
    async fn dropped_session_discards_writes(repository: InMemoryUserRepository) {
        {
            let mut session = repository.begin().expect("begin");
            repository
                .create(&record("Ada", "ada@example.com"), Some(&mut session))
                .await
                .expect("insert in session");
        }
        assert_eq!(repository.len().expect("len"), 0);
    }

    #[rstest]
    #[tokio::test]
    async fn commit_keeps_rows_written_outside_the_session(repository: InMemoryUserRepository) {
        let mut session = repository.begin().expect("begin");
        let outside = repository
            .create(&record("Grace", "grace@example.com"), None)
            .await
            .expect("insert outside session");
        let inside = repository
            .create(&record("Ada", "ada@example.com"), Some(&mut session))
            .await
            .expect("insert in session");
        assert_ne!(inside.id(), outside.id());

        repository.commit(session).expect("commit");

        assert_eq!(repository.len().expect("len"), 2);
        let grace = repository
            .find_by_id(outside.id(), None)
            .await
            .expect("outside row survives commit");
        assert_eq!(grace, outside);

        let next = repository
            .create(&record("Linus", "linus@example.com"), None)
            .await
            .expect("insert after commit");
        assert_ne!(next.id(), outside.id());
        assert_ne!(next.id(), inside.id());
    }

    #[rstest]
    #[tokio::test]
    async fn commit_rejects_email_taken_since_begin(repository: InMemoryUserRepository) {
        let mut session = repository.begin().expect("begin");
        repository
            .create(&record("Ada", "ada@example.com"), Some(&mut session))
            .await
            .expect("insert in session");
        let winner = repository
            .create(&record("Other Ada", "ada@example.com"), None)
            .await
            .expect("insert outside session");

        let err = repository.commit(session).expect_err("clashing commit");

        assert_eq!(err, UserPersistenceError::duplicate_email("ada@example.com"));
        assert_eq!(repository.len().expect("len"), 1);
        let stored = repository
            .find_by_email(winner.email(), None)
            .await
            .expect("winner remains");
        assert_eq!(stored, winner);
    }
}
