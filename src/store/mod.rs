//! The remote document store: a trait over the per-user transaction collection,
//! a Firestore REST implementation, and an in-memory implementation used for
//! testing and for running the whole app without the cloud backend.

mod firestore;
mod memory;

use crate::config::Session;
use crate::model::{NewTransaction, Transaction, TransactionUpdate};
use crate::{Config, Result};
use chrono::{DateTime, Utc};

pub(crate) use memory::MemoryStore;

/// The collection id that holds a user's transactions.
pub(crate) const TRANSACTIONS: &str = "transactions";

/// Names the per-user collection all store operations are scoped to. Documents
/// live under `users/{uid}/transactions`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct UserScope {
    uid: String,
}

impl UserScope {
    pub fn new(uid: impl Into<String>) -> Self {
        Self { uid: uid.into() }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }
}

impl From<&Session> for UserScope {
    fn from(session: &Session) -> Self {
        Self::new(session.uid())
    }
}

/// Asynchronous, fallible operations against the remote transaction collection.
///
/// Mutations address documents directly by their stored identifier. A missing
/// document is data, not an error: `update` returns `None` and `delete` returns
/// `false` so the caller can distinguish not-found from remote failure.
#[async_trait::async_trait]
pub trait DocumentStore {
    /// Lists every record in the scope, ordered by server creation timestamp
    /// descending.
    async fn list(&mut self, scope: &UserScope) -> Result<Vec<Transaction>>;

    /// Fetches a single record by identifier.
    async fn find_by_id(&mut self, scope: &UserScope, id: &str) -> Result<Option<Transaction>>;

    /// Creates a record. The store assigns the identifier and the server
    /// assigns the creation timestamp; the completed record is returned.
    async fn insert(&mut self, scope: &UserScope, new: &NewTransaction) -> Result<Transaction>;

    /// Overwrites the four mutable fields and stamps a fresh server timestamp.
    /// Returns the new timestamp, or `None` if the document does not exist.
    async fn update(
        &mut self,
        scope: &UserScope,
        id: &str,
        fields: &TransactionUpdate,
    ) -> Result<Option<DateTime<Utc>>>;

    /// Deletes a record. Returns `false` if the document does not exist.
    async fn delete(&mut self, scope: &UserScope, id: &str) -> Result<bool>;
}

/// Selects which `DocumentStore` implementation the app runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Firestore,
    Memory,
}

impl Mode {
    /// When `FINTRACK_IN_TEST_MODE` is set and non-zero in length, the mode is
    /// `Mode::Memory`, otherwise `Mode::Firestore`. This allows exercising the
    /// program top-to-bottom without hitting the cloud backend.
    pub fn from_env() -> Self {
        match std::env::var("FINTRACK_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Memory,
            _ => Mode::Firestore,
        }
    }
}

/// Creates the `DocumentStore` client for `mode`.
pub(crate) fn client(
    config: &Config,
    session: Option<&Session>,
    mode: Mode,
) -> Result<Box<dyn DocumentStore + Send>> {
    Ok(match mode {
        Mode::Firestore => Box::new(firestore::FirestoreStore::new(config, session)?),
        Mode::Memory => Box::new(MemoryStore::new()),
    })
}
