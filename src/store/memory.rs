//! Implements the `DocumentStore` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that
//! we can run the whole app, top-to-bottom, without a cloud project. State is
//! held in a process-wide registry keyed by uid, so separate `MemoryStore`
//! values (for example one per command invocation in a test) observe the same
//! collection, the way separate clients observe the same remote database.

use crate::model::{NewTransaction, Transaction, TransactionUpdate};
use crate::store::{DocumentStore, UserScope};
use crate::Result;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use uuid::Uuid;

/// Per-user collection state held in the registry.
#[derive(Debug, Default, Clone)]
struct Collection {
    docs: Vec<Transaction>,
    /// Number of `list` calls served, so tests can observe load idempotence.
    list_calls: u64,
}

fn registry() -> &'static Mutex<HashMap<String, Collection>> {
    static REGISTRY: OnceLock<Mutex<HashMap<String, Collection>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// An implementation of the `DocumentStore` trait that does not use a cloud
/// backend.
pub(crate) struct MemoryStore;

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self
    }

    fn with_collection<T>(scope: &UserScope, f: impl FnOnce(&mut Collection) -> T) -> T {
        let mut map = registry().lock().unwrap_or_else(|e| e.into_inner());
        f(map.entry(scope.uid().to_string()).or_default())
    }

    /// Replaces the stored collection for `scope`.
    pub(crate) fn set_state(scope: &UserScope, docs: Vec<Transaction>) {
        Self::with_collection(scope, |c| {
            c.docs = docs;
            c.list_calls = 0;
        });
    }

    /// Returns a copy of the stored collection for `scope`.
    pub(crate) fn get_state(scope: &UserScope) -> Vec<Transaction> {
        Self::with_collection(scope, |c| c.docs.clone())
    }

    /// Returns how many `list` calls have been served for `scope`.
    pub(crate) fn list_calls(scope: &UserScope) -> u64 {
        Self::with_collection(scope, |c| c.list_calls)
    }
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn list(&mut self, scope: &UserScope) -> Result<Vec<Transaction>> {
        Ok(Self::with_collection(scope, |c| {
            c.list_calls += 1;
            let mut docs = c.docs.clone();
            // Server ordering: creation timestamp descending, unresolved last.
            docs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            docs
        }))
    }

    async fn find_by_id(&mut self, scope: &UserScope, id: &str) -> Result<Option<Transaction>> {
        Ok(Self::with_collection(scope, |c| {
            c.docs.iter().find(|t| t.id == id).cloned()
        }))
    }

    async fn insert(&mut self, scope: &UserScope, new: &NewTransaction) -> Result<Transaction> {
        let record = Transaction {
            id: Uuid::new_v4().to_string(),
            kind: new.kind,
            amount: new.amount,
            category: new.category.clone(),
            note: new.note.clone(),
            date: new.date,
            created_at: Some(Utc::now()),
        };
        Self::with_collection(scope, |c| c.docs.push(record.clone()));
        Ok(record)
    }

    async fn update(
        &mut self,
        scope: &UserScope,
        id: &str,
        fields: &TransactionUpdate,
    ) -> Result<Option<DateTime<Utc>>> {
        Ok(Self::with_collection(scope, |c| {
            let doc = c.docs.iter_mut().find(|t| t.id == id)?;
            let stamp = Utc::now();
            doc.apply(fields, Some(stamp));
            Some(stamp)
        }))
    }

    async fn delete(&mut self, scope: &UserScope, id: &str) -> Result<bool> {
        Ok(Self::with_collection(scope, |c| {
            let before = c.docs.len();
            c.docs.retain(|t| t.id != id);
            c.docs.len() != before
        }))
    }
}
