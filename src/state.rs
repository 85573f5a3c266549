//! The local state store: an in-memory, insertion-ordered mirror of the user's
//! transaction collection plus the derived salary scalar.
//!
//! The store is mutated only through [`StateStore::dispatch`]; reads go through
//! the accessor methods. It is a permanent session cache by design: nothing
//! here re-fetches or invalidates, so remote changes made by another session
//! are never observed after the initial seed.

use crate::model::{Amount, Transaction, TransactionUpdate};
use chrono::{DateTime, Utc};
use tracing::warn;

/// A mutation of the local state store. Actions are synchronous and in-process.
#[derive(Debug, Clone)]
pub enum Action {
    /// Seeds or extends the collection with a batch of records.
    AddBatch(Vec<Transaction>),
    /// Removes the record with the given identifier, if present.
    RemoveOne(String),
    /// Overwrites the four mutable fields of the record with the given
    /// identifier, stamping the refreshed server timestamp.
    UpdateOne {
        id: String,
        fields: TransactionUpdate,
        stamped_at: Option<DateTime<Utc>>,
    },
    /// Sets the derived salary scalar.
    SetSalary(Amount),
}

/// Owns the in-memory copy of the user's records. No other component mutates
/// the collection directly.
#[derive(Debug, Default)]
pub struct StateStore {
    records: Vec<Transaction>,
    salary: Option<Amount>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one action to the store.
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::AddBatch(batch) => self.records.extend(batch),
            Action::RemoveOne(id) => {
                let before = self.records.len();
                self.records.retain(|t| t.id != id);
                if self.records.len() == before {
                    warn!("RemoveOne for unknown transaction '{id}'");
                }
            }
            Action::UpdateOne {
                id,
                fields,
                stamped_at,
            } => match self.records.iter_mut().find(|t| t.id == id) {
                Some(record) => record.apply(&fields, stamped_at),
                None => warn!("UpdateOne for unknown transaction '{id}'"),
            },
            Action::SetSalary(amount) => self.salary = Some(amount),
        }
    }

    /// The records in insertion order.
    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The last-seen income amount. Stale after income records are deleted;
    /// only `SetSalary` ever changes it.
    pub fn salary(&self) -> Option<Amount> {
        self.salary
    }
}
