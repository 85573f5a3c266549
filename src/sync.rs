//! The synchronization controller: turns user intents into remote store calls
//! and, on success, local state mutations.
//!
//! Commit order is remote-then-local for every mutation, so a remote failure
//! can never leave the local mirror ahead of the durable copy. Every operation
//! returns a typed outcome; nothing is swallowed at this layer. The caller (the
//! view surface) decides what to show the user.

use crate::config::Session;
use crate::model::{NewTransaction, Transaction, TransactionKind, TransactionUpdate};
use crate::state::{Action, StateStore};
use crate::store::{DocumentStore, Mode, UserScope};
use crate::{Config, Result};
use tracing::debug;

/// The result of an initial load attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The local state was seeded with this many records.
    Seeded(usize),
    /// Nothing was fetched: either there is no authenticated session, or local
    /// state already holds records. The guard does not distinguish "previously
    /// loaded" from "loaded and found empty".
    Skipped,
}

/// The result of a mutating intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome<T = ()> {
    /// The remote mutation succeeded and local state was updated.
    Applied(T),
    /// No document with the given identifier exists remotely. Local state is
    /// untouched.
    NotFound,
    /// There is no authenticated session; the intent was skipped entirely.
    NoSession,
}

impl<T> SyncOutcome<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied(_))
    }
}

/// Mediates between the remote document store and the local state store.
pub struct SyncController {
    store: Box<dyn DocumentStore + Send>,
    session: Option<Session>,
    state: StateStore,
}

impl SyncController {
    pub fn new(store: Box<dyn DocumentStore + Send>, session: Option<Session>) -> Self {
        Self {
            store,
            session,
            state: StateStore::new(),
        }
    }

    /// Builds a controller for the configured project: loads the stored session
    /// (if any) and creates the store client for `mode`.
    pub async fn for_config(config: &Config, mode: Mode) -> Result<Self> {
        let session = config.session().await?;
        let store = crate::store::client(config, session.as_ref(), mode)?;
        Ok(Self::new(store, session))
    }

    /// Read access to the local state store.
    pub fn state(&self) -> &StateStore {
        &self.state
    }

    fn scope(&self) -> Option<UserScope> {
        self.session.as_ref().map(UserScope::from)
    }

    /// Fetches all remote records once and seeds the local state.
    ///
    /// Guarded: does nothing when there is no session or when local state is
    /// already non-empty, so a second call in the same session performs zero
    /// remote queries. The salary scalar is set to the amount of each income
    /// record in remote order, so with several income records the last one
    /// wins.
    pub async fn initial_load(&mut self) -> Result<LoadOutcome> {
        let Some(scope) = self.scope() else {
            debug!("Initial load skipped: no authenticated session");
            return Ok(LoadOutcome::Skipped);
        };
        if !self.state.is_empty() {
            debug!("Initial load skipped: local state already seeded");
            return Ok(LoadOutcome::Skipped);
        }

        let batch = self.store.list(&scope).await?;
        let count = batch.len();
        let mut salary = None;
        for record in &batch {
            if record.kind == TransactionKind::Income {
                salary = Some(record.amount);
            }
        }
        self.state.dispatch(Action::AddBatch(batch));
        if let Some(amount) = salary {
            self.state.dispatch(Action::SetSalary(amount));
        }
        Ok(LoadOutcome::Seeded(count))
    }

    /// Creates a record remotely, then mirrors it into local state. If the new
    /// record is income, the salary scalar follows its amount.
    pub async fn add(&mut self, new: NewTransaction) -> Result<SyncOutcome<Transaction>> {
        let Some(scope) = self.scope() else {
            return Ok(SyncOutcome::NoSession);
        };
        let record = self.store.insert(&scope, &new).await?;
        self.state.dispatch(Action::AddBatch(vec![record.clone()]));
        if record.kind == TransactionKind::Income {
            self.state.dispatch(Action::SetSalary(record.amount));
        }
        Ok(SyncOutcome::Applied(record))
    }

    /// Overwrites the four mutable fields of a record, remotely first. On
    /// success the same changes (plus the refreshed server timestamp) are
    /// applied locally, and the salary scalar follows the new amount iff the
    /// new kind is income.
    pub async fn edit(&mut self, id: &str, fields: TransactionUpdate) -> Result<SyncOutcome> {
        let Some(scope) = self.scope() else {
            return Ok(SyncOutcome::NoSession);
        };
        let Some(stamped_at) = self.store.update(&scope, id, &fields).await? else {
            debug!("No matching document found for editing '{id}'");
            return Ok(SyncOutcome::NotFound);
        };
        let is_income = fields.kind == TransactionKind::Income;
        let amount = fields.amount;
        self.state.dispatch(Action::UpdateOne {
            id: id.to_string(),
            fields,
            stamped_at: Some(stamped_at),
        });
        if is_income {
            self.state.dispatch(Action::SetSalary(amount));
        }
        Ok(SyncOutcome::Applied(()))
    }

    /// Deletes a record, remotely first. The salary scalar is deliberately not
    /// recomputed, even when the deleted record was the income it came from.
    pub async fn delete(&mut self, id: &str) -> Result<SyncOutcome> {
        let Some(scope) = self.scope() else {
            return Ok(SyncOutcome::NoSession);
        };
        if !self.store.delete(&scope, id).await? {
            debug!("No matching document found for deletion '{id}'");
            return Ok(SyncOutcome::NotFound);
        }
        self.state.dispatch(Action::RemoveOne(id.to_string()));
        Ok(SyncOutcome::Applied(()))
    }

    /// Fetches a single record directly from the remote store. The outcome
    /// keeps "no such document" and "no authenticated session" apart, so the
    /// caller can report each for what it is.
    pub async fn find(&mut self, id: &str) -> Result<SyncOutcome<Transaction>> {
        let Some(scope) = self.scope() else {
            return Ok(SyncOutcome::NoSession);
        };
        match self.store.find_by_id(&scope, id).await? {
            Some(record) => Ok(SyncOutcome::Applied(record)),
            None => Ok(SyncOutcome::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics;
    use crate::model::Amount;
    use crate::store::MemoryStore;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use uuid::Uuid;

    fn record(id: &str, kind: TransactionKind, amount: &str, minute: u32) -> Transaction {
        Transaction {
            id: id.to_string(),
            kind,
            amount: Amount::from_str(amount).unwrap(),
            category: "General".to_string(),
            note: None,
            date: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            created_at: Some(Utc.with_ymd_and_hms(2025, 3, 1, 8, minute, 0).unwrap()),
        }
    }

    /// A controller wired to an isolated in-memory collection.
    fn controller(seed: Vec<Transaction>) -> (SyncController, UserScope) {
        let session = Session::new(Uuid::new_v4().to_string(), "test-token");
        let scope = UserScope::from(&session);
        MemoryStore::set_state(&scope, seed);
        (
            SyncController::new(Box::new(MemoryStore::new()), Some(session)),
            scope,
        )
    }

    fn basic_seed() -> Vec<Transaction> {
        vec![
            record("1", TransactionKind::Income, "1000", 10),
            record("2", TransactionKind::Expense, "300", 5),
        ]
    }

    #[tokio::test]
    async fn initial_load_seeds_state_and_salary() {
        let (mut c, _scope) = controller(basic_seed());
        let outcome = c.initial_load().await.unwrap();
        assert_eq!(outcome, LoadOutcome::Seeded(2));
        assert_eq!(c.state().records().len(), 2);
        assert_eq!(
            c.state().salary(),
            Some(Amount::from_str("1000").unwrap())
        );
        assert_eq!(metrics::balance(c.state().records()), Decimal::from(700));
    }

    #[tokio::test]
    async fn initial_load_is_idempotent_per_session() {
        let (mut c, scope) = controller(basic_seed());
        assert_eq!(c.initial_load().await.unwrap(), LoadOutcome::Seeded(2));
        assert_eq!(MemoryStore::list_calls(&scope), 1);
        assert_eq!(c.initial_load().await.unwrap(), LoadOutcome::Skipped);
        assert_eq!(MemoryStore::list_calls(&scope), 1);
        assert_eq!(c.state().records().len(), 2);
    }

    #[tokio::test]
    async fn initial_load_without_session_is_skipped() {
        let mut c = SyncController::new(Box::new(MemoryStore::new()), None);
        assert_eq!(c.initial_load().await.unwrap(), LoadOutcome::Skipped);
        assert!(c.state().is_empty());
    }

    #[tokio::test]
    async fn initial_load_salary_is_last_income_in_remote_order() {
        // Remote order is created_at descending, so the older income record
        // comes last and wins.
        let (mut c, _scope) = controller(vec![
            record("new", TransactionKind::Income, "2000", 30),
            record("old", TransactionKind::Income, "1000", 1),
        ]);
        c.initial_load().await.unwrap();
        assert_eq!(
            c.state().salary(),
            Some(Amount::from_str("1000").unwrap())
        );
    }

    #[tokio::test]
    async fn delete_removes_remote_and_local() {
        let (mut c, scope) = controller(basic_seed());
        c.initial_load().await.unwrap();
        let outcome = c.delete("2").await.unwrap();
        assert!(outcome.is_applied());
        assert_eq!(c.state().records().len(), 1);
        assert_eq!(c.state().records()[0].id, "1");
        assert_eq!(metrics::balance(c.state().records()), Decimal::from(1000));
        assert_eq!(MemoryStore::get_state(&scope).len(), 1);
    }

    #[tokio::test]
    async fn delete_of_missing_record_leaves_state_unchanged() {
        let (mut c, _scope) = controller(basic_seed());
        c.initial_load().await.unwrap();
        let outcome = c.delete("nope").await.unwrap();
        assert_eq!(outcome, SyncOutcome::NotFound);
        assert_eq!(c.state().records().len(), 2);
    }

    #[tokio::test]
    async fn delete_does_not_recompute_salary() {
        let (mut c, _scope) = controller(basic_seed());
        c.initial_load().await.unwrap();
        c.delete("1").await.unwrap();
        // The income record is gone but the scalar is stale by design.
        assert_eq!(
            c.state().salary(),
            Some(Amount::from_str("1000").unwrap())
        );
    }

    #[tokio::test]
    async fn edit_changes_mutable_fields_and_refreshes_stamp() {
        let (mut c, scope) = controller(basic_seed());
        c.initial_load().await.unwrap();
        let original_stamp = c.state().records()[0].created_at;
        let outcome = c
            .edit(
                "1",
                TransactionUpdate {
                    kind: TransactionKind::Income,
                    amount: Amount::from_str("1500").unwrap(),
                    category: "Salary".to_string(),
                    note: Some("raise".to_string()),
                },
            )
            .await
            .unwrap();
        assert!(outcome.is_applied());

        let local = c.state().records().iter().find(|t| t.id == "1").unwrap();
        assert_eq!(local.amount, Amount::from_str("1500").unwrap());
        assert_eq!(local.category, "Salary");
        assert_ne!(local.created_at, original_stamp);
        assert_eq!(c.state().salary(), Some(Amount::from_str("1500").unwrap()));

        let remote = MemoryStore::get_state(&scope)
            .into_iter()
            .find(|t| t.id == "1")
            .unwrap();
        assert_eq!(remote.amount, Amount::from_str("1500").unwrap());
        assert_eq!(remote.id, "1");
    }

    #[tokio::test]
    async fn edit_to_expense_leaves_salary_alone() {
        let (mut c, _scope) = controller(basic_seed());
        c.initial_load().await.unwrap();
        c.edit(
            "2",
            TransactionUpdate {
                kind: TransactionKind::Expense,
                amount: Amount::from_str("400").unwrap(),
                category: "Rent".to_string(),
                note: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(
            c.state().salary(),
            Some(Amount::from_str("1000").unwrap())
        );
        assert_eq!(metrics::total_expense(c.state().records()), Decimal::from(400));
    }

    #[tokio::test]
    async fn edit_of_missing_record_is_not_found() {
        let (mut c, _scope) = controller(basic_seed());
        c.initial_load().await.unwrap();
        let outcome = c
            .edit(
                "nope",
                TransactionUpdate {
                    kind: TransactionKind::Expense,
                    amount: Amount::ZERO,
                    category: String::new(),
                    note: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::NotFound);
        assert_eq!(metrics::balance(c.state().records()), Decimal::from(700));
    }

    #[tokio::test]
    async fn add_mirrors_after_remote_insert() {
        let (mut c, scope) = controller(vec![]);
        c.initial_load().await.unwrap();
        let outcome = c
            .add(NewTransaction {
                kind: TransactionKind::Income,
                amount: Amount::from_str("2500").unwrap(),
                category: "Salary".to_string(),
                note: None,
                date: NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
            })
            .await
            .unwrap();
        let SyncOutcome::Applied(created) = outcome else {
            panic!("expected Applied");
        };
        assert!(created.created_at.is_some());
        assert_eq!(c.state().records().len(), 1);
        assert_eq!(c.state().salary(), Some(Amount::from_str("2500").unwrap()));
        assert_eq!(MemoryStore::get_state(&scope).len(), 1);
    }

    #[tokio::test]
    async fn mutations_without_session_are_skipped() {
        let mut c = SyncController::new(Box::new(MemoryStore::new()), None);
        assert_eq!(c.delete("1").await.unwrap(), SyncOutcome::NoSession);
        let outcome = c
            .edit(
                "1",
                TransactionUpdate {
                    kind: TransactionKind::Expense,
                    amount: Amount::ZERO,
                    category: String::new(),
                    note: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(outcome, SyncOutcome::NoSession);
        assert!(matches!(
            c.find("1").await.unwrap(),
            SyncOutcome::NoSession
        ));
    }

    #[tokio::test]
    async fn find_addresses_directly() {
        let (mut c, _scope) = controller(basic_seed());
        let SyncOutcome::Applied(record) = c.find("1").await.unwrap() else {
            panic!("expected Applied");
        };
        assert_eq!(record.id, "1");
        assert!(matches!(
            c.find("nope").await.unwrap(),
            SyncOutcome::NotFound
        ));
    }
}
