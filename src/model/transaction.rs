//! The transaction record and the field sets used to create and mutate one.

use crate::model::Amount;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Whether a transaction adds to or subtracts from the balance.
///
/// The kind controls the sign of the amount in aggregate computations; amounts
/// themselves are always non-negative.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Ord,
    PartialOrd,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    #[default]
    Expense,
}

serde_plain::derive_display_from_serialize!(TransactionKind);
serde_plain::derive_fromstr_from_deserialize!(TransactionKind);

/// A single transaction record mirrored from the remote store.
///
/// The identifier is unique within a user's collection and stable across edits.
/// `created_at` is assigned by the server and refreshed on every edit; it is
/// `None` only when the server has not yet resolved the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Transaction {
    pub id: String,
    pub kind: TransactionKind,
    pub amount: Amount,
    pub category: String,
    pub note: Option<String>,
    /// The calendar date the user assigned; used for display ordering.
    pub date: NaiveDate,
    /// Server-assigned creation timestamp; used for the initial remote ordering.
    pub created_at: Option<DateTime<Utc>>,
}

impl Transaction {
    /// Applies an edit, overwriting exactly the four mutable fields plus the
    /// refreshed server timestamp. The identifier and date are never altered.
    pub fn apply(&mut self, fields: &TransactionUpdate, stamped_at: Option<DateTime<Utc>>) {
        self.kind = fields.kind;
        self.amount = fields.amount;
        self.category = fields.category.clone();
        self.note = fields.note.clone();
        if stamped_at.is_some() {
            self.created_at = stamped_at;
        }
    }
}

/// The four fields an edit intent may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionUpdate {
    pub kind: TransactionKind,
    pub amount: Amount,
    pub category: String,
    pub note: Option<String>,
}

impl From<&Transaction> for TransactionUpdate {
    fn from(t: &Transaction) -> Self {
        Self {
            kind: t.kind,
            amount: t.amount,
            category: t.category.clone(),
            note: t.note.clone(),
        }
    }
}

/// The caller-supplied fields for a record that does not exist remotely yet.
/// The store assigns the identifier and creation timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NewTransaction {
    pub kind: TransactionKind,
    pub amount: Amount,
    pub category: String,
    pub note: Option<String>,
    pub date: NaiveDate,
}
