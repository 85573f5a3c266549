//! Domain types for the transaction mirror.

mod amount;
mod transaction;

pub use amount::Amount;
pub use transaction::{NewTransaction, Transaction, TransactionKind, TransactionUpdate};
