pub mod args;
pub mod commands;
mod config;
mod error;
pub mod metrics;
mod model;
mod state;
mod store;
mod sync;
pub mod view;

mod utils;


pub use config::{Config, Session};
pub use error::{Error, Result};
pub use model::{Amount, NewTransaction, Transaction, TransactionKind, TransactionUpdate};
pub use state::{Action, StateStore};
pub use store::{DocumentStore, Mode, UserScope};
pub use sync::{LoadOutcome, SyncController, SyncOutcome};
