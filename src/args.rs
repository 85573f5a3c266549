//! These structs provide the CLI interface for the fintrack CLI.

use crate::model::{Amount, TransactionKind};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// fintrack: a command-line tool for tracking personal finance transactions.
///
/// Transactions live in a per-user collection in a cloud document database.
/// This program keeps an in-memory mirror of that collection for the duration
/// of one invocation: it loads your records once, lets you inspect totals and
/// the transaction list, and pushes inserts, edits and deletes to the remote
/// store before mirroring them locally.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// This is the first command you should run. Decide what directory you
    /// want configuration stored in and pass it as --fintrack-home (default
    /// $HOME/fintrack), then provide the cloud project id that owns your
    /// transaction documents.
    Init(InitArgs),
    /// Store an authenticated session (uid and bearer token).
    ///
    /// Obtaining the token is outside this tool; paste one obtained from your
    /// identity provider. Without a stored session every synchronization
    /// command is silently skipped.
    Login(LoginArgs),
    /// Fetch all remote transactions once and report how many were loaded.
    Load,
    /// Show the transaction list in display order with the balance summary.
    List(ListArgs),
    /// Show total income, total expense and the balance.
    Summary,
    /// Create a transaction in the remote store.
    Insert(InsertArgs),
    /// Edit a transaction's type, amount, category or note.
    Update(UpdateArgs),
    /// Delete a transaction.
    Delete(DeleteArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where fintrack configuration is held. Defaults to
    /// ~/fintrack
    #[arg(long, env = "FINTRACK_HOME", default_value_t = default_fintrack_home())]
    fintrack_home: DisplayPath,
}

impl Common {
    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn fintrack_home(&self) -> &DisplayPath {
        &self.fintrack_home
    }
}

/// Args for the `fintrack init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The cloud project id that owns the transaction documents.
    #[arg(long)]
    project_id: String,

    /// Override the document-database endpoint, e.g. a local emulator URL.
    #[arg(long)]
    endpoint: Option<String>,
}

impl InitArgs {
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }
}

/// Args for the `fintrack login` command.
#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    /// The user id that scopes the remote collection.
    #[arg(long)]
    uid: String,

    /// The bearer token presented to the document store.
    #[arg(long)]
    token: String,
}

impl LoginArgs {
    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

/// Args for the `fintrack list` command.
#[derive(Debug, Parser, Clone)]
pub struct ListArgs {
    /// Show a single transaction by its identifier instead of the whole list.
    #[arg(long)]
    id: Option<String>,
}

impl ListArgs {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }
}

/// Args for the `fintrack insert` command.
#[derive(Debug, Parser, Clone)]
pub struct InsertArgs {
    /// Whether this is income or an expense.
    #[arg(long, value_enum)]
    kind: TransactionKind,

    /// The non-negative amount.
    #[arg(long)]
    amount: Amount,

    /// Free-text category label.
    #[arg(long)]
    category: String,

    /// Optional free-text note.
    #[arg(long)]
    note: Option<String>,

    /// The calendar date, e.g. 2025-03-01.
    #[arg(long)]
    date: NaiveDate,
}

impl InsertArgs {
    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

/// Args for the `fintrack update` command. Omitted fields keep their current
/// values, the way an edit form is pre-populated from the record.
#[derive(Debug, Parser, Clone)]
pub struct UpdateArgs {
    /// The identifier of the transaction to edit.
    id: String,

    /// Change the transaction kind.
    #[arg(long, value_enum)]
    kind: Option<TransactionKind>,

    /// Change the amount. An empty string coerces to zero.
    #[arg(long)]
    amount: Option<String>,

    /// Change the category label.
    #[arg(long)]
    category: Option<String>,

    /// Change the note. An empty string clears it.
    #[arg(long)]
    note: Option<String>,
}

impl UpdateArgs {
    pub fn new(
        id: impl Into<String>,
        kind: Option<TransactionKind>,
        amount: Option<String>,
        category: Option<String>,
        note: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            amount,
            category,
            note,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> Option<TransactionKind> {
        self.kind
    }

    pub fn amount(&self) -> Option<&str> {
        self.amount.as_deref()
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }
}

/// Args for the `fintrack delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The identifier of the transaction to delete.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

fn default_fintrack_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("fintrack"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --fintrack-home or FINTRACK_HOME instead of relying on the \
                default fintrack home directory. If you continue using the program right now, \
                you may have problems!",
            );
            PathBuf::from("fintrack")
        }
    })
}

/// A `PathBuf` that implements `Display` so clap can show it as a default.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
