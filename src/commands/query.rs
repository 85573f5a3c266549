//! Read-only commands: the transaction list and the balance summary.

use crate::args::ListArgs;
use crate::commands::Out;
use crate::model::{Transaction, TransactionKind};
use crate::store::Mode;
use crate::sync::{SyncController, SyncOutcome};
use crate::{metrics, view, Config, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// The derived totals over the loaded collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub total_income: Decimal,
    pub total_expense: Decimal,
    pub balance: Decimal,
}

impl Summary {
    fn compute(records: &[Transaction]) -> Self {
        Self {
            total_income: metrics::total_income(records),
            total_expense: metrics::total_expense(records),
            balance: metrics::balance(records),
        }
    }
}

/// Shows the transaction list in display order with the balance line, or a
/// single transaction when `--id` is given.
pub async fn list(config: Config, mode: Mode, args: &ListArgs) -> Result<Out<Vec<Transaction>>> {
    let mut controller = SyncController::for_config(&config, mode).await?;

    if let Some(id) = args.id() {
        return Ok(match controller.find(id).await? {
            SyncOutcome::Applied(record) => Out::new(render_row(&record), vec![record]),
            SyncOutcome::NotFound => Out::new_message(format!("No transaction '{id}' found")),
            SyncOutcome::NoSession => {
                Out::new_message("Not signed in; run 'fintrack login' first")
            }
        });
    }

    controller.initial_load().await?;
    let records = controller.state().records();
    if records.is_empty() {
        return Ok(Out::new_message(
            "No transactions yet; add one with 'fintrack insert'",
        ));
    }

    let ordered = view::display_order(records);
    let mut message = String::new();
    for record in &ordered {
        let _ = writeln!(message, "{}", render_row(record));
    }
    let summary = Summary::compute(records);
    let _ = write!(
        message,
        "Balance: {} (income {}, expense {})",
        summary.balance, summary.total_income, summary.total_expense
    );
    Ok(Out::new(message, ordered.into_iter().cloned().collect()))
}

/// Shows total income, total expense and the balance.
pub async fn summary(config: Config, mode: Mode) -> Result<Out<Summary>> {
    let mut controller = SyncController::for_config(&config, mode).await?;
    controller.initial_load().await?;
    let summary = Summary::compute(controller.state().records());
    let message = format!(
        "Income: {}  Expense: {}  Balance: {}",
        summary.total_income, summary.total_expense, summary.balance
    );
    Ok(Out::new(message, summary))
}

fn render_row(t: &Transaction) -> String {
    let sign = match t.kind {
        TransactionKind::Income => '+',
        TransactionKind::Expense => '-',
    };
    format!(
        "{}  {}{:<12}  {:<16}  {}  {}",
        t.date,
        sign,
        t.amount.to_string(),
        t.category,
        t.note.as_deref().unwrap_or("No Note"),
        t.id
    )
}
