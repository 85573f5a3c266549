use crate::args::InsertArgs;
use crate::commands::Out;
use crate::model::{NewTransaction, Transaction};
use crate::store::Mode;
use crate::sync::{SyncController, SyncOutcome};
use crate::{Config, Result};

/// Creates a transaction in the remote store and mirrors it locally.
pub async fn insert(config: Config, mode: Mode, args: &InsertArgs) -> Result<Out<Transaction>> {
    let mut controller = SyncController::for_config(&config, mode).await?;
    let new = NewTransaction {
        kind: args.kind(),
        amount: args.amount(),
        category: args.category().to_string(),
        note: args.note().map(str::to_string),
        date: args.date(),
    };
    match controller.add(new).await? {
        SyncOutcome::Applied(record) => Ok(Out::new(
            format!("Transaction created with id '{}'", record.id),
            record,
        )),
        SyncOutcome::NoSession => Ok(Out::new_message(
            "Not signed in; run 'fintrack login' first",
        )),
        // Inserts address a fresh identifier; there is nothing to not-find.
        SyncOutcome::NotFound => anyhow::bail!("Insert reported a missing document"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TransactionKind;
    use crate::test::TestEnv;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[clap(flatten)]
        args: InsertArgs,
    }

    fn insert_args(extra: &[&str]) -> InsertArgs {
        let mut argv = vec!["test"];
        argv.extend_from_slice(extra);
        Wrapper::parse_from(argv).args
    }

    #[tokio::test]
    async fn insert_creates_remote_document() {
        let env = TestEnv::new().await;
        let args = insert_args(&[
            "--kind", "expense",
            "--amount", "42.50",
            "--category", "Groceries",
            "--note", "weekly shop",
            "--date", "2025-03-05",
        ]);
        let out = insert(env.config(), Mode::Memory, &args).await.unwrap();
        let record = out.structure().unwrap();
        assert_eq!(record.kind, TransactionKind::Expense);
        assert!(record.created_at.is_some());

        let remote = env.remote_state();
        assert_eq!(remote.len(), 1);
        assert_eq!(remote[0].category, "Groceries");
    }

    #[tokio::test]
    async fn insert_without_session_is_skipped() {
        let env = TestEnv::new_without_session().await;
        let args = insert_args(&[
            "--kind", "income",
            "--amount", "100",
            "--category", "Misc",
            "--date", "2025-03-05",
        ]);
        let out = insert(env.config(), Mode::Memory, &args).await.unwrap();
        assert!(out.message().contains("Not signed in"));
        assert!(out.structure().is_none());
    }
}
