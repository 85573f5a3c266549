//! The edit intent: pre-populate a draft from the record's current values,
//! merge in the requested changes, and push the result remote-then-local.

use crate::args::UpdateArgs;
use crate::commands::Out;
use crate::store::Mode;
use crate::sync::{SyncController, SyncOutcome};
use crate::view::ListView;
use crate::{Config, Result};
use anyhow::Context;
use tracing::warn;

/// Edits a transaction's type, amount, category or note. Fields not named in
/// `args` keep their current values. The identifier and date never change; the
/// server timestamp is refreshed.
pub async fn update(config: Config, mode: Mode, args: &UpdateArgs) -> Result<Out<String>> {
    let mut controller = SyncController::for_config(&config, mode).await?;

    let record = match controller.find(args.id()).await? {
        SyncOutcome::Applied(record) => record,
        SyncOutcome::NotFound => {
            warn!("No matching transaction found for editing '{}'", args.id());
            return Ok(Out::new_message(format!(
                "Nothing updated; transaction '{}' was not found",
                args.id()
            )));
        }
        SyncOutcome::NoSession => {
            return Ok(Out::new_message(
                "Not signed in; run 'fintrack login' first",
            ))
        }
    };

    let mut view = ListView::new();
    view.begin_edit(&record);
    {
        let draft = view
            .draft_mut()
            .context("Edit draft missing after begin_edit")?;
        if let Some(kind) = args.kind() {
            draft.kind = kind;
        }
        if let Some(amount) = args.amount() {
            draft.amount = amount.to_string();
        }
        if let Some(category) = args.category() {
            draft.category = category.to_string();
        }
        if let Some(note) = args.note() {
            draft.note = note.to_string();
        }
    }
    let (id, fields) = view
        .save()?
        .context("Edit draft missing on save")?;

    match controller.edit(&id, fields).await? {
        SyncOutcome::Applied(()) => Ok(Out::new(
            "Transaction updated successfully!".to_string(),
            id,
        )),
        SyncOutcome::NotFound => {
            warn!("No matching transaction found for editing '{id}'");
            Ok(Out::new_message(format!(
                "Nothing updated; transaction '{id}' was not found"
            )))
        }
        SyncOutcome::NoSession => Ok(Out::new_message(
            "Not signed in; run 'fintrack login' first",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, TransactionKind};
    use crate::test::TestEnv;
    use std::str::FromStr;

    #[tokio::test]
    async fn update_merges_named_fields_only() {
        let env = TestEnv::new().await;
        env.seed_remote(TestEnv::sample_records());

        let args = UpdateArgs::new(
            "income-1",
            None,
            Some("1500".to_string()),
            None,
            None,
        );
        let out = update(env.config(), Mode::Memory, &args).await.unwrap();
        assert!(out.message().contains("updated successfully"));

        let remote = env.remote_state();
        let edited = remote.iter().find(|t| t.id == "income-1").unwrap();
        assert_eq!(edited.amount, Amount::from_str("1500").unwrap());
        // Unnamed fields kept their values.
        assert_eq!(edited.kind, TransactionKind::Income);
        assert_eq!(edited.category, "Salary");
    }

    #[tokio::test]
    async fn update_missing_record_mutates_nothing() {
        let env = TestEnv::new().await;
        env.seed_remote(TestEnv::sample_records());

        let args = UpdateArgs::new("ghost", None, Some("9".to_string()), None, None);
        let out = update(env.config(), Mode::Memory, &args).await.unwrap();
        assert!(out.message().contains("was not found"));
        assert!(out.structure().is_none());
        assert_eq!(env.remote_state().len(), 2);
    }

    #[tokio::test]
    async fn update_empty_amount_coerces_to_zero() {
        let env = TestEnv::new().await;
        env.seed_remote(TestEnv::sample_records());

        let args = UpdateArgs::new("expense-1", None, Some(String::new()), None, None);
        update(env.config(), Mode::Memory, &args).await.unwrap();
        let remote = env.remote_state();
        let edited = remote.iter().find(|t| t.id == "expense-1").unwrap();
        assert!(edited.amount.is_zero());
    }

    #[tokio::test]
    async fn update_without_session_reports_sign_in() {
        let env = TestEnv::new_without_session().await;

        let args = UpdateArgs::new("income-1", None, Some("1500".to_string()), None, None);
        let out = update(env.config(), Mode::Memory, &args).await.unwrap();
        assert!(out.message().contains("Not signed in"));
        assert!(!out.message().contains("not found"));
        assert!(out.structure().is_none());
    }

    #[tokio::test]
    async fn update_refreshes_server_timestamp() {
        let env = TestEnv::new().await;
        env.seed_remote(TestEnv::sample_records());
        let before = env
            .remote_state()
            .into_iter()
            .find(|t| t.id == "expense-1")
            .unwrap()
            .created_at;

        let args = UpdateArgs::new(
            "expense-1",
            None,
            None,
            Some("Rent".to_string()),
            None,
        );
        update(env.config(), Mode::Memory, &args).await.unwrap();
        let after = env
            .remote_state()
            .into_iter()
            .find(|t| t.id == "expense-1")
            .unwrap();
        assert_eq!(after.category, "Rent");
        assert_ne!(after.created_at, before);
        assert_eq!(after.id, "expense-1");
    }
}
