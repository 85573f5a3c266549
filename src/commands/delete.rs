//! The delete intent.

use crate::args::DeleteArgs;
use crate::commands::Out;
use crate::store::Mode;
use crate::sync::{SyncController, SyncOutcome};
use crate::{Config, Result};
use tracing::warn;

/// Deletes a transaction, remote first. A record that is not present remotely
/// leaves everything unchanged and produces no success message.
pub async fn delete(config: Config, mode: Mode, args: &DeleteArgs) -> Result<Out<String>> {
    let mut controller = SyncController::for_config(&config, mode).await?;
    match controller.delete(args.id()).await? {
        SyncOutcome::Applied(()) => Ok(Out::new(
            "Transaction deleted successfully!".to_string(),
            args.id().to_string(),
        )),
        SyncOutcome::NotFound => {
            warn!("No matching transaction found for deletion '{}'", args.id());
            Ok(Out::new_message(format!(
                "Nothing deleted; transaction '{}' was not found",
                args.id()
            )))
        }
        SyncOutcome::NoSession => Ok(Out::new_message(
            "Not signed in; run 'fintrack login' first",
        )),
    }
}
