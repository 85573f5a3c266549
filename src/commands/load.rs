use crate::commands::Out;
use crate::store::Mode;
use crate::sync::{LoadOutcome, SyncController};
use crate::{Config, Result};

/// Runs the initial load and reports how many records were seeded.
pub async fn load(config: Config, mode: Mode) -> Result<Out<usize>> {
    let mut controller = SyncController::for_config(&config, mode).await?;
    match controller.initial_load().await? {
        LoadOutcome::Seeded(count) => {
            let plural = if count == 1 { "" } else { "s" };
            Ok(Out::new(format!("Loaded {count} transaction{plural}"), count))
        }
        LoadOutcome::Skipped => Ok(Out::new_message(
            "Load skipped: no authenticated session (run 'fintrack login')",
        )),
    }
}
