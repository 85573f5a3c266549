use crate::args::InitArgs;
use crate::commands::Out;
use crate::{Config, Result};
use std::path::Path;

/// Creates the fintrack home directory and writes the initial configuration.
pub async fn init(home: &Path, args: &InitArgs) -> Result<Out<()>> {
    let config = Config::create(home, args.project_id(), args.endpoint()).await?;
    Ok(Out::new_message(format!(
        "Initialized fintrack home at '{}' for project '{}'",
        config.root().display(),
        config.project_id()
    )))
}
