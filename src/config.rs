//! Configuration file handling.
//!
//! The configuration file is stored at `$FINTRACK_HOME/config.json` and names
//! the cloud project holding the transaction documents. The authenticated
//! session (uid and bearer token, obtained out of band) lives in
//! `$FINTRACK_HOME/.secrets/session.json`; a missing session file means no
//! user is signed in and every synchronization intent is guarded off.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "fintrack";
const CONFIG_VERSION: u8 = 1;
const SECRETS: &str = ".secrets";
const CONFIG_JSON: &str = "config.json";
const SESSION_JSON: &str = "session.json";
const DEFAULT_ENDPOINT: &str = "https://firestore.googleapis.com";

/// The `Config` object represents the configuration of the app. You
/// instantiate it by providing the path to `$FINTRACK_HOME` and from there it
/// loads `$FINTRACK_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    secrets: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    endpoint: Url,
}

impl Config {
    /// Creates the data directory and its subdirectories and writes an initial
    /// `config.json` for `project_id`.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory,
    ///   e.g. `$HOME/fintrack`.
    /// - `project_id` - The cloud project that owns the document database.
    /// - `endpoint` - Overrides the document-database endpoint, e.g. to point
    ///   at a local emulator. `None` uses the production endpoint.
    pub async fn create(
        dir: impl Into<PathBuf>,
        project_id: &str,
        endpoint: Option<&str>,
    ) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the fintrack home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let secrets = root.join(SECRETS);
        utils::make_dir(&secrets).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            project_id: project_id.to_string(),
            endpoint: endpoint.map(str::to_string),
        };
        let endpoint = config_file.parse_endpoint()?;
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            secrets,
            config_path,
            config_file,
            endpoint,
        })
    }

    /// Validates that the home directory and config file exist and loads them.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("Fintrack home is missing; run 'fintrack init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display());
        }
        let config_file: ConfigFile = utils::deserialize(&config_path).await?;
        let endpoint = config_file.parse_endpoint()?;

        let config = Self {
            secrets: root.join(SECRETS),
            root,
            config_path,
            config_file,
            endpoint,
        };
        if !config.secrets.is_dir() {
            bail!(
                "The secrets directory is missing '{}'",
                config.secrets.display()
            );
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn project_id(&self) -> &str {
        &self.config_file.project_id
    }

    /// The document-database endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Where the session file is expected.
    pub fn session_path(&self) -> PathBuf {
        self.secrets.join(SESSION_JSON)
    }

    /// Loads the stored session, or `None` when no user is signed in.
    pub async fn session(&self) -> Result<Option<Session>> {
        let path = self.session_path();
        if !path.is_file() {
            return Ok(None);
        }
        let session: Session = utils::deserialize(&path)
            .await
            .context("Unable to load the stored session")?;
        Ok(Some(session))
    }

    /// Writes `session` to the secrets directory.
    pub async fn save_session(&self, session: &Session) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(session).context("Unable to serialize the session")?;
        utils::write(self.session_path(), contents).await
    }
}

/// The serialized form of `config.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
struct ConfigFile {
    app_name: String,
    config_version: u8,
    project_id: String,
    /// Optional endpoint override, e.g. an emulator URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    endpoint: Option<String>,
}

impl ConfigFile {
    async fn save(&self, path: &Path) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(self).context("Unable to serialize config.json")?;
        utils::write(path, contents).await
    }

    fn parse_endpoint(&self) -> Result<Url> {
        let raw = self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);
        Url::parse(raw).with_context(|| format!("Invalid endpoint URL '{raw}'"))
    }
}

/// An authenticated user session: the uid that scopes the remote collection
/// and the bearer token presented to the document store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Session {
    uid: String,
    token: String,
}

impl Session {
    pub fn new(uid: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            token: token.into(),
        }
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}
