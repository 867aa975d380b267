//! Layered settings: command-line flag > config file > environment.
//!
//! Sources are fed to the `config` crate lowest-precedence first:
//!
//! 1. `INFOMANIAK_*` environment variables (`INFOMANIAK_TOKEN`,
//!    `INFOMANIAK_ACCOUNT_ID`, `INFOMANIAK_BASE_URL`, `INFOMANIAK_TIMEOUT_SECS`)
//! 2. a YAML config file, either `--config` or the first existing of
//!    `$HOME/.informaniak.yaml` and `./.informaniak.yaml`
//! 3. flags given on the command line
//!
//! Resolution never fails on a missing token or account id; the commands that
//! need them ask via [`Settings::token`] and [`Settings::account_id`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use infomaniak_api::DEFAULT_TIMEOUT;
use registrar::{AccountId, InvalidIdentifier};
use serde::Deserialize;
use thiserror::Error;

use crate::args::GlobalArgs;

/// File name looked up in the home and working directories.
pub const CONFIG_FILE_NAME: &str = ".informaniak.yaml";

const ENV_PREFIX: &str = "INFOMANIAK";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("token is required: set via --token, config file, or $INFOMANIAK_TOKEN")]
    MissingToken,

    #[error(
        "account-id is required: set via --account-id, config file, or $INFOMANIAK_ACCOUNT_ID"
    )]
    MissingAccountId,

    #[error(transparent)]
    InvalidAccountId(#[from] InvalidIdentifier),

    #[error("config file {0} does not exist")]
    ConfigFileNotFound(PathBuf),

    #[error("timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("load settings")]
    Load(#[from] config::ConfigError),
}

/// Where to look for settings besides the flags themselves.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    /// `INFOMANIAK_*` variables; other names are ignored.
    pub env: HashMap<String, String>,
    /// Home directory, if one could be determined.
    pub home_dir: Option<PathBuf>,
    /// Directory searched after the home directory.
    pub working_dir: PathBuf,
}

impl Sources {
    /// The current process environment and directories.
    pub fn from_process() -> Self {
        Self {
            env: std::env::vars()
                .filter(|(key, _)| key.starts_with(ENV_PREFIX))
                .collect(),
            home_dir: dirs::home_dir(),
            working_dir: PathBuf::from("."),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    token: Option<String>,
    account_id: Option<String>,
    base_url: Option<String>,
    timeout_secs: Option<u64>,
}

/// Fully resolved settings for one invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct Settings {
    token: Option<String>,
    account_id: Option<String>,
    base_url: Option<String>,
    timeout: Duration,
    config_file: Option<PathBuf>,
}

impl Settings {
    /// Merges flags, the config file and the environment.
    pub fn resolve(flags: &GlobalArgs, sources: &Sources) -> Result<Self, SettingsError> {
        let config_file = locate_config_file(flags.config.as_deref(), sources)?;

        let mut builder = Config::builder().add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .source(Some(sources.env.clone())),
        );
        if let Some(path) = &config_file {
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Yaml));
        }
        let raw: RawSettings = builder
            .set_override_option("token", flags.token.clone())?
            .set_override_option("account_id", flags.account_id.clone())?
            .set_override_option("base_url", flags.base_url.clone())?
            .build()?
            .try_deserialize()?;

        let timeout = match raw.timeout_secs {
            Some(0) => return Err(SettingsError::ZeroTimeout),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            token: non_empty(raw.token),
            account_id: non_empty(raw.account_id),
            base_url: non_empty(raw.base_url),
            timeout,
            config_file,
        })
    }

    /// The API token.
    pub fn token(&self) -> Result<&str, SettingsError> {
        self.token.as_deref().ok_or(SettingsError::MissingToken)
    }

    /// The account whose domains are listed.
    pub fn account_id(&self) -> Result<AccountId, SettingsError> {
        let raw = self
            .account_id
            .as_deref()
            .ok_or(SettingsError::MissingAccountId)?;
        Ok(raw.parse()?)
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// The config file that was read, if any.
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("account_id", &self.account_id)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("config_file", &self.config_file)
            .finish()
    }
}

fn locate_config_file(
    explicit: Option<&Path>,
    sources: &Sources,
) -> Result<Option<PathBuf>, SettingsError> {
    if let Some(path) = explicit {
        return if path.is_file() {
            Ok(Some(path.to_path_buf()))
        } else {
            Err(SettingsError::ConfigFileNotFound(path.to_path_buf()))
        };
    }

    Ok(sources
        .home_dir
        .iter()
        .chain(std::iter::once(&sources.working_dir))
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file()))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
