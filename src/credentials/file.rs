//! JSON-file-based credential source.
//!
//! Reads price setting credentials from a JSON object mapping price
//! setting ids to API keys, plus an optional `default` entry (default
//! location: `$XDG_CONFIG_HOME/zaypay-rs/zaypay.json`).

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};

use super::{CredentialSource, Credentials, DEFAULT_ENTRY, InMemoryCredentials};
use crate::error::{Result, ZaypayError};
use crate::models::PriceSettingId;

/// Application name used for the config directory.
const APP_NAME: &str = "zaypay-rs";

/// File name of the credentials file.
const CREDENTIALS_FILE: &str = "zaypay.json";

/// Credential source reading a JSON file on every resolution.
///
/// The file is not cached: each construction that needs a fallback reads
/// it again, so edits take effect without restarting.
#[derive(Debug, Clone)]
pub struct FileCredentials {
    /// Path of the JSON file.
    path: PathBuf,
}

impl FileCredentials {
    /// Creates a source reading the given file.
    #[inline]
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default XDG-compliant location of the credentials file.
    ///
    /// On Linux: `$XDG_CONFIG_HOME/zaypay-rs/zaypay.json` (typically
    /// `~/.config/zaypay-rs/zaypay.json`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform config directory cannot be
    /// determined.
    #[inline]
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|config_path| config_path.join(APP_NAME).join(CREDENTIALS_FILE))
            .ok_or_else(|| {
                ZaypayError::Config("could not determine platform config directory".to_owned())
            })
    }

    /// Returns the path of the file this source reads.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and parses the file into an in-memory source.
    ///
    /// # Errors
    ///
    /// Returns [`ZaypayError::CredentialSource`] if the file cannot be
    /// read, [`ZaypayError::CredentialsFormat`] if it is not JSON, and
    /// [`ZaypayError::Config`] if it is empty or has malformed entries.
    pub fn load(&self) -> Result<InMemoryCredentials> {
        let contents = fs::read_to_string(&self.path)
            .map_err(|err| ZaypayError::CredentialSource(Box::new(err)))?;
        let table: Map<String, Value> =
            serde_json::from_str(&contents).map_err(ZaypayError::CredentialsFormat)?;
        if table.is_empty() {
            return Err(ZaypayError::Config(format!(
                "credentials file {} is empty",
                self.path.display()
            )));
        }
        table.into_iter().try_fold(
            InMemoryCredentials::new(),
            |source, (entry, value)| -> Result<InMemoryCredentials> {
                if entry == DEFAULT_ENTRY {
                    return Ok(source.with_default(parse_id(&value)?));
                }
                let id = entry
                    .parse::<PriceSettingId>()
                    .map_err(|_parse| invalid_entry(&entry, "is not a price setting id"))?;
                let api_key = value
                    .as_str()
                    .ok_or_else(|| invalid_entry(&entry, "API key must be a string"))?;
                Ok(source.with_key(id, api_key))
            },
        )
    }
}

impl Default for FileCredentials {
    /// Uses [`FileCredentials::default_path`], falling back to
    /// `zaypay.json` in the working directory.
    #[inline]
    fn default() -> Self {
        Self::new(Self::default_path().unwrap_or_else(|_err| PathBuf::from(CREDENTIALS_FILE)))
    }
}

impl CredentialSource for FileCredentials {
    #[tracing::instrument(skip_all, fields(path = %self.path.display()))]
    fn resolve(&self, id: Option<PriceSettingId>) -> Result<Credentials> {
        tracing::debug!("reading credentials file");
        self.load()?.resolve(id)
    }
}

/// Reads the `default` entry, given either as a number or a string.
fn parse_id(value: &Value) -> Result<PriceSettingId> {
    let id = match *value {
        Value::Number(ref number) => number.as_u64().map(PriceSettingId::new),
        Value::String(ref raw) => raw.parse().ok(),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };
    id.ok_or_else(|| invalid_entry(DEFAULT_ENTRY, "must name a price setting id"))
}

/// Builds the error for a malformed file entry.
fn invalid_entry(entry: &str, problem: &str) -> ZaypayError {
    ZaypayError::Config(format!("credentials entry `{entry}` {problem}"))
}
