//! Price setting credentials and their fallback sources.
//!
//! A [`PriceSetting`](crate::price_setting) needs an id and an API key.
//! When the caller does not pass both, they are looked up in a
//! [`CredentialSource`]: [`InMemoryCredentials`] for tests and
//! programmatic setups, [`FileCredentials`] for a JSON file such as
//!
//! ```json
//! {
//!   "default": 111111,
//!   "111111": "999a99999999aa9aaa99aa9a99a99a9a",
//!   "222222": "888b88888888bb8bbb88bb8b88b88b8b"
//! }
//! ```

#[cfg(feature = "credentials-file")]
mod file;
mod memory;

use secrecy::{ExposeSecret, SecretString};

use crate::error::{Result, ZaypayError};
use crate::models::PriceSettingId;

#[cfg(feature = "credentials-file")]
pub use file::FileCredentials;
pub use memory::InMemoryCredentials;

/// Entry naming the price setting to use when none is given.
pub const DEFAULT_ENTRY: &str = "default";

/// A price setting id together with its API key.
#[derive(Debug)]
pub struct Credentials {
    /// Price setting id.
    id: PriceSettingId,
    /// API key belonging to the price setting.
    api_key: SecretString,
}

impl Credentials {
    /// Creates credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ZaypayError::Config`] if the API key is blank.
    #[inline]
    pub fn new<K: Into<String>>(id: PriceSettingId, api_key: K) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ZaypayError::Config(format!(
                "API key for price setting {id} is empty"
            )));
        }
        Ok(Self {
            id,
            api_key: SecretString::from(api_key),
        })
    }

    /// Returns the price setting id.
    #[inline]
    #[must_use]
    pub const fn id(&self) -> PriceSettingId {
        self.id
    }

    /// Returns the API key.
    #[inline]
    #[must_use]
    pub const fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    /// Splits the credentials into id and key.
    #[inline]
    #[must_use]
    pub fn into_parts(self) -> (PriceSettingId, SecretString) {
        (self.id, self.api_key)
    }
}

impl Clone for Credentials {
    #[inline]
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            api_key: SecretString::from(self.api_key.expose_secret().to_owned()),
        }
    }
}

/// A source of default credentials, consulted only at construction time.
pub trait CredentialSource: core::fmt::Debug + Send + Sync {
    /// Resolves the credentials for `id`, or for the source's default
    /// price setting when `id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`ZaypayError::Config`] if the source has no usable entry,
    /// or [`ZaypayError::CredentialSource`] if it cannot be read.
    fn resolve(&self, id: Option<PriceSettingId>) -> Result<Credentials>;
}

/// Resolves credentials for a new price setting.
///
/// With both `id` and `api_key` given, `source` is not consulted.
/// Otherwise the source resolves `id` (or its default entry), and the key
/// it holds for that id is used.
///
/// # Errors
///
/// Returns [`ZaypayError::Config`] if no complete pair can be found, or
/// whatever the source fails with.
#[tracing::instrument(skip_all)]
pub fn resolve<C: CredentialSource + ?Sized>(
    id: Option<PriceSettingId>,
    api_key: Option<String>,
    source: &C,
) -> Result<Credentials> {
    if let (Some(id), Some(api_key)) = (id, api_key) {
        return Credentials::new(id, api_key);
    }
    tracing::debug!(id = ?id, "falling back to credential source");
    source.resolve(id)
}
