//! In-memory credential source.
//!
//! Provides [`InMemoryCredentials`], a [`CredentialSource`] holding its
//! entries in a map. Useful in tests and when credentials come from
//! somewhere other than a file (environment, a secrets manager).

use std::collections::HashMap;

use secrecy::{ExposeSecret, SecretString};

use super::{CredentialSource, Credentials};
use crate::error::{Result, ZaypayError};
use crate::models::PriceSettingId;

/// Credential source backed by an in-memory map.
///
/// # Example
///
/// ```rust
/// use zaypay_rs::credentials::{CredentialSource, InMemoryCredentials};
/// use zaypay_rs::models::PriceSettingId;
///
/// let source = InMemoryCredentials::new()
///     .with_default(PriceSettingId::new(111_111))
///     .with_key(PriceSettingId::new(111_111), "999a99999999aa9aaa99aa9a99a99a9a");
/// let credentials = source.resolve(None).unwrap();
/// assert_eq!(credentials.id(), PriceSettingId::new(111_111));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCredentials {
    /// Price setting used when none is requested.
    default: Option<PriceSettingId>,
    /// API keys by price setting.
    keys: HashMap<PriceSettingId, SecretString>,
}

impl InMemoryCredentials {
    /// Creates an empty source.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the price setting used when none is requested.
    #[inline]
    #[must_use]
    pub const fn with_default(mut self, id: PriceSettingId) -> Self {
        self.default = Some(id);
        self
    }

    /// Adds (or replaces) the API key of a price setting.
    #[inline]
    #[must_use]
    pub fn with_key<K: Into<String>>(mut self, id: PriceSettingId, api_key: K) -> Self {
        let _previous = self.keys.insert(id, SecretString::from(api_key.into()));
        self
    }

    /// Returns `true` if the source has neither a default nor any key.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.keys.is_empty()
    }
}

impl CredentialSource for InMemoryCredentials {
    #[inline]
    fn resolve(&self, id: Option<PriceSettingId>) -> Result<Credentials> {
        let id = id.or(self.default).ok_or_else(|| {
            ZaypayError::Config(
                "no price setting id given and no default configured; pass one to the \
                 constructor or add a `default` entry to your credentials"
                    .to_owned(),
            )
        })?;
        let api_key = self.keys.get(&id).ok_or_else(|| {
            ZaypayError::Config(format!("no API key configured for price setting {id}"))
        })?;
        Credentials::new(id, api_key.expose_secret())
    }
}
