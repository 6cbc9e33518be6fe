//! Locale listings returned for a price setting.

use serde::Serialize;
use serde_json::Value;

use crate::locale::Locale;

/// Countries and languages configured for a price setting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Locales {
    /// Configured countries, each a record with at least `code` and `name`.
    pub countries: Vec<Value>,
    /// Configured languages (`code`, `english_name`, `native_name`), passed
    /// through as the platform sent them.
    pub languages: Value,
}

/// A configured country matched against a visitor's IP address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfiguredCountry {
    /// The country record from the price setting's configuration.
    pub country: Value,
    /// The locale the platform resolved for the IP address.
    pub locale: Locale,
}
