//! Locale codec.
//!
//! The platform identifies a customer's regional context with a
//! `language-country` string such as `nl-NL`. [`Locale`] is the structured
//! form; [`LocaleInput`] accepts either form wherever a locale is a
//! parameter.

use core::fmt;
use core::str::FromStr;

use serde::Serialize;

use crate::error::{Result, ZaypayError};

/// Separator between the language and the country part.
const SEPARATOR: char = '-';

/// A language-country pair, e.g. `nl` + `NL`.
///
/// Both parts are guaranteed to be non-empty, so formatting a `Locale`
/// with [`Display`](fmt::Display) always yields a valid wire string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Locale {
    /// Language code (first wire component).
    language: String,
    /// Country code (second wire component).
    country: String,
}

impl Locale {
    /// Creates a locale from its language and country codes.
    ///
    /// # Errors
    ///
    /// Returns [`ZaypayError::InvalidLocale`] if either part is empty.
    #[inline]
    pub fn new<L: Into<String>, C: Into<String>>(language: L, country: C) -> Result<Self> {
        let language = language.into();
        let country = country.into();
        if language.is_empty() || country.is_empty() {
            return Err(ZaypayError::InvalidLocale(format!(
                "both language and country are required (got {language:?} and {country:?})"
            )));
        }
        Ok(Self { language, country })
    }

    /// Returns the language code.
    #[inline]
    #[must_use]
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Returns the country code.
    #[inline]
    #[must_use]
    pub fn country(&self) -> &str {
        &self.country
    }
}

impl fmt::Display for Locale {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.language, self.country)
    }
}

impl FromStr for Locale {
    type Err = ZaypayError;

    /// Splits on the first `-`: everything before it is the language,
    /// everything after it the country.
    #[inline]
    fn from_str(raw: &str) -> Result<Self> {
        let (language, country) = raw.split_once(SEPARATOR).ok_or_else(|| {
            ZaypayError::InvalidLocale(format!("{raw:?} is not in language-country format"))
        })?;
        Self::new(language, country)
    }
}

/// A locale given in either of its two representations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleInput {
    /// Wire form, e.g. `"nl-NL"`.
    Tag(String),
    /// Already structured pair.
    Pair(Locale),
}

impl LocaleInput {
    /// Resolves the input into a validated [`Locale`].
    ///
    /// # Errors
    ///
    /// Returns [`ZaypayError::InvalidLocale`] if a string input is not in
    /// `language-country` form.
    #[inline]
    pub fn resolve(self) -> Result<Locale> {
        match self {
            Self::Tag(raw) => raw.parse(),
            Self::Pair(locale) => Ok(locale),
        }
    }
}

impl From<&str> for LocaleInput {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Tag(value.to_owned())
    }
}

impl From<String> for LocaleInput {
    #[inline]
    fn from(value: String) -> Self {
        Self::Tag(value)
    }
}

impl From<Locale> for LocaleInput {
    #[inline]
    fn from(value: Locale) -> Self {
        Self::Pair(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_language_and_country() {
        let locale = Locale::new("nl", "NL").unwrap();
        assert_eq!(locale.to_string(), "nl-NL");
    }

    #[test]
    fn parse_splits_on_first_separator() {
        let locale: Locale = "nl-NL".parse().unwrap();
        assert_eq!(locale.language(), "nl");
        assert_eq!(locale.country(), "NL");

        let script: Locale = "zh-Hant-TW".parse().unwrap();
        assert_eq!(script.language(), "zh");
        assert_eq!(script.country(), "Hant-TW");
    }

    #[test]
    fn parse_rejects_single_part() {
        let err = "nl".parse::<Locale>().unwrap_err();
        assert!(matches!(err, ZaypayError::InvalidLocale(_)));
    }

    #[test]
    fn parse_rejects_empty_parts() {
        assert!("nl-".parse::<Locale>().is_err());
        assert!("-NL".parse::<Locale>().is_err());
        assert!("".parse::<Locale>().is_err());
    }

    #[test]
    fn new_rejects_empty_fields() {
        assert!(matches!(
            Locale::new("", "NL"),
            Err(ZaypayError::InvalidLocale(_))
        ));
        assert!(matches!(
            Locale::new("nl", ""),
            Err(ZaypayError::InvalidLocale(_))
        ));
    }

    #[test]
    fn string_roundtrip() {
        for (language, country) in [("nl", "NL"), ("en", "GB"), ("de", "AT"), ("x", "y")] {
            let locale = Locale::new(language, country).unwrap();
            let parsed: Locale = locale.to_string().parse().unwrap();
            assert_eq!(parsed, locale);
        }
    }

    #[test]
    fn input_resolves_both_forms() {
        let from_tag = LocaleInput::from("en-GB").resolve().unwrap();
        let from_pair = LocaleInput::from(Locale::new("en", "GB").unwrap())
            .resolve()
            .unwrap();
        assert_eq!(from_tag, from_pair);
    }

    #[test]
    fn input_rejects_malformed_tag() {
        let err = LocaleInput::from("english".to_owned()).resolve().unwrap_err();
        assert!(matches!(err, ZaypayError::InvalidLocale(_)));
    }

    #[test]
    fn serializes_as_pair() {
        let locale = Locale::new("nl", "NL").unwrap();
        let json = serde_json::to_value(&locale).unwrap();
        assert_eq!(json, serde_json::json!({"language": "nl", "country": "NL"}));
    }
}
