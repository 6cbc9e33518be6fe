//! Request descriptors and the positional URL scheme.
//!
//! Every platform endpoint is addressed as `/{segment}/.../{segment}`.
//! Some segments are optional (amount, locale) but keep their position:
//! an omitted segment is an empty string, so the path gets adjacent
//! separators such as `///pay/111111/payments/999`. The platform depends
//! on that, so segments are joined verbatim.

use std::collections::BTreeMap;

use secrecy::{ExposeSecret, SecretString};

/// Query parameters sent with a request.
pub type Params = BTreeMap<String, String>;

/// Name of the authentication parameter.
pub const KEY_PARAM: &str = "key";

/// HTTP verbs used by the platform API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// Read-only lookups.
    Get,
    /// Operations creating or changing a payment.
    Post,
}

impl Method {
    /// Returns the verb as it appears on the wire.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// Joins path segments into `/{segment}/.../{segment}`, keeping empty
/// segments as empty path components.
#[must_use]
pub fn build_path(segments: &[&str]) -> String {
    let capacity = segments.iter().map(|segment| segment.len() + 1).sum();
    segments
        .iter()
        .fold(String::with_capacity(capacity), |mut path, segment| {
            path.push('/');
            path.push_str(segment);
            path
        })
}

/// A request to the platform, before authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// HTTP verb.
    method: Method,
    /// Path below the base URL.
    path: String,
    /// Caller-supplied parameters.
    params: Params,
}

impl Request {
    /// Creates a request for the given verb and path segments.
    #[inline]
    #[must_use]
    pub fn new(method: Method, segments: &[&str]) -> Self {
        Self {
            method,
            path: build_path(segments),
            params: Params::new(),
        }
    }

    /// Shorthand for a `GET` request.
    #[inline]
    #[must_use]
    pub fn get(segments: &[&str]) -> Self {
        Self::new(Method::Get, segments)
    }

    /// Shorthand for a `POST` request.
    #[inline]
    #[must_use]
    pub fn post(segments: &[&str]) -> Self {
        Self::new(Method::Post, segments)
    }

    /// Adds parameters; later values replace earlier ones.
    #[inline]
    #[must_use]
    pub fn params(mut self, extra: Params) -> Self {
        self.params.extend(extra);
        self
    }

    /// Adds a single parameter.
    #[inline]
    #[must_use]
    pub fn param<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        let _previous = self.params.insert(key.into(), value.into());
        self
    }

    /// Returns the HTTP verb.
    #[inline]
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Returns the path below the base URL.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the caller-supplied parameters.
    #[inline]
    #[must_use]
    pub const fn caller_params(&self) -> &Params {
        &self.params
    }

    /// Returns the parameters to send: `key` first, then the caller's
    /// parameters, which override it on conflict.
    #[must_use]
    pub fn authenticated_params(&self, api_key: &SecretString) -> Params {
        let mut params = Params::new();
        let _previous = params.insert(KEY_PARAM.to_owned(), api_key.expose_secret().to_owned());
        params.extend(
            self.params
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_joins_segments() {
        assert_eq!(
            build_path(&["12.34.56.78", "pay", "111111", "locale_for_ip"]),
            "/12.34.56.78/pay/111111/locale_for_ip"
        );
    }

    #[test]
    fn path_keeps_empty_segments() {
        assert_eq!(
            build_path(&["", "nl-NL", "pay", "111111", "payments"]),
            "//nl-NL/pay/111111/payments"
        );
        assert_eq!(
            build_path(&["", "", "pay", "111111", "payments", "999"]),
            "///pay/111111/payments/999"
        );
        assert_eq!(build_path(&[]), "");
    }

    #[test]
    fn key_is_default_parameter() {
        let request = Request::get(&["", "pay", "111111", "list_locales"]);
        let params = request.authenticated_params(&SecretString::from("ABC".to_owned()));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get(KEY_PARAM).map(String::as_str), Some("ABC"));
    }

    #[test]
    fn caller_params_override_key() {
        let request = Request::post(&["x"])
            .param("verification_code", "1234")
            .param(KEY_PARAM, "override");
        let params = request.authenticated_params(&SecretString::from("ABC".to_owned()));
        assert_eq!(params.get(KEY_PARAM).map(String::as_str), Some("override"));
        assert_eq!(
            params.get("verification_code").map(String::as_str),
            Some("1234")
        );
    }

    #[test]
    fn method_names() {
        assert_eq!(Method::Get.as_str(), "GET");
        assert_eq!(Request::post(&["a"]).method(), Method::Post);
    }
}
