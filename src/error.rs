//! Error types for the Zaypay client library.

/// Broad category of a [`ZaypayError`], telling the caller where to look
/// for the fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The calling code used the API incorrectly (missing session state,
    /// malformed locale).
    Usage,
    /// Credentials or other configuration are missing or invalid.
    Configuration,
    /// The network, the HTTP layer, or the platform itself failed.
    Remote,
}

/// All errors that can occur when using the Zaypay client.
#[derive(Debug, thiserror::Error)]
pub enum ZaypayError {
    /// Price setting id or API key is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// The credential source could not be read.
    #[error("credential source error: {0}")]
    CredentialSource(Box<dyn core::error::Error + Send + Sync>),

    /// An operation was called before the session state it needs was set.
    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    /// A locale string or pair could not be parsed or serialized.
    #[error("invalid locale: {0}")]
    InvalidLocale(String),

    /// The platform answered with a non-200 HTTP status.
    #[error("HTTP request to zaypay yielded status {status}: {body}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The platform reported an application-level error (`status` = `error`).
    #[error("zaypay reported an error: {message}")]
    Api {
        /// Error detail provided by the platform.
        message: String,
    },

    /// The HTTP transport failed before a response was received.
    #[cfg(any(feature = "async", feature = "blocking"))]
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body is not well-formed XML.
    #[error("XML decoding error: {0}")]
    Xml(String),

    /// A field the operation depends on is missing from the response.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The credentials file is not valid JSON.
    #[error("credentials file is not valid JSON: {0}")]
    CredentialsFormat(#[source] serde_json::Error),
}

impl ZaypayError {
    /// Returns the broad category of this error.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            Self::InvalidState(_) | Self::InvalidLocale(_) => ErrorKind::Usage,
            Self::Config(_) | Self::CredentialSource(_) | Self::CredentialsFormat(_) => {
                ErrorKind::Configuration
            }
            #[cfg(any(feature = "async", feature = "blocking"))]
            Self::Transport(_) => ErrorKind::Remote,
            Self::Http { .. } | Self::Api { .. } | Self::Xml(_) | Self::UnexpectedResponse(_) => {
                ErrorKind::Remote
            }
        }
    }
}

/// Convenience alias for results returned by this crate.
pub type Result<T> = core::result::Result<T, ZaypayError>;
