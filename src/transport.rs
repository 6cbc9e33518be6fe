//! Transport abstraction between the account object and the network.
//!
//! [`Transport`] (async) and [`BlockingTransport`] (blocking) expose
//! exactly two verbs. The reqwest-backed clients in [`crate::client`]
//! implement them; tests substitute in-memory fakes.

/// Status code and body of an HTTP response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl RawResponse {
    /// Creates a raw response.
    #[inline]
    #[must_use]
    pub fn new<B: Into<String>>(status: u16, body: B) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Generates a transport trait (async or blocking).
macro_rules! define_transport {
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: async_mode,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_transport!(@methods async_mode);
        }
    };
    (
        trait_name: $trait_name:ident,
        trait_doc: $trait_doc:expr,
        mode: blocking,
    ) => {
        #[doc = $trait_doc]
        pub trait $trait_name: core::fmt::Debug + Send + Sync {
            define_transport!(@methods blocking);
        }
    };

    (@methods $mode:ident) => {
        define_transport!(@method $mode, get,
            "Sends a `GET` request to `path` (relative to the base URL) with the\ngiven query parameters.\n\n# Errors\n\nReturns an error only if no response was received; non-200\nstatuses are returned as a [`RawResponse`].");
        define_transport!(@method $mode, post,
            "Sends a `POST` request to `path` (relative to the base URL) with the\ngiven query parameters.\n\n# Errors\n\nReturns an error only if no response was received; non-200\nstatuses are returned as a [`RawResponse`].");
    };

    (@method blocking, $name:ident, $doc:expr) => {
        #[doc = $doc]
        fn $name(&self, path: &str, params: &Params) -> Result<RawResponse>;
    };

    (@method async_mode, $name:ident, $doc:expr) => {
        #[doc = $doc]
        fn $name(&self, path: &str, params: &Params)
            -> impl core::future::Future<Output = Result<RawResponse>> + Send;
    };
}

mod async_transport {
    //! Async transport trait definition.

    use super::RawResponse;
    use crate::error::Result;
    use crate::request::Params;

    define_transport! {
        trait_name: Transport,
        trait_doc: "Async transport performing authenticated calls to the platform.",
        mode: async_mode,
    }
}

mod blocking_transport {
    //! Blocking transport trait definition.

    use super::RawResponse;
    use crate::error::Result;
    use crate::request::Params;

    define_transport! {
        trait_name: BlockingTransport,
        trait_doc: "Blocking transport performing authenticated calls to the platform.",
        mode: blocking,
    }
}

pub use async_transport::Transport;
pub use blocking_transport::BlockingTransport;
