//! HTTP clients for the Zaypay API.
//!
//! Provides both async and blocking client variants behind feature flags.
//! Both only move bytes: they attach the `Accept` header and the query
//! parameters, and hand back the status and body untouched.

/// Base URL for the Zaypay API.
pub const DEFAULT_BASE_URL: &str = "https://secure.zaypay.com";

/// Media type the platform is asked to answer in.
const XML_MEDIA_TYPE: &str = "application/xml";

/// Generates a Zaypay HTTP client (async or blocking) with builder,
/// transport implementation, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        transport_trait: $transport:ident,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Base URL override (for testing).
            base_url: Option<String>,
        }

        impl $builder {
            /// Overrides the base URL (useful for testing with a mock server).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`ZaypayError::Transport`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let base_url = self
                    .base_url
                    .map(|url| url.trim_end_matches('/').to_owned())
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
                tracing::debug!(base_url = %base_url, "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client { http, base_url })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// API base URL, without a trailing slash.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder { base_url: None }
            }

            /// Returns the base URL requests are sent to.
            #[inline]
            #[must_use]
            pub fn base_url(&self) -> &str {
                &self.base_url
            }

            /// Sends a request and collects the status and body.
            #[tracing::instrument(skip_all, fields(method = method.as_str(), path = %path))]
            $($async_kw)? fn send(
                &self,
                method: Method,
                path: &str,
                params: &Params,
            ) -> Result<RawResponse> {
                let url = format!("{}{path}", self.base_url);
                tracing::trace!(url = %url, "sending request");
                let request = match method {
                    Method::Get => self.http.get(&url),
                    Method::Post => self.http.post(&url),
                };
                let response: $resp_type = request
                    .header(ACCEPT, XML_MEDIA_TYPE)
                    .query(params)
                    .send()
                    $( .$await_ext )?
                    ?;

                let status = response.status().as_u16();
                tracing::debug!(status, "received response");
                let body = response.text() $( .$await_ext )? ?;
                tracing::trace!(body_len = body.len(), "read response body");
                Ok(RawResponse { status, body })
            }
        }

        impl $transport for $client {
            #[inline]
            $($async_kw)? fn get(&self, path: &str, params: &Params) -> Result<RawResponse> {
                self.send(Method::Get, path, params) $( .$await_ext )?
            }

            #[inline]
            $($async_kw)? fn post(&self, path: &str, params: &Params) -> Result<RawResponse> {
                self.send(Method::Post, path, params) $( .$await_ext )?
            }
        }

    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the Zaypay API.

    use reqwest::header::ACCEPT;

    use super::{DEFAULT_BASE_URL, XML_MEDIA_TYPE};
    use crate::error::Result;
    #[cfg(doc)]
    use crate::error::ZaypayError;
    use crate::request::{Method, Params};
    use crate::transport::{RawResponse, Transport};

    define_client! {
        client_name: ZaypayClient,
        builder_name: ZaypayClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        transport_trait: Transport,
        client_doc: "Async client for the Zaypay API.\n\nUse [`ZaypayClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`ZaypayClient`].",
        async_kw: async,
        await_kw: await,
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the Zaypay API.

    use reqwest::header::ACCEPT;

    use super::{DEFAULT_BASE_URL, XML_MEDIA_TYPE};
    use crate::error::Result;
    #[cfg(doc)]
    use crate::error::ZaypayError;
    use crate::request::{Method, Params};
    use crate::transport::{BlockingTransport, RawResponse};

    define_client! {
        client_name: ZaypayBlockingClient,
        builder_name: ZaypayBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        transport_trait: BlockingTransport,
        client_doc: "Blocking (synchronous) client for the Zaypay API.\n\nUse [`ZaypayBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`ZaypayBlockingClient`].",
    }
}

#[cfg(feature = "async")]
pub use async_client::{ZaypayClient, ZaypayClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{ZaypayBlockingClient, ZaypayBlockingClientBuilder};
