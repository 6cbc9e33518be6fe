//! Rust client library for the Zaypay payment platform.
//!
//! Zaypay lets merchants take micropayments by phone or SMS. A merchant
//! account on the platform is a *price setting*: an id plus an API key,
//! configured with a set of countries, languages and payment methods.
//!
//! This crate provides a typed [`PriceSetting`](price_setting::PriceSetting)
//! (and its blocking twin) covering the platform's operations: locale
//! lookup by IP address, locale and payment-method listing, payment
//! creation, status lookup, verification-code submission and delivery
//! acknowledgement. Responses arrive as XML and are handed back as
//! normalized [`serde_json::Value`] trees with `snake_case` keys.
//!
//! # Features
//!
//! - `async` (default): [`ZaypayClient`](client::ZaypayClient), a reqwest
//!   transport for [`PriceSetting`](price_setting::PriceSetting).
//! - `blocking`: `ZaypayBlockingClient`, a blocking reqwest transport for
//!   [`BlockingPriceSetting`](price_setting::BlockingPriceSetting).
//! - `credentials-file` (default): `FileCredentials`, a JSON credentials
//!   file in the user's config directory.

pub mod client;
pub mod credentials;
mod endpoints;
pub mod error;
pub mod locale;
pub mod models;
pub mod normalize;
pub mod price_setting;
pub mod request;
pub mod response;
pub mod transport;
pub mod xml;
