//! Data models for Zaypay API entities.
//!
//! Identifiers are strongly typed; the records the platform owns
//! (payments, countries, payment methods) stay normalized [`serde_json`]
//! trees so that fields added on the platform pass through untouched.

mod ids;
mod locales;
mod payment;

pub use ids::{PayalogueId, PaymentId, PaymentMethodId, PriceSettingId};
pub use locales::{ConfiguredCountry, Locales};
pub use payment::{PaymentOptions, PaymentResult};
