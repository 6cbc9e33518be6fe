//! The price setting: a merchant account on the platform and the
//! operations it offers.
//!
//! [`PriceSetting`] (async) and [`BlockingPriceSetting`] (blocking) are
//! generated from one macro and behave identically. Each combines a
//! transport with the account's credentials and the session state a
//! caller selects along the way (locale, payment method).
//!
//! ```no_run
//! # async fn run() -> zaypay_rs::error::Result<()> {
//! use zaypay_rs::client::ZaypayClient;
//! use zaypay_rs::models::{PaymentMethodId, PaymentOptions, PriceSettingId};
//! use zaypay_rs::price_setting::PriceSetting;
//!
//! let client = ZaypayClient::builder().build()?;
//! let mut price_setting = PriceSetting::new(client, PriceSettingId::new(111_111), "ABC")?;
//! let locale = price_setting.locale_for_ip("212.58.226.75").await?;
//! price_setting.set_locale(locale)?;
//! price_setting.set_payment_method_id(PaymentMethodId::new(2));
//! let payment = price_setting
//!     .create_payment(PaymentOptions::new().field("product_id", 23))
//!     .await?;
//! # assert!(payment.id().is_some());
//! # Ok(())
//! # }
//! ```

use secrecy::SecretString;
use serde_json::{Map, Value};

use crate::credentials::Credentials;
use crate::endpoints;
use crate::error::{Result, ZaypayError};
use crate::locale::Locale;
use crate::models::{ConfiguredCountry, Locales, PaymentMethodId, PaymentOptions, PriceSettingId};
use crate::request::Request;
use crate::response::{take_list, take_nested, take_str};

/// Identity and selections of a price setting, shared by both flavours.
#[derive(Debug)]
struct Session {
    /// Price setting id.
    id: PriceSettingId,
    /// API key sent with every request.
    api_key: SecretString,
    /// Locale used by payment-method listing and payment creation.
    locale: Option<Locale>,
    /// Payment method used by payment creation.
    payment_method_id: Option<PaymentMethodId>,
}

impl Session {
    /// Starts a session without selections.
    fn new(credentials: Credentials) -> Self {
        let (id, api_key) = credentials.into_parts();
        Self {
            id,
            api_key,
            locale: None,
            payment_method_id: None,
        }
    }

    /// Returns the selected locale or fails with [`ZaypayError::InvalidState`].
    fn require_locale(&self) -> Result<&Locale> {
        self.locale
            .as_ref()
            .ok_or(ZaypayError::InvalidState("locale was not set for your price setting"))
    }

    /// Returns the selected payment method or fails with
    /// [`ZaypayError::InvalidState`].
    fn require_payment_method(&self) -> Result<PaymentMethodId> {
        self.payment_method_id.ok_or(ZaypayError::InvalidState(
            "payment_method_id was not set for your price setting",
        ))
    }

    /// Builds the `create_payment` request once both selections are made.
    fn create_payment_request(&self, options: PaymentOptions) -> Result<Request> {
        let locale = self.require_locale()?;
        let payment_method_id = self.require_payment_method()?;
        Ok(endpoints::create_payment(
            self.id,
            locale,
            payment_method_id,
            options,
        ))
    }
}

/// Reads the locale the platform resolved for an IP address.
///
/// The platform answers `language-country`; the first part is the
/// language, the second the country.
fn shape_locale(mut data: Map<String, Value>) -> Result<Locale> {
    let raw = take_str(&mut data, "locale")?;
    raw.parse().map_err(|err| {
        ZaypayError::UnexpectedResponse(format!("platform returned locale {raw:?}: {err}"))
    })
}

/// Extracts countries (always a list) and languages (as sent).
fn shape_locales(mut data: Map<String, Value>) -> Result<Locales> {
    let countries = take_list(&mut data, "countries", "country")?;
    let languages = take_nested(&mut data, "languages", "language")?;
    Ok(Locales {
        countries,
        languages,
    })
}

/// Extracts the payment methods as a list.
fn shape_payment_methods(mut data: Map<String, Value>) -> Result<Vec<Value>> {
    take_list(&mut data, "payment_methods", "payment_method")
}

/// Finds the first configured country whose `code` is the locale's
/// country.
fn match_country(locale: Locale, countries: Vec<Value>) -> Option<ConfiguredCountry> {
    countries
        .into_iter()
        .find(|country| country.get("code").and_then(Value::as_str) == Some(locale.country()))
        .map(|country| ConfiguredCountry { country, locale })
}

/// Generates a price setting type (async or blocking).
macro_rules! define_price_setting {
    (
        name: $name:ident,
        builder_name: $builder:ident,
        transport_trait: $transport:ident,
        doc: $doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder<T: $transport> {
            /// Transport performing the calls.
            transport: Option<T>,
            /// Explicit price setting id.
            id: Option<PriceSettingId>,
            /// Explicit API key.
            api_key: Option<String>,
            /// Fallback used when id or key is missing.
            source: Option<Box<dyn CredentialSource>>,
            /// Initial locale selection.
            locale: Option<LocaleInput>,
            /// Initial payment method selection.
            payment_method_id: Option<PaymentMethodId>,
        }

        impl<T: $transport> $builder<T> {
            /// Sets the transport (required).
            #[inline]
            #[must_use]
            pub fn transport(mut self, transport: T) -> Self {
                self.transport = Some(transport);
                self
            }

            /// Sets the price setting id.
            #[inline]
            #[must_use]
            pub const fn id(mut self, id: PriceSettingId) -> Self {
                self.id = Some(id);
                self
            }

            /// Sets the API key.
            #[inline]
            #[must_use]
            pub fn api_key<K: Into<String>>(mut self, api_key: K) -> Self {
                self.api_key = Some(api_key.into());
                self
            }

            /// Sets the credential source consulted when id or key is missing.
            #[inline]
            #[must_use]
            pub fn credential_source<C: CredentialSource + 'static>(mut self, source: C) -> Self {
                self.source = Some(Box::new(source));
                self
            }

            /// Preselects a locale.
            #[inline]
            #[must_use]
            pub fn locale<L: Into<LocaleInput>>(mut self, locale: L) -> Self {
                self.locale = Some(locale.into());
                self
            }

            /// Preselects a payment method.
            #[inline]
            #[must_use]
            pub const fn payment_method_id(mut self, id: PaymentMethodId) -> Self {
                self.payment_method_id = Some(id);
                self
            }

            /// Builds the price setting.
            ///
            /// # Errors
            ///
            /// Returns [`ZaypayError::Config`] if no transport was set, or if
            /// id or key is missing and no credential source can supply them.
            /// Returns [`ZaypayError::InvalidLocale`] for a malformed locale.
            #[inline]
            pub fn build(self) -> Result<$name<T>> {
                let transport = self
                    .transport
                    .ok_or_else(|| ZaypayError::Config("transport is required".to_owned()))?;
                let credentials = match (self.id, self.api_key, self.source) {
                    (Some(id), Some(api_key), _) => Credentials::new(id, api_key)?,
                    (id, api_key, Some(source)) => credentials::resolve(id, api_key, source.as_ref())?,
                    (_, _, None) => {
                        return Err(ZaypayError::Config(
                            "you did not provide a price setting id and API key, nor a \
                             credential source to look them up"
                                .to_owned(),
                        ));
                    }
                };
                let mut price_setting = $name::with_credentials(transport, credentials);
                if let Some(locale) = self.locale {
                    price_setting.set_locale(locale)?;
                }
                if let Some(id) = self.payment_method_id {
                    price_setting.set_payment_method_id(id);
                }
                Ok(price_setting)
            }
        }

        #[doc = $doc]
        #[derive(Debug)]
        pub struct $name<T: $transport> {
            /// Transport performing the calls.
            transport: T,
            /// Identity and selections.
            session: Session,
        }

        impl<T: $transport> $name<T> {
            /// Creates a new builder for configuring the price setting.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder<T> {
                $builder {
                    transport: None,
                    id: None,
                    api_key: None,
                    source: None,
                    locale: None,
                    payment_method_id: None,
                }
            }

            /// Creates a price setting from its id and API key.
            ///
            /// # Errors
            ///
            /// Returns [`ZaypayError::Config`] if the API key is blank.
            #[inline]
            pub fn new<K: Into<String>>(transport: T, id: PriceSettingId, api_key: K) -> Result<Self> {
                Ok(Self::with_credentials(transport, Credentials::new(id, api_key)?))
            }

            /// Creates a price setting from resolved credentials.
            #[inline]
            #[must_use]
            pub fn with_credentials(transport: T, credentials: Credentials) -> Self {
                Self {
                    transport,
                    session: Session::new(credentials),
                }
            }

            /// Creates a price setting, looking up whatever of id and key is
            /// missing in `source`.
            ///
            /// With both given, `source` is not consulted. Otherwise the key
            /// is the one `source` holds for `id`, or for its default entry
            /// when `id` is missing too.
            ///
            /// # Errors
            ///
            /// Returns [`ZaypayError::Config`] if no complete id/key pair can
            /// be found, or the error `source` fails with.
            #[inline]
            pub fn from_source<C: CredentialSource + ?Sized>(
                transport: T,
                id: Option<PriceSettingId>,
                api_key: Option<String>,
                source: &C,
            ) -> Result<Self> {
                let credentials = credentials::resolve(id, api_key, source)?;
                Ok(Self::with_credentials(transport, credentials))
            }

            /// Returns the price setting id.
            #[inline]
            #[must_use]
            pub const fn id(&self) -> PriceSettingId {
                self.session.id
            }

            /// Returns the API key.
            #[inline]
            #[must_use]
            pub const fn api_key(&self) -> &SecretString {
                &self.session.api_key
            }

            /// Returns the transport.
            #[inline]
            #[must_use]
            pub const fn transport(&self) -> &T {
                &self.transport
            }

            /// Returns the selected locale.
            #[inline]
            #[must_use]
            pub const fn locale(&self) -> Option<&Locale> {
                self.session.locale.as_ref()
            }

            /// Selects the locale, given as `"language-country"` or as a
            /// [`Locale`].
            ///
            /// # Errors
            ///
            /// Returns [`ZaypayError::InvalidLocale`] if a string is not in
            /// `language-country` form; the previous selection is kept.
            #[inline]
            pub fn set_locale<L: Into<LocaleInput>>(&mut self, locale: L) -> Result<()> {
                self.session.locale = Some(locale.into().resolve()?);
                Ok(())
            }

            /// Clears the locale selection.
            #[inline]
            pub fn clear_locale(&mut self) {
                self.session.locale = None;
            }

            /// Returns the selected payment method.
            #[inline]
            #[must_use]
            pub const fn payment_method_id(&self) -> Option<PaymentMethodId> {
                self.session.payment_method_id
            }

            /// Selects the payment method used by `create_payment`.
            #[inline]
            pub const fn set_payment_method_id(&mut self, id: PaymentMethodId) {
                self.session.payment_method_id = Some(id);
            }

            /// Clears the payment method selection.
            #[inline]
            pub const fn clear_payment_method_id(&mut self) {
                self.session.payment_method_id = None;
            }

            /// Resolves the default locale for an IP address, e.g. to
            /// preselect language and country for a visitor.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails, the platform reports an
            /// error, or the response carries no usable `locale`.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn locale_for_ip(&self, ip: &str) -> Result<Locale> {
                let request = endpoints::locale_for_ip(self.session.id, ip);
                let data = self.call(request) $( .$await_ext )? ?;
                shape_locale(data)
            }

            /// Like [`locale_for_ip`](Self::locale_for_ip), but returns the
            /// locale as a `"language-country"` string such as `"en-GB"`.
            ///
            /// # Errors
            ///
            /// Same as [`locale_for_ip`](Self::locale_for_ip).
            #[inline]
            pub $($async_kw)? fn locale_string_for_ip(&self, ip: &str) -> Result<String> {
                let locale = self.locale_for_ip(ip) $( .$await_ext )? ?;
                Ok(locale.to_string())
            }

            /// Returns the countries and languages configured for this price
            /// setting. `amount` (in cents) selects dynamic pricing.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the platform reports
            /// an error.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_locales(&self, amount: Option<u64>) -> Result<Locales> {
                let request = endpoints::list_locales(self.session.id, amount);
                let data = self.call(request) $( .$await_ext )? ?;
                shape_locales(data)
            }

            /// Returns the configured countries, each a record with `code`
            /// and `name`. Always a list, even for a single country.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the platform reports
            /// an error.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_countries(&self, amount: Option<u64>) -> Result<Vec<Value>> {
                let request = endpoints::list_locales(self.session.id, amount);
                let mut data = self.call(request) $( .$await_ext )? ?;
                take_list(&mut data, "countries", "country")
            }

            /// Returns the configured languages (`code`, `english_name`,
            /// `native_name`) as the platform sent them.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the platform reports
            /// an error.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_languages(&self, amount: Option<u64>) -> Result<Value> {
                let request = endpoints::list_locales(self.session.id, amount);
                let mut data = self.call(request) $( .$await_ext )? ?;
                take_nested(&mut data, "languages", "language")
            }

            /// Returns the payment methods available for the selected locale.
            ///
            /// # Errors
            ///
            /// Returns [`ZaypayError::InvalidState`] if no locale is selected,
            /// or an error if the request fails or the platform reports one.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn list_payment_methods(&self, amount: Option<u64>) -> Result<Vec<Value>> {
                let locale = self.session.require_locale()?;
                let request = endpoints::payment_methods(self.session.id, locale, amount);
                let data = self.call(request) $( .$await_ext )? ?;
                shape_payment_methods(data)
            }

            /// Creates a payment for the selected locale and payment method.
            ///
            /// See [`PaymentOptions`] for dynamic amounts, payalogues and
            /// custom variables.
            ///
            /// # Errors
            ///
            /// Returns [`ZaypayError::InvalidState`] if locale or payment
            /// method is not selected, or an error if the request fails or
            /// the platform reports one.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn create_payment(&self, options: PaymentOptions) -> Result<PaymentResult> {
                let request = self.session.create_payment_request(options)?;
                let data = self.call(request) $( .$await_ext )? ?;
                PaymentResult::from_response(data)
            }

            /// Returns a payment.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the platform reports
            /// an error.
            #[tracing::instrument(skip_all, fields(payment_id = %payment_id))]
            pub $($async_kw)? fn show_payment(&self, payment_id: PaymentId) -> Result<PaymentResult> {
                let request = endpoints::show_payment(self.session.id, payment_id);
                let data = self.call(request) $( .$await_ext )? ?;
                PaymentResult::from_response(data)
            }

            /// Submits the verification code the customer received (e.g. by
            /// SMS) to complete a payment.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the platform reports
            /// an error.
            #[tracing::instrument(skip_all, fields(payment_id = %payment_id))]
            pub $($async_kw)? fn submit_verification_code(
                &self,
                payment_id: PaymentId,
                code: &str,
            ) -> Result<PaymentResult> {
                let request = endpoints::verification_code(self.session.id, payment_id, code);
                let data = self.call(request) $( .$await_ext )? ?;
                PaymentResult::from_response(data)
            }

            /// Tells the platform the purchased goods were delivered.
            ///
            /// # Errors
            ///
            /// Returns an error if the request fails or the platform reports
            /// an error.
            #[tracing::instrument(skip_all, fields(payment_id = %payment_id))]
            pub $($async_kw)? fn mark_payload_provided(&self, payment_id: PaymentId) -> Result<PaymentResult> {
                let request = endpoints::mark_payload_provided(self.session.id, payment_id);
                let data = self.call(request) $( .$await_ext )? ?;
                PaymentResult::from_response(data)
            }

            /// Checks whether the country of an IP address is configured for
            /// this price setting.
            ///
            /// Returns the configured country record together with the
            /// resolved locale, or `None` if the country is not configured.
            ///
            /// # Errors
            ///
            /// Returns an error if either underlying request fails.
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn country_configured_for_ip(
                &self,
                ip: &str,
                amount: Option<u64>,
            ) -> Result<Option<ConfiguredCountry>> {
                let locale = self.locale_for_ip(ip) $( .$await_ext )? ?;
                let countries = self.list_countries(amount) $( .$await_ext )? ?;
                let configured = match_country(locale, countries);
                tracing::debug!(configured = configured.is_some(), "matched IP country");
                Ok(configured)
            }

            /// Authenticates `request`, sends it, and interprets the response.
            $($async_kw)? fn call(&self, request: Request) -> Result<Map<String, Value>> {
                let params = request.authenticated_params(&self.session.api_key);
                tracing::debug!(
                    method = request.method().as_str(),
                    path = request.path(),
                    "calling platform"
                );
                let raw = match request.method() {
                    Method::Get => self.transport.get(request.path(), &params) $( .$await_ext )? ?,
                    Method::Post => self.transport.post(request.path(), &params) $( .$await_ext )? ?,
                };
                response::interpret(raw)
            }
        }
    };
}

mod async_price_setting {
    //! Async price setting.

    use secrecy::SecretString;
    use serde_json::{Map, Value};

    use super::{Session, match_country, shape_locale, shape_locales, shape_payment_methods};
    use crate::credentials::{self, CredentialSource, Credentials};
    use crate::endpoints;
    use crate::error::{Result, ZaypayError};
    use crate::locale::{Locale, LocaleInput};
    use crate::models::{
        ConfiguredCountry, Locales, PaymentId, PaymentMethodId, PaymentOptions, PaymentResult,
        PriceSettingId,
    };
    use crate::request::{Method, Request};
    use crate::response::{self, take_list, take_nested};
    use crate::transport::Transport;

    define_price_setting! {
        name: PriceSetting,
        builder_name: PriceSettingBuilder,
        transport_trait: Transport,
        doc: "Async price setting.\n\nUse [`PriceSetting::new`] or [`PriceSetting::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`PriceSetting`].",
        async_kw: async,
        await_kw: await,
    }
}

mod blocking_price_setting {
    //! Blocking (synchronous) price setting.

    use secrecy::SecretString;
    use serde_json::{Map, Value};

    use super::{Session, match_country, shape_locale, shape_locales, shape_payment_methods};
    use crate::credentials::{self, CredentialSource, Credentials};
    use crate::endpoints;
    use crate::error::{Result, ZaypayError};
    use crate::locale::{Locale, LocaleInput};
    use crate::models::{
        ConfiguredCountry, Locales, PaymentId, PaymentMethodId, PaymentOptions, PaymentResult,
        PriceSettingId,
    };
    use crate::request::{Method, Request};
    use crate::response::{self, take_list, take_nested};
    use crate::transport::BlockingTransport;

    define_price_setting! {
        name: BlockingPriceSetting,
        builder_name: BlockingPriceSettingBuilder,
        transport_trait: BlockingTransport,
        doc: "Blocking (synchronous) price setting.\n\nUse [`BlockingPriceSetting::new`] or [`BlockingPriceSetting::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`BlockingPriceSetting`].",
    }
}

pub use async_price_setting::{PriceSetting, PriceSettingBuilder};
pub use blocking_price_setting::{BlockingPriceSetting, BlockingPriceSettingBuilder};

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use secrecy::ExposeSecret;
    use serde_json::json;

    use super::*;
    use crate::credentials::InMemoryCredentials;
    use crate::models::{PaymentId, PaymentResult};
    use crate::request::{Method, Params};
    use crate::transport::{BlockingTransport, RawResponse, Transport};

    /// Price setting used throughout.
    const ID: PriceSettingId = PriceSettingId::new(111_111);

    /// Answer to `locale_for_ip`.
    const LOCALE_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <locale>nl-NL</locale>
</response>"#;

    /// Answer to `list_locales` with two countries and two languages.
    const LOCALES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<response>
  <countries>
    <country><code>NL</code><name>Netherlands</name></country>
    <country><code>BE</code><name>Belgium</name></country>
  </countries>
  <languages>
    <language><code>nl</code><english-name>Dutch</english-name><native-name>Nederlands</native-name></language>
    <language><code>en</code><english-name>English</english-name><native-name>English</native-name></language>
  </languages>
</response>"#;

    /// Answer to `list_locales` with a single country.
    const SINGLE_COUNTRY_XML: &str = r#"<response>
  <countries>
    <country><code>BE</code><name>Belgium</name></country>
  </countries>
  <languages>
    <language><code>nl</code><english-name>Dutch</english-name><native-name>Nederlands</native-name></language>
  </languages>
</response>"#;

    /// Answer to `payments/new` with one method.
    const PAYMENT_METHODS_XML: &str = r#"<response>
  <payment-methods>
    <payment-method>
      <payment-method-id type="integer">2</payment-method-id>
      <name>sms</name>
      <charged-amount type="decimal">0.8</charged-amount>
    </payment-method>
  </payment-methods>
</response>"#;

    /// Answer describing a payment with instructions.
    const PAYMENT_XML: &str = r#"<response>
  <payment>
    <id type="integer">999999999</id>
    <status>prepared</status>
    <total-amount type="decimal">0.8</total-amount>
  </payment>
  <short-instructions>SMS the text ZAYPAY to 7777</short-instructions>
  <status>success</status>
</response>"#;

    /// Answer reporting an application-level error.
    const ERROR_XML: &str = r#"<response>
  <status>error</status>
  <error>Unknown payment</error>
</response>"#;

    /// A recorded transport call.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Call {
        /// HTTP verb.
        method: Method,
        /// Path below the base URL.
        path: String,
        /// Parameters, including the key.
        params: Params,
    }

    /// Transport replaying canned responses and recording every call.
    #[derive(Debug, Default)]
    struct MockTransport {
        /// Responses served in order.
        responses: Mutex<VecDeque<RawResponse>>,
        /// Calls received so far.
        calls: Mutex<Vec<Call>>,
    }

    impl MockTransport {
        /// Serves the given bodies with status 200.
        fn replying(bodies: &[&str]) -> Self {
            Self::with_responses(bodies.iter().map(|body| RawResponse::new(200, *body)))
        }

        /// Serves the given responses.
        fn with_responses<I: IntoIterator<Item = RawResponse>>(responses: I) -> Self {
            Self {
                responses: Mutex::new(responses.into_iter().collect()),
                calls: Mutex::new(Vec::new()),
            }
        }

        /// Returns the calls received so far.
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        /// Records a call and pops the next canned response.
        fn record(&self, method: Method, path: &str, params: &Params) -> RawResponse {
            self.calls.lock().unwrap().push(Call {
                method,
                path: path.to_owned(),
                params: params.clone(),
            });
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| RawResponse::new(500, "no canned response"))
        }
    }

    impl BlockingTransport for MockTransport {
        fn get(&self, path: &str, params: &Params) -> Result<RawResponse> {
            Ok(self.record(Method::Get, path, params))
        }

        fn post(&self, path: &str, params: &Params) -> Result<RawResponse> {
            Ok(self.record(Method::Post, path, params))
        }
    }

    impl Transport for MockTransport {
        fn get(
            &self,
            path: &str,
            params: &Params,
        ) -> impl Future<Output = Result<RawResponse>> + Send {
            core::future::ready(Ok(self.record(Method::Get, path, params)))
        }

        fn post(
            &self,
            path: &str,
            params: &Params,
        ) -> impl Future<Output = Result<RawResponse>> + Send {
            core::future::ready(Ok(self.record(Method::Post, path, params)))
        }
    }

    /// Blocking price setting 111111/ABC over canned bodies.
    fn blocking(bodies: &[&str]) -> BlockingPriceSetting<MockTransport> {
        BlockingPriceSetting::new(MockTransport::replying(bodies), ID, "ABC").unwrap()
    }

    /// Parameters as `(key, value)` pairs.
    fn pairs(params: &Params) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }

    #[test]
    fn locale_for_ip_splits_language_and_country() {
        let price_setting = blocking(&[LOCALE_XML]);
        let locale = price_setting.locale_for_ip("12.34.56.78").unwrap();
        assert_eq!(locale.language(), "nl");
        assert_eq!(locale.country(), "NL");

        let calls = price_setting.transport().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].method, Method::Get);
        assert_eq!(calls[0].path, "/12.34.56.78/pay/111111/locale_for_ip");
        assert_eq!(pairs(&calls[0].params), vec![("key", "ABC")]);
    }

    #[test]
    fn locale_string_for_ip_joins_with_dash() {
        let price_setting = blocking(&[LOCALE_XML]);
        assert_eq!(price_setting.locale_string_for_ip("1.2.3.4").unwrap(), "nl-NL");
    }

    #[test]
    fn list_locales_returns_countries_and_languages() {
        let price_setting = blocking(&[LOCALES_XML]);
        let locales = price_setting.list_locales(Some(10)).unwrap();
        assert_eq!(locales.countries.len(), 2);
        assert_eq!(locales.countries[0]["code"], "NL");
        assert_eq!(locales.languages[1]["english_name"], "English");
        assert_eq!(
            price_setting.transport().calls()[0].path,
            "/10/pay/111111/list_locales"
        );
    }

    #[test]
    fn single_country_is_still_a_list() {
        let price_setting = blocking(&[SINGLE_COUNTRY_XML]);
        let countries = price_setting.list_countries(None).unwrap();
        assert_eq!(countries, vec![json!({"code": "BE", "name": "Belgium"})]);
        assert_eq!(
            price_setting.transport().calls()[0].path,
            "//pay/111111/list_locales"
        );
    }

    #[test]
    fn list_languages_returns_raw_language_entries() {
        let price_setting = blocking(&[SINGLE_COUNTRY_XML]);
        let languages = price_setting.list_languages(None).unwrap();
        assert_eq!(
            languages,
            json!({"code": "nl", "english_name": "Dutch", "native_name": "Nederlands"})
        );
    }

    #[test]
    fn list_payment_methods_requires_locale() {
        let price_setting = blocking(&[PAYMENT_METHODS_XML]);
        let err = price_setting.list_payment_methods(None).unwrap_err();
        assert!(matches!(err, ZaypayError::InvalidState(_)));
        assert!(price_setting.transport().calls().is_empty());
    }

    #[test]
    fn list_payment_methods_uses_locale_and_types_values() {
        let mut price_setting = blocking(&[PAYMENT_METHODS_XML]);
        price_setting.set_locale("nl-NL").unwrap();
        let methods = price_setting.list_payment_methods(None).unwrap();
        assert_eq!(methods.len(), 1);
        assert_eq!(methods[0]["payment_method_id"], 2);
        assert_eq!(methods[0]["charged_amount"], 0.8);
        assert_eq!(
            price_setting.transport().calls()[0].path,
            "//nl-NL/pay/111111/payments/new"
        );
    }

    #[test]
    fn create_payment_sends_method_and_custom_fields() {
        let mut price_setting = blocking(&[PAYMENT_XML]);
        price_setting.set_locale("nl-NL").unwrap();
        price_setting.set_payment_method_id(PaymentMethodId::new(2));
        let result = price_setting
            .create_payment(PaymentOptions::new().field("product_id", 23))
            .unwrap();

        let calls = price_setting.transport().calls();
        assert_eq!(calls[0].method, Method::Post);
        assert_eq!(calls[0].path, "//nl-NL/pay/111111/payments");
        assert_eq!(
            pairs(&calls[0].params),
            vec![
                ("key", "ABC"),
                ("payment_method_id", "2"),
                ("product_id", "23")
            ]
        );
        assert_eq!(result.id(), Some(PaymentId::new(999_999_999)));
        assert_eq!(result.status(), Some("prepared"));
        let instructions = result.instructions.unwrap();
        assert_eq!(
            instructions["short_instructions"],
            "SMS the text ZAYPAY to 7777"
        );
        assert!(!instructions.contains_key("status"));
    }

    #[test]
    fn create_payment_checks_locale_before_payment_method() {
        let mut price_setting = blocking(&[PAYMENT_XML]);
        let err = price_setting
            .create_payment(PaymentOptions::new())
            .unwrap_err();
        assert!(matches!(err, ZaypayError::InvalidState(message) if message.contains("locale")));

        price_setting.set_locale("nl-NL").unwrap();
        let err = price_setting
            .create_payment(PaymentOptions::new())
            .unwrap_err();
        assert!(
            matches!(err, ZaypayError::InvalidState(message) if message.contains("payment_method_id"))
        );
        assert!(price_setting.transport().calls().is_empty());
    }

    #[test]
    fn payment_scoped_operations_hit_expected_paths() {
        let price_setting = blocking(&[PAYMENT_XML, PAYMENT_XML, PAYMENT_XML]);
        let payment = PaymentId::new(999_999_999);
        let shown: PaymentResult = price_setting.show_payment(payment).unwrap();
        assert_eq!(shown.id(), Some(payment));
        let _verified = price_setting
            .submit_verification_code(payment, "1234")
            .unwrap();
        let _provided = price_setting.mark_payload_provided(payment).unwrap();

        let calls = price_setting.transport().calls();
        assert_eq!(calls[0].method, Method::Get);
        assert_eq!(calls[0].path, "///pay/111111/payments/999999999");
        assert_eq!(calls[1].method, Method::Post);
        assert_eq!(
            calls[1].path,
            "///pay/111111/payments/999999999/verification_code"
        );
        assert_eq!(
            pairs(&calls[1].params),
            vec![("key", "ABC"), ("verification_code", "1234")]
        );
        assert_eq!(calls[2].method, Method::Post);
        assert_eq!(
            calls[2].path,
            "///pay/111111/payments/999999999/mark_payload_provided"
        );
    }

    #[test]
    fn platform_error_surfaces_as_api_error() {
        let price_setting = blocking(&[ERROR_XML]);
        let err = price_setting
            .show_payment(PaymentId::new(1))
            .unwrap_err();
        match err {
            ZaypayError::Api { message } => assert_eq!(message, "Unknown payment"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_200_surfaces_as_http_error() {
        let transport = MockTransport::with_responses([RawResponse::new(503, "down")]);
        let price_setting = BlockingPriceSetting::new(transport, ID, "ABC").unwrap();
        let err = price_setting.list_locales(None).unwrap_err();
        assert!(matches!(err, ZaypayError::Http { status: 503, .. }));
    }

    #[test]
    fn country_configured_for_ip_matches_code() {
        let price_setting = blocking(&[LOCALE_XML, LOCALES_XML]);
        let configured = price_setting
            .country_configured_for_ip("12.34.56.78", None)
            .unwrap()
            .unwrap();
        assert_eq!(configured.country["name"], "Netherlands");
        assert_eq!(configured.locale.to_string(), "nl-NL");
    }

    #[test]
    fn country_not_configured_for_ip_is_none() {
        let price_setting = blocking(&[LOCALE_XML, SINGLE_COUNTRY_XML]);
        assert!(price_setting
            .country_configured_for_ip("12.34.56.78", None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn invalid_locale_keeps_previous_selection() {
        let mut price_setting = blocking(&[]);
        price_setting.set_locale(Locale::new("en", "GB").unwrap()).unwrap();
        let err = price_setting.set_locale("english").unwrap_err();
        assert!(matches!(err, ZaypayError::InvalidLocale(_)));
        assert_eq!(price_setting.locale().map(ToString::to_string).as_deref(), Some("en-GB"));
        price_setting.clear_locale();
        assert!(price_setting.locale().is_none());
    }

    #[test]
    fn from_source_uses_default_entry() {
        let source = InMemoryCredentials::new()
            .with_default(PriceSettingId::new(222_222))
            .with_key(PriceSettingId::new(222_222), "DEF");
        let price_setting =
            BlockingPriceSetting::from_source(MockTransport::default(), None, None, &source)
                .unwrap();
        assert_eq!(price_setting.id(), PriceSettingId::new(222_222));
        assert_eq!(price_setting.api_key().expose_secret(), "DEF");
    }

    #[test]
    fn builder_applies_selections() {
        let price_setting = BlockingPriceSetting::builder()
            .transport(MockTransport::default())
            .id(ID)
            .api_key("ABC")
            .locale("nl-NL")
            .payment_method_id(PaymentMethodId::new(2))
            .build()
            .unwrap();
        assert_eq!(price_setting.locale().map(Locale::country), Some("NL"));
        assert_eq!(price_setting.payment_method_id(), Some(PaymentMethodId::new(2)));
    }

    #[test]
    fn builder_falls_back_to_credential_source() {
        let price_setting = BlockingPriceSetting::builder()
            .transport(MockTransport::default())
            .id(ID)
            .credential_source(InMemoryCredentials::new().with_key(ID, "FROM-SOURCE"))
            .build()
            .unwrap();
        assert_eq!(price_setting.api_key().expose_secret(), "FROM-SOURCE");
    }

    #[test]
    fn builder_without_credentials_is_config_error() {
        let err = BlockingPriceSetting::builder()
            .transport(MockTransport::default())
            .id(ID)
            .build()
            .unwrap_err();
        assert!(matches!(err, ZaypayError::Config(_)));

        let err = BlockingPriceSetting::<MockTransport>::builder()
            .id(ID)
            .api_key("ABC")
            .build()
            .unwrap_err();
        assert!(matches!(err, ZaypayError::Config(_)));
    }

    #[tokio::test]
    async fn async_create_payment_matches_blocking_behaviour() {
        let transport = MockTransport::replying(&[LOCALE_XML, PAYMENT_XML]);
        let mut price_setting = PriceSetting::new(transport, ID, "ABC").unwrap();
        let locale = price_setting.locale_for_ip("12.34.56.78").await.unwrap();
        price_setting.set_locale(locale).unwrap();
        price_setting.set_payment_method_id(PaymentMethodId::new(2));
        let result = price_setting
            .create_payment(PaymentOptions::new().field("product_id", 23))
            .await
            .unwrap();
        assert_eq!(result.status(), Some("prepared"));

        let calls = price_setting.transport().calls();
        assert_eq!(calls[1].path, "//nl-NL/pay/111111/payments");
        assert_eq!(
            pairs(&calls[1].params),
            vec![
                ("key", "ABC"),
                ("payment_method_id", "2"),
                ("product_id", "23")
            ]
        );
    }

    #[tokio::test]
    async fn async_missing_locale_is_invalid_state() {
        let price_setting = PriceSetting::new(MockTransport::default(), ID, "ABC").unwrap();
        let err = price_setting.list_payment_methods(Some(10)).await.unwrap_err();
        assert!(matches!(err, ZaypayError::InvalidState(_)));
    }
}
