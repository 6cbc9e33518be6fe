//! Payment creation options and the normalized payment result.

use core::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ids::{PayalogueId, PaymentId, PaymentMethodId};
use crate::error::{Result, ZaypayError};
use crate::request::Params;

/// Parameter carrying the dynamic price, in cents. Travels in the path.
const AMOUNT_PARAM: &str = "amount";

/// Parameter attaching a payalogue to the payment.
const PAYALOGUE_PARAM: &str = "payalogue_id";

/// Parameter naming the selected payment method.
const PAYMENT_METHOD_PARAM: &str = "payment_method_id";

/// Extra data for a `create_payment` call.
///
/// Besides the two options with special meaning on the platform, any
/// field added with [`field`](Self::field) is stored with the payment as
/// a custom variable for your own reference.
///
/// # Examples
///
/// ```
/// use zaypay_rs::models::{PayalogueId, PaymentOptions};
///
/// let options = PaymentOptions::new()
///     .amount(250)
///     .payalogue_id(PayalogueId::new(222_222))
///     .field("product_id", 23);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentOptions {
    /// Options and custom variables, keyed by parameter name.
    fields: Params,
}

impl PaymentOptions {
    /// Creates empty options.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables dynamic pricing with the given price in cents.
    #[inline]
    #[must_use]
    pub fn amount(self, cents: u64) -> Self {
        self.field(AMOUNT_PARAM, cents)
    }

    /// Attaches a payalogue; the platform then includes its URL in the
    /// payment's instructions.
    #[inline]
    #[must_use]
    pub fn payalogue_id(self, id: PayalogueId) -> Self {
        self.field(PAYALOGUE_PARAM, id)
    }

    /// Adds a custom variable.
    #[inline]
    #[must_use]
    pub fn field<K: Into<String>, V: Display>(mut self, key: K, value: V) -> Self {
        let _previous = self.fields.insert(key.into(), value.to_string());
        self
    }

    /// Splits the options into the path amount and the request parameters.
    ///
    /// The selected payment method is the default; fields given by the
    /// caller win on conflict. `amount` never reaches the parameters.
    pub(crate) fn into_request_parts(
        self,
        payment_method_id: PaymentMethodId,
    ) -> (Option<String>, Params) {
        let mut params = Params::new();
        let _previous = params.insert(
            PAYMENT_METHOD_PARAM.to_owned(),
            payment_method_id.to_string(),
        );
        params.extend(self.fields);
        let amount = params.remove(AMOUNT_PARAM);
        (amount, params)
    }
}

/// A payment as returned by the platform.
///
/// `payment` is the platform's payment record; `instructions` holds
/// whatever the platform sent alongside it (redirect or payalogue URLs,
/// messages to show the customer), and is absent when there was nothing
/// else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentResult {
    /// The payment record.
    pub payment: Map<String, Value>,
    /// Sibling data returned with the payment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<Map<String, Value>>,
}

impl PaymentResult {
    /// Shapes a clean response envelope into a payment result.
    pub(crate) fn from_response(mut data: Map<String, Value>) -> Result<Self> {
        let payment = match data.remove("payment") {
            Some(Value::Object(payment)) => payment,
            Some(other) => {
                return Err(ZaypayError::UnexpectedResponse(format!(
                    "payment is not a record: {other}"
                )));
            }
            None => {
                return Err(ZaypayError::UnexpectedResponse(
                    "response has no payment".to_owned(),
                ));
            }
        };
        let instructions = (!data.is_empty()).then_some(data);
        Ok(Self {
            payment,
            instructions,
        })
    }

    /// Returns the payment id, if the record carries a readable one.
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<PaymentId> {
        match self.payment.get("id")? {
            Value::Number(number) => number.as_u64().map(PaymentId::new),
            Value::String(raw) => raw.parse().ok(),
            Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
        }
    }

    /// Returns the payment status (e.g. `prepared`, `paid`).
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<&str> {
        self.payment.get("status").and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    /// Converts a JSON object literal into a map.
    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn request_parts_default_to_payment_method() {
        let (amount, params) = PaymentOptions::new()
            .field("product_id", 23)
            .into_request_parts(PaymentMethodId::new(2));
        assert_eq!(amount, None);
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("payment_method_id").map(String::as_str), Some("2"));
        assert_eq!(params.get("product_id").map(String::as_str), Some("23"));
    }

    #[test]
    fn request_parts_move_amount_to_path() {
        let (amount, params) = PaymentOptions::new()
            .amount(250)
            .payalogue_id(PayalogueId::new(222_222))
            .into_request_parts(PaymentMethodId::new(2));
        assert_eq!(amount.as_deref(), Some("250"));
        assert!(!params.contains_key("amount"));
        assert_eq!(
            params.get("payalogue_id").map(String::as_str),
            Some("222222")
        );
    }

    #[test]
    fn request_parts_let_caller_override_payment_method() {
        let (_, params) = PaymentOptions::new()
            .field("payment_method_id", 7)
            .into_request_parts(PaymentMethodId::new(2));
        assert_eq!(params.get("payment_method_id").map(String::as_str), Some("7"));
    }

    #[test]
    fn result_splits_payment_and_instructions() {
        let result = PaymentResult::from_response(map(json!({
            "payment": {"id": 999, "status": "prepared"},
            "payalogue_url": "https://secure.zaypay.com/pay/222222",
            "short_instructions": "SMS TXT to 1234"
        })))
        .unwrap();
        assert_eq!(result.id(), Some(PaymentId::new(999)));
        assert_eq!(result.status(), Some("prepared"));
        let instructions = result.instructions.unwrap();
        assert_eq!(instructions.len(), 2);
        assert!(instructions.contains_key("payalogue_url"));
    }

    #[test]
    fn result_omits_empty_instructions() {
        let result =
            PaymentResult::from_response(map(json!({"payment": {"id": "12"}}))).unwrap();
        assert_eq!(result.instructions, None);
        assert_eq!(result.id(), Some(PaymentId::new(12)));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, json!({"payment": {"id": "12"}}));
    }

    #[test]
    fn result_requires_payment_record() {
        let err = PaymentResult::from_response(map(json!({"other": 1}))).unwrap_err();
        assert!(matches!(err, ZaypayError::UnexpectedResponse(_)));
        let err = PaymentResult::from_response(map(json!({"payment": "x"}))).unwrap_err();
        assert!(matches!(err, ZaypayError::UnexpectedResponse(_)));
    }
}
