//! Platform endpoints: path segments, verb and parameters per operation.

use crate::locale::Locale;
use crate::models::{PaymentId, PaymentOptions, PaymentMethodId, PriceSettingId};
use crate::request::Request;

/// Literal segment preceding the price setting id.
const PAY: &str = "pay";

/// Locale lookup by IP address.
const LOCALE_FOR_IP: &str = "locale_for_ip";

/// Countries and languages of a price setting.
const LIST_LOCALES: &str = "list_locales";

/// Payment collection.
const PAYMENTS: &str = "payments";

/// Payment methods available for a locale.
const NEW_PAYMENT: &str = "payments/new";

/// Verification code submission for a payment.
const VERIFICATION_CODE: &str = "verification_code";

/// Delivery acknowledgement for a payment.
const MARK_PAYLOAD_PROVIDED: &str = "mark_payload_provided";

/// Parameter carrying a submitted verification code.
const VERIFICATION_CODE_PARAM: &str = "verification_code";

/// `GET /{ip}/pay/{id}/locale_for_ip`
pub(crate) fn locale_for_ip(id: PriceSettingId, ip: &str) -> Request {
    let id = id.to_string();
    Request::get(&[ip, PAY, &id, LOCALE_FOR_IP])
}

/// `GET /{amount}/pay/{id}/list_locales`
pub(crate) fn list_locales(id: PriceSettingId, amount: Option<u64>) -> Request {
    let id = id.to_string();
    let amount = amount_segment(amount);
    Request::get(&[&amount, PAY, &id, LIST_LOCALES])
}

/// `GET /{amount}/{locale}/pay/{id}/payments/new`
pub(crate) fn payment_methods(id: PriceSettingId, locale: &Locale, amount: Option<u64>) -> Request {
    let id = id.to_string();
    let amount = amount_segment(amount);
    let locale = locale.to_string();
    Request::get(&[&amount, &locale, PAY, &id, NEW_PAYMENT])
}

/// `POST /{amount}/{locale}/pay/{id}/payments`
///
/// The amount comes out of `options` and goes into the path; everything
/// else becomes a parameter.
pub(crate) fn create_payment(
    id: PriceSettingId,
    locale: &Locale,
    payment_method_id: PaymentMethodId,
    options: PaymentOptions,
) -> Request {
    let id = id.to_string();
    let locale = locale.to_string();
    let (amount, params) = options.into_request_parts(payment_method_id);
    let amount = amount.unwrap_or_default();
    Request::post(&[&amount, &locale, PAY, &id, PAYMENTS]).params(params)
}

/// `GET ///pay/{id}/payments/{payment_id}`
pub(crate) fn show_payment(id: PriceSettingId, payment_id: PaymentId) -> Request {
    let id = id.to_string();
    let payment_id = payment_id.to_string();
    Request::get(&["", "", PAY, &id, PAYMENTS, &payment_id])
}

/// `POST ///pay/{id}/payments/{payment_id}/verification_code`
pub(crate) fn verification_code(id: PriceSettingId, payment_id: PaymentId, code: &str) -> Request {
    let id = id.to_string();
    let payment_id = payment_id.to_string();
    Request::post(&["", "", PAY, &id, PAYMENTS, &payment_id, VERIFICATION_CODE])
        .param(VERIFICATION_CODE_PARAM, code)
}

/// `POST ///pay/{id}/payments/{payment_id}/mark_payload_provided`
pub(crate) fn mark_payload_provided(id: PriceSettingId, payment_id: PaymentId) -> Request {
    let id = id.to_string();
    let payment_id = payment_id.to_string();
    Request::post(&["", "", PAY, &id, PAYMENTS, &payment_id, MARK_PAYLOAD_PROVIDED])
}

/// Renders the optional amount segment; absent means empty.
fn amount_segment(amount: Option<u64>) -> String {
    amount.map(|cents| cents.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PayalogueId;
    use crate::request::Method;

    /// Price setting used throughout.
    const ID: PriceSettingId = PriceSettingId::new(111_111);

    #[test]
    fn locale_for_ip_path() {
        let request = locale_for_ip(ID, "12.34.56.78");
        assert_eq!(request.method(), Method::Get);
        assert_eq!(request.path(), "/12.34.56.78/pay/111111/locale_for_ip");
        assert!(request.caller_params().is_empty());
    }

    #[test]
    fn list_locales_with_and_without_amount() {
        assert_eq!(list_locales(ID, None).path(), "//pay/111111/list_locales");
        assert_eq!(
            list_locales(ID, Some(10)).path(),
            "/10/pay/111111/list_locales"
        );
    }

    #[test]
    fn payment_methods_path() {
        let locale = Locale::new("nl", "NL").unwrap();
        assert_eq!(
            payment_methods(ID, &locale, None).path(),
            "//nl-NL/pay/111111/payments/new"
        );
        assert_eq!(
            payment_methods(ID, &locale, Some(10)).path(),
            "/10/nl-NL/pay/111111/payments/new"
        );
    }

    #[test]
    fn create_payment_path_and_params() {
        let locale = Locale::new("nl", "NL").unwrap();
        let request = create_payment(
            ID,
            &locale,
            PaymentMethodId::new(2),
            PaymentOptions::new().field("product_id", 23),
        );
        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.path(), "//nl-NL/pay/111111/payments");
        let params: Vec<(&str, &str)> = request
            .caller_params()
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect();
        assert_eq!(params, vec![("payment_method_id", "2"), ("product_id", "23")]);
    }

    #[test]
    fn create_payment_moves_amount_into_path() {
        let locale = Locale::new("nl", "NL").unwrap();
        let request = create_payment(
            ID,
            &locale,
            PaymentMethodId::new(2),
            PaymentOptions::new()
                .amount(10)
                .payalogue_id(PayalogueId::new(222_222)),
        );
        assert_eq!(request.path(), "/10/nl-NL/pay/111111/payments");
        assert!(!request.caller_params().contains_key("amount"));
        assert_eq!(
            request.caller_params().get("payalogue_id").map(String::as_str),
            Some("222222")
        );
    }

    #[test]
    fn payment_scoped_paths_keep_empty_segments() {
        let payment = PaymentId::new(999_999_999);
        assert_eq!(
            show_payment(ID, payment).path(),
            "///pay/111111/payments/999999999"
        );
        let submit = verification_code(ID, payment, "1234");
        assert_eq!(submit.method(), Method::Post);
        assert_eq!(
            submit.path(),
            "///pay/111111/payments/999999999/verification_code"
        );
        assert_eq!(
            submit
                .caller_params()
                .get("verification_code")
                .map(String::as_str),
            Some("1234")
        );
        let provided = mark_payload_provided(ID, payment);
        assert_eq!(provided.method(), Method::Post);
        assert_eq!(
            provided.path(),
            "///pay/111111/payments/999999999/mark_payload_provided"
        );
        assert!(provided.caller_params().is_empty());
    }
}
