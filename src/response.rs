//! Response pipeline: status check, XML decoding, normalization and the
//! application-level error check.
//!
//! Every operation funnels its [`RawResponse`] through [`interpret`], so
//! operation-specific shaping only ever sees a clean envelope.

use serde_json::{Map, Value};

use crate::error::{Result, ZaypayError};
use crate::normalize::{arrayify, canonicalize};
use crate::transport::RawResponse;
use crate::xml;

/// The only status the platform uses for success.
const STATUS_OK: u16 = 200;

/// Root element wrapping every platform response.
const ENVELOPE: &str = "response";

/// Envelope field flagging an application-level error.
const STATUS_FIELD: &str = "status";

/// Envelope field carrying the error detail.
const ERROR_FIELD: &str = "error";

/// Sentinel value of [`STATUS_FIELD`] for failures.
const STATUS_ERROR: &str = "error";

/// Turns a raw response into the clean, normalized envelope.
///
/// # Errors
///
/// - [`ZaypayError::Http`] for any status other than 200;
/// - [`ZaypayError::Xml`] if the body is not XML;
/// - [`ZaypayError::Api`] if the envelope reports `status` = `error`;
/// - [`ZaypayError::UnexpectedResponse`] if the envelope is not a mapping.
pub fn interpret(raw: RawResponse) -> Result<Map<String, Value>> {
    let body = check_status(raw)?;
    let tree = canonicalize(xml::decode(&body)?);
    tracing::trace!(body_len = body.len(), "decoded response body");
    check_envelope(unwrap_envelope(tree)?)
}

/// Fails with [`ZaypayError::Http`] unless the status is 200; returns the
/// body otherwise.
///
/// # Errors
///
/// Returns [`ZaypayError::Http`] carrying the status and raw body.
pub fn check_status(raw: RawResponse) -> Result<String> {
    if raw.status == STATUS_OK {
        Ok(raw.body)
    } else {
        tracing::debug!(status = raw.status, "platform returned non-success status");
        Err(ZaypayError::Http {
            status: raw.status,
            body: raw.body,
        })
    }
}

/// Removes the `status` field and fails if it was the error sentinel.
///
/// # Errors
///
/// Returns [`ZaypayError::Api`] with the platform's `error` detail.
pub fn check_envelope(mut data: Map<String, Value>) -> Result<Map<String, Value>> {
    let status = data.remove(STATUS_FIELD);
    if status.as_ref().and_then(Value::as_str) == Some(STATUS_ERROR) {
        let message = match data.remove(ERROR_FIELD) {
            Some(Value::String(message)) => message,
            Some(other) => other.to_string(),
            None => "no error detail given".to_owned(),
        };
        tracing::warn!(message = %message, "platform reported an error");
        return Err(ZaypayError::Api { message });
    }
    Ok(data)
}

/// Picks the envelope below the document root.
///
/// The platform wraps bodies in `<response>`; any other single root is
/// accepted as the envelope itself.
fn unwrap_envelope(tree: Value) -> Result<Map<String, Value>> {
    let Value::Object(mut document) = tree else {
        return Err(unexpected("document is not a mapping"));
    };
    let root = match document.remove(ENVELOPE) {
        Some(root) => root,
        None => document
            .into_iter()
            .next()
            .map(|(_, root)| root)
            .ok_or_else(|| unexpected("document is empty"))?,
    };
    match root {
        Value::Object(envelope) => Ok(envelope),
        Value::Null => Ok(Map::new()),
        Value::Bool(_) | Value::Number(_) | Value::String(_) | Value::Array(_) => {
            Err(unexpected("response envelope is not a mapping"))
        }
    }
}

/// Removes `field` from `data`.
///
/// # Errors
///
/// Returns [`ZaypayError::UnexpectedResponse`] if the field is missing.
pub fn take(data: &mut Map<String, Value>, field: &str) -> Result<Value> {
    data.remove(field)
        .ok_or_else(|| unexpected(&format!("response has no `{field}`")))
}

/// Reads a string field.
///
/// # Errors
///
/// Returns [`ZaypayError::UnexpectedResponse`] if the field is missing or
/// not a string.
pub fn take_str(data: &mut Map<String, Value>, field: &str) -> Result<String> {
    match take(data, field)? {
        Value::String(value) => Ok(value),
        other => Err(unexpected(&format!("`{field}` is not a string: {other}"))),
    }
}

/// Reads the `inner` entries of the `outer` container, e.g.
/// `countries.country`.
///
/// An empty container (`<countries/>`) yields null.
///
/// # Errors
///
/// Returns [`ZaypayError::UnexpectedResponse`] if `outer` is missing or
/// is neither a mapping nor empty.
pub fn take_nested(data: &mut Map<String, Value>, outer: &str, inner: &str) -> Result<Value> {
    match take(data, outer)? {
        Value::Object(mut container) => Ok(container.remove(inner).unwrap_or(Value::Null)),
        Value::Null => Ok(Value::Null),
        other => Err(unexpected(&format!("`{outer}` is not a mapping: {other}"))),
    }
}

/// Reads `outer.inner` as a list, re-expanding a collapsed single item.
///
/// # Errors
///
/// Same as [`take_nested`].
pub fn take_list(data: &mut Map<String, Value>, outer: &str, inner: &str) -> Result<Vec<Value>> {
    Ok(match take_nested(data, outer, inner)? {
        Value::Null => Vec::new(),
        entries => arrayify(entries),
    })
}

/// Builds a [`ZaypayError::UnexpectedResponse`].
fn unexpected(detail: &str) -> ZaypayError {
    ZaypayError::UnexpectedResponse(detail.to_owned())
}
