//! Response unwrapping and normalization.
//!
//! A raw response becomes a [`CallResult`] in [`unwrap_response`]:
//! multipart bodies are passed through untouched, everything else is parsed
//! and reduced to the value under the operation's response tag. Structured
//! results then go through [`normalize`], which turns an embedded
//! `status.success == false` into an error.

use bytes::Bytes;
use serde_json::{Map, Value};

use crate::codec::parse_body;
use crate::error::{BigMachinesError, Result};
use crate::protocol::response_tag;
use crate::transport::RawResponse;

/// Raw multipart response (file attachment download).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPart {
    /// HTTP response headers.
    pub headers: Vec<(String, String)>,
    /// Undecoded multipart body.
    pub body: Bytes,
}

impl MultiPart {
    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Outcome of one dispatched call. Exactly one shape per call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallResult {
    /// Value found under `<operationName>Response`.
    Structured(Value),
    /// Multipart body, not parsed.
    MultiPart(MultiPart),
}

impl CallResult {
    /// Take the structured value.
    ///
    /// # Errors
    ///
    /// A multipart body where a structured response was expected is reported
    /// as [`BigMachinesError::UnexpectedResponseShape`].
    pub fn into_structured(self, operation: &str) -> Result<Value> {
        match self {
            Self::Structured(value) => Ok(value),
            Self::MultiPart(_) => Err(BigMachinesError::UnexpectedResponseShape(response_tag(
                operation,
            ))),
        }
    }
}

/// Turn a raw response into a [`CallResult`] for `operation`.
///
/// # Errors
///
/// - [`BigMachinesError::SoapFault`] when the body carries a `Fault`
/// - [`BigMachinesError::HttpStatus`] for non-2xx responses without a fault
/// - [`BigMachinesError::UnexpectedResponseShape`] when the response tag is absent
pub fn unwrap_response(operation: &str, response: RawResponse) -> Result<CallResult> {
    if response.is_multipart() {
        return Ok(CallResult::MultiPart(MultiPart {
            headers: response.headers,
            body: response.body,
        }));
    }

    let mut body = match parse_body(&response.body) {
        Ok(body) => body,
        Err(_) if !response.is_success() => return Err(http_status_error(&response)),
        Err(e) => return Err(e),
    };

    if let Some(fault) = body.get("Fault") {
        return Err(soap_fault(fault));
    }
    if !response.is_success() {
        return Err(http_status_error(&response));
    }

    let tag = response_tag(operation);
    body.remove(&tag)
        .map(CallResult::Structured)
        .ok_or(BigMachinesError::UnexpectedResponseShape(tag))
}

fn http_status_error(response: &RawResponse) -> BigMachinesError {
    BigMachinesError::HttpStatus {
        status: response.status,
        body: String::from_utf8_lossy(&response.body).into_owned(),
    }
}

/// Read a SOAP 1.1 (`faultcode`/`faultstring`) or 1.2 (`Code`/`Reason`) fault.
fn soap_fault(fault: &Value) -> BigMachinesError {
    let text = |v: Option<&Value>| match v {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Object(map)) => map
            .get("Value")
            .or_else(|| map.get("Text"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    };
    BigMachinesError::SoapFault {
        code: text(fault.get("faultcode").or_else(|| fault.get("Code"))),
        message: text(fault.get("faultstring").or_else(|| fault.get("Reason"))),
    }
}

/// Fail on an embedded `status.success == false`, pass anything else through.
///
/// # Example
///
/// ```
/// use bigmachines_client::response::normalize;
/// use serde_json::json;
///
/// let ok = json!({ "status": { "success": true } });
/// assert_eq!(normalize(ok.clone()).unwrap(), ok);
///
/// let failed = json!({ "status": { "success": false, "message": "Invalid session" } });
/// assert_eq!(normalize(failed).unwrap_err().remote_message(), Some("Invalid session"));
/// ```
pub fn normalize(value: Value) -> Result<Value> {
    if let Some(message) = failure_message(&value) {
        return Err(BigMachinesError::RemoteOperation(message));
    }
    Ok(value)
}

fn failure_message(value: &Value) -> Option<String> {
    let status = value.as_object()?.get("status")?.as_object()?;
    if status.get("success") != Some(&Value::Bool(false)) {
        return None;
    }
    Some(
        status
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
    )
}

/// `status.success` of a structured result, `false` if absent.
pub fn status_success(value: &Value) -> bool {
    value
        .get("status")
        .and_then(|status| status.get("success"))
        .and_then(Value::as_bool)
        .unwrap_or(false)
}

/// Object under `key`, if the value is an object containing one.
pub(crate) fn object_at<'a>(value: &'a Value, key: &str) -> Option<&'a Map<String, Value>> {
    value.get(key).and_then(Value::as_object)
}
