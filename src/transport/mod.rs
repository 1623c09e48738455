//! Transport module - moving rendered envelopes over the network.
//!
//! Provides:
//! - [`Transport`] - the seam between the call pipeline and the network
//! - [`HttpTransport`] - reqwest-backed implementation
//! - [`SoapRequest`] / [`RawResponse`] - what crosses the seam

mod http;

use std::future::Future;
use std::pin::Pin;

use bytes::Bytes;

use crate::error::Result;

pub use http::HttpTransport;

/// Boxed future returned by transports.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A rendered SOAP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapRequest {
    /// Endpoint URL.
    pub endpoint: String,
    /// Value of the `SOAPAction` header (unquoted).
    pub soap_action: String,
    /// Complete XML envelope.
    pub body: String,
}

/// Raw response as received, before any SOAP interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers in order of appearance.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: Bytes,
}

impl RawResponse {
    /// Create a response with the given status, content type and body.
    pub fn new(status: u16, content_type: &str, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), content_type.to_string())],
            body: body.into(),
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The `Content-Type` header, or an empty string.
    pub fn content_type(&self) -> &str {
        self.header("content-type").unwrap_or("")
    }

    /// Whether the body is a multipart payload rather than a SOAP envelope.
    #[inline]
    pub fn is_multipart(&self) -> bool {
        self.content_type().to_ascii_lowercase().contains("multipart")
    }

    /// Whether the status is 2xx.
    #[inline]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and returns the raw response.
///
/// Implementations must not retry; every call is exactly one round trip.
pub trait Transport: Send + Sync {
    /// Send a request.
    fn send(&self, request: SoapRequest) -> BoxFuture<'_, Result<RawResponse>>;
}

impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    fn send(&self, request: SoapRequest) -> BoxFuture<'_, Result<RawResponse>> {
        (**self).send(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = RawResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), "text/xml".to_string())],
            body: Bytes::new(),
        };
        assert_eq!(response.header("content-type"), Some("text/xml"));
        assert_eq!(response.content_type(), "text/xml");
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn test_multipart_detection() {
        assert!(RawResponse::new(200, "multipart/mixed; boundary=x", "").is_multipart());
        assert!(RawResponse::new(200, "Multipart/Related; boundary=x", "").is_multipart());
        assert!(!RawResponse::new(200, "text/xml;charset=UTF-8", "").is_multipart());
        assert!(!RawResponse {
            status: 200,
            headers: Vec::new(),
            body: Bytes::new()
        }
        .is_multipart());
    }

    #[test]
    fn test_success_range() {
        assert!(RawResponse::new(200, "text/xml", "").is_success());
        assert!(!RawResponse::new(500, "text/xml", "").is_success());
    }
}
