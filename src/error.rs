//! Error types for bigmachines-client.

use thiserror::Error;

/// Main error type for all BigMachines operations.
#[derive(Debug, Error)]
pub enum BigMachinesError {
    /// The client was configured without a site name.
    #[error("Valid site name must be provided")]
    InvalidSiteName,

    /// The remote service answered with `status.success == false`.
    #[error("Remote operation failed: {0}")]
    RemoteOperation(String),

    /// The response did not contain the element the operation expects.
    #[error("Unexpected response shape: missing <{0}>")]
    UnexpectedResponseShape(String),

    /// The response body carried a SOAP fault.
    #[error("SOAP fault ({code}): {message}")]
    SoapFault {
        /// Fault code as sent by the server.
        code: String,
        /// Fault string as sent by the server.
        message: String,
    },

    /// Non-2xx HTTP status without a SOAP fault in the body.
    #[error("HTTP status {status}: {body}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body, lossily decoded.
        body: String,
    },

    /// Transport-level failure (connect, TLS, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error while reading an attachment from disk.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed XML in a response body.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// A request could not be converted into a message tree.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Attachment content was not valid base64.
    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Multipart body could not be split into parts.
    #[error("Multipart error: {0}")]
    Multipart(String),
}

impl BigMachinesError {
    /// The server-supplied message, for remote failures and SOAP faults.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::RemoteOperation(message) | Self::SoapFault { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Result type alias using BigMachinesError.
pub type Result<T> = std::result::Result<T, BigMachinesError>;
