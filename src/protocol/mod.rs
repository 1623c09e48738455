//! Protocol module - categories, headers, envelopes, operation naming.
//!
//! This module implements the SOAP side of the BigMachines API:
//! - Service categories and their schema locations
//! - Per-call header fragment (session, category, schema)
//! - Envelope assembly and operation/response tag naming

mod category;
mod envelope;
mod header;
mod operation;

pub use category::{default_endpoint, ServiceCategory};
pub use envelope::{Envelope, SOAP_ENV_NAMESPACE, XSI_NAMESPACE};
pub use header::build_header;
pub use operation::{
    request_tag, response_tag, NoArgumentOperation, SoapOperation, SUPPORTED_OPERATIONS,
};

/// Namespace of every BigMachines element.
pub const BM_NAMESPACE: &str = "urn:soap.bigmachines.com";
