//! Client configuration.

use std::time::Duration;

use crate::error::{BigMachinesError, Result};
use crate::protocol::default_endpoint;

/// Default commerce process variable name.
pub const DEFAULT_PROCESS_NAME: &str = "quotes_process";

/// Default transaction (main document) element name.
pub const DEFAULT_TRANSACTION_NAME: &str = "quote_process";

/// Element names whose values never appear in logs by default.
pub const DEFAULT_FILTERS: &[&str] = &["password"];

/// Settings shared by every call a client makes.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// BigMachines site (subdomain) name.
    pub site_name: String,
    /// Commerce process variable name; selects the commerce XSD.
    pub process_name: String,
    /// Main document element name used by transaction calls.
    pub transaction_name: String,
    /// Endpoint override. Defaults to the site's receiver URL.
    pub endpoint: Option<String>,
    /// Per-request timeout for the HTTP transport.
    pub timeout: Option<Duration>,
    /// Log request envelopes at trace level.
    pub log_xml: bool,
    /// Indent logged envelopes.
    pub pretty_print_xml: bool,
    /// Element names masked in logged envelopes.
    pub filters: Vec<String>,
}

impl ClientConfig {
    /// Configuration for `site_name` with all defaults.
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
            process_name: DEFAULT_PROCESS_NAME.to_string(),
            transaction_name: DEFAULT_TRANSACTION_NAME.to_string(),
            endpoint: None,
            timeout: None,
            log_xml: false,
            pretty_print_xml: true,
            filters: DEFAULT_FILTERS.iter().map(|f| f.to_string()).collect(),
        }
    }

    /// Endpoint every category posts to.
    pub fn endpoint(&self) -> String {
        self.endpoint
            .clone()
            .unwrap_or_else(|| default_endpoint(&self.site_name))
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`BigMachinesError::InvalidSiteName`] for an empty site name.
    pub fn validate(&self) -> Result<()> {
        if self.site_name.trim().is_empty() {
            return Err(BigMachinesError::InvalidSiteName);
        }
        Ok(())
    }
}
