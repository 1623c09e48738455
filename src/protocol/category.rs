//! Service categories.
//!
//! BigMachines splits its SOAP API into two contracts that share one
//! endpoint. The category travels in the SOAP header and selects the XSD
//! the server validates the body against.

use std::fmt;

/// Which service contract a call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceCategory {
    /// Login, logout, user info, session settings.
    Security,
    /// Transactions and their file attachments.
    Commerce,
}

impl ServiceCategory {
    /// Label sent in the `<bm:category>` header element.
    pub fn label(self) -> &'static str {
        match self {
            Self::Security => "Security",
            Self::Commerce => "Commerce",
        }
    }

    /// Schema location for this category.
    ///
    /// Commerce schemas are generated per commerce process, so the process
    /// variable name is part of the URL. Security ignores it.
    pub fn schema_location(self, site_name: &str, process_name: &str) -> String {
        match self {
            Self::Security => format!(
                "https://{site_name}.bigmachines.com/bmfsweb/{site_name}/schema/v1_0/security/Security.xsd"
            ),
            Self::Commerce => format!(
                "https://{site_name}.bigmachines.com/bmfsweb/{site_name}/schema/v1_0/commerce/{process_name}.xsd"
            ),
        }
    }
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Default SOAP endpoint for a site.
pub fn default_endpoint(site_name: &str) -> String {
    format!("https://{site_name}.bigmachines.com/v1_0/receiver")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels() {
        assert_eq!(ServiceCategory::Security.label(), "Security");
        assert_eq!(ServiceCategory::Commerce.to_string(), "Commerce");
    }

    #[test]
    fn test_security_schema_ignores_process() {
        assert_eq!(
            ServiceCategory::Security.schema_location("acme", "quotes_process"),
            "https://acme.bigmachines.com/bmfsweb/acme/schema/v1_0/security/Security.xsd"
        );
    }

    #[test]
    fn test_commerce_schema_uses_process() {
        assert_eq!(
            ServiceCategory::Commerce.schema_location("acme", "orders"),
            "https://acme.bigmachines.com/bmfsweb/acme/schema/v1_0/commerce/orders.xsd"
        );
    }

    #[test]
    fn test_default_endpoint() {
        assert_eq!(
            default_endpoint("acmetest"),
            "https://acmetest.bigmachines.com/v1_0/receiver"
        );
    }
}
