//! SOAP 1.1 envelope assembly.

use serde_json::Value;

use super::operation::request_tag;
use super::BM_NAMESPACE;
use crate::codec::{render_element, RenderOptions};

/// SOAP 1.1 envelope namespace.
pub const SOAP_ENV_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";

/// XML Schema instance namespace (for `xsi:nil`).
pub const XSI_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema-instance";

/// A request ready to be rendered: header fragment, operation, message.
#[derive(Debug, Clone)]
pub struct Envelope<'a> {
    header: &'a str,
    tag: String,
    message: &'a Value,
}

impl<'a> Envelope<'a> {
    /// Create an envelope for a snake-case operation name.
    pub fn new(operation: &str, header: &'a str, message: &'a Value) -> Self {
        Self {
            header,
            tag: request_tag(operation),
            message,
        }
    }

    /// Wire tag of the body element (also used as the SOAPAction).
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Render the full envelope.
    pub fn render(&self, options: RenderOptions<'_>) -> String {
        let body = render_element(&self.tag, self.message, options);
        let sep = if options.pretty { "\n" } else { "" };
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>{sep}<soapenv:Envelope xmlns:soapenv="{SOAP_ENV_NAMESPACE}" xmlns:bm="{BM_NAMESPACE}" xmlns:xsi="{XSI_NAMESPACE}">{sep}<soapenv:Header>{}</soapenv:Header>{sep}<soapenv:Body>{sep}{body}{sep}</soapenv:Body>{sep}</soapenv:Envelope>"#,
            self.header
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_layout() {
        let message = json!({ "sessionCurrency": "USD" });
        let envelope = Envelope::new("set_session_currency", "<bm:category>Security</bm:category>", &message);
        assert_eq!(envelope.tag(), "setSessionCurrency");

        let xml = envelope.render(RenderOptions::wire());
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><soapenv:Envelope"#));
        assert!(xml.contains(r#"xmlns:bm="urn:soap.bigmachines.com""#));
        assert!(xml.contains("<soapenv:Header><bm:category>Security</bm:category></soapenv:Header>"));
        assert!(xml.contains(
            "<soapenv:Body><bm:setSessionCurrency><bm:sessionCurrency>USD</bm:sessionCurrency></bm:setSessionCurrency></soapenv:Body>"
        ));
        assert!(!xml.contains('\n'));
    }

    #[test]
    fn test_empty_message_renders_empty_element() {
        let message = json!({});
        let xml = Envelope::new("logout", "", &message).render(RenderOptions::wire());
        assert!(xml.contains("<soapenv:Body><bm:logout/></soapenv:Body>"));
    }
}
