//! SOAP header builder.
//!
//! Every call carries a header fragment of the form:
//! ```text
//! <bm:userInfo>                 (only once a session exists)
//!   <bm:sessionId>…</bm:sessionId>
//! </bm:userInfo>
//! <bm:category>Security|Commerce</bm:category>
//! <bm:xsdInfo>
//!   <bm:schemaLocation>…</bm:schemaLocation>
//! </bm:xsdInfo>
//! ```
//! Each element declares the `bm` namespace itself. The fragment is injected
//! verbatim into `<soapenv:Header>`, so it is emitted on a single line.

use quick_xml::escape::escape;

use super::category::ServiceCategory;
use super::BM_NAMESPACE;

/// Build the header fragment for one call.
///
/// # Example
///
/// ```
/// use bigmachines_client::protocol::{build_header, ServiceCategory};
///
/// let header = build_header(ServiceCategory::Security, Some("S123"), "acme", "quotes_process");
/// assert!(header.contains("<bm:sessionId>S123</bm:sessionId>"));
/// assert!(!header.contains('\n'));
/// ```
pub fn build_header(
    category: ServiceCategory,
    session_id: Option<&str>,
    site_name: &str,
    process_name: &str,
) -> String {
    let schema = category.schema_location(site_name, process_name);

    let mut header = String::with_capacity(384);
    if let Some(session_id) = session_id {
        header.push_str(&format!(
            r#"<bm:userInfo xmlns:bm="{BM_NAMESPACE}"><bm:sessionId>{}</bm:sessionId></bm:userInfo>"#,
            escape(session_id)
        ));
    }
    header.push_str(&format!(
        r#"<bm:category xmlns:bm="{BM_NAMESPACE}">{}</bm:category>"#,
        category.label()
    ));
    header.push_str(&format!(
        r#"<bm:xsdInfo xmlns:bm="{BM_NAMESPACE}"><bm:schemaLocation>{}</bm:schemaLocation></bm:xsdInfo>"#,
        escape(&schema)
    ));
    header
}
