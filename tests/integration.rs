//! Integration tests for bigmachines-client.
//!
//! These tests drive the public client API against a scripted transport.

use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use bigmachines_client::protocol::{build_header, response_tag, ServiceCategory};
use bigmachines_client::transport::{BoxFuture, RawResponse, SoapRequest, Transport};
use bigmachines_client::{BigMachinesError, Client, ExportOptions, ExportedAttachments};
use serde_json::{json, Map, Value};

/// Scripted transport shared between the test and the client.
#[derive(Default)]
struct ScriptedTransport {
    responses: Mutex<VecDeque<RawResponse>>,
    requests: Mutex<Vec<SoapRequest>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<RawResponse>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn requests(&self) -> Vec<SoapRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: SoapRequest) -> BoxFuture<'_, bigmachines_client::Result<RawResponse>> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        Box::pin(async move {
            next.ok_or_else(|| {
                BigMachinesError::from(io::Error::new(
                    io::ErrorKind::ConnectionRefused,
                    "script exhausted",
                ))
            })
        })
    }
}

fn envelope(operation: &str, inner: &str) -> RawResponse {
    let tag = response_tag(operation);
    RawResponse::new(
        200,
        "text/xml; charset=utf-8",
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
             <soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\">\
             <soapenv:Header/><soapenv:Body>\
             <bm:{tag} xmlns:bm=\"urn:soap.bigmachines.com\">{inner}</bm:{tag}>\
             </soapenv:Body></soapenv:Envelope>"
        ),
    )
}

const SUCCESS: &str =
    "<bm:status><bm:success>true</bm:success><bm:message>Successfully processed API</bm:message></bm:status>";

const INVALID_SESSION: &str =
    "<bm:status><bm:success>false</bm:success><bm:message>Invalid session</bm:message></bm:status>";

fn client_with(transport: &Arc<ScriptedTransport>) -> Client<Arc<ScriptedTransport>> {
    Client::builder("acme")
        .build_with_transport(Arc::clone(transport))
        .unwrap()
}

/// Header never carries a session before login.
#[test]
fn test_header_without_session() {
    for category in [ServiceCategory::Security, ServiceCategory::Commerce] {
        let header = build_header(category, None, "acme", "quotes_process");
        assert!(!header.contains("sessionId"));
    }
}

/// login("alice","secret") → session S123 → getTransaction(42) carries it.
#[tokio::test]
async fn test_login_then_get_transaction() {
    let transport = ScriptedTransport::new(vec![
        envelope(
            "login",
            &format!("{SUCCESS}<bm:userInfo><bm:sessionId>S123</bm:sessionId></bm:userInfo>"),
        ),
        envelope(
            "get_transaction",
            &format!(
                "{SUCCESS}<bm:transaction><bm:id>42</bm:id><bm:process_var_name>quotes_process</bm:process_var_name>\
                 <bm:data_xml><bm:quote_process bm:bs_id=\"42\"><bm:opportunityName_quote>Foo</bm:opportunityName_quote>\
                 </bm:quote_process></bm:data_xml></bm:transaction>"
            ),
        ),
    ]);
    let mut client = client_with(&transport);

    assert!(client.login("alice", "secret").await.unwrap());
    assert_eq!(client.session_id(), Some("S123"));
    assert_eq!(
        client
            .header(ServiceCategory::Commerce)
            .matches("<bm:sessionId>S123</bm:sessionId>")
            .count(),
        1
    );

    let transaction = client.get_transaction(42, None).await.unwrap();
    assert_eq!(transaction.id().as_deref(), Some("42"));
    assert_eq!(
        transaction.field("quote_process", "opportunityName_quote").as_deref(),
        Some("Foo")
    );
    assert_eq!(
        transaction.document("quote_process").unwrap()["@bs_id"],
        json!("42")
    );

    let requests = transport.requests();
    assert!(!requests[0].body.contains("sessionId"));
    assert!(requests[1].body.contains("<bm:sessionId>S123</bm:sessionId>"));
}

/// The update message nests defaults and caller data under the document element.
#[tokio::test]
async fn test_update_transaction_message_shape() {
    let transport = ScriptedTransport::new(vec![envelope("update_transaction", SUCCESS)]);
    let client = client_with(&transport);

    let mut data = Map::new();
    data.insert("opportunityName_quote".to_string(), json!("Foo"));
    let result = client.update_transaction(26539349, data).await.unwrap();
    assert_eq!(result["status"]["success"], Value::Bool(true));

    let body = &transport.requests()[0].body;
    assert!(body.contains("<bm:updateTransaction><bm:transaction><bm:id>26539349</bm:id><bm:data_xml>"));
    assert!(body.contains(r#"bm:bs_id="26539349""#));
    assert!(body.contains(r#"bm:data_type="0""#));
    assert!(body.contains(r#"bm:document_number="1""#));
    assert!(body.contains("<bm:opportunityName_quote>Foo</bm:opportunityName_quote>"));
}

/// Multipart responses bypass status checking entirely.
#[tokio::test]
async fn test_multipart_attachment_skips_normalizer() {
    let transport = ScriptedTransport::new(vec![RawResponse::new(
        200,
        "multipart/mixed; boundary=part",
        "--part\r\nContent-Type: application/octet-stream\r\nContent-Disposition: attachment; filename=\"a.bin\"\r\n\r\n\x01\x02\x03\r\n--part--",
    )]);
    let client = client_with(&transport);

    let exported = client
        .get_attachment(26539349, "quote_pdf", ExportOptions::default())
        .await
        .unwrap();
    match exported {
        ExportedAttachments::Mime(file) => {
            assert_eq!(file.filename.as_deref(), Some("a.bin"));
            assert_eq!(&file.content[..], &[1u8, 2, 3]);
        }
        other => panic!("expected a MIME attachment, got {other:?}"),
    }
    assert_eq!(transport.requests()[0].soap_action, "exportFileAttachments");
}

/// A failed status surfaces from every façade call.
#[tokio::test]
async fn test_invalid_session_surfaces_everywhere() {
    let transport = ScriptedTransport::new(vec![
        envelope("get_transaction", INVALID_SESSION),
        envelope("update_transaction", INVALID_SESSION),
        envelope("export_file_attachments", INVALID_SESSION),
        envelope("import_file_attachments", INVALID_SESSION),
        envelope("get_user_info", INVALID_SESSION),
        envelope("set_session_currency", INVALID_SESSION),
        envelope("logout", INVALID_SESSION),
    ]);
    let client = client_with(&transport);

    let errors = vec![
        client.get_transaction(1, None).await.unwrap_err(),
        client.update_transaction(1, Map::new()).await.unwrap_err(),
        client
            .get_attachment(1, "f", ExportOptions::default())
            .await
            .unwrap_err(),
        client.delete_attachment(1, "f", 1).await.unwrap_err(),
        client.get_user_info().await.unwrap_err(),
        client.set_session_currency("USD").await.unwrap_err(),
        client.logout().await.unwrap_err(),
    ];
    for err in errors {
        assert!(
            matches!(&err, BigMachinesError::RemoteOperation(message) if message == "Invalid session"),
            "unexpected error: {err}"
        );
    }
}

/// User info is read from the security contract.
#[tokio::test]
async fn test_get_user_info() {
    let transport = ScriptedTransport::new(vec![envelope(
        "get_user_info",
        &format!("{SUCCESS}<bm:userInfo><bm:login>alice</bm:login><bm:email>alice@acme.test</bm:email></bm:userInfo>"),
    )]);
    let client = client_with(&transport);

    let info = client.get_user_info().await.unwrap();
    assert_eq!(info.login().as_deref(), Some("alice"));
    assert_eq!(info.email().as_deref(), Some("alice@acme.test"));

    let request = &transport.requests()[0];
    assert!(request.body.contains("<bm:getUserInfo/>"));
    assert!(request.body.contains(">Security</bm:category>"));
}

/// A SOAP fault is reported as such, not as a missing response element.
#[tokio::test]
async fn test_soap_fault() {
    let fault = RawResponse::new(
        500,
        "text/xml",
        "<soapenv:Envelope xmlns:soapenv=\"http://schemas.xmlsoap.org/soap/envelope/\"><soapenv:Body>\
         <soapenv:Fault><faultcode>soapenv:Client</faultcode><faultstring>Bad request</faultstring></soapenv:Fault>\
         </soapenv:Body></soapenv:Envelope>",
    );
    let transport = ScriptedTransport::new(vec![fault]);
    let client = client_with(&transport);

    match client.logout().await.unwrap_err() {
        BigMachinesError::SoapFault { code, message } => {
            assert_eq!(code, "soapenv:Client");
            assert_eq!(message, "Bad request");
        }
        other => panic!("expected SOAP fault, got {other}"),
    }
}

/// Transport errors are passed through untouched.
#[tokio::test]
async fn test_transport_error_propagates() {
    let transport = ScriptedTransport::new(Vec::new());
    let client = client_with(&transport);

    let err = client.get_user_info().await.unwrap_err();
    match err {
        BigMachinesError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::ConnectionRefused),
        other => panic!("expected I/O error, got {other}"),
    }
}
