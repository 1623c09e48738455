//! Client builder and operation façade.
//!
//! The [`ClientBuilder`] provides a fluent API for configuring the site and
//! transport. The [`Client`] runs every operation through one pipeline:
//! 1. Shape the typed request and serialize it to a message tree
//! 2. Build the header for the operation's category and current session
//! 3. Render the envelope and send it through the [`Transport`]
//! 4. Unwrap the response element (or pass a multipart body through)
//! 5. Fail on an embedded `status.success == false`
//!
//! # Example
//!
//! ```ignore
//! use bigmachines_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::builder("acme")
//!         .process_name("quotes_process")
//!         .build()?;
//!
//!     client.login("alice", "secret").await?;
//!     let transaction = client.get_transaction(26539349, None).await?;
//!     println!("{:?}", transaction.field("quote_process", "opportunityName_quote"));
//!
//!     client.logout().await?;
//!     Ok(())
//! }
//! ```

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};

use crate::codec::RenderOptions;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::model::{Attachment, ExportedAttachments, MimeAttachment, Transaction, UserInfo};
use crate::protocol::{
    build_header, Envelope, NoArgumentOperation, ServiceCategory, SoapOperation,
    SUPPORTED_OPERATIONS,
};
use crate::requests::{
    AttachmentDescriptor, Attachments, ExportFileAttachments, GetTransaction,
    ImportFileAttachments, ImportMode, Login, SetSessionCurrency, TransactionRef,
    UpdateTransaction,
};
use crate::response::{normalize, object_at, status_success, unwrap_response, CallResult};
use crate::session::Session;
use crate::transport::{HttpTransport, SoapRequest, Transport};

/// Default export mode: return file content rather than a reference.
pub const DEFAULT_EXPORT_MODE: &str = "content";

/// Builder for configuring and creating a BigMachines client.
pub struct ClientBuilder {
    config: ClientConfig,
}

impl ClientBuilder {
    /// Create a builder for the given site.
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            config: ClientConfig::new(site_name),
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Set the commerce process variable name.
    ///
    /// Default: `quotes_process`
    pub fn process_name(mut self, name: impl Into<String>) -> Self {
        self.config.process_name = name.into();
        self
    }

    /// Set the main document element name used by transaction calls.
    ///
    /// Default: `quote_process`
    pub fn transaction_name(mut self, name: impl Into<String>) -> Self {
        self.config.transaction_name = name.into();
        self
    }

    /// Post to a different endpoint (sandboxes, proxies).
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = Some(endpoint.into());
        self
    }

    /// Set the per-request timeout of the HTTP transport.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    /// Log request envelopes at trace level.
    pub fn log_xml(mut self, enabled: bool) -> Self {
        self.config.log_xml = enabled;
        self
    }

    /// Indent logged envelopes.
    ///
    /// Default: true
    pub fn pretty_print_xml(mut self, enabled: bool) -> Self {
        self.config.pretty_print_xml = enabled;
        self
    }

    /// Mask another element's value in logged envelopes.
    pub fn filter(mut self, element: impl Into<String>) -> Self {
        self.config.filters.push(element.into());
        self
    }

    /// Build a client using the reqwest transport.
    pub fn build(self) -> Result<Client> {
        self.config.validate()?;
        let transport = HttpTransport::new(self.config.timeout)?;
        Ok(Client::new(self.config, transport))
    }

    /// Build a client on top of a custom transport.
    pub fn build_with_transport<T: Transport>(self, transport: T) -> Result<Client<T>> {
        self.config.validate()?;
        Ok(Client::new(self.config, transport))
    }
}

/// Call settings for one category, built once per client.
#[derive(Debug, Clone)]
struct ServiceClient {
    category: ServiceCategory,
    endpoint: String,
    site_name: String,
    process_name: String,
}

impl ServiceClient {
    fn new(category: ServiceCategory, config: &ClientConfig) -> Self {
        Self {
            category,
            endpoint: config.endpoint(),
            site_name: config.site_name.clone(),
            process_name: config.process_name.clone(),
        }
    }

    fn header(&self, session_id: Option<&str>) -> String {
        build_header(self.category, session_id, &self.site_name, &self.process_name)
    }
}

/// Options for [`Client::get_attachment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Document the attachment field lives on.
    pub document_number: u32,
    /// Export mode.
    pub mode: String,
    /// Ask for the file inline (multipart) rather than listed.
    pub inline: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            document_number: 1,
            mode: DEFAULT_EXPORT_MODE.to_string(),
            inline: true,
        }
    }
}

/// A BigMachines session client.
///
/// Holds the session issued by [`Client::login`] and sends it with every
/// later call. Calls are independent round trips; the client never retries.
pub struct Client<T: Transport = HttpTransport> {
    config: ClientConfig,
    security: ServiceClient,
    commerce: ServiceClient,
    session: Session,
    transport: T,
}

impl Client {
    /// Create a new client builder.
    pub fn builder(site_name: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(site_name)
    }
}

impl<T: Transport> Client<T> {
    fn new(config: ClientConfig, transport: T) -> Self {
        Self {
            security: ServiceClient::new(ServiceCategory::Security, &config),
            commerce: ServiceClient::new(ServiceCategory::Commerce, &config),
            config,
            session: Session::new(),
            transport,
        }
    }

    fn service(&self, category: ServiceCategory) -> &ServiceClient {
        match category {
            ServiceCategory::Security => &self.security,
            ServiceCategory::Commerce => &self.commerce,
        }
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    /// Current session id.
    pub fn session_id(&self) -> Option<&str> {
        self.session.id()
    }

    /// Reuse a session obtained elsewhere, or drop it with `None`.
    pub fn set_session_id(&mut self, session_id: Option<String>) {
        self.session.set(session_id);
    }

    /// Forget the local session without telling the server.
    pub fn clear_session(&mut self) {
        self.session.clear();
    }

    /// Header fragment the next call in `category` would carry.
    pub fn header(&self, category: ServiceCategory) -> String {
        self.service(category).header(self.session.id())
    }

    /// Configuration in effect.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Operations this client can send, with their categories.
    pub fn operations(&self) -> &'static [(&'static str, ServiceCategory)] {
        SUPPORTED_OPERATIONS
    }

    /// Log in and keep the returned session id.
    ///
    /// Returns the server's `status.success` flag. A response without a
    /// session id leaves the client without a session.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<bool> {
        let response = self.call_structured(&Login::new(username, password)).await?;
        self.session.establish_from(&response);
        if !self.session.is_established() {
            tracing::warn!("Login for {} returned no session id", username);
        }
        Ok(status_success(&response))
    }

    /// Set the currency used for prices in this session.
    pub async fn set_session_currency(&self, currency: &str) -> Result<Value> {
        let request = SetSessionCurrency {
            session_currency: currency.to_string(),
        };
        self.call_structured(&request).await
    }

    /// End the session on the server.
    ///
    /// The local session id is kept; call [`Client::clear_session`] to drop it.
    pub async fn logout(&self) -> Result<Value> {
        self.call_no_argument(NoArgumentOperation::Logout).await
    }

    /// Profile of the logged-in user.
    pub async fn get_user_info(&self) -> Result<UserInfo> {
        self.call_no_argument(NoArgumentOperation::GetUserInfo)
            .await
            .map(UserInfo::new)
    }

    // ------------------------------------------------------------------
    // Commerce
    // ------------------------------------------------------------------

    /// Fetch a transaction, limited to one document's attributes.
    ///
    /// `document_var_name` defaults to the configured transaction name.
    pub async fn get_transaction(
        &self,
        id: u64,
        document_var_name: Option<&str>,
    ) -> Result<Transaction> {
        let var_name = document_var_name.unwrap_or(&self.config.transaction_name);
        self.call_structured(&GetTransaction::new(id, var_name))
            .await
            .map(Transaction::new)
    }

    /// Write fields to the main document and run `_update_line_items`.
    pub async fn update_transaction(&self, id: u64, data: Map<String, Value>) -> Result<Value> {
        let request = UpdateTransaction::new(id, &self.config.transaction_name, data);
        self.call_structured(&request).await
    }

    /// Export the file stored in an attachment field.
    ///
    /// A multipart answer is returned as [`ExportedAttachments::Mime`]
    /// without status checking; a SOAP answer is normalized and its
    /// `attachments` entries returned in order.
    pub async fn get_attachment(
        &self,
        transaction_id: u64,
        variable_name: &str,
        options: ExportOptions,
    ) -> Result<ExportedAttachments> {
        let request = ExportFileAttachments {
            mode: options.mode,
            inline: options.inline,
            attachments: Attachments {
                attachment: AttachmentDescriptor {
                    document_number: options.document_number,
                    variable_name: variable_name.to_string(),
                    filename: None,
                    file_content: None,
                },
            },
            transaction: self.transaction_ref(transaction_id),
        };

        match self.call(&request).await? {
            CallResult::MultiPart(multipart) => Ok(ExportedAttachments::Mime(
                MimeAttachment::from_multipart(multipart)?,
            )),
            CallResult::Structured(value) => {
                let value = normalize(value)?;
                let attachments = object_at(&value, "attachments")
                    .map(Attachment::from_attachments)
                    .unwrap_or_default();
                Ok(ExportedAttachments::Listed(attachments))
            }
        }
    }

    /// Upload a file from disk into an attachment field.
    ///
    /// The file is read fully into memory and sent under its base name.
    pub async fn upload_attachment(
        &self,
        transaction_id: u64,
        path: impl AsRef<Path>,
        variable_name: &str,
        document_number: u32,
    ) -> Result<Value> {
        let path = path.as_ref();
        let content = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.upload_attachment_bytes(transaction_id, &filename, &content, variable_name, document_number)
            .await
    }

    /// Upload in-memory content into an attachment field.
    pub async fn upload_attachment_bytes(
        &self,
        transaction_id: u64,
        filename: &str,
        content: &[u8],
        variable_name: &str,
        document_number: u32,
    ) -> Result<Value> {
        let descriptor = AttachmentDescriptor {
            document_number,
            variable_name: variable_name.to_string(),
            filename: Some(filename.to_string()),
            file_content: Some(STANDARD.encode(content)),
        };
        self.call_structured(&self.import_request(ImportMode::Update, transaction_id, descriptor))
            .await
    }

    /// Remove the file stored in an attachment field.
    pub async fn delete_attachment(
        &self,
        transaction_id: u64,
        variable_name: &str,
        document_number: u32,
    ) -> Result<Value> {
        let descriptor = AttachmentDescriptor {
            document_number,
            variable_name: variable_name.to_string(),
            filename: None,
            file_content: None,
        };
        self.call_structured(&self.import_request(ImportMode::Delete, transaction_id, descriptor))
            .await
    }

    fn transaction_ref(&self, id: u64) -> TransactionRef {
        TransactionRef {
            process_var_name: self.config.process_name.clone(),
            id,
        }
    }

    fn import_request(
        &self,
        mode: ImportMode,
        transaction_id: u64,
        attachment: AttachmentDescriptor,
    ) -> ImportFileAttachments {
        ImportFileAttachments {
            mode,
            attachments: Attachments { attachment },
            transaction: self.transaction_ref(transaction_id),
        }
    }

    // ------------------------------------------------------------------
    // Pipeline
    // ------------------------------------------------------------------

    /// Send a typed request and return the unwrapped result.
    pub async fn call<O: SoapOperation>(&self, operation: &O) -> Result<CallResult> {
        let message = serde_json::to_value(operation)?;
        self.dispatch(O::CATEGORY, O::NAME, &message).await
    }

    async fn call_structured<O: SoapOperation>(&self, operation: &O) -> Result<Value> {
        self.call(operation)
            .await?
            .into_structured(O::NAME)
            .and_then(normalize)
    }

    async fn call_no_argument(&self, operation: NoArgumentOperation) -> Result<Value> {
        let message = Value::Object(Map::new());
        self.dispatch(operation.category(), operation.name(), &message)
            .await?
            .into_structured(operation.name())
            .and_then(normalize)
    }

    async fn dispatch(
        &self,
        category: ServiceCategory,
        operation: &str,
        message: &Value,
    ) -> Result<CallResult> {
        let service = self.service(category);
        let header = service.header(self.session.id());
        let envelope = Envelope::new(operation, &header, message);

        if self.config.log_xml {
            let logged = envelope.render(RenderOptions::log(
                self.config.pretty_print_xml,
                &self.config.filters,
            ));
            tracing::trace!("SOAP request {}:\n{}", operation, logged);
        }

        let request = SoapRequest {
            endpoint: service.endpoint.clone(),
            soap_action: envelope.tag().to_string(),
            body: envelope.render(RenderOptions::wire()),
        };
        let response = self.transport.send(request).await?;
        tracing::debug!(
            "{} [{}] -> HTTP {} ({})",
            operation,
            category,
            response.status,
            response.content_type()
        );

        unwrap_response(operation, response)
    }
}
