//! Typed request bodies, one per remote operation.
//!
//! Field order is element order on the wire.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::protocol::{ServiceCategory, SoapOperation};

/// Action run by `update_transaction` after the data is applied.
pub const UPDATE_LINE_ITEMS_ACTION: &str = "_update_line_items";

/// `login`
#[derive(Debug, Clone, Serialize)]
pub struct Login {
    /// Serialized as `userInfo`.
    #[serde(rename = "userInfo")]
    pub user_info: Credentials,
}

/// Username/password pair sent by `login`.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// BigMachines login name.
    pub username: String,
    /// Plain password; masked in logged envelopes.
    pub password: String,
}

impl Login {
    /// Login request for the given credentials.
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            user_info: Credentials {
                username: username.to_string(),
                password: password.to_string(),
            },
        }
    }
}

impl SoapOperation for Login {
    const NAME: &'static str = "login";
    const CATEGORY: ServiceCategory = ServiceCategory::Security;
}

/// `set_session_currency`
#[derive(Debug, Clone, Serialize)]
pub struct SetSessionCurrency {
    /// Currency code, e.g. `USD`.
    #[serde(rename = "sessionCurrency")]
    pub session_currency: String,
}

impl SoapOperation for SetSessionCurrency {
    const NAME: &'static str = "set_session_currency";
    const CATEGORY: ServiceCategory = ServiceCategory::Security;
}

/// `get_transaction`, limited to one document's attributes.
#[derive(Debug, Clone, Serialize)]
pub struct GetTransaction {
    /// Which transaction, and which document to return.
    pub transaction: TransactionQuery,
}

/// Transaction id plus the attribute filter.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionQuery {
    pub id: u64,
    /// Limits the response to the listed documents.
    pub return_specific_attributes: ReturnSpecificAttributes,
}

/// Attribute filter of a `get_transaction` call.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnSpecificAttributes {
    pub documents: Documents,
}

/// Documents whose attributes are returned.
#[derive(Debug, Clone, Serialize)]
pub struct Documents {
    pub document: DocumentRef,
}

/// A document by variable name.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRef {
    /// Document element name, e.g. `quote_process`.
    pub var_name: String,
}

impl GetTransaction {
    /// Fetch transaction `id` with the attributes of `document_var_name`.
    pub fn new(id: u64, document_var_name: &str) -> Self {
        Self {
            transaction: TransactionQuery {
                id,
                return_specific_attributes: ReturnSpecificAttributes {
                    documents: Documents {
                        document: DocumentRef {
                            var_name: document_var_name.to_string(),
                        },
                    },
                },
            },
        }
    }
}

impl SoapOperation for GetTransaction {
    const NAME: &'static str = "get_transaction";
    const CATEGORY: ServiceCategory = ServiceCategory::Commerce;
}

/// `update_transaction`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateTransaction {
    /// Data to write and the action to run afterwards.
    pub transaction: TransactionUpdate,
}

/// Body of an `update_transaction` call.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionUpdate {
    pub id: u64,
    /// Single entry: transaction element name → document attributes and fields.
    pub data_xml: Map<String, Value>,
    /// Action run once the data is applied.
    pub action_data: ActionData,
}

/// Commerce action to invoke.
#[derive(Debug, Clone, Serialize)]
pub struct ActionData {
    pub action_var_name: String,
}

impl UpdateTransaction {
    /// Build an update of document 1 of transaction `id`.
    ///
    /// `bs_id`, `data_type` and `document_number` are sent as attributes of
    /// the document element; keys in `data` replace them on collision.
    pub fn new(id: u64, transaction_element_name: &str, data: Map<String, Value>) -> Self {
        let mut document = Map::new();
        document.insert("@bs_id".to_string(), Value::from(id));
        document.insert("@data_type".to_string(), Value::from(0));
        document.insert("@document_number".to_string(), Value::from(1));
        document.extend(data);

        let mut data_xml = Map::new();
        data_xml.insert(transaction_element_name.to_string(), Value::Object(document));

        Self {
            transaction: TransactionUpdate {
                id,
                data_xml,
                action_data: ActionData {
                    action_var_name: UPDATE_LINE_ITEMS_ACTION.to_string(),
                },
            },
        }
    }
}

impl SoapOperation for UpdateTransaction {
    const NAME: &'static str = "update_transaction";
    const CATEGORY: ServiceCategory = ServiceCategory::Commerce;
}

/// One attachment slot, optionally carrying content to upload.
#[derive(Debug, Clone, Serialize)]
pub struct AttachmentDescriptor {
    /// Document the attachment field lives on.
    pub document_number: u32,
    /// Attachment field variable name.
    pub variable_name: String,
    /// File name shown in BigMachines.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Base64 file content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_content: Option<String>,
}

/// `attachments` block wrapping a single descriptor.
#[derive(Debug, Clone, Serialize)]
pub struct Attachments {
    pub attachment: AttachmentDescriptor,
}

/// Transaction an attachment belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRef {
    /// Commerce process variable name.
    pub process_var_name: String,
    pub id: u64,
}

/// `export_file_attachments`
#[derive(Debug, Clone, Serialize)]
pub struct ExportFileAttachments {
    /// Export mode, usually `content`.
    pub mode: String,
    /// Return the file as a multipart part instead of base64 text.
    pub inline: bool,
    pub attachments: Attachments,
    pub transaction: TransactionRef,
}

impl SoapOperation for ExportFileAttachments {
    const NAME: &'static str = "export_file_attachments";
    const CATEGORY: ServiceCategory = ServiceCategory::Commerce;
}

/// Mode of an `import_file_attachments` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Store the given file.
    Update,
    /// Remove the stored file.
    Delete,
}

/// `import_file_attachments` (upload or delete)
#[derive(Debug, Clone, Serialize)]
pub struct ImportFileAttachments {
    pub mode: ImportMode,
    pub attachments: Attachments,
    pub transaction: TransactionRef,
}

impl SoapOperation for ImportFileAttachments {
    const NAME: &'static str = "import_file_attachments";
    const CATEGORY: ServiceCategory = ServiceCategory::Commerce;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_login_shape() {
        let value = serde_json::to_value(Login::new("alice", "secret")).unwrap();
        assert_eq!(
            value,
            json!({ "userInfo": { "username": "alice", "password": "secret" } })
        );
    }

    #[test]
    fn test_get_transaction_shape() {
        let value = serde_json::to_value(GetTransaction::new(42, "quote_process")).unwrap();
        assert_eq!(
            value,
            json!({
                "transaction": {
                    "id": 42,
                    "return_specific_attributes": {
                        "documents": { "document": { "var_name": "quote_process" } }
                    }
                }
            })
        );
    }

    #[test]
    fn test_update_transaction_defaults_and_data() {
        let mut data = Map::new();
        data.insert("opportunityName_quote".to_string(), json!("Foo"));
        let value =
            serde_json::to_value(UpdateTransaction::new(26539349, "quote_process", data)).unwrap();

        let document = &value["transaction"]["data_xml"]["quote_process"];
        assert_eq!(document["@bs_id"], json!(26539349));
        assert_eq!(document["@data_type"], json!(0));
        assert_eq!(document["@document_number"], json!(1));
        assert_eq!(document["opportunityName_quote"], json!("Foo"));
        assert_eq!(
            value["transaction"]["action_data"]["action_var_name"],
            json!("_update_line_items")
        );
        assert_eq!(value["transaction"]["id"], json!(26539349));
    }

    #[test]
    fn test_update_transaction_caller_overrides_defaults() {
        let mut data = Map::new();
        data.insert("@document_number".to_string(), json!(3));
        let value = serde_json::to_value(UpdateTransaction::new(1, "quote_process", data)).unwrap();
        assert_eq!(
            value["transaction"]["data_xml"]["quote_process"]["@document_number"],
            json!(3)
        );
    }

    #[test]
    fn test_delete_descriptor_omits_file_fields() {
        let request = ImportFileAttachments {
            mode: ImportMode::Delete,
            attachments: Attachments {
                attachment: AttachmentDescriptor {
                    document_number: 1,
                    variable_name: "quote_pdf".to_string(),
                    filename: None,
                    file_content: None,
                },
            },
            transaction: TransactionRef {
                process_var_name: "quotes_process".to_string(),
                id: 7,
            },
        };
        let value = serde_json::to_value(request).unwrap();
        assert_eq!(
            value,
            json!({
                "mode": "delete",
                "attachments": { "attachment": { "document_number": 1, "variable_name": "quote_pdf" } },
                "transaction": { "process_var_name": "quotes_process", "id": 7 }
            })
        );
    }
}
