//! Commerce transaction returned by `getTransaction`.

use serde_json::{Map, Value};

use super::field_text;

/// A commerce transaction and its document data.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    raw: Value,
}

impl Transaction {
    /// Wrap the unwrapped `getTransactionResponse` value.
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    fn transaction(&self) -> Option<&Map<String, Value>> {
        self.raw.get("transaction").and_then(Value::as_object)
    }

    /// Transaction id.
    pub fn id(&self) -> Option<String> {
        self.transaction()?.get("id").and_then(field_text)
    }

    /// Commerce process the transaction belongs to.
    pub fn process_var_name(&self) -> Option<String> {
        self.transaction()?.get("process_var_name").and_then(field_text)
    }

    /// Document element (e.g. `quote_process`) inside `data_xml`.
    ///
    /// A transaction with several line documents of the same name yields
    /// the first one.
    pub fn document(&self, var_name: &str) -> Option<&Map<String, Value>> {
        let document = self.transaction()?.get("data_xml")?.get(var_name)?;
        match document {
            Value::Array(items) => items.first().and_then(Value::as_object),
            other => other.as_object(),
        }
    }

    /// One field of a document, as text.
    pub fn field(&self, var_name: &str, field: &str) -> Option<String> {
        self.document(var_name)?.get(field).and_then(field_text)
    }

    /// The full response value.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Consume and return the response value.
    pub fn into_raw(self) -> Value {
        self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Transaction {
        Transaction::new(json!({
            "status": { "success": true },
            "transaction": {
                "id": "26539349",
                "process_var_name": "quotes_process",
                "data_xml": {
                    "quote_process": {
                        "@bs_id": "26539349",
                        "opportunityName_quote": "Foo",
                        "_document_number": "1"
                    }
                }
            }
        }))
    }

    #[test]
    fn test_accessors() {
        let tx = sample();
        assert_eq!(tx.id().as_deref(), Some("26539349"));
        assert_eq!(tx.process_var_name().as_deref(), Some("quotes_process"));
        assert_eq!(tx.field("quote_process", "opportunityName_quote").as_deref(), Some("Foo"));
        assert!(tx.document("missing").is_none());
    }

    #[test]
    fn test_repeated_documents_yield_first() {
        let tx = Transaction::new(json!({
            "transaction": { "data_xml": { "line": [ { "n": "1" }, { "n": "2" } ] } }
        }));
        assert_eq!(tx.field("line", "n").as_deref(), Some("1"));
    }

    #[test]
    fn test_empty_response() {
        let tx = Transaction::new(Value::Null);
        assert!(tx.id().is_none());
        assert_eq!(tx.into_raw(), Value::Null);
    }
}
