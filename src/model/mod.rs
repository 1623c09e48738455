//! Domain objects built from unwrapped responses.
//!
//! Each type keeps the raw response value and exposes typed accessors for
//! the fields callers commonly need.

mod attachment;
mod transaction;
mod user_info;

pub use attachment::{Attachment, ExportedAttachments, MimeAttachment};
pub use transaction::Transaction;
pub use user_info::UserInfo;

use serde_json::Value;

/// Text of a scalar field; numbers and booleans are rendered as text.
pub(crate) fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
