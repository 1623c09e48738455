//! Operation naming and the typed-operation trait.
//!
//! Operations are named in snake_case on the Rust side (`get_transaction`)
//! and camelCase on the wire (`getTransaction`). The response body element is
//! the wire name with a `Response` suffix.

use serde::Serialize;

use super::category::ServiceCategory;

/// A typed request for one remote operation.
///
/// Implementors serialize to the operation's message body. Keys starting
/// with `@` become attributes of the enclosing element.
pub trait SoapOperation: Serialize {
    /// Snake-case operation name.
    const NAME: &'static str;
    /// Contract the operation belongs to.
    const CATEGORY: ServiceCategory;
}

/// Operations that take no arguments and are sent with an empty body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoArgumentOperation {
    /// End the current session on the server.
    Logout,
    /// Fetch the profile of the logged-in user.
    GetUserInfo,
}

impl NoArgumentOperation {
    /// Snake-case operation name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Logout => "logout",
            Self::GetUserInfo => "get_user_info",
        }
    }

    /// Both no-argument operations live in the security contract.
    pub fn category(self) -> ServiceCategory {
        ServiceCategory::Security
    }
}

/// Every operation this client knows how to send, with its category.
pub const SUPPORTED_OPERATIONS: &[(&str, ServiceCategory)] = &[
    ("login", ServiceCategory::Security),
    ("logout", ServiceCategory::Security),
    ("set_session_currency", ServiceCategory::Security),
    ("get_user_info", ServiceCategory::Security),
    ("get_transaction", ServiceCategory::Commerce),
    ("update_transaction", ServiceCategory::Commerce),
    ("export_file_attachments", ServiceCategory::Commerce),
    ("import_file_attachments", ServiceCategory::Commerce),
];

/// Convert a snake_case operation name to its camelCase wire tag.
///
/// Each underscore followed by a word character is dropped and the
/// character upper-cased. A trailing underscore is kept.
pub fn request_tag(operation: &str) -> String {
    let mut tag = String::with_capacity(operation.len());
    let mut chars = operation.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '_' {
            match chars.peek() {
                Some(&next) if next.is_alphanumeric() || next == '_' => {
                    tag.extend(next.to_uppercase());
                    chars.next();
                }
                _ => tag.push(c),
            }
        } else {
            tag.push(c);
        }
    }
    tag
}

/// Body element the server wraps an operation's result in.
///
/// ```
/// use bigmachines_client::protocol::response_tag;
///
/// assert_eq!(response_tag("get_transaction"), "getTransactionResponse");
/// ```
pub fn response_tag(operation: &str) -> String {
    let mut tag = request_tag(operation);
    tag.push_str("Response");
    tag
}
