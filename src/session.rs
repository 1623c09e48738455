//! Session token holder.
//!
//! The session id is issued by `login` and echoed in the header of every
//! later call. It is validated server-side only.

use serde_json::Value;

/// Zero-or-one session token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    id: Option<String>,
}

impl Session {
    /// A session with no token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current token, if any.
    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Whether a token is held.
    #[inline]
    pub fn is_established(&self) -> bool {
        self.id.is_some()
    }

    /// Replace the token.
    pub fn set(&mut self, id: Option<String>) {
        self.id = id;
    }

    /// Drop the token.
    pub fn clear(&mut self) {
        self.id = None;
    }

    /// Adopt the token from a login response.
    ///
    /// A response without `userInfo.sessionId` leaves no session.
    pub fn establish_from(&mut self, login_response: &Value) {
        self.id = session_id_from(login_response);
    }
}

fn session_id_from(login_response: &Value) -> Option<String> {
    match login_response.get("userInfo")?.get("sessionId")? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
