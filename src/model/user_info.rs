//! Profile of the logged-in user, from `getUserInfo`.

use serde_json::{Map, Value};

use super::field_text;

#[derive(Debug, Clone, PartialEq)]
pub struct UserInfo {
    raw: Value,
}

impl UserInfo {
    /// Wrap the unwrapped `getUserInfoResponse` value.
    pub fn new(raw: Value) -> Self {
        Self { raw }
    }

    fn info(&self) -> Option<&Map<String, Value>> {
        self.raw.get("userInfo").and_then(Value::as_object)
    }

    /// Any field of the `userInfo` block, as text.
    pub fn get(&self, field: &str) -> Option<String> {
        self.info()?.get(field).and_then(field_text)
    }

    pub fn login(&self) -> Option<String> {
        self.get("login")
    }

    pub fn email(&self) -> Option<String> {
        self.get("email")
    }

    pub fn first_name(&self) -> Option<String> {
        self.get("first_name")
    }

    pub fn last_name(&self) -> Option<String> {
        self.get("last_name")
    }

    pub fn company_name(&self) -> Option<String> {
        self.get("company_name")
    }

    pub fn currency_preference(&self) -> Option<String> {
        self.get("currency_preference")
    }

    /// The full response value.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fields() {
        let info = UserInfo::new(json!({
            "status": { "success": true },
            "userInfo": {
                "login": "alice",
                "email": "alice@example.com",
                "first_name": "Alice",
                "company_name": "Acme",
                "currency_preference": "USD"
            }
        }));
        assert_eq!(info.login().as_deref(), Some("alice"));
        assert_eq!(info.email().as_deref(), Some("alice@example.com"));
        assert_eq!(info.first_name().as_deref(), Some("Alice"));
        assert_eq!(info.last_name(), None);
        assert_eq!(info.company_name().as_deref(), Some("Acme"));
        assert_eq!(info.currency_preference().as_deref(), Some("USD"));
    }
}
