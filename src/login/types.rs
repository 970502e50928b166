//! Response payload of the login endpoint. The body is read as loose JSON so
//! that an unexpected shape degrades to "no role" / "no message" instead of a
//! hard failure; only a body that is not JSON at all is an error.

use super::role::Role;
use serde_json::Value;

/// Shown when a rejection carries no usable `message`.
pub const FALLBACK_FAILURE_MESSAGE: &str = "Login failed";

/// Outcome of one login attempt as reported by the server.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthResult {
    pub success: bool,
    pub role: Option<String>,
    pub message: Option<String>,
}

impl AuthResult {
    /// Builds the result from the HTTP success signal and the decoded body.
    #[must_use]
    pub fn from_body(success: bool, body: &Value) -> Self {
        let role = body
            .get("user")
            .and_then(|user| user.get("role"))
            .and_then(Value::as_str)
            .map(str::to_string);
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string);

        Self {
            success,
            role,
            message,
        }
    }

    #[must_use]
    pub fn role(&self) -> Role {
        Role::from_wire(self.role.as_deref())
    }

    /// Message for the error toast; empty strings count as missing.
    #[must_use]
    pub fn failure_message(&self) -> &str {
        self.message
            .as_deref()
            .filter(|message| !message.is_empty())
            .unwrap_or(FALLBACK_FAILURE_MESSAGE)
    }
}
