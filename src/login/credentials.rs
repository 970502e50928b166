//! Login form fields and their presence checks. The password is kept behind
//! `SecretString` and only exposed while the request body is serialised.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use thiserror::Error;

/// Inline message for a single form field.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("Email is required")]
    EmailRequired,
    #[error("Enter a valid email address")]
    EmailInvalid,
    #[error("Password is required")]
    PasswordRequired,
}

impl FieldError {
    /// Form field the message belongs to.
    #[must_use]
    pub const fn field(self) -> Field {
        match self {
            Self::EmailRequired | Self::EmailInvalid => Field::Email,
            Self::PasswordRequired => Field::Password,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
}

/// Field messages collected from one validation pass, in form order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.iter().copied().find(|err| err.field() == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    fn push(&mut self, err: FieldError) {
        self.0.push(err);
    }
}

#[derive(Clone, Debug)]
pub struct Credentials {
    email: String,
    password: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: SecretString) -> Self {
        Self {
            email: email.into(),
            password,
        }
    }

    /// Email as submitted, with surrounding whitespace removed.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.trim()
    }

    /// Checks presence of both fields and the shape of the email.
    ///
    /// # Errors
    /// Returns every field message that applies; the form must not be
    /// submitted while any is present.
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        let email = self.email();
        if email.is_empty() {
            errors.push(FieldError::EmailRequired);
        } else if !is_email_shaped(email) {
            errors.push(FieldError::EmailInvalid);
        }

        // Whitespace is a legitimate password character.
        if self.password.expose_secret().is_empty() {
            errors.push(FieldError::PasswordRequired);
        }

        if errors.is_empty() {
            Ok(LoginRequest {
                email: email.to_string(),
                password: self.password.clone(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Validated request body for `POST /api/login`. Must never be logged.
#[derive(Clone, Debug)]
pub struct LoginRequest {
    email: String,
    password: SecretString,
}

impl LoginRequest {
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }
}

impl Serialize for LoginRequest {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        Body {
            email: &self.email,
            password: self.password.expose_secret(),
        }
        .serialize(serializer)
    }
}

/// Same acceptance rule as a browser `type="email"` input, minus the
/// character-class details: `local@domain`, no whitespace, no empty labels.
fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.is_empty()
        && !domain.contains('@')
        && domain.split('.').all(|label| !label.is_empty())
}
