//! Login feature: credential validation, submission to `/api/login`, and the
//! role-based redirect that follows. It keeps authentication logic out of the
//! front end, which only supplies a `Navigator` and a `Notifier`. Passwords
//! are carried as `SecretString` and must never be logged.

pub mod client;
pub mod credentials;
pub mod errors;
pub mod flow;
pub mod role;
pub mod types;
pub mod ui;

pub use client::{AuthClient, HttpAuthClient};
pub use credentials::{Credentials, Field, FieldError, FieldErrors, LoginRequest};
pub use errors::LoginError;
pub use flow::{FlowConfig, LoginFlow, Phase, PendingRedirect, SessionReadiness, Submission};
pub use role::Role;
pub use types::AuthResult;
pub use ui::{Navigator, Notifier};
