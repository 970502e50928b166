//! # Donar login client
//!
//! `donar-login` submits email/password credentials to the Donar web
//! application's `POST /api/login` endpoint and sends the user to the
//! dashboard that matches the role returned by the server.
//!
//! ## Flow
//!
//! 1. **Validate:** both fields are required; nothing is sent while a field is
//!    missing and each missing field gets its own inline message.
//! 2. **Submit:** a single JSON `POST` carries the credentials. The flow is
//!    `Submitting` until the response is parsed, and a second submit during
//!    that window is refused.
//! 3. **Redirect:** on success the role picks one of
//!    `/dashboard/organization`, `/dashboard/donor`, `/dashboard/admin` or
//!    `/dashboard`. Navigation is scheduled after a short delay so the
//!    session cookie issued by the same response is visible to the routing
//!    guard, optionally confirmed by probing the destination.
//!
//! Routing and toast display are injected (`Navigator`, `Notifier`), so the
//! flow runs the same under the terminal front end and under tests.

pub mod cli;
pub mod login;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
