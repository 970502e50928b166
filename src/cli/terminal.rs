//! Terminal stand-ins for the page: prompts for the form fields, toast lines
//! on stderr, and navigation as the resolved URL on stdout.

use crate::login::{Field, FieldErrors, Navigator, Notifier};
use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, Password, theme::ColorfulTheme};
use secrecy::SecretString;
use std::io::{self, IsTerminal};
use tracing::{info, warn};
use url::Url;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[must_use]
pub fn toast_line(kind: ToastKind, message: &str) -> String {
    match kind {
        ToastKind::Success => format!("✔ {message}"),
        ToastKind::Error => format!("✘ {message}"),
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn success(&self, message: &str) {
        eprintln!("{}", toast_line(ToastKind::Success, message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", toast_line(ToastKind::Error, message));
    }
}

/// Prints the absolute URL of every destination on stdout.
#[derive(Clone, Debug)]
pub struct TerminalNavigator {
    base_url: Url,
}

impl TerminalNavigator {
    #[must_use]
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// # Errors
    /// Returns an error if `path` cannot be joined onto the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(path)
    }
}

impl Navigator for TerminalNavigator {
    fn go_to(&self, path: &str) {
        match self.resolve(path) {
            Ok(url) => {
                info!(%url, "navigating");
                println!("{url}");
            }
            Err(err) => warn!(path, "cannot resolve destination: {err}"),
        }
    }
}

#[must_use]
pub fn is_interactive() -> bool {
    io::stdin().is_terminal() && io::stderr().is_terminal()
}

#[must_use]
pub const fn field_label(field: Field) -> &'static str {
    match field {
        Field::Email => "Email",
        Field::Password => "Password",
    }
}

pub fn print_field_errors(errors: &FieldErrors) {
    for err in errors.iter() {
        eprintln!("  {}: {err}", field_label(err.field()));
    }
}

pub fn print_register_hint(register_url: &Url) {
    eprintln!("Don't have an account? Register: {register_url}");
}

/// # Errors
/// Returns an error if the terminal cannot be read.
pub fn prompt_email(initial: Option<String>) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme)
        .with_prompt(field_label(Field::Email))
        .allow_empty(true);
    if let Some(initial) = initial {
        input = input.with_initial_text(initial);
    }

    input.interact_text().context("failed to read email")
}

/// # Errors
/// Returns an error if the terminal cannot be read.
pub fn prompt_password() -> Result<SecretString> {
    let theme = ColorfulTheme::default();
    let password = Password::with_theme(&theme)
        .with_prompt(field_label(Field::Password))
        .allow_empty_password(true)
        .interact()
        .context("failed to read password")?;

    Ok(SecretString::from(password))
}

/// # Errors
/// Returns an error if the terminal cannot be read.
pub fn confirm_retry() -> Result<bool> {
    let theme = ColorfulTheme::default();
    Confirm::with_theme(&theme)
        .with_prompt("Try again?")
        .default(true)
        .interact()
        .context("failed to read answer")
}
