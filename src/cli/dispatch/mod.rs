//! Maps validated CLI matches to the action the binary executes.

use crate::cli::actions::{Action, login::Args};
use crate::cli::{commands::login, terminal};
use anyhow::Result;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let options = login::Options::parse(matches)?;

    Ok(Action::Login(Args {
        url: options.url,
        email: options.email,
        password: options.password,
        timeout_seconds: options.timeout_seconds,
        redirect_delay_ms: options.redirect_delay_ms,
        wait_for_session: options.wait_for_session,
        session_probe_attempts: options.session_probe_attempts,
        session_probe_interval_ms: options.session_probe_interval_ms,
        interactive: terminal::is_interactive(),
    }))
}
