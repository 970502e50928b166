use anyhow::{Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_URL: &str = "url";
pub const ARG_EMAIL: &str = "email";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_REDIRECT_DELAY_MS: &str = "redirect-delay-ms";
pub const ARG_WAIT_FOR_SESSION: &str = "wait-for-session";
pub const ARG_SESSION_PROBE_ATTEMPTS: &str = "session-probe-attempts";
pub const ARG_SESSION_PROBE_INTERVAL_MS: &str = "session-probe-interval-ms";
pub const ARG_TIMEOUT_SECONDS: &str = "timeout-seconds";

#[must_use]
pub fn with_args(command: Command) -> Command {
    let command = with_form_args(command);
    with_redirect_args(command)
}

fn with_form_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_URL)
                .short('u')
                .long(ARG_URL)
                .help("Base URL of the Donar web application")
                .env("DONAR_URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new(ARG_EMAIL)
                .short('e')
                .long(ARG_EMAIL)
                .help("Account email, prompted for when missing on a terminal")
                .env("DONAR_EMAIL"),
        )
        .arg(
            Arg::new(ARG_PASSWORD)
                .long(ARG_PASSWORD)
                .help("Account password, prompted for when missing on a terminal")
                .env("DONAR_PASSWORD")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_TIMEOUT_SECONDS)
                .long(ARG_TIMEOUT_SECONDS)
                .help("Request timeout in seconds")
                .env("DONAR_TIMEOUT_SECONDS")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

fn with_redirect_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_REDIRECT_DELAY_MS)
                .long(ARG_REDIRECT_DELAY_MS)
                .help("Delay before redirecting after a successful login, in milliseconds")
                .env("DONAR_REDIRECT_DELAY_MS")
                .default_value("100")
                .value_parser(clap::value_parser!(u64)),
        )
        .arg(
            Arg::new(ARG_WAIT_FOR_SESSION)
                .long(ARG_WAIT_FOR_SESSION)
                .help("Probe the dashboard until it accepts the session before redirecting")
                .env("DONAR_WAIT_FOR_SESSION")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_SESSION_PROBE_ATTEMPTS)
                .long(ARG_SESSION_PROBE_ATTEMPTS)
                .help("Maximum number of session probes")
                .env("DONAR_SESSION_PROBE_ATTEMPTS")
                .default_value("5")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_SESSION_PROBE_INTERVAL_MS)
                .long(ARG_SESSION_PROBE_INTERVAL_MS)
                .help("Pause between session probes, in milliseconds")
                .env("DONAR_SESSION_PROBE_INTERVAL_MS")
                .default_value("100")
                .value_parser(clap::value_parser!(u64)),
        )
}

/// Login options parsed from CLI matches.
#[derive(Debug)]
pub struct Options {
    pub url: String,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub timeout_seconds: u64,
    pub redirect_delay_ms: u64,
    pub wait_for_session: bool,
    pub session_probe_attempts: u32,
    pub session_probe_interval_ms: u64,
}

impl Options {
    /// # Errors
    /// Returns an error if an argument with a default value is missing.
    pub fn parse(matches: &ArgMatches) -> Result<Self> {
        Ok(Self {
            url: matches
                .get_one::<String>(ARG_URL)
                .cloned()
                .context("missing required argument: --url")?,
            email: matches.get_one::<String>(ARG_EMAIL).cloned(),
            password: matches
                .get_one::<String>(ARG_PASSWORD)
                .map(|password| SecretString::from(password.clone())),
            timeout_seconds: matches
                .get_one::<u64>(ARG_TIMEOUT_SECONDS)
                .copied()
                .unwrap_or(10),
            redirect_delay_ms: matches
                .get_one::<u64>(ARG_REDIRECT_DELAY_MS)
                .copied()
                .unwrap_or(100),
            wait_for_session: matches.get_flag(ARG_WAIT_FOR_SESSION),
            session_probe_attempts: matches
                .get_one::<u32>(ARG_SESSION_PROBE_ATTEMPTS)
                .copied()
                .unwrap_or(5),
            session_probe_interval_ms: matches
                .get_one::<u64>(ARG_SESSION_PROBE_INTERVAL_MS)
                .copied()
                .unwrap_or(100),
        })
    }
}
