use crate::cli::terminal::{self, TerminalNavigator, TerminalNotifier};
use crate::login::{Credentials, Field, FlowConfig, HttpAuthClient, LoginFlow, Phase, Submission};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{process::ExitCode, time::Duration};
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub url: String,
    pub email: Option<String>,
    pub password: Option<SecretString>,
    pub timeout_seconds: u64,
    pub redirect_delay_ms: u64,
    pub wait_for_session: bool,
    pub session_probe_attempts: u32,
    pub session_probe_interval_ms: u64,
    /// Prompt for missing fields and offer a retry after a failed attempt.
    pub interactive: bool,
}

impl Args {
    fn flow_config(&self) -> FlowConfig {
        let config = FlowConfig::new().with_redirect_delay_ms(self.redirect_delay_ms);

        if self.wait_for_session {
            config.with_session_probe(
                Duration::from_millis(self.session_probe_interval_ms),
                self.session_probe_attempts,
            )
        } else {
            config
        }
    }
}

/// Execute the login action.
///
/// When interactive, missing fields are prompted for and a failed attempt can be
/// retried; otherwise a single attempt is made with the given flags.
///
/// # Errors
/// Returns an error if the base URL is invalid or the terminal cannot be read.
pub async fn execute(args: Args) -> Result<ExitCode> {
    let config = args.flow_config();
    let client =
        HttpAuthClient::with_timeout(&args.url, Duration::from_secs(args.timeout_seconds))
            .with_context(|| format!("invalid DONAR_URL: {}", args.url))?;
    let register_url = client.register_url()?;
    let navigator = TerminalNavigator::new(client.base_url().clone());
    let flow = LoginFlow::new(client, navigator, TerminalNotifier, config);

    let interactive = args.interactive;
    let progress = report_progress(flow.subscribe());

    let mut email = args.email;
    let mut password = args.password;
    let mut ask_email = email.is_none();
    let mut ask_password = password.is_none();

    let code = loop {
        if interactive && ask_email {
            let initial = email.take();
            email = Some(blocking(move || terminal::prompt_email(initial)).await?);
        }
        if interactive && ask_password {
            password = Some(blocking(terminal::prompt_password).await?);
        }

        let credentials = Credentials::new(
            email.clone().unwrap_or_default(),
            password
                .clone()
                .unwrap_or_else(|| SecretString::from(String::new())),
        );

        match flow.submit(&credentials).await {
            Submission::Redirecting(pending) => {
                debug!(destination = pending.destination(), "waiting for redirect");
                break if pending.wait().await {
                    ExitCode::SUCCESS
                } else {
                    ExitCode::FAILURE
                };
            }
            Submission::Invalid(errors) => {
                terminal::print_field_errors(&errors);
                if !interactive {
                    break ExitCode::FAILURE;
                }
                ask_email = errors.get(Field::Email).is_some();
                ask_password = errors.get(Field::Password).is_some();
            }
            Submission::Rejected { .. } | Submission::Failed(_) => {
                terminal::print_register_hint(&register_url);
                if !interactive || !blocking(terminal::confirm_retry).await? {
                    break ExitCode::FAILURE;
                }
                ask_email = false;
                ask_password = true;
            }
            Submission::Busy => break ExitCode::FAILURE,
        }
    };

    progress.abort();
    Ok(code)
}

/// Prints the busy label whenever a submit starts.
fn report_progress(mut phases: watch::Receiver<Phase>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while phases.changed().await.is_ok() {
            let phase = *phases.borrow_and_update();
            if phase.is_busy() {
                eprintln!("{}", phase.submit_label());
            }
        }
    })
}

async fn blocking<T, F>(prompt: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(prompt)
        .await
        .context("terminal prompt task failed")?
}
