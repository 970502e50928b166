//! Login submission and role-based redirect.
//!
//! `LoginFlow` owns the only piece of mutable state: the submission `Phase`.
//! It is published through a `watch` channel so a front end can disable its
//! submit control while a request is in flight. Re-entrancy is decided under
//! the channel lock, so two concurrent submits cannot both reach the network.
//!
//! The redirect after a successful login is a spawned one-shot timer. The
//! server sets the session cookie on the same response, and the routing guard
//! of the destination reads that cookie; the delay (and the optional probe)
//! keep navigation from racing the cookie.

use super::{
    client::AuthClient,
    credentials::{Credentials, FieldErrors},
    errors::LoginError,
    ui::{Navigator, Notifier},
};
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, task::JoinHandle, time::sleep};
use tracing::{Instrument, debug, error, info, info_span, instrument, warn};

pub const SUCCESS_MESSAGE: &str = "Login successful!";
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Something went wrong";
pub const DEFAULT_REDIRECT_DELAY: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    /// Last attempt finished; the form accepts a new submit.
    Done,
}

impl Phase {
    #[must_use]
    pub const fn is_busy(self) -> bool {
        matches!(self, Self::Submitting)
    }

    /// Label for the submit control.
    #[must_use]
    pub const fn submit_label(self) -> &'static str {
        if self.is_busy() {
            "Logging in..."
        } else {
            "Log In"
        }
    }
}

/// How the redirect makes sure the new session is visible before navigating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionReadiness {
    /// Navigate once the redirect delay has elapsed.
    Delay,
    /// After the delay, probe the destination until the session is accepted
    /// or `max_attempts` probes have been made.
    Probe {
        interval: Duration,
        max_attempts: u32,
    },
}

#[derive(Clone, Copy, Debug)]
pub struct FlowConfig {
    redirect_delay: Duration,
    readiness: SessionReadiness,
}

impl FlowConfig {
    /// Default config: 100ms redirect delay, no session probe.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            redirect_delay: DEFAULT_REDIRECT_DELAY,
            readiness: SessionReadiness::Delay,
        }
    }

    #[must_use]
    pub fn with_redirect_delay(mut self, delay: Duration) -> Self {
        self.redirect_delay = delay;
        self
    }

    #[must_use]
    pub fn with_redirect_delay_ms(self, millis: u64) -> Self {
        self.with_redirect_delay(Duration::from_millis(millis))
    }

    #[must_use]
    pub fn with_session_probe(mut self, interval: Duration, max_attempts: u32) -> Self {
        self.readiness = SessionReadiness::Probe {
            interval,
            max_attempts,
        };
        self
    }

    #[must_use]
    pub fn redirect_delay(&self) -> Duration {
        self.redirect_delay
    }

    #[must_use]
    pub fn readiness(&self) -> SessionReadiness {
        self.readiness
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Which branch a submit took. Side effects have already happened through the
/// navigator and notifier by the time this is returned.
#[derive(Debug)]
pub enum Submission {
    /// Required fields missing; nothing was sent.
    Invalid(FieldErrors),
    /// Another submit is still in flight; nothing was sent.
    Busy,
    Redirecting(PendingRedirect),
    Rejected { message: String },
    Failed(LoginError),
}

/// Scheduled navigation after a successful login. Dropping the handle leaves
/// the navigation running.
#[derive(Debug)]
pub struct PendingRedirect {
    destination: &'static str,
    handle: JoinHandle<()>,
}

impl PendingRedirect {
    #[must_use]
    pub const fn destination(&self) -> &'static str {
        self.destination
    }

    /// Abandons the navigation if it has not fired yet.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Waits for the navigation. Returns `false` if it was cancelled.
    pub async fn wait(self) -> bool {
        self.handle.await.is_ok()
    }
}

pub struct LoginFlow<C, N, T> {
    client: Arc<C>,
    navigator: Arc<N>,
    notifier: Arc<T>,
    config: FlowConfig,
    phase: watch::Sender<Phase>,
}

impl<C, N, T> LoginFlow<C, N, T>
where
    C: AuthClient + 'static,
    N: Navigator + 'static,
    T: Notifier + 'static,
{
    pub fn new(client: C, navigator: N, notifier: T, config: FlowConfig) -> Self {
        let (phase, _) = watch::channel(Phase::Idle);
        Self {
            client: Arc::new(client),
            navigator: Arc::new(navigator),
            notifier: Arc::new(notifier),
            config,
            phase,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn config(&self) -> FlowConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    /// Phase updates for driving the submit control.
    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    /// Validates, submits once, and reacts to the outcome.
    ///
    /// Never fails: validation problems, rejections and transport errors are
    /// reported through the returned `Submission` and the notifier, and the
    /// form is left resubmittable on every path.
    #[instrument(skip_all)]
    pub async fn submit(&self, credentials: &Credentials) -> Submission {
        let request = match credentials.validate() {
            Ok(request) => request,
            Err(errors) => {
                debug!("login form incomplete, not submitting");
                return Submission::Invalid(errors);
            }
        };

        let Some(_guard) = self.begin() else {
            debug!("login already in flight");
            return Submission::Busy;
        };

        match self.client.login(&request).await {
            Ok(result) if result.success => {
                self.notifier.success(SUCCESS_MESSAGE);
                let destination = result.role().dashboard();
                info!(destination, "login succeeded");
                Submission::Redirecting(self.schedule_redirect(destination))
            }
            Ok(result) => {
                let message = result.failure_message().to_string();
                info!("login rejected: {message}");
                self.notifier.error(&message);
                Submission::Rejected { message }
            }
            Err(err) => {
                error!("Login error: {err}");
                self.notifier.error(TRANSPORT_FAILURE_MESSAGE);
                Submission::Failed(err)
            }
        }
    }

    /// Moves to `Submitting` unless a submit is already in flight.
    fn begin(&self) -> Option<PhaseGuard<'_>> {
        let acquired = self.phase.send_if_modified(|phase| {
            if phase.is_busy() {
                false
            } else {
                *phase = Phase::Submitting;
                true
            }
        });

        // Only build the guard when acquired: dropping one resets the phase.
        acquired.then(|| PhaseGuard { phase: &self.phase })
    }

    fn schedule_redirect(&self, destination: &'static str) -> PendingRedirect {
        let client = Arc::clone(&self.client);
        let navigator = Arc::clone(&self.navigator);
        let config = self.config;

        let span = info_span!("login.redirect", destination);
        let handle = tokio::spawn(
            async move {
                sleep(config.redirect_delay).await;

                if let SessionReadiness::Probe {
                    interval,
                    max_attempts,
                } = config.readiness
                {
                    wait_for_session(client.as_ref(), destination, interval, max_attempts).await;
                }

                navigator.go_to(destination);
            }
            .instrument(span),
        );

        PendingRedirect {
            destination,
            handle,
        }
    }
}

/// Leaves `Submitting` however the submit ends.
struct PhaseGuard<'a> {
    phase: &'a watch::Sender<Phase>,
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        self.phase.send_replace(Phase::Done);
    }
}

/// Returns `true` once the destination accepts the session. Probe errors
/// count as "not yet".
async fn wait_for_session<C: AuthClient + ?Sized>(
    client: &C,
    path: &str,
    interval: Duration,
    max_attempts: u32,
) -> bool {
    let attempts = max_attempts.max(1);

    for attempt in 1..=attempts {
        match client.session_established(path).await {
            Ok(true) => {
                debug!(attempt, "session visible to routing guard");
                return true;
            }
            Ok(false) => debug!(attempt, "session not visible yet"),
            Err(err) => debug!(attempt, "session probe failed: {err}"),
        }

        if attempt < attempts {
            sleep(interval).await;
        }
    }

    warn!(path, attempts, "session not confirmed, navigating anyway");
    false
}
