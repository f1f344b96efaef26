use std::{str::FromStr, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Serialize;
use shared::{
    domain::{Credentials, StudentRecord},
    error::{SessionError, SessionPhase},
    protocol::LookupOutcome,
};
use storage::RecordStore;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

pub mod report;

pub const DEFAULT_LOOKUP_LATENCY: Duration = Duration::from_millis(1500);
const SESSION_EVENT_CAPACITY: usize = 32;

#[async_trait]
pub trait LookupService: Send + Sync {
    async fn check_result(&self, credentials: &Credentials) -> LookupOutcome;
}

/// Resolves credentials against an in-memory [`RecordStore`] after a fixed
/// delay, keeping callers in a visible pending state like a remote check would.
#[derive(Debug, Clone)]
pub struct StoreLookupService {
    store: RecordStore,
    latency: Duration,
}

impl StoreLookupService {
    pub fn new(store: RecordStore, latency: Duration) -> Self {
        Self { store, latency }
    }

    pub fn with_default_latency(store: RecordStore) -> Self {
        Self::new(store, DEFAULT_LOOKUP_LATENCY)
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }
}

#[async_trait]
impl LookupService for StoreLookupService {
    async fn check_result(&self, credentials: &Credentials) -> LookupOutcome {
        debug!(
            registration_number = %credentials.registration_number,
            latency_ms = self.latency.as_millis() as u64,
            "checking result"
        );
        tokio::time::sleep(self.latency).await;

        match self
            .store
            .find_by_credentials(&credentials.registration_number, &credentials.pin)
        {
            Some(record) => {
                info!(
                    registration_number = %record.registration_number,
                    "result found"
                );
                LookupOutcome::Success(record.clone())
            }
            None => {
                warn!(
                    registration_number = %credentials.registration_number,
                    "no result for supplied credentials"
                );
                LookupOutcome::invalid_credentials()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    RegistrationNumber,
    Pin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown form field '{0}'")]
pub struct UnknownFormField(pub String);

impl FromStr for FormField {
    type Err = UnknownFormField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regNo" | "registration_number" | "registrationNumber" => Ok(Self::RegistrationNumber),
            "pin" => Ok(Self::Pin),
            other => Err(UnknownFormField(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Login,
    Result,
}

/// Everything a presentation layer needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub view: View,
    pub phase: SessionPhase,
    pub form: Credentials,
    pub error: Option<String>,
    pub loading: bool,
    pub record: Option<StudentRecord>,
}

#[derive(Debug, Clone)]
pub enum SessionEvent {
    StateChanged(SessionSnapshot),
}

/// Result of a `submit_credentials` call that was accepted or skipped.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    Completed(LookupOutcome),
    /// A lookup was already in flight; nothing changed.
    Ignored,
}

#[derive(Debug, Clone, Default)]
enum Phase {
    #[default]
    LoggedOut,
    Checking,
    Authenticated(StudentRecord),
}

#[derive(Debug, Default)]
struct SessionState {
    phase: Phase,
    form: Credentials,
    error: Option<String>,
}

impl SessionState {
    fn phase(&self) -> SessionPhase {
        match self.phase {
            Phase::LoggedOut => SessionPhase::LoggedOut,
            Phase::Checking => SessionPhase::Checking,
            Phase::Authenticated(_) => SessionPhase::Authenticated,
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        let record = match &self.phase {
            Phase::Authenticated(record) => Some(record.clone()),
            _ => None,
        };
        SessionSnapshot {
            view: if record.is_some() {
                View::Result
            } else {
                View::Login
            },
            phase: self.phase(),
            form: self.form.clone(),
            error: self.error.clone(),
            loading: matches!(self.phase, Phase::Checking),
            record,
        }
    }

    fn invalid(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.phase(),
        }
    }
}

/// One login/result session. Owns its form and state exclusively; at most
/// one lookup is in flight at a time.
pub struct SessionController {
    lookup: Arc<dyn LookupService>,
    inner: Mutex<SessionState>,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    pub fn new(lookup: Arc<dyn LookupService>) -> Arc<Self> {
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Arc::new(Self {
            lookup,
            inner: Mutex::new(SessionState::default()),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.snapshot()
    }

    pub async fn update_field(
        &self,
        field: FormField,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        let mut state = self.inner.lock().await;
        if !matches!(state.phase, Phase::LoggedOut) {
            return Err(state.invalid("update form"));
        }

        let value = value.into();
        match field {
            FormField::RegistrationNumber => state.form.registration_number = value,
            FormField::Pin => state.form.pin = value,
        }
        state.error = None;
        self.publish(&state);
        Ok(())
    }

    /// The lookup runs on its own task and settles the session even if the
    /// returned future is dropped before it resolves.
    pub async fn submit_credentials(self: &Arc<Self>) -> Result<Submission, SessionError> {
        let credentials = {
            let mut state = self.inner.lock().await;
            match state.phase {
                Phase::LoggedOut => {}
                Phase::Checking => {
                    debug!("lookup already in flight; ignoring submission");
                    return Ok(Submission::Ignored);
                }
                Phase::Authenticated(_) => return Err(state.invalid("submit credentials")),
            }

            state.error = None;
            state.phase = Phase::Checking;
            self.publish(&state);
            state.form.clone()
        };

        let session = Arc::clone(self);
        let lookup = tokio::spawn(async move {
            let outcome = session.lookup.check_result(&credentials).await;
            session.settle(&outcome).await;
            outcome
        });

        match lookup.await {
            Ok(outcome) => Ok(Submission::Completed(outcome)),
            Err(error) => {
                self.abandon_check().await;
                if error.is_panic() {
                    std::panic::resume_unwind(error.into_panic());
                }
                Err(SessionError::LookupAborted)
            }
        }
    }

    async fn settle(&self, outcome: &LookupOutcome) {
        let mut state = self.inner.lock().await;
        match outcome {
            LookupOutcome::Success(record) => {
                state.phase = Phase::Authenticated(record.clone());
                state.error = None;
            }
            LookupOutcome::Failure { reason } => {
                state.phase = Phase::LoggedOut;
                state.error = Some(reason.user_message().to_string());
            }
        }
        self.publish(&state);
    }

    async fn abandon_check(&self) {
        let mut state = self.inner.lock().await;
        if matches!(state.phase, Phase::Checking) {
            warn!("lookup task ended without an outcome; returning to login");
            state.phase = Phase::LoggedOut;
            self.publish(&state);
        }
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        let mut state = self.inner.lock().await;
        if !matches!(state.phase, Phase::Authenticated(_)) {
            return Err(state.invalid("log out"));
        }

        *state = SessionState::default();
        info!("session logged out");
        self.publish(&state);
        Ok(())
    }

    fn publish(&self, state: &SessionState) {
        let _ = self
            .events
            .send(SessionEvent::StateChanged(state.snapshot()));
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
