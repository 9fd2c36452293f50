//! Guess sessions: one state container per browser form.
//!
//! Each submission gets a ticket. Submitting again aborts the in-flight guess
//! and only the outcome carrying the latest ticket is ever published, so a
//! slow earlier guess cannot overwrite a newer one.

use crate::config::Config;
use crate::errors::GuessError;
use crate::guesser::{validate_name, GuessService};
use crate::models::{GuessResult, GuessState};
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use uuid::Uuid;

pub struct GuessSession {
    id: Uuid,
    service: Arc<GuessService>,
    state: watch::Sender<GuessState>,
    last_ticket: AtomicU64,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl GuessSession {
    pub fn new(service: Arc<GuessService>) -> Arc<Self> {
        let (state, _) = watch::channel(GuessState::Idle);
        Arc::new(Self {
            id: Uuid::new_v4(),
            service,
            state,
            last_ticket: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn snapshot(&self) -> GuessState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<GuessState> {
        self.state.subscribe()
    }

    /// Starts a guess and returns its ticket.
    ///
    /// A blank name is rejected without touching the current state. Any guess
    /// still running for this session is aborted.
    pub fn submit(self: &Arc<Self>, name: &str) -> Result<u64, GuessError> {
        let name = validate_name(name)?.to_string();

        // Held until the new task is registered so concurrent submits stay ordered.
        let mut in_flight = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let ticket = self.last_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = in_flight.take() {
            previous.abort();
            tracing::debug!(
                "Session {}: ticket {} supersedes the in-flight guess",
                self.id,
                ticket
            );
        }

        self.state.send_replace(GuessState::Loading { ticket });
        tracing::info!("Session {}: submitted ticket {}", self.id, ticket);

        let session = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let outcome = session.service.guess(&name).await;
            session.settle(ticket, outcome);
        });
        *in_flight = Some(handle.abort_handle());

        Ok(ticket)
    }

    /// Publishes the outcome of `ticket` if it is still the one loading.
    fn settle(&self, ticket: u64, outcome: Result<GuessResult, GuessError>) -> bool {
        let next = match outcome {
            Ok(result) => GuessState::Success { ticket, result },
            Err(err) => GuessState::Failure {
                ticket,
                error: err.user_message().to_string(),
            },
        };

        let applied = self.state.send_if_modified(|current| {
            if current.is_loading() && current.ticket() == Some(ticket) {
                *current = next;
                true
            } else {
                false
            }
        });

        if !applied {
            tracing::debug!(
                "Session {}: discarding stale outcome for ticket {}",
                self.id,
                ticket
            );
        }
        applied
    }

    /// Waits until `ticket` settles.
    ///
    /// Returns `None` once a newer submission has taken over.
    pub async fn wait_settled(&self, ticket: u64) -> Option<GuessState> {
        let mut rx = self.state.subscribe();
        let state = rx
            .wait_for(|state| state.ticket() != Some(ticket) || !state.is_loading())
            .await
            .ok()?
            .clone();

        if state.ticket() == Some(ticket) {
            Some(state)
        } else {
            None
        }
    }
}

/// Live guess sessions, evicted after a period without access.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Arc<GuessSession>>,
    service: Arc<GuessService>,
}

impl SessionStore {
    pub fn new(service: Arc<GuessService>, config: &Config) -> Self {
        let sessions = Cache::builder()
            .time_to_idle(Duration::from_secs(config.session_idle_secs))
            .max_capacity(config.session_capacity)
            .build();

        Self { sessions, service }
    }

    pub async fn create(&self) -> Arc<GuessSession> {
        let session = GuessSession::new(Arc::clone(&self.service));
        self.sessions.insert(session.id(), Arc::clone(&session)).await;
        tracing::debug!("Created guess session {}", session.id());
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<GuessSession>> {
        self.sessions.get(id).await
    }
}
