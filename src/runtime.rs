//! Runtime for executing calls
//!
//! Sessions are keyed by the platform's call identifier, so simultaneous
//! calls never share dialog state. Turns on the same call are serialized.

mod executor;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::{CallServices, CallSession, TurnError};
pub use traits::*;

use crate::dialog::{CallContext, DialogStep, Reply};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

/// Session key used when the platform does not send a call identifier
pub const FALLBACK_CALL_ID: &str = "anonymous";

/// Type alias for the runtime the HTTP layer uses
pub type SharedSessionManager = SessionManager<Arc<dyn ReportSink>, Arc<dyn MessagingChannel>>;

/// One inbound webhook turn, already stripped of transport details
#[derive(Debug, Clone, Default)]
pub struct TurnRequest {
    pub call_id: Option<String>,
    pub caller_phone: Option<String>,
    pub utterance: Option<String>,
}

struct SessionEntry<R, M>
where
    R: ReportSink + 'static,
    M: MessagingChannel + 'static,
{
    session: Arc<Mutex<CallSession<R, M>>>,
    /// Refreshed on every turn, so only idle calls expire
    last_activity: std::sync::Mutex<Instant>,
}

impl<R, M> SessionEntry<R, M>
where
    R: ReportSink + 'static,
    M: MessagingChannel + 'static,
{
    fn touch(&self) -> Arc<Mutex<CallSession<R, M>>> {
        *self.last_activity.lock().unwrap() = Instant::now();
        Arc::clone(&self.session)
    }

    fn idle_for(&self) -> Duration {
        self.last_activity.lock().unwrap().elapsed()
    }
}

/// Manager for all live call sessions
pub struct SessionManager<R, M>
where
    R: ReportSink + 'static,
    M: MessagingChannel + 'static,
{
    services: Arc<CallServices<R, M>>,
    sessions: RwLock<HashMap<String, SessionEntry<R, M>>>,
    session_ttl: Duration,
}

impl<R, M> SessionManager<R, M>
where
    R: ReportSink + 'static,
    M: MessagingChannel + 'static,
{
    pub fn new(services: CallServices<R, M>, session_ttl: Duration) -> Self {
        Self {
            services: Arc::new(services),
            sessions: RwLock::new(HashMap::new()),
            session_ttl,
        }
    }

    /// Feed one caller turn into its session and return the reply
    pub async fn handle_turn(&self, request: TurnRequest) -> Result<Reply, TurnError> {
        let call_id = request
            .call_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| FALLBACK_CALL_ID.to_string());

        let session = self.get_or_create(&call_id, request.caller_phone.clone()).await;
        let mut session = session.lock().await;

        // A call still at the greeting is a new call: drop anything left over
        if session.step() == DialogStep::Greeting {
            session.restart(request.caller_phone);
            tracing::info!(
                call_sid = %call_id,
                caller = session.context().caller_phone.as_deref().unwrap_or_default(),
                "Call started"
            );
        }

        session.handle_turn(request.utterance).await
    }

    /// Number of sessions currently held
    #[cfg(test)]
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn get_or_create(
        &self,
        call_id: &str,
        caller_phone: Option<String>,
    ) -> Arc<Mutex<CallSession<R, M>>> {
        if let Some(entry) = self.sessions.read().await.get(call_id) {
            return entry.touch();
        }

        let mut sessions = self.sessions.write().await;
        // Another turn may have created it between the two locks
        if let Some(entry) = sessions.get(call_id) {
            return entry.touch();
        }

        let ttl = self.session_ttl;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.idle_for() < ttl);
        if sessions.len() < before {
            tracing::debug!(evicted = before - sessions.len(), "Evicted expired call sessions");
        }

        let session = Arc::new(Mutex::new(CallSession::new(
            CallContext::new(call_id, caller_phone),
            Arc::clone(&self.services),
        )));
        sessions.insert(
            call_id.to_string(),
            SessionEntry {
                session: Arc::clone(&session),
                last_activity: std::sync::Mutex::new(Instant::now()),
            },
        );
        tracing::debug!(call_sid = %call_id, active = sessions.len(), "Call session created");
        session
    }
}
