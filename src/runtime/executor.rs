//! Per-call dialog runtime

use super::traits::{MessagingChannel, ReportSink};
use crate::dialog::{
    transition, CallContext, CallState, DialogStep, Effect, Event, Reply, TransitionError,
};
use crate::dispatch::{AmbulanceAssignment, Fleet};
use crate::notification::NotificationSender;
use crate::report::ReportError;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors that abort a caller turn
#[derive(Debug, Error)]
pub enum TurnError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Failed to write call report: {0}")]
    Report(#[from] ReportError),
    #[error("Turn finished without a reply")]
    NoReply,
}

/// Collaborators shared by every call
pub struct CallServices<R, M>
where
    R: ReportSink + 'static,
    M: MessagingChannel + 'static,
{
    pub reports: R,
    pub notifier: NotificationSender<M>,
    pub fleet: Fleet,
    rng: Mutex<StdRng>,
}

impl<R, M> CallServices<R, M>
where
    R: ReportSink + 'static,
    M: MessagingChannel + 'static,
{
    pub fn new(reports: R, notifier: NotificationSender<M>, fleet: Fleet, rng: StdRng) -> Self {
        Self {
            reports,
            notifier,
            fleet,
            rng: Mutex::new(rng),
        }
    }

    fn assign_ambulance(&self, description: &str) -> AmbulanceAssignment {
        let mut rng = self.rng.lock().unwrap();
        self.fleet.assign(description, &mut *rng)
    }
}

/// One call's dialog: the pure state machine plus the effects it asks for
pub struct CallSession<R, M>
where
    R: ReportSink + 'static,
    M: MessagingChannel + 'static,
{
    context: CallContext,
    state: CallState,
    services: Arc<CallServices<R, M>>,
}

impl<R, M> CallSession<R, M>
where
    R: ReportSink + 'static,
    M: MessagingChannel + 'static,
{
    pub fn new(context: CallContext, services: Arc<CallServices<R, M>>) -> Self {
        Self {
            context,
            state: CallState::default(),
            services,
        }
    }

    pub fn context(&self) -> &CallContext {
        &self.context
    }

    #[cfg(test)]
    pub fn state(&self) -> &CallState {
        &self.state
    }

    pub fn step(&self) -> DialogStep {
        self.state.step
    }

    /// Start over as a brand-new call on the same call id
    pub fn restart(&mut self, caller_phone: Option<String>) {
        self.context = CallContext::new(self.context.call_id.clone(), caller_phone);
        self.state = CallState::default();
    }

    /// Run one caller turn to completion and return what to say next
    pub async fn handle_turn(&mut self, utterance: Option<String>) -> Result<Reply, TurnError> {
        let mut events_to_process = vec![Event::CallerTurn { utterance }];
        let mut reply = None;

        while let Some(event) = events_to_process.pop() {
            // Pure state transition
            let result = transition(&self.state, &self.context, event)?;

            let old_step = self.state.step;
            self.state = result.new_state;
            if old_step != self.state.step {
                tracing::info!(
                    call_sid = %self.context.call_id,
                    from = old_step.as_str(),
                    to = self.state.step.as_str(),
                    "Dialog advanced"
                );
                if self.state.step.is_terminal() {
                    tracing::info!(call_sid = %self.context.call_id, "Call ended");
                }
            }

            if result.reply.is_some() {
                reply = result.reply;
            }

            for effect in result.effects {
                if let Some(generated_event) = self.execute_effect(effect).await? {
                    events_to_process.push(generated_event);
                }
            }
        }

        debug_assert!(!self.state.step.is_transient());
        reply.ok_or(TurnError::NoReply)
    }

    async fn execute_effect(&self, effect: Effect) -> Result<Option<Event>, TurnError> {
        match effect {
            Effect::AssignAmbulance { description } => {
                let assignment = self.services.assign_ambulance(&description);
                tracing::info!(
                    call_sid = %self.context.call_id,
                    ambulance_type = %assignment.ambulance_type,
                    vehicle = %assignment.vehicle_number,
                    driver = %assignment.driver_name,
                    "Ambulance assigned"
                );
                Ok(Some(Event::AmbulanceAssigned { assignment }))
            }

            Effect::WriteReport { record } => {
                self.services.reports.append(&record).await?;
                Ok(None)
            }

            // Delivery problems never reach the caller
            Effect::SendNotification { to, assignment } => {
                match self
                    .services
                    .notifier
                    .send_summary(to.as_deref(), &assignment)
                    .await
                {
                    Ok(sid) => tracing::info!(
                        call_sid = %self.context.call_id,
                        to = to.as_deref().unwrap_or_default(),
                        message_sid = %sid,
                        "SMS summary sent"
                    ),
                    Err(e) => tracing::error!(
                        call_sid = %self.context.call_id,
                        error = %e,
                        "Could not send SMS summary"
                    ),
                }
                Ok(None)
            }
        }
    }
}
