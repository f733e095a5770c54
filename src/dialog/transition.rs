//! Pure state transition function

use super::{CallContext, CallIntake, CallState, DialogStep, Effect, Event};
use crate::dispatch::AmbulanceAssignment;
use crate::report::{CallReportRecord, CALL_TIME_FORMAT};
use thiserror::Error;

pub const GREETING_PROMPT: &str =
    "Hello, this is the emergency ambulance service. What is your emergency?";
pub const LOCATION_PROMPT: &str =
    "Thank you. Now, please tell me the full address for the pickup, including a nearby landmark.";
pub const CLOSING_QUESTION: &str =
    "A summary of this call has been saved. Is there anything else I can help you with?";
pub const GOODBYE: &str = "Thank you for using our service. Goodbye.";

/// What to say to the caller at the end of a turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub prompt: String,
    pub hang_up: bool,
}

impl Reply {
    pub fn ask(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            hang_up: false,
        }
    }

    pub fn hang_up(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            hang_up: true,
        }
    }
}

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: CallState,
    /// `None` while the turn is still waiting on an effect
    pub reply: Option<Reply>,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: CallState) -> Self {
        Self {
            new_state: state,
            reply: None,
            effects: vec![],
        }
    }

    pub fn with_reply(mut self, reply: Reply) -> Self {
        self.reply = Some(reply);
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Ambulance dispatch in progress, cannot accept caller input")]
    DispatchInProgress,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
///
/// Given the same inputs it always produces the same outputs. Caller input is
/// never validated: a missing utterance is stored as an empty string.
pub fn transition(
    state: &CallState,
    context: &CallContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.step, event) {
        // A new call always starts from a clean intake
        (DialogStep::Greeting, Event::CallerTurn { .. }) => Ok(TransitionResult::new(CallState {
            step: DialogStep::GetEmergency,
            intake: CallIntake::default(),
        })
        .with_reply(Reply::ask(GREETING_PROMPT))),

        (DialogStep::GetEmergency, Event::CallerTurn { utterance }) => {
            let emergency_type = utterance.unwrap_or_default();
            let prompt = format!(
                "I understand you have a {emergency_type} emergency. Can you please provide more details about the patient's condition?"
            );
            let mut intake = state.intake.clone();
            intake.emergency_type = Some(emergency_type);

            Ok(TransitionResult::new(CallState {
                step: DialogStep::GetDetails,
                intake,
            })
            .with_reply(Reply::ask(prompt)))
        }

        (DialogStep::GetDetails, Event::CallerTurn { utterance }) => {
            let mut intake = state.intake.clone();
            intake.description = Some(utterance.unwrap_or_default());

            Ok(TransitionResult::new(CallState {
                step: DialogStep::GetLocation,
                intake,
            })
            .with_reply(Reply::ask(LOCATION_PROMPT)))
        }

        // GetLocation -> Dispatching; the reply waits for the assignment
        (DialogStep::GetLocation, Event::CallerTurn { utterance }) => {
            let mut intake = state.intake.clone();
            intake.location = Some(utterance.unwrap_or_default());
            let description = intake.description.clone().unwrap_or_default();

            Ok(TransitionResult::new(CallState {
                step: DialogStep::Dispatching,
                intake,
            })
            .with_effect(Effect::AssignAmbulance { description }))
        }

        (DialogStep::Dispatching, Event::CallerTurn { .. }) => {
            Err(TransitionError::DispatchInProgress)
        }

        // Dispatching -> Summary: the only place reports and notifications originate
        (DialogStep::Dispatching, Event::AmbulanceAssigned { assignment }) => {
            let mut intake = state.intake.clone();
            if !intake.is_complete() {
                return Err(TransitionError::InvalidTransition(
                    "ambulance assigned before intake was complete".to_string(),
                ));
            }
            let record = build_report(context, &intake, &assignment);
            let prompt = summary_prompt(&intake, &assignment);
            let notification =
                Effect::send_notification(context.caller_phone.as_deref(), &assignment);
            intake.ambulance = Some(assignment);

            Ok(TransitionResult::new(CallState {
                step: DialogStep::Summary,
                intake,
            })
            .with_reply(Reply::ask(prompt))
            .with_effect(Effect::WriteReport { record })
            .with_effect(notification))
        }

        (DialogStep::Summary, Event::CallerTurn { .. }) => Ok(TransitionResult::new(CallState {
            step: DialogStep::End,
            intake: state.intake.clone(),
        })
        .with_reply(Reply::ask(CLOSING_QUESTION))),

        (DialogStep::End, Event::CallerTurn { .. }) => {
            Ok(TransitionResult::new(state.clone()).with_reply(Reply::hang_up(GOODBYE)))
        }

        (step, event @ Event::AmbulanceAssigned { .. }) => Err(TransitionError::InvalidTransition(
            format!("No transition from {} with event {event:?}", step.as_str()),
        )),
    }
}

/// Spoken read-back of the whole case
pub fn summary_prompt(intake: &CallIntake, assignment: &AmbulanceAssignment) -> String {
    format!(
        "OK. I have booked an ambulance and sent the details to your phone. Here is a summary of your case. \
         The emergency is: {}. \
         The pickup address is: {}. \
         We have assigned a {}. \
         The vehicle number is {}. \
         The driver is {}, and their number is {}. \
         The ambulance will arrive shortly.",
        intake.emergency_type.as_deref().unwrap_or_default(),
        intake.location.as_deref().unwrap_or_default(),
        assignment.ambulance_type,
        assignment.vehicle_number,
        assignment.driver_name,
        assignment.driver_number,
    )
}

fn build_report(
    context: &CallContext,
    intake: &CallIntake,
    assignment: &AmbulanceAssignment,
) -> CallReportRecord {
    CallReportRecord {
        call_time: context.started_at.format(CALL_TIME_FORMAT).to_string(),
        user_phone: context.caller_phone.clone().unwrap_or_default(),
        emergency_type: intake.emergency_type.clone().unwrap_or_default(),
        description: intake.description.clone().unwrap_or_default(),
        location: intake.location.clone().unwrap_or_default(),
        ambulance_type: assignment.ambulance_type.label().to_string(),
        ambulance_car_number: assignment.vehicle_number.clone(),
        driver_name: assignment.driver_name.clone(),
        driver_number: assignment.driver_number.clone(),
    }
}
