//! Call dialog state types

use crate::dispatch::AmbulanceAssignment;
use chrono::{DateTime, Local};

/// Position in the scripted dialog
///
/// Visible steps advance strictly in declaration order. `Dispatching` is
/// transient: the runtime enters and leaves it within a single caller turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogStep {
    /// Call just connected, nothing asked yet
    #[default]
    Greeting,
    /// Waiting for the emergency type
    GetEmergency,
    /// Waiting for the patient's condition
    GetDetails,
    /// Waiting for the pickup address
    GetLocation,
    /// Location captured, ambulance assignment in progress
    Dispatching,
    /// Summary read back, waiting for the caller's last words
    Summary,
    /// Terminal: every further turn says goodbye and hangs up
    End,
}

impl DialogStep {
    /// Check if no further progress is possible
    pub fn is_terminal(self) -> bool {
        matches!(self, DialogStep::End)
    }

    /// Check if this step is only ever observed mid-turn
    pub fn is_transient(self) -> bool {
        matches!(self, DialogStep::Dispatching)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DialogStep::Greeting => "GREETING",
            DialogStep::GetEmergency => "GET_EMERGENCY",
            DialogStep::GetDetails => "GET_DETAILS",
            DialogStep::GetLocation => "GET_LOCATION",
            DialogStep::Dispatching => "DISPATCHING",
            DialogStep::Summary => "SUMMARY",
            DialogStep::End => "END",
        }
    }
}

/// Answers collected from the caller so far
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallIntake {
    pub emergency_type: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub ambulance: Option<AmbulanceAssignment>,
}

impl CallIntake {
    /// All three caller answers are present
    pub fn is_complete(&self) -> bool {
        self.emergency_type.is_some() && self.description.is_some() && self.location.is_some()
    }
}

/// Mutable dialog state of one call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallState {
    pub step: DialogStep,
    pub intake: CallIntake,
}

/// Immutable facts about one call
#[derive(Debug, Clone)]
pub struct CallContext {
    pub call_id: String,
    pub caller_phone: Option<String>,
    pub started_at: DateTime<Local>,
}

impl CallContext {
    pub fn new(call_id: impl Into<String>, caller_phone: Option<String>) -> Self {
        Self {
            call_id: call_id.into(),
            caller_phone,
            started_at: Local::now(),
        }
    }
}
