//! Effects produced by state transitions

use crate::dispatch::AmbulanceAssignment;
use crate::report::CallReportRecord;

/// Effects to be executed after a state transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Draw an ambulance for the given description; answers with
    /// `Event::AmbulanceAssigned`
    AssignAmbulance { description: String },

    /// Append the call report. Failure aborts the turn.
    WriteReport { record: CallReportRecord },

    /// Text the assignment to the caller. Failure is logged and ignored.
    SendNotification {
        to: Option<String>,
        assignment: AmbulanceAssignment,
    },
}

impl Effect {
    pub fn send_notification(to: Option<&str>, assignment: &AmbulanceAssignment) -> Self {
        Effect::SendNotification {
            to: to.map(String::from),
            assignment: assignment.clone(),
        }
    }
}
