//! Events that can occur during a call

use crate::dispatch::AmbulanceAssignment;

/// Events that trigger state transitions
#[derive(Debug, Clone)]
pub enum Event {
    /// The platform delivered a caller turn. `None` on the very first request
    /// of a call, before any speech has been captured.
    CallerTurn { utterance: Option<String> },

    /// The runtime finished drawing an ambulance for this call
    AmbulanceAssigned { assignment: AmbulanceAssignment },
}

#[cfg(test)]
impl Event {
    /// First request of a call, no speech yet
    pub fn connected() -> Self {
        Event::CallerTurn { utterance: None }
    }

    pub fn utterance(text: impl Into<String>) -> Self {
        Event::CallerTurn {
            utterance: Some(text.into()),
        }
    }
}
