//! Call dialog state machine
//!
//! Pure state transitions in the Elm Architecture style: the transition
//! function returns the next state, the reply to speak and the effects the
//! runtime must execute. It never performs I/O itself.

mod effect;
pub mod event;
pub mod state;
pub(crate) mod transition;

#[cfg(test)]
mod proptests;

pub use effect::Effect;
pub use event::Event;
pub use state::{CallContext, CallIntake, CallState, DialogStep};
pub use transition::{transition, Reply, TransitionError};
