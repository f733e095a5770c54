//! Property-based tests for the dialog state machine
//!
//! These tests verify key invariants hold across all possible caller input.

use super::transition::{Reply, GOODBYE};
use super::*;
use crate::dispatch::{AmbulanceAssignment, AmbulanceType};
use proptest::prelude::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn test_context() -> CallContext {
    CallContext::new("CA-prop", Some("+15550100".to_string()))
}

/// Drive one caller turn to completion the way the runtime does: effects that
/// answer with an event are fed straight back into the transition.
fn drive_turn(
    state: &CallState,
    event: Event,
    assignment: &AmbulanceAssignment,
) -> (CallState, Reply, Vec<Effect>) {
    let context = test_context();
    let mut current = state.clone();
    let mut pending = vec![event];
    let mut reply = None;
    let mut effects = Vec::new();

    while let Some(event) = pending.pop() {
        let result = transition(&current, &context, event).expect("valid transition");
        current = result.new_state;
        if result.reply.is_some() {
            reply = result.reply;
        }
        for effect in result.effects {
            if let Effect::AssignAmbulance { .. } = effect {
                pending.push(Event::AmbulanceAssigned {
                    assignment: assignment.clone(),
                });
            }
            effects.push(effect);
        }
    }

    (current, reply.expect("every turn ends with a reply"), effects)
}

// ============================================================================
// Arbitrary Generators
// ============================================================================

fn arb_utterance() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-zA-Z0-9 ,.']{0,60}".prop_map(Some),
    ]
}

fn arb_ambulance_type() -> impl Strategy<Value = AmbulanceType> {
    prop_oneof![
        Just(AmbulanceType::IcuSuperSpeciality),
        Just(AmbulanceType::BasicLifeSupport),
    ]
}

fn arb_assignment() -> impl Strategy<Value = AmbulanceAssignment> {
    (
        arb_ambulance_type(),
        "WB [0-9]{2} [A-Z]{2} [0-9]{4}",
        "[A-Z][a-z]{2,8} [A-Z][a-z]{2,8}",
        10_000u32..=99_999,
    )
        .prop_map(|(ambulance_type, vehicle_number, driver_name, suffix)| {
            AmbulanceAssignment {
                ambulance_type,
                vehicle_number,
                driver_name,
                driver_number: format!("+91 98765 {suffix}"),
            }
        })
}

fn arb_visible_step() -> impl Strategy<Value = DialogStep> {
    prop_oneof![
        Just(DialogStep::Greeting),
        Just(DialogStep::GetEmergency),
        Just(DialogStep::GetDetails),
        Just(DialogStep::GetLocation),
        Just(DialogStep::Summary),
        Just(DialogStep::End),
    ]
}

fn caller_turn(utterance: Option<String>) -> Event {
    Event::CallerTurn { utterance }
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    /// Five turns after the greeting walk the visible steps in order, no skips
    #[test]
    fn prop_fresh_call_walks_fixed_sequence(
        utterances in proptest::collection::vec(arb_utterance(), 5),
        assignment in arb_assignment(),
    ) {
        let mut state = CallState::default();
        let mut seen = vec![state.step];

        for utterance in utterances {
            let (next, _, _) = drive_turn(&state, caller_turn(utterance), &assignment);
            seen.push(next.step);
            state = next;
        }

        prop_assert_eq!(
            seen,
            vec![
                DialogStep::Greeting,
                DialogStep::GetEmergency,
                DialogStep::GetDetails,
                DialogStep::GetLocation,
                DialogStep::Summary,
                DialogStep::End,
            ]
        );
    }

    /// Exactly one report and one notification per call, emitted on the turn
    /// that leaves `GetLocation`, and only once the intake is complete
    #[test]
    fn prop_report_and_notification_exactly_once(
        utterances in proptest::collection::vec(arb_utterance(), 5..12),
        assignment in arb_assignment(),
    ) {
        let mut state = CallState::default();
        let mut reports = 0;
        let mut notifications = 0;

        for utterance in utterances {
            let before = state.step;
            let (next, _, effects) = drive_turn(&state, caller_turn(utterance), &assignment);

            for effect in &effects {
                match effect {
                    Effect::WriteReport { .. } => {
                        prop_assert_eq!(before, DialogStep::GetLocation);
                        prop_assert!(next.intake.is_complete());
                        reports += 1;
                    }
                    Effect::SendNotification { .. } => {
                        prop_assert_eq!(before, DialogStep::GetLocation);
                        notifications += 1;
                    }
                    Effect::AssignAmbulance { .. } => {}
                }
            }
            state = next;
        }

        prop_assert_eq!(reports, 1);
        prop_assert_eq!(notifications, 1);
    }

    /// No turn boundary ever leaves the call in the transient step
    #[test]
    fn prop_dispatching_never_observed_between_turns(
        utterances in proptest::collection::vec(arb_utterance(), 1..10),
        assignment in arb_assignment(),
    ) {
        let mut state = CallState::default();
        for utterance in utterances {
            let (next, _, _) = drive_turn(&state, caller_turn(utterance), &assignment);
            prop_assert!(!next.step.is_transient());
            state = next;
        }
    }

    /// End repeats the same goodbye and hang-up forever
    #[test]
    fn prop_end_is_absorbing(
        utterances in proptest::collection::vec(arb_utterance(), 1..8),
        assignment in arb_assignment(),
    ) {
        let mut state = CallState { step: DialogStep::End, intake: CallIntake::default() };
        for utterance in utterances {
            let (next, reply, effects) = drive_turn(&state, caller_turn(utterance), &assignment);
            prop_assert_eq!(next.step, DialogStep::End);
            prop_assert_eq!(reply, Reply::hang_up(GOODBYE));
            prop_assert!(effects.is_empty());
            state = next;
        }
    }

    /// Only the final step hangs up
    #[test]
    fn prop_only_end_hangs_up(
        step in arb_visible_step(),
        utterance in arb_utterance(),
        assignment in arb_assignment(),
    ) {
        let intake = CallIntake {
            emergency_type: Some("Fall".to_string()),
            description: Some("hip pain".to_string()),
            location: None,
            ambulance: None,
        };
        let state = CallState { step, intake };
        let (_, reply, _) = drive_turn(&state, caller_turn(utterance), &assignment);
        prop_assert_eq!(reply.hang_up, step == DialogStep::End);
    }

    /// The summary echoes what the caller said
    #[test]
    fn prop_summary_echoes_intake(
        emergency in "[a-zA-Z ]{1,30}",
        description in "[a-zA-Z ]{0,60}",
        location in "[a-zA-Z0-9 ,]{1,60}",
        assignment in arb_assignment(),
    ) {
        let state = CallState {
            step: DialogStep::GetLocation,
            intake: CallIntake {
                emergency_type: Some(emergency.clone()),
                description: Some(description),
                location: None,
                ambulance: None,
            },
        };
        let (next, reply, _) = drive_turn(&state, Event::utterance(location.clone()), &assignment);

        let expected_emergency = format!("The emergency is: {emergency}.");
        let expected_location = format!("The pickup address is: {location}.");
        prop_assert!(reply.prompt.contains(&expected_emergency));
        prop_assert!(reply.prompt.contains(&expected_location));
        prop_assert!(reply.prompt.contains(assignment.ambulance_type.label()));
        prop_assert_eq!(next.intake.ambulance, Some(assignment));
    }
}
