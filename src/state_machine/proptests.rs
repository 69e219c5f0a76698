//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::event::ChatContext;
use super::record::{ConversationRecord, Step, Topic};
use super::transition::transition;
use chrono::Utc;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

const KNOWN_STEP_CODES: [u32; 14] = [0, 1, 10, 11, 12, 13, 20, 21, 22, 23, 40, 41, 42, 999];

fn arb_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        proptest::sample::select(KNOWN_STEP_CODES.to_vec()).prop_map(Step::from),
        any::<u32>().prop_map(Step::from),
    ]
}

fn arb_topic() -> impl Strategy<Value = Option<Topic>> {
    prop_oneof![
        Just(None),
        Just(Some(Topic::Licitaciones)),
        Just(Some(Topic::Proyectos)),
        Just(Some(Topic::Representante)),
    ]
}

fn arb_record() -> impl Strategy<Value = ConversationRecord> {
    (
        arb_step(),
        arb_topic(),
        proptest::option::of("[a-zA-Z ]{0,30}"),
        proptest::option::of("[a-z0-9@.]{0,30}"),
        proptest::option::of("[a-zA-Z0-9 ]{0,60}"),
    )
        .prop_map(|(step, topic, nombre, email, consulta)| ConversationRecord {
            step,
            topic,
            nombre,
            email,
            consulta,
            last_updated: Utc::now(),
        })
}

fn arb_body() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9@.<>&' ]{0,60}"
}

// ============================================================================
// Invariants
// ============================================================================

proptest! {
    /// Step codes survive the integer wire encoding for every u32.
    #[test]
    fn step_code_round_trips(code in any::<u32>()) {
        prop_assert_eq!(Step::from(code).code(), code);
    }

    /// A transition without a persist effect leaves the record untouched —
    /// rejected input can never corrupt stored state.
    #[test]
    fn rejection_leaves_record_unchanged(
        record in arb_record(),
        body in arb_body(),
        within_hours in any::<bool>(),
    ) {
        let result = transition(&record, &body, &ChatContext::new(within_hours));
        if !result.persists() {
            prop_assert_eq!(result.record, record);
        }
    }

    /// Whatever the input, a persisted record always lands on a step in the
    /// dialogue graph: `Unrecognized` can be loaded, never produced.
    #[test]
    fn persisted_steps_are_always_mapped(
        record in arb_record(),
        body in arb_body(),
    ) {
        let result = transition(&record, &body, &ChatContext::new(true));
        if result.persists() {
            prop_assert!(!matches!(result.record.step, Step::Unrecognized(_)));
            prop_assert!(KNOWN_STEP_CODES.contains(&result.record.step.code()));
        }
    }

    /// Every non-terminal record answers with at least one reply; the
    /// terminal step stays silent.
    #[test]
    fn only_the_human_step_is_silent(
        record in arb_record(),
        body in arb_body(),
    ) {
        let result = transition(&record, &body, &ChatContext::new(true));
        if matches!(record.step, Step::Human) {
            prop_assert!(result.replies().is_empty());
        } else {
            prop_assert!(!result.replies().is_empty());
        }
    }

    /// Captured fields are never silently dropped by later transitions: a
    /// persisted result keeps any name already stored, except through a
    /// topic-clearing return to the menu (which only clears the topic).
    #[test]
    fn captured_name_survives_transitions(
        record in arb_record(),
        body in arb_body(),
    ) {
        let result = transition(&record, &body, &ChatContext::new(true));
        if result.persists() && record.nombre.is_some() {
            prop_assert_eq!(result.record.nombre.is_some(), true);
        }
    }
}
