//! Property-based tests for the state machine
//!
//! These tests verify key invariants hold across all possible inputs.

use super::transition::*;
use super::*;
use crate::flow::FlowSteps;
use proptest::prelude::*;

// ============================================================================
// Arbitrary Generators
// ============================================================================

/// Visitor/timer actions, resolved against the live state when applied so
/// timers can target the current generation.
#[derive(Debug, Clone)]
enum Action {
    Entry { name: String, email: String },
    Draft { name: String },
    Answer(String),
    Fire,
    StaleFire(u64),
    Reset,
}

fn arb_flow() -> impl Strategy<Value = FlowSteps> {
    proptest::collection::vec("[A-Za-z?]{1,12}", 0..6).prop_map(|questions| {
        FlowSteps::from_questions(
            questions.into_iter().enumerate().map(|(i, q)| (format!("Q{i}"), q)),
            "Calendar Booking",
        )
    })
}

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), Just("   ".to_string()), "[a-z0-9 $]{1,12}"]
}

fn arb_action() -> impl Strategy<Value = Action> {
    prop_oneof![
        (arb_text(), arb_text()).prop_map(|(name, email)| Action::Entry { name, email }),
        arb_text().prop_map(|name| Action::Draft { name }),
        arb_text().prop_map(Action::Answer),
        Just(Action::Fire),
        Just(Action::Fire),
        (0u64..4).prop_map(Action::StaleFire),
        Just(Action::Reset),
    ]
}

fn to_event(action: &Action, state: &PreviewState) -> Event {
    match action {
        Action::Entry { name, email } => Event::submit_entry(name.clone(), email.clone()),
        Action::Draft { name } => Event::UpdateEntry {
            values: IntakeFormValues::new(name.clone(), ""),
        },
        Action::Answer(text) => Event::answer(text.clone()),
        Action::Fire => Event::TypingElapsed {
            generation: state.generation,
        },
        Action::StaleFire(back) => Event::TypingElapsed {
            generation: state.generation.wrapping_sub(back + 1),
        },
        Action::Reset => Event::Reset,
    }
}

fn context_for(flow: FlowSteps) -> PreviewContext {
    PreviewContext::new(flow, Pacing::instant())
}

// ============================================================================
// State Validity Checkers
// ============================================================================

fn is_valid_state(state: &PreviewState, steps: &FlowSteps) -> bool {
    let cursor_ok = state.cursor <= steps.last_index();
    let phase_ok = match state.phase {
        SimPhase::Idle => state.cursor == 0 && state.messages.is_empty(),
        SimPhase::Terminal => state.cursor == steps.last_index(),
        SimPhase::AwaitingUserInput => {
            state.cursor > 0 && state.cursor < steps.last_index()
        }
        SimPhase::AiTyping { .. } => state.cursor < steps.last_index(),
    };
    let draft_ok = state.cursor == 0 || state.draft == IntakeFormValues::default();
    cursor_ok && phase_ok && draft_ok
}

fn effects_are_valid(effects: &[Effect], new_state: &PreviewState) -> bool {
    let schedules: Vec<_> = effects
        .iter()
        .filter_map(|e| match e {
            Effect::ScheduleTyping { generation, .. } => Some(*generation),
            _ => None,
        })
        .collect();

    if schedules.len() > 1 {
        return false;
    }
    if let Some(generation) = schedules.first() {
        if !new_state.phase.is_typing() || *generation != new_state.generation {
            return false;
        }
    }
    true
}

/// Drive a full happy-path run, counting accepted answers
fn run_to_outcome(ctx: &PreviewContext) -> (PreviewState, usize) {
    let mut state = transition(
        &PreviewState::default(),
        ctx,
        Event::submit_entry("A", "a@b.com"),
    )
    .unwrap()
    .new_state;
    let mut answers = 0;

    for _ in 0..64 {
        let event = match state.phase {
            SimPhase::AiTyping { .. } => Event::TypingElapsed {
                generation: state.generation,
            },
            SimPhase::AwaitingUserInput => {
                answers += 1;
                Event::answer(format!("answer {answers}"))
            }
            SimPhase::Terminal => break,
            SimPhase::Idle => unreachable!("run never returns to idle"),
        };
        state = transition(&state, ctx, event).unwrap().new_state;
    }
    (state, answers)
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // Invariant 1: Valid state after any transition
    #[test]
    fn prop_transitions_preserve_validity(
        flow in arb_flow(),
        actions in proptest::collection::vec(arb_action(), 0..30)
    ) {
        let ctx = context_for(flow);
        let mut state = PreviewState::default();

        for action in actions {
            let event = to_event(&action, &state);
            if let Ok(result) = transition(&state, &ctx, event) {
                state = result.new_state;
                prop_assert!(is_valid_state(&state, &ctx.steps), "Invalid state: {:?}", state);
                prop_assert!(
                    effects_are_valid(&result.effects, &state),
                    "Invalid effects for state {:?}: {:?}",
                    state,
                    result.effects
                );
            }
        }
    }

    // Invariant 2: Cursor never moves backwards except on reset
    #[test]
    fn prop_cursor_monotonic(
        flow in arb_flow(),
        actions in proptest::collection::vec(arb_action(), 0..30)
    ) {
        let ctx = context_for(flow);
        let mut state = PreviewState::default();

        for action in actions {
            let event = to_event(&action, &state);
            let is_reset = event == Event::Reset;
            if let Ok(result) = transition(&state, &ctx, event) {
                if !is_reset {
                    prop_assert!(result.new_state.cursor >= state.cursor);
                    prop_assert!(result.new_state.messages.len() >= state.messages.len());
                    prop_assert!(result.new_state.messages.starts_with(&state.messages));
                }
                state = result.new_state;
            }
        }
    }

    // Invariant 3: Reset from anywhere lands on a clean intake form
    #[test]
    fn prop_reset_always_returns_to_idle(
        flow in arb_flow(),
        actions in proptest::collection::vec(arb_action(), 0..30)
    ) {
        let ctx = context_for(flow);
        let mut state = PreviewState::default();
        for action in actions {
            let event = to_event(&action, &state);
            if let Ok(result) = transition(&state, &ctx, event) {
                state = result.new_state;
            }
        }

        let once = transition(&state, &ctx, Event::Reset).unwrap();
        prop_assert!(once.new_state.is_idle());
        prop_assert_eq!(once.new_state.cursor, 0);
        prop_assert!(once.new_state.messages.is_empty());
        prop_assert_eq!(&once.new_state.draft, &IntakeFormValues::default());
        prop_assert!(once.effects.contains(&Effect::CancelTyping));

        let twice = transition(&once.new_state, &ctx, Event::Reset).unwrap();
        prop_assert_eq!(once.new_state, twice.new_state);
    }

    // Invariant 4: A timer tagged with any other generation never applies
    #[test]
    fn prop_stale_timer_never_applies(
        flow in arb_flow(),
        actions in proptest::collection::vec(arb_action(), 0..20),
        back in 0u64..8
    ) {
        let ctx = context_for(flow);
        let mut state = PreviewState::default();
        for action in actions {
            let event = to_event(&action, &state);
            if let Ok(result) = transition(&state, &ctx, event) {
                state = result.new_state;
            }
        }

        let stale = Event::TypingElapsed { generation: state.generation.wrapping_sub(back + 1) };
        let is_stale_error = matches!(
            transition(&state, &ctx, stale),
            Err(TransitionError::StaleTimer { .. })
        );
        prop_assert!(is_stale_error);
    }

    // Invariant 5: Exactly one answer per question reaches the outcome
    #[test]
    fn prop_terminal_after_one_answer_per_question(flow in arb_flow()) {
        let ctx = context_for(flow);
        let (state, answers) = run_to_outcome(&ctx);

        prop_assert_eq!(state.phase, SimPhase::Terminal);
        prop_assert_eq!(state.cursor, ctx.steps.last_index());
        prop_assert_eq!(answers, ctx.steps.len() - 2);

        let ai_messages = state.messages.iter().filter(|m| m.author == Author::Ai).count();
        prop_assert_eq!(ai_messages, ctx.steps.len() - 2);
    }

    // Invariant 6: Incomplete entries never leave the intake form
    #[test]
    fn prop_incomplete_entry_is_noop(name in arb_text(), flow in arb_flow()) {
        let ctx = context_for(flow);
        let values = IntakeFormValues::new(name, "");
        let result = transition(&PreviewState::default(), &ctx, Event::SubmitEntry { values });
        prop_assert_eq!(result.unwrap_err(), TransitionError::IncompleteEntry);
    }
}
