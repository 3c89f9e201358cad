//! Pure state transition function
//!
//! Given the same state, context and event this always produces the same new
//! state and effects. Timers, broadcasting and logging live in the runtime.

use super::{
    ChatMessage, Effect, Event, IntakeFormValues, PendingTurn, PreviewContext, PreviewState,
    SimPhase,
};
use std::time::Duration;
use thiserror::Error;

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub new_state: PreviewState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: PreviewState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

/// Why an event was refused. None of these change state; the runtime treats
/// them as silent no-ops.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Name and email are both required")]
    IncompleteEntry,
    #[error("Answer is empty")]
    EmptyAnswer,
    #[error("AI is typing, input ignored")]
    Busy,
    #[error("Preview has reached its outcome, reset to start over")]
    Finished,
    #[error("Stale typing timer (generation {received}, current {current})")]
    StaleTimer { received: u64, current: u64 },
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function
pub fn transition(
    state: &PreviewState,
    context: &PreviewContext,
    event: Event,
) -> Result<TransitionResult, TransitionError> {
    match (state.phase, event) {
        // ============================================================
        // Reset (valid from every phase)
        // ============================================================
        (_, Event::Reset) => Ok(TransitionResult::new(state.reset_from())
            .with_effect(Effect::CancelTyping)
            .with_effect(Effect::NotifyReset)),

        // ============================================================
        // Intake form
        // ============================================================
        (SimPhase::Idle, Event::UpdateEntry { values }) => {
            let mut next = state.clone();
            next.draft = values;
            Ok(TransitionResult::new(next))
        }

        (SimPhase::Idle, Event::SubmitEntry { values }) => {
            if !values.is_complete() {
                return Err(TransitionError::IncompleteEntry);
            }

            let steps = &context.steps;
            let has_questions = !steps.is_outcome(1);
            let pending = match (&context.pacing.greeting, has_questions) {
                (_, false) => PendingTurn::Conclude,
                (Some(_), true) => PendingTurn::Greeting,
                (None, true) => PendingTurn::AskQuestion { index: 1 },
            };

            let mut next = state.clone();
            next.draft = IntakeFormValues::default();
            if has_questions {
                next.cursor = 1;
            }
            Ok(schedule(next, pending, context.pacing.entry))
        }

        // ============================================================
        // Chat answers
        // ============================================================
        (SimPhase::AwaitingUserInput, Event::SubmitAnswer { text }) => {
            if text.trim().is_empty() {
                return Err(TransitionError::EmptyAnswer);
            }

            let message = ChatMessage::user(text);
            let mut next = state.clone();
            next.messages.push(message.clone());

            let next_index = state.cursor + 1;
            let (pending, delay) = if context.steps.is_outcome(next_index) {
                (PendingTurn::Conclude, context.pacing.outcome)
            } else {
                next.cursor = next_index;
                (
                    PendingTurn::AskQuestion { index: next_index },
                    context.pacing.question,
                )
            };

            Ok(schedule(next, pending, delay).with_effect(Effect::notify_message(message)))
        }

        // ============================================================
        // Typing timer
        // ============================================================
        (SimPhase::AiTyping { pending }, Event::TypingElapsed { generation })
            if generation == state.generation =>
        {
            Ok(elapse(state, context, pending))
        }

        (_, Event::TypingElapsed { generation }) => Err(TransitionError::StaleTimer {
            received: generation,
            current: state.generation,
        }),

        // ============================================================
        // Refused input
        // ============================================================
        (SimPhase::AiTyping { .. }, _) => Err(TransitionError::Busy),

        (SimPhase::Terminal, _) => Err(TransitionError::Finished),

        (phase, event) => Err(TransitionError::InvalidTransition(format!(
            "No transition from {phase:?} with event {event:?}"
        ))),
    }
}

/// Enter `AiTyping` with a freshly tagged timer
fn schedule(mut next: PreviewState, pending: PendingTurn, delay: Duration) -> TransitionResult {
    next.generation += 1;
    next.phase = SimPhase::AiTyping { pending };
    let generation = next.generation;
    TransitionResult::new(next).with_effect(Effect::schedule(delay, generation))
}

fn elapse(state: &PreviewState, context: &PreviewContext, pending: PendingTurn) -> TransitionResult {
    let steps = &context.steps;
    let mut next = state.clone();

    match pending {
        PendingTurn::Greeting => {
            let greeting = context.pacing.greeting.clone().unwrap_or_default();
            let message = ChatMessage::ai(greeting);
            next.messages.push(message.clone());
            schedule(
                next,
                PendingTurn::AskQuestion { index: 1 },
                context.pacing.question,
            )
            .with_effect(Effect::notify_message(message))
        }
        PendingTurn::AskQuestion { index } => {
            let message = ChatMessage::ai(steps.step_at(index).content.clone());
            next.messages.push(message.clone());
            next.cursor = index.min(steps.last_index());
            next.phase = SimPhase::AwaitingUserInput;
            TransitionResult::new(next).with_effect(Effect::notify_message(message))
        }
        PendingTurn::Conclude => {
            next.cursor = steps.last_index();
            next.phase = SimPhase::Terminal;
            TransitionResult::new(next).with_effect(Effect::NotifyOutcome)
        }
    }
}
