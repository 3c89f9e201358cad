//! Preview simulator: applies transitions and executes their effects

use super::traits::Scheduler;
use super::PreviewUpdate;
use crate::flow::FlowSteps;
use crate::render::{render, PreviewView};
use crate::state_machine::{
    transition, Effect, Event, PreviewContext, PreviewState, TransitionError,
};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Owns one run's state and its typing timer
pub struct Simulator<S: Scheduler> {
    context: PreviewContext,
    state: PreviewState,
    scheduler: S,
    updates: broadcast::Sender<PreviewUpdate>,
}

impl<S: Scheduler> Simulator<S> {
    pub fn new(
        context: PreviewContext,
        scheduler: S,
        updates: broadcast::Sender<PreviewUpdate>,
    ) -> Self {
        Self {
            context,
            state: PreviewState::default(),
            scheduler,
            updates,
        }
    }

    pub fn state(&self) -> &PreviewState {
        &self.state
    }

    pub fn context(&self) -> &PreviewContext {
        &self.context
    }

    pub fn steps(&self) -> &Arc<FlowSteps> {
        &self.context.steps
    }

    pub fn view(&self) -> PreviewView {
        render(&self.state, &self.context.steps)
    }

    #[cfg(test)]
    pub(crate) fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Apply one event. Refused events leave the state untouched and are
    /// only reported back to the caller.
    pub fn handle(&mut self, event: Event) -> Result<(), TransitionError> {
        let result = transition(&self.state, &self.context, event)?;
        self.state = result.new_state;

        for effect in result.effects {
            self.execute_effect(effect);
        }

        let _ = self.updates.send(PreviewUpdate::StateChange {
            phase: self.state.phase,
            cursor: self.state.cursor,
        });
        Ok(())
    }

    /// Apply an event the way the UI does: refusals are silent no-ops.
    /// Returns whether the event was accepted.
    pub fn dispatch(&mut self, event: Event) -> bool {
        match self.handle(event) {
            Ok(()) => true,
            Err(e @ TransitionError::StaleTimer { .. }) => {
                tracing::trace!(error = %e, "Suppressed stale timer");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, phase = ?self.state.phase, "Ignoring preview input");
                false
            }
        }
    }

    /// Start over from the intake form
    pub fn reset(&mut self) {
        // Reset is accepted from every phase
        let accepted = self.dispatch(Event::Reset);
        debug_assert!(accepted);
    }

    /// Swap in a new step sequence; always paired with a reset
    pub fn load_steps(&mut self, steps: impl Into<Arc<FlowSteps>>) {
        self.context.steps = steps.into();
        self.reset();
        let _ = self.updates.send(PreviewUpdate::FlowLoaded {
            steps: (*self.context.steps).clone(),
        });
    }

    fn execute_effect(&mut self, effect: Effect) {
        match effect {
            Effect::ScheduleTyping { delay, generation } => {
                tracing::trace!(?delay, generation, "Scheduling AI turn");
                self.scheduler.arm(delay, generation);
                let _ = self.updates.send(PreviewUpdate::Typing);
            }
            Effect::CancelTyping => self.scheduler.cancel(),
            Effect::NotifyMessage { message } => {
                let _ = self.updates.send(PreviewUpdate::Message { message });
            }
            Effect::NotifyOutcome => {
                let outcome = self.context.steps.outcome();
                let _ = self.updates.send(PreviewUpdate::Outcome {
                    title: outcome.title.clone(),
                    content: outcome.content.clone(),
                });
            }
            Effect::NotifyReset => {
                let _ = self.updates.send(PreviewUpdate::Reset);
            }
        }
    }
}
