//! Effects produced by state transitions

use super::state::ChatMessage;
use std::time::Duration;

/// Effects to be executed after state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Arm the single typing timer, replacing whatever was armed
    ScheduleTyping { delay: Duration, generation: u64 },

    /// Disarm the typing timer
    CancelTyping,

    /// A message became visible
    NotifyMessage { message: ChatMessage },

    /// The outcome panel became visible
    NotifyOutcome,

    /// The run was wiped back to the intake form
    NotifyReset,
}

impl Effect {
    pub fn schedule(delay: Duration, generation: u64) -> Self {
        Effect::ScheduleTyping { delay, generation }
    }

    pub fn notify_message(message: ChatMessage) -> Self {
        Effect::NotifyMessage { message }
    }
}
