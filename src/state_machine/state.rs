//! Preview state types

use crate::flow::FlowSteps;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// Chat Messages
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    Ai,
    User,
}

/// One bubble in the simulated chat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
}

impl ChatMessage {
    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            author: Author::Ai,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            author: Author::User,
            text: text.into(),
        }
    }
}

/// Name + email captured by the static intake step
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IntakeFormValues {
    pub name: String,
    pub email: String,
}

impl IntakeFormValues {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// Both fields carry something other than whitespace
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.email.trim().is_empty()
    }
}

// ============================================================================
// Simulator State
// ============================================================================

/// What the AI will do once the typing delay elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PendingTurn {
    /// Post the configured greeting, then type the first question
    Greeting,
    /// Post the content of the question at `index`
    AskQuestion { index: usize },
    /// Move to the outcome step without posting anything
    Conclude,
}

/// Simulator phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimPhase {
    /// Intake form on screen, waiting for name + email
    #[default]
    Idle,

    /// Typing indicator shown, one delayed turn pending
    AiTyping { pending: PendingTurn },

    /// Waiting for the visitor's free-text answer
    AwaitingUserInput,

    /// Outcome reached; only reset is accepted
    Terminal,
}

impl SimPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SimPhase::Terminal)
    }

    pub fn is_typing(&self) -> bool {
        matches!(self, SimPhase::AiTyping { .. })
    }
}

/// Everything the simulator owns for one run
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreviewState {
    pub phase: SimPhase,
    /// Index of the step being presented
    pub cursor: usize,
    pub messages: Vec<ChatMessage>,
    /// Intake draft, only meaningful while the cursor is 0
    pub draft: IntakeFormValues,
    /// Tag of the most recently scheduled typing timer
    pub generation: u64,
}

impl PreviewState {
    pub fn is_idle(&self) -> bool {
        self.phase == SimPhase::Idle
    }

    /// Fresh run state that still remembers the last timer tag, so timers
    /// scheduled before the reset can never match again.
    pub fn reset_from(&self) -> Self {
        Self {
            generation: self.generation,
            ..Self::default()
        }
    }
}

// ============================================================================
// Context
// ============================================================================

pub const DEFAULT_ENTRY_DELAY: Duration = Duration::from_millis(600);
pub const DEFAULT_QUESTION_DELAY: Duration = Duration::from_millis(1200);
pub const DEFAULT_OUTCOME_DELAY: Duration = Duration::from_millis(1500);

/// Cosmetic latency of each AI turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pacing {
    /// After the intake form is submitted
    pub entry: Duration,
    /// Before each question appears
    pub question: Duration,
    /// Before the outcome panel appears
    pub outcome: Duration,
    /// Optional preamble posted before the first question
    pub greeting: Option<String>,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            entry: DEFAULT_ENTRY_DELAY,
            question: DEFAULT_QUESTION_DELAY,
            outcome: DEFAULT_OUTCOME_DELAY,
            greeting: None,
        }
    }
}

impl Pacing {
    /// No latency at all
    pub fn instant() -> Self {
        Self {
            entry: Duration::ZERO,
            question: Duration::ZERO,
            outcome: Duration::ZERO,
            greeting: None,
        }
    }

    #[must_use]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }
}

/// Immutable inputs to a run
#[derive(Debug, Clone)]
pub struct PreviewContext {
    pub steps: Arc<FlowSteps>,
    pub pacing: Pacing,
}

impl PreviewContext {
    pub fn new(steps: impl Into<Arc<FlowSteps>>, pacing: Pacing) -> Self {
        Self {
            steps: steps.into(),
            pacing,
        }
    }
}
