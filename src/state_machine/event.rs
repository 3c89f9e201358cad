//! Events that can occur during a preview run

use super::state::IntakeFormValues;

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    // Visitor events
    UpdateEntry { values: IntakeFormValues },
    SubmitEntry { values: IntakeFormValues },
    SubmitAnswer { text: String },

    // Timer events
    TypingElapsed { generation: u64 },

    // Editor events
    Reset,
}

impl Event {
    pub fn submit_entry(name: impl Into<String>, email: impl Into<String>) -> Self {
        Event::SubmitEntry {
            values: IntakeFormValues::new(name, email),
        }
    }

    pub fn answer(text: impl Into<String>) -> Self {
        Event::SubmitAnswer { text: text.into() }
    }
}
