//! Preview renderer
//!
//! Maps simulator state onto the single panel the live preview shows. Panel
//! switches are a pure function of the cursor; nothing here mutates state.

use crate::flow::{FlowSteps, StepKind, StepPosition};
use crate::state_machine::{ChatMessage, IntakeFormValues, PreviewState};
use serde::Serialize;

/// The one visible panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum PreviewView {
    Intake {
        draft: IntakeFormValues,
        /// Whether the submit control is enabled
        can_submit: bool,
        /// Entry accepted, typing before the chat opens (two-step flows only)
        typing: bool,
    },
    Chat {
        messages: Vec<ChatMessage>,
        typing: bool,
        /// Whether the answer box is enabled
        accepts_input: bool,
    },
    Outcome {
        title: String,
        content: String,
    },
}

/// Render the current panel
pub fn render(state: &PreviewState, steps: &FlowSteps) -> PreviewView {
    let typing = state.phase.is_typing();
    match steps.position(state.cursor) {
        StepPosition::First => PreviewView::Intake {
            draft: state.draft.clone(),
            can_submit: state.is_idle() && state.draft.is_complete(),
            typing,
        },
        StepPosition::Interior => PreviewView::Chat {
            messages: state.messages.clone(),
            typing,
            accepts_input: !typing && !state.phase.is_terminal(),
        },
        StepPosition::Last => {
            let outcome = steps.outcome();
            PreviewView::Outcome {
                title: outcome.title.clone(),
                content: outcome.content.clone(),
            }
        }
    }
}

/// Header label, e.g. "Step 2 of 5"
pub fn progress_label(state: &PreviewState, steps: &FlowSteps) -> String {
    format!(
        "Step {} of {}",
        state.cursor.min(steps.last_index()) + 1,
        steps.len()
    )
}

/// Highlight of a step in the flow-steps sidebar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Past,
    Active,
    Upcoming,
}

/// Sidebar row for one step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRow {
    pub title: String,
    pub kind: StepKind,
    pub content: String,
    pub status: StepStatus,
}

/// Sidebar rows for every step.
///
/// While the chat is running every question up to the cursor stays active,
/// since they are all visible in the transcript.
pub fn step_rows(state: &PreviewState, steps: &FlowSteps) -> Vec<StepRow> {
    let cursor = state.cursor.min(steps.last_index());
    let last = steps.last_index();

    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let active = (i == 0 && cursor == 0)
                || (i > 0 && i <= cursor && cursor < last)
                || (i == last && cursor == last);
            let status = if active {
                StepStatus::Active
            } else if i < cursor {
                StepStatus::Past
            } else {
                StepStatus::Upcoming
            };
            StepRow {
                title: step.title.clone(),
                kind: step.kind,
                content: step.content.clone(),
                status,
            }
        })
        .collect()
}
