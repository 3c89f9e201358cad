//! Funnel Preview - conversational intake flow preview engine
//!
//! Walks a simulated lead through an intake flow (static form, chat-style
//! questions, outcome) the way the funnel builder's live preview does.

pub mod config;
pub mod editor;
pub mod flow;
pub mod lead;
pub mod render;
pub mod runtime;
pub mod state_machine;

pub use config::PreviewConfig;
pub use editor::{EditorError, FlowEditor, GenerateOutcome};
pub use flow::{FlowSteps, Step, StepKind};
pub use render::{render, PreviewView};
pub use runtime::{spawn_preview, Command, PreviewHandle, PreviewUpdate};
pub use state_machine::{Event, Pacing, PreviewState, SimPhase};
