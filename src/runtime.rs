//! Runtime for hosting a live preview
//!
//! One tokio task owns a [`FlowEditor`]; commands arrive on an mpsc channel,
//! typing timers post back on a second channel, and subscribers follow along
//! through a broadcast channel.

mod executor;
mod timer;
pub mod traits;

#[cfg(test)]
pub mod testing;

pub use executor::Simulator;
pub use timer::TokioScheduler;
pub use traits::*;

use crate::editor::{FlowEditor, GenerateOutcome};
use crate::flow::{Feature, FlowGenerator, FlowSteps, IntakeContext, Step};
use crate::state_machine::{ChatMessage, Event, Pacing, SimPhase};
use tokio::sync::{broadcast, mpsc};

/// Type alias for the runtime's editor with its concrete scheduler
pub type LiveEditor<G> = FlowEditor<TokioScheduler, G>;

/// Updates sent to subscribers
#[derive(Debug, Clone)]
pub enum PreviewUpdate {
    StateChange { phase: SimPhase, cursor: usize },
    Typing,
    Message { message: ChatMessage },
    Outcome { title: String, content: String },
    Reset,
    FlowLoaded { steps: FlowSteps },
    Generating,
    NeedsContext,
    ContextSuggested { context: IntakeContext },
    Error { message: String },
}

/// Requests accepted by a running preview
#[derive(Debug, Clone)]
pub enum Command {
    /// Visitor input for the live preview
    Preview(Event),
    Generate { prompt: String },
    GenerateAnyway { prompt: String },
    Regenerate,
    SetContext(IntakeContext),
    /// Intent slider position, 1-3
    SetIntent(u8),
    ToggleFeature(Feature),
    AnalyzePage { url: String },
    LoadSteps(Vec<Step>),
    Reset,
}

/// Handle to interact with a running preview
#[derive(Clone)]
pub struct PreviewHandle {
    command_tx: mpsc::Sender<Command>,
    broadcast_tx: broadcast::Sender<PreviewUpdate>,
}

impl PreviewHandle {
    pub async fn send(&self, command: Command) -> Result<(), String> {
        self.command_tx
            .send(command)
            .await
            .map_err(|e| format!("Failed to send command: {e}"))
    }

    pub async fn dispatch(&self, event: Event) -> Result<(), String> {
        self.send(Command::Preview(event)).await
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PreviewUpdate> {
        self.broadcast_tx.subscribe()
    }
}

pub struct PreviewRuntime<G: FlowGenerator + 'static> {
    editor: LiveEditor<G>,
    command_rx: mpsc::Receiver<Command>,
    timer_rx: mpsc::Receiver<Event>,
    broadcast_tx: broadcast::Sender<PreviewUpdate>,
}

impl<G: FlowGenerator + 'static> PreviewRuntime<G> {
    /// Build a runtime and the handle that drives it
    pub fn new(steps: FlowSteps, pacing: Pacing, generator: G) -> (Self, PreviewHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);
        let (timer_tx, timer_rx) = mpsc::channel(8);
        let (broadcast_tx, _) = broadcast::channel(128);

        let editor = FlowEditor::new(
            steps,
            pacing,
            TokioScheduler::new(timer_tx),
            generator,
            broadcast_tx.clone(),
        );

        let runtime = Self {
            editor,
            command_rx,
            timer_rx,
            broadcast_tx: broadcast_tx.clone(),
        };
        let handle = PreviewHandle {
            command_tx,
            broadcast_tx,
        };
        (runtime, handle)
    }

    pub fn editor(&self) -> &LiveEditor<G> {
        &self.editor
    }

    pub async fn run(mut self) {
        tracing::info!(flow_id = %self.editor.flow_id(), "Starting preview runtime");

        loop {
            tokio::select! {
                command = self.command_rx.recv() => {
                    // Every handle is gone; nobody can observe the preview any more
                    let Some(command) = command else { break };
                    self.process_command(command).await;
                }
                Some(event) = self.timer_rx.recv() => {
                    self.editor.dispatch(event);
                }
            }
        }

        tracing::info!(flow_id = %self.editor.flow_id(), "Preview runtime stopped");
    }

    async fn process_command(&mut self, command: Command) {
        let result = match command {
            Command::Preview(event) => {
                self.editor.dispatch(event);
                Ok(())
            }
            Command::Reset => {
                self.editor.reset_preview();
                Ok(())
            }
            Command::SetContext(context) => {
                self.editor.set_context(context);
                Ok(())
            }
            Command::SetIntent(value) => {
                self.editor.set_intent_slider(value);
                Ok(())
            }
            Command::ToggleFeature(feature) => {
                let enabled = self.editor.toggle_feature(feature);
                tracing::debug!(?feature, enabled, "Feature toggled");
                Ok(())
            }
            Command::LoadSteps(steps) => self.editor.load_steps(steps),
            Command::Generate { prompt } => self.editor.generate(&prompt).await.map(log_outcome),
            Command::GenerateAnyway { prompt } => {
                self.editor.generate_anyway(&prompt).await.map(log_outcome)
            }
            Command::Regenerate => self.editor.regenerate().await.map(log_outcome),
            Command::AnalyzePage { url } => {
                self.editor.analyze_page(&url).await.map(|suggested| {
                    if let Some(context) = suggested {
                        let _ = self
                            .broadcast_tx
                            .send(PreviewUpdate::ContextSuggested { context });
                    }
                })
            }
        };

        if let Err(e) = result {
            tracing::error!(error = %e, "Error handling command");
            let _ = self.broadcast_tx.send(PreviewUpdate::Error {
                message: e.to_string(),
            });
        }
    }
}

fn log_outcome(outcome: GenerateOutcome) {
    tracing::debug!(?outcome, "Generate request finished");
}

/// Start a preview runtime in the background
pub fn spawn_preview<G: FlowGenerator + 'static>(
    steps: FlowSteps,
    pacing: Pacing,
    generator: G,
) -> PreviewHandle {
    let (runtime, handle) = PreviewRuntime::new(steps, pacing, generator);
    tokio::spawn(runtime.run());
    handle
}
