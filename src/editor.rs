//! Flow editor shell
//!
//! Owns the authoritative step list and authoring context, regenerates flows
//! through an injected [`FlowGenerator`], and keeps the preview simulator in
//! sync: every new step list is paired with a reset.

use crate::flow::{
    Feature, FlowError, FlowGenerator, FlowSteps, GenerateError, GenerateRequest, IntakeContext,
    IntentLevel, Step,
};
use crate::runtime::{PreviewUpdate, Scheduler, Simulator};
use crate::state_machine::{Event, Pacing, PreviewContext};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::broadcast;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Flow(#[from] FlowError),
}

/// What a generate request ended up doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateOutcome {
    /// Blank prompt; nothing happened
    Skipped,
    /// No context set yet; the author is nudged to add some first
    NeedsContext,
    /// A new flow replaced the old one
    Generated { flow_id: Uuid },
}

pub struct FlowEditor<S: Scheduler, G: FlowGenerator> {
    flow_id: Uuid,
    prompt: String,
    context: IntakeContext,
    nudge_dismissed: bool,
    simulator: Simulator<S>,
    generator: G,
    updates: broadcast::Sender<PreviewUpdate>,
}

impl<S: Scheduler, G: FlowGenerator> FlowEditor<S, G> {
    pub fn new(
        steps: FlowSteps,
        pacing: Pacing,
        scheduler: S,
        generator: G,
        updates: broadcast::Sender<PreviewUpdate>,
    ) -> Self {
        let simulator = Simulator::new(
            PreviewContext::new(steps, pacing),
            scheduler,
            updates.clone(),
        );
        Self {
            flow_id: Uuid::new_v4(),
            prompt: String::new(),
            context: IntakeContext::default(),
            nudge_dismissed: false,
            simulator,
            generator,
            updates,
        }
    }

    pub fn flow_id(&self) -> Uuid {
        self.flow_id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn steps(&self) -> &Arc<FlowSteps> {
        self.simulator.steps()
    }

    pub fn context(&self) -> &IntakeContext {
        &self.context
    }

    pub fn set_context(&mut self, context: IntakeContext) {
        self.context = context;
    }

    /// Apply the builder's 1-3 intent slider
    pub fn set_intent_slider(&mut self, value: u8) {
        self.context.intent_level = IntentLevel::from_slider(value);
        tracing::debug!(slider = self.context.intent_level.slider(), "Intent level set");
    }

    /// Flip one generation feature on or off; returns whether it is now on
    pub fn toggle_feature(&mut self, feature: Feature) -> bool {
        self.context.toggle_feature(feature);
        self.context.has_feature(feature)
    }

    pub fn dismiss_nudge(&mut self) {
        self.nudge_dismissed = true;
    }

    pub fn simulator(&self) -> &Simulator<S> {
        &self.simulator
    }

    #[cfg(test)]
    pub(crate) fn generator(&self) -> &G {
        &self.generator
    }

    /// Forward a visitor or timer event to the preview
    pub fn dispatch(&mut self, event: Event) -> bool {
        self.simulator.dispatch(event)
    }

    pub fn reset_preview(&mut self) {
        self.simulator.reset();
    }

    /// Replace the flow with hand-edited steps
    pub fn load_steps(&mut self, steps: Vec<Step>) -> Result<(), EditorError> {
        let steps = FlowSteps::new(steps)?;
        self.install(steps);
        Ok(())
    }

    /// Generate a flow from `prompt`, nudging for context first if none is set
    pub async fn generate(&mut self, prompt: &str) -> Result<GenerateOutcome, EditorError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Ok(GenerateOutcome::Skipped);
        }

        if !self.context.is_set() && !self.nudge_dismissed {
            self.prompt = prompt.to_string();
            tracing::debug!(prompt, "No intake context set, nudging before generation");
            let _ = self.updates.send(PreviewUpdate::NeedsContext);
            return Ok(GenerateOutcome::NeedsContext);
        }

        self.execute_generation(prompt).await
    }

    /// Generate without context, dismissing the nudge for the session
    pub async fn generate_anyway(&mut self, prompt: &str) -> Result<GenerateOutcome, EditorError> {
        self.dismiss_nudge();
        self.generate(prompt).await
    }

    /// Re-run generation with the last prompt
    pub async fn regenerate(&mut self) -> Result<GenerateOutcome, EditorError> {
        let prompt = self.prompt.clone();
        self.generate(&prompt).await
    }

    /// Ask the generator to infer context from a landing page URL. The
    /// suggestion is returned, not applied; a blank URL asks nothing.
    pub async fn analyze_page(&self, url: &str) -> Result<Option<IntakeContext>, EditorError> {
        if url.trim().is_empty() {
            return Ok(None);
        }
        let suggested = self.generator.analyze_page(url).await?;
        tracing::info!(url, landing_page = %suggested.landing_page, "Analyzed landing page");
        Ok(Some(suggested))
    }

    async fn execute_generation(&mut self, prompt: &str) -> Result<GenerateOutcome, EditorError> {
        let request = GenerateRequest::new(prompt, &self.context);
        tracing::info!(
            payload = %serde_json::to_string(&request).unwrap_or_default(),
            "Generating flow"
        );

        self.prompt = prompt.to_string();
        let _ = self.updates.send(PreviewUpdate::Generating);

        let steps = match self.generator.generate(&request).await {
            Ok(steps) => steps,
            Err(e) => {
                tracing::warn!(error = %e, "Flow generation failed");
                return Err(e.into());
            }
        };

        self.install(steps);
        Ok(GenerateOutcome::Generated {
            flow_id: self.flow_id,
        })
    }

    fn install(&mut self, steps: FlowSteps) {
        self.flow_id = Uuid::new_v4();
        tracing::info!(flow_id = %self.flow_id, steps = steps.len(), "Installed flow");
        self.simulator.load_steps(steps);
    }
}
