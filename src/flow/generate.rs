//! Flow generation contract and the in-process mock
//!
//! The editor only depends on [`FlowGenerator`]; a real implementation would
//! call a backend with the same request/response shape.

use super::context::{Feature, IntakeContext, IntentLevel, Persona};
use super::step::{FlowError, FlowSteps, Step};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Context block of a generation request, flattened to plain labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub landing_page: String,
    pub offer_promise: String,
    pub persona: String,
    pub intent_level: IntentLevel,
    pub features: Vec<Feature>,
}

/// Payload for "generate flow from prompt + context"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub flow_prompt: String,
    pub context: RequestContext,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, context: &IntakeContext) -> Self {
        Self {
            flow_prompt: prompt.into(),
            context: RequestContext {
                landing_page: context.landing_page.clone(),
                offer_promise: context.offer_promise.clone(),
                persona: context.persona.label().to_string(),
                intent_level: context.intent_level,
                features: context.features.clone(),
            },
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Generator unavailable: {0}")]
    Unavailable(String),
    #[error("Generated flow is malformed: {0}")]
    InvalidFlow(#[from] FlowError),
    #[error("Could not analyze page {url}: {message}")]
    Analysis { url: String, message: String },
}

/// Produces step sequences (and page context) for the editor
#[async_trait]
pub trait FlowGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<FlowSteps, GenerateError>;

    /// Infer intake context from a landing page URL
    async fn analyze_page(&self, url: &str) -> Result<IntakeContext, GenerateError>;
}

#[async_trait]
impl<T: FlowGenerator + ?Sized> FlowGenerator for std::sync::Arc<T> {
    async fn generate(&self, request: &GenerateRequest) -> Result<FlowSteps, GenerateError> {
        (**self).generate(request).await
    }

    async fn analyze_page(&self, url: &str) -> Result<IntakeContext, GenerateError> {
        (**self).analyze_page(url).await
    }
}

pub const DEFAULT_GENERATE_DELAY: Duration = Duration::from_millis(2500);
pub const DEFAULT_ANALYZE_DELAY: Duration = Duration::from_millis(1500);

/// Canned generator with fixed latency
///
/// The response is held as raw steps and validated on every call, the same
/// way a backend response would be.
#[derive(Debug, Clone)]
pub struct MockFlowGenerator {
    generate_delay: Duration,
    analyze_delay: Duration,
    response: Vec<Step>,
}

impl Default for MockFlowGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATE_DELAY, DEFAULT_ANALYZE_DELAY)
    }
}

impl MockFlowGenerator {
    pub fn new(generate_delay: Duration, analyze_delay: Duration) -> Self {
        Self {
            generate_delay,
            analyze_delay,
            response: Self::canned_flow().into(),
        }
    }

    /// Answer every generate request with `steps` instead of the canned flow
    #[must_use]
    pub fn with_response(mut self, steps: Vec<Step>) -> Self {
        self.response = steps;
        self
    }

    /// No latency at all, for tests
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn canned_flow() -> FlowSteps {
        FlowSteps::from_questions(
            [
                (
                    "Qualification",
                    "What specific problem are you trying to solve?",
                ),
                ("Volume", "What is your current monthly volume?"),
                ("Budget", "What is your estimated budget?"),
            ],
            "Calendar Booking",
        )
    }

    fn landing_page_for(url: &str) -> &'static str {
        if url.contains("pricing") {
            "/pricing"
        } else if url.contains("demo") {
            "/book-demo"
        } else if url.contains("webinar") {
            "/webinar"
        } else {
            "/landing-a"
        }
    }
}

#[async_trait]
impl FlowGenerator for MockFlowGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<FlowSteps, GenerateError> {
        tracing::debug!(prompt = %request.flow_prompt, "Mock generator producing canned flow");
        if !self.generate_delay.is_zero() {
            tokio::time::sleep(self.generate_delay).await;
        }
        Ok(FlowSteps::new(self.response.clone())?)
    }

    async fn analyze_page(&self, url: &str) -> Result<IntakeContext, GenerateError> {
        if url.trim().is_empty() {
            return Err(GenerateError::Analysis {
                url: url.to_string(),
                message: "empty url".to_string(),
            });
        }
        if !self.analyze_delay.is_zero() {
            tokio::time::sleep(self.analyze_delay).await;
        }
        Ok(IntakeContext {
            landing_page: Self::landing_page_for(url).to_string(),
            offer_promise: "Save 20+ hours per week on lead qualification.".to_string(),
            persona: Persona::Founders,
            intent_level: IntentLevel::High,
            features: vec![
                Feature::TailoredQuestions,
                Feature::PriorityScoring,
                Feature::InferredPainPoints,
            ],
        })
    }
}
