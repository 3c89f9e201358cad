//! Authoring context that steers flow generation

use serde::{Deserialize, Serialize};
use std::fmt;

/// Audience the landing page is designed for
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", content = "label", rename_all = "snake_case")]
pub enum Persona {
    #[default]
    Unset,
    Founders,
    Marketers,
    Agencies,
    Custom(String),
}

impl Persona {
    /// Label sent to the generator; custom personas use their free text
    pub fn label(&self) -> &str {
        match self {
            Persona::Unset => "",
            Persona::Founders => "Founders",
            Persona::Marketers => "Marketers",
            Persona::Agencies => "Agencies",
            Persona::Custom(text) => text,
        }
    }
}

/// How ready to buy the page's visitors are (1-3 slider in the builder)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum IntentLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl IntentLevel {
    /// Map the slider value, clamping anything outside 1..=3
    pub fn from_slider(value: u8) -> Self {
        match value {
            0 | 1 => IntentLevel::Low,
            2 => IntentLevel::Medium,
            _ => IntentLevel::High,
        }
    }

    pub fn slider(self) -> u8 {
        match self {
            IntentLevel::Low => 1,
            IntentLevel::Medium => 2,
            IntentLevel::High => 3,
        }
    }
}

impl fmt::Display for IntentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IntentLevel::Low => "Low",
            IntentLevel::Medium => "Medium",
            IntentLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Optional generation behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Tune tone and questions to the selected persona
    TailoredQuestions,
    /// Guess likely frustrations from persona and promise
    InferredPainPoints,
    /// Boost higher-intent responses for sales visibility
    PriorityScoring,
    /// Auto-generate a custom final message
    PersonalizedSuccess,
}

/// Context describing the page an intake flow is attached to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntakeContext {
    pub landing_page: String,
    pub offer_promise: String,
    pub persona: Persona,
    pub intent_level: IntentLevel,
    pub features: Vec<Feature>,
}

impl Default for IntakeContext {
    fn default() -> Self {
        Self {
            landing_page: String::new(),
            offer_promise: String::new(),
            persona: Persona::Unset,
            intent_level: IntentLevel::Medium,
            features: vec![Feature::TailoredQuestions],
        }
    }
}

impl IntakeContext {
    /// The landing page stands in for "any context set"
    pub fn is_set(&self) -> bool {
        !self.landing_page.trim().is_empty()
    }

    pub fn has_feature(&self, feature: Feature) -> bool {
        self.features.contains(&feature)
    }

    pub fn toggle_feature(&mut self, feature: Feature) {
        if let Some(pos) = self.features.iter().position(|f| *f == feature) {
            self.features.remove(pos);
        } else {
            self.features.push(feature);
        }
    }
}
