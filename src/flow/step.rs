//! Step model for intake flows

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What a step asks of the visitor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    /// Name + email capture form shown before the chat starts
    #[serde(rename = "Static")]
    StaticIntake,
    /// A single chat question
    Question,
    /// Terminal booking offer or disqualification message
    #[serde(rename = "End")]
    Outcome,
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StepKind::StaticIntake => "Static",
            StepKind::Question => "Question",
            StepKind::Outcome => "End",
        };
        f.write_str(label)
    }
}

/// One node of an intake flow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub content: String,
}

impl Step {
    pub fn new(title: impl Into<String>, kind: StepKind, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            content: content.into(),
        }
    }

    pub fn intake(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(title, StepKind::StaticIntake, content)
    }

    pub fn question(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(title, StepKind::Question, content)
    }

    pub fn outcome(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(title, StepKind::Outcome, content)
    }
}

/// Where an index sits in the flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepPosition {
    First,
    Interior,
    Last,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FlowError {
    #[error("A flow needs at least an intake step and an outcome step, got {0} step(s)")]
    TooShort(usize),
    #[error("Step {index} ({title:?}) must be {expected}, found {found}")]
    MisplacedStep {
        index: usize,
        title: String,
        expected: StepKind,
        found: StepKind,
    },
}

/// Validated, immutable step sequence
///
/// Index 0 is always the static intake, the last index is always the outcome
/// and everything in between is a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Step>", into = "Vec<Step>")]
pub struct FlowSteps {
    steps: Vec<Step>,
}

impl FlowSteps {
    pub fn new(steps: Vec<Step>) -> Result<Self, FlowError> {
        if steps.len() < 2 {
            return Err(FlowError::TooShort(steps.len()));
        }

        let last = steps.len() - 1;
        for (index, step) in steps.iter().enumerate() {
            let expected = match index {
                0 => StepKind::StaticIntake,
                i if i == last => StepKind::Outcome,
                _ => StepKind::Question,
            };
            if step.kind != expected {
                return Err(FlowError::MisplacedStep {
                    index,
                    title: step.title.clone(),
                    expected,
                    found: step.kind,
                });
            }
        }

        Ok(Self { steps })
    }

    /// Build a flow from question texts, wrapping them with the standard intake
    /// and outcome steps.
    pub fn from_questions<I, T, C>(questions: I, outcome: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (T, C)>,
        T: Into<String>,
        C: Into<String>,
    {
        let mut steps = vec![Step::intake("Lead Capture", "Name + Email Capture")];
        steps.extend(
            questions
                .into_iter()
                .map(|(title, content)| Step::question(title, content)),
        );
        steps.push(Step::outcome("Outcome", outcome));
        Self { steps }
    }

    /// The flow the builder canvas opens with
    pub fn starter() -> Self {
        Self::from_questions(
            [
                (
                    "Budget Qual",
                    "What is your monthly budget for this project?",
                ),
                ("Company Size", "How many people are on your team?"),
                ("Timeline", "How soon are you looking to start?"),
            ],
            "Calendar Booking",
        )
    }

    #[allow(clippy::len_without_is_empty)] // never empty
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn last_index(&self) -> usize {
        self.steps.len() - 1
    }

    /// Step at `index`, clamped to the outcome step when out of range
    pub fn step_at(&self, index: usize) -> &Step {
        &self.steps[index.min(self.last_index())]
    }

    pub fn position(&self, index: usize) -> StepPosition {
        match index.min(self.last_index()) {
            0 => StepPosition::First,
            i if i == self.last_index() => StepPosition::Last,
            _ => StepPosition::Interior,
        }
    }

    pub fn is_outcome(&self, index: usize) -> bool {
        self.position(index) == StepPosition::Last
    }

    pub fn outcome(&self) -> &Step {
        self.step_at(self.last_index())
    }

    pub fn questions(&self) -> &[Step] {
        &self.steps[1..self.last_index()]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Step> {
        self.steps.iter()
    }
}

impl Default for FlowSteps {
    fn default() -> Self {
        Self::starter()
    }
}

impl TryFrom<Vec<Step>> for FlowSteps {
    type Error = FlowError;

    fn try_from(steps: Vec<Step>) -> Result<Self, Self::Error> {
        Self::new(steps)
    }
}

impl From<FlowSteps> for Vec<Step> {
    fn from(flow: FlowSteps) -> Self {
        flow.steps
    }
}

impl<'a> IntoIterator for &'a FlowSteps {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}
