//! Intake flow definitions
//!
//! A flow is the ordered script of steps the preview walks a visitor through,
//! plus the authoring context used to generate it.

pub mod context;
pub mod generate;
pub mod step;

pub use context::{Feature, IntakeContext, IntentLevel, Persona};
pub use generate::{FlowGenerator, GenerateError, GenerateRequest, MockFlowGenerator};
pub use step::{FlowError, FlowSteps, Step, StepKind, StepPosition};
