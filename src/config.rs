//! Environment-driven configuration

use crate::flow::generate::{DEFAULT_ANALYZE_DELAY, DEFAULT_GENERATE_DELAY};
use crate::state_machine::Pacing;
use std::time::Duration;

/// Settings for a preview session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewConfig {
    pub pacing: Pacing,
    /// Latency of the mock flow generator
    pub generate_delay: Duration,
    /// Latency of the mock landing page analysis
    pub analyze_delay: Duration,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            pacing: Pacing::default(),
            generate_delay: DEFAULT_GENERATE_DELAY,
            analyze_delay: DEFAULT_ANALYZE_DELAY,
        }
    }
}

impl PreviewConfig {
    /// Read `FUNNEL_*` variables, falling back to defaults for anything
    /// missing or unparsable
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let millis = |key: &str, default: Duration| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map_or(default, Duration::from_millis)
        };
        let defaults = Self::default();

        let greeting = lookup("FUNNEL_GREETING")
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());

        Self {
            pacing: Pacing {
                entry: millis("FUNNEL_ENTRY_DELAY_MS", defaults.pacing.entry),
                question: millis("FUNNEL_QUESTION_DELAY_MS", defaults.pacing.question),
                outcome: millis("FUNNEL_OUTCOME_DELAY_MS", defaults.pacing.outcome),
                greeting,
            },
            generate_delay: millis("FUNNEL_GENERATE_DELAY_MS", defaults.generate_delay),
            analyze_delay: millis("FUNNEL_ANALYZE_DELAY_MS", defaults.analyze_delay),
        }
    }
}
