//! Mock implementations for testing
//!
//! A fake clock drives typing timers deterministically, and the generator
//! mocks record what the editor asked for.

use super::executor::Simulator;
use super::traits::Scheduler;
use crate::flow::{
    FlowGenerator, FlowSteps, GenerateError, GenerateRequest, IntakeContext, MockFlowGenerator,
};
use crate::state_machine::Event;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ============================================================================
// Fake Clock
// ============================================================================

#[derive(Default)]
struct ClockInner {
    now: Duration,
    /// Due time and generation of the armed timer
    slot: Option<(Duration, u64)>,
}

/// Manually advanced clock shared with its schedulers
#[derive(Clone, Default)]
pub struct FakeClock {
    inner: Arc<Mutex<ClockInner>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduler(&self) -> ManualScheduler {
        ManualScheduler {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn now(&self) -> Duration {
        self.inner.lock().unwrap().now
    }

    /// Move time forward by `by`, handing every timer that comes due to
    /// `deliver`. Timers armed while delivering fire too if they fall inside
    /// the window.
    pub fn advance_with(&self, by: Duration, mut deliver: impl FnMut(Event)) {
        let target = self.now() + by;
        loop {
            let fired = {
                let mut inner = self.inner.lock().unwrap();
                match inner.slot {
                    Some((due, generation)) if due <= target => {
                        inner.now = due;
                        inner.slot = None;
                        Some(generation)
                    }
                    _ => {
                        inner.now = target;
                        None
                    }
                }
            };
            match fired {
                Some(generation) => deliver(Event::TypingElapsed { generation }),
                None => break,
            }
        }
    }

    pub fn advance(&self, sim: &mut Simulator<ManualScheduler>, by: Duration) {
        self.advance_with(by, |event| {
            sim.dispatch(event);
        });
    }
}

/// Scheduler whose single slot lives on a [`FakeClock`]
pub struct ManualScheduler {
    inner: Arc<Mutex<ClockInner>>,
}

impl ManualScheduler {
    pub fn is_armed(&self) -> bool {
        self.inner.lock().unwrap().slot.is_some()
    }
}

impl Scheduler for ManualScheduler {
    fn arm(&mut self, delay: Duration, generation: u64) {
        let mut inner = self.inner.lock().unwrap();
        let due = inner.now + delay;
        inner.slot = Some((due, generation));
    }

    fn cancel(&mut self) {
        self.inner.lock().unwrap().slot = None;
    }
}

// ============================================================================
// Mock Generators
// ============================================================================

/// Generator that records requests and returns a fixed flow
pub struct RecordingGenerator {
    flow: FlowSteps,
    pub requests: Mutex<Vec<GenerateRequest>>,
}

impl RecordingGenerator {
    pub fn new(flow: FlowSteps) -> Self {
        Self {
            flow,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded_requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for RecordingGenerator {
    fn default() -> Self {
        Self::new(MockFlowGenerator::canned_flow())
    }
}

#[async_trait]
impl FlowGenerator for RecordingGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<FlowSteps, GenerateError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(self.flow.clone())
    }

    async fn analyze_page(&self, url: &str) -> Result<IntakeContext, GenerateError> {
        MockFlowGenerator::instant().analyze_page(url).await
    }
}

/// Generator whose backend is always down
pub struct FailingGenerator;

#[async_trait]
impl FlowGenerator for FailingGenerator {
    async fn generate(&self, _request: &GenerateRequest) -> Result<FlowSteps, GenerateError> {
        Err(GenerateError::Unavailable("backend offline".to_string()))
    }

    async fn analyze_page(&self, url: &str) -> Result<IntakeContext, GenerateError> {
        Err(GenerateError::Analysis {
            url: url.to_string(),
            message: "backend offline".to_string(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fake_clock_fires_due_timer_once() {
        let clock = FakeClock::new();
        let mut scheduler = clock.scheduler();
        scheduler.arm(Duration::from_millis(600), 3);

        let mut fired = Vec::new();
        clock.advance_with(Duration::from_millis(500), |e| fired.push(e));
        assert!(fired.is_empty());
        clock.advance_with(Duration::from_millis(500), |e| fired.push(e));
        assert_eq!(fired, vec![Event::TypingElapsed { generation: 3 }]);
        assert_eq!(clock.now(), Duration::from_millis(1000));
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let clock = FakeClock::new();
        let mut scheduler = clock.scheduler();
        scheduler.arm(Duration::from_millis(600), 1);
        scheduler.cancel();

        let mut fired = Vec::new();
        clock.advance_with(Duration::from_secs(60), |e| fired.push(e));
        assert!(fired.is_empty());
    }

    #[test]
    fn test_timer_armed_during_delivery_fires_in_window() {
        let clock = FakeClock::new();
        let mut scheduler = clock.scheduler();
        scheduler.arm(Duration::from_millis(100), 1);

        let mut rearm = clock.scheduler();
        let mut fired = Vec::new();
        clock.advance_with(Duration::from_millis(300), |e| {
            if e == (Event::TypingElapsed { generation: 1 }) {
                rearm.arm(Duration::from_millis(100), 2);
            }
            fired.push(e);
        });
        assert_eq!(fired.len(), 2);
        assert_eq!(clock.now(), Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_recording_generator() {
        let generator = RecordingGenerator::default();
        let request = GenerateRequest::new("SaaS Demo", &IntakeContext::default());
        let flow = generator.generate(&request).await.unwrap();
        assert_eq!(flow, MockFlowGenerator::canned_flow());
        assert_eq!(generator.recorded_requests(), vec![request]);
    }
}
