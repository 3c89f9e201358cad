//! Tokio-backed typing timer

use super::traits::Scheduler;
use crate::state_machine::Event;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

struct ArmedTimer {
    generation: u64,
    cancel: CancellationToken,
}

/// Posts `TypingElapsed` onto an event channel after a sleep.
///
/// Must be armed from inside a tokio runtime.
pub struct TokioScheduler {
    event_tx: mpsc::Sender<Event>,
    slot: Option<ArmedTimer>,
}

impl TokioScheduler {
    pub fn new(event_tx: mpsc::Sender<Event>) -> Self {
        Self {
            event_tx,
            slot: None,
        }
    }
}

impl Scheduler for TokioScheduler {
    fn arm(&mut self, delay: Duration, generation: u64) {
        self.cancel();

        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = token.cancelled() => {
                    tracing::debug!(generation, "Typing timer cancelled");
                }
                () = tokio::time::sleep(delay) => {
                    let _ = event_tx.send(Event::TypingElapsed { generation }).await;
                }
            }
        });

        self.slot = Some(ArmedTimer { generation, cancel });
    }

    fn cancel(&mut self) {
        if let Some(timer) = self.slot.take() {
            tracing::trace!(generation = timer.generation, "Disarming typing timer");
            timer.cancel.cancel();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        self.cancel();
    }
}
