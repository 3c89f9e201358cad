//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the simulator with a fake clock.

use std::time::Duration;

/// Single-slot timer for the AI typing delay.
///
/// At most one timer is armed at a time. When it elapses the implementation
/// delivers `Event::TypingElapsed { generation }` back to whoever drives the
/// simulator.
pub trait Scheduler: Send {
    /// Arm the slot, replacing (and cancelling) any timer already armed
    fn arm(&mut self, delay: Duration, generation: u64);

    /// Disarm the slot; a no-op when nothing is armed
    fn cancel(&mut self);
}

impl<T: Scheduler + ?Sized> Scheduler for Box<T> {
    fn arm(&mut self, delay: Duration, generation: u64) {
        (**self).arm(delay, generation);
    }

    fn cancel(&mut self) {
        (**self).cancel();
    }
}
