//! One-shot timers delivered on the tick thread
//!
//! Timers never call back directly. The owner advances the scheduler and then
//! pulls the handles that expired, so expiry is always handled on the tick
//! that observes it and may land several ticks after the delay elapsed.

use std::time::Duration;
use tracing::trace;

/// Handle to a scheduled one-shot timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Source of cancellable one-shot timers
pub trait Scheduler {
    /// Schedule a timer that expires after `delay`
    fn after(&mut self, delay: Duration) -> TimerHandle;

    /// Cancel a timer. Cancelled timers are never returned by `take_expired`.
    fn cancel(&mut self, timer: TimerHandle);

    /// Whether the timer is scheduled and has not expired yet
    fn is_pending(&self, timer: TimerHandle) -> bool;

    /// Let simulated time pass. Wall-clock schedulers ignore this.
    fn advance(&mut self, _elapsed: Duration) {}

    /// Drain timers that expired since the last call, earliest first
    fn take_expired(&mut self) -> Vec<TimerHandle>;
}

/// Scheduler driven by the simulation's delta time
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    pending: Vec<(TimerHandle, Duration)>,
    expired: Vec<TimerHandle>,
    next_id: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time since creation
    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Scheduler for TimerQueue {
    fn after(&mut self, delay: Duration) -> TimerHandle {
        let timer = TimerHandle(self.next_id);
        self.next_id += 1;
        self.pending.push((timer, self.now + delay));
        trace!(id = timer.0, delay_secs = delay.as_secs_f32(), "Scheduled timer");
        timer
    }

    fn cancel(&mut self, timer: TimerHandle) {
        self.pending.retain(|(handle, _)| *handle != timer);
        self.expired.retain(|handle| *handle != timer);
    }

    fn is_pending(&self, timer: TimerHandle) -> bool {
        self.pending.iter().any(|(handle, _)| *handle == timer)
    }

    fn advance(&mut self, elapsed: Duration) {
        self.now += elapsed;

        let now = self.now;
        let mut due: Vec<(TimerHandle, Duration)> = Vec::new();
        self.pending.retain(|entry| {
            if entry.1 <= now {
                due.push(*entry);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|(handle, deadline)| (*deadline, handle.0));
        self.expired.extend(due.into_iter().map(|(handle, _)| handle));
    }

    fn take_expired(&mut self) -> Vec<TimerHandle> {
        std::mem::take(&mut self.expired)
    }
}
