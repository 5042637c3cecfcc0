use std::time::{Duration, Instant};

pub const FPS: u64 = 60;
pub const FRAME_DELAY: Duration = Duration::from_nanos(1_000_000_000u64 / FPS);

/// Fixed-phase tick scheduler driven by the monotonic clock.
///
/// Deadlines sit on multiples of `period` from the start instant. A tick which overruns makes the
/// scheduler skip every boundary that has already passed: there is never a burst of catch-up
/// ticks, and the phase never drifts the way sleeping for a period after each tick would.
#[derive(Debug)]
pub struct FrameScheduler {
    period: Duration,
    next_deadline: Instant,
    ticks: u64,
    missed: u64,
}

impl FrameScheduler {
    /// The first deadline is `start` itself.
    pub fn new(period: Duration, start: Instant) -> Self {
        assert!(period > Duration::from_nanos(0), "tick period has to be non-zero");
        FrameScheduler {
            period,
            next_deadline: start,
            ticks: 0,
            missed: 0,
        }
    }

    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    /// How long to wait from `now` until the next tick is due, zero if it's overdue.
    pub fn time_until_next(&self, now: Instant) -> Duration {
        self.next_deadline.saturating_duration_since(now)
    }

    /// Marks the current tick as done at `now`.
    ///
    /// # Returns
    /// The deadline of the next tick, the first phase boundary at or after `now`.
    pub fn advance(&mut self, now: Instant) -> Instant {
        self.ticks += 1;
        let mut next = self.next_deadline + self.period;

        if next < now {
            let behind = (now - next).as_nanos();
            let period = self.period.as_nanos();
            let skipped = (behind + period - 1) / period;
            next += self.period * skipped as u32;
            self.missed += skipped as u64;
            log::trace!("Render tick overran, skipped {} tick(s)", skipped);
        }

        self.next_deadline = next;
        next
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total amount of deadlines skipped because a tick overran.
    pub fn missed(&self) -> u64 {
        self.missed
    }
}
