//! Rate limiting for scene recomputation and host updates.
//!
//! DESIGN
//! ======
//! One primitive, two modes:
//! - `Throttle`: leading-edge rate limit. The first value in a quiet period is
//!   emitted immediately; values arriving within `interval` of the last
//!   emission are held and only the latest is emitted once the interval ends.
//! - `Debounce`: trailing delay. Every value restarts the delay; only the last
//!   value of a burst is emitted, `interval` after the burst settles.
//!
//! The scheduler owns no timer. The host calls [`Scheduler::next_deadline`] to
//! arm its own timer and [`Scheduler::poll`] when it fires. Each operation has
//! an `_at` variant taking an explicit `Instant` so behavior is testable
//! without sleeping.

#[cfg(test)]
#[path = "schedule_test.rs"]
mod schedule_test;

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleMode {
    Throttle,
    Debounce,
}

#[derive(Debug, Clone)]
pub struct Scheduler<T> {
    mode: ScheduleMode,
    interval: Duration,
    /// Last emission time (throttle only).
    last_emit: Option<Instant>,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Scheduler<T> {
    #[must_use]
    pub fn new(mode: ScheduleMode, interval: Duration) -> Self {
        Self { mode, interval, last_emit: None, pending: None, deadline: None }
    }

    #[must_use]
    pub fn throttle(interval: Duration) -> Self {
        Self::new(ScheduleMode::Throttle, interval)
    }

    #[must_use]
    pub fn debounce(delay: Duration) -> Self {
        Self::new(ScheduleMode::Debounce, delay)
    }

    #[must_use]
    pub fn mode(&self) -> ScheduleMode {
        self.mode
    }

    /// Offer a value. Returns it back if it should be emitted right now.
    pub fn push(&mut self, value: T) -> Option<T> {
        self.push_at(value, Instant::now())
    }

    /// Offer a value at `now`. Returns it back if it should be emitted right now.
    pub fn push_at(&mut self, value: T, now: Instant) -> Option<T> {
        match self.mode {
            ScheduleMode::Throttle => {
                let ready = self
                    .last_emit
                    .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
                if ready {
                    self.pending = None;
                    self.deadline = None;
                    self.last_emit = Some(now);
                    Some(value)
                } else {
                    self.pending = Some(value);
                    self.deadline = self.last_emit.map(|last| last + self.interval);
                    None
                }
            }
            ScheduleMode::Debounce => {
                self.pending = Some(value);
                self.deadline = Some(now + self.interval);
                None
            }
        }
    }

    /// Emit the held value if its deadline has passed.
    pub fn poll(&mut self) -> Option<T> {
        self.poll_at(Instant::now())
    }

    /// Emit the held value if its deadline is at or before `now`.
    pub fn poll_at(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if deadline <= now => self.emit_pending(now),
            _ => None,
        }
    }

    /// Emit the held value regardless of the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.flush_at(Instant::now())
    }

    pub fn flush_at(&mut self, now: Instant) -> Option<T> {
        self.emit_pending(now)
    }

    /// Drop any held value without emitting it.
    pub fn cancel(&mut self) {
        self.pending = None;
        self.deadline = None;
    }

    /// When the host should call [`Scheduler::poll`] next, if anything is held.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn emit_pending(&mut self, now: Instant) -> Option<T> {
        self.deadline = None;
        let value = self.pending.take()?;
        if self.mode == ScheduleMode::Throttle {
            self.last_emit = Some(now);
        }
        Some(value)
    }
}
