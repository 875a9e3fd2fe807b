//! Delayed-callback facility used by the tooltip controller.
//!
//! The controller never runs code from inside a timer. Instead it asks a
//! [`TimerHost`] to remember a deadline and hands back a [`TimerId`]; the host
//! loop later collects expired ids with [`TimerHost::take_expired`] and feeds
//! them back to the controller on the same thread that dispatches input. That
//! keeps the whole tooltip single-threaded: whichever of "pointer re-entered"
//! or "timer expired" the loop sees first wins.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Opaque handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    pub const fn raw(self) -> u64 {
        self.0
    }
}

pub trait TimerHost {
    /// Schedule a timer that expires `delay` from now.
    fn schedule(&mut self, delay: Duration) -> TimerId;

    /// Cancel a timer. Unknown or already expired ids are ignored.
    fn cancel(&mut self, id: TimerId);

    /// Remove and return every timer whose deadline has passed, oldest first.
    fn take_expired(&mut self) -> Vec<TimerId>;

    /// Earliest pending deadline, if any. Hosts use it to bound their poll.
    fn next_deadline(&self) -> Option<Instant> {
        None
    }
}

impl<T: TimerHost + ?Sized> TimerHost for &mut T {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        (**self).schedule(delay)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id)
    }

    fn take_expired(&mut self) -> Vec<TimerId> {
        (**self).take_expired()
    }

    fn next_deadline(&self) -> Option<Instant> {
        (**self).next_deadline()
    }
}

/// Source of the current time for [`DeadlineTimers`].
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle to advance time
/// while the timer host owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Deadline list polled by the host loop.
///
/// Besides the deadlines it keeps counters of how many timers were scheduled
/// and how many live timers were cancelled, which makes leaks observable.
#[derive(Debug)]
pub struct DeadlineTimers<C: Clock = SystemClock> {
    clock: C,
    next_id: u64,
    deadlines: Vec<(TimerId, Instant)>,
    scheduled: usize,
    cancelled: usize,
}

impl Default for DeadlineTimers<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock)
    }
}

impl<C: Clock> DeadlineTimers<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            next_id: 0,
            deadlines: Vec::new(),
            scheduled: 0,
            cancelled: 0,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn pending_count(&self) -> usize {
        self.deadlines.len()
    }

    pub fn scheduled_count(&self) -> usize {
        self.scheduled
    }

    pub fn cancelled_count(&self) -> usize {
        self.cancelled
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.deadlines.iter().any(|(pending, _)| *pending == id)
    }
}

impl<C: Clock> TimerHost for DeadlineTimers<C> {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.deadlines.push((id, self.clock.now() + delay));
        self.scheduled += 1;
        id
    }

    fn cancel(&mut self, id: TimerId) {
        let before = self.deadlines.len();
        self.deadlines.retain(|(pending, _)| *pending != id);
        if self.deadlines.len() != before {
            self.cancelled += 1;
        }
    }

    fn take_expired(&mut self) -> Vec<TimerId> {
        let now = self.clock.now();
        let mut expired: Vec<(TimerId, Instant)> = Vec::new();
        self.deadlines.retain(|&(id, deadline)| {
            if deadline <= now {
                expired.push((id, deadline));
                false
            } else {
                true
            }
        });
        expired.sort_by_key(|&(id, deadline)| (deadline, id));
        expired.into_iter().map(|(id, _)| id).collect()
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.deadlines.iter().map(|&(_, deadline)| deadline).min()
    }
}
