//! Visibility state machine with hover-intent close delay.
//!
//! [`VisibilityController`] is the single owner of a tooltip's open/closed
//! state and of the timer that closes it after the pointer leaves. Entering
//! opens immediately; leaving schedules a close [`CLOSE_DELAY`] later, and a
//! re-entry before then cancels it. On touch devices a tap toggles the panel.
//!
//! The pending timer lives in [`TooltipSession`] and is only ever replaced
//! through [`TooltipSession::replace_pending_close`], which cancels the old
//! timer before scheduling the new one. Teardown and drop both cancel it, so
//! no timer can outlive the controller.

use std::fmt;

use crate::constants::CLOSE_DELAY;
use crate::device::DeviceMode;
use crate::timer::{TimerHost, TimerId};

/// Open/closed state plus the at-most-one pending close timer.
///
/// Not `Clone`: the pending handle has exactly one owner.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TooltipSession {
    is_open: bool,
    pending_close: Option<TimerId>,
}

impl TooltipSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn pending_close(&self) -> Option<TimerId> {
        self.pending_close
    }

    /// Cancel the current close timer, if any, and schedule a new one.
    pub fn replace_pending_close<T: TimerHost + ?Sized>(&mut self, timers: &mut T) -> TimerId {
        self.cancel_pending_close(timers);
        let id = timers.schedule(CLOSE_DELAY);
        self.pending_close = Some(id);
        id
    }

    /// Cancel the close timer. Returns whether one was pending.
    pub fn cancel_pending_close<T: TimerHost + ?Sized>(&mut self, timers: &mut T) -> bool {
        match self.pending_close.take() {
            Some(id) => {
                timers.cancel(id);
                true
            }
            None => false,
        }
    }

    fn set_open(&mut self, open: bool) -> bool {
        let changed = self.is_open != open;
        self.is_open = open;
        changed
    }
}

pub struct VisibilityController<T: TimerHost, D: DeviceMode> {
    session: TooltipSession,
    timers: T,
    device: D,
}

impl<T: TimerHost, D: DeviceMode> fmt::Debug for VisibilityController<T, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisibilityController")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl<T: TimerHost, D: DeviceMode> VisibilityController<T, D> {
    /// Create a closed controller.
    pub fn new(timers: T, device: D) -> Self {
        Self {
            session: TooltipSession::new(),
            timers,
            device,
        }
    }

    pub fn session(&self) -> &TooltipSession {
        &self.session
    }

    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    pub fn has_pending_close(&self) -> bool {
        self.session.pending_close().is_some()
    }

    pub fn timers(&self) -> &T {
        &self.timers
    }

    /// Pointer entered the anchor or the panel.
    ///
    /// Opens the panel and cancels a pending close. Returns whether the panel
    /// was closed before.
    pub fn on_pointer_enter(&mut self) -> bool {
        if self.session.cancel_pending_close(&mut self.timers) {
            tracing::debug!("pointer re-entered, close cancelled");
        }
        let opened = self.session.set_open(true);
        if opened {
            tracing::debug!("tooltip opened by pointer");
        }
        opened
    }

    /// Pointer left the anchor or the panel.
    ///
    /// Schedules a close, replacing any close scheduled by an earlier leave.
    /// Does nothing while closed.
    pub fn on_pointer_leave(&mut self) {
        if !self.session.is_open() {
            return;
        }
        let id = self.session.replace_pending_close(&mut self.timers);
        tracing::debug!(timer = id.raw(), "close scheduled");
    }

    /// Tap or click on the anchor or the panel.
    ///
    /// Toggles visibility on touch devices and is ignored otherwise. Returns
    /// whether visibility changed.
    pub fn on_tap(&mut self) -> bool {
        if !self.device.is_touch_device() {
            return false;
        }
        if self.session.is_open() {
            self.session.cancel_pending_close(&mut self.timers);
            self.session.set_open(false);
            tracing::debug!("tooltip closed by tap");
        } else {
            self.session.set_open(true);
            tracing::debug!("tooltip opened by tap");
        }
        true
    }

    /// Apply an expired timer.
    ///
    /// Only the session's current close timer has an effect; ids that were
    /// cancelled or replaced are ignored. Returns whether the panel closed.
    pub fn on_timer_fired(&mut self, id: TimerId) -> bool {
        if self.session.pending_close() != Some(id) {
            return false;
        }
        self.session.pending_close = None;
        let closed = self.session.set_open(false);
        if closed {
            tracing::debug!(timer = id.raw(), "tooltip closed after delay");
        }
        closed
    }

    /// Collect expired timers from the host and apply them.
    ///
    /// Returns whether visibility changed.
    pub fn poll_timers(&mut self) -> bool {
        let mut changed = false;
        for id in self.timers.take_expired() {
            changed |= self.on_timer_fired(id);
        }
        changed
    }

    /// Discard the controller, cancelling a pending close.
    ///
    /// Dropping the controller has the same effect.
    pub fn teardown(self) {}

    fn cancel_for_teardown(&mut self) {
        if self.session.cancel_pending_close(&mut self.timers) {
            tracing::debug!("pending close cancelled on teardown");
        }
    }
}

impl<T: TimerHost, D: DeviceMode> Drop for VisibilityController<T, D> {
    fn drop(&mut self) {
        self.cancel_for_teardown();
    }
}
