use std::io;
use std::time::{Duration, Instant};

use crossterm::event::Event;

use crate::drivers::InputDriver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    /// Keep running and wake up no later than this instant, even if no input
    /// arrives. Used to apply a pending tooltip close on time.
    WakeAt(Instant),
    Quit,
}

/// The single loop that drives the UI thread.
///
/// Input events and timer expiry are both observed here, on the same thread,
/// so a tooltip's close timer and a pointer re-entry can never race: the
/// handler sees them one after the other in the order the loop picks them up.
///
/// The handler is called with:
/// - `Some(event)` for each input event.
/// - `None` when the poll times out, which is when hosts apply expired
///   timers and redraw.
pub struct EventLoop<D> {
    driver: D,
    poll_interval: Duration,
}

impl<D: InputDriver> EventLoop<D> {
    pub fn new(driver: D, poll_interval: Duration) -> Self {
        Self {
            driver,
            poll_interval,
        }
    }

    pub fn driver(&mut self) -> &mut D {
        &mut self.driver
    }

    /// How long to block in `poll`: the poll interval, shortened so the loop
    /// wakes up by `wake_at`.
    pub fn poll_timeout(&self, now: Instant, wake_at: Option<Instant>) -> Duration {
        match wake_at {
            Some(at) => at.saturating_duration_since(now).min(self.poll_interval),
            None => self.poll_interval,
        }
    }

    /// Runs the loop, taking control of the current thread.
    pub fn run<F>(&mut self, mut handler: F) -> io::Result<()>
    where
        F: FnMut(&mut D, Option<Event>) -> io::Result<ControlFlow>,
    {
        loop {
            let wake_at = match handler(&mut self.driver, None)? {
                ControlFlow::Quit => break,
                ControlFlow::WakeAt(at) => Some(at),
                ControlFlow::Continue => None,
            };

            let timeout = self.poll_timeout(Instant::now(), wake_at);
            if self.driver.poll(timeout)? {
                // Drain the queue so a burst of mouse moves is handled before
                // the next redraw.
                loop {
                    let event = self.driver.read()?;
                    if let ControlFlow::Quit = handler(&mut self.driver, Some(event))? {
                        return Ok(());
                    }
                    if !self.driver.poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}
