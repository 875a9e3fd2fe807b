use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use term_tooltip::constants::CLOSE_DELAY_MS;
use term_tooltip::controller::VisibilityController;
use term_tooltip::device::FixedDeviceMode;
use term_tooltip::positioning::PositionRefreshTrigger;
use term_tooltip::timer::{DeadlineTimers, ManualClock, TimerHost, TimerId};

/// Timer host that tracks how many timers are live at once.
struct Recording {
    inner: DeadlineTimers<ManualClock>,
    max_live: usize,
}

impl TimerHost for Recording {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = self.inner.schedule(delay);
        self.max_live = self.max_live.max(self.inner.pending_count());
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.inner.cancel(id);
    }

    fn take_expired(&mut self) -> Vec<TimerId> {
        self.inner.take_expired()
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.inner.next_deadline()
    }
}

fn controller(
    mode: FixedDeviceMode,
) -> (
    ManualClock,
    VisibilityController<DeadlineTimers<ManualClock>, FixedDeviceMode>,
) {
    let clock = ManualClock::new();
    let c = VisibilityController::new(DeadlineTimers::new(clock.clone()), mode);
    (clock, c)
}

#[test]
fn at_most_one_close_timer_under_random_input() {
    let clock = ManualClock::new();
    let mut timers = Recording {
        inner: DeadlineTimers::new(clock.clone()),
        max_live: 0,
    };
    {
        let mut c = VisibilityController::new(&mut timers, FixedDeviceMode::Touch);
        // small LCG so the sequence is fixed across runs
        let mut seed: u32 = 0x2545_f491;
        for _ in 0..2_000 {
            seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            match seed >> 29 {
                0 | 1 => {
                    c.on_pointer_enter();
                }
                2..=4 => c.on_pointer_leave(),
                5 => {
                    c.on_tap();
                }
                _ => clock.advance_ms(u64::from(seed % 150)),
            }
            c.poll_timers();
            if c.has_pending_close() {
                assert!(c.is_open(), "a pending close implies an open panel");
            }
        }
        c.teardown();
    }
    assert_eq!(timers.max_live, 1);
    assert_eq!(timers.inner.pending_count(), 0);
}

#[test]
fn enter_opens_immediately() {
    let (_, mut c) = controller(FixedDeviceMode::Pointer);
    c.on_pointer_enter();
    assert!(c.is_open());
    assert!(!c.has_pending_close());
    assert_eq!(c.timers().scheduled_count(), 0);
}

#[test]
fn leave_closes_at_exactly_the_delay() {
    let (clock, mut c) = controller(FixedDeviceMode::Pointer);
    c.on_pointer_enter();
    c.on_pointer_leave();
    clock.advance_ms(CLOSE_DELAY_MS - 1);
    c.poll_timers();
    assert!(c.is_open());
    clock.advance_ms(1);
    c.poll_timers();
    assert!(!c.is_open());
}

#[test]
fn reentry_at_half_delay_cancels_close() {
    let (clock, mut c) = controller(FixedDeviceMode::Pointer);
    c.on_pointer_enter();
    c.on_pointer_leave();
    clock.advance_ms(50);
    c.poll_timers();
    c.on_pointer_enter();
    assert!(c.is_open());
    assert_eq!(c.timers().cancelled_count(), 1);
    clock.advance_ms(50);
    assert!(!c.poll_timers());
    assert!(c.is_open());
    clock.advance_ms(1_000);
    assert!(!c.poll_timers());
    assert!(c.is_open());
}

#[test]
fn tap_depends_on_device_mode() {
    let (_, mut pointer) = controller(FixedDeviceMode::Pointer);
    pointer.on_tap();
    assert!(!pointer.is_open());

    let (_, mut touch) = controller(FixedDeviceMode::Touch);
    touch.on_tap();
    assert!(touch.is_open());
    touch.on_tap();
    assert!(!touch.is_open());
}

#[test]
fn teardown_with_pending_close_leaks_nothing() {
    let clock = ManualClock::new();
    let mut timers = DeadlineTimers::new(clock.clone());
    let mut c = VisibilityController::new(&mut timers, FixedDeviceMode::Pointer);
    c.on_pointer_enter();
    c.on_pointer_leave();
    c.teardown();
    assert_eq!(timers.cancelled_count(), 1);
    clock.advance_ms(CLOSE_DELAY_MS * 3);
    assert!(timers.take_expired().is_empty());
}

#[test]
fn refresh_follows_visibility() {
    let (clock, mut c) = controller(FixedDeviceMode::Pointer);
    let calls = Rc::new(Cell::new(0));
    let mut trigger = PositionRefreshTrigger::new();
    let seen = Rc::clone(&calls);
    trigger.bind(move || seen.set(seen.get() + 1));

    trigger.on_update(c.is_open());
    assert_eq!(calls.get(), 0);
    c.on_pointer_enter();
    trigger.on_update(c.is_open());
    trigger.on_update(c.is_open());
    assert_eq!(calls.get(), 2);
    c.on_pointer_leave();
    clock.advance_ms(CLOSE_DELAY_MS);
    c.poll_timers();
    trigger.on_update(c.is_open());
    assert_eq!(calls.get(), 2);
}
