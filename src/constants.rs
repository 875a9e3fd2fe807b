//! Shared crate-wide constants.

use std::time::Duration;

/// Delay between a pointer leaving the anchor or panel and the panel closing.
///
/// A pointer crossing the gap between the anchor and the floating panel
/// leaves one region and enters the other a moment later. Keeping the panel
/// open for this long lets the re-entry cancel the close, so the panel does
/// not flicker shut and reopen.
///
/// Units: milliseconds.
pub const CLOSE_DELAY_MS: u64 = 100;

/// [`CLOSE_DELAY_MS`] as a `Duration`.
pub const CLOSE_DELAY: Duration = Duration::from_millis(CLOSE_DELAY_MS);

/// Environment variable that forces the device mode probe.
///
/// `1`, `true` or `yes` select touch mode; `0`, `false` or `no` select
/// pointer mode. Any other value falls through to auto-detection.
pub const TOUCH_OVERRIDE_ENV: &str = "TERM_TOOLTIP_TOUCH";

/// Poll interval of the demo event loop.
///
/// Timer expiry is only observed when the loop wakes up, so this bounds how
/// late a scheduled close can be applied.
pub const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Gap, in terminal cells, left between an anchor and its panel.
pub const PANEL_GAP: u16 = 1;
