//! Device mode probe.
//!
//! Tap-to-toggle only applies on touch devices, where enter/leave events are
//! unreliable or missing. The controller asks a [`DeviceMode`] each time a tap
//! arrives, so any zero-argument predicate can stand in for detection.

use std::env;

use crate::constants::TOUCH_OVERRIDE_ENV;

pub trait DeviceMode {
    fn is_touch_device(&self) -> bool;
}

impl<F: Fn() -> bool> DeviceMode for F {
    fn is_touch_device(&self) -> bool {
        self()
    }
}

/// A device mode decided up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixedDeviceMode {
    #[default]
    Pointer,
    Touch,
}

impl DeviceMode for FixedDeviceMode {
    fn is_touch_device(&self) -> bool {
        matches!(self, FixedDeviceMode::Touch)
    }
}

/// Detects touch sessions from the environment.
///
/// [`TOUCH_OVERRIDE_ENV`] wins when it holds a recognised value. Otherwise a
/// Termux session (`TERMUX_VERSION` set) counts as a touch device.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvDeviceMode;

impl DeviceMode for EnvDeviceMode {
    fn is_touch_device(&self) -> bool {
        detect(
            env::var(TOUCH_OVERRIDE_ENV).ok().as_deref(),
            env::var_os("TERMUX_VERSION").is_some(),
        )
    }
}

fn parse_override(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Some(true),
        "0" | "false" | "no" => Some(false),
        _ => None,
    }
}

fn detect(override_value: Option<&str>, termux: bool) -> bool {
    override_value.and_then(parse_override).unwrap_or(termux)
}
