//! Hover-intent tooltips for terminal user interfaces.
//!
//! The core is [`controller::VisibilityController`], a small state machine
//! that opens a panel when the pointer enters its anchor and closes it
//! [`constants::CLOSE_DELAY`] after the pointer leaves, unless the pointer
//! comes back first. On touch devices a tap toggles the panel instead.
//! [`positioning::PositionRefreshTrigger`] asks a positioning engine to
//! recompute placement after every update while the panel is open.
//!
//! Timers, device detection and positioning are injected, so the core runs
//! the same under the crossterm host in this crate and under a
//! [`timer::ManualClock`] in tests.

pub mod component_context;
pub mod components;
pub mod config;
pub mod constants;
pub mod controller;
pub mod device;
pub mod drivers;
pub mod error;
pub mod event_loop;
pub mod positioning;
pub mod theme;
pub mod timer;
pub mod tracing_sub;
pub mod ui;

pub use components::{Component, ComponentContext, Region, Tooltip};
pub use config::{DisplayConfig, PlacementRequest, TooltipKind, TooltipPosition};
pub use controller::{TooltipSession, VisibilityController};
pub use device::{DeviceMode, EnvDeviceMode, FixedDeviceMode};
pub use error::ConfigError;
pub use positioning::{CellPlacementEngine, PositionRefreshTrigger, PositioningEngine};
pub use timer::{DeadlineTimers, ManualClock, SystemClock, TimerHost, TimerId};
