//! Shared component rendering context
//!
//! `ComponentContext` carries UI metadata that components may need during
//! rendering and event handling, so the component trait stays stable and
//! components do not rely on ad-hoc boolean parameters.

/// Context passed to `Component` trait methods describing UI state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentContext {
    focused: bool,
}

impl ComponentContext {
    pub const fn new(focused: bool) -> Self {
        Self { focused }
    }

    /// Returns whether the component is focused.
    pub const fn focused(&self) -> bool {
        self.focused
    }

    /// Return a new `ComponentContext` with a modified `focused` flag.
    pub const fn with_focus(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}
