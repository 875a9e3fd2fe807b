//! Construction-time tooltip configuration.
//!
//! `DisplayConfig` is built once per tooltip and never mutated afterwards.
//! String forms of the enumerated options are validated here so that a bad
//! value fails when the tooltip is created rather than when an event arrives.

use std::fmt;
use std::str::FromStr;

use ratatui::layout::Rect;

use crate::error::ConfigError;

/// Visual variant of the panel. Passed through to the renderer unmodified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TooltipKind {
    #[default]
    Default,
    Inverse,
}

impl TooltipKind {
    pub const ALL: [TooltipKind; 2] = [TooltipKind::Default, TooltipKind::Inverse];

    pub const fn as_str(self) -> &'static str {
        match self {
            TooltipKind::Default => "default",
            TooltipKind::Inverse => "inverse",
        }
    }
}

impl fmt::Display for TooltipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TooltipKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TooltipKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownKind(s.to_string()))
    }
}

/// Side of the anchor the panel is requested on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TooltipPosition {
    #[default]
    Top,
    TopStart,
    TopEnd,
    Right,
    RightStart,
    RightEnd,
    Bottom,
    BottomStart,
    BottomEnd,
    Left,
    LeftStart,
    LeftEnd,
}

/// The main side a [`TooltipPosition`] places the panel on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Alignment of the panel along the side it is placed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

impl TooltipPosition {
    pub const ALL: [TooltipPosition; 12] = [
        TooltipPosition::Top,
        TooltipPosition::TopStart,
        TooltipPosition::TopEnd,
        TooltipPosition::Right,
        TooltipPosition::RightStart,
        TooltipPosition::RightEnd,
        TooltipPosition::Bottom,
        TooltipPosition::BottomStart,
        TooltipPosition::BottomEnd,
        TooltipPosition::Left,
        TooltipPosition::LeftStart,
        TooltipPosition::LeftEnd,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TooltipPosition::Top => "top",
            TooltipPosition::TopStart => "top-start",
            TooltipPosition::TopEnd => "top-end",
            TooltipPosition::Right => "right",
            TooltipPosition::RightStart => "right-start",
            TooltipPosition::RightEnd => "right-end",
            TooltipPosition::Bottom => "bottom",
            TooltipPosition::BottomStart => "bottom-start",
            TooltipPosition::BottomEnd => "bottom-end",
            TooltipPosition::Left => "left",
            TooltipPosition::LeftStart => "left-start",
            TooltipPosition::LeftEnd => "left-end",
        }
    }

    pub const fn side(self) -> Side {
        match self {
            TooltipPosition::Top | TooltipPosition::TopStart | TooltipPosition::TopEnd => Side::Top,
            TooltipPosition::Right | TooltipPosition::RightStart | TooltipPosition::RightEnd => {
                Side::Right
            }
            TooltipPosition::Bottom | TooltipPosition::BottomStart | TooltipPosition::BottomEnd => {
                Side::Bottom
            }
            TooltipPosition::Left | TooltipPosition::LeftStart | TooltipPosition::LeftEnd => {
                Side::Left
            }
        }
    }

    pub const fn align(self) -> Align {
        match self {
            TooltipPosition::TopStart
            | TooltipPosition::RightStart
            | TooltipPosition::BottomStart
            | TooltipPosition::LeftStart => Align::Start,
            TooltipPosition::TopEnd
            | TooltipPosition::RightEnd
            | TooltipPosition::BottomEnd
            | TooltipPosition::LeftEnd => Align::End,
            _ => Align::Center,
        }
    }
}

impl fmt::Display for TooltipPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TooltipPosition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TooltipPosition::ALL
            .into_iter()
            .find(|pos| pos.as_str() == s)
            .ok_or_else(|| ConfigError::UnknownPosition(s.to_string()))
    }
}

/// Immutable per-instance display configuration.
///
/// Class names are styling hooks: the renderer layers
/// [`crate::theme::class_style`] for `class_name` over the anchor and for
/// `body_class_name` over the panel text. `None` keeps the kind's theme.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayConfig {
    kind: TooltipKind,
    position: TooltipPosition,
    class_name: Option<String>,
    body_class_name: Option<String>,
}

impl DisplayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the string forms of `kind` and `position`.
    ///
    /// `None` selects the default for that option.
    pub fn from_strs(kind: Option<&str>, position: Option<&str>) -> Result<Self, ConfigError> {
        let kind = kind
            .map(str::parse::<TooltipKind>)
            .transpose()?
            .unwrap_or_default();
        let position = position
            .map(str::parse::<TooltipPosition>)
            .transpose()?
            .unwrap_or_default();
        Ok(Self::new().with_kind(kind).with_position(position))
    }

    pub fn with_kind(mut self, kind: TooltipKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_position(mut self, position: TooltipPosition) -> Self {
        self.position = position;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Result<Self, ConfigError> {
        self.class_name = Some(non_empty(class_name.into(), "class_name")?);
        Ok(self)
    }

    pub fn with_body_class_name(
        mut self,
        body_class_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        self.body_class_name = Some(non_empty(body_class_name.into(), "body_class_name")?);
        Ok(self)
    }

    pub fn kind(&self) -> TooltipKind {
        self.kind
    }

    pub fn position(&self) -> TooltipPosition {
        self.position
    }

    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    pub fn body_class_name(&self) -> Option<&str> {
        self.body_class_name.as_deref()
    }

    /// Placement request for an anchor occupying `anchor`.
    pub fn placement_request(&self, anchor: Option<Rect>) -> PlacementRequest {
        PlacementRequest {
            anchor,
            position: self.position,
        }
    }
}

fn non_empty(value: String, field: &'static str) -> Result<String, ConfigError> {
    if value.trim().is_empty() {
        Err(ConfigError::EmptyClassName { field })
    } else {
        Ok(value)
    }
}

/// What the positioning engine is asked to place: the anchor's area (absent
/// until the anchor has been laid out) and the requested side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlacementRequest {
    pub anchor: Option<Rect>,
    pub position: TooltipPosition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_default_kind_and_top() {
        let cfg = DisplayConfig::default();
        assert_eq!(cfg.kind(), TooltipKind::Default);
        assert_eq!(cfg.position(), TooltipPosition::Top);
        assert!(cfg.class_name().is_none());
        assert!(cfg.body_class_name().is_none());
    }

    #[test]
    fn every_position_string_parses_back() {
        for pos in TooltipPosition::ALL {
            assert_eq!(pos.to_string().parse::<TooltipPosition>(), Ok(pos));
        }
        for kind in TooltipKind::ALL {
            assert_eq!(kind.to_string().parse::<TooltipKind>(), Ok(kind));
        }
    }

    #[test]
    fn unknown_values_fail_fast() {
        assert_eq!(
            DisplayConfig::from_strs(Some("loud"), None),
            Err(ConfigError::UnknownKind("loud".into()))
        );
        assert_eq!(
            DisplayConfig::from_strs(None, Some("middle")),
            Err(ConfigError::UnknownPosition("middle".into()))
        );
        // case matters
        assert!("Top".parse::<TooltipPosition>().is_err());
    }

    #[test]
    fn from_strs_applies_values() {
        let cfg = DisplayConfig::from_strs(Some("inverse"), Some("left-end")).unwrap();
        assert_eq!(cfg.kind(), TooltipKind::Inverse);
        assert_eq!(cfg.position(), TooltipPosition::LeftEnd);
        assert_eq!(cfg.position().side(), Side::Left);
        assert_eq!(cfg.position().align(), Align::End);
    }

    #[test]
    fn empty_class_names_are_rejected() {
        let err = DisplayConfig::new().with_body_class_name("  ").unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyClassName {
                field: "body_class_name"
            }
        );
        let cfg = DisplayConfig::new().with_class_name("anchor").unwrap();
        assert_eq!(cfg.class_name(), Some("anchor"));
    }

    #[test]
    fn placement_request_carries_position() {
        let cfg = DisplayConfig::new().with_position(TooltipPosition::Bottom);
        let anchor = Rect::new(1, 2, 3, 1);
        let req = cfg.placement_request(Some(anchor));
        assert_eq!(req.anchor, Some(anchor));
        assert_eq!(req.position, TooltipPosition::Bottom);
    }
}
