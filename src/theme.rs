use std::str::FromStr;

use ratatui::style::{Color, Modifier, Style};

use crate::config::TooltipKind;

// Centralized theme colors. Keep these as small helpers so the renderer
// never hardcodes a color.

pub fn anchor_fg() -> Color {
    Color::Cyan
}

pub fn anchor_active_fg() -> Color {
    Color::LightCyan
}

pub fn panel_bg(kind: TooltipKind) -> Color {
    match kind {
        TooltipKind::Default => Color::DarkGray,
        TooltipKind::Inverse => Color::White,
    }
}

pub fn panel_fg(kind: TooltipKind) -> Color {
    match kind {
        TooltipKind::Default => Color::White,
        TooltipKind::Inverse => Color::Black,
    }
}

pub fn panel_border(kind: TooltipKind) -> Color {
    match kind {
        TooltipKind::Default => Color::Gray,
        TooltipKind::Inverse => Color::DarkGray,
    }
}

pub fn anchor_style(active: bool) -> Style {
    if active {
        Style::default()
            .fg(anchor_active_fg())
            .add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(anchor_fg())
    }
}

pub fn panel_style(kind: TooltipKind) -> Style {
    Style::default().fg(panel_fg(kind)).bg(panel_bg(kind))
}

pub fn border_style(kind: TooltipKind) -> Style {
    Style::default().fg(panel_border(kind)).bg(panel_bg(kind))
}

/// Style named by a whitespace-separated class list.
///
/// Modifier names (`bold`, `dim`, `italic`, `underlined`, `reversed`) add
/// modifiers, `bg-<color>` sets the background and any other color name sets
/// the foreground. Unknown classes are ignored.
pub fn class_style(classes: &str) -> Style {
    classes
        .split_whitespace()
        .fold(Style::default(), |style, class| match class {
            "bold" => style.add_modifier(Modifier::BOLD),
            "dim" => style.add_modifier(Modifier::DIM),
            "italic" => style.add_modifier(Modifier::ITALIC),
            "underlined" | "underline" => style.add_modifier(Modifier::UNDERLINED),
            "reversed" => style.add_modifier(Modifier::REVERSED),
            other => match other.strip_prefix("bg-") {
                Some(color) => Color::from_str(color).map_or(style, |c| style.bg(c)),
                None => Color::from_str(other).map_or(style, |c| style.fg(c)),
            },
        })
}

/// `base` with the classes in `classes` layered on top.
pub fn with_classes(base: Style, classes: Option<&str>) -> Style {
    classes.map_or(base, |classes| base.patch(class_style(classes)))
}
