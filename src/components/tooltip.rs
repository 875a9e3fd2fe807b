//! Tooltip component: an anchor with a floating panel shown on hover.
//!
//! The component glues the visibility core to a terminal host:
//!
//! - [`VisibilityController`] decides whether the panel is open.
//! - [`PositionRefreshTrigger`] asks the positioning engine to recompute after
//!   every update while open.
//! - Mouse events are routed per hit region. The anchor and the panel are two
//!   disjoint regions connected only logically, so moving from one to the
//!   other is a leave followed by an enter and the close delay bridges the
//!   gap.
//!
//! Lifecycle hooks map onto the host loop: [`Tooltip::new`] on creation,
//! [`Tooltip::on_update`] after every frame, [`Tooltip::on_destroy`] when the
//! tooltip goes away.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crossterm::event::{Event, MouseButton, MouseEventKind};
use ratatui::layout::{Rect, Size};
use ratatui::text::Text;
use ratatui::widgets::{Block, Clear, Padding, Paragraph};

use crate::components::{Component, ComponentContext};
use crate::config::{DisplayConfig, Side};
use crate::controller::VisibilityController;
use crate::device::DeviceMode;
use crate::positioning::{
    CellPlacementEngine, PositionRefreshTrigger, PositioningEngine, recompute_handle,
};
use crate::timer::TimerHost;
use crate::ui::UiFrame;

/// Hit region under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Anchor,
    Panel,
}

pub struct Tooltip<T, D, E = CellPlacementEngine>
where
    T: TimerHost,
    D: DeviceMode,
    E: PositioningEngine + 'static,
{
    anchor: String,
    body: String,
    config: DisplayConfig,
    controller: VisibilityController<T, D>,
    refresh: PositionRefreshTrigger,
    engine: Rc<RefCell<E>>,
    anchor_area: Option<Rect>,
    panel_area: Option<Rect>,
    hovered: Option<Region>,
    measured_width: Option<u16>,
}

impl<T, D, E> std::fmt::Debug for Tooltip<T, D, E>
where
    T: TimerHost,
    D: DeviceMode,
    E: PositioningEngine + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tooltip")
            .field("anchor", &self.anchor)
            .field("config", &self.config)
            .field("controller", &self.controller)
            .field("hovered", &self.hovered)
            .finish_non_exhaustive()
    }
}

impl<T, D, E> Tooltip<T, D, E>
where
    T: TimerHost,
    D: DeviceMode,
    E: PositioningEngine + 'static,
{
    pub fn new(
        anchor: impl Into<String>,
        body: impl Into<String>,
        config: DisplayConfig,
        timers: T,
        device: D,
        engine: E,
    ) -> Self {
        let anchor = anchor.into();
        tracing::debug!(
            anchor = %anchor,
            kind = %config.kind(),
            position = %config.position(),
            "tooltip created"
        );
        Self {
            anchor,
            body: body.into(),
            config,
            controller: VisibilityController::new(timers, device),
            refresh: PositionRefreshTrigger::new(),
            engine: Rc::new(RefCell::new(engine)),
            anchor_area: None,
            panel_area: None,
            hovered: None,
            measured_width: None,
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn anchor_text(&self) -> &str {
        &self.anchor
    }

    pub fn body_text(&self) -> &str {
        &self.body
    }

    pub fn is_open(&self) -> bool {
        self.controller.is_open()
    }

    pub fn controller(&self) -> &VisibilityController<T, D> {
        &self.controller
    }

    pub fn engine(&self) -> Ref<'_, E> {
        self.engine.borrow()
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh.refresh_count()
    }

    pub fn anchor_area(&self) -> Option<Rect> {
        self.anchor_area
    }

    /// Where the panel was drawn on the last frame, if it was open.
    pub fn panel_area(&self) -> Option<Rect> {
        self.panel_area
    }

    pub fn hovered(&self) -> Option<Region> {
        self.hovered
    }

    /// Size the panel asks for: body text plus border and one cell of
    /// horizontal padding.
    pub fn panel_size(&self) -> Size {
        let text = Text::raw(self.body.as_str());
        let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
        let height = u16::try_from(text.height()).unwrap_or(u16::MAX);
        Size::new(width.saturating_add(4), height.saturating_add(2))
    }

    /// Measurement callback for the rendered panel width.
    ///
    /// The value is kept for callers that want it; nothing in the tooltip
    /// reads it back.
    pub fn on_measure(&mut self, width: u16) {
        self.measured_width = Some(width);
    }

    pub fn measured_width(&self) -> Option<u16> {
        self.measured_width
    }

    /// Update hook, run after every frame.
    pub fn on_update(&mut self) -> bool {
        self.refresh.on_update(self.controller.is_open())
    }

    /// Apply expired close timers. Returns whether visibility changed.
    pub fn poll_timers(&mut self) -> bool {
        let changed = self.controller.poll_timers();
        self.forget_closed_panel();
        changed
    }

    /// A closed panel has no hit region until it is drawn again.
    fn forget_closed_panel(&mut self) {
        if !self.controller.is_open() {
            self.panel_area = None;
        }
    }

    /// Destroy hook. Cancels any pending close and releases the recompute
    /// capability.
    pub fn on_destroy(self) {
        let Self {
            controller,
            mut refresh,
            ..
        } = self;
        refresh.unbind();
        controller.teardown();
        tracing::debug!("tooltip destroyed");
    }

    pub fn on_pointer_enter(&mut self) -> bool {
        self.controller.on_pointer_enter()
    }

    pub fn on_pointer_leave(&mut self) {
        self.controller.on_pointer_leave();
    }

    /// The pointer moved somewhere this tooltip does not own, such as another
    /// tooltip's panel drawn over this anchor.
    pub fn on_pointer_outside(&mut self) -> bool {
        self.hover_to(None)
    }

    pub fn on_tap(&mut self) -> bool {
        let changed = self.controller.on_tap();
        self.forget_closed_panel();
        changed
    }

    pub fn region_at(&self, column: u16, row: u16) -> Option<Region> {
        if self
            .anchor_area
            .is_some_and(|rect| rect_contains(rect, column, row))
        {
            return Some(Region::Anchor);
        }
        if self.controller.is_open()
            && self
                .panel_area
                .is_some_and(|rect| rect_contains(rect, column, row))
        {
            return Some(Region::Panel);
        }
        None
    }

    /// Move the hover to `region`, emitting leave for the old region and
    /// enter for the new one. Returns whether the region changed.
    fn hover_to(&mut self, region: Option<Region>) -> bool {
        if self.hovered == region {
            return false;
        }
        if self.hovered.is_some() {
            self.controller.on_pointer_leave();
        }
        if region.is_some() {
            self.controller.on_pointer_enter();
        }
        self.hovered = region;
        true
    }

    fn sync_engine(&mut self, viewport: Rect, anchor: Rect) {
        let request = self.config.placement_request(Some(anchor));
        let panel = self.panel_size();
        {
            let mut engine = self.engine.borrow_mut();
            engine.bind_anchor(request);
            engine.set_bounds(viewport, panel);
        }
        if !self.refresh.is_bound() {
            self.refresh.bind(recompute_handle(&self.engine));
        }
    }

    fn render_panel(&mut self, frame: &mut UiFrame<'_>, rect: Rect) {
        let kind = self.config.kind();
        let body_style = crate::theme::with_classes(
            crate::theme::panel_style(kind),
            self.config.body_class_name(),
        );
        let block = Block::bordered()
            .border_style(crate::theme::border_style(kind))
            .style(crate::theme::panel_style(kind))
            .padding(Padding::horizontal(1));
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(Text::styled(self.body.as_str(), body_style))
                .style(crate::theme::panel_style(kind))
                .block(block),
            rect,
        );
        if let Some(anchor) = self.anchor_area {
            draw_arrow(frame, rect, anchor, self.config.position().side(), kind);
        }
        self.panel_area = Some(rect);
        self.on_measure(rect.width);
    }
}

impl<T, D, E> Component for Tooltip<T, D, E>
where
    T: TimerHost,
    D: DeviceMode,
    E: PositioningEngine + 'static,
{
    fn resize(&mut self, area: Rect, _ctx: &ComponentContext) {
        self.anchor_area = Some(area);
    }

    fn render(&mut self, frame: &mut UiFrame<'_>, area: Rect, ctx: &ComponentContext) {
        self.anchor_area = Some(area);
        if area.width == 0 || area.height == 0 {
            self.panel_area = None;
            return;
        }
        let active = ctx.focused() || self.hovered == Some(Region::Anchor);
        frame.set_string(
            area.x,
            area.y,
            &crate::ui::truncate_to_width(&self.anchor, area.width as usize),
            crate::theme::with_classes(
                crate::theme::anchor_style(active),
                self.config.class_name(),
            ),
        );
        self.sync_engine(frame.area(), area);

        if !self.controller.is_open() {
            self.panel_area = None;
            return;
        }
        // a fresh open, or a moved anchor, has no placement yet
        let placement = {
            let mut engine = self.engine.borrow_mut();
            if engine.placement().is_none() {
                engine.recompute();
            }
            engine.placement()
        };
        match placement {
            Some(rect) => self.render_panel(frame, rect),
            None => self.panel_area = None,
        }
    }

    fn handle_event(&mut self, event: &Event, _ctx: &ComponentContext) -> bool {
        match event {
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    let region = self.region_at(mouse.column, mouse.row);
                    self.hover_to(region)
                }
                MouseEventKind::Down(MouseButton::Left) => {
                    if self.region_at(mouse.column, mouse.row).is_none() {
                        return false;
                    }
                    self.on_tap();
                    true
                }
                _ => false,
            },
            Event::FocusLost => self.hover_to(None),
            _ => false,
        }
    }
}

pub fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    if rect.width == 0 || rect.height == 0 {
        return false;
    }
    let max_x = rect.x.saturating_add(rect.width);
    let max_y = rect.y.saturating_add(rect.height);
    column >= rect.x && column < max_x && row >= rect.y && row < max_y
}

/// Draw the arrow on the panel border that faces the anchor.
fn draw_arrow(
    frame: &mut UiFrame<'_>,
    panel: Rect,
    anchor: Rect,
    side: Side,
    kind: crate::config::TooltipKind,
) {
    if panel.width < 3 || panel.height < 3 {
        return;
    }
    let style = crate::theme::border_style(kind);
    let center_x = anchor
        .x
        .saturating_add(anchor.width / 2)
        .clamp(panel.x + 1, panel.right() - 2);
    let center_y = anchor
        .y
        .saturating_add(anchor.height / 2)
        .clamp(panel.y + 1, panel.bottom() - 2);
    let (x, y, glyph) = match side {
        Side::Top => (center_x, panel.bottom() - 1, "▼"),
        Side::Bottom => (center_x, panel.y, "▲"),
        Side::Left => (panel.right() - 1, center_y, "▶"),
        Side::Right => (panel.x, center_y, "◀"),
    };
    frame.set_string(x, y, glyph, style);
}
