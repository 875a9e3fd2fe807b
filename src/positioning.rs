//! Placement refresh and the cell-grid positioning adapter.
//!
//! [`PositionRefreshTrigger`] is the contract the tooltip relies on: after
//! every update, while the panel is open, the bound recompute capability runs;
//! while closed it never runs. The capability is an opaque callable handed out
//! by whatever [`PositioningEngine`] owns the geometry.
//!
//! [`CellPlacementEngine`] is the engine the terminal host uses. It places the
//! panel on the requested side of the anchor and clamps it into the viewport.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use ratatui::layout::{Rect, Size};

use crate::config::{Align, PlacementRequest, Side};
use crate::constants::PANEL_GAP;

type Recompute = Box<dyn FnMut()>;

#[derive(Default)]
pub struct PositionRefreshTrigger {
    recompute: Option<Recompute>,
    refreshes: usize,
}

impl fmt::Debug for PositionRefreshTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PositionRefreshTrigger")
            .field("bound", &self.recompute.is_some())
            .field("refreshes", &self.refreshes)
            .finish()
    }
}

impl PositionRefreshTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the recompute capability for this panel, replacing any earlier one.
    pub fn bind<F: FnMut() + 'static>(&mut self, recompute: F) {
        self.recompute = Some(Box::new(recompute));
    }

    pub fn unbind(&mut self) {
        self.recompute = None;
    }

    pub fn is_bound(&self) -> bool {
        self.recompute.is_some()
    }

    /// Number of recomputes requested so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes
    }

    /// Run one update cycle. Returns whether the recompute ran.
    pub fn on_update(&mut self, is_open: bool) -> bool {
        if !is_open {
            return false;
        }
        let Some(recompute) = self.recompute.as_mut() else {
            return false;
        };
        recompute();
        self.refreshes += 1;
        true
    }
}

/// Geometry collaborator that decides where a panel goes.
pub trait PositioningEngine {
    /// Bind the anchor and requested side.
    fn bind_anchor(&mut self, request: PlacementRequest);

    /// Update the space available and the size the panel wants.
    fn set_bounds(&mut self, viewport: Rect, panel: Size);

    fn recompute(&mut self);

    /// Result of the last recompute, or `None` once the anchor or bounds
    /// have changed since.
    fn placement(&self) -> Option<Rect>;
}

/// Hand out a recompute callable bound to a shared engine.
pub fn recompute_handle<E: PositioningEngine + 'static>(
    engine: &Rc<RefCell<E>>,
) -> impl FnMut() + 'static {
    let engine = Rc::clone(engine);
    move || engine.borrow_mut().recompute()
}

#[derive(Debug, Clone, Default)]
pub struct CellPlacementEngine {
    request: Option<PlacementRequest>,
    viewport: Rect,
    panel: Size,
    placement: Option<Rect>,
    recomputes: usize,
}

impl CellPlacementEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }
}

impl PositioningEngine for CellPlacementEngine {
    fn bind_anchor(&mut self, request: PlacementRequest) {
        if self.request != Some(request) {
            self.request = Some(request);
            self.placement = None;
        }
    }

    fn set_bounds(&mut self, viewport: Rect, panel: Size) {
        if self.viewport != viewport || self.panel != panel {
            self.viewport = viewport;
            self.panel = panel;
            self.placement = None;
        }
    }

    fn recompute(&mut self) {
        self.recomputes += 1;
        self.placement = match self.request {
            Some(req @ PlacementRequest {
                anchor: Some(anchor),
                ..
            }) => place(anchor, req, self.panel, self.viewport),
            _ => None,
        };
    }

    fn placement(&self) -> Option<Rect> {
        self.placement
    }
}

fn aligned(start: i32, anchor_len: u16, panel_len: u16, align: Align) -> i32 {
    match align {
        Align::Start => start,
        Align::Center => start + (anchor_len as i32 - panel_len as i32) / 2,
        Align::End => start + anchor_len as i32 - panel_len as i32,
    }
}

fn clamp_axis(pos: i32, len: u16, min: u16, max_len: u16) -> u16 {
    let lo = min as i32;
    let hi = lo + max_len as i32 - len as i32;
    pos.clamp(lo, hi.max(lo)) as u16
}

/// Place a `panel` sized rectangle beside `anchor` and clamp it into
/// `viewport`. The panel shrinks when the viewport is smaller than it.
pub fn place(anchor: Rect, req: PlacementRequest, panel: Size, viewport: Rect) -> Option<Rect> {
    if viewport.width == 0 || viewport.height == 0 || panel.width == 0 || panel.height == 0 {
        return None;
    }
    let width = panel.width.min(viewport.width);
    let height = panel.height.min(viewport.height);
    let gap = PANEL_GAP as i32;
    let (ax, ay) = (anchor.x as i32, anchor.y as i32);
    let align = req.position.align();
    let (x, y) = match req.position.side() {
        Side::Top => (
            aligned(ax, anchor.width, width, align),
            ay - gap - height as i32,
        ),
        Side::Bottom => (
            aligned(ax, anchor.width, width, align),
            ay + anchor.height as i32 + gap,
        ),
        Side::Left => (
            ax - gap - width as i32,
            aligned(ay, anchor.height, height, align),
        ),
        Side::Right => (
            ax + anchor.width as i32 + gap,
            aligned(ay, anchor.height, height, align),
        ),
    };
    Some(Rect {
        x: clamp_axis(x, width, viewport.x, viewport.width),
        y: clamp_axis(y, height, viewport.y, viewport.height),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TooltipPosition;
    use std::cell::Cell;

    fn req(anchor: Rect, position: TooltipPosition) -> PlacementRequest {
        PlacementRequest {
            anchor: Some(anchor),
            position,
        }
    }

    #[test]
    fn trigger_runs_only_while_open() {
        let calls = Rc::new(Cell::new(0));
        let mut trigger = PositionRefreshTrigger::new();
        // nothing bound yet
        assert!(!trigger.on_update(true));
        let seen = Rc::clone(&calls);
        trigger.bind(move || seen.set(seen.get() + 1));
        assert!(!trigger.on_update(false));
        assert!(!trigger.on_update(false));
        assert_eq!(calls.get(), 0);
        assert!(trigger.on_update(true));
        assert!(trigger.on_update(true));
        assert_eq!(calls.get(), 2);
        assert_eq!(trigger.refresh_count(), 2);
        trigger.unbind();
        assert!(!trigger.on_update(true));
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn top_is_centered_above_anchor() {
        let anchor = Rect::new(10, 10, 6, 1);
        let rect = place(
            anchor,
            req(anchor, TooltipPosition::Top),
            Size::new(10, 3),
            Rect::new(0, 0, 40, 20),
        )
        .unwrap();
        assert_eq!(rect, Rect::new(8, 6, 10, 3));
    }

    #[test]
    fn sides_and_alignments() {
        let anchor = Rect::new(10, 10, 6, 2);
        let viewport = Rect::new(0, 0, 40, 30);
        let panel = Size::new(4, 3);
        let at = |pos| place(anchor, req(anchor, pos), panel, viewport).unwrap();
        assert_eq!(at(TooltipPosition::BottomStart), Rect::new(10, 13, 4, 3));
        assert_eq!(at(TooltipPosition::BottomEnd), Rect::new(12, 13, 4, 3));
        assert_eq!(at(TooltipPosition::Right), Rect::new(17, 10, 4, 3));
        assert_eq!(at(TooltipPosition::LeftStart), Rect::new(5, 10, 4, 3));
    }

    #[test]
    fn clamps_into_viewport() {
        let anchor = Rect::new(0, 0, 4, 1);
        let rect = place(
            anchor,
            req(anchor, TooltipPosition::Top),
            Size::new(10, 3),
            Rect::new(0, 0, 8, 5),
        )
        .unwrap();
        assert_eq!(rect, Rect::new(0, 0, 8, 3));
    }

    #[test]
    fn engine_without_anchor_has_no_placement() {
        let mut engine = CellPlacementEngine::new();
        engine.set_bounds(Rect::new(0, 0, 20, 10), Size::new(5, 3));
        engine.bind_anchor(PlacementRequest {
            anchor: None,
            position: TooltipPosition::Top,
        });
        engine.recompute();
        assert_eq!(engine.placement(), None);
        assert_eq!(engine.recompute_count(), 1);
    }

    #[test]
    fn recompute_handle_drives_shared_engine() {
        let engine = Rc::new(RefCell::new(CellPlacementEngine::new()));
        let anchor = Rect::new(5, 5, 2, 1);
        engine
            .borrow_mut()
            .set_bounds(Rect::new(0, 0, 20, 20), Size::new(4, 3));
        engine
            .borrow_mut()
            .bind_anchor(req(anchor, TooltipPosition::Bottom));
        let mut handle = recompute_handle(&engine);
        handle();
        assert_eq!(engine.borrow().placement(), Some(Rect::new(4, 7, 4, 3)));
    }

    #[test]
    fn moved_anchor_drops_stale_placement() {
        let mut engine = CellPlacementEngine::new();
        let viewport = Rect::new(0, 0, 40, 20);
        engine.set_bounds(viewport, Size::new(4, 3));
        engine.bind_anchor(req(Rect::new(5, 5, 2, 1), TooltipPosition::Bottom));
        engine.recompute();
        assert_eq!(engine.placement(), Some(Rect::new(4, 7, 4, 3)));

        // same inputs keep the placement
        engine.set_bounds(viewport, Size::new(4, 3));
        engine.bind_anchor(req(Rect::new(5, 5, 2, 1), TooltipPosition::Bottom));
        assert_eq!(engine.placement(), Some(Rect::new(4, 7, 4, 3)));

        engine.bind_anchor(req(Rect::new(30, 10, 2, 1), TooltipPosition::Bottom));
        assert_eq!(engine.placement(), None);
        engine.recompute();
        engine.set_bounds(Rect::new(0, 0, 30, 20), Size::new(4, 3));
        assert_eq!(engine.placement(), None);
    }
}
