use std::io;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use tracing::Level;

use term_tooltip::components::{Component, ComponentContext, Tooltip};
use term_tooltip::config::{DisplayConfig, TooltipKind, TooltipPosition};
use term_tooltip::constants::POLL_INTERVAL;
use term_tooltip::device::{DeviceMode, EnvDeviceMode};
use term_tooltip::drivers::console::{ConsoleInputDriver, ConsoleOutputDriver};
use term_tooltip::drivers::{InputDriver, OutputDriver};
use term_tooltip::event_loop::{ControlFlow, EventLoop};
use term_tooltip::positioning::CellPlacementEngine;
use term_tooltip::timer::{DeadlineTimers, TimerHost};
use term_tooltip::tracing_sub::{self, SubscriberMakeWriter};
use term_tooltip::ui::UiFrame;

const GRID_COLUMNS: usize = 3;

#[derive(Parser, Debug)]
#[command(
    name = "term-tooltip",
    version = env!("CARGO_PKG_VERSION"),
    about = "Hover over the anchors to show their tooltips"
)]
struct Cli {
    /// Visual variant for every tooltip.
    #[arg(long, value_name = "KIND", default_value_t = TooltipKind::Default)]
    kind: TooltipKind,

    /// Place every tooltip on this side. By default each anchor shows its
    /// own position.
    #[arg(long, value_name = "POSITION")]
    position: Option<TooltipPosition>,

    /// Treat the terminal as a touch device: clicks toggle tooltips.
    #[arg(long, conflicts_with = "pointer")]
    touch: bool,

    /// Treat the terminal as a pointer device: clicks never toggle tooltips.
    #[arg(long)]
    pointer: bool,

    /// Append tracing output to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Maximum tracing level.
    #[arg(long, value_name = "LEVEL", default_value_t = Level::WARN)]
    log_level: Level,
}

impl Cli {
    fn forced_touch(&self) -> Option<bool> {
        match (self.touch, self.pointer) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

/// Device probe for the demo: a CLI flag wins, otherwise the environment.
#[derive(Debug, Clone, Copy)]
struct DemoDevice {
    forced: Option<bool>,
}

impl DeviceMode for DemoDevice {
    fn is_touch_device(&self) -> bool {
        self.forced.unwrap_or_else(|| EnvDeviceMode.is_touch_device())
    }
}

type DemoTooltip = Tooltip<DeadlineTimers, DemoDevice>;

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let writer = match &cli.log_file {
        Some(path) => SubscriberMakeWriter::file(path)?,
        None => SubscriberMakeWriter::stderr(),
    };
    tracing_sub::init(writer, cli.log_level);

    let mut app = App::new(&cli);
    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut event_loop = EventLoop::new(ConsoleInputDriver::new(), POLL_INTERVAL);
    event_loop.driver().set_mouse_capture(true)?;
    tracing::info!(tooltips = app.tooltips.len(), "demo started");

    let result = event_loop.run(|_driver, event| {
        match event {
            Some(evt) => {
                if is_quit(&evt) {
                    return Ok(ControlFlow::Quit);
                }
                app.handle_event(&evt);
                Ok(ControlFlow::Continue)
            }
            None => {
                app.poll_timers();
                output.draw(|mut frame| app.render(&mut frame))?;
                app.on_update();
                Ok(app
                    .next_deadline()
                    .map_or(ControlFlow::Continue, ControlFlow::WakeAt))
            }
        }
    });

    app.destroy();
    output.exit()?;
    result
}

fn is_quit(event: &Event) -> bool {
    let Event::Key(key) = event else {
        return false;
    };
    if key.kind != KeyEventKind::Press {
        return false;
    }
    matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

struct App {
    tooltips: Vec<DemoTooltip>,
}

impl App {
    fn new(cli: &Cli) -> Self {
        let device = DemoDevice {
            forced: cli.forced_touch(),
        };
        let tooltips = TooltipPosition::ALL
            .into_iter()
            .map(|pos| {
                let position = cli.position.unwrap_or(pos);
                let config = DisplayConfig::new()
                    .with_kind(cli.kind)
                    .with_position(position);
                let body = format!("placed {position}\nkind {}", cli.kind);
                Tooltip::new(
                    format!("[{pos}]"),
                    body,
                    config,
                    DeadlineTimers::default(),
                    device,
                    CellPlacementEngine::new(),
                )
            })
            .collect();
        Self { tooltips }
    }

    /// Mouse events go to the topmost tooltip under the pointer only; the rest
    /// see the pointer move away. Other events reach every tooltip.
    fn handle_event(&mut self, event: &Event) {
        let ctx = ComponentContext::default();
        let Event::Mouse(mouse) = event else {
            for tip in &mut self.tooltips {
                tip.handle_event(event, &ctx);
            }
            return;
        };
        let owner = self
            .draw_order()
            .into_iter()
            .rev()
            .find(|&i| self.tooltips[i].region_at(mouse.column, mouse.row).is_some());
        let moved = matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_));
        for (i, tip) in self.tooltips.iter_mut().enumerate() {
            if Some(i) == owner {
                tip.handle_event(event, &ctx);
            } else if moved {
                tip.on_pointer_outside();
            }
        }
    }

    /// Open tooltips last so their panels sit above the other anchors.
    fn draw_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.tooltips.len()).collect();
        order.sort_by_key(|&i| self.tooltips[i].is_open());
        order
    }

    fn poll_timers(&mut self) {
        for tip in &mut self.tooltips {
            tip.poll_timers();
        }
    }

    fn on_update(&mut self) {
        for tip in &mut self.tooltips {
            tip.on_update();
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.tooltips
            .iter()
            .filter_map(|tip| tip.controller().timers().next_deadline())
            .min()
    }

    fn render(&mut self, frame: &mut UiFrame<'_>) {
        let area = frame.area();
        frame.set_string(
            area.x + 1,
            area.y,
            "hover an anchor to show its tooltip, q to quit",
            Style::default().add_modifier(Modifier::DIM),
        );
        let body = Rect {
            y: area.y.saturating_add(1),
            height: area.height.saturating_sub(1),
            ..area
        };
        let anchors = anchor_rects(body, &self.tooltips);
        let ctx = ComponentContext::default();
        for i in self.draw_order() {
            self.tooltips[i].render(frame, anchors[i], &ctx);
        }
    }

    fn destroy(&mut self) {
        for tip in self.tooltips.drain(..) {
            tip.on_destroy();
        }
    }
}

/// Lay anchors out in a grid, each centered in its cell.
fn anchor_rects(area: Rect, tooltips: &[DemoTooltip]) -> Vec<Rect> {
    let rows = tooltips.len().div_ceil(GRID_COLUMNS);
    let row_areas = Layout::vertical(vec![Constraint::Fill(1); rows]).split(area);
    tooltips
        .iter()
        .enumerate()
        .map(|(i, tip)| {
            let cols = Layout::horizontal(vec![Constraint::Fill(1); GRID_COLUMNS])
                .split(row_areas[i / GRID_COLUMNS]);
            let cell = cols[i % GRID_COLUMNS];
            let width = (tip.anchor_text().chars().count() as u16).min(cell.width);
            Rect {
                x: cell.x + (cell.width - width) / 2,
                y: cell.y + cell.height / 2,
                width,
                height: cell.height.min(1),
            }
        })
        .collect()
}
