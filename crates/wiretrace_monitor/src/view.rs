//! Headless waveform view model.
//!
//! [`MonitorView`] keeps one [`Row`] per tracked signal and a [`Viewport`]
//! that follows the simulation clock. Painting is delegated to a
//! [`WaveformRenderer`]; this module never touches pixels.

use wiretrace_foundation::{Mailbox, Result, Subscription, Tick, WireId};

use crate::binding::SettleObserver;
use crate::config::MonitorConfig;
use crate::history::ValueHistory;
use crate::identity::SignalIdentity;
use crate::registry::{MonitorEvent, TraceRegistry};

// =============================================================================
// Row
// =============================================================================

/// One displayed signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Row {
    /// Identity the row is keyed by.
    pub identity: SignalIdentity,
    /// The wire shown.
    pub wire: WireId,
    /// Text for the label column.
    pub label: String,
}

impl Row {
    fn new(identity: SignalIdentity, wire: WireId) -> Self {
        let label = identity.to_string();
        Self {
            identity,
            wire,
            label,
        }
    }
}

// =============================================================================
// Viewport
// =============================================================================

/// The visible slice of simulated time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    /// Tick at the left edge. Negative until enough time has elapsed to fill
    /// the canvas.
    pub start: i64,
    /// Tick at the right edge.
    pub present: Tick,
    /// Horizontal pixels per tick.
    pub pixels_per_tick: u32,
    /// Ticks between grid lines.
    pub grid_step: u64,
    /// Canvas width in pixels.
    pub width: u32,
}

impl Viewport {
    /// Creates a viewport at tick zero.
    #[must_use]
    pub fn new(config: &MonitorConfig) -> Self {
        Self {
            start: 0,
            present: 0,
            pixels_per_tick: config.pixels_per_tick,
            grid_step: config.grid_step,
            width: config.initial_width,
        }
    }

    /// Number of whole ticks the canvas can show.
    #[must_use]
    pub fn visible_ticks(&self) -> u64 {
        u64::from(self.width / self.pixels_per_tick.max(1))
    }

    /// Moves the right edge to `tick`, keeping the canvas full.
    pub fn follow(&mut self, tick: Tick) {
        let tick_i = i64::try_from(tick).unwrap_or(i64::MAX);
        let span = i64::try_from(self.visible_ticks()).unwrap_or(i64::MAX);
        self.start = tick_i.saturating_sub(span);
        self.present = tick;
    }

    /// Returns the visible ticks clamped to the start of time, inclusive.
    #[must_use]
    pub fn tick_range(&self) -> (Tick, Tick) {
        (u64::try_from(self.start).unwrap_or(0), self.present)
    }

    /// Returns the x coordinate of `tick` relative to the canvas's left edge.
    #[must_use]
    pub fn x_of(&self, tick: Tick) -> i64 {
        let tick = i64::try_from(tick).unwrap_or(i64::MAX);
        tick.saturating_sub(self.start)
            .saturating_mul(i64::from(self.pixels_per_tick))
    }

    /// Returns the ticks at which grid lines fall inside the viewport.
    pub fn grid_ticks(&self) -> impl Iterator<Item = Tick> {
        let step = self.grid_step.max(1);
        let (first, last) = self.tick_range();
        let aligned = first.div_ceil(step) * step;
        (aligned..=last).step_by(usize::try_from(step).unwrap_or(usize::MAX))
    }
}

// =============================================================================
// Waveform Renderer
// =============================================================================

/// Paints one row's history into the viewport.
pub trait WaveformRenderer {
    /// Draws `history` for `row`.
    fn draw(&mut self, row: &Row, history: &ValueHistory, viewport: &Viewport);
}

// =============================================================================
// Monitor View
// =============================================================================

/// Rows and viewport for a set of waveforms.
pub struct MonitorView<R> {
    config: MonitorConfig,
    rows: Vec<Row>,
    viewport: Viewport,
    renderer: R,
    events: Mailbox<MonitorEvent>,
    _subscription: Subscription,
}

impl<R: WaveformRenderer> MonitorView<R> {
    /// Creates a view over `registry`, then renders it once.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration fails validation.
    pub fn new(config: MonitorConfig, registry: &TraceRegistry, renderer: R) -> Result<Self> {
        config.validate()?;
        let events = Mailbox::new();
        let subscription = events.subscribe_to(registry);
        let mut view = Self {
            viewport: Viewport::new(&config),
            config,
            rows: Vec::new(),
            renderer,
            events,
            _subscription: subscription,
        };
        view.render(registry);
        Ok(view)
    }

    /// Applies pending registry notifications to the rows. Returns how many
    /// were applied.
    pub fn sync(&mut self) -> usize {
        let events = self.events.drain();
        for event in &events {
            match event {
                MonitorEvent::Added { wire, identity } => {
                    if !self.rows.iter().any(|r| r.wire == *wire) {
                        self.rows.push(Row::new(identity.clone(), *wire));
                    }
                }
                MonitorEvent::Removed { wire, .. } => {
                    self.rows.retain(|r| r.wire != *wire);
                }
                MonitorEvent::Moved { wire, to, .. } => {
                    if let Some(row) = self.rows.iter_mut().find(|r| r.wire == *wire) {
                        *row = Row::new(to.clone(), *wire);
                    }
                }
            }
        }
        events.len()
    }

    /// Rebuilds every row from `registry` and draws them.
    pub fn render(&mut self, registry: &TraceRegistry) {
        self.events.drain();
        self.rows = registry
            .entries()
            .map(|e| Row::new(e.identity().clone(), e.wire()))
            .collect();
        self.draw_all(registry);
    }

    /// Fits the canvas to `available` pixels of container width. Returns the
    /// new canvas width.
    pub fn resize(&mut self, available: u32) -> u32 {
        self.viewport.width = self.config.canvas_width(available);
        self.viewport.width
    }

    /// Scrolls the viewport to `tick` and redraws.
    pub fn on_settle(&mut self, tick: Tick, registry: &TraceRegistry) {
        self.sync();
        self.viewport.follow(tick);
        self.draw_all(registry);
    }

    /// Draws every row's current history.
    pub fn draw_all(&mut self, registry: &TraceRegistry) {
        for row in &self.rows {
            let entry = registry
                .get(row.identity.as_str())
                .or_else(|| registry.entry_for(row.wire));
            match entry {
                Some(entry) => self.renderer.draw(row, entry.history(), &self.viewport),
                None => tracing::trace!(identity = %row.identity, "row has no entry; skipped"),
            }
        }
    }

    /// Returns the rows in display order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Returns the top edge of row `index`.
    #[must_use]
    pub fn row_top(&self, index: usize) -> u32 {
        u32::try_from(index)
            .unwrap_or(u32::MAX)
            .saturating_mul(self.config.row_height)
    }

    /// Returns the viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Returns the renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Returns the renderer mutably.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }
}

impl<R: WaveformRenderer> SettleObserver for MonitorView<R> {
    fn settled(&mut self, tick: Tick, registry: &TraceRegistry) {
        self.on_settle(tick, registry);
    }
}

impl<R> std::fmt::Debug for MonitorView<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorView")
            .field("rows", &self.rows)
            .field("viewport", &self.viewport)
            .finish_non_exhaustive()
    }
}
