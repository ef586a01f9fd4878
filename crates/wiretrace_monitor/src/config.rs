//! Configuration for the monitor view.

use wiretrace_foundation::{Error, Result};

/// Layout and scale settings for a [`MonitorView`](crate::MonitorView).
///
/// Widths are in pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MonitorConfig {
    /// Horizontal pixels per simulation tick.
    pub pixels_per_tick: u32,

    /// Ticks between vertical grid lines.
    pub grid_step: u64,

    /// Canvas width before the first resize.
    pub initial_width: u32,

    /// Smallest canvas width a resize can produce.
    pub min_canvas_width: u32,

    /// Width reserved for the identity labels left of the canvas.
    pub label_column_width: u32,

    /// Height of one waveform row.
    pub row_height: u32,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            pixels_per_tick: 5,
            grid_step: 1,
            initial_width: 800,
            min_canvas_width: 100,
            label_column_width: 300,
            row_height: 25,
        }
    }
}

impl MonitorConfig {
    /// Creates a dense layout for many signals.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            pixels_per_tick: 2,
            grid_step: 5,
            label_column_width: 150,
            row_height: 15,
            ..Self::default()
        }
    }

    /// Creates a zoomed-in layout for inspecting a few signals.
    #[must_use]
    pub fn detailed() -> Self {
        Self {
            pixels_per_tick: 20,
            grid_step: 1,
            initial_width: 1200,
            row_height: 40,
            ..Self::default()
        }
    }

    /// Builder method to set pixels per tick.
    #[must_use]
    pub fn with_pixels_per_tick(mut self, pixels: u32) -> Self {
        self.pixels_per_tick = pixels;
        self
    }

    /// Builder method to set the grid step.
    #[must_use]
    pub fn with_grid_step(mut self, ticks: u64) -> Self {
        self.grid_step = ticks;
        self
    }

    /// Builder method to set the initial canvas width.
    #[must_use]
    pub fn with_initial_width(mut self, width: u32) -> Self {
        self.initial_width = width;
        self
    }

    /// Builder method to set the minimum canvas width.
    #[must_use]
    pub fn with_min_canvas_width(mut self, width: u32) -> Self {
        self.min_canvas_width = width;
        self
    }

    /// Builder method to set the label column width.
    #[must_use]
    pub fn with_label_column_width(mut self, width: u32) -> Self {
        self.label_column_width = width;
        self
    }

    /// Builder method to set the row height.
    #[must_use]
    pub fn with_row_height(mut self, height: u32) -> Self {
        self.row_height = height;
        self
    }

    /// Checks that every scale factor is usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `pixels_per_tick`, `grid_step` or
    /// `row_height` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.pixels_per_tick == 0 {
            return Err(Error::invalid_config("pixels_per_tick must be positive"));
        }
        if self.grid_step == 0 {
            return Err(Error::invalid_config("grid_step must be positive"));
        }
        if self.row_height == 0 {
            return Err(Error::invalid_config("row_height must be positive"));
        }
        Ok(())
    }

    /// Returns the canvas width for `available` pixels of container width.
    #[must_use]
    pub fn canvas_width(&self, available: u32) -> u32 {
        available
            .saturating_sub(self.label_column_width)
            .max(self.min_canvas_width)
    }
}
