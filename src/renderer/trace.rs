//! Trace Renderer
//!
//! A diagnostic backend that logs every call it receives instead of
//! drawing. Useful for running the server without a plotting toolkit and
//! for eyeballing what a client's instruction stream actually does.

use log::{debug, info, trace};

use super::Renderer;
use crate::points::{ImageGrid, PointSeries};
use crate::protocol::ScaleKind;

/// Renderer that narrates calls to the log at debug level.
#[derive(Debug, Default)]
pub struct TraceRenderer {
    frames: u64,
    subplot: usize,
}

impl TraceRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Renderer for TraceRenderer {
    fn clear(&mut self) {
        self.frames += 1;
        self.subplot = 0;
        debug!("frame {}: clear", self.frames);
    }

    fn select_subplot(&mut self, rows: usize, cols: usize, index: usize) {
        self.subplot = index;
        debug!("subplot {} of a {}x{} grid", index, rows, cols);
    }

    fn plot_series(
        &mut self,
        series: &PointSeries,
        scale: ScaleKind,
        line_style: Option<&str>,
        label: Option<&str>,
    ) {
        debug!(
            "subplot {}: series of {} points, scale {:?}, line {:?}, label {:?}",
            self.subplot,
            series.len(),
            scale,
            line_style,
            label
        );
    }

    fn plot_image(&mut self, grid: &ImageGrid, colormap: &str, colorbar: bool) {
        debug!(
            "subplot {}: image {}x{}, colormap {}, colorbar {}",
            self.subplot,
            grid.width(),
            grid.height(),
            colormap,
            colorbar
        );
    }

    fn set_title(&mut self, text: &str) {
        debug!("subplot {}: title {:?}", self.subplot, text);
    }

    fn set_x_label(&mut self, text: &str) {
        debug!("subplot {}: x label {:?}", self.subplot, text);
    }

    fn set_y_label(&mut self, text: &str) {
        debug!("subplot {}: y label {:?}", self.subplot, text);
    }

    fn set_super_title(&mut self, text: &str) {
        debug!("super title {:?}", text);
    }

    fn set_legend(&mut self, location: &str) {
        debug!("subplot {}: legend at {:?}", self.subplot, location);
    }

    fn set_ranges(&mut self, x_range: Option<(f64, f64)>, y_range: Option<(f64, f64)>) {
        if x_range.is_some() || y_range.is_some() {
            debug!(
                "subplot {}: ranges x {:?} y {:?}",
                self.subplot, x_range, y_range
            );
        }
    }

    fn set_figure_size(&mut self, width: f64, height: f64) {
        debug!("figure size {}x{} in", width, height);
    }

    fn finalize_layout(&mut self) {
        debug!("frame {}: layout finalized", self.frames);
    }

    fn save(&mut self, filename: &str, dpi: Option<u32>) {
        info!("frame {}: save to {} (dpi {:?})", self.frames, filename, dpi);
    }

    fn pump(&mut self) {
        trace!("pump");
    }
}
