//! Rendering Seam
//!
//! The interpreter never draws anything itself; it issues ordered calls
//! against the [`Renderer`] trait. A real backend binds these to a plotting
//! toolkit; [`TraceRenderer`] just logs them, which keeps the server
//! runnable headless and makes interpreter output easy to inspect.

pub mod trace;

pub use trace::TraceRenderer;

use crate::points::{ImageGrid, PointSeries};
use crate::protocol::ScaleKind;

/// The drawing collaborator driven by the frame interpreter.
///
/// Call order within a frame is significant and is the backend's only
/// sequencing contract: `clear`, then per subplot a `select_subplot`
/// followed by that subplot's style and draw calls, then `finalize_layout`
/// and an optional `save`.
pub trait Renderer {
    /// Drop all prior figure content; issued at the start of every frame.
    fn clear(&mut self);

    /// Select axes slot `index` (0-based, row-major) in a rows x cols grid.
    fn select_subplot(&mut self, rows: usize, cols: usize, index: usize);

    /// Draw a line/marker series on the current subplot. `scale` is never
    /// [`ScaleKind::Image`]; image data arrives via [`plot_image`].
    ///
    /// [`plot_image`]: Renderer::plot_image
    fn plot_series(
        &mut self,
        series: &PointSeries,
        scale: ScaleKind,
        line_style: Option<&str>,
        label: Option<&str>,
    );

    /// Draw a 2D value grid on the current subplot.
    fn plot_image(&mut self, grid: &ImageGrid, colormap: &str, colorbar: bool);

    fn set_title(&mut self, text: &str);
    fn set_x_label(&mut self, text: &str);
    fn set_y_label(&mut self, text: &str);
    fn set_super_title(&mut self, text: &str);

    /// Draw the legend at `location` ("best", "upper right", ...).
    fn set_legend(&mut self, location: &str);

    /// Apply axis limits to the current subplot; `None` leaves an axis on
    /// automatic limits.
    fn set_ranges(&mut self, x_range: Option<(f64, f64)>, y_range: Option<(f64, f64)>);

    /// Resize the figure, in inches.
    fn set_figure_size(&mut self, width: f64, height: f64);

    /// Tighten subplot spacing once the whole frame has been drawn.
    fn finalize_layout(&mut self);

    /// Save the figure; format is inferred from the extension.
    fn save(&mut self, filename: &str, dpi: Option<u32>);

    /// Process pending UI events without blocking. Called on a short timer
    /// whenever the server is otherwise idle, and once per rendered frame.
    fn pump(&mut self);
}
