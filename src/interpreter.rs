//! Frame Interpreter
//!
//! Walks one complete instruction frame and turns it into an ordered run of
//! [`Renderer`] calls. The interpreter is a small state machine: before the
//! first `!!New2D` it skips tokens, then it processes one subplot at a
//! time, accumulating style state and dispatching draw calls whenever a
//! point list closes, and finally it settles frame-level concerns (layout,
//! save) once every subplot is done.
//!
//! Styling is order-dependent by design: a style token applies to point
//! lists that come after it, within the same subplot. Titles, axis labels,
//! the legend, and the figure size go straight to the renderer; everything
//! else is buffered in [`SubplotStyle`] until a point list or the subplot
//! end consumes it.

use thiserror::Error;

use crate::layout::grid_dims;
use crate::points::{parse_image, parse_points, ImageError};
use crate::protocol::{self, ProtocolError, ScaleKind, Token};
use crate::renderer::Renderer;

/// Colormap used for image plots unless the client picks one.
const DEFAULT_COLORMAP: &str = "plasma";

/// Legend placement used when the client sends `!!Legend<>` with an empty
/// location.
const AUTO_LEGEND: &str = "best";

/// Errors that abort interpretation of the current frame. The connection
/// survives; the next frame starts from clean state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FrameError {
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Image(#[from] ImageError),

    /// A point list was opened but the frame ended before `!!EndPts`.
    #[error("point list is never terminated")]
    UnterminatedPointList,
}

/// Style state scoped to the subplot currently being interpreted.
///
/// Reset to defaults at each `!!New2D`. The buffered print filename and
/// dpi outlive the subplot: they are hoisted to frame level when the
/// subplot closes, last write winning across subplots.
#[derive(Debug, Clone, Default)]
pub struct SubplotStyle {
    pub scale: ScaleKind,
    pub line: Option<String>,
    pub label: Option<String>,
    pub colormap: Option<String>,
    pub colorbar: bool,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    pub print: Option<String>,
    pub dpi: Option<u32>,
}

/// Interpret one complete frame against `renderer`.
///
/// The frame must be the token run produced by
/// [`TokenBuffer::take_frames`](crate::framing::TokenBuffer::take_frames):
/// first token `!!StartIBuf`, last token `!!EndIBuf`. The figure is always
/// cleared; a frame with no `!!New2D` markers does nothing else. On error
/// the calls already issued stand, and the caller moves on to the next
/// frame.
pub fn interpret<R: Renderer>(frame: &[String], renderer: &mut R) -> Result<(), FrameError> {
    renderer.clear();

    let subplot_count = frame
        .iter()
        .filter(|line| *line == protocol::NEW_PLOT)
        .count();
    let Some(first) = frame.iter().position(|line| line == protocol::NEW_PLOT) else {
        return Ok(());
    };
    let (rows, cols) = grid_dims(subplot_count);

    // Frame-level save target, hoisted from whichever subplots set one.
    let mut save: Option<(String, Option<u32>)> = None;

    let mut idx = first;
    for i in 0..subplot_count {
        idx += 1;
        renderer.select_subplot(rows, cols, i);
        let mut style = SubplotStyle::default();

        while idx < frame.len() {
            let line = frame[idx].as_str();
            if line == protocol::NEW_PLOT || line == protocol::END_BUFFER {
                break;
            }

            if line == protocol::START_POINTS || line.starts_with(protocol::DIMENSION_TAG) {
                let end = frame[idx..]
                    .iter()
                    .position(|l| l == protocol::END_POINTS)
                    .map(|off| idx + off)
                    .ok_or(FrameError::UnterminatedPointList)?;
                let block = &frame[idx..=end];

                if style.scale == ScaleKind::Image {
                    let grid = parse_image(block)?;
                    let colormap = style.colormap.as_deref().unwrap_or(DEFAULT_COLORMAP);
                    renderer.plot_image(&grid, colormap, style.colorbar);
                } else {
                    let series = parse_points(block);
                    renderer.plot_series(
                        &series,
                        style.scale,
                        style.line.as_deref(),
                        style.label.as_deref(),
                    );
                }
                idx = end + 1;
                continue;
            }

            match Token::parse(line)? {
                Token::Scale(kind) => style.scale = kind,
                Token::ImageMode => style.scale = ScaleKind::Image,
                Token::LineStyle(s) => style.line = Some(s),
                Token::Label(s) => style.label = Some(s),
                Token::Colormap(s) => style.colormap = Some(s),
                Token::Colorbar => style.colorbar = true,
                Token::XRange { min, max } => style.x_range = Some((min, max)),
                Token::YRange { min, max } => style.y_range = Some((min, max)),
                Token::Print(file) => style.print = Some(file),
                Token::Dpi(n) => style.dpi = Some(n),
                Token::Title(text) => renderer.set_title(&text),
                Token::XTitle(text) => renderer.set_x_label(&text),
                Token::YTitle(text) => renderer.set_y_label(&text),
                Token::SupTitle(text) => renderer.set_super_title(&text),
                Token::Legend(loc) => {
                    let loc = if loc.is_empty() { AUTO_LEGEND } else { loc.as_str() };
                    renderer.set_legend(loc);
                }
                Token::FigSize { width, height } => renderer.set_figure_size(width, height),
                // stray points/values outside a list, free text, and the
                // remaining sentinels carry no meaning here
                _ => {}
            }
            idx += 1;
        }

        renderer.set_ranges(style.x_range, style.y_range);
        if let Some(file) = style.print.take() {
            save = Some((file, style.dpi));
        }
    }

    renderer.finalize_layout();
    if let Some((file, dpi)) = save {
        renderer.save(&file, dpi);
    }
    renderer.pump();
    Ok(())
}
