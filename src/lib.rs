//! plotwire - a socket-driven 2D plot server.
//!
//! Clients in any language connect over TCP and write a line-oriented,
//! `!!`-prefixed instruction stream describing figures: subplots, point
//! series, images, axis scales, titles, ranges, and save requests. The
//! server reassembles the stream into frames and interprets each frame
//! into ordered calls against a pluggable [`Renderer`].
//!
//! # Overview
//!
//! The pipeline, leaves first:
//! - [`framing`] reassembles raw socket bytes into token lines and carves
//!   out complete `!!StartIBuf`/`!!EndIBuf` frames
//! - [`protocol`] classifies each line into a typed [`Token`]
//! - [`layout`] maps a subplot count onto a grid shape
//! - [`points`] parses point lists and 2D value grids
//! - [`interpreter`] walks a frame and drives the [`Renderer`]
//! - [`server`] is the TCP accept loop and per-connection session
//!
//! # Example
//!
//! ```
//! use plotwire::{interpret, TokenBuffer, TraceRenderer};
//!
//! let mut buffer = TokenBuffer::new();
//! buffer.feed(b"!!StartIBuf\n!!New2D\n!!Title<hello>\n!!StartPts\n!!Pt<0,0>\n!!Pt<1,1>\n!!EndPts\n!!EndIBuf\n");
//!
//! let mut renderer = TraceRenderer::new();
//! for frame in buffer.take_frames() {
//!     interpret(&frame, &mut renderer).unwrap();
//! }
//! ```

pub mod framing;
pub mod interpreter;
pub mod layout;
pub mod points;
pub mod protocol;
pub mod renderer;
pub mod server;

// Re-export commonly used types
pub use framing::TokenBuffer;
pub use interpreter::{interpret, FrameError, SubplotStyle};
pub use layout::grid_dims;
pub use points::{ImageError, ImageGrid, PointSeries};
pub use protocol::{ProtocolError, ScaleKind, Token};
pub use renderer::{Renderer, TraceRenderer};
pub use server::{Server, Session, DEFAULT_PORT};
