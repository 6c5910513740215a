//! Plot Server
//!
//! Listens on a loopback TCP port for one client at a time and feeds its
//! byte stream through framing and interpretation. The whole server is one
//! cooperative task: between socket reads it ticks a short pump timer so
//! the renderer can keep its window responsive without burning a core.
//! Clients get no replies; the protocol is fire-and-forget, and every
//! diagnostic goes to the log.

use std::io;
use std::time::Duration;

use bytes::BytesMut;
use log::{debug, error, info};
use tokio::io::AsyncReadExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::{interval, MissedTickBehavior};

use crate::framing::TokenBuffer;
use crate::interpreter::interpret;
use crate::renderer::Renderer;

/// Port the original plotting clients expect.
pub const DEFAULT_PORT: u16 = 41410;

/// Upper bound on one socket read. A faster sender queues in the OS socket
/// buffer, not here.
const MAX_READ_BYTES: usize = 1024 * 1024;

/// How often the renderer gets to process pending UI events.
const PUMP_INTERVAL: Duration = Duration::from_millis(25);

/// Per-connection state: the reassembly buffer and nothing else.
///
/// Created when a client connects, dropped when it disconnects, so no
/// residual tokens ever leak from one client to the next.
#[derive(Debug, Default)]
pub struct Session {
    buffer: TokenBuffer,
}

impl Session {
    pub fn new() -> Self {
        Self { buffer: TokenBuffer::new() }
    }

    /// Feed one chunk of client bytes and interpret every frame it
    /// completes. A frame that fails mid-interpretation is logged and
    /// abandoned; later frames still render.
    pub fn ingest<R: Renderer>(&mut self, chunk: &[u8], renderer: &mut R) {
        self.buffer.feed(chunk);
        for frame in self.buffer.take_frames() {
            debug!("interpreting frame of {} tokens", frame.len());
            if let Err(e) = interpret(&frame, renderer) {
                error!("abandoning frame: {}", e);
            }
        }
    }
}

/// The plot server.
pub struct Server {
    port: u16,
}

impl Server {
    pub fn new(port: u16) -> Self {
        Self { port }
    }

    /// Bind the listening socket and serve until interrupted.
    ///
    /// Ctrl-C releases the socket and returns cleanly, whether the server
    /// is idle or mid-connection.
    pub async fn run<R: Renderer>(&self, renderer: &mut R) -> io::Result<()> {
        let listener = TcpListener::bind(("127.0.0.1", self.port)).await?;
        info!("listening on 127.0.0.1:{}", self.port);

        tokio::select! {
            result = serve(&listener, renderer) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                Ok(())
            }
        }
    }
}

/// Accept loop: one connection at a time, pump ticks while idle.
async fn serve<R: Renderer>(listener: &TcpListener, renderer: &mut R) -> io::Result<()> {
    let mut pump = interval(PUMP_INTERVAL);
    pump.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = pump.tick() => renderer.pump(),
            result = listener.accept() => {
                match result {
                    Ok((socket, addr)) => {
                        info!("client connected from {}", addr);
                        handle_connection(socket, renderer).await;
                        info!("client {} disconnected, listening again", addr);
                    }
                    Err(e) => error!("accept error: {}", e),
                }
            }
        }
    }
}

/// Drive one client connection until it closes or errors.
async fn handle_connection<R: Renderer>(mut socket: TcpStream, renderer: &mut R) {
    let mut session = Session::new();
    let mut buf = BytesMut::with_capacity(MAX_READ_BYTES);

    let mut pump = interval(PUMP_INTERVAL);
    pump.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = pump.tick() => renderer.pump(),
            result = socket.read_buf(&mut buf) => {
                match result {
                    // zero-length read: orderly close
                    Ok(0) => break,
                    Ok(n) => {
                        debug!("read {} bytes", n);
                        let chunk = buf.split();
                        session.ingest(&chunk, renderer);
                    }
                    Err(e) => {
                        error!("read error: {}", e);
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::points::{ImageGrid, PointSeries};
    use crate::protocol::ScaleKind;

    /// Renderer double that only counts what the session renders.
    #[derive(Default)]
    struct Counting {
        clears: usize,
        series: usize,
        points: usize,
    }

    impl Renderer for Counting {
        fn clear(&mut self) {
            self.clears += 1;
        }
        fn select_subplot(&mut self, _rows: usize, _cols: usize, _index: usize) {}
        fn plot_series(
            &mut self,
            series: &PointSeries,
            _scale: ScaleKind,
            _line_style: Option<&str>,
            _label: Option<&str>,
        ) {
            self.series += 1;
            self.points += series.len();
        }
        fn plot_image(&mut self, _grid: &ImageGrid, _colormap: &str, _colorbar: bool) {}
        fn set_title(&mut self, _text: &str) {}
        fn set_x_label(&mut self, _text: &str) {}
        fn set_y_label(&mut self, _text: &str) {}
        fn set_super_title(&mut self, _text: &str) {}
        fn set_legend(&mut self, _location: &str) {}
        fn set_ranges(&mut self, _x: Option<(f64, f64)>, _y: Option<(f64, f64)>) {}
        fn set_figure_size(&mut self, _width: f64, _height: f64) {}
        fn finalize_layout(&mut self) {}
        fn save(&mut self, _filename: &str, _dpi: Option<u32>) {}
        fn pump(&mut self) {}
    }

    #[test]
    fn test_session_renders_frames_split_across_reads() {
        let mut session = Session::new();
        let mut renderer = Counting::default();

        session.ingest(b"!!StartIBuf\n!!New2D\n!!StartPts\n!!Pt<0,0>\n!!Pt<1,", &mut renderer);
        assert_eq!(renderer.clears, 0);

        session.ingest(b"1>\n!!EndPts\n!!EndIBuf\n", &mut renderer);
        assert_eq!(renderer.clears, 1);
        assert_eq!(renderer.series, 1);
        assert_eq!(renderer.points, 2);
    }

    #[test]
    fn test_session_survives_malformed_frame() {
        let mut session = Session::new();
        let mut renderer = Counting::default();

        // end marker with no start marker, then a well-formed frame
        session.ingest(b"!!New2D\n!!EndIBuf\n", &mut renderer);
        assert_eq!(renderer.clears, 0);

        session.ingest(
            b"!!StartIBuf\n!!New2D\n!!StartPts\n!!Pt<2,3>\n!!EndPts\n!!EndIBuf\n",
            &mut renderer,
        );
        assert_eq!(renderer.clears, 1);
        assert_eq!(renderer.series, 1);
    }

    #[test]
    fn test_session_survives_aborted_frame() {
        let mut session = Session::new();
        let mut renderer = Counting::default();

        // malformed style token aborts the first frame mid-way
        session.ingest(
            b"!!StartIBuf\n!!New2D\n!!XRange<1>\n!!EndIBuf\n!!StartIBuf\n!!New2D\n!!StartPts\n!!Pt<0,0>\n!!EndPts\n!!EndIBuf\n",
            &mut renderer,
        );
        assert_eq!(renderer.clears, 2);
        assert_eq!(renderer.series, 1);
    }
}
