//! plotwire Server Binary
//!
//! Starts the plot server on the loopback port clients expect. There are
//! no flags and no configuration; set RUST_LOG to change log verbosity.

use log::info;

use plotwire::{Server, TraceRenderer, DEFAULT_PORT};

#[tokio::main(flavor = "current_thread")]
async fn main() -> std::io::Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("plotwire v{} - socket plot server", env!("CARGO_PKG_VERSION"));

    let mut renderer = TraceRenderer::new();
    Server::new(DEFAULT_PORT).run(&mut renderer).await
}
