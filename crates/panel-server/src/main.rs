//! DAC control panel server.
//!
//! Serves a small HTTP API that starts and stops network stream playback on
//! an ALSA output device. Playback runs in external player processes owned by
//! a single worker thread (see `stream_player`).

mod api;
mod config;
mod openapi;
mod startup;
mod state;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_SHA"),
    ", ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "panel-server", version = VERSION)]
pub(crate) struct Args {
    /// HTTP bind address, e.g. 0.0.0.0:5000
    #[arg(long)]
    pub(crate) bind: Option<std::net::SocketAddr>,

    /// Optional server config file (TOML)
    #[arg(long)]
    pub(crate) config: Option<PathBuf>,

    /// Default output device when a start request names none, e.g. hw:0,0
    #[arg(long)]
    pub(crate) device: Option<String>,

    /// Directory holding the control panel index.html
    #[arg(long)]
    pub(crate) web_root: Option<PathBuf>,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new("info,actix_web=info,panel_server=info,stream_player=info")
        }))
        .init();

    startup::run(args).await
}
