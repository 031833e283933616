//! lots_o_hats - put accessories on everything the detector finds
//!
//! Usage:
//!   lots_o_hats <source> --config crown.json [--backend replay|tract]
//!
//! `<source>` is a capture device index (`0` for /dev/video0) or an image
//! path. Still images are processed once and stay on screen until cancelled;
//! devices are processed frame by frame until cancelled or closed.

use anyhow::{anyhow, Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use lots_o_hats::{
    DetectorBackend, DisplaySurface, FrameSource, HeadlessDisplay, OverlayConfig, OverlayContext,
    ReplayBackend, SourceId, StreamDriver,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    /// Replay a recorded detection feed for every frame.
    Replay,
    /// Run the configured ONNX classifier (feature: backend-tract).
    Tract,
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Capture device index or image path.
    source: String,
    /// Overlay configuration file (JSON, or TOML with a .toml extension).
    #[arg(long, env = "LOTS_O_HATS_CONFIG")]
    config: PathBuf,
    /// Detector backend.
    #[arg(long, value_enum, default_value_t = BackendKind::Replay)]
    backend: BackendKind,
    /// JSON array of detector output for the replay backend.
    #[arg(long)]
    replay_feed: Option<PathBuf>,
    /// Pause between live frames, in milliseconds.
    #[arg(long, default_value_t = 1)]
    frame_interval_ms: u64,
    /// Write the latest canvas to this image file after every pass.
    #[arg(long)]
    snapshot: Option<PathBuf>,
    /// Show the canvas in a desktop window (feature: display-window).
    #[arg(long)]
    window: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = OverlayConfig::load(&args.config)?;
    let context = OverlayContext::from_config(&config)?;
    log::info!("loaded {} overlay assets", context.assets.len());

    let mut detector = build_detector(&args, &config)?;
    let mut display = build_display(&args)?;

    let source_id = SourceId::parse(&args.source);
    let source = FrameSource::open(&source_id)
        .with_context(|| format!("failed to open source {}", args.source))?;
    log::info!("source {} selected ({:?} mode)", args.source, source.mode());

    let summary = StreamDriver::new(&context, detector.as_mut(), display.as_mut(), source)
        .with_frame_interval(Duration::from_millis(args.frame_interval_ms))
        .run()?;
    log::info!(
        "finished after {} frames ({} overlays)",
        summary.frames,
        summary.composited
    );
    Ok(())
}

fn build_detector(args: &Args, config: &OverlayConfig) -> Result<Box<dyn DetectorBackend>> {
    match args.backend {
        BackendKind::Replay => match &args.replay_feed {
            Some(path) => Ok(Box::new(ReplayBackend::from_file(path)?)),
            None => {
                log::warn!("no --replay-feed given; frames will have no detections");
                Ok(Box::new(ReplayBackend::from_values(Vec::new())))
            }
        },
        BackendKind::Tract => build_tract(config),
    }
}

#[cfg(feature = "backend-tract")]
fn build_tract(config: &OverlayConfig) -> Result<Box<dyn DetectorBackend>> {
    let artifacts = config
        .classifier
        .as_ref()
        .ok_or_else(|| anyhow!("tract backend needs classifierModel and classifierNetwork"))?;
    Ok(Box::new(lots_o_hats::detect::TractBackend::new(artifacts)?))
}

#[cfg(not(feature = "backend-tract"))]
fn build_tract(_config: &OverlayConfig) -> Result<Box<dyn DetectorBackend>> {
    Err(anyhow!("tract backend requires the backend-tract feature"))
}

fn build_display(args: &Args) -> Result<Box<dyn DisplaySurface>> {
    if args.window {
        return build_window(args);
    }
    let mut display = HeadlessDisplay::with_ctrlc()?;
    if let Some(path) = &args.snapshot {
        display = display.with_snapshot(path);
    }
    log::info!("running headless; press Ctrl-C to stop");
    Ok(Box::new(display))
}

#[cfg(feature = "display-window")]
fn build_window(args: &Args) -> Result<Box<dyn DisplaySurface>> {
    if args.snapshot.is_some() {
        log::warn!("--snapshot is ignored with --window");
    }
    Ok(Box::new(lots_o_hats::display::WindowDisplay::new()))
}

#[cfg(not(feature = "display-window"))]
fn build_window(_args: &Args) -> Result<Box<dyn DisplaySurface>> {
    Err(anyhow!("--window requires the display-window feature"))
}
