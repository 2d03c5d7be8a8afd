mod app;
mod ui;
mod viewport;

// Re-export library modules so that `crate::build`, `crate::state`, etc.
// resolve to the lib crate types everywhere in the binary.
pub use frustum_viewer_lib::build;
pub use frustum_viewer_lib::gaze;
pub use frustum_viewer_lib::state;
pub use frustum_viewer_lib::textures;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use shared::InteractionMode;
use thiserror::Error;

use app::ViewerApp;
use gaze::{GazeAdapter, GazeFeed, GazeFeedError, LandmarkSource};
use state::{ConfigError, ViewerSettings, ViewerState};

/// Interactive viewer for a textured frustum solid
#[derive(Parser, Debug)]
#[command(name = "frustum-viewer", version, about)]
struct Cli {
    /// Settings file (JSON). Defaults to settings.json in the user config directory.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Input mode: pointer or gaze
    #[arg(long, value_name = "MODE")]
    mode: Option<InteractionMode>,

    /// Landmark frames as JSON lines, `-` for stdin. Implies gaze mode unless --mode is given.
    #[arg(long, value_name = "PATH|-")]
    landmarks: Option<LandmarkSource>,

    /// Write the default settings to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    GazeFeed(#[from] GazeFeedError),
    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to open window: {0}")]
    Window(#[from] eframe::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "frustum_viewer=info,frustum_viewer_lib=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), StartupError> {
    if let Some(path) = &cli.write_default_config {
        ViewerSettings::default().save_to(path)?;
        tracing::info!("Wrote default settings to {}", path.display());
        return Ok(());
    }

    let mut settings = match &cli.config {
        Some(path) => ViewerSettings::load_from(path)?,
        None => ViewerSettings::load()?,
    };
    match (cli.mode, &cli.landmarks) {
        (Some(mode), _) => settings.interaction.mode = mode,
        (None, Some(_)) => settings.interaction.mode = InteractionMode::Gaze,
        (None, None) => {}
    }
    settings.validate()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("frustum-io")
        .enable_all()
        .build()
        .map_err(StartupError::Runtime)?;

    let adapter = GazeAdapter::new(&settings.detector);
    let gaze_feed = cli
        .landmarks
        .map(|source| GazeFeed::spawn(runtime.handle(), source, adapter))
        .transpose()?;

    if settings.interaction.mode == InteractionMode::Gaze && gaze_feed.is_none() {
        tracing::warn!("Gaze mode without a landmark feed; orientation holds still");
    }

    let p = &settings.solid.params;
    tracing::info!(
        "Starting viewer: solid {}/{}/{} (top/bottom/height), mode {}, {} face textures",
        p.top_edge,
        p.bottom_edge,
        p.height,
        settings.interaction.mode,
        settings.textures.sources().count()
    );

    let state = ViewerState::new(settings);
    let handle = runtime.handle().clone();

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Frustum Viewer")
            .with_inner_size([1024.0, 768.0])
            .with_min_inner_size([320.0, 240.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        "frustum-viewer",
        native_options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, state, gaze_feed, handle)))),
    );

    // A stdin reader may still be parked in a blocking read
    runtime.shutdown_background();

    result.map_err(StartupError::from)
}
