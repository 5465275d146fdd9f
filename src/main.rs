//! Photobooth CLI
//!
//! Interactive front end: type `start`, `capture`, `download`, `clear`,
//! `stop`, `view`, `metrics` or `quit`. The booth ticks at the camera frame
//! rate between commands.

use clap::{Parser, ValueEnum};
use photobooth::{
    booth::{PhotoBooth, StartOutcome},
    capture::{Camera, ConfigError, FileConfig, MockCamera},
    metrics::{MetricsRegistry, MetricsSnapshot},
    photo::DirectorySaver,
};
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    /// Synthetic frames, no hardware needed.
    Mock,
    /// Local camera device (requires the `camera` feature).
    Native,
}

#[derive(Debug, Parser)]
#[command(name = "photobooth", version, about = "Capture your moments")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory downloads are written into.
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Backend::Mock)]
    backend: Backend,

    /// Make the mock camera refuse permission.
    #[arg(long)]
    deny: bool,

    /// Mock frames delivered empty before the first decoded frame.
    #[arg(long, default_value_t = 0)]
    warmup_frames: u32,

    /// Serve Prometheus metrics on this port (0 disables).
    #[arg(long)]
    metrics_port: Option<u16>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to install Ctrl-C handler: {0}")]
    Signal(#[from] ctrlc::Error),
    #[cfg_attr(feature = "camera", allow(dead_code))]
    #[error("native camera support not built (rebuild with --features camera)")]
    NativeUnavailable,
    #[error(transparent)]
    Metrics(#[from] photobooth::metrics::MetricsError),
}

enum Event {
    Command(String),
    Quit,
}

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("photobooth: {}", e);
        std::process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<FileConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    if let Some(dir) = &args.output_dir {
        config.export.output_dir = dir.clone();
    }
    if let Some(port) = args.metrics_port {
        config.metrics.port = port;
    }
    Ok(config)
}

fn run(args: Args) -> Result<(), CliError> {
    let config = load_config(&args)?;
    info!("Photobooth v{}", photobooth::VERSION);

    match args.backend {
        Backend::Mock => {
            let mut camera = MockCamera::new().with_warmup(args.warmup_frames);
            camera.set_granted(!args.deny);
            event_loop(camera, &config)
        }
        #[cfg(feature = "camera")]
        Backend::Native => event_loop(photobooth::capture::NativeCamera::new(), &config),
        #[cfg(not(feature = "camera"))]
        Backend::Native => Err(CliError::NativeUnavailable),
    }
}

fn event_loop<C: Camera>(camera: C, config: &FileConfig) -> Result<(), CliError> {
    let registry = Arc::new(MetricsRegistry::new()?);
    if config.metrics.port != 0 {
        serve_metrics(config.metrics.port, Arc::clone(&registry));
    }

    let saver = DirectorySaver::new(&config.export.output_dir);
    let mut booth = PhotoBooth::with_config(camera, saver, config);

    let (tx, rx) = mpsc::channel();
    let stdin_tx = tx.clone();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if stdin_tx.send(Event::Command(line)).is_err() {
                return;
            }
        }
        let _ = stdin_tx.send(Event::Quit);
    });
    ctrlc::set_handler(move || {
        let _ = tx.send(Event::Quit);
    })?;

    println!("PHOTOBOOTH");
    println!("Capture your moments");
    print!("{}", booth.view());

    let frame_interval = Duration::from_millis(1000 / u64::from(config.camera.frame_rate.max(1)));
    loop {
        match rx.recv_timeout(frame_interval) {
            Ok(Event::Command(line)) => {
                if !handle_command(&mut booth, &registry, line.trim()) {
                    break;
                }
            }
            Ok(Event::Quit) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }

        if let Err(e) = booth.tick() {
            warn!(error = %e, "Failed to read camera frame");
        }
        registry.update(&MetricsSnapshot::from_booth(&booth));
    }

    let stats = booth.unmount();
    info!(
        captures = stats.captures,
        downloads = stats.downloads,
        "Done"
    );
    Ok(())
}

/// Runs one command. Returns `false` to leave the loop.
fn handle_command<C: Camera>(
    booth: &mut PhotoBooth<C, DirectorySaver>,
    registry: &MetricsRegistry,
    command: &str,
) -> bool {
    match command {
        "" => return true,
        "start" => match booth.start_camera() {
            StartOutcome::Started(id) => info!(stream = %id, "Camera started"),
            StartOutcome::Failed(e) => warn!(error = %e, "Camera start failed"),
            StartOutcome::Ignored => info!("Camera already starting or running"),
        },
        "stop" => {
            booth.stop_camera();
        }
        "capture" => match booth.capture_photo() {
            Ok(true) => {}
            Ok(false) => println!("Not ready yet, try again shortly."),
            Err(e) => error!(error = %e, "Capture failed"),
        },
        "clear" => booth.clear_photo(),
        "download" => match booth.download_photo() {
            Ok(Some(path)) => println!("Saved {}", path.display()),
            Ok(None) => println!("Nothing to download."),
            Err(e) => error!(error = %e, "Download failed"),
        },
        "view" => {}
        "metrics" => match registry.encode() {
            Ok(text) => print!("{}", text),
            Err(e) => error!(error = %e, "Failed to encode metrics"),
        },
        "quit" | "exit" => return false,
        other => {
            println!("Unknown command '{}'. Try start, capture, download, clear, stop, view, metrics, quit.", other);
            return true;
        }
    }
    print!("{}", booth.view());
    true
}

#[cfg(feature = "metrics")]
fn serve_metrics(port: u16, registry: Arc<MetricsRegistry>) {
    use photobooth::metrics::{MetricsServer, MetricsServerConfig};

    let server = MetricsServer::new(MetricsServerConfig::with_port(port), registry);
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = %e, "Failed to start metrics runtime");
                return;
            }
        };
        if let Err(e) = runtime.block_on(server.run()) {
            error!(error = %e, "Metrics server stopped");
        }
    });
}

#[cfg(not(feature = "metrics"))]
fn serve_metrics(port: u16, _registry: Arc<MetricsRegistry>) {
    warn!(port, "Metrics server not built (rebuild with --features metrics)");
}
