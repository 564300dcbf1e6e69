//! Reelcut - headless editing engine front end
//!
//! Usage:
//!   reelcut preview [--position US] [--output FILE]   Render one frame to a PPM image
//!   reelcut export --output FILE                      Encode the timeline through ffmpeg
//!   reelcut audio [--position US] [--duration US]     Mix a window and print levels
//!   reelcut init-config --output FILE                 Write the default configuration

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use reelcut_core::{Frame, Micros};
use reelcut_engine::{init_logging, EngineConfig, ExportEvent};
use reelcut_media::{ExportSettings, FfmpegEncoder};
use tracing::{info, warn};

mod demo;

#[derive(Parser)]
#[command(name = "reelcut", about = "Deterministic timeline rendering and mixing", version)]
struct Cli {
    /// Engine configuration file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the demo timeline at one position
    Preview {
        /// Timeline position in microseconds
        #[arg(long, default_value = "0")]
        position: Micros,

        /// Output image (binary PPM)
        #[arg(short, long, default_value = "preview.ppm")]
        output: PathBuf,
    },

    /// Export the demo timeline to a video file
    Export {
        /// Output video path
        #[arg(short, long)]
        output: PathBuf,

        /// Video bitrate in kbps
        #[arg(long, default_value = "8000")]
        bitrate: u32,

        /// ffmpeg executable to spawn
        #[arg(long, default_value = "ffmpeg")]
        ffmpeg: String,
    },

    /// Mix a window of the demo audio and report its peak
    Audio {
        #[arg(long, default_value = "0")]
        position: Micros,

        #[arg(long, default_value = "100000")]
        duration: Micros,
    },

    /// Write the default configuration
    InitConfig {
        #[arg(short, long)]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    if cli.verbose {
        config.logging.level = "debug".into();
    }
    init_logging(&config.logging);

    match cli.command {
        Commands::Preview { position, output } => preview(config, position, &output),
        Commands::Export {
            output,
            bitrate,
            ffmpeg,
        } => export(config, output, bitrate, ffmpeg),
        Commands::Audio { position, duration } => audio(config, position, duration),
        Commands::InitConfig { output } => {
            EngineConfig::default().save(&output)?;
            info!(path = %output.display(), "Wrote default configuration");
            Ok(())
        }
    }
}

fn preview(config: EngineConfig, position: Micros, output: &Path) -> Result<()> {
    let engine = demo::build(config)?;
    let frame = engine.preview_frame(position);
    write_ppm(&frame, output)?;
    info!(
        position,
        layers = engine.clips_at_position(position).len(),
        path = %output.display(),
        "Wrote preview frame"
    );
    Ok(())
}

fn export(config: EngineConfig, output: PathBuf, bitrate: u32, ffmpeg: String) -> Result<()> {
    let project = config.project;
    let engine = demo::build(config)?;
    let settings =
        ExportSettings::new(output, project.width, project.height, project.fps).with_bitrate(bitrate);
    let handle = engine.export(settings, Box::new(FfmpegEncoder::with_program(ffmpeg)))?;

    let mut last_reported = -1i32;
    for event in handle.events().iter() {
        match event {
            ExportEvent::Progress { fraction, status } => {
                let percent = (fraction * 100.0) as i32;
                if percent / 10 != last_reported / 10 {
                    info!(percent, %status, "Export progress");
                    last_reported = percent;
                }
            }
            ExportEvent::Completed { frames } => {
                info!(frames, "Export finished");
                break;
            }
            ExportEvent::Cancelled { frames } => {
                warn!(frames, "Export cancelled");
                break;
            }
            ExportEvent::Failed { message } => bail!("export failed: {message}"),
        }
    }
    handle.wait();
    Ok(())
}

fn audio(config: EngineConfig, position: Micros, duration: Micros) -> Result<()> {
    let engine = demo::build(config)?;
    let mixed = engine.mixed_audio(position, duration);
    let peak = mixed
        .samples
        .iter()
        .map(|s| s.unsigned_abs())
        .max()
        .unwrap_or(0);
    info!(
        samples = mixed.samples.len(),
        sample_rate = mixed.sample_rate,
        channels = mixed.channels,
        peak,
        "Mixed audio window"
    );
    Ok(())
}

/// Binary PPM, alpha dropped.
fn write_ppm(frame: &Frame, path: &Path) -> Result<()> {
    let mut file = std::io::BufWriter::new(
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?,
    );
    write!(file, "P6\n{} {}\n255\n", frame.width, frame.height)?;
    for px in frame.data.chunks_exact(4) {
        file.write_all(&px[..3])?;
    }
    file.flush()?;
    Ok(())
}
