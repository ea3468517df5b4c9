mod app;
mod config;
mod signal_source;
mod ui;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use eframe::egui;
use mimalloc::MiMalloc;

use app::SpectralViewerApp;
use config::{AppConfig, DftAxisSetting};
use ui::ViewParams;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// DFT panel x axis as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum DftAxisArg {
    /// Coefficient index
    Bins,
    /// Signed frequency in Hz
    Hertz,
}

impl From<DftAxisArg> for DftAxisSetting {
    fn from(arg: DftAxisArg) -> Self {
        match arg {
            DftAxisArg::Bins => DftAxisSetting::Bins,
            DftAxisArg::Hertz => DftAxisSetting::Hertz,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "spectral-viewer")]
#[command(version, about = "DFT, Welch PSD, cross-spectral density and coherence viewer", long_about = None)]
struct Args {
    /// Signal file to open (.csv or .wav). Without it a demo signal is shown.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Sampling rate in Hz (overrides the file's own rate and the saved default)
    #[arg(short = 'r', long)]
    sampling_rate: Option<f64>,

    /// Channel shown in the frequency-domain view
    #[arg(short, long)]
    channel: Option<usize>,

    /// First channel of the spectral pair
    #[arg(short = 'x', long)]
    channel_x: Option<usize>,

    /// Second channel of the spectral pair
    #[arg(short = 'y', long)]
    channel_y: Option<usize>,

    /// Number of segments for the spectral pair view
    #[arg(short, long)]
    segments: Option<usize>,

    /// X axis of the DFT panel
    #[arg(long, value_enum)]
    dft_axis: Option<DftAxisArg>,
}

impl Args {
    /// Apply command-line overrides on top of the saved parameters.
    fn apply(&self, params: &mut ViewParams) {
        if let Some(channel) = self.channel {
            params.frequency_channel = channel;
        }
        if let Some(x) = self.channel_x {
            params.channel_x = x;
        }
        if let Some(y) = self.channel_y {
            params.channel_y = y;
        }
        if let Some(segments) = self.segments {
            params.number_segments = segments;
        }
        if let Some(axis) = self.dft_axis {
            params.dft_axis = axis.into();
        }
    }
}

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config, using defaults: {e}");
        AppConfig::default()
    });
    if let Ok(path) = AppConfig::get_config_path() {
        log::debug!("Config file: {}", path.display());
    }

    let source = match &args.input {
        Some(path) => signal_source::load(path),
        None => signal_source::demo_signal(),
    };
    let source = match source {
        Ok(source) => source,
        Err(e) => {
            log::error!("Failed to load signal: {e}");
            std::process::exit(1);
        }
    };

    let mut params = ViewParams::from_config(&config);
    args.apply(&mut params);
    params.sampling_rate = args
        .sampling_rate
        .or(source.sampling_rate)
        .unwrap_or(config.default_sampling_rate);

    log::info!("Starting Spectral Viewer:");
    log::info!("  Source: {}", source.name);
    log::info!("  Sample rate: {} Hz", params.sampling_rate);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window_width, config.window_height])
            .with_title("Spectral Viewer"),
        ..Default::default()
    };

    eframe::run_native(
        "Spectral Viewer",
        options,
        Box::new(move |_cc| Ok(Box::new(SpectralViewerApp::new(config, source, params)))),
    )
}
