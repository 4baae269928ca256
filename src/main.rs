//! Finger calculator: count fingers on a webcam and add or subtract them.

use anyhow::Result;
use clap::Parser;
use finger_calc::{
    app::{AppConfig, FingerCalcApp, GuiMode, VideoSource},
    config::Config,
    session::Command,
};
use log::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Camera index to use
    #[arg(long)]
    cam: Option<i32>,

    /// Video file to process
    #[arg(short, long)]
    video: Option<String>,

    /// GUI display mode (window, none)
    #[arg(short, long, default_value = "window")]
    gui: String,

    /// Command applied on the first frame (show, add, sub), for headless runs
    #[arg(long)]
    start_mode: Option<String>,

    /// Do not mirror the camera image
    #[arg(long)]
    no_mirror: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Finger Calculator");

    let config_file = if let Some(config_path) = &args.config {
        info!("Loading configuration from: {}", config_path);
        match Config::from_file(config_path).and_then(|cfg| cfg.validate().map(|()| cfg)) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {}. Using defaults.", e);
                Config::default()
            }
        }
    } else {
        Config::default()
    };

    let mut config = AppConfig::from_config(&config_file);
    if let Some(video_path) = args.video {
        config.video_source = VideoSource::File(video_path);
    } else if let Some(cam) = args.cam {
        config.video_source = VideoSource::Camera(cam);
    }
    config.gui_mode = match args.gui.as_str() {
        "none" => GuiMode::None,
        _ => GuiMode::Window,
    };
    if let Some(name) = &args.start_mode {
        config.start_command = Command::from_name(name);
        if config.start_command.is_none() {
            warn!("Unknown start mode '{}', ignoring", name);
        }
    }
    if args.no_mirror {
        config.mirror = false;
    }

    let mut app = FingerCalcApp::new(config)?;
    app.run()?;

    Ok(())
}
