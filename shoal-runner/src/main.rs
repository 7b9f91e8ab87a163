use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rand::SeedableRng;
use shoal_core::FishRng;
use shoal_runner::{simulate, AutoAngler, Session};
use shoal_shared::{script_from_json, SessionSettings};

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless fishing flock simulation", long_about = None)]
struct Args {
    /// Session settings file (JSON); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Scripted input events (JSON list of { at, event })
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Random seed; overrides the seed in the settings file
    #[arg(long)]
    seed: Option<u32>,

    /// Seconds of simulated time to run
    #[arg(short = 't', long, default_value_t = 30.0)]
    duration: f32,

    /// Frames per second fed to the simulation
    #[arg(short = 'r', long, default_value_t = 60)]
    frame_rate: u32,

    /// Let the computer fish
    #[arg(short, long)]
    autoplay: bool,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn load_settings(path: Option<&PathBuf>) -> Result<SessionSettings> {
    let Some(path) = path else {
        return Ok(SessionSettings::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings from {}", path.display()))?;
    SessionSettings::from_json(&json)
        .with_context(|| format!("Invalid settings in {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    anyhow::ensure!(args.frame_rate > 0, "frame rate must be positive");

    let settings = load_settings(args.config.as_ref())?;
    let seed = args
        .seed
        .or(settings.seed)
        .unwrap_or_else(|| FishRng::from_entropy().next_u32());

    log::info!("Shoal runner starting...");
    log::info!("Duration: {}s at {} fps", args.duration, args.frame_rate);

    let mut session = Session::new(&settings, seed).context("Failed to start session")?;

    if let Some(path) = &args.script {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script from {}", path.display()))?;
        let script = script_from_json(&json)
            .with_context(|| format!("Invalid script in {}", path.display()))?;
        log::info!("Loaded {} scripted events", script.len());
        session = session.with_script(script);
    }

    let mut angler = args.autoplay.then(|| AutoAngler::new(seed.wrapping_add(1)));
    let report = simulate(&mut session, angler.as_mut(), args.duration, args.frame_rate);

    log::info!(
        "Finished: {} coins, {} fish left",
        report.coins,
        report.fish_remaining
    );

    let json = serde_json::to_string_pretty(&report)?;
    match &args.output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => println!("{}", json),
    }

    Ok(())
}
