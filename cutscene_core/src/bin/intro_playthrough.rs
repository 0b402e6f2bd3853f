use std::{fs, fs::File, path::PathBuf, sync::Arc};

use anyhow::{ensure, Context, Result};
use clap::Parser;
use cutscene_core::{HeadlessScene, IntroSequencer, Script, SequencerConfig, StageCall};
use glam::Vec3;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Play the introduction cutscene against a headless scene",
    long_about = None
)]
struct Args {
    /// TOML file overriding the sequencer tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML dialogue script to play instead of the built-in introduction
    #[arg(long)]
    script: Option<PathBuf>,

    /// Simulated ticks per second
    #[arg(long, default_value_t = 60.0)]
    tick_rate: f32,

    /// Seconds between advance presses once the conversation is running
    #[arg(long, default_value_t = 0.5)]
    press_every: f32,

    /// Seconds to keep ticking after the last line before giving up on the routines
    #[arg(long, default_value_t = 10.0)]
    settle: f32,

    /// Optional path to write the full call transcript as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

impl Args {
    /// Reject timings that would keep the playthrough from ever ending.
    fn validate(&self) -> Result<()> {
        ensure!(
            self.tick_rate.is_finite() && self.tick_rate > 0.0,
            "--tick-rate must be a finite, positive number"
        );
        ensure!(
            self.press_every.is_finite() && self.press_every >= 0.0,
            "--press-every must be a finite, non-negative number of seconds"
        );
        ensure!(self.settle.is_finite(), "--settle must be finite");
        Ok(())
    }
}

const ANCHOR: Vec3 = Vec3::new(6.0, 0.0, 0.0);
const WALK_SPEED: f32 = 3.0;
const WALK_LIMIT_SECONDS: f32 = 30.0;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    args.validate()?;

    let config = match args.config.as_deref() {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SequencerConfig::from_toml_str(&source)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SequencerConfig::default(),
    };
    let script = match args.script.as_deref() {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("reading script {}", path.display()))?;
            Script::from_toml_str(&source)
                .with_context(|| format!("parsing script {}", path.display()))?
        }
        None => Script::introduction(),
    };

    let prompt = config.prompt_label();
    let hint = config.continue_hint();
    let mut sequencer = IntroSequencer::new(Arc::new(script), config, ANCHOR);
    let delta = 1.0 / args.tick_rate;
    let mut scene = HeadlessScene::new(delta);

    // Walk the player from the origin towards the anchor until the prompt shows.
    let mut position = Vec3::ZERO;
    while !scene.prompt_visible() {
        ensure!(
            scene.elapsed() < WALK_LIMIT_SECONDS,
            "player never reached the interaction radius"
        );
        position += (ANCHOR - position).clamp_length_max(WALK_SPEED * delta);
        scene.place_player(position);
        scene.tick(&mut sequencer);
    }
    println!("[{:>6.2}s] {prompt}", scene.elapsed());

    let mut since_press = f32::INFINITY;
    while !sequencer.conversation().is_finished() {
        if since_press >= args.press_every {
            scene.press_advance();
            since_press = 0.0;
        }
        scene.tick(&mut sequencer);
        since_press += delta;
    }

    let settle_until = scene.elapsed() + args.settle;
    while !sequencer.is_complete() && scene.elapsed() < settle_until {
        scene.tick(&mut sequencer);
    }

    for call in scene.calls() {
        if let StageCall::ShowLine { speaker, text, is_last_line } = call {
            match speaker {
                Some(speaker) => println!("{speaker}: {text}"),
                None => println!("{text}"),
            }
            if !is_last_line {
                println!("    {hint}");
            }
        }
    }

    info!(
        elapsed = scene.elapsed(),
        complete = sequencer.is_complete(),
        movement_enabled = scene.movement_enabled(),
        "playthrough finished"
    );

    if let Some(path) = args.json.as_deref() {
        let file = File::create(path)
            .with_context(|| format!("creating transcript {}", path.display()))?;
        serde_json::to_writer_pretty(file, scene.calls())?;
        println!("[intro_playthrough] wrote transcript to {}", path.display());
    }

    sequencer.teardown(&mut scene);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("intro_playthrough").chain(extra.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let args = parse(&[]);
        assert_eq!(args.tick_rate, 60.0);
        assert_eq!(args.press_every, 0.5);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_unbounded_timings_rejected() {
        assert!(parse(&["--press-every", "inf"]).validate().is_err());
        assert!(parse(&["--press-every=-1"]).validate().is_err());
        assert!(parse(&["--tick-rate", "0"]).validate().is_err());
        assert!(parse(&["--tick-rate", "inf"]).validate().is_err());
        assert!(parse(&["--settle", "inf"]).validate().is_err());
    }
}
