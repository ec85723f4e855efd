mod simulate;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use kana_core::SessionConfig;
use log::info;

#[derive(Debug, Parser)]
#[command(name = "kana")]
#[command(about = "Kana typing judgment CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replay recorded keystrokes against a beatmap and print the final score
    Simulate {
        beatmap: PathBuf,
        replay: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(short, long)]
        strictness: Option<f64>,
        #[arg(long)]
        timeline: bool,
    },
    /// Show the syllables of some text and every way to type them
    Romanize { text: String },
    /// Write a replay that types every note perfectly
    Autoplay {
        beatmap: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            beatmap,
            replay,
            config,
            strictness,
            timeline,
        } => {
            let map = kana_runner::load_beatmap_json_from_path(&beatmap)?;
            let replay = kana_runner::load_replay_json_from_path(&replay)?;
            let mut config = match config {
                Some(path) => kana_runner::load_config_json_from_path(path)?,
                None => SessionConfig::default(),
            };
            if strictness.is_some() {
                config.strictness = strictness;
            }

            let report = kana_runner::run_replay(&map, &replay, &config);
            if timeline {
                simulate::print_timeline(&map, &report);
            }
            let json =
                serde_json::to_string_pretty(&report.score).context("failed to serialize score")?;
            println!("{json}");
        }
        Command::Romanize { text } => simulate::print_syllables(&text),
        Command::Autoplay { beatmap, output } => {
            let map = kana_runner::load_beatmap_json_from_path(&beatmap)?;
            let replay = kana_runner::autoplay(&map);

            let json = serde_json::to_string_pretty(&replay).context("failed to serialize replay")?;
            let out_path = output.unwrap_or_else(|| default_output_path(&beatmap));
            fs::write(&out_path, json)
                .with_context(|| format!("failed to write: {}", out_path.display()))?;
            info!("wrote {} keystrokes to {}", replay.frames.len(), out_path.display());
        }
    }

    Ok(())
}

fn default_output_path(input: &Path) -> PathBuf {
    let mut out = input.to_path_buf();
    out.set_extension("replay.json");
    out
}
