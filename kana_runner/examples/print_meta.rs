use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
struct Args {
    path: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let map = kana_runner::load_beatmap_json_from_path(args.path)?;
    println!("id={}", map.meta.id);
    println!("title={}", map.meta.title);
    println!("artist={}", map.meta.artist);
    println!("strictness={}", map.difficulty.strictness);
    println!("notes={}", map.notes.len());
    Ok(())
}
