use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use sapper_core::StatsLog;

mod game;
mod view;

/// Single-player Minesweeper for the terminal.
#[derive(Parser, Debug)]
#[command(name = "sapper", version, about)]
struct Cli {
    /// File the per-game statistics are appended to.
    #[arg(long, default_value = "stats.txt")]
    stats_file: PathBuf,

    #[command(flatten)]
    verbosity: Verbosity<WarnLevel>,
}

const MENU_PROMPT: &str = "Pick one of: (P)lay, (S)tatistics, (E)xit";

fn main() -> Result<()> {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.verbosity.log_level_filter())
        .init();

    let stats = StatsLog::new(cli.stats_file);
    log::info!("statistics file: {}", stats.path().display());

    println!("Welcome to sapper, a terminal Minesweeper.");
    println!("{MENU_PROMPT}");

    loop {
        let Some(choice) = game::read_line("> ")? else {
            // stdin closed, same as exit
            return Ok(());
        };

        match choice.trim().to_lowercase().as_str() {
            "play" | "p" => game::play(&stats)?,
            "statistics" | "s" => view::show_statistics(&stats),
            "exit" | "e" => return Ok(()),
            _ => println!("{MENU_PROMPT}"),
        }
    }
}
