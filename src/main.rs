use std::path::PathBuf;

use anyhow::{Context, Result};
use blotter::{BoardConfig, Game, Leaderboard, Pipeline, RecordStore, store::DEFAULT_GAME_PICKS};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Rank the most-arrested names on a police blotter blog
#[derive(Debug, Parser)]
#[command(name = "blotter", version, about)]
struct Cli {
    #[command(flatten)]
    config: BoardConfig,

    /// JSON file holding every record parsed so far
    #[arg(long, env = "BLOTTER_STORE", global = true)]
    store: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Walk the blog and print the leaderboard (default)
    Leaderboard,
    /// Walk the blog, then deal a match-the-charges game
    Game {
        /// Number of suspects to deal
        #[arg(long, default_value_t = DEFAULT_GAME_PICKS)]
        picks: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("blotter=info".parse()?))
        .init();

    let cli = Cli::parse();
    let fetcher = cli.config.http_fetcher()?;
    let pipeline = Pipeline::from_config(&cli.config, fetcher)?;

    let mut store = match &cli.store {
        Some(path) => RecordStore::load(path)
            .with_context(|| format!("loading record store {}", path.display()))?,
        None => RecordStore::new(),
    };

    let outcome = pipeline.run(&mut store).await;

    if let Some(path) = &cli.store {
        store
            .save(path)
            .with_context(|| format!("saving record store {}", path.display()))?;
        info!(path = %path.display(), records = store.len(), "record store saved");
    }

    let board = outcome.with_context(|| format!("walking {}", pipeline.start_url()))?;

    match cli.command.unwrap_or(Command::Leaderboard) {
        Command::Leaderboard => print_leaderboard(&board, cli.json)?,
        Command::Game { picks } => {
            let game = store.sample_game(&mut rand::rng(), picks);
            print_game(&game, cli.json)?;
        }
    }

    Ok(())
}

fn print_leaderboard(board: &Leaderboard, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(board)?);
        return Ok(());
    }

    let date = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
    println!(
        "Most arrested, {} to {} ({} pages, {} posts)",
        date(board.window.earliest),
        date(board.window.latest),
        board.pages_walked,
        board.records_seen,
    );
    println!("{:>4}  {:<32} {:>7} {:>7}  Mugshot", "Rank", "Name", "Arrests", "Charges");
    for entry in &board.entries {
        let rank = entry.rank.map_or_else(|| "-".to_string(), |r| r.to_string());
        println!(
            "{:>4}  {:<32} {:>7} {:>7}  {}",
            rank, entry.name, entry.occurrence_count, entry.total_charge_count, entry.image_url
        );
    }
    Ok(())
}

fn print_game(game: &Game, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(game)?);
        return Ok(());
    }

    println!("Suspects:");
    for (i, suspect) in game.suspects.iter().enumerate() {
        println!("  [{}] {}", i + 1, suspect.image_url);
    }
    println!("Charges:");
    for charge in &game.charges {
        println!("  - {}", charge.text);
    }
    Ok(())
}
