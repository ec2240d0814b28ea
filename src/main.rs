use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use bingo_hall::config::{self, CONFIG_ENV};
use bingo_hall::shell::Shell;

#[derive(Parser)]
#[command(name = "bingo-hall")]
#[command(about = "Draw bingo numbers and play a card in the terminal")]
#[command(version)]
struct Cli {
    #[arg(short, long, env = CONFIG_ENV)]
    #[arg(help = "JSON config file (default: <config dir>/bingo-hall/bingo.json)")]
    config: Option<PathBuf>,

    #[arg(long)]
    #[arg(help = "RNG seed for reproducible draws and cards")]
    seed: Option<u64>,

    #[arg(long)]
    #[arg(help = "Cosmetic draw delay in milliseconds")]
    delay_ms: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = config::load_config(cli.config.as_deref()).context("loading configuration")?;
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(delay_ms) = cli.delay_ms {
        config.draw_delay_ms = delay_ms;
    }

    // the lottery and the card never share a generator
    let (lottery_rng, card_rng) = match config.seed {
        Some(seed) => (StdRng::seed_from_u64(seed), StdRng::seed_from_u64(seed.wrapping_add(1))),
        None => (StdRng::from_os_rng(), StdRng::from_os_rng()),
    };
    info!(seed = ?config.seed, delay_ms = config.draw_delay_ms, "starting session");

    let stdin = io::stdin();
    let mut shell = Shell::new(stdin.lock(), io::stdout(), config, lottery_rng, card_rng);
    shell.run().context("terminal session failed")?;
    Ok(())
}
