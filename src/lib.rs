pub mod card;
pub mod tableau;
pub mod moves;
pub mod error;
pub mod game;
pub mod deals;
pub mod display;
pub mod view;
pub mod session;
pub mod config;

use std::io;

use anyhow::Context;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Config;
use crate::game::GameState;
use crate::session::{run_interactive, Session};

/// Entry point for the `klondike_web` binary.
///
/// This:
///   - parses the small command-line surface (`--seed`, `--deck`,
///     `--trace`, `--help`),
///   - installs env_logger,
///   - deals a game (from `--deck`, else from the seeded or thread rng),
///   - runs the interactive command loop on stdin/stdout.
///
/// Example:
///   cargo run -- --trace --seed 12345
pub fn run() -> anyhow::Result<()> {
    let config = Config::from_env().context("invalid arguments (try --help)")?;
    if config.help {
        print!("{}", config::HELP);
        return Ok(());
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.default_log_filter()),
    )
    .format_target(false)
    .init();

    match config.seed {
        Some(seed) => {
            info!("dealing from seed {seed}");
            play(&config, StdRng::seed_from_u64(seed))
        }
        None => play(&config, rand::rng()),
    }
}

fn play<R: Rng>(config: &Config, rng: R) -> anyhow::Result<()> {
    let mut session = match config.deck {
        Some(deck) => Session::with_game(GameState::new(deck), rng),
        None => Session::new(rng),
    };

    println!("klondike_web: type ? for help");
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    run_interactive(&mut session, stdin.lock(), &mut stdout).context("terminal i/o failed")?;
    Ok(())
}
