//! Command-line configuration for the `klondike_web` binary.

use pico_args::Arguments;

use crate::card::Deck;
use crate::deals::parse_bracketed_deck_list;

pub const HELP: &str = "\
Play Klondike solitaire (draw one, unlimited recycling) in the terminal

USAGE:
  klondike_web [OPTIONS]

OPTIONS:
  --seed       N           Deal reproducibly from a 64-bit seed
  --deck       [i, ...]    Deal exactly this deck (52 card indices)

FLAGS:
  --trace                  Log every move (default log level: debug)
  -h, --help               Print help information

ENVIRONMENT:
  RUST_LOG                 Log filter, overrides --trace
";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Seed for the deal rng; `None` uses the thread rng.
    pub seed: Option<u64>,
    /// A fixed first deal; later games are shuffled as usual.
    pub deck: Option<Deck>,
    pub trace: bool,
    pub help: bool,
}

impl Config {
    pub fn from_env() -> Result<Config, pico_args::Error> {
        Self::from_args(Arguments::from_env())
    }

    pub fn from_args(mut pargs: Arguments) -> Result<Config, pico_args::Error> {
        let config = Config {
            help: pargs.contains(["-h", "--help"]),
            trace: pargs.contains("--trace"),
            seed: pargs.opt_value_from_str("--seed")?,
            deck: pargs.opt_value_from_fn("--deck", parse_bracketed_deck_list)?,
        };

        let rest = pargs.finish();
        if !rest.is_empty() {
            return Err(pico_args::Error::ArgumentParsingFailed {
                cause: format!("unrecognized arguments: {rest:?}"),
            });
        }
        Ok(config)
    }

    /// Default filter for env_logger when `RUST_LOG` is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.trace { "debug" } else { "warn" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    fn args(list: &[&str]) -> Arguments {
        Arguments::from_vec(list.iter().map(OsString::from).collect())
    }

    #[test]
    fn defaults_without_arguments() {
        let config = Config::from_args(args(&[])).expect("no arguments is fine");
        assert_eq!(config, Config::default());
        assert_eq!(config.default_log_filter(), "warn");
    }

    #[test]
    fn seed_and_trace() {
        let config = Config::from_args(args(&["--trace", "--seed", "12345"])).expect("valid");
        assert_eq!(config.seed, Some(12345));
        assert!(config.trace);
        assert_eq!(config.default_log_filter(), "debug");

        let config = Config::from_args(args(&["--seed=9"])).expect("valid");
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn deck_is_parsed_and_validated() {
        let list = format!("{:?}", (0..52u8).rev().collect::<Vec<_>>());
        let config = Config::from_args(args(&["--deck", list.as_str()])).expect("valid deck");
        assert_eq!(config.deck, Some(crate::deals::self_playing_deck()));

        assert!(Config::from_args(args(&["--deck", "[1, 2]"])).is_err());
    }

    #[test]
    fn unknown_arguments_are_rejected() {
        assert!(Config::from_args(args(&["--speed", "3"])).is_err());
        assert!(Config::from_args(args(&["--seed", "abc"])).is_err());
    }
}
