//! Text front-end: parses commands, calls the engine, re-reads the board.
//!
//! A `Session` owns one game and the random source used to deal new ones.
//! It never caches anything about the board: after every command the
//! caller renders straight from `Session::game`.

use std::io::{self, BufRead, Write};

use log::{debug, info};
use rand::Rng;
use thiserror::Error;

use crate::deals::format_deck_list;
use crate::display::{render_game, win_message};
use crate::error::EngineError;
use crate::game::{deal_new_game, GameState};
use crate::moves::{can_place_on_tableau, Source};
use crate::tableau::{Pile, NUM_COLS};

pub const HELP: &str = "\
Commands:
  d            draw from stock (recycles the waste when the stock is empty)
  w            waste -> foundation
  t N          column N -> foundation
  wt N         waste -> column N
  tt S D       move the fitting run from column S onto column D
  a            move everything possible to the foundations
  h            list legal moves
  n            new game
  ?            this help
  q            quit
";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("unknown command '{0}' (type ? for help)")]
    UnknownCommand(String),

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a column (expected 1..7)")]
    BadColumn(String),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Draw,
    WasteToFoundation,
    ColumnToFoundation(usize),
    WasteToColumn(usize),
    ColumnToColumn { src: usize, dst: usize },
    AutoFoundation,
    Hint,
    NewGame,
    Help,
    Quit,
}

/// What a command did, for the caller to report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Moved,
    Rejected,
    AutoMoved(usize),
    Hints(Vec<String>),
    NewGame,
    Help,
    Quit,
}

/// Parse a 1-based column argument into a 0-based index.
fn parse_column(arg: Option<&str>) -> Result<usize, SessionError> {
    let arg = arg.ok_or(SessionError::MissingArgument("column"))?;
    match arg.parse::<usize>() {
        Ok(n) if (1..=NUM_COLS).contains(&n) => Ok(n - 1),
        _ => Err(SessionError::BadColumn(arg.to_string())),
    }
}

impl Command {
    pub fn parse(line: &str) -> Result<Command, SessionError> {
        let mut words = line.split_whitespace();
        let Some(head) = words.next() else {
            return Err(SessionError::MissingArgument("command"));
        };
        let cmd = match head.to_ascii_lowercase().as_str() {
            "d" | "draw" => Command::Draw,
            "w" | "waste" => Command::WasteToFoundation,
            "t" => Command::ColumnToFoundation(parse_column(words.next())?),
            "wt" => Command::WasteToColumn(parse_column(words.next())?),
            "tt" => {
                let src = parse_column(words.next())?;
                let dst = parse_column(words.next())?;
                Command::ColumnToColumn { src, dst }
            }
            "a" | "auto" => Command::AutoFoundation,
            "h" | "hint" => Command::Hint,
            "n" | "new" => Command::NewGame,
            "?" | "help" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(SessionError::UnknownCommand(head.to_string())),
        };
        Ok(cmd)
    }
}

pub struct Session<R> {
    game: GameState,
    rng: R,
}

impl<R: Rng> Session<R> {
    /// Deal a first game from `rng`.
    pub fn new(mut rng: R) -> Self {
        let game = deal_new_game(&mut rng);
        info!("deal: {}", format_deck_list(game.initial_deck()));
        Session { game, rng }
    }

    /// Start from an existing game; `rng` deals the following ones.
    pub fn with_game(game: GameState, rng: R) -> Self {
        Session { game, rng }
    }

    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Throw the current game away and deal a fresh one.
    pub fn new_game(&mut self) {
        self.game = deal_new_game(&mut self.rng);
        info!("deal: {}", format_deck_list(self.game.initial_deck()));
    }

    fn column(&self, col: usize) -> Result<&Pile, EngineError> {
        self.game
            .columns()
            .get(col)
            .ok_or(EngineError::ColumnOutOfRange(col))
    }

    pub fn execute(&mut self, cmd: Command) -> Result<Outcome, SessionError> {
        debug!("command {cmd:?}");
        let moved = match cmd {
            Command::Draw => {
                self.game.draw_from_stock();
                true
            }
            Command::WasteToFoundation => match self.game.waste().top() {
                Some(card) => self.game.move_to_foundation(card.id(), Source::Waste)?,
                None => false,
            },
            Command::ColumnToFoundation(col) => match self.column(col)?.top() {
                Some(card) => self.game.move_to_foundation(card.id(), Source::Tableau(col))?,
                None => false,
            },
            Command::WasteToColumn(col) => match self.game.waste().top() {
                Some(card) => self.game.move_to_tableau(card.id(), Source::Waste, col)?,
                None => false,
            },
            Command::ColumnToColumn { src, dst } => {
                if src == dst {
                    return Err(EngineError::SameColumn(src).into());
                }
                // Only one face-up card of a column can fit any given target.
                let target = self.column(dst)?;
                let card = self
                    .column(src)?
                    .iter()
                    .filter(|c| c.face_up)
                    .find(|c| can_place_on_tableau(**c, target))
                    .map(|c| c.id());
                match card {
                    Some(id) => self.game.move_to_tableau(id, Source::Tableau(src), dst)?,
                    None => false,
                }
            }
            Command::AutoFoundation => {
                return Ok(Outcome::AutoMoved(self.game.auto_move_to_foundations()));
            }
            Command::Hint => {
                let tab = self.game.tableau();
                let hints = self
                    .game
                    .legal_moves()
                    .iter()
                    .map(|mv| mv.describe(tab))
                    .collect();
                return Ok(Outcome::Hints(hints));
            }
            Command::NewGame => {
                self.new_game();
                return Ok(Outcome::NewGame);
            }
            Command::Help => return Ok(Outcome::Help),
            Command::Quit => return Ok(Outcome::Quit),
        };
        Ok(if moved { Outcome::Moved } else { Outcome::Rejected })
    }
}

/// Read commands line by line from `input` until `q` or end of input,
/// redrawing the board on `out` after every command.
pub fn run_interactive<R, I, W>(session: &mut Session<R>, input: I, out: &mut W) -> io::Result<()>
where
    R: Rng,
    I: BufRead,
    W: Write,
{
    writeln!(out, "{}", render_game(session.game()))?;
    write!(out, "> ")?;
    out.flush()?;

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            write!(out, "> ")?;
            out.flush()?;
            continue;
        }

        let outcome = Command::parse(&line).and_then(|cmd| session.execute(cmd));
        match outcome {
            Err(e) => writeln!(out, "error: {e}")?,
            Ok(Outcome::Quit) => return Ok(()),
            Ok(Outcome::Help) => write!(out, "{HELP}")?,
            Ok(Outcome::Rejected) => writeln!(out, "That move is not allowed.")?,
            Ok(Outcome::Hints(hints)) if hints.is_empty() => writeln!(out, "No moves left.")?,
            Ok(Outcome::Hints(hints)) => {
                for (i, hint) in hints.iter().enumerate() {
                    writeln!(out, "  {:2}: {hint}", i + 1)?;
                }
            }
            Ok(Outcome::AutoMoved(n)) => writeln!(out, "Moved {n} card(s) to the foundations.")?,
            Ok(Outcome::Moved | Outcome::NewGame) => {}
        }

        writeln!(out, "{}", render_game(session.game()))?;
        if session.game().check_win() {
            writeln!(out, "{}", win_message(session.game()))?;
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}
