//! Fixed deals and the bracketed deck-list format.
//!
//! A deal can be written as a bracketed list of 52 card indices in dealing
//! order, e.g. `[51, 32, 3, ...]`, where each index is `CardId::index()`.
//! The binary prints this list for every new game so that a deal can be
//! replayed with `--deck`.

use thiserror::Error;

use crate::card::{standard_deck, Card, CardId, Deck, CARDS_PER_DECK};

/// Local convenience: our deck length as `usize`.
const DECK_LEN: usize = CARDS_PER_DECK as usize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeckParseError {
    #[error("malformed deck list: expected [i, j, ...]")]
    Malformed,

    #[error("could not parse '{0}' as a card index")]
    BadNumber(String),

    #[error("deck list must have 52 numbers, got {0}")]
    WrongLength(usize),

    #[error("card index {0} out of range 0..52")]
    OutOfRange(u8),

    #[error("card index {0} appears more than once")]
    Duplicate(u8),
}

/// Parse a single bracketed integer list (e.g. "[1, 2, 3]") into a deck.
///
/// The list must contain exactly 52 integers, each in 0..=51, with no
/// duplicates. All cards come back face-down.
pub fn parse_bracketed_deck_list(s: &str) -> Result<Deck, DeckParseError> {
    let open = s.find('[').ok_or(DeckParseError::Malformed)?;
    let close = s.rfind(']').ok_or(DeckParseError::Malformed)?;
    if close <= open {
        return Err(DeckParseError::Malformed);
    }

    let mut nums: Vec<u8> = Vec::with_capacity(DECK_LEN);
    for part in s[open + 1..close].split(',') {
        let t = part.trim();
        if t.is_empty() {
            continue;
        }
        let v = t
            .parse::<u8>()
            .map_err(|_| DeckParseError::BadNumber(t.to_string()))?;
        nums.push(v);
    }
    if nums.len() != DECK_LEN {
        return Err(DeckParseError::WrongLength(nums.len()));
    }

    let mut seen = [false; DECK_LEN];
    let mut deck = standard_deck();
    for (slot, &v) in deck.iter_mut().zip(nums.iter()) {
        if v >= CARDS_PER_DECK {
            return Err(DeckParseError::OutOfRange(v));
        }
        if seen[v as usize] {
            return Err(DeckParseError::Duplicate(v));
        }
        seen[v as usize] = true;
        let id = CardId::from_index(v);
        *slot = Card::new(id.suit(), id.rank());
    }
    Ok(deck)
}

/// Format a deck as the bracketed list accepted by
/// `parse_bracketed_deck_list`.
pub fn format_deck_list(deck: &Deck) -> String {
    let nums: Vec<String> = deck.iter().map(|c| c.id().index().to_string()).collect();
    format!("[{}]", nums.join(", "))
}

/// A deal that is won by drawing and moving to the foundations alone.
///
/// It is the standard deck reversed (Spades K..A, Clubs K..A, Diamonds
/// K..A, Hearts K..A). Every column then holds its cards so that, within a
/// suit, the upper card is always the lower rank, and every card one column
/// needs next is either in the stock or on top of another column.
pub fn self_playing_deck() -> Deck {
    let mut deck = standard_deck();
    deck.reverse();
    deck
}
