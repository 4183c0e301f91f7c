//! Engine error types.
//!
//! These signal caller mistakes (stale or out-of-range references). A move
//! that is simply against the rules is not an error: the engine reports it
//! as `Ok(false)` and leaves the game untouched.

use thiserror::Error;

use crate::card::CardId;
use crate::moves::Source;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EngineError {
    /// Tableau column index outside `0..7`.
    #[error("tableau column {0} out of range (expected 0..7)")]
    ColumnOutOfRange(usize),

    /// The card is not in the pile it was said to come from.
    #[error("card {card} is not in {pile}")]
    CardNotInSource { card: CardId, pile: Source },

    /// A column-to-column move naming the same column twice.
    #[error("cannot move cards from column {0} onto itself")]
    SameColumn(usize),
}
