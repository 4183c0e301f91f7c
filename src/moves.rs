//! Move representation, placement rules and move generation for Klondike
//! (draw one, unlimited recycling).
//
//! This module defines the two placement predicates, a compact `Move`
//! type, a generator listing every legal move from a `Tableau`, and an
//! `apply` method that mutates a tableau in place. `GameState` combines
//! these into checked actions.

use core::fmt;

use serde::Serialize;

use crate::card::{is_one_lower_opposite_color, Card, Rank};
use crate::tableau::{Pile, Tableau, NUM_COLS};

/// Where a card is taken from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Waste,
    /// 0-based tableau column.
    Tableau(usize),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Waste => f.write_str("waste"),
            Source::Tableau(col) => write!(f, "column {}", col + 1),
        }
    }
}

/// The different move types.
///
/// Column indices are 0-based internally but printed 1-based when shown
/// to a human. Foundation indices are recorded so that a move history can
/// be replayed without re-deriving the destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MoveKind {
    /// Turn the top stock card face-up onto the waste.
    DrawFromStock,

    /// Stock is empty: the waste, reversed and face-down, becomes the stock.
    RecycleWaste,

    /// Move the top waste card to a foundation.
    WasteToFoundation { foundation: u8 },

    /// Move the top face-up card of a column to a foundation.
    ColumnToFoundation { src_col: u8, foundation: u8 },

    /// Move the top waste card onto a column.
    WasteToColumn { dst_col: u8 },

    /// Move a run of face-up cards from one column to another.
    ///
    /// `src_index` is the position of the run's first card within the
    /// source column, counted from the bottom (0 = first card dealt).
    ColumnToColumn {
        src_col: u8,
        src_index: u8,
        dst_col: u8,
    },
}

/// A single move, wrapping a `MoveKind` for future extensibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Move {
    pub kind: MoveKind,
}

impl From<MoveKind> for Move {
    fn from(kind: MoveKind) -> Self {
        Move { kind }
    }
}

// ----- Placement rules -----

/// True if `card` may be placed on `pile` as a foundation.
///
/// An empty foundation takes only an Ace; otherwise the card must match
/// the top card's suit and be exactly one rank higher.
pub fn can_place_on_foundation(card: Card, pile: &Pile) -> bool {
    match pile.top() {
        None => card.rank() == Rank::Ace,
        Some(top) => card.suit() == top.suit() && card.rank_index() == top.rank_index() + 1,
    }
}

/// True if `card` may be placed on `pile` as a tableau column.
///
/// An empty column takes only a King; otherwise the top card must be
/// face-up, of the opposite color and exactly one rank higher.
pub fn can_place_on_tableau(card: Card, pile: &Pile) -> bool {
    match pile.top() {
        None => card.rank() == Rank::King,
        Some(top) => top.face_up && is_one_lower_opposite_color(card, top),
    }
}

/// The foundation a card would go to: the first pile that is empty or
/// already holds cards of the card's suit.
///
/// This only picks the destination; whether the card is accepted there is
/// `can_place_on_foundation`'s call.
pub fn foundation_for(tab: &Tableau, card: Card) -> Option<usize> {
    tab.foundations
        .iter()
        .position(|pile| pile.bottom().is_none_or(|c| c.suit() == card.suit()))
}

/// The foundation the card can go to right now, if any.
fn can_move_to_foundation(tab: &Tableau, card: Card) -> Option<usize> {
    foundation_for(tab, card).filter(|&f| can_place_on_foundation(card, &tab.foundations[f]))
}

/// True if the slice (bottom -> top) is a movable run: every card face-up,
/// each one rank lower than, and of opposite color to, the card beneath.
pub fn is_valid_run(cards: &[Card]) -> bool {
    if cards.is_empty() || !cards.iter().all(|c| c.face_up) {
        return false;
    }
    cards
        .windows(2)
        .all(|pair| is_one_lower_opposite_color(pair[1], pair[0]))
}

// ----- Public move generation -----

/// Generate all legal moves from the given tableau.
///
/// This does **not** apply or prioritize moves; it lists everything that
/// is legal in the current state, foundation moves first.
///
/// The rule set implemented here:
///   - Column -> Foundation (top face-up card only)
///   - Waste  -> Foundation (top card only)
///   - Column -> Column (any valid run)
///   - Waste  -> Column (top card only)
///   - DrawFromStock when stock is non-empty
///   - RecycleWaste when stock is empty and waste is non-empty
pub fn generate_legal_moves(tab: &Tableau) -> Vec<Move> {
    let mut moves = Vec::new();

    // Column -> Foundation
    for (col_idx, col) in tab.columns.iter().enumerate() {
        let Some(card) = col.top().filter(|c| c.face_up) else {
            continue;
        };
        if let Some(f) = can_move_to_foundation(tab, card) {
            moves.push(Move::from(MoveKind::ColumnToFoundation {
                src_col: col_idx as u8,
                foundation: f as u8,
            }));
        }
    }

    // Waste -> Foundation
    if let Some(card) = tab.waste.top() {
        if let Some(f) = can_move_to_foundation(tab, card) {
            moves.push(Move::from(MoveKind::WasteToFoundation {
                foundation: f as u8,
            }));
        }
    }

    // Column -> Column (runs)
    for (src_col_idx, col) in tab.columns.iter().enumerate() {
        let first_face_up = col.num_face_down();
        for start in first_face_up..col.len() {
            let run = &col.cards()[start..];
            if !is_valid_run(run) {
                continue;
            }
            for (dst_col_idx, dst) in tab.columns.iter().enumerate() {
                if dst_col_idx == src_col_idx {
                    continue;
                }
                // Shifting a whole column onto an empty one changes nothing.
                if start == 0 && dst.is_empty() {
                    continue;
                }
                if can_place_on_tableau(run[0], dst) {
                    moves.push(Move::from(MoveKind::ColumnToColumn {
                        src_col: src_col_idx as u8,
                        src_index: start as u8,
                        dst_col: dst_col_idx as u8,
                    }));
                }
            }
        }
    }

    // Waste -> Column
    if let Some(card) = tab.waste.top() {
        for (dst_col_idx, dst) in tab.columns.iter().enumerate() {
            if can_place_on_tableau(card, dst) {
                moves.push(Move::from(MoveKind::WasteToColumn {
                    dst_col: dst_col_idx as u8,
                }));
            }
        }
    }

    // Stock moves
    if !tab.stock.is_empty() {
        moves.push(Move::from(MoveKind::DrawFromStock));
    } else if !tab.waste.is_empty() {
        moves.push(Move::from(MoveKind::RecycleWaste));
    }

    moves
}

// ----- Mutating application of a move -----

impl Move {
    /// Apply this move to the given tableau, mutating it in place.
    ///
    /// This assumes the move is legal in the given state and does not
    /// re-check the placement rules; `GameState` validates before calling.
    pub fn apply(&self, tab: &mut Tableau) {
        match self.kind {
            MoveKind::DrawFromStock => {
                if let Some(mut card) = tab.stock.pop() {
                    card.face_up = true;
                    tab.waste.push(card);
                }
            }

            MoveKind::RecycleWaste => {
                let mut cards = tab.waste.take_all();
                cards.reverse();
                for card in cards.iter_mut() {
                    card.face_up = false;
                }
                tab.stock = Pile::from_cards(cards);
            }

            MoveKind::WasteToFoundation { foundation } => {
                if let Some(card) = tab.waste.pop() {
                    tab.foundations[foundation as usize].push(card);
                }
            }

            MoveKind::ColumnToFoundation {
                src_col,
                foundation,
            } => {
                let col = &mut tab.columns[src_col as usize];
                if let Some(card) = col.pop() {
                    col.flip_top_face_up();
                    tab.foundations[foundation as usize].push(card);
                }
            }

            MoveKind::WasteToColumn { dst_col } => {
                if let Some(card) = tab.waste.pop() {
                    tab.columns[dst_col as usize].push(card);
                }
            }

            MoveKind::ColumnToColumn {
                src_col,
                src_index,
                dst_col,
            } => {
                let (s, d) = (src_col as usize, dst_col as usize);
                if s == d || s >= NUM_COLS || d >= NUM_COLS {
                    return;
                }
                let src = &mut tab.columns[s];
                if src_index as usize >= src.len() {
                    return;
                }
                let run = src.split_off(src_index as usize);
                src.flip_top_face_up();
                tab.columns[d].extend(run);
            }
        }
    }

    /// Render a move as a human-readable string, using the tableau *before*
    /// the move is applied to name the cards involved.
    pub fn describe(&self, tab: &Tableau) -> String {
        let waste_top = || {
            tab.waste
                .top()
                .map_or_else(|| "(empty)".to_string(), Card::short_str)
        };

        match self.kind {
            MoveKind::DrawFromStock => "Draw from stock".to_string(),

            MoveKind::RecycleWaste => "Recycle waste into stock".to_string(),

            MoveKind::WasteToFoundation { foundation } => {
                format!("Waste: {} -> Foundation {}", waste_top(), foundation + 1)
            }

            MoveKind::ColumnToFoundation {
                src_col,
                foundation,
            } => {
                let top = tab.columns[src_col as usize]
                    .top()
                    .map_or_else(|| "(empty)".to_string(), Card::short_str);
                format!(
                    "Column {}: {} -> Foundation {}",
                    src_col + 1,
                    top,
                    foundation + 1
                )
            }

            MoveKind::WasteToColumn { dst_col } => {
                format!("Waste: {} -> Column {}", waste_top(), dst_col + 1)
            }

            MoveKind::ColumnToColumn {
                src_col,
                src_index,
                dst_col,
            } => {
                let run = &tab.columns[src_col as usize].cards()[src_index as usize..];
                let (Some(first), Some(last)) = (run.first(), run.last()) else {
                    return format!("Column {} (empty) -> Column {}", src_col + 1, dst_col + 1);
                };
                if run.len() == 1 {
                    format!("Column {}: {} -> Column {}", src_col + 1, first, dst_col + 1)
                } else {
                    format!(
                        "Column {}: {}..{} -> Column {}",
                        src_col + 1,
                        first,
                        last,
                        dst_col + 1
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Rank::*;
    use crate::card::Suit::*;

    fn pile(cards: &[Card]) -> Pile {
        Pile::from_cards(cards.to_vec())
    }

    #[test]
    fn foundation_accepts_ace_on_empty_and_next_rank_of_suit() {
        let empty = Pile::new();
        let ace_hearts = Card::new(Hearts, Ace).up();
        assert!(can_place_on_foundation(ace_hearts, &empty));

        let hearts = pile(&[ace_hearts]);
        assert!(can_place_on_foundation(Card::new(Hearts, Two), &hearts));
        assert!(!can_place_on_foundation(Card::new(Spades, Two), &hearts));
        assert!(!can_place_on_foundation(Card::new(Hearts, Three), &hearts));
        assert!(!can_place_on_foundation(Card::new(Spades, King), &empty));
    }

    #[test]
    fn tableau_accepts_king_on_empty_and_descending_opposite_color() {
        let empty = Pile::new();
        assert!(can_place_on_tableau(Card::new(Spades, King), &empty));
        assert!(!can_place_on_tableau(Card::new(Spades, Queen), &empty));

        let king_spades = pile(&[Card::new(Spades, King).up()]);
        assert!(can_place_on_tableau(Card::new(Hearts, Queen), &king_spades));
        assert!(!can_place_on_tableau(Card::new(Clubs, Queen), &king_spades));

        let queen_hearts = pile(&[Card::new(Hearts, Queen).up()]);
        assert!(!can_place_on_tableau(Card::new(Diamonds, Jack), &queen_hearts));
        assert!(can_place_on_tableau(Card::new(Clubs, Jack), &queen_hearts));
    }

    #[test]
    fn tableau_rejects_anything_on_a_face_down_top() {
        let hidden_king = pile(&[Card::new(Spades, King)]);
        assert!(!can_place_on_tableau(Card::new(Hearts, Queen), &hidden_king));
    }

    #[test]
    fn foundation_for_picks_first_empty_or_matching_suit() {
        let mut tab = Tableau::new_empty();
        tab.foundations[0] = pile(&[Card::new(Clubs, Ace).up()]);

        assert_eq!(foundation_for(&tab, Card::new(Clubs, Two)), Some(0));
        assert_eq!(foundation_for(&tab, Card::new(Hearts, Ace)), Some(1));

        for (i, suit) in [Clubs, Hearts, Spades, Diamonds].into_iter().enumerate() {
            tab.foundations[i] = pile(&[Card::new(suit, Ace).up()]);
        }
        assert_eq!(foundation_for(&tab, Card::new(Diamonds, Two)), Some(3));
    }

    #[test]
    fn valid_and_invalid_runs() {
        // Bottom -> top: 8S, 7H, 6C is a run; adding 5C breaks the colors.
        let cards = [
            Card::new(Spades, Eight).up(),
            Card::new(Hearts, Seven).up(),
            Card::new(Clubs, Six).up(),
            Card::new(Clubs, Five).up(),
        ];
        assert!(is_valid_run(&cards[0..3]));
        assert!(!is_valid_run(&cards[0..4]));
        assert!(!is_valid_run(&[]));
        assert!(!is_valid_run(&[Card::new(Spades, Eight)]));
    }

    #[test]
    fn moving_last_face_up_card_flips_hidden_card() {
        let mut tab = Tableau::new_empty();
        tab.columns[0] = pile(&[
            Card::new(Hearts, Ace),
            Card::new(Clubs, Two),
            Card::new(Spades, Three),
            Card::new(Diamonds, King).up(),
        ]);

        let mv = Move::from(MoveKind::ColumnToColumn {
            src_col: 0,
            src_index: 3,
            dst_col: 1,
        });
        mv.apply(&mut tab);

        let col0 = &tab.columns[0];
        assert_eq!(col0.len(), 3, "one card removed from column 0");
        assert_eq!(col0.num_face_down(), 2);
        assert!(col0.top().is_some_and(|c| c.face_up));
        assert_eq!(tab.columns[1].len(), 1);
    }

    #[test]
    fn recycle_reverses_and_turns_waste_face_down() {
        let mut tab = Tableau::new_empty();
        let a = Card::new(Hearts, Two).up();
        let b = Card::new(Clubs, Nine).up();
        let c = Card::new(Spades, Queen).up();
        tab.waste = pile(&[a, b, c]);

        Move::from(MoveKind::RecycleWaste).apply(&mut tab);

        assert!(tab.waste.is_empty());
        let ids: Vec<_> = tab.stock.iter().map(|c| c.id()).collect();
        assert_eq!(ids, vec![c.id(), b.id(), a.id()]);
        assert!(tab.stock.iter().all(|c| !c.face_up));
    }

    #[test]
    fn legal_moves_on_fresh_deal_always_include_a_draw() {
        let tab = Tableau::deal_from_shuffled(crate::card::shuffled_deck_from_seed(42));
        let moves = generate_legal_moves(&tab);
        assert!(moves.contains(&Move::from(MoveKind::DrawFromStock)));
        assert!(!moves.contains(&Move::from(MoveKind::RecycleWaste)));
        for mv in &moves {
            assert!(!mv.describe(&tab).is_empty());
        }
    }

    #[test]
    fn legal_moves_find_waste_and_column_targets() {
        let mut tab = Tableau::new_empty();
        tab.columns[0] = pile(&[Card::new(Spades, King).up()]);
        tab.columns[1] = pile(&[Card::new(Clubs, Four), Card::new(Hearts, Queen).up()]);
        tab.waste = pile(&[Card::new(Diamonds, Ace).up()]);

        let moves = generate_legal_moves(&tab);
        assert!(moves.contains(&Move::from(MoveKind::WasteToFoundation { foundation: 0 })));
        assert!(moves.contains(&Move::from(MoveKind::ColumnToColumn {
            src_col: 1,
            src_index: 1,
            dst_col: 0,
        })));
        // KS fills the empty columns only if it leaves something behind.
        assert!(!moves.iter().any(|m| matches!(
            m.kind,
            MoveKind::ColumnToColumn { src_col: 0, .. }
        )));
        assert!(moves.contains(&Move::from(MoveKind::RecycleWaste)));
    }
}
