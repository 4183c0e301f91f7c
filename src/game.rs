//! Game-level state: initial deck, current layout and move history.
//
//! `GameState` is the only way regular code should change a game. Every
//! action validates against the placement rules, applies a `Move` to the
//! cached `Tableau`, and appends it to the history. The move counter is
//! the history length, so it grows by exactly one per completed action.

use log::{debug, info};
use rand::Rng;

use crate::card::{create_deck, CardId, Deck};
use crate::error::EngineError;
use crate::moves::{
    can_place_on_foundation, can_place_on_tableau, foundation_for, generate_legal_moves,
    is_valid_run, Move, MoveKind, Source,
};
use crate::tableau::{Pile, Tableau, NUM_COLS, NUM_FOUNDATIONS};

/// Complete description of a single game at a point in time.
///
/// Conceptually, the game is:
///   - which deck you started from, and
///   - which moves you have applied since dealing that deck.
///
/// From this the current tableau can always be reconstructed; it is cached
/// here so that queries are cheap.
#[derive(Clone, Debug)]
pub struct GameState {
    initial_deck: Deck,
    tableau: Tableau,
    history: Vec<Move>,
}

/// Shuffle a fresh deck with `rng` and deal it.
pub fn deal_new_game<R: Rng>(rng: &mut R) -> GameState {
    GameState::new(create_deck(rng))
}

impl GameState {
    /// Deal `initial_deck` (in dealing order) with no moves played.
    pub fn new(initial_deck: Deck) -> Self {
        let tableau = Tableau::deal_from_shuffled(initial_deck);
        info!(
            "new game dealt: {} cards in stock, {} columns",
            tableau.stock.len(),
            NUM_COLS
        );
        GameState {
            initial_deck,
            tableau,
            history: Vec::new(),
        }
    }

    /// Rebuild a game from its deck and a recorded move history.
    ///
    /// The moves are replayed without re-checking the rules, so the history
    /// must come from an earlier game on the same deck.
    pub fn from_parts(initial_deck: Deck, history: Vec<Move>) -> Self {
        let mut tableau = Tableau::deal_from_shuffled(initial_deck);
        for mv in &history {
            mv.apply(&mut tableau);
        }
        GameState {
            initial_deck,
            tableau,
            history,
        }
    }

    // ----- Queries -----

    pub fn initial_deck(&self) -> &Deck {
        &self.initial_deck
    }

    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    pub fn columns(&self) -> &[Pile; NUM_COLS] {
        &self.tableau.columns
    }

    pub fn foundations(&self) -> &[Pile; NUM_FOUNDATIONS] {
        &self.tableau.foundations
    }

    pub fn stock(&self) -> &Pile {
        &self.tableau.stock
    }

    pub fn waste(&self) -> &Pile {
        &self.tableau.waste
    }

    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// Number of completed actions.
    pub fn move_count(&self) -> usize {
        self.history.len()
    }

    /// Whether no moves have yet been applied.
    pub fn is_at_initial(&self) -> bool {
        self.history.is_empty()
    }

    /// True iff all 52 cards sit on the foundations.
    ///
    /// Advisory only: nothing stops further calls after a win.
    pub fn check_win(&self) -> bool {
        self.tableau.is_win()
    }

    /// Every move that is legal right now.
    pub fn legal_moves(&self) -> Vec<Move> {
        generate_legal_moves(&self.tableau)
    }

    // ----- Actions -----

    /// Draw the top stock card face-up onto the waste or, with the stock
    /// empty, turn the waste over to form a new stock.
    ///
    /// Always succeeds and always counts as a move, even when recycling an
    /// empty waste.
    pub fn draw_from_stock(&mut self) {
        let kind = if self.tableau.stock.is_empty() {
            MoveKind::RecycleWaste
        } else {
            MoveKind::DrawFromStock
        };
        self.apply_move(Move::from(kind));
    }

    /// Move `card` from `source` onto its foundation.
    ///
    /// Returns `Ok(false)` and leaves the game untouched when the move is
    /// against the rules: the card is not the face-up top of its source, no
    /// foundation can take its suit, or the foundation wants another rank.
    /// Returns `Err` when `source` does not name a real pile holding `card`.
    pub fn move_to_foundation(&mut self, card: CardId, source: Source) -> Result<bool, EngineError> {
        let pile = self.source_pile(source)?;
        let pos = locate(pile, card, source)?;
        let Some(c) = pile.top().filter(|c| c.face_up && pos + 1 == pile.len()) else {
            debug!("rejected {card} -> foundation: not the face-up top of {source}");
            return Ok(false);
        };

        let Some(f) = foundation_for(&self.tableau, c) else {
            debug!("rejected {card} -> foundation: no pile free for its suit");
            return Ok(false);
        };
        if !can_place_on_foundation(c, &self.tableau.foundations[f]) {
            debug!("rejected {card} -> foundation {}", f + 1);
            return Ok(false);
        }

        let foundation = f as u8;
        let kind = match source {
            Source::Waste => MoveKind::WasteToFoundation { foundation },
            Source::Tableau(col) => MoveKind::ColumnToFoundation {
                src_col: col as u8,
                foundation,
            },
        };
        self.apply_move(Move::from(kind));
        Ok(true)
    }

    /// Move `card` from `source` onto tableau column `dst_col`.
    ///
    /// From the waste only the top card can move. From a column, `card` and
    /// every card above it move together and must form a valid run. Rule
    /// violations give `Ok(false)`; bad references give `Err`.
    pub fn move_to_tableau(
        &mut self,
        card: CardId,
        source: Source,
        dst_col: usize,
    ) -> Result<bool, EngineError> {
        if dst_col >= NUM_COLS {
            return Err(EngineError::ColumnOutOfRange(dst_col));
        }
        if source == Source::Tableau(dst_col) {
            return Err(EngineError::SameColumn(dst_col));
        }

        let pile = self.source_pile(source)?;
        let pos = locate(pile, card, source)?;
        let run = &pile.cards()[pos..];
        let movable = match source {
            Source::Waste => run.len() == 1,
            Source::Tableau(_) => is_valid_run(run),
        };
        if !movable {
            debug!("rejected {card} -> column {}: not a movable run", dst_col + 1);
            return Ok(false);
        }
        if !can_place_on_tableau(run[0], &self.tableau.columns[dst_col]) {
            debug!("rejected {card} -> column {}", dst_col + 1);
            return Ok(false);
        }

        let dst_col = dst_col as u8;
        let kind = match source {
            Source::Waste => MoveKind::WasteToColumn { dst_col },
            Source::Tableau(col) => MoveKind::ColumnToColumn {
                src_col: col as u8,
                src_index: pos as u8,
                dst_col,
            },
        };
        self.apply_move(Move::from(kind));
        Ok(true)
    }

    /// Play a move, typically one returned by `legal_moves`, through the
    /// checked actions above.
    pub fn play(&mut self, mv: Move) -> Result<bool, EngineError> {
        match mv.kind {
            MoveKind::DrawFromStock | MoveKind::RecycleWaste => {
                self.draw_from_stock();
                Ok(true)
            }
            MoveKind::WasteToFoundation { .. } => match self.tableau.waste.top() {
                Some(c) => self.move_to_foundation(c.id(), Source::Waste),
                None => Ok(false),
            },
            MoveKind::ColumnToFoundation { src_col, .. } => {
                let source = Source::Tableau(src_col as usize);
                match self.source_pile(source)?.top() {
                    Some(c) => self.move_to_foundation(c.id(), source),
                    None => Ok(false),
                }
            }
            MoveKind::WasteToColumn { dst_col } => match self.tableau.waste.top() {
                Some(c) => self.move_to_tableau(c.id(), Source::Waste, dst_col as usize),
                None => Ok(false),
            },
            MoveKind::ColumnToColumn {
                src_col,
                src_index,
                dst_col,
            } => {
                let source = Source::Tableau(src_col as usize);
                let card = self
                    .source_pile(source)?
                    .cards()
                    .get(src_index as usize)
                    .map(|c| c.id());
                match card {
                    Some(id) => self.move_to_tableau(id, source, dst_col as usize),
                    None => Ok(false),
                }
            }
        }
    }

    /// Send every card that can go to a foundation there, repeatedly, until
    /// nothing more moves. Returns how many cards moved.
    pub fn auto_move_to_foundations(&mut self) -> usize {
        let mut moved = 0;
        loop {
            let next = self.legal_moves().into_iter().find(|mv| {
                matches!(
                    mv.kind,
                    MoveKind::WasteToFoundation { .. } | MoveKind::ColumnToFoundation { .. }
                )
            });
            let Some(mv) = next else {
                return moved;
            };
            match self.play(mv) {
                Ok(true) => moved += 1,
                _ => return moved,
            }
        }
    }

    /// Reconstruct the current tableau from scratch by dealing the initial
    /// deck and replaying all moves in order.
    ///
    /// A consistency/debug helper; normal code reads the cached tableau.
    pub fn recompute_tableau_from_history(&self) -> Tableau {
        let mut tab = Tableau::deal_from_shuffled(self.initial_deck);
        for mv in &self.history {
            mv.apply(&mut tab);
        }
        tab
    }

    fn source_pile(&self, source: Source) -> Result<&Pile, EngineError> {
        match source {
            Source::Waste => Ok(&self.tableau.waste),
            Source::Tableau(col) => self
                .tableau
                .columns
                .get(col)
                .ok_or(EngineError::ColumnOutOfRange(col)),
        }
    }

    fn apply_move(&mut self, mv: Move) {
        debug!("move {}: {}", self.history.len() + 1, mv.describe(&self.tableau));
        mv.apply(&mut self.tableau);
        self.history.push(mv);
        if self.tableau.is_win() {
            info!("game won in {} moves", self.history.len());
        }
    }
}

/// Position of `card` within `pile`, or an error naming the stale reference.
fn locate(pile: &Pile, card: CardId, source: Source) -> Result<usize, EngineError> {
    pile.position(card)
        .ok_or(EngineError::CardNotInSource { card, pile: source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Rank::*;
    use crate::card::Suit::*;
    use crate::card::{shuffled_deck_from_seed, standard_deck, Card};

    fn game_with(tab: Tableau) -> GameState {
        let mut game = GameState::new(standard_deck());
        game.tableau = tab;
        game
    }

    fn pile(cards: &[Card]) -> Pile {
        Pile::from_cards(cards.to_vec())
    }

    #[test]
    fn fresh_deal_matches_the_klondike_layout() {
        let game = GameState::new(shuffled_deck_from_seed(1));

        for (i, col) in game.columns().iter().enumerate() {
            assert_eq!(col.len(), i + 1);
            let (top, rest) = col.cards().split_last().expect("column is dealt");
            assert!(top.face_up);
            assert!(rest.iter().all(|c| !c.face_up));
        }
        assert_eq!(game.stock().len(), 24);
        assert!(game.stock().iter().all(|c| !c.face_up));
        assert!(game.waste().is_empty());
        assert!(game.foundations().iter().all(Pile::is_empty));
        assert_eq!(game.move_count(), 0);
        assert!(game.is_at_initial());
        assert!(!game.check_win());
    }

    #[test]
    fn draw_moves_one_card_face_up_to_waste() {
        let mut game = GameState::new(shuffled_deck_from_seed(3));
        let top = game.stock().top().map(Card::id);

        game.draw_from_stock();

        assert_eq!(game.stock().len(), 23);
        assert_eq!(game.waste().len(), 1);
        assert_eq!(game.move_count(), 1);
        let drawn = game.waste().top().expect("one card drawn");
        assert!(drawn.face_up);
        assert_eq!(Some(drawn.id()), top);
    }

    #[test]
    fn empty_stock_recycles_reversed_face_down_waste() {
        let mut game = GameState::new(shuffled_deck_from_seed(4));
        for _ in 0..24 {
            game.draw_from_stock();
        }
        assert!(game.stock().is_empty());
        let waste_before: Vec<CardId> = game.waste().iter().map(|c| c.id()).collect();

        game.draw_from_stock();

        assert!(game.waste().is_empty());
        assert_eq!(game.stock().len(), 24);
        assert!(game.stock().iter().all(|c| !c.face_up));
        let mut stock_ids: Vec<CardId> = game.stock().iter().map(|c| c.id()).collect();
        stock_ids.reverse();
        assert_eq!(stock_ids, waste_before);
        assert_eq!(game.move_count(), 25);

        // After a full pass and a recycle the draw order repeats.
        let first_again = game.stock().top().map(Card::id);
        assert_eq!(first_again, waste_before.first().copied());
    }

    #[test]
    fn recycling_nothing_still_counts_as_a_move() {
        let mut game = game_with(Tableau::new_empty());
        game.draw_from_stock();
        assert!(game.stock().is_empty());
        assert!(game.waste().is_empty());
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn illegal_foundation_move_changes_nothing() {
        let mut tab = Tableau::new_empty();
        tab.waste = pile(&[Card::new(Hearts, Two).up()]);
        let mut game = game_with(tab);
        let before = game.tableau().clone();

        let moved = game
            .move_to_foundation(Card::new(Hearts, Two).id(), Source::Waste)
            .expect("valid reference");

        assert!(!moved);
        assert_eq!(game.tableau(), &before);
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn tableau_foundation_move_flips_the_new_top() {
        let mut tab = Tableau::new_empty();
        tab.columns[2] = pile(&[
            Card::new(Spades, Nine),
            Card::new(Clubs, Four),
            Card::new(Diamonds, Ace).up(),
        ]);
        let mut game = game_with(tab);

        let moved = game
            .move_to_foundation(Card::new(Diamonds, Ace).id(), Source::Tableau(2))
            .expect("valid reference");

        assert!(moved);
        assert_eq!(game.move_count(), 1);
        assert_eq!(game.foundations()[0].len(), 1);
        let col = &game.columns()[2];
        assert_eq!(col.len(), 2);
        let top = col.top().expect("two cards left");
        assert_eq!(top.id(), Card::new(Clubs, Four).id());
        assert!(top.face_up);
        assert_eq!(col.num_face_down(), 1);
    }

    #[test]
    fn foundation_move_builds_on_matching_suit() {
        let mut tab = Tableau::new_empty();
        tab.foundations[0] = pile(&[Card::new(Clubs, Ace).up()]);
        tab.waste = pile(&[Card::new(Spades, Two).up(), Card::new(Clubs, Two).up()]);
        let mut game = game_with(tab);

        assert_eq!(
            game.move_to_foundation(Card::new(Clubs, Two).id(), Source::Waste),
            Ok(true)
        );
        assert_eq!(game.foundations()[0].len(), 2);

        // 2S would need an AS first; the second foundation is empty.
        assert_eq!(
            game.move_to_foundation(Card::new(Spades, Two).id(), Source::Waste),
            Ok(false)
        );
        assert_eq!(game.move_count(), 1);
    }

    #[test]
    fn buried_card_is_rejected_not_an_error() {
        let mut tab = Tableau::new_empty();
        tab.columns[0] = pile(&[Card::new(Hearts, Ace).up(), Card::new(Spades, King).up()]);
        let mut game = game_with(tab);

        assert_eq!(
            game.move_to_foundation(Card::new(Hearts, Ace).id(), Source::Tableau(0)),
            Ok(false)
        );
    }

    #[test]
    fn bad_references_are_errors() {
        let mut game = game_with(Tableau::new_empty());
        let ace = Card::new(Hearts, Ace).id();

        assert_eq!(
            game.move_to_foundation(ace, Source::Tableau(7)),
            Err(EngineError::ColumnOutOfRange(7))
        );
        assert_eq!(
            game.move_to_foundation(ace, Source::Waste),
            Err(EngineError::CardNotInSource {
                card: ace,
                pile: Source::Waste
            })
        );
        assert_eq!(
            game.move_to_tableau(ace, Source::Tableau(3), 3),
            Err(EngineError::SameColumn(3))
        );
        assert_eq!(
            game.move_to_tableau(ace, Source::Waste, 9),
            Err(EngineError::ColumnOutOfRange(9))
        );
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn run_moves_between_columns_and_exposes_card() {
        let mut tab = Tableau::new_empty();
        tab.columns[0] = pile(&[
            Card::new(Hearts, Three),
            Card::new(Diamonds, Nine).up(),
            Card::new(Spades, Eight).up(),
        ]);
        tab.columns[1] = pile(&[Card::new(Clubs, Ten).up()]);
        let mut game = game_with(tab);

        let moved = game
            .move_to_tableau(Card::new(Diamonds, Nine).id(), Source::Tableau(0), 1)
            .expect("valid reference");

        assert!(moved);
        assert_eq!(game.columns()[1].len(), 3);
        assert_eq!(game.columns()[0].len(), 1);
        assert!(game.columns()[0].top().is_some_and(|c| c.face_up));
        assert_eq!(
            game.history(),
            &[Move::from(MoveKind::ColumnToColumn {
                src_col: 0,
                src_index: 1,
                dst_col: 1
            })]
        );
    }

    #[test]
    fn waste_to_column_respects_tableau_rule() {
        let mut tab = Tableau::new_empty();
        tab.columns[4] = pile(&[Card::new(Hearts, Six).up()]);
        tab.waste = pile(&[Card::new(Diamonds, Five).up()]);
        let mut game = game_with(tab);

        assert_eq!(
            game.move_to_tableau(Card::new(Diamonds, Five).id(), Source::Waste, 4),
            Ok(false)
        );
        assert_eq!(
            game.move_to_tableau(Card::new(Diamonds, Five).id(), Source::Waste, 0),
            Ok(false)
        );
        assert_eq!(game.move_count(), 0);
    }

    #[test]
    fn history_replay_matches_cached_tableau() {
        let mut game = GameState::new(shuffled_deck_from_seed(99));
        for _ in 0..200 {
            let Some(&mv) = game.legal_moves().first() else {
                break;
            };
            assert_eq!(game.play(mv), Ok(true));
        }
        assert!(game.move_count() > 0);
        assert_eq!(&game.recompute_tableau_from_history(), game.tableau());

        let rebuilt = GameState::from_parts(*game.initial_deck(), game.history().to_vec());
        assert_eq!(rebuilt.tableau(), game.tableau());
    }
}
