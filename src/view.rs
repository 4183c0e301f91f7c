//! Read-only snapshot of a game for renderers.
//!
//! The engine never pushes updates: after each action a renderer builds a
//! fresh `BoardView` and redraws everything from it. Face-down cards carry
//! no identity, so a view can be handed to a client without leaking the
//! deal.

use serde::Serialize;

use crate::card::{Card, CardId, Color, Suit};
use crate::game::GameState;
use crate::tableau::Pile;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FaceView {
    pub id: CardId,
    pub rank: &'static str,
    pub suit: Suit,
    pub symbol: char,
    pub color: Color,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub face_up: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub face: Option<FaceView>,
}

/// A pile shown by its top card only (stock, waste, foundations).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PileView {
    pub count: usize,
    pub top: Option<CardView>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardView {
    pub moves: usize,
    pub won: bool,
    pub stock: PileView,
    pub waste: PileView,
    pub foundations: Vec<PileView>,
    /// Every card of every column, bottom -> top.
    pub columns: Vec<Vec<CardView>>,
}

impl From<Card> for CardView {
    fn from(card: Card) -> Self {
        let face = card.face_up.then(|| FaceView {
            id: card.id(),
            rank: card.rank().label(),
            suit: card.suit(),
            symbol: card.suit().symbol(),
            color: card.color(),
        });
        CardView {
            face_up: card.face_up,
            face,
        }
    }
}

impl From<&Pile> for PileView {
    fn from(pile: &Pile) -> Self {
        PileView {
            count: pile.len(),
            top: pile.top().map(CardView::from),
        }
    }
}

impl BoardView {
    pub fn from_game(game: &GameState) -> Self {
        BoardView {
            moves: game.move_count(),
            won: game.check_win(),
            stock: game.stock().into(),
            waste: game.waste().into(),
            foundations: game.foundations().iter().map(PileView::from).collect(),
            columns: game
                .columns()
                .iter()
                .map(|col| col.iter().copied().map(CardView::from).collect())
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
