//! Piles and the full card layout.
//!
//! A `Pile` is an ordered stack of cards whose last element is the top
//! (the accessible end). `Tableau` groups every pile on the table: the
//! seven tableau columns, four foundations, the stock and the waste.

use crate::card::{Card, CardId, Deck, CARDS_PER_DECK, NUM_RANKS, NUM_SUITS};

/// Number of tableau columns.
pub const NUM_COLS: usize = 7;
/// Number of foundation piles.
pub const NUM_FOUNDATIONS: usize = NUM_SUITS as usize;
/// Cards dealt to the columns: 1 + 2 + ... + 7.
pub const TABLEAU_DEAL: usize = NUM_COLS * (NUM_COLS + 1) / 2;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pile {
    cards: Vec<Card>,
}

impl Pile {
    pub fn new() -> Self {
        Pile { cards: Vec::new() }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Pile { cards }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    pub fn top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    #[inline]
    pub fn bottom(&self) -> Option<Card> {
        self.cards.first().copied()
    }

    #[inline]
    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Cards bottom -> top.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Position of a card (bottom = 0), if it is in this pile.
    pub fn position(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id() == id)
    }

    /// Detach every card from `index` to the top, preserving order.
    pub fn split_off(&mut self, index: usize) -> Vec<Card> {
        self.cards.split_off(index)
    }

    pub fn extend(&mut self, run: Vec<Card>) {
        self.cards.extend(run);
    }

    /// Take every card out, leaving the pile empty.
    pub fn take_all(&mut self) -> Vec<Card> {
        std::mem::take(&mut self.cards)
    }

    /// Turn the top card face-up, if there is one.
    ///
    /// Called whenever a column loses its top card: Klondike never leaves
    /// a face-down card exposed.
    pub fn flip_top_face_up(&mut self) {
        if let Some(top) = self.cards.last_mut() {
            top.face_up = true;
        }
    }

    pub fn num_face_down(&self) -> usize {
        self.cards.iter().filter(|c| !c.face_up).count()
    }

    /// A foundation is complete once it holds a whole suit.
    pub fn is_complete_foundation(&self) -> bool {
        self.cards.len() == NUM_RANKS as usize
    }
}

/// Every pile on the table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Tableau {
    pub columns: [Pile; NUM_COLS],
    pub foundations: [Pile; NUM_FOUNDATIONS],
    /// Face-down draw pile; the top is the next card drawn.
    pub stock: Pile,
    /// Face-up discard pile fed by the stock.
    pub waste: Pile,
}

impl Tableau {
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Deal a deck into the Klondike starting layout.
    ///
    /// Column `c` (0-based) receives `c + 1` cards, consuming the deck
    /// left to right in a single pass; only the last card dealt to each
    /// column is turned face-up. The remaining 24 cards form the stock,
    /// face-down, with the last deck card on top.
    pub fn deal_from_shuffled(deck: Deck) -> Self {
        let mut tab = Tableau::new_empty();
        let mut cards = deck.into_iter().map(|mut c| {
            c.face_up = false;
            c
        });

        for col in 0..NUM_COLS {
            for row in 0..=col {
                // The iterator holds 52 cards and the triangle takes 28.
                let Some(mut card) = cards.next() else {
                    unreachable!("deck exhausted while dealing the tableau");
                };
                card.face_up = row == col;
                tab.columns[col].push(card);
            }
        }

        tab.stock = Pile::from_cards(cards.collect());
        tab
    }

    /// Total number of cards sitting on the foundations.
    pub fn foundation_card_count(&self) -> usize {
        self.foundations.iter().map(Pile::len).sum()
    }

    /// True once every card has reached the foundations.
    pub fn is_win(&self) -> bool {
        self.foundation_card_count() == CARDS_PER_DECK as usize
    }

    /// Every card on the table, pile by pile, bottom -> top within a pile.
    ///
    /// Order: columns 1..7, foundations 1..4, stock, waste.
    pub fn flatten_cards(&self) -> Vec<Card> {
        self.columns
            .iter()
            .chain(self.foundations.iter())
            .chain([&self.stock, &self.waste])
            .flat_map(|p| p.iter().copied())
            .collect()
    }

    /// Total card count across all piles.
    pub fn total_cards(&self) -> usize {
        self.columns.iter().map(Pile::len).sum::<usize>()
            + self.foundation_card_count()
            + self.stock.len()
            + self.waste.len()
    }
}
