//! Card, Suit, Rank and Color types for a standard 52-card deck.
//!
//! - `CardId` is a compact 1-byte identity (0..=51) derived from suit+rank.
//! - `Card` pairs that identity with the face-up flag owned by its pile.
//! - Deck building and the Fisher–Yates shuffle take an injected `Rng`.

use core::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of ranks in a standard deck.
pub const NUM_RANKS: u8 = 13;
/// Number of cards in a standard deck.
pub const CARDS_PER_DECK: u8 = NUM_SUITS * NUM_RANKS;

/// A full deck in dealing order (index 0 is dealt first).
pub type Deck = [Card; CARDS_PER_DECK as usize];

/// The four suits, in deck-building order.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

/// Card color, derived from the suit.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Red,
    Black,
}

/// The thirteen ranks, Ace low.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King, // 12
}

/// Identity of a card, unique within a deck.
///
/// The mapping is:
/// ```text
/// index = suit as u8 * 13 + rank as u8
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct CardId(u8);

/// A card as it lies in a pile.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Card {
    id: CardId,
    /// Owned by the pile holding the card; flipped by deal, draw, recycle
    /// and by exposing the top of a column.
    pub face_up: bool,
}

impl Suit {
    /// All suits in a fixed, reproducible order.
    pub const ALL: [Suit; NUM_SUITS as usize] =
        [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Construct a suit from a small integer 0..=3.
    ///
    /// # Panics
    ///
    /// Panics if `v >= 4`.
    #[inline]
    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Suit::Hearts,
            1 => Suit::Diamonds,
            2 => Suit::Clubs,
            3 => Suit::Spades,
            _ => panic!("invalid suit: {v}"),
        }
    }

    #[inline]
    pub fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    /// Lowercase name, as used in card ids ("hearts", "spades", ...).
    pub fn name(self) -> &'static str {
        match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        }
    }

    /// Display symbol: ♥ ♦ ♣ ♠.
    pub fn symbol(self) -> char {
        match self {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        }
    }
}

impl Rank {
    /// All ranks in a fixed, reproducible order (Ace..King).
    pub const ALL: [Rank; NUM_RANKS as usize] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Construct a rank from a small integer 0..=12.
    ///
    /// # Panics
    ///
    /// Panics if `v >= 13`.
    #[inline]
    pub fn from_u8(v: u8) -> Self {
        Rank::ALL
            .get(v as usize)
            .copied()
            .unwrap_or_else(|| panic!("invalid rank: {v}"))
    }

    /// 0-based position in A,2,...,10,J,Q,K.
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Face label: "A", "2", ..., "10", "J", "Q", "K".
    pub fn label(self) -> &'static str {
        match self {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl CardId {
    #[inline]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        CardId(suit as u8 * NUM_RANKS + rank as u8)
    }

    /// Create an id from a raw index in 0..=51.
    ///
    /// # Panics
    ///
    /// Panics in debug builds if `index >= 52`.
    #[inline]
    pub fn from_index(index: u8) -> Self {
        debug_assert!(index < CARDS_PER_DECK);
        CardId(index)
    }

    #[inline]
    pub fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub fn suit(self) -> Suit {
        Suit::from_u8(self.0 / NUM_RANKS)
    }

    #[inline]
    pub fn rank(self) -> Rank {
        Rank::from_u8(self.0 % NUM_RANKS)
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.suit().name(), self.rank().label())
    }
}

impl Serialize for CardId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl Card {
    /// A new face-down card.
    #[inline]
    pub fn new(suit: Suit, rank: Rank) -> Self {
        Card {
            id: CardId::new(suit, rank),
            face_up: false,
        }
    }

    /// Same card, face-up. Handy when building layouts by hand.
    #[inline]
    pub fn up(mut self) -> Self {
        self.face_up = true;
        self
    }

    #[inline]
    pub fn id(self) -> CardId {
        self.id
    }

    #[inline]
    pub fn suit(self) -> Suit {
        self.id.suit()
    }

    #[inline]
    pub fn rank(self) -> Rank {
        self.id.rank()
    }

    #[inline]
    pub fn rank_index(self) -> u8 {
        self.rank().index()
    }

    #[inline]
    pub fn color(self) -> Color {
        self.suit().color()
    }

    /// Short string like "A♥", "7♣", "10♦", "K♠".
    pub fn short_str(self) -> String {
        format!("{}{}", self.rank().label(), self.suit().symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_str())
    }
}

/// Can `upper` be stacked on `lower` in a tableau run?
///
/// True if `upper` is exactly one rank lower and of the opposite color.
#[inline]
pub fn is_one_lower_opposite_color(upper: Card, lower: Card) -> bool {
    upper.rank_index() + 1 == lower.rank_index() && upper.color() != lower.color()
}

/// Generate a standard 52-card deck, face down, in a fixed order.
///
/// Suits follow `Suit::ALL` order, and ranks follow `Rank::ALL` order.
pub fn standard_deck() -> Deck {
    let mut cards = [Card::new(Suit::Hearts, Rank::Ace); CARDS_PER_DECK as usize];
    let mut i = 0usize;
    for &suit in Suit::ALL.iter() {
        for &rank in Rank::ALL.iter() {
            cards[i] = Card::new(suit, rank);
            i += 1;
        }
    }
    cards
}

/// Fisher–Yates: walk from the last index down to 1, swapping each slot
/// with a uniformly chosen slot in `[0, i]`.
pub fn shuffle<R: Rng>(mut deck: Deck, rng: &mut R) -> Deck {
    for i in (1..deck.len()).rev() {
        let j = rng.random_range(0..=i);
        deck.swap(i, j);
    }
    deck
}

/// A standard deck shuffled with the given random source.
pub fn create_deck<R: Rng>(rng: &mut R) -> Deck {
    shuffle(standard_deck(), rng)
}

/// A reproducibly shuffled deck for a 64-bit seed.
pub fn shuffled_deck_from_seed(seed: u64) -> Deck {
    let mut rng = StdRng::seed_from_u64(seed);
    create_deck(&mut rng)
}
