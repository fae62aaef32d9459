use crate::error::{OracleError, Result};
use rand::seq::SliceRandom;
use serde::{Serialize, Serializer};
use std::fmt;

/// Rank characters in deck order. `0` stands for ten.
const RANKS: [u8; 13] = [
    b'A', b'2', b'3', b'4', b'5', b'6', b'7', b'8', b'9', b'0', b'J', b'Q', b'K',
];

/// Suit characters in deck order: spades, hearts, diamonds, clubs.
const SUITS: [u8; 4] = [b'S', b'H', b'D', b'C'];

pub const DECK_SIZE: usize = 52;

/// A playing card, wire-encoded as two bytes: rank character followed by
/// suit character. Ace of Spades is `0x41 0x53` ("AS").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    rank: u8,
    suit: u8,
}

impl Card {
    pub fn new(rank: u8, suit: u8) -> Result<Self> {
        if !RANKS.contains(&rank) {
            return Err(OracleError::InvalidRequest(format!(
                "unknown rank byte 0x{rank:02x}"
            )));
        }
        if !SUITS.contains(&suit) {
            return Err(OracleError::InvalidRequest(format!(
                "unknown suit byte 0x{suit:02x}"
            )));
        }
        Ok(Self { rank, suit })
    }

    pub fn code(&self) -> [u8; 2] {
        [self.rank, self.suit]
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank as char, self.suit as char)
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// The full 52-card deck in fixed order: all spades ace through king, then
/// hearts, diamonds, clubs.
pub fn fresh_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for suit in SUITS {
        for rank in RANKS {
            deck.push(Card { rank, suit });
        }
    }
    deck
}

/// Deals `quantity` cards without replacement from a fresh deck.
///
/// Shuffled: the whole deck is reshuffled for every call, so consecutive
/// deals are independent. Non-shuffled: the first `quantity` cards of the
/// fixed-order deck.
pub fn deal(quantity: usize, shuffle: bool) -> Vec<Card> {
    let mut deck = fresh_deck();
    if shuffle {
        deck.shuffle(&mut rand::thread_rng());
    }
    deck.truncate(quantity.min(DECK_SIZE));
    deck
}
