//! Deck model, card sanitization, and dataset discovery

pub mod card;
pub mod models;

pub use card::sanitize;
pub use models::{discover_decks, Deck, DeckFile, MIN_DECK_CARDS};
