//! # pokerbench-engine: Texas Hold'em table engine
//!
//! Cards, hand evaluation and a betting state machine for 2 to 10 seats,
//! with a seeded RNG so every hand can be replayed from one seed.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Deterministic deck shuffling with ChaCha20 RNG
//! - [`hand`] - Five-card evaluation and best-of-seven selection
//! - [`player`] - Player actions and per-seat betting state
//! - [`rules`] - Action validation, blinds and raise coercion
//! - [`table`] - The betting state machine: blinds, turn order, streets, showdown
//! - [`logger`] - Action log and HandRecord serialization
//! - [`errors`] - Error types for table operations
//!
//! ## Quick Start
//!
//! ```rust
//! use pokerbench_engine::cards::{Card, Rank, Suit};
//! use pokerbench_engine::hand::{best_hand, Category};
//!
//! let hole = [Card::new(Rank::Ace, Suit::Hearts), Card::new(Rank::King, Suit::Hearts)];
//! let board = [
//!     Card::new(Rank::Queen, Suit::Hearts),
//!     Card::new(Rank::Jack, Suit::Hearts),
//!     Card::new(Rank::Ten, Suit::Hearts),
//!     Card::new(Rank::Two, Suit::Clubs),
//!     Card::new(Rank::Three, Suit::Diamonds),
//! ];
//!
//! let strength = best_hand(&hole, &board);
//! assert_eq!(strength.category, Category::RoyalFlush);
//! ```
//!
//! ## Playing a hand
//!
//! ```rust
//! use pokerbench_engine::player::PlayerAction;
//! use pokerbench_engine::rules::Blinds;
//! use pokerbench_engine::table::{StreetAdvance, Table};
//!
//! let mut table = Table::new(["a", "b", "c"], 1_000, Blinds::new(5, 10), 7).unwrap();
//! table.start_hand().unwrap();
//! loop {
//!     while let Some(seat) = table.next_to_act() {
//!         let owed = table.view_for(seat).unwrap().to_call;
//!         let action = if owed > 0 { PlayerAction::Call } else { PlayerAction::Check };
//!         table.apply_action(seat, action).unwrap();
//!     }
//!     if let StreetAdvance::Showdown(payouts) = table.advance_street().unwrap() {
//!         assert!(!payouts.is_empty());
//!         break;
//!     }
//! }
//! table.check_conservation().unwrap();
//! ```

pub mod cards;
pub mod deck;
pub mod errors;
pub mod hand;
pub mod logger;
pub mod player;
pub mod rules;
pub mod table;
