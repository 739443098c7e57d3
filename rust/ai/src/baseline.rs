//! Rule-based baseline agent.
//!
//! Deterministic: the same view and hole cards always give the same action,
//! which makes it a stable yardstick in benchmarks.

use std::time::Duration;

use async_trait::async_trait;
use pokerbench_engine::cards::Card;
use pokerbench_engine::hand::{best_hand, Category};
use pokerbench_engine::player::PlayerAction;
use pokerbench_engine::table::GameStateView;

use crate::{Agent, AgentError};

/// Hand-strength driven agent.
///
/// # Strategy
///
/// **Preflop:** hole cards are scored 0-10 from a fixed table
/// (premium pairs and AKs on top, offsuit low cards at the bottom).
///
/// **Postflop:** the best hand so far is scored by category, with a small
/// boost for a queen-or-better top card.
///
/// Strong scores bet or raise about half the pot, medium scores call when
/// the price is right, weak scores check or fold.
#[derive(Debug, Clone)]
pub struct BaselineAgent {
    name: String,
}

/// The numbers a decision depends on.
#[derive(Debug, Clone, Copy)]
struct Spot {
    to_call: u32,
    min_raise: u32,
    stack: u32,
    pot: u32,
}

impl BaselineAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Preflop strength, 0-10.
    ///
    /// - 9-10: AA, KK, QQ, JJ, AKs
    /// - 7-8: TT-99, AK, AQ, KQs
    /// - 5-6: 88-77, AJ, suited broadway, high suited connectors
    /// - 3-4: small pairs, weak aces, low suited connectors
    /// - 0-2: everything else
    pub fn preflop_strength(hole: [Card; 2]) -> u8 {
        let r1 = hole[0].rank.value();
        let r2 = hole[1].rank.value();
        let (high, low) = if r1 >= r2 { (r1, r2) } else { (r2, r1) };
        let suited = hole[0].suit == hole[1].suit;
        let pick = |s: u8, o: u8| if suited { s } else { o };

        if high == low {
            return match high {
                13..=14 => 10,
                11..=12 => 9,
                10 => 8,
                9 => 7,
                8 => 6,
                7 => 5,
                _ => 4,
            };
        }

        match (high, low) {
            (14, 13) => pick(10, 8),
            (14, 12) => pick(8, 7),
            (14, 11) => pick(7, 6),
            (14, 10) => pick(6, 5),
            (14, _) => pick(5, 4),
            (13, 12) => pick(7, 6),
            (13, 11) => pick(6, 5),
            (13, 10) => pick(5, 4),
            (12, 11) => pick(6, 5),
            (12, 10) => pick(5, 4),
            _ if suited && high - low <= 2 => {
                if high >= 9 {
                    5
                } else {
                    4
                }
            }
            _ if high >= 11 && low >= 9 => 4,
            _ => 2,
        }
    }

    /// Postflop strength, 0-10. `None` before the flop.
    pub fn postflop_strength(hole: [Card; 2], board: &[Card]) -> Option<u8> {
        if board.len() < 3 {
            return None;
        }
        let eval = best_hand(&hole, board);
        let base = match eval.category {
            Category::HighCard => 1,
            Category::OnePair => 3,
            Category::TwoPair => 5,
            Category::ThreeOfAKind => 6,
            Category::Straight => 7,
            Category::Flush => 8,
            Category::FullHouse => 9,
            Category::FourOfAKind | Category::StraightFlush | Category::RoyalFlush => 10,
        };
        let kicker_boost = u8::from(eval.kickers[0] >= 12);
        Some((base + kicker_boost).min(10))
    }

    /// pot / (pot + call); 1.0 when checking is free.
    fn pot_odds(pot: u32, to_call: u32) -> f32 {
        if to_call == 0 {
            return 1.0;
        }
        pot as f32 / (pot + to_call) as f32
    }

    fn decide_action(strength: u8, spot: Spot) -> PlayerAction {
        let Spot {
            to_call,
            min_raise,
            stack,
            pot,
        } = spot;

        if to_call == 0 {
            let bet = match strength {
                9..=10 => pot * 2 / 3,
                7..=8 => pot / 2,
                _ => return PlayerAction::Check,
            };
            return if stack >= min_raise {
                PlayerAction::Raise(bet.max(min_raise).min(stack))
            } else {
                PlayerAction::Check
            };
        }

        // calling for less than the full amount is always allowed
        if to_call >= stack {
            return if strength >= 7 {
                PlayerAction::Call
            } else {
                PlayerAction::Fold
            };
        }

        let odds = Self::pot_odds(pot, to_call);
        match strength {
            9..=10 if stack >= to_call + min_raise => {
                let raise_by = (pot / 2).max(min_raise).min(stack - to_call);
                PlayerAction::Raise(to_call + raise_by)
            }
            7..=10 => PlayerAction::Call,
            5..=6 if odds >= 0.3 || to_call <= pot / 4 => PlayerAction::Call,
            3..=4 if odds >= 0.4 || to_call <= pot / 6 => PlayerAction::Call,
            _ => PlayerAction::Fold,
        }
    }
}

#[async_trait]
impl Agent for BaselineAgent {
    async fn decide(
        &self,
        view: &GameStateView,
        hole: [Card; 2],
        _deadline: Duration,
    ) -> Result<PlayerAction, AgentError> {
        let strength = Self::postflop_strength(hole, &view.community_cards)
            .unwrap_or_else(|| Self::preflop_strength(hole));
        let spot = Spot {
            to_call: view.to_call,
            min_raise: view.blinds.big.max(1),
            stack: view.my_chips(),
            pot: view.pot,
        };
        Ok(Self::decide_action(strength, spot))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
