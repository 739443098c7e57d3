use std::fmt;

use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// A decision for the current betting round.
///
/// `Raise` carries the *additional* chips the player wants to put in on top
/// of what they already contributed this street. The engine clamps it to the
/// player's stack.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum PlayerAction {
    /// Fold and forfeit the hand
    Fold,
    /// Pass; only legal when nothing is owed
    Check,
    /// Match the bet to match (or go all-in for less)
    Call,
    /// Put in this many more chips
    Raise(u32),
}

impl PlayerAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            PlayerAction::Fold => ActionKind::Fold,
            PlayerAction::Check => ActionKind::Check,
            PlayerAction::Call => ActionKind::Call,
            PlayerAction::Raise(_) => ActionKind::Raise,
        }
    }

    /// Requested raise amount; zero for every other action.
    pub fn amount(&self) -> u32 {
        match self {
            PlayerAction::Raise(n) => *n,
            _ => 0,
        }
    }
}

/// Tag of a [`PlayerAction`] without its amount, as stored in action logs.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Fold,
    Check,
    Call,
    Raise,
}

impl ActionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ActionKind::Fold => "fold",
            ActionKind::Check => "check",
            ActionKind::Call => "call",
            ActionKind::Raise => "raise",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default starting stack per player, in chips
pub const DEFAULT_STARTING_STACK: u32 = 1_000;

/// A seated player: chip stack, hole cards and per-hand betting state.
///
/// Only the table mutates players; outside the engine they are read through
/// accessors and [`crate::table::GameStateView`].
#[derive(Debug, Clone)]
pub struct Player {
    /// Display name, unique at the table
    name: String,
    /// Chips behind
    stack: u32,
    /// Chips put in during the current street
    street_contribution: u32,
    /// Chips put in during the whole hand
    hand_contribution: u32,
    hole: Option<[Card; 2]>,
    in_hand: bool,
    folded: bool,
    acted: bool,
}

impl Player {
    pub fn new(name: impl Into<String>, stack: u32) -> Self {
        Self {
            name: name.into(),
            stack,
            street_contribution: 0,
            hand_contribution: 0,
            hole: None,
            in_hand: false,
            folded: false,
            acted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    pub fn street_contribution(&self) -> u32 {
        self.street_contribution
    }
    pub fn hand_contribution(&self) -> u32 {
        self.hand_contribution
    }
    pub fn hole_cards(&self) -> Option<[Card; 2]> {
        self.hole
    }
    pub fn is_in_hand(&self) -> bool {
        self.in_hand
    }
    pub fn is_folded(&self) -> bool {
        self.folded
    }
    pub fn has_acted(&self) -> bool {
        self.acted
    }

    /// Dealt in and not folded.
    pub fn is_live(&self) -> bool {
        self.in_hand && !self.folded
    }

    pub fn is_all_in(&self) -> bool {
        self.is_live() && self.stack == 0
    }

    pub(crate) fn deal_in(&mut self, hole: [Card; 2]) {
        self.hole = Some(hole);
        self.in_hand = true;
        self.folded = false;
        self.acted = false;
        self.street_contribution = 0;
        self.hand_contribution = 0;
    }

    pub(crate) fn sit_out(&mut self) {
        self.hole = None;
        self.in_hand = false;
        self.folded = false;
        self.acted = false;
        self.street_contribution = 0;
        self.hand_contribution = 0;
    }

    pub(crate) fn reset_street(&mut self) {
        self.street_contribution = 0;
        self.acted = false;
    }

    pub(crate) fn fold(&mut self) {
        self.folded = true;
    }

    pub(crate) fn mark_acted(&mut self) {
        self.acted = true;
    }

    /// Moves up to `amount` chips from the stack into this street's
    /// contribution and returns how many actually moved.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let moved = amount.min(self.stack);
        self.stack -= moved;
        self.street_contribution += moved;
        self.hand_contribution += moved;
        moved
    }

    pub(crate) fn add_chips(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commit_is_clamped_to_stack() {
        let mut p = Player::new("a", 7);
        assert_eq!(p.commit(10), 7);
        assert_eq!(p.stack(), 0);
        assert_eq!(p.street_contribution(), 7);
        assert_eq!(p.hand_contribution(), 7);
    }

    #[test]
    fn street_reset_keeps_hand_total() {
        let mut p = Player::new("a", 100);
        p.commit(30);
        p.mark_acted();
        p.reset_street();
        assert_eq!(p.street_contribution(), 0);
        assert_eq!(p.hand_contribution(), 30);
        assert!(!p.has_acted());
    }

    #[test]
    fn action_kind_and_amount() {
        assert_eq!(PlayerAction::Raise(40).kind(), ActionKind::Raise);
        assert_eq!(PlayerAction::Raise(40).amount(), 40);
        assert_eq!(PlayerAction::Call.amount(), 0);
        assert_eq!(ActionKind::Check.to_string(), "check");
    }
}
