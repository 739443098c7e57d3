use std::fmt;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::hand::HandEvaluation;
use crate::player::PlayerAction;
use crate::table::{ActionOutcome, Payout};

/// Represents a betting street in Texas Hold'em poker.
/// Defines the four stages of a poker hand.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    /// Before flop (hole cards dealt)
    Preflop,
    /// After flop (3 community cards)
    Flop,
    /// After turn (4th community card)
    Turn,
    /// After river (5th community card)
    River,
}

impl Street {
    pub const ALL: [Street; 4] = [Street::Preflop, Street::Flop, Street::Turn, Street::River];

    pub fn as_str(self) -> &'static str {
        match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why the simulator folded a hand on a player's behalf.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForcedFold {
    /// The agent missed its deadline
    Timeout,
    /// The agent returned an error
    AgentError,
    /// The agent task panicked
    AgentPanic,
    /// The engine rejected the requested action
    IllegalAction,
}

/// Records a single applied action during a hand.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub player: String,
    pub seat: usize,
    pub street: Street,
    /// The action as applied; for a forced fold this is always `Fold`
    pub action: PlayerAction,
    /// Chips moved from stack to pot
    pub chips: u32,
    pub pot_after: u32,
    /// 1-based position within the street
    pub sequence: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub forced: Option<ForcedFold>,
}

/// Ordered action log for the hand in progress.
#[derive(Debug, Clone, Default)]
pub struct HandLog {
    actions: Vec<ActionRecord>,
}

impl HandLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(
        &mut self,
        player: &str,
        seat: usize,
        street: Street,
        action: PlayerAction,
        outcome: &ActionOutcome,
        forced: Option<ForcedFold>,
    ) -> &ActionRecord {
        let sequence = self.actions.iter().filter(|a| a.street == street).count() as u32 + 1;
        self.actions.push(ActionRecord {
            player: player.to_string(),
            seat,
            street,
            action,
            chips: outcome.chips,
            pot_after: outcome.pot_after,
            sequence,
            forced,
        });
        &self.actions[self.actions.len() - 1]
    }

    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<ActionRecord> {
        self.actions
    }
}

/// A player's name paired with a chip count.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct StackEntry {
    pub player: String,
    pub chips: u32,
}

/// A hand revealed at showdown.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShownHand {
    pub player: String,
    pub hole: [Card; 2],
    pub evaluation: HandEvaluation,
}

/// Information about the showdown phase when hands are revealed.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ShowdownInfo {
    /// Names of the players who won (more than one on a split pot)
    pub winners: Vec<String>,
    pub hands: Vec<ShownHand>,
    /// e.g. "split pot", "Flush over Straight"
    #[serde(default)]
    pub notes: Option<String>,
}

/// Complete record of one played hand: the per-hand result record handed to
/// reporting and persistence collaborators.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct HandRecord {
    /// 1-based within the session
    pub hand_number: u32,
    /// Seat index of the button
    pub dealer: usize,
    pub starting_stacks: Vec<StackEntry>,
    /// Chronological list of all applied actions
    pub actions: Vec<ActionRecord>,
    /// Community cards (up to 5)
    pub board: Vec<Card>,
    /// Pot size awarded at the end of the hand
    pub pot: u32,
    pub payouts: Vec<Payout>,
    pub final_stacks: Vec<StackEntry>,
    pub folded: Vec<String>,
    /// Showdown information if more than one player reached it
    #[serde(default)]
    pub showdown: Option<ShowdownInfo>,
    /// RFC3339 time the hand finished
    #[serde(default)]
    pub ts: Option<String>,
}

impl HandRecord {
    pub fn winners(&self) -> impl Iterator<Item = &str> {
        self.payouts.iter().map(|p| p.player.as_str())
    }

    pub fn won_by(&self, player: &str) -> u32 {
        self.payouts
            .iter()
            .filter(|p| p.player == player)
            .map(|p| p.amount)
            .sum()
    }

    /// Fills in `ts` with the current time unless already set.
    pub fn stamp(&mut self) {
        if self.ts.is_none() {
            self.ts = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));
        }
    }
}
