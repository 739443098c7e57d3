//! Betting engine: the table state machine.
//!
//! A [`Table`] owns every piece of mutable hand state (stacks, pot, street
//! contributions, board, deck, button) and moves through
//! `PreflopOpen -> FlopOpen -> TurnOpen -> RiverOpen -> Showdown -> HandComplete`.
//! Every mutating call either completes fully or returns an error before
//! touching any stack, so `stacks + pot` always equals the chips the table was
//! created with.
//!
//! Side pots are not split: all contributions go into one main pot that the
//! best hand(s) among the non-folded players take at showdown.

use std::collections::HashSet;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::hand::{best_hand, HandEvaluation};
use crate::logger::{ShowdownInfo, ShownHand, StackEntry, Street};
use crate::player::{Player, PlayerAction};
use crate::rules::{validate_action, Blinds, ValidatedAction};

/// Most seats a single deck can serve: two hole cards each plus a five-card board.
pub const MAX_SEATS: usize = (52 - 5) / 2;

/// Where the current hand stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    PreflopOpen,
    FlopOpen,
    TurnOpen,
    RiverOpen,
    Showdown,
    /// No hand in progress (also the state of a fresh table)
    HandComplete,
}

impl Phase {
    /// Betting street for the open phases.
    pub fn street(self) -> Option<Street> {
        match self {
            Phase::PreflopOpen => Some(Street::Preflop),
            Phase::FlopOpen => Some(Street::Flop),
            Phase::TurnOpen => Some(Street::Turn),
            Phase::RiverOpen => Some(Street::River),
            Phase::Showdown | Phase::HandComplete => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Chips awarded to one player when a hand ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    pub seat: usize,
    pub player: String,
    pub amount: u32,
}

/// What an accepted action did to the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub seat: usize,
    /// Chips moved from the player's stack into the pot
    pub chips: u32,
    pub pot_after: u32,
    /// The action lifted the bet to match
    pub reopened: bool,
    pub all_in: bool,
}

/// Result of [`Table::advance_street`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreetAdvance {
    Dealt { street: Street, cards: Vec<Card> },
    Showdown(Vec<Payout>),
}

/// Read-only snapshot handed to a decision maker.
///
/// Built by [`Table::view_for`]; it carries the viewer's own hole cards and
/// nobody else's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStateView {
    /// Player the view was built for (`None` for a spectator snapshot)
    pub viewer: Option<String>,
    pub hole_cards: Option<[Card; 2]>,
    pub community_cards: Vec<Card>,
    pub pot: u32,
    pub current_bet: u32,
    /// Viewer's contribution this street
    pub contribution: u32,
    /// Chips the viewer needs to put in to call
    pub to_call: u32,
    pub chips: Vec<StackEntry>,
    /// Non-folded players in the hand, seat order
    pub active_players: Vec<String>,
    pub street: Street,
    pub to_act: Option<String>,
    pub blinds: Blinds,
}

impl GameStateView {
    pub fn chips_of(&self, player: &str) -> Option<u32> {
        self.chips
            .iter()
            .find(|e| e.player == player)
            .map(|e| e.chips)
    }

    /// The viewer's own stack.
    pub fn my_chips(&self) -> u32 {
        self.viewer
            .as_deref()
            .and_then(|v| self.chips_of(v))
            .unwrap_or(0)
    }
}

/// Table state for one game: roster, stacks, pot and the hand in progress.
///
/// # Examples
///
/// ```
/// use pokerbench_engine::player::PlayerAction;
/// use pokerbench_engine::rules::Blinds;
/// use pokerbench_engine::table::Table;
///
/// let mut table = Table::new(["alice", "bob"], 100, Blinds::new(5, 10), 42).unwrap();
/// let view = table.start_hand().unwrap();
/// assert_eq!(view.pot, 15);
///
/// let seat = table.next_to_act().unwrap();
/// table.apply_action(seat, PlayerAction::Fold).unwrap();
/// assert!(table.is_hand_over());
///
/// let payouts = table.resolve_showdown().unwrap();
/// assert_eq!(payouts[0].amount, 15);
/// table.check_conservation().unwrap();
/// ```
#[derive(Debug)]
pub struct Table {
    players: Vec<Player>,
    blinds: Blinds,
    pot: u32,
    /// Highest street contribution so far
    current_bet: u32,
    dealer: usize,
    board: Vec<Card>,
    deck: Option<Deck>,
    phase: Phase,
    /// Seat the turn-order scan starts from
    cursor: usize,
    chips_in_play: u64,
    rng: ChaCha20Rng,
    last_showdown: Option<ShowdownInfo>,
}

impl Table {
    pub fn new<I, S>(names: I, starting_stack: u32, blinds: Blinds, seed: u64) -> Result<Self, GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let stacks = names
            .into_iter()
            .map(|n| (n.into(), starting_stack))
            .collect();
        Self::with_stacks(stacks, blinds, seed)
    }

    /// Table with individual starting stacks, seated in the given order.
    pub fn with_stacks(stacks: Vec<(String, u32)>, blinds: Blinds, seed: u64) -> Result<Self, GameError> {
        if stacks.len() < 2 {
            return Err(GameError::InvalidTable(format!(
                "need at least 2 seats, got {}",
                stacks.len()
            )));
        }
        if stacks.len() > MAX_SEATS {
            return Err(GameError::InvalidTable(format!(
                "at most {MAX_SEATS} seats fit one deck, got {}",
                stacks.len()
            )));
        }
        let mut seen = HashSet::new();
        for (name, _) in &stacks {
            if !seen.insert(name.as_str()) {
                return Err(GameError::InvalidTable(format!("duplicate player name {name}")));
            }
        }
        let chips_in_play = stacks.iter().map(|(_, s)| u64::from(*s)).sum();
        let players = stacks
            .into_iter()
            .map(|(name, stack)| Player::new(name, stack))
            .collect();
        Ok(Self {
            players,
            blinds,
            pot: 0,
            current_bet: 0,
            dealer: 0,
            board: Vec::with_capacity(5),
            deck: None,
            phase: Phase::HandComplete,
            cursor: 0,
            chips_in_play,
            rng: ChaCha20Rng::seed_from_u64(seed),
            last_showdown: None,
        })
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }
    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }
    pub fn seat_of(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name() == name)
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn current_bet(&self) -> u32 {
        self.current_bet
    }
    pub fn board(&self) -> &[Card] {
        &self.board
    }
    pub fn dealer(&self) -> usize {
        self.dealer
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn blinds(&self) -> Blinds {
        self.blinds
    }
    pub fn chips_in_play(&self) -> u64 {
        self.chips_in_play
    }
    pub fn last_showdown(&self) -> Option<&ShowdownInfo> {
        self.last_showdown.as_ref()
    }

    pub fn hand_in_progress(&self) -> bool {
        self.phase != Phase::HandComplete
    }

    /// Street implied by the board, as reported in views.
    pub fn street(&self) -> Street {
        match self.board.len() {
            0 => Street::Preflop,
            3 => Street::Flop,
            4 => Street::Turn,
            _ => Street::River,
        }
    }

    pub fn stacks(&self) -> Vec<StackEntry> {
        self.players
            .iter()
            .map(|p| StackEntry {
                player: p.name().to_string(),
                chips: p.stack(),
            })
            .collect()
    }

    pub fn folded_players(&self) -> Vec<String> {
        self.players
            .iter()
            .filter(|p| p.is_in_hand() && p.is_folded())
            .map(|p| p.name().to_string())
            .collect()
    }

    /// Players dealt in and not folded.
    pub fn live_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_live()).count()
    }

    pub fn funded_count(&self) -> usize {
        self.players.iter().filter(|p| p.stack() > 0).count()
    }

    pub fn is_hand_over(&self) -> bool {
        self.live_count() <= 1
    }

    /// Moves the button to `seat`. Only allowed between hands.
    pub fn set_dealer(&mut self, seat: usize) -> Result<(), GameError> {
        if self.hand_in_progress() {
            return Err(GameError::InvalidTable("cannot move the button mid-hand".into()));
        }
        if seat >= self.players.len() {
            return Err(GameError::InvalidTable(format!("no seat {seat}")));
        }
        self.dealer = seat;
        Ok(())
    }

    /// Deals a new hand: fresh deck, two hole cards to every funded player,
    /// blinds posted (capped at the poster's stack).
    pub fn start_hand(&mut self) -> Result<GameStateView, GameError> {
        let deck = Deck::shuffled(self.rng.random());
        self.start_hand_with_deck(deck)
    }

    /// [`Table::start_hand`] with a caller-supplied deck. Hole cards go out two
    /// at a time in seat order, then the board comes off the same deck.
    pub fn start_hand_with_deck(&mut self, mut deck: Deck) -> Result<GameStateView, GameError> {
        if self.hand_in_progress() {
            return Err(GameError::InvalidTable("a hand is already in progress".into()));
        }
        let funded = self.funded_seats();
        if funded.len() < 2 {
            return Err(GameError::NotEnoughPlayers {
                funded: funded.len(),
            });
        }
        if self.players[self.dealer].stack() == 0 {
            self.dealer = self.next_funded_after(self.dealer).unwrap_or(funded[0]);
        }

        let mut holes = Vec::with_capacity(funded.len());
        for _ in &funded {
            let a = deck.deal_card().ok_or(GameError::DeckExhausted)?;
            let b = deck.deal_card().ok_or(GameError::DeckExhausted)?;
            holes.push([a, b]);
        }

        self.board.clear();
        self.pot = 0;
        self.current_bet = 0;
        self.last_showdown = None;
        let mut holes = holes.into_iter();
        for p in &mut self.players {
            if p.stack() > 0 {
                if let Some(hole) = holes.next() {
                    p.deal_in(hole);
                }
            } else {
                p.sit_out();
            }
        }

        let n = funded.len();
        let d = funded.iter().position(|&s| s == self.dealer).unwrap_or(0);
        // heads-up: the button posts the small blind
        let (sb, bb) = if n == 2 {
            (funded[d], funded[(d + 1) % n])
        } else {
            (funded[(d + 1) % n], funded[(d + 2) % n])
        };
        self.post(sb, self.blinds.small);
        self.post(bb, self.blinds.big);
        self.current_bet = self.blinds.big;

        self.deck = Some(deck);
        self.phase = Phase::PreflopOpen;
        self.cursor = (bb + 1) % self.players.len();
        Ok(self.build_view(None))
    }

    fn post(&mut self, seat: usize, blind: u32) {
        let moved = self.players[seat].commit(blind);
        self.pot += moved;
    }

    /// Applies one action for `seat`.
    ///
    /// Rejections (folded player, player not dealt in, check while owing,
    /// betting closed) leave the table untouched.
    pub fn apply_action(&mut self, seat: usize, action: PlayerAction) -> Result<ActionOutcome, GameError> {
        if self.phase.street().is_none() {
            return Err(GameError::BettingClosed {
                phase: self.phase.to_string(),
            });
        }
        if self.live_count() <= 1 {
            return Err(GameError::BettingClosed {
                phase: self.phase.to_string(),
            });
        }
        let current_bet = self.current_bet;
        let player = self
            .players
            .get_mut(seat)
            .filter(|p| p.is_in_hand())
            .ok_or(GameError::NotInHand { seat })?;
        if player.is_folded() {
            return Err(GameError::PlayerFolded { seat });
        }
        let validated = validate_action(
            player.stack(),
            player.street_contribution(),
            current_bet,
            action,
        )?;

        let chips = match validated {
            ValidatedAction::Fold => {
                player.fold();
                0
            }
            ValidatedAction::Check => 0,
            other => player.commit(other.chips()),
        };
        player.mark_acted();
        let contribution = player.street_contribution();
        let all_in = player.is_all_in();

        self.pot += chips;
        let reopened = contribution > current_bet;
        if reopened {
            self.current_bet = contribution;
        }
        self.cursor = (seat + 1) % self.players.len();
        Ok(ActionOutcome {
            seat,
            chips,
            pot_after: self.pot,
            reopened,
            all_in,
        })
    }

    /// True if `seat` still owes a decision this street.
    ///
    /// A player needs to act when they have chips behind and either nobody
    /// has bet and they have not acted yet, or their contribution is below
    /// the bet to match. A raise therefore reopens the round for everyone
    /// who has not matched it.
    pub fn needs_to_act(&self, seat: usize) -> bool {
        let Some(p) = self.players.get(seat) else {
            return false;
        };
        p.is_live()
            && p.stack() > 0
            && ((self.current_bet == 0 && !p.has_acted())
                || p.street_contribution() < self.current_bet)
    }

    /// Next seat to act, scanning clockwise from the seat after the last actor.
    /// `None` once the betting round is complete.
    pub fn next_to_act(&self) -> Option<usize> {
        if self.phase.street().is_none() || self.is_hand_over() {
            return None;
        }
        let n = self.players.len();
        (0..n)
            .map(|i| (self.cursor + i) % n)
            .find(|&seat| self.needs_to_act(seat))
    }

    pub fn is_round_complete(&self) -> bool {
        self.next_to_act().is_none()
    }

    /// Closes the current street and reveals the next one (3 cards for the
    /// flop, 1 for turn and river). With five cards already showing this
    /// resolves the showdown instead.
    pub fn advance_street(&mut self) -> Result<StreetAdvance, GameError> {
        if self.phase.street().is_none() {
            return Err(GameError::NoHandInProgress);
        }
        if self.board.len() >= 5 {
            self.reset_street();
            return self.resolve_showdown().map(StreetAdvance::Showdown);
        }
        let count = if self.board.is_empty() { 3 } else { 1 };
        let deck = self.deck.as_mut().ok_or(GameError::NoHandInProgress)?;
        if deck.remaining() < count {
            return Err(GameError::DeckExhausted);
        }
        let cards = deck.draw_n(count);
        self.reset_street();
        self.board.extend_from_slice(&cards);
        self.phase = match self.board.len() {
            3 => Phase::FlopOpen,
            4 => Phase::TurnOpen,
            _ => Phase::RiverOpen,
        };
        self.cursor = (self.dealer + 1) % self.players.len();
        Ok(StreetAdvance::Dealt {
            street: self.street(),
            cards,
        })
    }

    fn reset_street(&mut self) {
        for p in &mut self.players {
            p.reset_street();
        }
        self.current_bet = 0;
    }

    /// Awards the pot and ends the hand.
    ///
    /// A lone non-folded player takes everything without a showdown.
    /// Otherwise every player tied for the best hand gets `pot / winners`;
    /// the odd chips go to the first winner clockwise from the button.
    pub fn resolve_showdown(&mut self) -> Result<Vec<Payout>, GameError> {
        if !self.hand_in_progress() {
            return Err(GameError::NoHandInProgress);
        }
        self.phase = Phase::Showdown;
        let n = self.players.len();
        let live: Vec<usize> = (1..=n)
            .map(|i| (self.dealer + i) % n)
            .filter(|&s| self.players[s].is_live())
            .collect();

        let pot = self.pot;
        let winners: Vec<usize> = if live.len() <= 1 {
            self.last_showdown = None;
            live
        } else {
            let evaluated: Vec<(usize, [Card; 2], HandEvaluation)> = live
                .iter()
                .filter_map(|&s| {
                    let hole = self.players[s].hole_cards()?;
                    Some((s, hole, best_hand(&hole, &self.board)))
                })
                .collect();
            let best = evaluated.iter().map(|(_, _, e)| e).max().cloned();
            let winners: Vec<usize> = evaluated
                .iter()
                .filter(|(_, _, e)| Some(e) == best.as_ref())
                .map(|(s, _, _)| *s)
                .collect();
            self.last_showdown = Some(self.showdown_info(&evaluated, &winners));
            winners
        };

        let mut payouts = Vec::with_capacity(winners.len());
        if !winners.is_empty() {
            let share = pot / winners.len() as u32;
            let odd = pot % winners.len() as u32;
            for (i, &seat) in winners.iter().enumerate() {
                let amount = if i == 0 { share + odd } else { share };
                self.players[seat].add_chips(amount);
                payouts.push(Payout {
                    seat,
                    player: self.players[seat].name().to_string(),
                    amount,
                });
            }
            self.pot = 0;
        }
        self.finish_hand();
        Ok(payouts)
    }

    fn showdown_info(
        &self,
        evaluated: &[(usize, [Card; 2], HandEvaluation)],
        winners: &[usize],
    ) -> ShowdownInfo {
        let hands = evaluated
            .iter()
            .map(|(s, hole, e)| ShownHand {
                player: self.players[*s].name().to_string(),
                hole: *hole,
                evaluation: e.clone(),
            })
            .collect();
        let best = evaluated
            .iter()
            .find(|(s, _, _)| winners.contains(s))
            .map(|(_, _, e)| e.category.name());
        let notes = match (winners.len(), best) {
            (0, _) | (_, None) => None,
            (1, Some(name)) => Some(name.to_string()),
            (_, Some(name)) => Some(format!("split pot, {name}")),
        };
        ShowdownInfo {
            winners: winners
                .iter()
                .map(|&s| self.players[s].name().to_string())
                .collect(),
            hands,
            notes,
        }
    }

    /// Abandons the hand in progress and returns every player's contribution.
    pub fn abandon_hand(&mut self) -> Result<(), GameError> {
        if !self.hand_in_progress() {
            return Err(GameError::NoHandInProgress);
        }
        for p in &mut self.players {
            let refund = p.hand_contribution();
            p.add_chips(refund);
            self.pot -= refund.min(self.pot);
        }
        self.last_showdown = None;
        self.finish_hand();
        Ok(())
    }

    fn finish_hand(&mut self) {
        self.current_bet = 0;
        self.deck = None;
        self.phase = Phase::HandComplete;
    }

    /// Moves the button to the next seat with chips. Busted players are
    /// skipped and sit out every future hand.
    pub fn advance_dealer(&mut self) -> Result<usize, GameError> {
        if self.hand_in_progress() {
            return Err(GameError::InvalidTable("cannot move the button mid-hand".into()));
        }
        for p in &mut self.players {
            if p.stack() == 0 {
                p.sit_out();
            }
        }
        if let Some(next) = self.next_funded_after(self.dealer) {
            self.dealer = next;
        }
        Ok(self.dealer)
    }

    fn funded_seats(&self) -> Vec<usize> {
        (0..self.players.len())
            .filter(|&s| self.players[s].stack() > 0)
            .collect()
    }

    fn next_funded_after(&self, seat: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n)
            .map(|i| (seat + i) % n)
            .find(|&s| self.players[s].stack() > 0)
    }

    /// Verifies `stacks + pot` still equals the chips the table started with.
    pub fn check_conservation(&self) -> Result<(), GameError> {
        let actual: u64 = self
            .players
            .iter()
            .map(|p| u64::from(p.stack()))
            .sum::<u64>()
            + u64::from(self.pot);
        if actual != self.chips_in_play {
            return Err(GameError::ChipConservation {
                expected: self.chips_in_play,
                actual,
            });
        }
        Ok(())
    }

    /// Snapshot scoped to `seat`: only that player's hole cards are included.
    pub fn view_for(&self, seat: usize) -> Option<GameStateView> {
        self.players.get(seat)?;
        Some(self.build_view(Some(seat)))
    }

    /// Snapshot without any hole cards.
    pub fn public_view(&self) -> GameStateView {
        self.build_view(None)
    }

    fn build_view(&self, viewer: Option<usize>) -> GameStateView {
        let me = viewer.and_then(|s| self.players.get(s));
        let contribution = me.map(|p| p.street_contribution()).unwrap_or(0);
        GameStateView {
            viewer: me.map(|p| p.name().to_string()),
            hole_cards: me.and_then(|p| p.hole_cards()),
            community_cards: self.board.clone(),
            pot: self.pot,
            current_bet: self.current_bet,
            contribution,
            to_call: self.current_bet.saturating_sub(contribution),
            chips: self.stacks(),
            active_players: self
                .players
                .iter()
                .filter(|p| p.is_live())
                .map(|p| p.name().to_string())
                .collect(),
            street: self.street(),
            to_act: self
                .next_to_act()
                .map(|s| self.players[s].name().to_string()),
            blinds: self.blinds,
        }
    }

    /// Hole cards dealt to `seat` for the hand in progress.
    pub fn hole_cards(&self, seat: usize) -> Option<[Card; 2]> {
        self.players.get(seat).and_then(|p| p.hole_cards())
    }

    /// Every dealt-in player's hole cards, seat order.
    pub fn dealt_hands(&self) -> Vec<(String, [Card; 2])> {
        self.players
            .iter()
            .filter(|p| p.is_in_hand())
            .filter_map(|p| Some((p.name().to_string(), p.hole_cards()?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heads_up() -> Table {
        Table::new(["a", "b"], 100, Blinds::new(5, 10), 1).unwrap()
    }

    #[test]
    fn rejects_tiny_or_duplicate_rosters() {
        assert!(Table::new(["solo"], 100, Blinds::default(), 1).is_err());
        assert!(Table::new(["x", "x"], 100, Blinds::default(), 1).is_err());
    }

    #[test]
    fn rejects_more_seats_than_one_deck_serves() {
        let names = |n: usize| (0..n).map(|i| format!("p{i}")).collect::<Vec<_>>();
        assert_eq!(MAX_SEATS, 23);
        assert!(Table::new(names(23), 100, Blinds::default(), 1).is_ok());
        assert!(matches!(
            Table::new(names(24), 100, Blinds::default(), 1),
            Err(GameError::InvalidTable(_))
        ));
    }

    #[test]
    fn full_table_reaches_showdown_on_one_deck() {
        let names = (0..MAX_SEATS).map(|i| format!("p{i}")).collect::<Vec<_>>();
        let mut t = Table::new(names, 100, Blinds::new(5, 10), 3).unwrap();
        t.start_hand().unwrap();
        loop {
            while let Some(seat) = t.next_to_act() {
                t.apply_action(seat, PlayerAction::Call).unwrap();
            }
            if let StreetAdvance::Showdown(_) = t.advance_street().unwrap() {
                break;
            }
        }
        assert_eq!(t.board().len(), 5);
        assert!(!t.hand_in_progress());
        t.check_conservation().unwrap();
    }

    #[test]
    fn short_deck_leaves_the_street_untouched() {
        let mut t = heads_up();
        // four hole cards and a flop, nothing left for the turn
        let deck = Deck::stacked(crate::cards::full_deck().into_iter().take(7).collect());
        t.start_hand_with_deck(deck).unwrap();
        while let Some(seat) = t.next_to_act() {
            t.apply_action(seat, PlayerAction::Call).unwrap();
        }
        t.advance_street().unwrap();
        let seat = t.next_to_act().unwrap();
        t.apply_action(seat, PlayerAction::Raise(20)).unwrap();

        assert_eq!(t.advance_street(), Err(GameError::DeckExhausted));
        assert_eq!(t.board().len(), 3);
        assert_eq!(t.current_bet(), 20);
        assert_eq!(t.player(seat).unwrap().street_contribution(), 20);
        assert_eq!(t.phase(), Phase::FlopOpen);
        t.check_conservation().unwrap();
    }

    #[test]
    fn preflop_action_starts_left_of_big_blind() {
        let mut t = Table::new(["a", "b", "c", "d"], 100, Blinds::new(5, 10), 3).unwrap();
        t.start_hand().unwrap();
        // dealer 0, sb 1, bb 2
        assert_eq!(t.player(1).unwrap().street_contribution(), 5);
        assert_eq!(t.player(2).unwrap().street_contribution(), 10);
        assert_eq!(t.next_to_act(), Some(3));
    }

    #[test]
    fn postflop_action_starts_left_of_button() {
        let mut t = Table::new(["a", "b", "c"], 100, Blinds::new(5, 10), 3).unwrap();
        t.start_hand().unwrap();
        while let Some(seat) = t.next_to_act() {
            t.apply_action(seat, PlayerAction::Call).unwrap();
        }
        t.advance_street().unwrap();
        assert_eq!(t.next_to_act(), Some(1));
    }

    #[test]
    fn fold_is_rejected_once_one_player_remains() {
        let mut t = heads_up();
        t.start_hand().unwrap();
        let seat = t.next_to_act().unwrap();
        t.apply_action(seat, PlayerAction::Fold).unwrap();
        let other = 1 - seat;
        assert!(matches!(
            t.apply_action(other, PlayerAction::Fold),
            Err(GameError::BettingClosed { .. })
        ));
    }

    #[test]
    fn folded_player_cannot_act_again() {
        let mut t = Table::new(["a", "b", "c"], 100, Blinds::new(5, 10), 9).unwrap();
        t.start_hand().unwrap();
        t.apply_action(0, PlayerAction::Fold).unwrap();
        assert_eq!(
            t.apply_action(0, PlayerAction::Call),
            Err(GameError::PlayerFolded { seat: 0 })
        );
        assert!(!t.needs_to_act(0));
    }

    #[test]
    fn abandon_refunds_contributions() {
        let mut t = heads_up();
        t.start_hand().unwrap();
        let seat = t.next_to_act().unwrap();
        t.apply_action(seat, PlayerAction::Raise(30)).unwrap();
        t.abandon_hand().unwrap();
        assert_eq!(t.pot(), 0);
        assert!(t.players().iter().all(|p| p.stack() == 100));
        t.check_conservation().unwrap();
    }

    #[test]
    fn view_hides_other_hole_cards() {
        let mut t = heads_up();
        let public = t.start_hand().unwrap();
        assert_eq!(public.hole_cards, None);
        let v0 = t.view_for(0).unwrap();
        assert_eq!(v0.hole_cards, t.hole_cards(0));
        assert_ne!(v0.hole_cards, t.hole_cards(1));
        assert_eq!(v0.viewer.as_deref(), Some("a"));
    }

    #[test]
    fn start_hand_needs_two_funded_players() {
        let mut t = Table::with_stacks(
            vec![("a".into(), 100), ("b".into(), 0), ("c".into(), 0)],
            Blinds::default(),
            1,
        )
        .unwrap();
        assert_eq!(
            t.start_hand().unwrap_err(),
            GameError::NotEnoughPlayers { funded: 1 }
        );
    }
}
