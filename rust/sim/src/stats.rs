//! Per-agent counters and session/benchmark aggregates.

use pokerbench_engine::logger::{HandRecord, StackEntry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentCounters {
    /// Hands the agent was dealt into
    pub hands_played: u32,
    /// Hands where the agent took at least part of the pot
    pub hands_won: u32,
    /// Sum of pots (or pot shares) collected
    pub chips_won: u64,
    pub forced_folds: u32,
}

impl AgentCounters {
    fn add(&mut self, other: &AgentCounters) {
        self.hands_played += other.hands_played;
        self.hands_won += other.hands_won;
        self.chips_won += other.chips_won;
        self.forced_folds += other.forced_folds;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub player: String,
    /// Reset at the start of every session
    pub session: AgentCounters,
    pub lifetime: AgentCounters,
}

/// Counters for every seated agent, in seat order.
///
/// Owned by the run, not by the agents: sessions take the ledger by value
/// and hand it back, so two benchmarks never share counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<LedgerEntry>,
}

impl Ledger {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: names
                .into_iter()
                .map(|n| LedgerEntry {
                    player: n.into(),
                    session: AgentCounters::default(),
                    lifetime: AgentCounters::default(),
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn get(&self, player: &str) -> Option<&LedgerEntry> {
        self.entries.iter().find(|e| e.player == player)
    }

    pub fn start_session(&mut self) {
        for e in &mut self.entries {
            e.session = AgentCounters::default();
        }
    }

    pub fn record_hand(&mut self, record: &HandRecord) {
        for e in &mut self.entries {
            let dealt = record
                .starting_stacks
                .iter()
                .any(|s| s.player == e.player && s.chips > 0);
            if !dealt {
                continue;
            }
            let won = record.won_by(&e.player);
            let forced_folds = record
                .actions
                .iter()
                .filter(|a| a.player == e.player && a.forced.is_some())
                .count() as u32;
            let delta = AgentCounters {
                hands_played: 1,
                hands_won: u32::from(won > 0),
                chips_won: u64::from(won),
                forced_folds,
            };
            e.session.add(&delta);
            e.lifetime.add(&delta);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    HandLimit,
    TimeLimit,
    OnePlayerLeft,
    Cancelled,
    /// Fewer than two players had chips before the first hand
    NotEnoughPlayers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionResult {
    /// 1-based within the benchmark
    pub session_number: u32,
    pub seed: u64,
    pub hands_played: u32,
    pub end_reason: EndReason,
    pub final_chips: Vec<StackEntry>,
    /// Ledger snapshot at the end of the session
    pub counters: Vec<LedgerEntry>,
    /// RFC3339
    pub started_at: String,
    pub elapsed_ms: u64,
    pub hands: Vec<HandRecord>,
}

impl SessionResult {
    pub fn chips_of(&self, player: &str) -> u32 {
        self.final_chips
            .iter()
            .find(|e| e.player == player)
            .map(|e| e.chips)
            .unwrap_or(0)
    }

    /// The player with strictly the most chips; `None` on a tie for first.
    pub fn winner(&self) -> Option<&str> {
        let best = self.final_chips.iter().map(|e| e.chips).max()?;
        let mut leaders = self.final_chips.iter().filter(|e| e.chips == best);
        let first = leaders.next()?;
        match leaders.next() {
            Some(_) => None,
            None => Some(first.player.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub player: String,
    /// Final chips summed over sessions
    pub total_chips: u64,
    pub average_chips: f64,
    pub sessions_won: u32,
    pub win_rate: f64,
    /// `total_chips - starting_chips * sessions`
    pub total_profit: i64,
    /// `total_profit / (starting_chips * sessions)`
    pub roi: f64,
    pub lifetime: AgentCounters,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    pub total_sessions: u32,
    pub total_hands: u32,
    pub players: Vec<PlayerSummary>,
    /// Most total chips; first in seat order on a tie
    pub overall_winner: Option<String>,
    pub sessions: Vec<SessionResult>,
}

impl BenchmarkResult {
    pub fn aggregate(
        names: &[String],
        starting_chips: u32,
        sessions: Vec<SessionResult>,
        ledger: &Ledger,
    ) -> Self {
        let n = sessions.len() as u32;
        let stake = u64::from(starting_chips) * u64::from(n);

        let players: Vec<PlayerSummary> = names
            .iter()
            .map(|name| {
                let total_chips: u64 = sessions.iter().map(|s| u64::from(s.chips_of(name))).sum();
                let sessions_won = sessions
                    .iter()
                    .filter(|s| s.winner() == Some(name.as_str()))
                    .count() as u32;
                let total_profit = total_chips as i64 - stake as i64;
                PlayerSummary {
                    player: name.clone(),
                    total_chips,
                    average_chips: ratio(total_chips as f64, f64::from(n)),
                    sessions_won,
                    win_rate: ratio(f64::from(sessions_won), f64::from(n)),
                    total_profit,
                    roi: ratio(total_profit as f64, stake as f64),
                    lifetime: ledger.get(name).map(|e| e.lifetime).unwrap_or_default(),
                }
            })
            .collect();

        let mut overall_winner: Option<&PlayerSummary> = None;
        if n > 0 {
            for p in &players {
                if overall_winner.is_none_or(|best| p.total_chips > best.total_chips) {
                    overall_winner = Some(p);
                }
            }
        }

        Self {
            total_sessions: n,
            total_hands: sessions.iter().map(|s| s.hands_played).sum(),
            overall_winner: overall_winner.map(|p| p.player.clone()),
            players,
            sessions,
        }
    }

    pub fn player(&self, name: &str) -> Option<&PlayerSummary> {
        self.players.iter().find(|p| p.player == name)
    }
}

fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 { 0.0 } else { num / den }
}
