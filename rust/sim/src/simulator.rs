//! Simulation orchestrator.
//!
//! Drives seated [`Agent`]s through hands on a [`Table`], one decision at a
//! time, and rolls hands up into sessions and sessions into a benchmark.
//! Everything is sequential; the only await points are agent decisions and
//! recorder calls.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{SecondsFormat, Utc};
use pokerbench_ai::Agent;
use pokerbench_engine::cards::Card;
use pokerbench_engine::errors::GameError;
use pokerbench_engine::logger::{ForcedFold, HandLog, HandRecord, Street};
use pokerbench_engine::player::PlayerAction;
use pokerbench_engine::rules::sanitize_raise;
use pokerbench_engine::table::{GameStateView, MAX_SEATS, StreetAdvance, Table};
use tokio::time::{Instant, timeout};
use tracing::{debug, error, info, warn};

use crate::config::SimConfig;
use crate::error::SimError;
use crate::recorder::{HandKey, HandRecorder, NoopRecorder, SessionKey};
use crate::stats::{BenchmarkResult, EndReason, Ledger, SessionResult};

/// Cooperative cancellation shared between a [`Simulator`] and its caller.
///
/// Checked before every hand and before every decision. A hand interrupted
/// mid-way is abandoned and its pot refunded.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What [`Simulator::play_hand`] produced.
#[derive(Debug, Clone, PartialEq)]
pub enum HandOutcome {
    Completed(Box<HandRecord>),
    /// Cancelled before the hand finished; contributions were refunded
    Abandoned,
}

pub struct Simulator {
    agents: Vec<Arc<dyn Agent>>,
    names: Vec<String>,
    config: SimConfig,
    base_seed: u64,
    recorder: Arc<dyn HandRecorder>,
    cancel: CancelToken,
}

impl Simulator {
    /// Seats `agents` in the given order. Names must be unique and at most
    /// [`MAX_SEATS`] agents fit.
    pub fn new(agents: Vec<Arc<dyn Agent>>, config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;
        if agents.len() < 2 {
            return Err(SimError::NotEnoughAgents(agents.len()));
        }
        if agents.len() > MAX_SEATS {
            return Err(SimError::TooManyAgents(agents.len()));
        }
        let mut seen = HashSet::new();
        for agent in &agents {
            if !seen.insert(agent.name()) {
                return Err(SimError::DuplicateAgent(agent.name().to_string()));
            }
        }
        let names = agents.iter().map(|a| a.name().to_string()).collect();
        let base_seed = config.seed.unwrap_or_else(rand::random);
        Ok(Self {
            agents,
            names,
            config,
            base_seed,
            recorder: Arc::new(NoopRecorder),
            cancel: CancelToken::new(),
        })
    }

    pub fn with_recorder(mut self, recorder: Arc<dyn HandRecorder>) -> Self {
        self.recorder = recorder;
        self
    }

    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Seed used for session `n` (1-based).
    pub fn session_seed(&self, session_number: u32) -> u64 {
        self.base_seed.wrapping_add(u64::from(session_number))
    }

    /// Fresh table seating every agent with the configured starting stack.
    pub fn new_table(&self, seed: u64) -> Result<Table, SimError> {
        Ok(Table::new(
            self.names.iter().cloned(),
            self.config.starting_chips,
            self.config.blinds(),
            seed,
        )?)
    }

    /// Plays one hand to completion (or abandonment) and moves the button.
    pub async fn play_hand(
        &self,
        table: &mut Table,
        session: Option<SessionKey>,
        hand_number: u32,
    ) -> Result<HandOutcome, SimError> {
        let starting_stacks = table.stacks();
        table.start_hand()?;
        let dealer = table.dealer();
        info!(hand = hand_number, dealer, pot = table.pot(), "hand started");

        let hand_key = match session {
            Some(s) => self
                .recorder
                .begin_hand(s, hand_number, dealer, &table.dealt_hands(), &starting_stacks)
                .await
                .inspect_err(|e| warn!(hand = hand_number, error = %e, "recorder failed to begin hand"))
                .ok(),
            None => None,
        };

        let mut log = HandLog::new();
        let mut settled = None;
        for street in Street::ALL {
            if table.is_hand_over() {
                break;
            }
            if street != Street::Preflop {
                match table.advance_street()? {
                    StreetAdvance::Dealt { street, cards } => {
                        debug!(hand = hand_number, %street, cards = %format_cards(&cards), "street dealt");
                    }
                    StreetAdvance::Showdown(payouts) => {
                        settled = Some(payouts);
                        break;
                    }
                }
            }
            while let Some(seat) = table.next_to_act() {
                if self.cancel.is_cancelled() {
                    table.abandon_hand()?;
                    table.check_conservation()?;
                    info!(hand = hand_number, "hand abandoned, contributions refunded");
                    return Ok(HandOutcome::Abandoned);
                }
                self.take_turn(table, seat, street, &mut log, hand_key).await?;
            }
        }

        let payouts = match settled {
            Some(payouts) => payouts,
            None => table.resolve_showdown()?,
        };
        table.check_conservation()?;
        let pot = payouts.iter().map(|p| p.amount).sum();

        let mut record = HandRecord {
            hand_number,
            dealer,
            starting_stacks,
            actions: log.into_actions(),
            board: table.board().to_vec(),
            pot,
            payouts,
            final_stacks: table.stacks(),
            folded: table.folded_players(),
            showdown: table.last_showdown().cloned(),
            ts: None,
        };
        record.stamp();
        for p in &record.payouts {
            info!(hand = hand_number, player = %p.player, amount = p.amount, "pot awarded");
        }

        if let Some(key) = hand_key
            && let Err(e) = self.recorder.complete_hand(key, &record).await
        {
            warn!(hand = hand_number, error = %e, "recorder failed to complete hand");
        }

        table.advance_dealer()?;
        Ok(HandOutcome::Completed(Box::new(record)))
    }

    async fn take_turn(
        &self,
        table: &mut Table,
        seat: usize,
        street: Street,
        log: &mut HandLog,
        hand_key: Option<HandKey>,
    ) -> Result<(), SimError> {
        let view = table.view_for(seat).ok_or(GameError::NotInHand { seat })?;
        let hole = table.hole_cards(seat).ok_or(GameError::NotInHand { seat })?;
        let name = self.names[seat].as_str();

        let (requested, mut forced) = match self.ask(seat, &view, hole).await {
            Ok(action) => (coerce(action, &view), None),
            Err(reason) => (PlayerAction::Fold, Some(reason)),
        };

        let (action, outcome) = match table.apply_action(seat, requested) {
            Ok(outcome) => (requested, outcome),
            Err(e) if !e.is_fatal() => {
                warn!(player = name, %street, action = ?requested, error = %e, "illegal action, folding");
                forced = Some(ForcedFold::IllegalAction);
                (PlayerAction::Fold, table.apply_action(seat, PlayerAction::Fold)?)
            }
            Err(e) => return Err(e.into()),
        };
        table.check_conservation()?;

        let record = log.record(name, seat, street, action, &outcome, forced);
        debug!(
            player = name,
            %street,
            action = %action.kind(),
            chips = outcome.chips,
            pot = outcome.pot_after,
            "action applied"
        );
        if let Some(key) = hand_key
            && let Err(e) = self.recorder.record_action(key, record).await
        {
            warn!(player = name, error = %e, "recorder failed to store action");
        }
        Ok(())
    }

    /// Runs one agent decision on its own task under the configured deadline.
    async fn ask(
        &self,
        seat: usize,
        view: &GameStateView,
        hole: [Card; 2],
    ) -> Result<PlayerAction, ForcedFold> {
        let agent = Arc::clone(&self.agents[seat]);
        let deadline = self.config.agent_deadline();
        let view = view.clone();
        let mut task = tokio::spawn(async move { agent.decide(&view, hole, deadline).await });

        match timeout(deadline, &mut task).await {
            Ok(Ok(Ok(action))) => Ok(action),
            Ok(Ok(Err(e))) => {
                warn!(player = %self.names[seat], error = %e, "agent failed, forcing fold");
                Err(ForcedFold::AgentError)
            }
            Ok(Err(join)) => {
                warn!(player = %self.names[seat], error = %join, "agent panicked, forcing fold");
                Err(ForcedFold::AgentPanic)
            }
            Err(_) => {
                task.abort();
                warn!(
                    player = %self.names[seat],
                    deadline_secs = deadline.as_secs(),
                    "agent missed its deadline, forcing fold"
                );
                Err(ForcedFold::Timeout)
            }
        }
    }

    /// Plays hands until the hand limit, the time budget, a lone funded
    /// player or cancellation. The ledger goes in and comes back out updated.
    pub async fn run_session(
        &self,
        session_number: u32,
        mut ledger: Ledger,
    ) -> Result<(SessionResult, Ledger), SimError> {
        let seed = self.session_seed(session_number);
        let mut table = self.new_table(seed)?;
        let name = format!("session-{session_number}");
        let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        let started = Instant::now();
        let budget = self.config.session_budget();

        let session_key = self
            .recorder
            .begin_session(&name, &self.config)
            .await
            .inspect_err(|e| warn!(session = session_number, error = %e, "recorder failed to begin session"))
            .ok();
        ledger.start_session();
        info!(session = session_number, seed, players = self.names.len(), "session started");

        let mut hands = Vec::new();
        let mut hands_played = 0u32;
        let end_reason = loop {
            if self.cancel.is_cancelled() {
                break EndReason::Cancelled;
            }
            if hands_played >= self.config.max_hands {
                break EndReason::HandLimit;
            }
            if started.elapsed() >= budget {
                break EndReason::TimeLimit;
            }
            if table.funded_count() < 2 {
                break if hands_played == 0 {
                    EndReason::NotEnoughPlayers
                } else {
                    EndReason::OnePlayerLeft
                };
            }
            match self.play_hand(&mut table, session_key, hands_played + 1).await {
                Ok(HandOutcome::Completed(record)) => {
                    ledger.record_hand(&record);
                    hands_played += 1;
                    hands.push(*record);
                }
                Ok(HandOutcome::Abandoned) => break EndReason::Cancelled,
                Err(e) => {
                    error!(session = session_number, hand = hands_played + 1, error = %e, "session aborted");
                    return Err(e);
                }
            }
        };

        if let Some(key) = session_key
            && let Err(e) = self.recorder.complete_session(key, hands_played).await
        {
            warn!(session = session_number, error = %e, "recorder failed to complete session");
        }
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(session = session_number, hands = hands_played, reason = ?end_reason, elapsed_ms, "session finished");

        let result = SessionResult {
            session_number,
            seed,
            hands_played,
            end_reason,
            final_chips: table.stacks(),
            counters: ledger.entries().to_vec(),
            started_at,
            elapsed_ms,
            hands,
        };
        Ok((result, ledger))
    }

    /// Runs the configured number of sessions, each on a fresh table, and
    /// aggregates the results.
    pub async fn run_benchmark(&self) -> Result<BenchmarkResult, SimError> {
        let mut ledger = Ledger::new(self.names.iter().cloned());
        let mut sessions = Vec::new();
        info!(sessions = self.config.sessions, base_seed = self.base_seed, "benchmark started");

        for n in 1..=self.config.sessions {
            if self.cancel.is_cancelled() {
                break;
            }
            let (result, back) = self.run_session(n, ledger).await?;
            ledger = back;
            let stop = result.end_reason == EndReason::Cancelled;
            sessions.push(result);
            if stop {
                break;
            }
        }

        let result = BenchmarkResult::aggregate(&self.names, self.config.starting_chips, sessions, &ledger);
        info!(
            sessions = result.total_sessions,
            hands = result.total_hands,
            winner = result.overall_winner.as_deref().unwrap_or("-"),
            "benchmark finished"
        );
        Ok(result)
    }
}

/// Raise requests are coerced before they reach the table; every other
/// action passes through untouched.
fn coerce(action: PlayerAction, view: &GameStateView) -> PlayerAction {
    match action {
        PlayerAction::Raise(amount) => {
            PlayerAction::Raise(sanitize_raise(amount, view.current_bet, view.my_chips()))
        }
        other => other,
    }
}

fn format_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
