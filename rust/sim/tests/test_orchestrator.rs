use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pokerbench_ai::{Agent, AgentError, create_agent};
use pokerbench_engine::cards::Card;
use pokerbench_engine::logger::{ForcedFold, HandRecord};
use pokerbench_engine::player::PlayerAction;
use pokerbench_engine::table::GameStateView;
use pokerbench_sim::{
    CancelToken, EndReason, HandOutcome, Ledger, LogCapture, MemoryRecorder, SimConfig, SimError,
    Simulator,
};
use tracing_subscriber::layer::SubscriberExt;

#[derive(Debug, Clone)]
enum Script {
    Calls,
    Checks,
    Sleeps(u64),
    Fails,
    Panics,
    ZeroRaise,
    Shoves,
    Cancels(CancelToken),
}

struct Scripted {
    name: String,
    script: Script,
}

#[async_trait]
impl Agent for Scripted {
    async fn decide(
        &self,
        view: &GameStateView,
        _hole: [Card; 2],
        _deadline: Duration,
    ) -> Result<PlayerAction, AgentError> {
        let call_or_check = if view.to_call > 0 {
            PlayerAction::Call
        } else {
            PlayerAction::Check
        };
        match &self.script {
            Script::Calls => Ok(call_or_check),
            Script::Checks => Ok(PlayerAction::Check),
            Script::Sleeps(secs) => {
                tokio::time::sleep(Duration::from_secs(*secs)).await;
                Ok(PlayerAction::Call)
            }
            Script::Fails => Err(AgentError::Backend("model offline".into())),
            Script::Panics => panic!("agent blew up"),
            Script::ZeroRaise => Ok(PlayerAction::Raise(0)),
            Script::Shoves => Ok(PlayerAction::Raise(u32::MAX)),
            Script::Cancels(token) => {
                token.cancel();
                Ok(call_or_check)
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn seat(name: &str, script: Script) -> Arc<dyn Agent> {
    Arc::new(Scripted {
        name: name.to_string(),
        script,
    })
}

fn config(max_hands: u32) -> SimConfig {
    SimConfig {
        max_hands,
        agent_deadline_secs: 1,
        seed: Some(7),
        ..SimConfig::default()
    }
}

fn chips_total(record: &HandRecord) -> u32 {
    record.final_stacks.iter().map(|s| s.chips).sum()
}

/// Plays one heads-up hand where `first` is on the button and acts first.
async fn first_hand(first: Script) -> HandRecord {
    let sim = Simulator::new(
        vec![seat("first", first), seat("caller", Script::Calls)],
        config(1),
    )
    .unwrap();
    let mut table = sim.new_table(7).unwrap();
    match sim.play_hand(&mut table, None, 1).await.unwrap() {
        HandOutcome::Completed(record) => *record,
        HandOutcome::Abandoned => panic!("hand should run to completion"),
    }
}

fn assert_forced_fold(record: &HandRecord, reason: ForcedFold) {
    let first = &record.actions[0];
    assert_eq!(first.player, "first");
    assert_eq!(first.action, PlayerAction::Fold);
    assert_eq!(first.forced, Some(reason));
    assert_eq!(record.actions.len(), 1);
    assert_eq!(record.won_by("caller"), 15);
    assert_eq!(chips_total(record), 2000);
}

#[tokio::test(start_paused = true)]
async fn slow_agent_is_folded_at_the_deadline() {
    let logs = LogCapture::new();
    let _guard = tracing::subscriber::set_default(tracing_subscriber::registry().with(logs.clone()));

    let record = first_hand(Script::Sleeps(60)).await;
    assert_forced_fold(&record, ForcedFold::Timeout);
    assert!(
        !record
            .actions
            .iter()
            .any(|a| a.player == "first" && a.action == PlayerAction::Call)
    );

    let warning = logs
        .warnings()
        .into_iter()
        .find(|e| e.message.contains("deadline"))
        .expect("timeout warning");
    assert_eq!(warning.field("player"), Some("first"));
}

#[tokio::test]
async fn failing_agent_is_folded() {
    let record = first_hand(Script::Fails).await;
    assert_forced_fold(&record, ForcedFold::AgentError);
}

#[tokio::test]
async fn panicking_agent_is_folded() {
    let record = first_hand(Script::Panics).await;
    assert_forced_fold(&record, ForcedFold::AgentPanic);
}

#[tokio::test]
async fn illegal_check_becomes_a_forced_fold() {
    let record = first_hand(Script::Checks).await;
    assert_forced_fold(&record, ForcedFold::IllegalAction);
}

#[tokio::test]
async fn zero_raise_is_sized_to_the_bet() {
    let record = first_hand(Script::ZeroRaise).await;
    let first = &record.actions[0];
    assert_eq!(first.action, PlayerAction::Raise(10));
    assert_eq!(first.chips, 10);
    assert_eq!(first.forced, None);
    assert_eq!(record.board.len(), 5);
    assert_eq!(chips_total(&record), 2000);
}

#[tokio::test]
async fn simulator_rejects_bad_rosters() {
    let err = Simulator::new(vec![seat("solo", Script::Calls)], config(1)).err();
    assert!(matches!(err, Some(SimError::NotEnoughAgents(1))));

    let err = Simulator::new(
        vec![seat("twin", Script::Calls), seat("twin", Script::Checks)],
        config(1),
    )
    .err();
    assert!(matches!(err, Some(SimError::DuplicateAgent(name)) if name == "twin"));

    let crowd = |n: usize| {
        (0..n)
            .map(|i| seat(&format!("p{i}"), Script::Calls))
            .collect::<Vec<_>>()
    };
    let err = Simulator::new(crowd(24), config(1)).err();
    assert!(matches!(err, Some(SimError::TooManyAgents(24))));
    assert!(Simulator::new(crowd(23), config(1)).is_ok());

    let bad = SimConfig {
        sessions: 0,
        ..config(1)
    };
    let err = Simulator::new(vec![seat("a", Script::Calls), seat("b", Script::Calls)], bad).err();
    assert!(matches!(err, Some(SimError::Config(_))));
}

#[tokio::test]
async fn full_table_of_callers_plays_out_on_one_deck() {
    let agents = (0..23)
        .map(|i| seat(&format!("p{i}"), Script::Calls))
        .collect::<Vec<_>>();
    let sim = Simulator::new(agents, config(3)).unwrap();
    let (result, _) = sim
        .run_session(1, Ledger::new(sim.names().iter().cloned()))
        .await
        .unwrap();

    assert_eq!(result.end_reason, EndReason::HandLimit);
    assert_eq!(result.hands_played, 3);
    assert!(result.hands.iter().all(|h| h.board.len() == 5));
    assert_eq!(result.final_chips.iter().map(|s| s.chips).sum::<u32>(), 23_000);
}

#[tokio::test]
async fn session_stops_at_the_hand_limit() {
    let sim = Simulator::new(
        vec![
            seat("a", Script::Calls),
            seat("b", Script::Calls),
            seat("c", Script::Calls),
        ],
        config(4),
    )
    .unwrap();
    let (result, ledger) = sim
        .run_session(1, Ledger::new(sim.names().iter().cloned()))
        .await
        .unwrap();

    assert_eq!(result.end_reason, EndReason::HandLimit);
    assert_eq!(result.hands_played, 4);
    assert_eq!(result.hands.len(), 4);
    assert_eq!(result.seed, 8);
    assert_eq!(result.final_chips.iter().map(|s| s.chips).sum::<u32>(), 3000);
    let dealers: Vec<usize> = result.hands.iter().map(|h| h.dealer).collect();
    assert_eq!(dealers, vec![0, 1, 2, 0]);
    for entry in ledger.entries() {
        assert_eq!(entry.session.hands_played, 4);
        assert_eq!(entry.session.forced_folds, 0);
    }
}

#[tokio::test]
async fn session_ends_when_one_player_has_every_chip() {
    let sim = Simulator::new(
        vec![seat("shover", Script::Shoves), seat("caller", Script::Calls)],
        config(100),
    )
    .unwrap();
    let (result, _) = sim
        .run_session(1, Ledger::new(sim.names().iter().cloned()))
        .await
        .unwrap();

    assert_eq!(result.end_reason, EndReason::OnePlayerLeft);
    assert!(result.hands_played >= 1 && result.hands_played < 100);
    let mut chips: Vec<u32> = result.final_chips.iter().map(|s| s.chips).collect();
    chips.sort_unstable();
    assert_eq!(chips, vec![0, 2000]);
    assert!(result.winner().is_some());
}

#[tokio::test(start_paused = true)]
async fn session_stops_when_the_time_budget_runs_out() {
    let cfg = SimConfig {
        agent_deadline_secs: 5,
        session_budget_secs: 10,
        ..config(100)
    };
    let sim = Simulator::new(
        vec![seat("slow-a", Script::Sleeps(2)), seat("slow-b", Script::Sleeps(2))],
        cfg,
    )
    .unwrap();
    let (result, ledger) = sim
        .run_session(1, Ledger::new(sim.names().iter().cloned()))
        .await
        .unwrap();

    assert_eq!(result.end_reason, EndReason::TimeLimit);
    assert!(result.hands_played >= 1 && result.hands_played < 100);
    assert!(ledger.entries().iter().all(|e| e.session.forced_folds == 0));
}

#[tokio::test]
async fn cancelling_mid_hand_refunds_the_pot() {
    let token = CancelToken::new();
    let recorder = Arc::new(MemoryRecorder::new());
    let sim = Simulator::new(
        vec![
            seat("canceller", Script::Cancels(token.clone())),
            seat("b", Script::Calls),
            seat("c", Script::Calls),
        ],
        config(10),
    )
    .unwrap()
    .with_recorder(recorder.clone())
    .with_cancel_token(token);

    let (result, _) = sim
        .run_session(1, Ledger::new(sim.names().iter().cloned()))
        .await
        .unwrap();

    assert_eq!(result.end_reason, EndReason::Cancelled);
    assert_eq!(result.hands_played, 0);
    assert!(result.final_chips.iter().all(|s| s.chips == 1000));

    let hands = recorder.hands().unwrap();
    assert_eq!(hands.len(), 1);
    assert_eq!(hands[0].actions.len(), 1);
    assert_eq!(hands[0].record, None);
    assert_eq!(recorder.sessions().unwrap()[0].hands_played, Some(0));
}

#[tokio::test]
async fn cancelled_before_start_plays_nothing() {
    let sim = Simulator::new(
        vec![seat("a", Script::Calls), seat("b", Script::Calls)],
        SimConfig {
            sessions: 3,
            ..config(10)
        },
    )
    .unwrap();
    sim.cancel_token().cancel();

    let result = sim.run_benchmark().await.unwrap();
    assert_eq!(result.total_sessions, 0);
    assert_eq!(result.overall_winner, None);
}

async fn reference_benchmark(seed: u64) -> pokerbench_sim::BenchmarkResult {
    let agents: Vec<Arc<dyn Agent>> = ["baseline", "random", "calling"]
        .iter()
        .enumerate()
        .map(|(i, kind)| Arc::from(create_agent(kind, &format!("{kind}-{}", i + 1), seed).unwrap()))
        .collect();
    let cfg = SimConfig {
        sessions: 3,
        max_hands: 20,
        seed: Some(seed),
        ..SimConfig::default()
    };
    Simulator::new(agents, cfg).unwrap().run_benchmark().await.unwrap()
}

#[tokio::test]
async fn benchmark_aggregates_sessions() {
    let result = reference_benchmark(11).await;

    assert_eq!(result.total_sessions, 3);
    let seeds: Vec<u64> = result.sessions.iter().map(|s| s.seed).collect();
    assert_eq!(seeds, vec![12, 13, 14]);
    assert_eq!(
        result.total_hands,
        result.sessions.iter().map(|s| s.hands_played).sum::<u32>()
    );
    for session in &result.sessions {
        let total: u32 = session.final_chips.iter().map(|s| s.chips).sum();
        assert_eq!(total, 3000);
    }
    assert_eq!(result.players.iter().map(|p| p.total_profit).sum::<i64>(), 0);
    assert_eq!(result.players.iter().map(|p| p.total_chips).sum::<u64>(), 9000);
    for p in &result.players {
        assert!(p.lifetime.hands_played <= result.total_hands);
        assert!(p.lifetime.hands_won <= p.lifetime.hands_played);
    }
    assert!(result.overall_winner.is_some());
}

#[tokio::test]
async fn seeded_benchmarks_replay_identically() {
    let a = reference_benchmark(99).await;
    let b = reference_benchmark(99).await;

    assert_eq!(a.total_hands, b.total_hands);
    for (sa, sb) in a.sessions.iter().zip(&b.sessions) {
        assert_eq!(sa.final_chips, sb.final_chips);
        for (ha, hb) in sa.hands.iter().zip(&sb.hands) {
            assert_eq!(ha.actions, hb.actions);
            assert_eq!(ha.board, hb.board);
            assert_eq!(ha.payouts, hb.payouts);
        }
    }
    assert_eq!(a.overall_winner, b.overall_winner);
}
