//! Benchmark runner binary
//!
//! Usage: cargo run -p pokerbench-sim --bin pokerbench -- --sessions 5 --seed 42

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use pokerbench_ai::{Agent, create_agent};
use pokerbench_sim::{BenchmarkResult, SimConfig, Simulator, config, init_logging};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Summary,
    Json,
}

/// Run reference agents against each other and report who comes out ahead.
///
/// Settings come from defaults, the TOML file named by POKERBENCH_CONFIG and
/// POKERBENCH_* variables; flags given here win over all of them.
#[derive(Debug, Parser)]
#[command(name = "pokerbench", version)]
struct Args {
    /// Number of sessions to play
    #[arg(long)]
    sessions: Option<u32>,
    /// Hand limit per session
    #[arg(long)]
    hands: Option<u32>,
    /// Base seed; sessions use seed + session number
    #[arg(long)]
    seed: Option<u64>,
    /// Agent kinds in seat order, e.g. baseline,random,calling
    #[arg(long, value_delimiter = ',')]
    agents: Option<Vec<String>>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
    output: OutputFormat,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    if let Err(e) = init_logging() {
        eprintln!("Error: failed to initialise logging: {e}");
        return ExitCode::from(2);
    }
    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "benchmark failed");
            eprintln!("Error: {e}");
            ExitCode::from(2)
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = config::load()?;
    if let Some(sessions) = args.sessions {
        cfg.sessions = sessions;
    }
    if let Some(hands) = args.hands {
        cfg.max_hands = hands;
    }
    if let Some(agents) = args.agents {
        cfg.agents = agents;
    }
    let seed = args.seed.or(cfg.seed).unwrap_or_else(rand::random);
    cfg.seed = Some(seed);
    cfg.validate()?;

    let agents = build_agents(&cfg, seed)?;
    let sim = Simulator::new(agents, cfg)?;

    let cancel = sim.cancel_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupt received, stopping after the current decision");
            cancel.cancel();
        }
    });

    let result = sim.run_benchmark().await?;
    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputFormat::Summary => print_summary(&result),
    }
    Ok(())
}

/// Seats are named `<kind>-<seat>` so two agents of one kind stay distinct.
fn build_agents(cfg: &SimConfig, seed: u64) -> Result<Vec<Arc<dyn Agent>>, Box<dyn std::error::Error>> {
    let mut agents: Vec<Arc<dyn Agent>> = Vec::with_capacity(cfg.agents.len());
    for (i, kind) in cfg.agents.iter().enumerate() {
        let name = format!("{kind}-{}", i + 1);
        agents.push(Arc::from(create_agent(kind, &name, seed.wrapping_add(i as u64 + 1))?));
    }
    Ok(agents)
}

fn print_summary(result: &BenchmarkResult) {
    println!(
        "{} sessions, {} hands",
        result.total_sessions, result.total_hands
    );
    println!(
        "{:<16} {:>10} {:>10} {:>8} {:>8} {:>8}",
        "player", "chips", "profit", "roi", "won", "forced"
    );
    for p in &result.players {
        println!(
            "{:<16} {:>10} {:>10} {:>7.1}% {:>8} {:>8}",
            p.player,
            p.total_chips,
            p.total_profit,
            p.roi * 100.0,
            p.sessions_won,
            p.lifetime.forced_folds
        );
    }
    match &result.overall_winner {
        Some(w) => println!("winner: {w}"),
        None => println!("winner: none"),
    }
}
