//! # pokerbench-sim: agent benchmark runner
//!
//! Seats a set of [`pokerbench_ai::Agent`]s at a [`pokerbench_engine::table::Table`]
//! and plays hands, sessions and whole benchmarks, asking each agent for a
//! decision under a deadline and folding for it when it misbehaves.
//!
//! ## Core Components
//!
//! - [`Simulator`] - Hand, session and benchmark loops
//! - [`SimConfig`] - Defaults, TOML file and `POKERBENCH_*` overrides
//! - [`HandRecorder`] - Persistence seam with in-memory and no-op backends
//! - [`Ledger`], [`SessionResult`], [`BenchmarkResult`] - Counters and aggregates
//! - [`init_logging`], [`LogCapture`] - `tracing` setup and log capture for tests
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use pokerbench_ai::{Agent, create_agent};
//! use pokerbench_sim::{SimConfig, Simulator};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let agents: Vec<Arc<dyn Agent>> = vec![
//!     Arc::from(create_agent("baseline", "alice", 1)?),
//!     Arc::from(create_agent("random", "bob", 2)?),
//! ];
//! let sim = Simulator::new(agents, SimConfig::default())?;
//! let result = sim.run_benchmark().await?;
//! println!("{:?}", result.overall_winner);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod recorder;
pub mod simulator;
pub mod stats;

pub use config::{ConfigError, ConfigResolved, ConfigSources, SimConfig, ValueSource};
pub use error::SimError;
pub use logging::{CapturedLog, LogCapture, init_logging};
pub use recorder::{
    HandKey, HandRecorder, MemoryRecorder, NoopRecorder, RecorderError, SessionKey, StoredHand,
    StoredSession,
};
pub use simulator::{CancelToken, HandOutcome, Simulator};
pub use stats::{
    AgentCounters, BenchmarkResult, EndReason, Ledger, LedgerEntry, PlayerSummary, SessionResult,
};
