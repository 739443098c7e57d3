//! # pokerbench-ai: decision makers for the simulator
//!
//! Every seat at a simulated table is driven by an [`Agent`]. The simulator
//! only ever talks to the trait; concrete agents live in their own modules.
//!
//! ## Core Components
//!
//! - [`Agent`] - Async decision interface called once per turn
//! - [`AgentError`] - Failures an agent may report instead of an action
//! - [`random`], [`baseline`], [`calling`] - Reference agents
//! - [`decision`] - Lenient parsing of free-text replies into a [`PlayerAction`]
//! - [`text`] - [`text::TextAgent`], which prompts a text backend and parses its reply
//! - [`create_agent`] - Factory for the reference agents
//!
//! ## Quick Start
//!
//! ```rust
//! use std::time::Duration;
//! use pokerbench_ai::create_agent;
//! use pokerbench_engine::rules::Blinds;
//! use pokerbench_engine::table::Table;
//!
//! let agent = create_agent("baseline", "bot", 42).unwrap();
//! assert_eq!(agent.name(), "bot");
//!
//! let mut table = Table::new(["bot", "villain"], 1_000, Blinds::new(5, 10), 42).unwrap();
//! table.start_hand().unwrap();
//! let seat = table.next_to_act().unwrap();
//! let view = table.view_for(seat).unwrap();
//! let hole = table.hole_cards(seat).unwrap();
//! let _decision = agent.decide(&view, hole, Duration::from_secs(30));
//! ```

use std::time::Duration;

use async_trait::async_trait;
use pokerbench_engine::cards::Card;
use pokerbench_engine::player::PlayerAction;
use pokerbench_engine::table::GameStateView;
use thiserror::Error;

pub mod baseline;
pub mod calling;
pub mod decision;
pub mod random;
pub mod text;

/// How long an agent gets per decision unless configured otherwise.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(30);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Decision backend failed: {0}")]
    Backend(String),
    #[error("Malformed decision: {0}")]
    Malformed(String),
    #[error("Agent unavailable: {0}")]
    Unavailable(String),
}

/// A decision maker seated at the table.
///
/// `decide` is called once per turn with a view scoped to the acting seat.
/// The simulator enforces `deadline` itself; an agent may use it to bound its
/// own work but does not have to. Any error, a missed deadline or a panic all
/// end up as a fold for that seat.
///
/// # Example Implementation
///
/// ```rust
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use pokerbench_ai::{Agent, AgentError};
/// use pokerbench_engine::cards::Card;
/// use pokerbench_engine::player::PlayerAction;
/// use pokerbench_engine::table::GameStateView;
///
/// struct Folder;
///
/// #[async_trait]
/// impl Agent for Folder {
///     async fn decide(
///         &self,
///         _view: &GameStateView,
///         _hole: [Card; 2],
///         _deadline: Duration,
///     ) -> Result<PlayerAction, AgentError> {
///         Ok(PlayerAction::Fold)
///     }
///
///     fn name(&self) -> &str {
///         "folder"
///     }
/// }
/// ```
#[async_trait]
pub trait Agent: Send + Sync {
    async fn decide(
        &self,
        view: &GameStateView,
        hole: [Card; 2],
        deadline: Duration,
    ) -> Result<PlayerAction, AgentError>;

    /// Seat name; must match the name the table was built with.
    fn name(&self) -> &str;
}

/// Builds one of the reference agents by kind.
///
/// Supported kinds: `"random"`, `"baseline"`, `"calling"`. `seed` only
/// matters for agents that use randomness.
///
/// ```rust
/// use pokerbench_ai::create_agent;
///
/// let ai = create_agent("random", "alice", 7).unwrap();
/// assert_eq!(ai.name(), "alice");
/// assert!(create_agent("oracle", "bob", 7).is_err());
/// ```
pub fn create_agent(kind: &str, name: &str, seed: u64) -> Result<Box<dyn Agent>, AgentError> {
    match kind {
        "random" => Ok(Box::new(random::RandomAgent::new(name, seed))),
        "baseline" => Ok(Box::new(baseline::BaselineAgent::new(name))),
        "calling" => Ok(Box::new(calling::CallingAgent::new(name))),
        _ => Err(AgentError::Unavailable(format!("unknown agent kind {kind}"))),
    }
}
