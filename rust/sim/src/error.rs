use pokerbench_engine::errors::GameError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum SimError {
    /// The engine refused an operation the simulator relies on, or an
    /// invariant broke. Rejected agent actions never surface here.
    #[error("Engine error: {0}")]
    Engine(#[from] GameError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Need at least 2 agents, got {0}")]
    NotEnoughAgents(usize),
    #[error("Too many agents for one deck, got {0}")]
    TooManyAgents(usize),
    #[error("Duplicate agent name {0}")]
    DuplicateAgent(String),
}

impl SimError {
    /// Chip conservation or deck failures: the run cannot be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(self, SimError::Engine(e) if e.is_fatal())
    }
}
