use std::time::Duration;

use async_trait::async_trait;
use pokerbench_engine::cards::Card;
use pokerbench_engine::player::PlayerAction;
use pokerbench_engine::table::GameStateView;

use crate::{Agent, AgentError};

/// Calls every bet and checks when nothing is owed.
#[derive(Debug, Clone)]
pub struct CallingAgent {
    name: String,
}

impl CallingAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[async_trait]
impl Agent for CallingAgent {
    async fn decide(
        &self,
        view: &GameStateView,
        _hole: [Card; 2],
        _deadline: Duration,
    ) -> Result<PlayerAction, AgentError> {
        Ok(if view.to_call > 0 {
            PlayerAction::Call
        } else {
            PlayerAction::Check
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}
