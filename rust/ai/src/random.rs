//! Seeded random agent.
//!
//! Unopened pots are checked 70% of the time and otherwise bet 10 to 50 chips
//! (never more than a quarter of the stack). Facing a bet larger than half
//! the stack it folds; otherwise it folds, calls or raises with weights
//! 30/50/20, raising between one and two times the amount owed.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pokerbench_engine::cards::Card;
use pokerbench_engine::player::PlayerAction;
use pokerbench_engine::table::GameStateView;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::{Agent, AgentError};

const CHECK_WHEN_UNOPENED: f64 = 0.7;
const FOLD_WEIGHT: f64 = 0.3;
const CALL_WEIGHT: f64 = 0.5;

#[derive(Debug)]
pub struct RandomAgent {
    name: String,
    rng: Mutex<ChaCha20Rng>,
}

impl RandomAgent {
    pub fn new(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
        }
    }

    fn choose(rng: &mut ChaCha20Rng, view: &GameStateView) -> PlayerAction {
        let my_chips = view.my_chips();
        let owed = view.to_call;

        if owed == 0 {
            if rng.random_bool(CHECK_WHEN_UNOPENED) {
                return PlayerAction::Check;
            }
            let bet: u32 = rng.random_range(10..=50);
            return PlayerAction::Raise(bet.min(my_chips / 4));
        }

        if owed > my_chips / 2 {
            return PlayerAction::Fold;
        }
        let roll: f64 = rng.random();
        if roll < FOLD_WEIGHT {
            PlayerAction::Fold
        } else if roll < FOLD_WEIGHT + CALL_WEIGHT {
            PlayerAction::Call
        } else {
            let raise: u32 = rng.random_range(owed..=owed.saturating_mul(2));
            PlayerAction::Raise(raise.min(my_chips))
        }
    }
}

#[async_trait]
impl Agent for RandomAgent {
    async fn decide(
        &self,
        view: &GameStateView,
        _hole: [Card; 2],
        _deadline: Duration,
    ) -> Result<PlayerAction, AgentError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| AgentError::Unavailable(format!("{}: rng lock poisoned", self.name)))?;
        Ok(Self::choose(&mut rng, view))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
