//! Persistence seam.
//!
//! The simulator reports progress to a [`HandRecorder`] in a fixed order:
//! `begin_session`, then per hand `begin_hand`, one `record_action` per
//! applied action and `complete_hand`, and finally `complete_session`.
//! Recorder failures are logged and ignored; a simulation never depends on
//! storage being available.

use std::sync::RwLock;

use async_trait::async_trait;
use pokerbench_engine::cards::Card;
use pokerbench_engine::logger::{ActionRecord, HandRecord, StackEntry};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SimConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionKey(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HandKey(pub u64);

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("Recorder storage poisoned")]
    StoragePoisoned,
    #[error("Unknown session {0:?}")]
    UnknownSession(SessionKey),
    #[error("Unknown hand {0:?}")]
    UnknownHand(HandKey),
    #[error("Recorder backend failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait HandRecorder: Send + Sync {
    async fn begin_session(&self, name: &str, config: &SimConfig) -> Result<SessionKey, RecorderError>;

    async fn begin_hand(
        &self,
        session: SessionKey,
        hand_number: u32,
        dealer: usize,
        hole_cards: &[(String, [Card; 2])],
        starting_stacks: &[StackEntry],
    ) -> Result<HandKey, RecorderError>;

    async fn record_action(&self, hand: HandKey, action: &ActionRecord) -> Result<(), RecorderError>;

    async fn complete_hand(&self, hand: HandKey, record: &HandRecord) -> Result<(), RecorderError>;

    async fn complete_session(&self, session: SessionKey, hands_played: u32) -> Result<(), RecorderError>;
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

#[async_trait]
impl HandRecorder for NoopRecorder {
    async fn begin_session(&self, _name: &str, _config: &SimConfig) -> Result<SessionKey, RecorderError> {
        Ok(SessionKey(0))
    }

    async fn begin_hand(
        &self,
        _session: SessionKey,
        _hand_number: u32,
        _dealer: usize,
        _hole_cards: &[(String, [Card; 2])],
        _starting_stacks: &[StackEntry],
    ) -> Result<HandKey, RecorderError> {
        Ok(HandKey(0))
    }

    async fn record_action(&self, _hand: HandKey, _action: &ActionRecord) -> Result<(), RecorderError> {
        Ok(())
    }

    async fn complete_hand(&self, _hand: HandKey, _record: &HandRecord) -> Result<(), RecorderError> {
        Ok(())
    }

    async fn complete_session(&self, _session: SessionKey, _hands_played: u32) -> Result<(), RecorderError> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub key: SessionKey,
    pub name: String,
    pub config: SimConfig,
    /// Set once the session completes
    pub hands_played: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoredHand {
    pub key: HandKey,
    pub session: SessionKey,
    pub hand_number: u32,
    pub dealer: usize,
    pub hole_cards: Vec<(String, [Card; 2])>,
    pub starting_stacks: Vec<StackEntry>,
    pub actions: Vec<ActionRecord>,
    /// Set once the hand completes
    pub record: Option<HandRecord>,
}

#[derive(Debug, Default)]
struct MemoryState {
    sessions: Vec<StoredSession>,
    hands: Vec<StoredHand>,
}

/// Keeps every session and hand in memory.
#[derive(Debug, Default)]
pub struct MemoryRecorder {
    state: RwLock<MemoryState>,
}

impl MemoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sessions(&self) -> Result<Vec<StoredSession>, RecorderError> {
        let state = self.state.read().map_err(|_| RecorderError::StoragePoisoned)?;
        Ok(state.sessions.clone())
    }

    pub fn hands(&self) -> Result<Vec<StoredHand>, RecorderError> {
        let state = self.state.read().map_err(|_| RecorderError::StoragePoisoned)?;
        Ok(state.hands.clone())
    }

    pub fn hand(&self, key: HandKey) -> Result<Option<StoredHand>, RecorderError> {
        let state = self.state.read().map_err(|_| RecorderError::StoragePoisoned)?;
        Ok(state.hands.iter().find(|h| h.key == key).cloned())
    }

    fn with_hand<F>(&self, key: HandKey, f: F) -> Result<(), RecorderError>
    where
        F: FnOnce(&mut StoredHand),
    {
        let mut state = self.state.write().map_err(|_| RecorderError::StoragePoisoned)?;
        let hand = state
            .hands
            .iter_mut()
            .find(|h| h.key == key)
            .ok_or(RecorderError::UnknownHand(key))?;
        f(hand);
        Ok(())
    }
}

#[async_trait]
impl HandRecorder for MemoryRecorder {
    async fn begin_session(&self, name: &str, config: &SimConfig) -> Result<SessionKey, RecorderError> {
        let mut state = self.state.write().map_err(|_| RecorderError::StoragePoisoned)?;
        let key = SessionKey(state.sessions.len() as u64 + 1);
        state.sessions.push(StoredSession {
            key,
            name: name.to_string(),
            config: config.clone(),
            hands_played: None,
        });
        Ok(key)
    }

    async fn begin_hand(
        &self,
        session: SessionKey,
        hand_number: u32,
        dealer: usize,
        hole_cards: &[(String, [Card; 2])],
        starting_stacks: &[StackEntry],
    ) -> Result<HandKey, RecorderError> {
        let mut state = self.state.write().map_err(|_| RecorderError::StoragePoisoned)?;
        if !state.sessions.iter().any(|s| s.key == session) {
            return Err(RecorderError::UnknownSession(session));
        }
        let key = HandKey(state.hands.len() as u64 + 1);
        state.hands.push(StoredHand {
            key,
            session,
            hand_number,
            dealer,
            hole_cards: hole_cards.to_vec(),
            starting_stacks: starting_stacks.to_vec(),
            actions: Vec::new(),
            record: None,
        });
        Ok(key)
    }

    async fn record_action(&self, hand: HandKey, action: &ActionRecord) -> Result<(), RecorderError> {
        self.with_hand(hand, |h| h.actions.push(action.clone()))
    }

    async fn complete_hand(&self, hand: HandKey, record: &HandRecord) -> Result<(), RecorderError> {
        self.with_hand(hand, |h| h.record = Some(record.clone()))
    }

    async fn complete_session(&self, session: SessionKey, hands_played: u32) -> Result<(), RecorderError> {
        let mut state = self.state.write().map_err(|_| RecorderError::StoragePoisoned)?;
        let stored = state
            .sessions
            .iter_mut()
            .find(|s| s.key == session)
            .ok_or(RecorderError::UnknownSession(session))?;
        stored.hands_played = Some(hands_played);
        Ok(())
    }
}
