use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot check while owing {owed} chips")]
    IllegalCheck { owed: u32 },
    #[error("Player {seat} already folded")]
    PlayerFolded { seat: usize },
    #[error("Player {seat} is not dealt into this hand")]
    NotInHand { seat: usize },
    #[error("No hand in progress")]
    NoHandInProgress,
    #[error("Betting is closed in phase {phase}")]
    BettingClosed { phase: String },
    #[error("Need at least 2 players with chips, found {funded}")]
    NotEnoughPlayers { funded: usize },
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Invalid table: {0}")]
    InvalidTable(String),
    #[error("Chip conservation violated: expected {expected} chips in play, found {actual}")]
    ChipConservation { expected: u64, actual: u64 },
}

impl GameError {
    /// Invariant violations indicate an engine bug; everything else is a rejected request.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            GameError::ChipConservation { .. } | GameError::DeckExhausted
        )
    }
}
