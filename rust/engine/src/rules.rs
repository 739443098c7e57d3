use serde::{Deserialize, Serialize};

use crate::errors::GameError;
use crate::player::PlayerAction as A;

/// Forced bets posted at the start of every hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blinds {
    pub small: u32,
    pub big: u32,
}

impl Blinds {
    pub const fn new(small: u32, big: u32) -> Self {
        Self { small, big }
    }
}

impl Default for Blinds {
    fn default() -> Self {
        Self::new(5, 10)
    }
}

/// An action after legality checks and stack clamping. Amounts are the chips
/// that actually move from the stack to the pot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedAction {
    Fold,
    Check,
    Call(u32),
    Raise(u32),
    /// Puts the whole remaining stack in, whatever was requested.
    AllIn(u32),
}

impl ValidatedAction {
    pub fn chips(&self) -> u32 {
        match self {
            ValidatedAction::Fold | ValidatedAction::Check => 0,
            ValidatedAction::Call(n) | ValidatedAction::Raise(n) | ValidatedAction::AllIn(n) => *n,
        }
    }
}

/// Validates a player action against the current street and clamps it to the stack.
///
/// # Arguments
///
/// * `stack` - Player's remaining chips
/// * `contribution` - Chips the player already put in this street
/// * `bet_to_match` - Highest street contribution so far
/// * `action` - The action the player wishes to perform
///
/// # Errors
///
/// [`GameError::IllegalCheck`] when the player checks while owing chips. A
/// call or raise is never rejected for lack of chips: it becomes an all-in.
///
/// # Examples
///
/// ```
/// use pokerbench_engine::rules::{validate_action, ValidatedAction};
/// use pokerbench_engine::player::PlayerAction;
///
/// // Short stack calls all-in for less than the bet
/// let va = validate_action(7, 0, 10, PlayerAction::Call).unwrap();
/// assert_eq!(va, ValidatedAction::AllIn(7));
///
/// // Checking while owing is rejected, not converted
/// assert!(validate_action(100, 5, 10, PlayerAction::Check).is_err());
/// ```
pub fn validate_action(
    stack: u32,
    contribution: u32,
    bet_to_match: u32,
    action: A,
) -> Result<ValidatedAction, GameError> {
    let owed = bet_to_match.saturating_sub(contribution);
    match action {
        A::Fold => Ok(ValidatedAction::Fold),
        A::Check => {
            if owed == 0 {
                Ok(ValidatedAction::Check)
            } else {
                Err(GameError::IllegalCheck { owed })
            }
        }
        A::Call => Ok(clamp(owed, stack, ValidatedAction::Call)),
        A::Raise(amount) => Ok(clamp(amount, stack, ValidatedAction::Raise)),
    }
}

fn clamp(requested: u32, stack: u32, wrap: fn(u32) -> ValidatedAction) -> ValidatedAction {
    if stack > 0 && requested >= stack {
        ValidatedAction::AllIn(stack)
    } else {
        wrap(requested)
    }
}

/// Coerces an agent's raise request before it reaches the table: a zero
/// amount becomes a call-sized raise (the current bet to match, at least one
/// chip) and the result never exceeds the stack.
pub fn sanitize_raise(amount: u32, bet_to_match: u32, stack: u32) -> u32 {
    let amount = if amount == 0 { bet_to_match.max(1) } else { amount };
    amount.min(stack)
}
