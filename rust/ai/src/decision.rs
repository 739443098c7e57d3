//! Turning free-text replies from a reasoning backend into a [`PlayerAction`].
//!
//! Backends are asked for `{"action": "fold|check|call|raise", "amount": n}`
//! but replies often wrap the object in prose or get the types wrong. All of
//! that leniency lives here so the table only ever sees typed actions.

use pokerbench_engine::player::PlayerAction;
use serde::Deserialize;
use serde_json::Value;

use crate::AgentError;

#[derive(Debug, Deserialize)]
struct RawDecision {
    #[serde(default)]
    action: Option<String>,
    #[serde(default)]
    amount: Option<Value>,
}

/// Parses a backend reply. [`crate::text::TextAgent`] runs every reply through here.
///
/// The outermost `{...}` span is decoded as JSON. An unknown action string
/// folds, and a raise is never smaller than `bet_to_match`. If the span is not
/// valid JSON the reply is scanned for the keywords fold, call and raise (in
/// that order), defaulting to check. A reply with no braces at all is
/// [`AgentError::Malformed`].
///
/// ```
/// use pokerbench_ai::decision::parse_decision;
/// use pokerbench_engine::player::PlayerAction;
///
/// let reply = r#"I'll raise. {"action": "RAISE", "amount": 40, "reasoning": "top pair"}"#;
/// assert_eq!(parse_decision(reply, 20).unwrap(), PlayerAction::Raise(40));
/// assert!(parse_decision("no idea", 20).is_err());
/// ```
pub fn parse_decision(reply: &str, bet_to_match: u32) -> Result<PlayerAction, AgentError> {
    let span = json_span(reply).ok_or_else(|| {
        AgentError::Malformed(format!("no JSON object in reply {:?}", preview(reply)))
    })?;
    match serde_json::from_str::<RawDecision>(span) {
        Ok(raw) => Ok(raw.into_action(bet_to_match)),
        Err(_) => Ok(keyword_fallback(span, bet_to_match)),
    }
}

impl RawDecision {
    fn into_action(self, bet_to_match: u32) -> PlayerAction {
        let action = self.action.as_deref().unwrap_or("fold").trim().to_lowercase();
        match action.as_str() {
            "check" => PlayerAction::Check,
            "call" => PlayerAction::Call,
            "raise" => {
                let amount = self.amount.as_ref().and_then(amount_of).unwrap_or(0);
                PlayerAction::Raise(amount.max(bet_to_match))
            }
            _ => PlayerAction::Fold,
        }
    }
}

fn amount_of(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map(|n| n.min(u64::from(u32::MAX)) as u32),
        Value::String(s) => s.trim().trim_start_matches('$').parse().ok(),
        _ => None,
    }
}

fn keyword_fallback(text: &str, bet_to_match: u32) -> PlayerAction {
    let lower = text.to_lowercase();
    if lower.contains("fold") {
        PlayerAction::Fold
    } else if lower.contains("call") {
        PlayerAction::Call
    } else if lower.contains("raise") {
        PlayerAction::Raise(bet_to_match.saturating_mul(2))
    } else {
        PlayerAction::Check
    }
}

fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

fn preview(text: &str) -> String {
    text.chars().take(80).collect()
}
