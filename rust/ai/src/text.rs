//! Agents backed by anything that answers a text prompt.
//!
//! [`TextAgent`] renders the acting seat's view as a prompt, hands it to a
//! [`ReplySource`] and turns the reply into an action with
//! [`parse_decision`]. Wire a model client in by implementing `ReplySource`.

use std::time::Duration;

use async_trait::async_trait;
use pokerbench_engine::cards::Card;
use pokerbench_engine::player::PlayerAction;
use pokerbench_engine::table::GameStateView;

use crate::decision::parse_decision;
use crate::{Agent, AgentError};

/// Something that answers a prompt with free text.
#[async_trait]
pub trait ReplySource: Send + Sync {
    async fn reply(&self, prompt: &str, deadline: Duration) -> Result<String, AgentError>;
}

pub struct TextAgent<S> {
    name: String,
    source: S,
}

impl<S: ReplySource> TextAgent<S> {
    pub fn new(name: impl Into<String>, source: S) -> Self {
        Self {
            name: name.into(),
            source,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }
}

#[async_trait]
impl<S: ReplySource> Agent for TextAgent<S> {
    async fn decide(
        &self,
        view: &GameStateView,
        hole: [Card; 2],
        deadline: Duration,
    ) -> Result<PlayerAction, AgentError> {
        let prompt = render_prompt(view, hole);
        let reply = self.source.reply(&prompt, deadline).await?;
        parse_decision(&reply, view.current_bet)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Describes the situation from the viewer's seat and asks for a JSON reply.
pub fn render_prompt(view: &GameStateView, hole: [Card; 2]) -> String {
    let board = if view.community_cards.is_empty() {
        "none yet".to_string()
    } else {
        join_cards(&view.community_cards)
    };
    format!(
        "You are playing Texas Hold'em.\n\
         Your hole cards: {hole}\n\
         Community cards: {board}\n\
         Street: {street}\n\
         Pot: {pot}\n\
         Current bet: {bet}\n\
         To call: {to_call}\n\
         Your chips: {chips}\n\
         Active players: {players}\n\
         Reply with JSON: {{\"action\": \"fold|check|call|raise\", \"amount\": 0}}\n\
         A raise amount is the chips you add this turn.",
        hole = join_cards(&hole),
        street = view.street,
        pot = view.pot,
        bet = view.current_bet,
        to_call = view.to_call,
        chips = view.my_chips(),
        players = view.active_players.join(", "),
    )
}

fn join_cards(cards: &[Card]) -> String {
    cards
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
