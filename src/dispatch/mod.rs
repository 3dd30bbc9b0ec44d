//! Game event ingestion and dispatch
//!
//! Events arrive as JSON over the webhook. A tagged union models the
//! six known event types; every payload field is optional with a
//! per-field default, and numeric values are accepted wherever a string
//! would do. An unknown or missing `type` is a deliberate no-op so the
//! game can grow new event types without breaking the agent.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::orchestrator::Orchestrator;

// ============================================================================
// Event model
// ============================================================================

/// Event types the agent reacts to.
const KNOWN_TYPES: &[&str] = &[
    "win",
    "game_start",
    "tournament",
    "achievement",
    "challenge",
    "leaderboard",
];

/// A game event, parsed from a webhook payload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    Win {
        #[serde(default = "default_player", deserialize_with = "stringly")]
        player: String,
        #[serde(default = "default_dimensions", deserialize_with = "stringly")]
        dimensions: String,
    },
    GameStart {
        #[serde(default = "default_players", deserialize_with = "stringly")]
        players: String,
        #[serde(default = "default_size", deserialize_with = "stringly")]
        size: String,
    },
    Tournament {
        #[serde(default = "default_tournament_name", deserialize_with = "stringly")]
        name: String,
        #[serde(default = "default_unknown", deserialize_with = "stringly")]
        participants: String,
    },
    Achievement {
        #[serde(default = "default_player", deserialize_with = "stringly")]
        player: String,
        #[serde(default = "default_achievement", deserialize_with = "stringly")]
        achievement: String,
    },
    Challenge {
        #[serde(default = "default_challenger", deserialize_with = "stringly")]
        challenger: String,
        #[serde(default = "default_challenged", deserialize_with = "stringly")]
        challenged: String,
    },
    Leaderboard {
        #[serde(default = "default_top", deserialize_with = "stringly")]
        top: String,
        #[serde(default = "default_rank", deserialize_with = "stringly")]
        rank: String,
    },
}

fn default_player() -> String {
    String::from("Player")
}
fn default_dimensions() -> String {
    String::from("multiple")
}
fn default_players() -> String {
    String::from("2")
}
fn default_size() -> String {
    String::from("9D")
}
fn default_tournament_name() -> String {
    String::from("Dimensional Tournament")
}
fn default_unknown() -> String {
    String::from("?")
}
fn default_achievement() -> String {
    String::from("Strategic Genius")
}
fn default_challenger() -> String {
    String::from("Player1")
}
fn default_challenged() -> String {
    String::from("Player2")
}
fn default_top() -> String {
    String::from("Champion")
}
fn default_rank() -> String {
    String::from("#1")
}

/// Accept strings and numbers interchangeably; the game sends both.
fn stringly<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

impl GameEvent {
    /// Parse a webhook payload.
    ///
    /// `None` means "nothing to do": the type is absent, unknown, or
    /// the payload is malformed beyond field defaults. No variant of
    /// bad input is an error at this boundary.
    #[must_use]
    pub fn parse(payload: &Value) -> Option<Self> {
        let tag = payload.get("type").and_then(Value::as_str)?;
        if !KNOWN_TYPES.contains(&tag) {
            debug!(event_type = tag, "Ignoring unknown event type");
            return None;
        }
        match serde_json::from_value(payload.clone()) {
            Ok(event) => Some(event),
            Err(e) => {
                warn!(event_type = tag, error = %e, "Malformed event payload ignored");
                None
            }
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            GameEvent::Win { .. } => "win",
            GameEvent::GameStart { .. } => "game_start",
            GameEvent::Tournament { .. } => "tournament",
            GameEvent::Achievement { .. } => "achievement",
            GameEvent::Challenge { .. } => "challenge",
            GameEvent::Leaderboard { .. } => "leaderboard",
        }
    }

    /// Render the announcement body for this event, drawing one of the
    /// per-type phrasings.
    #[must_use]
    pub fn render(&self, rng: &mut impl Rng) -> String {
        let phrasings: Vec<String> = match self {
            GameEvent::Win { player, dimensions } => vec![
                format!("VICTORY: {player} conquered {dimensions} dimensions!"),
                format!("{player} wins! Dimensional mastery achieved."),
                format!("Game over: {player} dominates the 9D grid."),
                format!("Winner: {player}. Strategic excellence confirmed."),
            ],
            GameEvent::GameStart { players, size } => vec![
                format!("NEW GAME: {players} players entering {size} space."),
                format!("Grid initialized. {players} players ready. Let the strategy begin."),
                format!("Game starting: {size} tic-tac-toe. {players} competitors."),
            ],
            GameEvent::Tournament { name, participants } => vec![
                format!("TOURNAMENT: {name} - {participants} players competing!"),
                format!("{name} underway. {participants} strategists battle for supremacy."),
                format!("Competition alert: {name}. {participants} players. One winner."),
            ],
            GameEvent::Achievement { player, achievement } => vec![
                format!("ACHIEVEMENT: {player} unlocked '{achievement}'!"),
                format!("New milestone: {player} earned {achievement}."),
                format!("{player} achieved: {achievement}. Impressive."),
            ],
            GameEvent::Challenge { challenger, challenged } => vec![
                format!("CHALLENGE: {challenger} vs {challenged}. Epic battle incoming."),
                format!("{challenger} challenges {challenged}. Who will win?"),
                format!("Showdown: {challenger} takes on {challenged}."),
            ],
            GameEvent::Leaderboard { top, rank } => vec![
                format!("LEADERBOARD UPDATE: {top} holds {rank}!"),
                format!("Rankings shift: {top} at {rank}."),
                format!("{top} dominates at {rank}. Can anyone challenge?"),
            ],
        };
        phrasings
            .choose(rng)
            .cloned()
            .unwrap_or_default()
    }
}

// ============================================================================
// Dispatcher
// ============================================================================

/// Routes parsed events to the orchestrator.
pub struct EventDispatcher {
    orchestrator: Arc<Orchestrator>,
}

impl EventDispatcher {
    #[must_use]
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        Self { orchestrator }
    }

    /// Handle one webhook payload. Unknown events are no-ops; publish
    /// failures are logged and swallowed, so the webhook always acks.
    pub async fn dispatch(&self, payload: &Value) {
        let Some(event) = GameEvent::parse(payload) else {
            return;
        };

        info!(event = event.label(), "Dispatching game event");
        let body = {
            let mut rng = rand::thread_rng();
            event.render(&mut rng)
        };

        if let Err(e) = self.orchestrator.publish_update(&body).await {
            warn!(event = event.label(), error = %e, "Event announcement failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    #[test]
    fn test_parse_win_with_fields() {
        let event = GameEvent::parse(&json!({
            "type": "win", "player": "Ada", "dimensions": 9
        }))
        .unwrap();
        assert_eq!(
            event,
            GameEvent::Win {
                player: String::from("Ada"),
                dimensions: String::from("9"),
            }
        );
    }

    #[test]
    fn test_parse_applies_defaults() {
        let event = GameEvent::parse(&json!({ "type": "win" })).unwrap();
        assert_eq!(
            event,
            GameEvent::Win {
                player: String::from("Player"),
                dimensions: String::from("multiple"),
            }
        );

        let event = GameEvent::parse(&json!({ "type": "game_start" })).unwrap();
        assert_eq!(
            event,
            GameEvent::GameStart {
                players: String::from("2"),
                size: String::from("9D"),
            }
        );
    }

    #[test]
    fn test_unknown_and_missing_types_are_noops() {
        assert!(GameEvent::parse(&json!({ "type": "meteor_strike" })).is_none());
        assert!(GameEvent::parse(&json!({ "player": "Ada" })).is_none());
        assert!(GameEvent::parse(&json!({ "type": 42 })).is_none());
        assert!(GameEvent::parse(&json!("just a string")).is_none());
    }

    #[test]
    fn test_malformed_field_is_noop() {
        // A known type with a structurally bad field parses to nothing
        // rather than erroring.
        assert!(GameEvent::parse(&json!({ "type": "win", "player": ["a", "b"] })).is_none());
    }

    #[test]
    fn test_render_interpolates_fields() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let event = GameEvent::Challenge {
            challenger: String::from("Ada"),
            challenged: String::from("Grace"),
        };
        for _ in 0..10 {
            let body = event.render(&mut rng);
            assert!(body.contains("Ada"));
            assert!(body.contains("Grace"));
        }
    }

    #[test]
    fn test_all_known_types_parse() {
        for tag in ["win", "game_start", "tournament", "achievement", "challenge", "leaderboard"] {
            let parsed = GameEvent::parse(&json!({ "type": tag }));
            assert!(parsed.is_some(), "failed to parse bare {tag}");
            assert_eq!(parsed.unwrap().label(), tag);
        }
    }
}
