//! Client and server messages.
//!
//! Both directions are JSON objects tagged by `type`:
//!
//! ```text
//! client: roll | getLegalMoves | move | assignPendingDie | forfeitPendingDie
//! server: legalMoves | moveResult | stateSync | error
//! ```

use serde::{Deserialize, Serialize};

use super::dice::{PendingDie, TurnPhase};
use crate::core::{GameState, Move, PlayerId};
use crate::error::ErrorPayload;
use crate::rules::MoveResult;

/// A request from a seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    #[serde(rename_all = "camelCase")]
    Roll { actor_id: PlayerId, dice: Vec<u8> },
    #[serde(rename_all = "camelCase")]
    GetLegalMoves {
        actor_id: PlayerId,
        #[serde(default)]
        die_index: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    Move {
        actor_id: PlayerId,
        #[serde(default)]
        die_index: Option<usize>,
        #[serde(rename = "move")]
        mv: Move,
    },
    #[serde(rename_all = "camelCase")]
    AssignPendingDie {
        actor_id: PlayerId,
        die_index: usize,
        controller_id: PlayerId,
    },
    #[serde(rename_all = "camelCase")]
    ForfeitPendingDie {
        actor_id: PlayerId,
        #[serde(default)]
        die_index: Option<usize>,
    },
}

impl ClientMessage {
    /// The seat that sent the message.
    #[must_use]
    pub fn actor(&self) -> PlayerId {
        match self {
            ClientMessage::Roll { actor_id, .. }
            | ClientMessage::GetLegalMoves { actor_id, .. }
            | ClientMessage::Move { actor_id, .. }
            | ClientMessage::AssignPendingDie { actor_id, .. }
            | ClientMessage::ForfeitPendingDie { actor_id, .. } => *actor_id,
        }
    }

    /// Message kind as it appears on the wire.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            ClientMessage::Roll { .. } => "roll",
            ClientMessage::GetLegalMoves { .. } => "getLegalMoves",
            ClientMessage::Move { .. } => "move",
            ClientMessage::AssignPendingDie { .. } => "assignPendingDie",
            ClientMessage::ForfeitPendingDie { .. } => "forfeitPendingDie",
        }
    }
}

/// One entry of a legal-move listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalMoveEntry {
    pub id: String,
    #[serde(rename = "move")]
    pub mv: Move,
}

impl From<Move> for LegalMoveEntry {
    fn from(mv: Move) -> Self {
        Self { id: mv.id(), mv }
    }
}

/// Turn ownership and dice as seen by clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnSnapshot {
    pub current_player: PlayerId,
    pub turn_number: u32,
    pub phase: TurnPhase,
    pub pending_dice: Vec<PendingDie>,
    pub banked_dice: u32,
    pub acting_actor: Option<PlayerId>,
}

/// A reply to one client message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    #[serde(rename_all = "camelCase")]
    LegalMoves {
        actor_id: PlayerId,
        die_index: usize,
        die: u8,
        moves: Vec<LegalMoveEntry>,
    },
    /// `result.next_state` and `result.after_hash` include any turn handoff
    /// the move triggered. `result.replay_entry.after_hash` is the state
    /// right after the move, before that handoff; the handoff is its own
    /// `pass` entry in the log.
    #[serde(rename_all = "camelCase")]
    MoveResult { result: MoveResult, turn: TurnSnapshot },
    #[serde(rename_all = "camelCase")]
    StateSync {
        state: GameState,
        state_hash: String,
        turn: TurnSnapshot,
    },
    Error { error: ErrorPayload },
}

impl ServerMessage {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, ServerMessage::Error { .. })
    }

    /// The error payload, if this is a rejection.
    #[must_use]
    pub fn error(&self) -> Option<&ErrorPayload> {
        match self {
            ServerMessage::Error { error } => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_client_wire_shape() {
        let roll: ClientMessage =
            serde_json::from_str(r#"{"type": "roll", "actorId": 1, "dice": [1, 5]}"#).unwrap();
        assert_eq!(
            roll,
            ClientMessage::Roll {
                actor_id: PlayerId::new(1),
                dice: vec![1, 5],
            }
        );
        assert_eq!(roll.kind(), "roll");

        let forfeit: ClientMessage =
            serde_json::from_str(r#"{"type": "forfeitPendingDie", "actorId": 0}"#).unwrap();
        assert_eq!(
            forfeit,
            ClientMessage::ForfeitPendingDie {
                actor_id: PlayerId::new(0),
                die_index: None,
            }
        );

        let assign = ClientMessage::AssignPendingDie {
            actor_id: PlayerId::new(0),
            die_index: 1,
            controller_id: PlayerId::new(2),
        };
        assert_eq!(
            serde_json::to_value(&assign).unwrap(),
            serde_json::json!({
                "type": "assignPendingDie",
                "actorId": 0,
                "dieIndex": 1,
                "controllerId": 2,
            })
        );
    }

    #[test]
    fn test_move_message_carries_move() {
        let json = r#"{
            "type": "move",
            "actorId": 0,
            "dieIndex": 0,
            "move": {
                "kind": "enter", "actor": 0, "pegIndex": 2, "die": 6,
                "from": {"zone": "base", "playerId": 0, "index": 2},
                "to": {"zone": "track", "index": 13},
                "path": [{"zone": "base", "playerId": 0, "index": 2}, {"zone": "track", "index": 13}],
                "captures": []
            }
        }"#;
        let message: ClientMessage = serde_json::from_str(json).unwrap();

        let ClientMessage::Move { mv, die_index, .. } = message else {
            panic!("expected a move message");
        };
        assert_eq!(die_index, Some(0));
        assert_eq!(mv.id(), "enter:p0:peg2:d6");
    }

    #[test]
    fn test_error_reply_shape() {
        let reply = ServerMessage::Error {
            error: ErrorPayload {
                code: ErrorCode::NotYourTurn,
                message: "nope".into(),
            },
        };

        assert!(reply.is_error());
        assert_eq!(
            serde_json::to_value(&reply).unwrap(),
            serde_json::json!({"type": "error", "error": {"code": "NOT_YOUR_TURN", "message": "nope"}})
        );
    }
}
