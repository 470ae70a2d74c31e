//! Rules engine trait.
//!
//! The session machine drives a game exclusively through `RulesEngine`:
//! - What moves are legal for one die
//! - How a move derives the next state
//! - Whether (and how) the game ended

use serde::{Deserialize, Serialize};

use crate::core::{EngineConfig, GameState, Move, PlayerId, TeamId};

/// Result of a completed game.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GameOutcome {
    /// Individual play: the first player to finish all four pegs.
    Winner {
        #[serde(rename = "playerId")]
        player_id: PlayerId,
    },
    /// Team play: the first team whose members all finished, members in
    /// the order they finished.
    Team {
        #[serde(rename = "teamId")]
        team_id: TeamId,
        members: Vec<PlayerId>,
    },
}

impl GameOutcome {
    /// Check if a player won.
    #[must_use]
    pub fn is_winner(&self, player: PlayerId) -> bool {
        match self {
            GameOutcome::Winner { player_id } => *player_id == player,
            GameOutcome::Team { members, .. } => members.contains(&player),
        }
    }
}

/// A derived state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveOutcome {
    pub state: GameState,
}

/// Rules engine trait.
///
/// ## Implementation Notes
///
/// - `legal_moves`: Pure; only `dice[0]` is consulted; never errors
/// - `apply_move`: Never mutates its input; does not judge legality
/// - Both must be deterministic: replays and remote peers rely on it
pub trait RulesEngine {
    /// Engine settings (validation mode).
    fn engine_config(&self) -> &EngineConfig;

    /// Enumerate every legal move for `actor` with the first die of `dice`.
    ///
    /// Returns empty for empty dice, an unknown actor or an inactive game.
    fn legal_moves(&self, state: &GameState, actor: PlayerId, dice: &[u8]) -> Vec<Move>;

    /// Derive the state after `mv`.
    fn apply_move(&self, state: &GameState, mv: &Move) -> MoveOutcome;

    /// The game's outcome, if it has ended.
    fn outcome(&self, state: &GameState) -> Option<GameOutcome> {
        state.outcome.clone()
    }

    // === Convenience Methods ===

    /// Whether `actor` can use a die of `value` at all.
    fn has_legal_move(&self, state: &GameState, actor: PlayerId, value: u8) -> bool {
        !self.legal_moves(state, actor, &[value]).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_outcome_is_winner() {
        let solo = GameOutcome::Winner {
            player_id: PlayerId::new(1),
        };
        assert!(!solo.is_winner(PlayerId::new(0)));
        assert!(solo.is_winner(PlayerId::new(1)));

        let team = GameOutcome::Team {
            team_id: TeamId::new(0),
            members: vec![PlayerId::new(2), PlayerId::new(0)],
        };
        assert!(team.is_winner(PlayerId::new(0)));
        assert!(!team.is_winner(PlayerId::new(1)));
        assert!(team.is_winner(PlayerId::new(2)));
    }

    #[test]
    fn test_game_outcome_wire_shape() {
        let solo = GameOutcome::Winner {
            player_id: PlayerId::new(3),
        };
        assert_eq!(
            serde_json::to_value(&solo).unwrap(),
            serde_json::json!({"kind": "winner", "playerId": 3})
        );
    }
}
