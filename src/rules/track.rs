//! The track-and-home rules engine.

use serde::{Deserialize, Serialize};

use super::engine::{MoveOutcome, RulesEngine};
use super::{movegen, mutator};
use crate::core::{EngineConfig, GameState, Move, PlayerId, TurnState, ValidationMode, DIE_FACES};
use crate::error::{ErrorPayload, SessionError};
use crate::replay::ReplayEntry;

/// Rules for the four-peg track game.
///
/// ## Example
///
/// ```
/// use pegboard::core::{GameConfig, GameState, PlayerId};
/// use pegboard::rules::{RulesEngine, TrackRules};
///
/// let rules = TrackRules::new();
/// let state = GameState::new(GameConfig::new(2)).unwrap().start();
///
/// let moves = rules.legal_moves(&state, PlayerId::new(0), &[6]);
/// assert_eq!(moves.len(), 4);
///
/// let next = rules.apply_move(&state, &moves[0]).state;
/// assert!(next.peg(PlayerId::new(0), 0).unwrap().position.track_index().is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct TrackRules {
    config: EngineConfig,
}

impl TrackRules {
    /// Rules with strict invariant checking.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Check `mv` against the legal set, then apply it.
    ///
    /// The die is `dice[0]`. Turn ownership is the session's concern and is
    /// only enforced here for passes.
    pub fn try_apply_move(
        &self,
        state: &GameState,
        actor: PlayerId,
        dice: &[u8],
        mv: &Move,
    ) -> Result<MoveAccepted, SessionError> {
        if state.is_ended() {
            return Err(SessionError::GameEnded);
        }
        if !state.is_active() {
            return Err(SessionError::BadTurnState("the game has not started".into()));
        }
        let Some(&die) = dice.first() else {
            return Err(SessionError::InvalidInput("no dice supplied".into()));
        };
        if !(1..=DIE_FACES).contains(&die) {
            return Err(SessionError::InvalidInput(format!("die value {die} is out of range")));
        }
        if mv.actor() != actor {
            return Err(SessionError::ActorMismatch {
                actor,
                found: mv.actor(),
            });
        }

        match mv {
            Move::Pass(pass) => {
                let owner = state.current_player();
                if owner != actor {
                    return Err(SessionError::NotYourTurn {
                        expected: owner,
                        actual: actor,
                    });
                }
                if !state.is_seated(pass.next) {
                    return Err(SessionError::InvalidInput(format!(
                        "{} is not seated",
                        pass.next
                    )));
                }
                if self.has_legal_move(state, actor, die) {
                    return Err(SessionError::IllegalMove(mv.id()));
                }
            }
            _ => {
                let legal = self.legal_moves(state, actor, dice);
                if legal.is_empty() {
                    return Err(SessionError::NoLegalMoves {
                        die_index: 0,
                        value: die,
                    });
                }
                if !legal.contains(mv) {
                    return Err(SessionError::IllegalMove(mv.id()));
                }
            }
        }

        let next_state = self.apply_move(state, mv).state;
        let replay_entry = ReplayEntry::record(state, mv, &next_state);
        Ok(MoveAccepted {
            turn: next_state.turn,
            result: MoveResult {
                after_hash: replay_entry.after_hash.clone(),
                next_state,
                replay_entry,
            },
        })
    }

    /// `try_apply_move` in wire form.
    #[must_use]
    pub fn try_apply_move_with_response(
        &self,
        state: &GameState,
        actor: PlayerId,
        dice: &[u8],
        mv: &Move,
    ) -> MoveResponse {
        let response = MoveResponse::from(self.try_apply_move(state, actor, dice, mv));
        if let Some(error) = &response.error {
            tracing::warn!(%actor, code = %error.code, message = %error.message, "move rejected");
        }
        response
    }
}

impl RulesEngine for TrackRules {
    fn engine_config(&self) -> &EngineConfig {
        &self.config
    }

    fn legal_moves(&self, state: &GameState, actor: PlayerId, dice: &[u8]) -> Vec<Move> {
        movegen::legal_moves(state, actor, dice)
    }

    fn apply_move(&self, state: &GameState, mv: &Move) -> MoveOutcome {
        let next = mutator::apply_move(state, mv);

        if self.config.validation == ValidationMode::Strict {
            if let Err(violation) = mutator::validate_state(&next) {
                panic!("invariant violated after {mv}: {violation}");
            }
        }

        MoveOutcome { state: next }
    }
}

/// A validated, applied move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResult {
    pub next_state: GameState,
    pub after_hash: String,
    pub replay_entry: ReplayEntry,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveAccepted {
    pub result: MoveResult,
    pub turn: TurnState,
}

/// Wire response: `{ok: true, result, turn}` or `{ok: false, error}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<MoveResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turn: Option<TurnState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

impl From<Result<MoveAccepted, SessionError>> for MoveResponse {
    fn from(result: Result<MoveAccepted, SessionError>) -> Self {
        match result {
            Ok(accepted) => Self {
                ok: true,
                result: Some(accepted.result),
                turn: Some(accepted.turn),
                error: None,
            },
            Err(error) => Self {
                ok: false,
                result: None,
                turn: None,
                error: Some(error.payload()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, PassMove};
    use crate::error::ErrorCode;
    use crate::replay::hash_state;
    use crate::zones::SpotRef;

    const P0: PlayerId = PlayerId::new(0);
    const P1: PlayerId = PlayerId::new(1);

    fn two_player() -> GameState {
        GameState::new(GameConfig::new(2)).unwrap().start()
    }

    #[test]
    fn test_accepts_legal_move() {
        let rules = TrackRules::new();
        let state = two_player();
        let mv = rules.legal_moves(&state, P0, &[1]).remove(2);

        let accepted = rules.try_apply_move(&state, P0, &[1], &mv).unwrap();
        assert_eq!(
            accepted.result.next_state.peg(P0, 2).unwrap().position,
            SpotRef::track(8)
        );
        assert_eq!(accepted.result.replay_entry.before_hash, hash_state(&state));
        assert_eq!(hash_state(&accepted.result.next_state), accepted.result.after_hash);
        assert_eq!(accepted.turn, state.turn);
    }

    #[test]
    fn test_rejections() {
        let rules = TrackRules::new();
        let state = two_player();
        let enter = rules.legal_moves(&state, P0, &[6]).remove(0);

        let err = rules.try_apply_move(&state, P0, &[5], &enter).unwrap_err();
        assert_eq!(err, SessionError::NoLegalMoves { die_index: 0, value: 5 });

        let err = rules.try_apply_move(&state, P1, &[6], &enter).unwrap_err();
        assert_eq!(err.code(), ErrorCode::WrongActor);

        let err = rules.try_apply_move(&state, P0, &[], &enter).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        let err = rules.try_apply_move(&state, P0, &[9], &enter).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        let ones = rules.legal_moves(&state, P0, &[1]).remove(0);
        let err = rules.try_apply_move(&state, P0, &[6], &ones).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IllegalMove);

        let lobby = GameState::new(GameConfig::new(2)).unwrap();
        let err = rules.try_apply_move(&lobby, P0, &[6], &enter).unwrap_err();
        assert_eq!(err.code(), ErrorCode::BadTurnState);
    }

    #[test]
    fn test_pass_only_without_moves() {
        let rules = TrackRules::new();
        let state = two_player();
        let pass = Move::Pass(PassMove { actor: P0, next: P1 });

        let err = rules.try_apply_move(&state, P0, &[6], &pass).unwrap_err();
        assert_eq!(err.code(), ErrorCode::IllegalMove);

        let accepted = rules.try_apply_move(&state, P0, &[4], &pass).unwrap();
        assert_eq!(accepted.turn.current_player, P1);
        assert_eq!(accepted.turn.turn_number, 2);

        let not_owner = Move::Pass(PassMove { actor: P1, next: P0 });
        let err = rules.try_apply_move(&state, P1, &[4], &not_owner).unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotYourTurn);
    }

    #[test]
    fn test_response_wire_shape() {
        let rules = TrackRules::new();
        let state = two_player();
        let enter = rules.legal_moves(&state, P0, &[6]).remove(0);

        let ok = serde_json::to_value(rules.try_apply_move_with_response(&state, P0, &[6], &enter))
            .unwrap();
        assert_eq!(ok["ok"], true);
        assert!(ok["result"]["afterHash"].is_string());
        assert!(ok["result"]["replayEntry"]["move"].is_object());
        assert_eq!(ok["turn"]["currentPlayer"], 0);
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(rules.try_apply_move_with_response(&state, P0, &[2], &enter))
            .unwrap();
        assert_eq!(err["ok"], false);
        assert_eq!(err["error"]["code"], "ILLEGAL_MOVE");
        assert!(err.get("result").is_none());
    }

    #[test]
    #[should_panic(expected = "invariant violated")]
    fn test_strict_mode_panics_on_broken_state() {
        let rules = TrackRules::new();
        let state = two_player().with_turn(PlayerId::new(6));
        let pass = Move::Pass(PassMove { actor: PlayerId::new(6), next: PlayerId::new(7) });
        let _ = rules.apply_move(&state, &pass);
    }

    #[test]
    fn test_validation_off_skips_checks() {
        let rules = TrackRules::with_config(EngineConfig::default().with_validation(ValidationMode::Off));
        let state = two_player().with_turn(PlayerId::new(6));
        let pass = Move::Pass(PassMove { actor: PlayerId::new(6), next: PlayerId::new(7) });

        assert_eq!(rules.apply_move(&state, &pass).state.current_player(), PlayerId::new(7));
    }
}
