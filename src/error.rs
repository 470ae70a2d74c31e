//! Error taxonomy.
//!
//! - `SessionError`: recoverable request rejections, reported to the caller
//!   as an `ErrorPayload` with a wire `ErrorCode`
//! - `ReplayError`: a replay file that cannot be loaded or does not replay
//! - `ConfigError`: an unusable game configuration
//! - `InvariantViolation`: a broken structural invariant (programmer error)

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{PlayerId, TeamId};
use crate::zones::SpotRef;

/// Wire error codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    IllegalMove,
    WrongActor,
    NotYourTurn,
    InvalidInput,
    GameEnded,
    BadTurnState,
}

impl ErrorCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::IllegalMove => "ILLEGAL_MOVE",
            ErrorCode::WrongActor => "WRONG_ACTOR",
            ErrorCode::NotYourTurn => "NOT_YOUR_TURN",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::GameEnded => "GAME_ENDED",
            ErrorCode::BadTurnState => "BAD_TURN_STATE",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured error as sent back to the transport collaborator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

/// A rejected request. Rejections never change session or game state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("it is {expected}'s turn, not {actual}'s")]
    NotYourTurn { expected: PlayerId, actual: PlayerId },
    #[error("{actor}: you do not control this die (die {die_index})")]
    NotDieController { actor: PlayerId, die_index: usize },
    #[error("move belongs to {found}, request came from {actor}")]
    ActorMismatch { actor: PlayerId, found: PlayerId },
    #[error("{0}")]
    WrongActor(String),
    #[error("no legal moves to resolve for die {die_index} (value {value})")]
    NoLegalMoves { die_index: usize, value: u8 },
    #[error("move {0} is not legal")]
    IllegalMove(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("the game has ended")]
    GameEnded,
    #[error("{0}")]
    BadTurnState(String),
}

impl SessionError {
    /// Wire code for this rejection.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionError::NotYourTurn { .. } => ErrorCode::NotYourTurn,
            SessionError::NotDieController { .. }
            | SessionError::ActorMismatch { .. }
            | SessionError::WrongActor(_) => ErrorCode::WrongActor,
            SessionError::NoLegalMoves { .. } | SessionError::IllegalMove(_) => {
                ErrorCode::IllegalMove
            }
            SessionError::InvalidInput(_) => ErrorCode::InvalidInput,
            SessionError::GameEnded => ErrorCode::GameEnded,
            SessionError::BadTurnState(_) => ErrorCode::BadTurnState,
        }
    }

    /// Convert into the wire payload.
    #[must_use]
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl From<SessionError> for ErrorPayload {
    fn from(error: SessionError) -> Self {
        error.payload()
    }
}

/// A replay file that failed validation or replay.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("unsupported replay format version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("createdAt is not an ISO-8601 timestamp: {0:?}")]
    InvalidTimestamp(String),
    #[error("replay file has no initial state")]
    MissingInitialState,
    #[error("log entry {entry} is missing {field}")]
    MissingHash { entry: usize, field: &'static str },
    #[error("log entry {entry}: {field} mismatch (recorded {recorded}, replayed {replayed})")]
    HashMismatch {
        entry: usize,
        field: &'static str,
        recorded: String,
        replayed: String,
    },
    #[error("log entry {entry}: recorded move is not legal in the replayed state")]
    IllegalEntry { entry: usize },
    #[error("malformed replay JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// An unusable game configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("player count must be between 2 and 8, got {0}")]
    InvalidPlayerCount(usize),
    #[error("team play requires a team roster")]
    MissingRoster,
    #[error("{0} has no members")]
    EmptyTeam(TeamId),
    #[error("{0} is not seated at this table")]
    UnknownMember(PlayerId),
    #[error("{0} appears in more than one team")]
    DuplicateMember(PlayerId),
    #[error("{0} is not on any team")]
    Unassigned(PlayerId),
    #[error("malformed config JSON: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Json(error.to_string())
    }
}

/// A structural invariant that no legal transition can break.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("{player} peg {peg} has index {found} in its own slot")]
    PegIndexMismatch { player: PlayerId, peg: usize, found: u8 },
    #[error("{player} peg {peg} sits on a foreign or out-of-range spot {spot:?}")]
    MisplacedPeg { player: PlayerId, peg: usize, spot: SpotRef },
    #[error("{spot:?} is occupied more than once")]
    DoubleOccupancy { spot: SpotRef },
    #[error("{player} peg {peg} is marked finished outside home")]
    FinishedOutsideHome { player: PlayerId, peg: usize },
    #[error("{player} has {finished} finished pegs but hasFinished = {flag}")]
    FinishFlagMismatch { player: PlayerId, finished: usize, flag: bool },
    #[error("finishedOrder disagrees with player flags at {player}")]
    FinishOrderMismatch { player: PlayerId },
    #[error("{player} finished pegs do not fill home from index 3 down")]
    FinishSlotMismatch { player: PlayerId },
    #[error("phase and outcome disagree")]
    OutcomePhaseMismatch,
    #[error("{player} has team {found:?}, roster says {expected:?}")]
    TeamMismatch {
        player: PlayerId,
        found: Option<TeamId>,
        expected: Option<TeamId>,
    },
    #[error("turn owner {0} is not seated")]
    UnknownTurnOwner(PlayerId),
    #[error("pending die {die_index}: {reason}")]
    PendingDie { die_index: usize, reason: String },
    #[error("acting actor {actor} controls no pending die")]
    DanglingActingActor { actor: PlayerId },
}
