//! # pegboard
//!
//! A deterministic rules engine and turn/dice session machine for
//! track-and-home peg games for two to eight players.
//!
//! ## Design Principles
//!
//! 1. **Pure Rules**: `legal_moves` and `apply_move` take a state by
//!    reference and never change it. Same input, same output, on every peer.
//!
//! 2. **States Are Values**: `GameState` uses persistent `im` collections,
//!    so deriving a state shares everything the move did not touch.
//!
//! 3. **Everything Is Replayable**: every state change, turn handoffs
//!    included, goes through `apply_move` and lands in the replay log with
//!    the hashes of the states on either side.
//!
//! ## Modules
//!
//! - `core`: Players, configuration, state, moves, dice RNG
//! - `zones`: Board spots, seat geometry, occupancy index
//! - `rules`: Move generation, state transitions, `RulesEngine`
//! - `replay`: State hashing, canonical serialization, replay files
//! - `session`: Turn and dice session machine, client/server messages
//! - `error`: Error types and wire error codes

pub mod core;
pub mod error;
pub mod replay;
pub mod rules;
pub mod session;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    DiceRng, DiceRngState, EngineConfig, GameConfig, GameOptions, GamePhase, GameState, Move,
    MoveKind, PassMove, PegMove, PegState, PlayerId, PlayerMap, PlayerState, TeamConfig, TeamId,
    TurnState, ValidationMode,
};

pub use crate::zones::{Occupancy, PegRef, SpotRef, Topology};

pub use crate::rules::{
    apply_move, legal_moves, validate_state, GameOutcome, MoveOutcome, MoveResponse, MoveResult,
    RulesEngine, TrackRules,
};

pub use crate::replay::{
    deserialize_state, hash_state, serialize_state, validate_replay_file, ReplayEntry, ReplayFile,
    ReplayLog,
};

pub use crate::session::{
    handle_client_message, ClientMessage, PendingDie, ServerMessage, Session, TurnEconomy,
};

pub use crate::error::{
    ConfigError, ErrorCode, ErrorPayload, InvariantViolation, ReplayError, SessionError,
};
