//! Core types: players, configuration, state, moves, dice.
//!
//! Everything here is plain data. The rules that read and derive these
//! values live in `rules`; the turn economy lives in `session`.

pub mod config;
pub mod moves;
pub mod player;
pub mod rng;
pub mod state;

pub use config::{
    EngineConfig, GameConfig, GameOptions, TeamConfig, TeamId, ValidationMode, MAX_PLAYERS,
    MIN_PLAYERS,
};
pub use moves::{Capture, Move, MoveKind, MovePath, PassMove, PegMove};
pub use player::{PlayerId, PlayerMap};
pub use rng::{DiceRng, DiceRngState, DiceRoll, DIE_FACES};
pub use state::{GamePhase, GameState, PegSet, PegState, PlayerState, TurnState, PEGS_PER_PLAYER};
