//! Rules: move generation, state transitions and the engine that joins them.
//!
//! - `movegen`: every legal move for one actor and one die
//! - `mutator`: how a move derives the next state, plus `validate_state`
//! - `track`: `TrackRules`, the `RulesEngine` implementation
//!
//! The session machine calls into `RulesEngine` and never walks the board
//! itself.

pub mod engine;
pub mod movegen;
pub mod mutator;
pub mod track;

pub use engine::{GameOutcome, MoveOutcome, RulesEngine};
pub use movegen::legal_moves;
pub use mutator::{apply_move, validate_state};
pub use track::{MoveAccepted, MoveResponse, MoveResult, TrackRules};
