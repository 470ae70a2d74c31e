//! Turn and dice session: who may roll, who may spend which die, and when
//! the turn moves on.
//!
//! The rules engine answers "what is legal"; the session decides "who may
//! act now". Hosts feed it `ClientMessage`s one at a time and relay the
//! `ServerMessage` replies.

pub mod dice;
pub mod machine;
pub mod messages;

pub use dice::{PendingDie, TurnEconomy, TurnPhase};
pub use machine::{handle_client_message, validate_session, Session};
pub use messages::{ClientMessage, LegalMoveEntry, ServerMessage, TurnSnapshot};
