//! State hashing, canonical serialization and replay files.

pub mod hash;
pub mod log;

pub use hash::{deserialize_state, hash_state, serialize_state, PROTOCOL_VERSION};
pub use log::{validate_replay_file, ReplayEntry, ReplayFile, ReplayLog, REPLAY_FORMAT_VERSION};
