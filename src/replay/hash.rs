//! Canonical state fingerprint and text form.
//!
//! The hash input is the bincode encoding of the state, which follows
//! struct declaration order and walks every collection in order. Bumping
//! `PROTOCOL_VERSION` changes every hash, so peers on different protocol
//! versions never agree by accident.

use crate::core::GameState;

/// Protocol version mixed into every state hash.
pub const PROTOCOL_VERSION: u32 = 1;

const HASH_DOMAIN: &[u8] = b"pegboard/state";

/// BLAKE3 fingerprint of a state, hex encoded.
///
/// Structurally equal states hash equal; any field difference changes the
/// hash.
#[must_use]
pub fn hash_state(state: &GameState) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(HASH_DOMAIN);
    hasher.update(&PROTOCOL_VERSION.to_le_bytes());
    if let Err(error) = bincode::serialize_into(&mut hasher, state) {
        // The hasher never fails a write and the state has no fallible
        // serialize impls.
        tracing::error!(%error, "state encoding failed while hashing");
    }
    hasher.finalize().to_hex().to_string()
}

/// Canonical JSON text of a state.
pub fn serialize_state(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Parse a state produced by `serialize_state`.
pub fn deserialize_state(text: &str) -> Result<GameState, serde_json::Error> {
    serde_json::from_str(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, PlayerId};
    use crate::zones::SpotRef;

    fn sample() -> GameState {
        GameState::new(GameConfig::new(3).with_double_dice(true))
            .unwrap()
            .start()
            .with_peg_position(PlayerId::new(1), 2, SpotRef::track(17))
    }

    #[test]
    fn test_equal_states_hash_equal() {
        let a = sample();
        let b = deserialize_state(&serialize_state(&a).unwrap()).unwrap();

        assert_eq!(a, b);
        assert_eq!(hash_state(&a), hash_state(&b));
        assert_eq!(hash_state(&a).len(), 64);
    }

    #[test]
    fn test_single_field_changes_hash() {
        let base = sample();

        let mut turned = base.clone();
        turned.turn.turn_number += 1;
        assert_ne!(hash_state(&base), hash_state(&turned));

        let moved = base.with_peg_position(PlayerId::new(1), 2, SpotRef::track(18));
        assert_ne!(hash_state(&base), hash_state(&moved));

        let mut optioned = base.clone();
        optioned.config.options.fast_track = true;
        assert_ne!(hash_state(&base), hash_state(&optioned));
    }

    #[test]
    fn test_text_round_trip_is_exact() {
        let state = sample();
        let text = serialize_state(&state).unwrap();

        assert_eq!(serialize_state(&deserialize_state(&text).unwrap()).unwrap(), text);
    }

    #[test]
    fn test_deserialize_rejects_garbage() {
        assert!(deserialize_state("{\"phase\": 3}").is_err());
    }
}
