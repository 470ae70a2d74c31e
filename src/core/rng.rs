//! Deterministic dice for hosts that roll server-side.
//!
//! The rules engine and the session machine never roll: dice arrive as
//! input. `DiceRng` is the host-side roller that produces those inputs
//! reproducibly.
//!
//! ## Key Features
//!
//! - **Deterministic**: Same seed produces identical rolls
//! - **Per-room streams**: Independent sequences derived from one seed
//! - **Serializable**: O(1) state capture and restore
//!
//! ```
//! use pegboard::core::DiceRng;
//!
//! let mut a = DiceRng::new(42);
//! let mut b = DiceRng::new(42);
//! assert_eq!(a.roll(2), b.roll(2));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Dice faces.
pub const DIE_FACES: u8 = 6;

/// Rolled dice, in roll order.
pub type DiceRoll = SmallVec<[u8; 2]>;

/// Deterministic six-sided dice roller.
///
/// Uses ChaCha8 for speed with high-quality output.
#[derive(Clone, Debug)]
pub struct DiceRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl DiceRng {
    /// Create a roller with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Derive an independent stream for a named context (e.g. a room id).
    ///
    /// The derivation hashes with BLAKE3, so the same seed and context give
    /// the same stream on every platform and toolchain.
    #[must_use]
    pub fn for_context(&self, context: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(context.as_bytes());
        let digest = hasher.finalize();

        let mut seed_bytes = [0u8; 8];
        seed_bytes.copy_from_slice(&digest.as_bytes()[..8]);
        Self::new(u64::from_le_bytes(seed_bytes))
    }

    /// Roll one die.
    pub fn roll_die(&mut self) -> u8 {
        self.inner.gen_range(1..=DIE_FACES)
    }

    /// Roll `count` dice.
    pub fn roll(&mut self, count: usize) -> DiceRoll {
        (0..count).map(|_| self.roll_die()).collect()
    }

    /// Get the current state for serialization.
    #[must_use]
    pub fn state(&self) -> DiceRngState {
        DiceRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
        }
    }

    /// Restore from a saved state.
    #[must_use]
    pub fn from_state(state: &DiceRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
        }
    }
}

/// Serializable roller state for checkpointing.
///
/// Uses the ChaCha8 word position for O(1) serialization regardless of
/// how many dice have been rolled.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRngState {
    /// Original seed
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter)
    pub word_pos: u128,
}
