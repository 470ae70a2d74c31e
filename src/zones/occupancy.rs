//! Occupancy index: which peg stands on which exclusive spot.
//!
//! Built from a `GameState` on demand. Base slots are not indexed since
//! they are never contested.

use rustc_hash::FxHashMap;

use super::spot::{PegRef, SpotRef};
use crate::core::{GameState, PlayerId};

/// Lookup from exclusive spot to the peg standing on it.
///
/// ## Usage
///
/// ```
/// use pegboard::core::{GameConfig, GameState, PlayerId};
/// use pegboard::zones::{Occupancy, SpotRef};
///
/// let state = GameState::new(GameConfig::new(2)).unwrap().start();
/// let state = state.with_peg_position(PlayerId::new(1), 0, SpotRef::track(20));
///
/// let occupancy = Occupancy::of(&state);
/// assert_eq!(occupancy.at(SpotRef::track(20)).map(|p| p.player_id), Some(PlayerId::new(1)));
/// assert!(occupancy.at(SpotRef::track(21)).is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Occupancy {
    spots: FxHashMap<SpotRef, PegRef>,
    collisions: Vec<SpotRef>,
}

impl Occupancy {
    /// Index every peg on an exclusive spot.
    #[must_use]
    pub fn of(state: &GameState) -> Self {
        let mut occupancy = Self::default();

        for (player, pegs) in state.pegs.iter() {
            for peg in pegs.iter() {
                if !peg.position.is_exclusive() {
                    continue;
                }
                let key = PegRef::new(player, peg.peg_index);
                if occupancy.spots.insert(peg.position, key).is_some() {
                    occupancy.collisions.push(peg.position);
                }
            }
        }

        occupancy
    }

    /// The peg on a spot, if any.
    #[must_use]
    pub fn at(&self, spot: SpotRef) -> Option<PegRef> {
        self.spots.get(&spot).copied()
    }

    /// Whether one of `player`'s pegs is on the spot.
    #[must_use]
    pub fn is_own(&self, spot: SpotRef, player: PlayerId) -> bool {
        self.at(spot).is_some_and(|peg| peg.player_id == player)
    }

    /// The peg on a spot if it belongs to someone other than `player`.
    #[must_use]
    pub fn foreign(&self, spot: SpotRef, player: PlayerId) -> Option<PegRef> {
        self.at(spot).filter(|peg| peg.player_id != player)
    }

    /// Spots that more than one peg claims. Always empty for a valid state.
    #[must_use]
    pub fn collisions(&self) -> &[SpotRef] {
        &self.collisions
    }

    /// Number of occupied exclusive spots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spots.is_empty()
    }
}
