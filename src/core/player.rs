//! Player identification and per-seat data storage.
//!
//! ## PlayerId
//!
//! A player is identified by their seat index (0-based). Seat order is
//! turn order, so `PlayerId::next_seat` is the turn-handoff successor.
//!
//! ## PlayerMap
//!
//! Per-seat storage backed by a persistent `im::Vector`. Cloning a map is
//! O(1) and updating one seat copies only the touched chunk, so states can
//! be derived from one another without ever mutating the original.

use im::Vector;
use serde::{Deserialize, Serialize};
use std::ops::Index;

use super::config::{MAX_PLAYERS, MIN_PLAYERS};

/// Player identifier, equal to the player's seat index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that plays after this one, wrapping around the table.
    ///
    /// ```
    /// use pegboard::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::new(0).next_seat(4), PlayerId::new(1));
    /// assert_eq!(PlayerId::new(3).next_seat(4), PlayerId::new(0));
    /// ```
    #[must_use]
    pub fn next_seat(self, player_count: usize) -> Self {
        Self(((self.index() + 1) % player_count) as u8)
    }

    /// Every seat at a table of `player_count`, in turn order.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "p{}", self.0)
    }
}

/// One value per seat, sharing structure between derived states.
///
/// ```
/// use pegboard::core::{PlayerId, PlayerMap};
///
/// let finished = PlayerMap::new(4, |_| false);
/// let updated = finished.update(PlayerId::new(1), true);
///
/// assert!(!finished[PlayerId::new(1)]);
/// assert!(updated[PlayerId::new(1)]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerMap<T: Clone> {
    seats: Vector<T>,
}

impl<T: Clone> PlayerMap<T> {
    /// Fill every seat from `init`, in seat order.
    pub fn new(player_count: usize, init: impl Fn(PlayerId) -> T) -> Self {
        debug_assert!(
            (MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count),
            "{player_count} seats"
        );
        Self {
            seats: PlayerId::all(player_count).map(init).collect(),
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.seats.len()
    }

    /// A seat's value, or `None` for a seat that does not exist.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> Option<&T> {
        self.seats.get(player.index())
    }

    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        player.index() < self.seats.len()
    }

    /// A new map with one seat replaced; `self` is untouched.
    #[must_use]
    pub fn update(&self, player: PlayerId, value: T) -> Self {
        if !self.contains(player) {
            return self.clone();
        }
        Self {
            seats: self.seats.update(player.index(), value),
        }
    }

    /// Replace one seat in place. Unknown seats are ignored.
    pub fn set(&mut self, player: PlayerId, value: T) {
        if let Some(slot) = self.seats.get_mut(player.index()) {
            *slot = value;
        }
    }

    /// `(seat, value)` pairs in seat order.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.seats
            .iter()
            .enumerate()
            .map(|(seat, value)| (PlayerId(seat as u8), value))
    }
}

impl<T: Clone> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.seats[player.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const P0: PlayerId = PlayerId::new(0);
    const P2: PlayerId = PlayerId::new(2);

    #[test]
    fn test_seat_display() {
        assert_eq!(P2.index(), 2);
        assert_eq!(P2.to_string(), "p2");
        assert_eq!(serde_json::to_string(&P2).unwrap(), "2");
    }

    #[test]
    fn test_next_seat_wraps() {
        assert_eq!(PlayerId::new(1).next_seat(2), P0);
        assert_eq!(PlayerId::new(4).next_seat(6), PlayerId::new(5));
        assert_eq!(PlayerId::new(7).next_seat(8), P0);
    }

    #[test]
    fn test_unknown_seat() {
        let map = PlayerMap::new(4, |p| p.index() * 10);

        assert_eq!(map[PlayerId::new(3)], 30);
        assert_eq!(map.get(PlayerId::new(4)), None);
        assert!(!map.contains(PlayerId::new(4)));
        assert_eq!(map.update(PlayerId::new(4), 1), map);
    }

    #[test]
    fn test_update_leaves_original() {
        let map = PlayerMap::new(3, |_| 0u32);
        let next = map.update(P2, 7);

        assert_eq!(map[P2], 0);
        assert_eq!(next[P2], 7);

        let mut owned = next.clone();
        owned.set(P0, 1);
        assert_eq!(next[P0], 0);
        assert_eq!(owned.iter().map(|(_, v)| *v).collect::<Vec<_>>(), vec![1, 0, 7]);
    }

    #[test]
    fn test_serializes_as_seat_array() {
        let map = PlayerMap::new(2, |p| p.index() == 1);
        let json = serde_json::to_string(&map).unwrap();

        assert_eq!(json, "[false,true]");
        assert_eq!(serde_json::from_str::<PlayerMap<bool>>(&json).unwrap(), map);
    }
}
