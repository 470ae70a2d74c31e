//! Board geometry: seat to track offsets.
//!
//! The track is a ring of arms, 14 squares each. Tables of up to four use a
//! four-arm board, five or six a six-arm board, seven or eight an eight-arm
//! board. Seat `s` owns arm `s`:
//!
//! ```text
//! arm offset:  0 .. 6 ....... 8 ........ 13
//!              entry  home    1-Spot     Point
//!                     entry
//! ```
//!
//! A peg travelling the ring reaches its own home-entry square last; the
//! step after it leads into the home lane.

use serde::{Deserialize, Serialize};

use super::spot::SpotRef;
use crate::core::PlayerId;

/// Squares per arm.
pub const ARM_LENGTH: usize = 14;

const HOME_ENTRY_OFFSET: usize = 6;
const ONE_SPOT_OFFSET: usize = 8;
const POINT_OFFSET: usize = 13;

/// Geometry of one board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Topology {
    arms: usize,
}

impl Topology {
    /// Board for a table of `player_count` players.
    #[must_use]
    pub fn for_players(player_count: usize) -> Self {
        let arms = match player_count {
            0..=4 => 4,
            5..=6 => 6,
            _ => 8,
        };
        Self { arms }
    }

    #[must_use]
    pub const fn arm_count(self) -> usize {
        self.arms
    }

    /// Total squares on the ring.
    #[must_use]
    pub const fn track_len(self) -> usize {
        self.arms * ARM_LENGTH
    }

    /// Wrap any (possibly negative) offset onto the ring.
    #[must_use]
    pub fn normalize(self, index: i64) -> usize {
        index.rem_euclid(self.track_len() as i64) as usize
    }

    /// First square of the seat's arm.
    #[must_use]
    pub fn entry_index(self, seat: PlayerId) -> usize {
        self.normalize((seat.index() * ARM_LENGTH) as i64)
    }

    /// Square a peg enters on with a roll of 1.
    #[must_use]
    pub fn one_spot(self, seat: PlayerId) -> usize {
        self.offset(seat, ONE_SPOT_OFFSET)
    }

    /// Square a peg enters on with a roll of 6.
    #[must_use]
    pub fn point(self, seat: PlayerId) -> usize {
        self.offset(seat, POINT_OFFSET)
    }

    /// Last track square before the seat's home lane.
    #[must_use]
    pub fn home_entry_index(self, seat: PlayerId) -> usize {
        self.offset(seat, HOME_ENTRY_OFFSET)
    }

    /// The Point on the arm before the seat's own; fast-track hops stop here.
    #[must_use]
    pub fn last_point_before_home(self, seat: PlayerId) -> usize {
        self.normalize(self.entry_index(seat) as i64 - 1)
    }

    /// Next square clockwise.
    #[must_use]
    pub fn next_track(self, index: usize) -> usize {
        (index + 1) % self.track_len()
    }

    /// Next Point clockwise from a Point.
    #[must_use]
    pub fn next_point(self, index: usize) -> usize {
        (index + ARM_LENGTH) % self.track_len()
    }

    /// Every Point on the board in arm order.
    pub fn points(self) -> impl Iterator<Item = usize> {
        (0..self.arms).map(|arm| arm * ARM_LENGTH + POINT_OFFSET)
    }

    #[must_use]
    pub fn is_point(self, index: usize) -> bool {
        index < self.track_len() && index % ARM_LENGTH == POINT_OFFSET
    }

    /// Whether a spot reference is within this board's bounds.
    #[must_use]
    pub fn contains(self, spot: SpotRef) -> bool {
        match spot {
            SpotRef::Track { index } => index < self.track_len(),
            _ => true,
        }
    }

    fn offset(self, seat: PlayerId, offset: usize) -> usize {
        self.normalize((self.entry_index(seat) + offset) as i64)
    }
}
