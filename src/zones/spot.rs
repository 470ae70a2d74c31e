//! Board locations.
//!
//! Every peg is always in exactly one of four zones:
//!
//! | Zone | Owner | Exclusive |
//! |---|---|---|
//! | `Base` | per player, one slot per peg | no |
//! | `Track` | shared ring | across all players |
//! | `Home` | per player, indices 0..4 | within owner |
//! | `Center` | shared single slot | across all players |

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Number of slots in a home lane.
pub const HOME_LENGTH: u8 = 4;

/// A location on the board.
///
/// Serialises as a tagged object, e.g. `{"zone":"home","playerId":0,"index":0}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "zone", rename_all = "camelCase")]
pub enum SpotRef {
    Base {
        #[serde(rename = "playerId")]
        player: PlayerId,
        index: u8,
    },
    Track {
        index: usize,
    },
    Home {
        #[serde(rename = "playerId")]
        player: PlayerId,
        index: u8,
    },
    Center,
}

impl SpotRef {
    #[must_use]
    pub const fn base(player: PlayerId, index: u8) -> Self {
        SpotRef::Base { player, index }
    }

    #[must_use]
    pub const fn track(index: usize) -> Self {
        SpotRef::Track { index }
    }

    #[must_use]
    pub const fn home(player: PlayerId, index: u8) -> Self {
        SpotRef::Home { player, index }
    }

    #[must_use]
    pub const fn is_base(self) -> bool {
        matches!(self, SpotRef::Base { .. })
    }

    #[must_use]
    pub const fn is_home(self) -> bool {
        matches!(self, SpotRef::Home { .. })
    }

    /// Track index, if this is a track spot.
    #[must_use]
    pub const fn track_index(self) -> Option<usize> {
        match self {
            SpotRef::Track { index } => Some(index),
            _ => None,
        }
    }

    /// Whether at most one peg may occupy this spot.
    #[must_use]
    pub const fn is_exclusive(self) -> bool {
        !self.is_base()
    }
}

impl std::fmt::Display for SpotRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpotRef::Base { player, index } => write!(f, "base:{player}:{index}"),
            SpotRef::Track { index } => write!(f, "track:{index}"),
            SpotRef::Home { player, index } => write!(f, "home:{player}:{index}"),
            SpotRef::Center => f.write_str("center"),
        }
    }
}

/// One specific peg: its owner and its index within the owner's four.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PegRef {
    pub player_id: PlayerId,
    pub peg_index: u8,
}

impl PegRef {
    #[must_use]
    pub const fn new(player_id: PlayerId, peg_index: u8) -> Self {
        Self {
            player_id,
            peg_index,
        }
    }
}
