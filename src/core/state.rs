//! Game state: the root aggregate the rules engine reads and derives.
//!
//! ## GameState
//!
//! - Phase (lobby, active, ended) and configuration
//! - Per-player flags (finished, team)
//! - Per-player pegs and their positions
//! - Turn ownership
//! - Finish order and, once decided, the outcome
//!
//! States are values. Every transition produces a new `GameState`; the
//! per-seat maps and the finish order are persistent `im` structures, so a
//! derived state shares everything it did not touch with its parent.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::config::{GameConfig, TeamId};
use super::player::{PlayerId, PlayerMap};
use crate::error::ConfigError;
use crate::rules::GameOutcome;
use crate::zones::{SpotRef, Topology, HOME_LENGTH};

/// Pegs per player.
pub const PEGS_PER_PLAYER: usize = 4;

/// Game lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GamePhase {
    Lobby,
    Active,
    Ended,
}

/// Per-player flags.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerState {
    /// All four pegs finished.
    pub has_finished: bool,
    /// Team membership under team play.
    pub team_id: Option<TeamId>,
}

/// One peg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PegState {
    pub peg_index: u8,
    pub position: SpotRef,
    pub is_finished: bool,
}

impl PegState {
    /// A peg resting in its base slot.
    #[must_use]
    pub const fn at_base(player: PlayerId, peg_index: u8) -> Self {
        Self {
            peg_index,
            position: SpotRef::base(player, peg_index),
            is_finished: false,
        }
    }
}

/// A player's four pegs, indexed by peg index.
pub type PegSet = [PegState; PEGS_PER_PLAYER];

/// Who is to act.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnState {
    pub current_player: PlayerId,
    /// Starts at 1, incremented on every handoff.
    pub turn_number: u32,
}

/// Complete game state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub phase: GamePhase,
    pub config: GameConfig,
    pub players: PlayerMap<PlayerState>,
    pub pegs: PlayerMap<PegSet>,
    pub turn: TurnState,
    /// Players in the order their fourth peg finished. Append-only.
    pub finished_order: Vector<PlayerId>,
    /// Set exactly once, when the game ends.
    pub outcome: Option<GameOutcome>,
}

impl GameState {
    /// Create a game in the lobby with every peg in its base.
    ///
    /// ## Defaults
    ///
    /// - `phase`: Lobby
    /// - `turn.current_player`: seat 0
    /// - `turn.turn_number`: 1
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let player_count = config.player_count;
        let players = PlayerMap::new(player_count, |p| PlayerState {
            has_finished: false,
            team_id: config.team_of(p).map(|t| t.id),
        });
        let pegs = PlayerMap::new(player_count, |p| {
            std::array::from_fn(|i| PegState::at_base(p, i as u8))
        });

        Ok(Self {
            phase: GamePhase::Lobby,
            config,
            players,
            pegs,
            turn: TurnState {
                current_player: PlayerId::new(0),
                turn_number: 1,
            },
            finished_order: Vector::new(),
            outcome: None,
        })
    }

    /// The same game, started. Only a lobby game changes phase.
    #[must_use]
    pub fn start(&self) -> Self {
        let mut next = self.clone();
        if next.phase == GamePhase::Lobby {
            next.phase = GamePhase::Active;
        }
        next
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.config.player_count
    }

    /// Board geometry for this table.
    #[must_use]
    pub fn topology(&self) -> Topology {
        Topology::for_players(self.player_count())
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.phase == GamePhase::Ended
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.turn.current_player
    }

    /// Whether the player is seated at this table.
    #[must_use]
    pub fn is_seated(&self, player: PlayerId) -> bool {
        self.players.contains(player)
    }

    /// A player's pegs, or `None` for an unknown player.
    #[must_use]
    pub fn pegs_of(&self, player: PlayerId) -> Option<&PegSet> {
        self.pegs.get(player)
    }

    #[must_use]
    pub fn peg(&self, player: PlayerId, peg_index: u8) -> Option<&PegState> {
        self.pegs_of(player)?.get(peg_index as usize)
    }

    #[must_use]
    pub fn has_finished(&self, player: PlayerId) -> bool {
        self.players.get(player).is_some_and(|p| p.has_finished)
    }

    #[must_use]
    pub fn team_of(&self, player: PlayerId) -> Option<TeamId> {
        self.players.get(player).and_then(|p| p.team_id)
    }

    /// Number of the player's pegs already finished.
    #[must_use]
    pub fn finished_count(&self, player: PlayerId) -> usize {
        self.pegs_of(player)
            .map_or(0, |pegs| pegs.iter().filter(|p| p.is_finished).count())
    }

    /// Home index the player's next finishing peg must land on exactly.
    ///
    /// Targets run 3, 2, 1, 0 as pegs finish; `None` once all four are done.
    #[must_use]
    pub fn finish_target(&self, player: PlayerId) -> Option<u8> {
        let finished = self.finished_count(player) as u8;
        (finished < HOME_LENGTH).then(|| HOME_LENGTH - 1 - finished)
    }

    /// A copy with one peg replaced.
    #[must_use]
    pub fn with_peg(&self, player: PlayerId, peg: PegState) -> Self {
        let mut next = self.clone();
        next.set_peg(player, peg);
        next
    }

    /// A copy with one peg moved to `position` (unfinished). Setup helper.
    #[must_use]
    pub fn with_peg_position(&self, player: PlayerId, peg_index: u8, position: SpotRef) -> Self {
        self.with_peg(
            player,
            PegState {
                peg_index,
                position,
                is_finished: false,
            },
        )
    }

    /// A copy with the turn handed to `player`. Setup helper.
    #[must_use]
    pub fn with_turn(&self, player: PlayerId) -> Self {
        let mut next = self.clone();
        next.turn.current_player = player;
        next
    }

    pub(crate) fn set_peg(&mut self, player: PlayerId, peg: PegState) {
        if let Some(pegs) = self.pegs.get(player) {
            let mut updated = *pegs;
            if let Some(slot) = updated.get_mut(peg.peg_index as usize) {
                *slot = peg;
                self.pegs.set(player, updated);
            }
        }
    }

    pub(crate) fn set_player(&mut self, player: PlayerId, state: PlayerState) {
        if self.players.contains(player) {
            self.players.set(player, state);
        }
    }
}
