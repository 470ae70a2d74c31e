//! Pending dice and the bank.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PlayerId;

/// Where the turn is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TurnPhase {
    /// No dice outstanding; the owner rolls next.
    AwaitingRoll,
    /// Rolled dice wait to be spent or forfeited.
    ResolvingDice,
}

/// A rolled die not yet spent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDie {
    pub value: u8,
    /// Who may spend it. `None` means unassigned: the finished owner has
    /// yet to hand it to a teammate.
    #[serde(rename = "controllerId")]
    pub controller: Option<PlayerId>,
}

impl PendingDie {
    #[must_use]
    pub const fn new(value: u8, controller: Option<PlayerId>) -> Self {
        Self { value, controller }
    }

    #[must_use]
    pub fn is_controlled_by(&self, player: PlayerId) -> bool {
        self.controller == Some(player)
    }
}

/// Dice bookkeeping for the current turn.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnEconomy {
    /// Outstanding dice in roll order.
    #[serde(rename = "pendingDice")]
    pub pending: SmallVec<[PendingDie; 2]>,
    /// Extra single-die rolls earned this turn.
    #[serde(rename = "bankedDice")]
    pub banked: u32,
    /// Teammate holding the one delegated die, if any.
    pub acting_actor: Option<PlayerId>,
}

impl TurnEconomy {
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        if self.pending.is_empty() {
            TurnPhase::AwaitingRoll
        } else {
            TurnPhase::ResolvingDice
        }
    }

    #[must_use]
    pub fn is_awaiting_roll(&self) -> bool {
        self.phase() == TurnPhase::AwaitingRoll
    }

    #[must_use]
    pub fn die(&self, index: usize) -> Option<&PendingDie> {
        self.pending.get(index)
    }

    /// First die `player` controls, else the first die.
    #[must_use]
    pub fn default_die_index(&self, player: PlayerId) -> usize {
        self.pending
            .iter()
            .position(|d| d.is_controlled_by(player))
            .unwrap_or(0)
    }

    /// Remove a die, clearing the delegation it carried.
    pub fn take(&mut self, index: usize) -> Option<PendingDie> {
        if index >= self.pending.len() {
            return None;
        }
        let die = self.pending.remove(index);
        if die.controller.is_some() && die.controller == self.acting_actor {
            self.acting_actor = None;
        }
        Some(die)
    }

    /// Drop every pending die, keeping the bank.
    pub fn forfeit_all(&mut self) -> SmallVec<[PendingDie; 2]> {
        self.acting_actor = None;
        std::mem::take(&mut self.pending)
    }

    /// Game over: nothing left to spend or bank.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
