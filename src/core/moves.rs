//! Move representation.
//!
//! A move is a closed tagged union. Peg moves share one payload shape:
//! who moves which peg with which die, from where to where, the squares
//! walked on the way, and which pegs are sent back to base.
//!
//! Moves compare structurally. `Move::id` is a derived, human-legible
//! label for logs and client menus; nothing in the engine compares ids.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::player::PlayerId;
use crate::zones::{PegRef, SpotRef};

/// A peg sent back to its owner's base.
pub type Capture = PegRef;

/// Squares walked, first = origin, last = destination.
pub type MovePath = SmallVec<[SpotRef; 8]>;

/// Payload shared by every peg-moving variant.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PegMove {
    pub actor: PlayerId,
    pub peg_index: u8,
    /// Die value this move spends.
    pub die: u8,
    pub from: SpotRef,
    pub to: SpotRef,
    pub path: MovePath,
    pub captures: SmallVec<[Capture; 1]>,
    /// Advance made by hopping Point to Point.
    #[serde(default)]
    pub fast_track: bool,
}

/// Turn handoff: `actor` gives up the turn and `next` holds it afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassMove {
    pub actor: PlayerId,
    pub next: PlayerId,
}

/// A complete move.
///
/// ## Example
///
/// ```
/// use pegboard::core::{Move, PassMove, PlayerId};
///
/// let pass = Move::Pass(PassMove { actor: PlayerId::new(0), next: PlayerId::new(1) });
/// assert_eq!(pass.actor(), PlayerId::new(0));
/// assert_eq!(pass.id(), "pass:p0>p1");
/// assert!(pass.captures().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Move {
    Pass(PassMove),
    /// Base to track.
    Enter(PegMove),
    /// Along the track and into/within home.
    Advance(PegMove),
    /// Point to center.
    EnterCenter(PegMove),
    /// Center to a Point.
    ExitCenter(PegMove),
    /// Capture without moving (kill-roll house rule).
    Kill(PegMove),
}

/// Move discriminant, for logging and grouping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveKind {
    Pass,
    Enter,
    Advance,
    EnterCenter,
    ExitCenter,
    Kill,
}

impl MoveKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MoveKind::Pass => "pass",
            MoveKind::Enter => "enter",
            MoveKind::Advance => "advance",
            MoveKind::EnterCenter => "enterCenter",
            MoveKind::ExitCenter => "exitCenter",
            MoveKind::Kill => "kill",
        }
    }
}

impl Move {
    #[must_use]
    pub fn kind(&self) -> MoveKind {
        match self {
            Move::Pass(_) => MoveKind::Pass,
            Move::Enter(_) => MoveKind::Enter,
            Move::Advance(_) => MoveKind::Advance,
            Move::EnterCenter(_) => MoveKind::EnterCenter,
            Move::ExitCenter(_) => MoveKind::ExitCenter,
            Move::Kill(_) => MoveKind::Kill,
        }
    }

    /// The player making the move.
    #[must_use]
    pub fn actor(&self) -> PlayerId {
        match self {
            Move::Pass(pass) => pass.actor,
            Move::Enter(m)
            | Move::Advance(m)
            | Move::EnterCenter(m)
            | Move::ExitCenter(m)
            | Move::Kill(m) => m.actor,
        }
    }

    /// Peg payload, `None` for a pass.
    #[must_use]
    pub fn peg_move(&self) -> Option<&PegMove> {
        match self {
            Move::Pass(_) => None,
            Move::Enter(m)
            | Move::Advance(m)
            | Move::EnterCenter(m)
            | Move::ExitCenter(m)
            | Move::Kill(m) => Some(m),
        }
    }

    /// Pegs this move sends back to base.
    #[must_use]
    pub fn captures(&self) -> &[Capture] {
        self.peg_move().map_or(&[], |m| m.captures.as_slice())
    }

    /// Die value spent, `None` for a pass.
    #[must_use]
    pub fn die(&self) -> Option<u8> {
        self.peg_move().map(|m| m.die)
    }

    /// Diagnostic id encoding kind, actor, peg and die.
    ///
    /// Unique within one enumeration: moves that share kind, peg and die
    /// also carry their destination or victim.
    #[must_use]
    pub fn id(&self) -> String {
        match self {
            Move::Pass(pass) => format!("pass:{}>{}", pass.actor, pass.next),
            Move::Advance(m) if m.fast_track => {
                format!("advance-fast:{}:peg{}:d{}", m.actor, m.peg_index, m.die)
            }
            Move::ExitCenter(m) => {
                format!("exitCenter:{}:peg{}:d{}:{}", m.actor, m.peg_index, m.die, m.to)
            }
            Move::Kill(m) => {
                let victim = m
                    .captures
                    .first()
                    .map_or_else(String::new, |c| format!(":{}.{}", c.player_id, c.peg_index));
                format!("kill:{}:peg{}:d{}{}", m.actor, m.peg_index, m.die, victim)
            }
            other => {
                let m = other.peg_move().map_or_else(String::new, |m| {
                    format!(":{}:peg{}:d{}", m.actor, m.peg_index, m.die)
                });
                format!("{}{}", other.kind().as_str(), m)
            }
        }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn step(die: u8, from: usize, to: usize) -> PegMove {
        PegMove {
            actor: PlayerId::new(0),
            peg_index: 1,
            die,
            from: SpotRef::track(from),
            to: SpotRef::track(to),
            path: (from..=to).map(SpotRef::track).collect(),
            captures: SmallVec::new(),
            fast_track: false,
        }
    }

    #[test]
    fn test_ids() {
        assert_eq!(Move::Advance(step(3, 10, 13)).id(), "advance:p0:peg1:d3");
        assert_eq!(Move::Enter(step(6, 13, 13)).id(), "enter:p0:peg1:d6");
        assert_eq!(Move::EnterCenter(step(1, 13, 13)).id(), "enterCenter:p0:peg1:d1");

        let mut fast = step(2, 13, 41);
        fast.fast_track = true;
        assert_eq!(Move::Advance(fast).id(), "advance-fast:p0:peg1:d2");

        let mut exit = step(1, 13, 27);
        exit.from = SpotRef::Center;
        assert_eq!(Move::ExitCenter(exit).id(), "exitCenter:p0:peg1:d1:track:27");

        let mut kill = step(3, 10, 10);
        kill.captures = smallvec![PegRef::new(PlayerId::new(1), 2)];
        assert_eq!(Move::Kill(kill).id(), "kill:p0:peg1:d3:p1.2");
    }

    #[test]
    fn test_accessors() {
        let mut m = step(4, 0, 4);
        m.captures = smallvec![PegRef::new(PlayerId::new(1), 0)];
        let mv = Move::Advance(m);

        assert_eq!(mv.kind(), MoveKind::Advance);
        assert_eq!(mv.actor(), PlayerId::new(0));
        assert_eq!(mv.die(), Some(4));
        assert_eq!(mv.captures().len(), 1);
    }

    #[test]
    fn test_structural_equality() {
        let a = Move::Advance(step(2, 5, 7));
        let b = Move::Advance(step(2, 5, 7));
        let c = Move::Enter(step(2, 5, 7));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_serialization() {
        let mv = Move::Advance(step(2, 5, 7));
        let json = serde_json::to_value(&mv).unwrap();

        assert_eq!(json["kind"], "advance");
        assert_eq!(json["pegIndex"], 1);
        assert_eq!(json["to"], serde_json::json!({"zone": "track", "index": 7}));

        let back: Move = serde_json::from_value(json).unwrap();
        assert_eq!(back, mv);
    }
}
