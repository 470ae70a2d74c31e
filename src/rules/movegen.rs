//! Legal move enumeration.
//!
//! Enumeration order is fixed so that two peers holding the same state
//! produce the same list, index for index:
//!
//! 1. center moves (enter center, exit center per Point in arm order)
//! 2. enter moves
//! 3. advance moves (normal, then fast track)
//! 4. kill moves
//!
//! Within each group pegs are visited in peg-index order.

use smallvec::{smallvec, SmallVec};

use crate::core::{Capture, GameState, Move, MovePath, PegMove, PegState, PlayerId, DIE_FACES};
use crate::zones::{Occupancy, SpotRef, Topology, HOME_LENGTH};

/// Enumerate every legal move for `actor` using the first die in `dice`.
///
/// Pure: `state` is only read. Returns empty for empty dice, a die outside
/// 1..=6, an unknown actor, or a game that is not active.
#[must_use]
pub fn legal_moves(state: &GameState, actor: PlayerId, dice: &[u8]) -> Vec<Move> {
    let Some(&die) = dice.first() else {
        return Vec::new();
    };
    if !state.is_active() || !(1..=DIE_FACES).contains(&die) {
        return Vec::new();
    }
    let Some(pegs) = state.pegs_of(actor) else {
        return Vec::new();
    };

    let generator = MoveGenerator {
        state,
        actor,
        die,
        topology: state.topology(),
        occupancy: Occupancy::of(state),
    };

    let mut moves = Vec::new();
    for peg in pegs.iter().filter(|p| !p.is_finished) {
        generator.center_moves(peg, &mut moves);
    }
    generator.enter_moves(pegs, &mut moves);
    for peg in pegs.iter().filter(|p| !p.is_finished) {
        moves.extend(generator.advance(peg));
        moves.extend(generator.fast_track_advance(peg));
    }
    for peg in pegs.iter().filter(|p| !p.is_finished) {
        moves.extend(generator.kill(peg));
    }

    debug_assert!(ids_unique(&moves), "duplicate move ids for {actor} die {die}");
    moves
}

fn ids_unique(moves: &[Move]) -> bool {
    let mut seen = rustc_hash::FxHashSet::default();
    moves.iter().all(|m| seen.insert(m.id()))
}

struct MoveGenerator<'a> {
    state: &'a GameState,
    actor: PlayerId,
    die: u8,
    topology: Topology,
    occupancy: Occupancy,
}

impl MoveGenerator<'_> {
    /// Opposing peg that landing on `spot` sends home.
    fn capture_at(&self, spot: SpotRef) -> SmallVec<[Capture; 1]> {
        self.occupancy.foreign(spot, self.actor).into_iter().collect()
    }

    fn peg_move(&self, peg: &PegState, to: SpotRef, path: MovePath) -> PegMove {
        PegMove {
            actor: self.actor,
            peg_index: peg.peg_index,
            die: self.die,
            from: peg.position,
            to,
            path,
            captures: self.capture_at(to),
            fast_track: false,
        }
    }

    /// Center entry from any Point, center exit to any Point. Die 1 only.
    fn center_moves(&self, peg: &PegState, out: &mut Vec<Move>) {
        if self.die != 1 {
            return;
        }

        match peg.position {
            SpotRef::Track { index } if self.topology.is_point(index) => {
                if self.occupancy.is_own(SpotRef::Center, self.actor) {
                    return;
                }
                let path = smallvec![peg.position, SpotRef::Center];
                out.push(Move::EnterCenter(self.peg_move(peg, SpotRef::Center, path)));
            }
            SpotRef::Center => {
                for point in self.topology.points() {
                    let to = SpotRef::track(point);
                    if self.occupancy.is_own(to, self.actor) {
                        continue;
                    }
                    let path = smallvec![SpotRef::Center, to];
                    out.push(Move::ExitCenter(self.peg_move(peg, to, path)));
                }
            }
            _ => {}
        }
    }

    /// Base to the 1-Spot (die 1) or the Point (die 6).
    fn enter_moves(&self, pegs: &[PegState], out: &mut Vec<Move>) {
        let target = match self.die {
            1 => self.topology.one_spot(self.actor),
            6 => self.topology.point(self.actor),
            _ => return,
        };
        let to = SpotRef::track(target);
        if self.occupancy.is_own(to, self.actor) {
            return;
        }

        for peg in pegs.iter().filter(|p| p.position.is_base()) {
            let path = smallvec![peg.position, to];
            out.push(Move::Enter(self.peg_move(peg, to, path)));
        }
    }

    /// Walk `die` steps along the track and home lane.
    ///
    /// The step after the actor's home-entry square always leads into
    /// `home[0]`; there is no staying on the track. The whole move is
    /// illegal when any step is blocked.
    fn advance(&self, peg: &PegState) -> Option<Move> {
        if !matches!(peg.position, SpotRef::Track { .. } | SpotRef::Home { .. }) {
            return None;
        }
        let target = self.state.finish_target(self.actor)?;
        let home_entry = self.topology.home_entry_index(self.actor);

        let mut path: MovePath = smallvec![peg.position];
        let mut current = peg.position;
        for _ in 0..self.die {
            let next = match current {
                SpotRef::Track { index } if index == home_entry => SpotRef::home(self.actor, 0),
                SpotRef::Track { index } => SpotRef::track(self.topology.next_track(index)),
                SpotRef::Home { index, .. } if index + 1 < HOME_LENGTH => {
                    SpotRef::home(self.actor, index + 1)
                }
                _ => return None,
            };

            let blocked = match next {
                // Home slots are never captured; any occupant blocks.
                SpotRef::Home { index, .. } => index > target || self.occupancy.at(next).is_some(),
                _ => self.occupancy.is_own(next, self.actor),
            };
            if blocked {
                return None;
            }

            path.push(next);
            current = next;
        }

        let mut m = self.peg_move(peg, current, path);
        if current.is_home() {
            m.captures.clear();
        }
        Some(Move::Advance(m))
    }

    /// Hop `die` Points clockwise, stopping no later than the Point before
    /// the actor's own arm.
    fn fast_track_advance(&self, peg: &PegState) -> Option<Move> {
        if !self.state.config.options.fast_track {
            return None;
        }
        let start = peg.position.track_index()?;
        if !self.topology.is_point(start) {
            return None;
        }
        let last = self.topology.last_point_before_home(self.actor);

        let mut path: MovePath = smallvec![peg.position];
        let mut current = start;
        for _ in 0..self.die {
            if current == last {
                return None;
            }
            current = self.topology.next_point(current);
            let spot = SpotRef::track(current);
            if self.occupancy.is_own(spot, self.actor) {
                return None;
            }
            path.push(spot);
        }

        let mut m = self.peg_move(peg, SpotRef::track(current), path);
        m.fast_track = true;
        Some(Move::Advance(m))
    }

    /// Capture the opponent exactly `die` squares ahead without moving.
    fn kill(&self, peg: &PegState) -> Option<Move> {
        if !self.state.config.options.kill_roll {
            return None;
        }
        let start = peg.position.track_index()?;
        let home_entry = self.topology.home_entry_index(self.actor);

        let mut current = start;
        for _ in 0..self.die {
            if current == home_entry {
                return None;
            }
            current = self.topology.next_track(current);
        }

        let victim = self
            .occupancy
            .foreign(SpotRef::track(current), self.actor)
            .filter(|v| !self.state.config.are_teammates(self.actor, v.player_id))?;

        Some(Move::Kill(PegMove {
            actor: self.actor,
            peg_index: peg.peg_index,
            die: self.die,
            from: peg.position,
            to: peg.position,
            path: smallvec![peg.position],
            captures: smallvec![victim],
            fast_track: false,
        }))
    }
}
