//! State transitions and structural invariants.

use rustc_hash::FxHashSet;

use super::engine::GameOutcome;
use crate::core::{GamePhase, GameState, Move, PegMove, PegState, PlayerId, PEGS_PER_PLAYER};
use crate::error::InvariantViolation;
use crate::zones::{Occupancy, SpotRef, HOME_LENGTH};

/// Derive the state after `mv`.
///
/// Does not judge legality: callers check the move against `legal_moves`
/// first. The input state is never touched.
#[must_use]
pub fn apply_move(state: &GameState, mv: &Move) -> GameState {
    let mut next = state.clone();

    match mv {
        Move::Pass(pass) => {
            next.turn.current_player = pass.next;
            next.turn.turn_number += 1;
        }
        Move::Kill(m) => send_captures_home(&mut next, m),
        Move::Enter(m) | Move::Advance(m) | Move::EnterCenter(m) | Move::ExitCenter(m) => {
            send_captures_home(&mut next, m);
            move_peg(&mut next, m);
            record_finish(&mut next, m.actor);
        }
    }

    next
}

fn send_captures_home(state: &mut GameState, m: &PegMove) {
    for capture in &m.captures {
        state.set_peg(
            capture.player_id,
            PegState::at_base(capture.player_id, capture.peg_index),
        );
    }
}

fn move_peg(state: &mut GameState, m: &PegMove) {
    let target = state.finish_target(m.actor);
    let finishes = matches!(
        (m.to, target),
        (SpotRef::Home { player, index }, Some(t)) if player == m.actor && index == t
    );
    state.set_peg(
        m.actor,
        PegState {
            peg_index: m.peg_index,
            position: m.to,
            is_finished: finishes,
        },
    );
}

fn record_finish(state: &mut GameState, player: PlayerId) {
    if state.has_finished(player) || state.finished_count(player) < PEGS_PER_PLAYER {
        return;
    }

    if let Some(flags) = state.players.get(player) {
        let mut flags = flags.clone();
        flags.has_finished = true;
        state.set_player(player, flags);
    }
    state.finished_order.push_back(player);

    if state.outcome.is_none() {
        if let Some(outcome) = decide_outcome(state, player) {
            state.outcome = Some(outcome);
            state.phase = GamePhase::Ended;
        }
    }
}

fn decide_outcome(state: &GameState, finisher: PlayerId) -> Option<GameOutcome> {
    let options = &state.config.options;
    if !options.team_play {
        return Some(GameOutcome::Winner { player_id: finisher });
    }

    let team = options
        .teams
        .iter()
        .find(|t| t.members.iter().all(|&m| state.has_finished(m)))?;
    let members = state
        .finished_order
        .iter()
        .copied()
        .filter(|p| team.contains(*p))
        .collect();

    Some(GameOutcome::Team {
        team_id: team.id,
        members,
    })
}

/// Check every structural invariant of a game state.
///
/// A legal transition from a valid state always yields a valid state, so a
/// violation is a programmer error.
pub fn validate_state(state: &GameState) -> Result<(), InvariantViolation> {
    let current = state.current_player();
    if !state.is_seated(current) {
        return Err(InvariantViolation::UnknownTurnOwner(current));
    }

    let topology = state.topology();
    for (player, pegs) in state.pegs.iter() {
        let expected_team = state.config.team_of(player).map(|t| t.id);
        let found_team = state.team_of(player);
        if found_team != expected_team {
            return Err(InvariantViolation::TeamMismatch {
                player,
                found: found_team,
                expected: expected_team,
            });
        }

        for (slot, peg) in pegs.iter().enumerate() {
            if peg.peg_index as usize != slot {
                return Err(InvariantViolation::PegIndexMismatch {
                    player,
                    peg: slot,
                    found: peg.peg_index,
                });
            }
            let placed = match peg.position {
                SpotRef::Base { player: owner, index } => owner == player && index == peg.peg_index,
                SpotRef::Home { player: owner, index } => owner == player && index < HOME_LENGTH,
                SpotRef::Track { .. } => topology.contains(peg.position),
                SpotRef::Center => true,
            };
            if !placed {
                return Err(InvariantViolation::MisplacedPeg {
                    player,
                    peg: slot,
                    spot: peg.position,
                });
            }
            if peg.is_finished && !peg.position.is_home() {
                return Err(InvariantViolation::FinishedOutsideHome { player, peg: slot });
            }
        }

        let mut finished_slots: Vec<u8> = pegs
            .iter()
            .filter(|p| p.is_finished)
            .filter_map(|p| match p.position {
                SpotRef::Home { index, .. } => Some(index),
                _ => None,
            })
            .collect();
        finished_slots.sort_unstable_by(|a, b| b.cmp(a));
        let filled_from_top = finished_slots
            .iter()
            .enumerate()
            .all(|(n, &index)| usize::from(index) + n + 1 == usize::from(HOME_LENGTH));
        if !filled_from_top {
            return Err(InvariantViolation::FinishSlotMismatch { player });
        }

        let finished = finished_slots.len();
        let flag = state.has_finished(player);
        if flag != (finished == PEGS_PER_PLAYER) {
            return Err(InvariantViolation::FinishFlagMismatch {
                player,
                finished,
                flag,
            });
        }
        if flag != state.finished_order.contains(&player) {
            return Err(InvariantViolation::FinishOrderMismatch { player });
        }
    }

    let mut seen = FxHashSet::default();
    if let Some(&repeat) = state.finished_order.iter().find(|&&p| !seen.insert(p)) {
        return Err(InvariantViolation::FinishOrderMismatch { player: repeat });
    }

    if let Some(&spot) = Occupancy::of(state).collisions().first() {
        return Err(InvariantViolation::DoubleOccupancy { spot });
    }

    if state.outcome.is_some() != (state.phase == GamePhase::Ended) {
        return Err(InvariantViolation::OutcomePhaseMismatch);
    }

    Ok(())
}
