//! Turn and dice session machine.
//!
//! A `Session` owns one room's game: the `GameState`, the pending dice and
//! bank, and the replay log. Each client message is reduced to completion
//! against a draft copy; a rejection discards the draft, so a failed request
//! never changes anything.
//!
//! ## Turn flow
//!
//! ```text
//! AwaitingRoll --roll--> ResolvingDice --move/forfeit--> ... --last die--> handoff
//! ```
//!
//! Handoff: a non-empty bank keeps the owner on turn; otherwise, in team
//! play, a mover who has finished keeps it; otherwise the next seat takes
//! it. Every change of turn owner is applied as a `Move::Pass` so the replay
//! log sees it.

use smallvec::SmallVec;
use tracing::{debug, info, warn};

use super::dice::{PendingDie, TurnEconomy};
use super::messages::{ClientMessage, LegalMoveEntry, ServerMessage, TurnSnapshot};
use crate::core::{GameConfig, GameState, Move, PassMove, PlayerId, ValidationMode, DIE_FACES};
use crate::error::{ConfigError, InvariantViolation, SessionError};
use crate::replay::{hash_state, ReplayEntry, ReplayFile, ReplayLog};
use crate::rules::{MoveResult, RulesEngine, TrackRules};

/// Everything a message may change.
#[derive(Clone, Debug)]
struct Table {
    game: GameState,
    economy: TurnEconomy,
    log: ReplayLog,
}

/// One room.
#[derive(Clone, Debug)]
pub struct Session<R: RulesEngine = TrackRules> {
    rules: R,
    initial_state: GameState,
    table: Table,
}

impl Session<TrackRules> {
    /// Session over an existing game with the default rules.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self::with_rules(TrackRules::new(), state)
    }

    /// Set up and start a fresh game.
    pub fn start(config: GameConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(GameState::new(config)?.start()))
    }
}

impl<R: RulesEngine> Session<R> {
    #[must_use]
    pub fn with_rules(rules: R, state: GameState) -> Self {
        Self {
            rules,
            initial_state: state.clone(),
            table: Table {
                game: state,
                economy: TurnEconomy::default(),
                log: ReplayLog::new(),
            },
        }
    }

    #[must_use]
    pub fn rules(&self) -> &R {
        &self.rules
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.table.game
    }

    #[must_use]
    pub fn initial_state(&self) -> &GameState {
        &self.initial_state
    }

    #[must_use]
    pub fn economy(&self) -> &TurnEconomy {
        &self.table.economy
    }

    #[must_use]
    pub fn log(&self) -> &ReplayLog {
        &self.table.log
    }

    /// Package the game so far as a replay file.
    #[must_use]
    pub fn replay_file(&self) -> ReplayFile {
        ReplayFile::new(self.initial_state.clone(), self.table.log.clone())
    }

    #[must_use]
    pub fn turn_snapshot(&self) -> TurnSnapshot {
        snapshot(&self.table)
    }

    /// Full state broadcast.
    #[must_use]
    pub fn state_sync(&self) -> ServerMessage {
        state_sync(&self.table)
    }

    /// Reduce one client message.
    ///
    /// Rejections come back as `ServerMessage::Error` and leave the session
    /// untouched.
    pub fn handle_client_message(&mut self, message: ClientMessage) -> ServerMessage {
        let actor = message.actor();
        let kind = message.kind();
        let mut draft = Reducer {
            rules: &self.rules,
            table: self.table.clone(),
        };

        match draft.handle(message) {
            Ok(reply) => {
                self.table = draft.table;
                self.check_invariants();
                reply
            }
            Err(error) => {
                warn!(%actor, kind, code = %error.code(), %error, "request rejected");
                ServerMessage::Error {
                    error: error.payload(),
                }
            }
        }
    }

    fn check_invariants(&self) {
        if self.rules.engine_config().validation == ValidationMode::Off {
            return;
        }
        if let Err(violation) = validate_session(&self.table.game, &self.table.economy) {
            panic!("session invariant violated: {violation}");
        }
    }
}

/// Pure-reducer form of `Session::handle_client_message`.
#[must_use]
pub fn handle_client_message<R>(session: &Session<R>, message: ClientMessage) -> (Session<R>, ServerMessage)
where
    R: RulesEngine + Clone,
{
    let mut next = session.clone();
    let reply = next.handle_client_message(message);
    (next, reply)
}

/// Check the dice bookkeeping against the game.
///
/// - Every pending die has a face value and a seated controller
/// - Outside team play every die belongs to the turn owner
/// - A delegated die is pending while `acting_actor` is set
/// - An ended game has nothing pending or banked
pub fn validate_session(game: &GameState, economy: &TurnEconomy) -> Result<(), InvariantViolation> {
    let owner = game.current_player();
    let team_play = game.config.options.team_play;

    for (die_index, die) in economy.pending.iter().enumerate() {
        let reason = if !(1..=DIE_FACES).contains(&die.value) {
            Some(format!("value {} is not a die face", die.value))
        } else if die.controller.is_some_and(|c| !game.is_seated(c)) {
            Some("controller is not seated".to_string())
        } else if !team_play && die.controller != Some(owner) {
            Some(format!("controller is not the turn owner {owner}"))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(InvariantViolation::PendingDie { die_index, reason });
        }
    }

    if let Some(actor) = economy.acting_actor {
        if !economy.pending.iter().any(|d| d.is_controlled_by(actor)) {
            return Err(InvariantViolation::DanglingActingActor { actor });
        }
    }

    if game.is_ended() && (!economy.pending.is_empty() || economy.banked > 0) {
        return Err(InvariantViolation::PendingDie {
            die_index: 0,
            reason: "dice outstanding after the game ended".to_string(),
        });
    }

    Ok(())
}

fn snapshot(table: &Table) -> TurnSnapshot {
    TurnSnapshot {
        current_player: table.game.turn.current_player,
        turn_number: table.game.turn.turn_number,
        phase: table.economy.phase(),
        pending_dice: table.economy.pending.to_vec(),
        banked_dice: table.economy.banked,
        acting_actor: table.economy.acting_actor,
    }
}

fn state_sync(table: &Table) -> ServerMessage {
    ServerMessage::StateSync {
        state: table.game.clone(),
        state_hash: hash_state(&table.game),
        turn: snapshot(table),
    }
}

/// A draft of the table being reduced by one message.
struct Reducer<'a, R: RulesEngine> {
    rules: &'a R,
    table: Table,
}

impl<R: RulesEngine> Reducer<'_, R> {
    fn handle(&mut self, message: ClientMessage) -> Result<ServerMessage, SessionError> {
        let game = &self.table.game;
        if game.is_ended() {
            return Err(SessionError::GameEnded);
        }
        if !game.is_active() {
            return Err(SessionError::BadTurnState("the game has not started".into()));
        }
        let actor = message.actor();
        if !game.is_seated(actor) {
            return Err(SessionError::InvalidInput(format!("{actor} is not seated")));
        }

        match message {
            ClientMessage::Roll { actor_id, dice } => self.roll(actor_id, &dice),
            ClientMessage::GetLegalMoves {
                actor_id,
                die_index,
            } => self.list_moves(actor_id, die_index),
            ClientMessage::Move {
                actor_id,
                die_index,
                mv,
            } => self.spend(actor_id, die_index, mv),
            ClientMessage::AssignPendingDie {
                actor_id,
                die_index,
                controller_id,
            } => self.assign(actor_id, die_index, controller_id),
            ClientMessage::ForfeitPendingDie {
                actor_id,
                die_index,
            } => self.forfeit(actor_id, die_index),
        }
    }

    // === Handlers ===

    fn roll(&mut self, actor: PlayerId, dice: &[u8]) -> Result<ServerMessage, SessionError> {
        self.require_owner(actor)?;
        if !self.table.economy.is_awaiting_roll() {
            return Err(SessionError::BadTurnState(
                "pending dice must be resolved before rolling".into(),
            ));
        }
        if let Some(bad) = dice.iter().find(|v| !(1..=DIE_FACES).contains(*v)) {
            return Err(SessionError::InvalidInput(format!("die value {bad} is out of range")));
        }

        let economy = &mut self.table.economy;
        if economy.banked > 0 {
            if dice.len() != 1 {
                return Err(SessionError::BadTurnState(format!(
                    "banked dice are rolled one at a time, got {} dice",
                    dice.len()
                )));
            }
            economy.banked -= 1;
        } else {
            let expected = self.table.game.config.options.dice_per_roll();
            if dice.len() != expected {
                return Err(SessionError::InvalidInput(format!(
                    "expected {expected} dice, got {}",
                    dice.len()
                )));
            }
        }

        let game = &self.table.game;
        let controller = if game.config.options.team_play && game.has_finished(actor) {
            None
        } else {
            Some(actor)
        };
        let earned = dice.iter().filter(|&&v| v == 1 || v == DIE_FACES).count() as u32;
        economy.banked += earned;
        economy
            .pending
            .extend(dice.iter().map(|&value| PendingDie::new(value, controller)));

        info!(%actor, ?dice, banked = economy.banked, "dice rolled");
        self.settle(None);
        Ok(state_sync(&self.table))
    }

    fn list_moves(
        &self,
        actor: PlayerId,
        die_index: Option<usize>,
    ) -> Result<ServerMessage, SessionError> {
        let (die_index, die) = self.authorize(actor, die_index)?;
        let moves: Vec<LegalMoveEntry> = self
            .rules
            .legal_moves(&self.table.game, actor, &[die.value])
            .into_iter()
            .map(LegalMoveEntry::from)
            .collect();

        debug!(%actor, die_index, value = die.value, count = moves.len(), "legal moves listed");
        Ok(ServerMessage::LegalMoves {
            actor_id: actor,
            die_index,
            die: die.value,
            moves,
        })
    }

    fn spend(
        &mut self,
        actor: PlayerId,
        die_index: Option<usize>,
        mv: Move,
    ) -> Result<ServerMessage, SessionError> {
        if matches!(mv, Move::Pass(_)) {
            return Err(SessionError::InvalidInput(
                "turns are passed by the session, not by clients".into(),
            ));
        }
        if mv.actor() != actor {
            return Err(SessionError::ActorMismatch {
                actor,
                found: mv.actor(),
            });
        }
        let (die_index, die) = self.authorize(actor, die_index)?;

        let legal = self.rules.legal_moves(&self.table.game, actor, &[die.value]);
        if legal.is_empty() {
            return Err(SessionError::NoLegalMoves {
                die_index,
                value: die.value,
            });
        }
        if !legal.contains(&mv) {
            return Err(SessionError::IllegalMove(mv.id()));
        }

        let entry = self.apply(&mv);
        self.table.economy.take(die_index);

        let config = &self.table.game.config;
        let hits_opponent = mv
            .captures()
            .iter()
            .any(|c| c.player_id != actor && !config.are_teammates(actor, c.player_id));
        if config.options.kill_roll && hits_opponent {
            self.table.economy.banked += 1;
        }
        info!(%actor, die_index, mv = %mv, captures = mv.captures().len(), "move applied");

        self.settle(Some(actor));

        Ok(ServerMessage::MoveResult {
            result: MoveResult {
                next_state: self.table.game.clone(),
                after_hash: hash_state(&self.table.game),
                replay_entry: entry,
            },
            turn: snapshot(&self.table),
        })
    }

    fn assign(
        &mut self,
        actor: PlayerId,
        die_index: usize,
        controller: PlayerId,
    ) -> Result<ServerMessage, SessionError> {
        let game = &self.table.game;
        if !game.config.options.team_play {
            return Err(SessionError::BadTurnState("dice are only delegated in team play".into()));
        }
        self.require_owner(actor)?;
        if !game.has_finished(actor) {
            return Err(SessionError::BadTurnState(
                "only a player with every peg finished may delegate dice".into(),
            ));
        }
        if let Some(active) = self.table.economy.acting_actor {
            return Err(SessionError::BadTurnState(format!(
                "{active} still holds a delegated die"
            )));
        }
        let die = self.die(die_index)?;
        if die.controller.is_some() {
            return Err(SessionError::BadTurnState(format!(
                "die {die_index} is already assigned"
            )));
        }
        if !game.config.are_teammates(actor, controller) {
            return Err(SessionError::WrongActor(format!(
                "{controller} is not a teammate of {actor}"
            )));
        }
        if !self.rules.has_legal_move(game, controller, die.value) {
            return Err(SessionError::BadTurnState(format!(
                "{controller} has no legal move for die {die_index} (value {})",
                die.value
            )));
        }

        let economy = &mut self.table.economy;
        if let Some(slot) = economy.pending.get_mut(die_index) {
            slot.controller = Some(controller);
        }
        economy.acting_actor = Some(controller);

        info!(%actor, %controller, die_index, value = die.value, "die delegated");
        Ok(state_sync(&self.table))
    }

    fn forfeit(
        &mut self,
        actor: PlayerId,
        die_index: Option<usize>,
    ) -> Result<ServerMessage, SessionError> {
        if self.table.economy.is_awaiting_roll() {
            return Err(SessionError::BadTurnState("no pending dice to forfeit".into()));
        }

        match die_index {
            Some(die_index) => {
                let die = self.die(die_index)?;
                let owner = self.table.game.current_player();
                if actor != owner && !die.is_controlled_by(actor) {
                    return Err(self.authority_error(actor, die_index));
                }
                if self.is_live(&die) {
                    return Err(SessionError::BadTurnState(format!(
                        "die {die_index} (value {}) still has legal moves",
                        die.value
                    )));
                }
                self.table.economy.take(die_index);
                info!(%actor, die_index, value = die.value, "die forfeited");
            }
            None => {
                self.require_owner(actor)?;
                if self.table.economy.pending.iter().any(|d| self.is_live(d)) {
                    return Err(SessionError::BadTurnState(
                        "a pending die can still be played".into(),
                    ));
                }
                let dropped = self.table.economy.forfeit_all();
                info!(%actor, count = dropped.len(), "all dice forfeited");
            }
        }

        self.settle(None);
        Ok(state_sync(&self.table))
    }

    // === Turn economy ===

    /// Auto-forfeit dead dice and hand the turn on once nothing is pending.
    fn settle(&mut self, mover: Option<PlayerId>) {
        if self.table.game.is_ended() {
            self.table.economy.clear();
            info!(outcome = ?self.table.game.outcome, "game ended");
            return;
        }

        let economy = &self.table.economy;
        if !economy.pending.is_empty() {
            if economy.pending.iter().any(|d| self.is_live(d)) {
                return;
            }
            let dropped: SmallVec<[PendingDie; 2]> = self.table.economy.forfeit_all();
            info!(
                owner = %self.table.game.current_player(),
                dice = ?dropped.iter().map(|d| d.value).collect::<Vec<_>>(),
                "dead dice forfeited"
            );
        }

        self.hand_off(mover);
    }

    fn hand_off(&mut self, mover: Option<PlayerId>) {
        let game = &self.table.game;
        let owner = game.current_player();

        let next = if self.table.economy.banked > 0 {
            owner
        } else if let Some(m) = mover.filter(|&m| game.config.options.team_play && game.has_finished(m)) {
            m
        } else {
            owner.next_seat(game.player_count())
        };

        if next == owner {
            debug!(%owner, banked = self.table.economy.banked, "turn retained");
            return;
        }

        self.apply(&Move::Pass(PassMove { actor: owner, next }));
        info!(from = %owner, to = %next, turn = self.table.game.turn.turn_number, "turn passed");
    }

    /// Apply and record a move.
    fn apply(&mut self, mv: &Move) -> ReplayEntry {
        let next = self.rules.apply_move(&self.table.game, mv).state;
        let entry = ReplayEntry::record(&self.table.game, mv, &next);
        self.table.log.push(entry.clone());
        self.table.game = next;
        entry
    }

    // === Authority ===

    fn require_owner(&self, actor: PlayerId) -> Result<(), SessionError> {
        let owner = self.table.game.current_player();
        if actor == owner {
            Ok(())
        } else {
            Err(SessionError::NotYourTurn {
                expected: owner,
                actual: actor,
            })
        }
    }

    fn die(&self, die_index: usize) -> Result<PendingDie, SessionError> {
        self.table.economy.die(die_index).copied().ok_or_else(|| {
            SessionError::InvalidInput(format!(
                "no pending die at index {die_index} ({} pending)",
                self.table.economy.pending.len()
            ))
        })
    }

    /// Resolve the die a request refers to and check the actor controls it.
    fn authorize(
        &self,
        actor: PlayerId,
        die_index: Option<usize>,
    ) -> Result<(usize, PendingDie), SessionError> {
        if self.table.economy.is_awaiting_roll() {
            return Err(SessionError::BadTurnState("no pending dice; roll first".into()));
        }
        let die_index = die_index.unwrap_or_else(|| self.table.economy.default_die_index(actor));
        let die = self.die(die_index)?;
        if die.is_controlled_by(actor) {
            Ok((die_index, die))
        } else {
            Err(self.authority_error(actor, die_index))
        }
    }

    fn authority_error(&self, actor: PlayerId, die_index: usize) -> SessionError {
        let owner = self.table.game.current_player();
        if !self.table.game.config.options.team_play && actor != owner {
            SessionError::NotYourTurn {
                expected: owner,
                actual: actor,
            }
        } else {
            SessionError::NotDieController { actor, die_index }
        }
    }

    /// Players who could spend the die: its controller, or the owner's
    /// teammates while it is unassigned.
    fn candidates(&self, die: &PendingDie) -> SmallVec<[PlayerId; 4]> {
        if let Some(controller) = die.controller {
            return SmallVec::from_elem(controller, 1);
        }
        let game = &self.table.game;
        let owner = game.current_player();
        game.config
            .team_of(owner)
            .map(|team| team.members.iter().copied().filter(|&m| m != owner).collect())
            .unwrap_or_default()
    }

    fn is_live(&self, die: &PendingDie) -> bool {
        self.candidates(die)
            .into_iter()
            .any(|player| self.rules.has_legal_move(&self.table.game, player, die.value))
    }
}
