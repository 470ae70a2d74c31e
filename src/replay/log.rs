//! Replay log and replay files.
//!
//! A `ReplayLog` records every applied move together with the hash of the
//! state before and after it. A `ReplayFile` pairs a log with the state it
//! starts from so the game can be reproduced and verified offline.

use chrono::{DateTime, SecondsFormat, Utc};
use im::Vector;
use serde::{Deserialize, Serialize};

use super::hash::hash_state;
use crate::core::{GameState, Move};
use crate::error::ReplayError;
use crate::rules::RulesEngine;

/// Replay file format understood by this crate.
pub const REPLAY_FORMAT_VERSION: u32 = 1;

/// One applied move.
///
/// Missing hashes deserialize as empty strings and are rejected by
/// `validate_replay_file`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayEntry {
    #[serde(default)]
    pub before_hash: String,
    #[serde(rename = "move")]
    pub mv: Move,
    #[serde(default)]
    pub after_hash: String,
}

impl ReplayEntry {
    /// Record `mv` taking `before` to `after`.
    #[must_use]
    pub fn record(before: &GameState, mv: &Move, after: &GameState) -> Self {
        Self {
            before_hash: hash_state(before),
            mv: mv.clone(),
            after_hash: hash_state(after),
        }
    }
}

/// Append-only sequence of entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReplayLog {
    entries: Vector<ReplayEntry>,
}

impl ReplayLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: ReplayEntry) {
        self.entries.push_back(entry);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReplayEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&ReplayEntry> {
        self.entries.last()
    }
}

impl FromIterator<ReplayEntry> for ReplayLog {
    fn from_iter<I: IntoIterator<Item = ReplayEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A portable record of one game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayFile {
    pub format_version: u32,
    /// RFC 3339 creation time.
    pub created_at: String,
    #[serde(default)]
    pub initial_state: Option<GameState>,
    #[serde(default)]
    pub log: ReplayLog,
}

impl ReplayFile {
    /// Package a log, stamped with the current time.
    #[must_use]
    pub fn new(initial_state: GameState, log: ReplayLog) -> Self {
        Self {
            format_version: REPLAY_FORMAT_VERSION,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            initial_state: Some(initial_state),
            log,
        }
    }

    /// Parse and validate a replay file.
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let file: Self = serde_json::from_str(json)?;
        validate_replay_file(&file)?;
        Ok(file)
    }

    pub fn to_json(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Replay the log, checking every recorded hash.
    ///
    /// Returns the final state. Fails on the first entry whose hashes do not
    /// match the replayed states or whose move is not legal.
    pub fn replay<R: RulesEngine>(&self, rules: &R) -> Result<GameState, ReplayError> {
        validate_replay_file(self)?;
        let mut state = self
            .initial_state
            .clone()
            .ok_or(ReplayError::MissingInitialState)?;

        for (entry_index, entry) in self.log.iter().enumerate() {
            check_hash(entry_index, "beforeHash", &entry.before_hash, &state)?;
            if !entry_is_legal(rules, &state, &entry.mv) {
                return Err(ReplayError::IllegalEntry { entry: entry_index });
            }

            state = rules.apply_move(&state, &entry.mv).state;
            check_hash(entry_index, "afterHash", &entry.after_hash, &state)?;
        }

        tracing::debug!(entries = self.log.len(), "replay verified");
        Ok(state)
    }
}

fn check_hash(
    entry: usize,
    field: &'static str,
    recorded: &str,
    state: &GameState,
) -> Result<(), ReplayError> {
    let replayed = hash_state(state);
    if replayed == recorded {
        return Ok(());
    }
    tracing::warn!(entry, field, "replay hash mismatch");
    Err(ReplayError::HashMismatch {
        entry,
        field,
        recorded: recorded.to_string(),
        replayed,
    })
}

fn entry_is_legal<R: RulesEngine>(rules: &R, state: &GameState, mv: &Move) -> bool {
    match (mv, mv.die()) {
        (Move::Pass(pass), _) => {
            state.is_active() && pass.actor == state.current_player() && state.is_seated(pass.next)
        }
        (_, Some(die)) => rules.legal_moves(state, mv.actor(), &[die]).contains(mv),
        (_, None) => false,
    }
}

/// RFC 3339, or ISO 8601 extended form with a `+hhmm` offset.
fn is_iso8601(text: &str) -> bool {
    DateTime::parse_from_rfc3339(text).is_ok()
        || DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z").is_ok()
}

/// Reject a replay file that cannot be replayed.
///
/// Checks the format version, the creation timestamp, the presence of the
/// initial state and both hashes of every entry.
pub fn validate_replay_file(file: &ReplayFile) -> Result<(), ReplayError> {
    if file.format_version != REPLAY_FORMAT_VERSION {
        return Err(ReplayError::UnsupportedVersion {
            found: file.format_version,
            expected: REPLAY_FORMAT_VERSION,
        });
    }
    if !is_iso8601(&file.created_at) {
        return Err(ReplayError::InvalidTimestamp(file.created_at.clone()));
    }
    if file.initial_state.is_none() {
        return Err(ReplayError::MissingInitialState);
    }

    for (entry, e) in file.log.iter().enumerate() {
        if e.before_hash.is_empty() {
            return Err(ReplayError::MissingHash {
                entry,
                field: "beforeHash",
            });
        }
        if e.after_hash.is_empty() {
            return Err(ReplayError::MissingHash {
                entry,
                field: "afterHash",
            });
        }
    }

    Ok(())
}
