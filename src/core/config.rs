//! Game and engine configuration.
//!
//! Hosts configure a game once, before it starts:
//! - `GameOptions`: the closed set of house rules
//! - `TeamConfig`: team rosters for team play
//! - `GameConfig`: player count plus options
//! - `EngineConfig`: how the engine itself behaves (state validation)
//!
//! A started game never changes its configuration.

use serde::{Deserialize, Serialize};

use super::PlayerId;
use crate::error::ConfigError;

/// Smallest supported table.
pub const MIN_PLAYERS: usize = 2;

/// Largest supported table.
pub const MAX_PLAYERS: usize = 8;

/// Team identifier. Teams are defined by the host's roster.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeamId(pub u8);

impl TeamId {
    /// Create a new team ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "team{}", self.0)
    }
}

/// One team and its members in roster order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeamConfig {
    pub id: TeamId,
    pub members: Vec<PlayerId>,
}

impl TeamConfig {
    /// Create a team from its members.
    pub fn new(id: TeamId, members: impl IntoIterator<Item = PlayerId>) -> Self {
        Self {
            id,
            members: members.into_iter().collect(),
        }
    }

    /// Check if a player belongs to this team.
    #[must_use]
    pub fn contains(&self, player: PlayerId) -> bool {
        self.members.contains(&player)
    }
}

/// House rules. Every option is off by default.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOptions {
    /// Rolls consist of two dice instead of one.
    #[serde(default)]
    pub double_dice: bool,

    /// Capturing an opponent banks an extra die, and `kill` moves are offered.
    #[serde(default)]
    pub kill_roll: bool,

    /// Pegs standing on a Point may hop from Point to Point.
    #[serde(default)]
    pub fast_track: bool,

    /// Players are grouped into teams; the game ends when a whole team finishes.
    #[serde(default)]
    pub team_play: bool,

    /// Team roster. Required (and only consulted) when `team_play` is set.
    #[serde(default)]
    pub teams: Vec<TeamConfig>,
}

impl GameOptions {
    /// Number of dice a regular (non-banked) roll consists of.
    #[must_use]
    pub fn dice_per_roll(&self) -> usize {
        if self.double_dice {
            2
        } else {
            1
        }
    }
}

/// Complete game configuration.
///
/// ## Example
///
/// ```
/// use pegboard::core::{GameConfig, PlayerId, TeamConfig, TeamId};
///
/// let config = GameConfig::new(4)
///     .with_double_dice(true)
///     .with_teams(vec![
///         TeamConfig::new(TeamId::new(0), [PlayerId::new(0), PlayerId::new(2)]),
///         TeamConfig::new(TeamId::new(1), [PlayerId::new(1), PlayerId::new(3)]),
///     ]);
///
/// assert!(config.validate().is_ok());
/// assert!(config.options.team_play);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    /// Number of seated players (2-8).
    pub player_count: usize,

    /// House rules.
    #[serde(default)]
    pub options: GameOptions,
}

impl GameConfig {
    /// Create a configuration with all house rules off.
    #[must_use]
    pub fn new(player_count: usize) -> Self {
        Self {
            player_count,
            options: GameOptions::default(),
        }
    }

    /// Load a host-supplied JSON configuration and validate it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_double_dice(mut self, enabled: bool) -> Self {
        self.options.double_dice = enabled;
        self
    }

    #[must_use]
    pub fn with_kill_roll(mut self, enabled: bool) -> Self {
        self.options.kill_roll = enabled;
        self
    }

    #[must_use]
    pub fn with_fast_track(mut self, enabled: bool) -> Self {
        self.options.fast_track = enabled;
        self
    }

    /// Enable team play with the given roster.
    #[must_use]
    pub fn with_teams(mut self, teams: Vec<TeamConfig>) -> Self {
        self.options.team_play = true;
        self.options.teams = teams;
        self
    }

    /// Find the team a player belongs to (team play only).
    #[must_use]
    pub fn team_of(&self, player: PlayerId) -> Option<&TeamConfig> {
        if !self.options.team_play {
            return None;
        }
        self.options.teams.iter().find(|t| t.contains(player))
    }

    /// Check whether two distinct players are on the same team.
    #[must_use]
    pub fn are_teammates(&self, a: PlayerId, b: PlayerId) -> bool {
        a != b && self.team_of(a).is_some_and(|team| team.contains(b))
    }

    /// Check the player count and, under team play, the roster.
    ///
    /// Every seat must belong to exactly one non-empty team.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&self.player_count) {
            return Err(ConfigError::InvalidPlayerCount(self.player_count));
        }

        if !self.options.team_play {
            return Ok(());
        }

        if self.options.teams.is_empty() {
            return Err(ConfigError::MissingRoster);
        }

        let mut seen = vec![false; self.player_count];
        for team in &self.options.teams {
            if team.members.is_empty() {
                return Err(ConfigError::EmptyTeam(team.id));
            }
            for &member in &team.members {
                let slot = seen
                    .get_mut(member.index())
                    .ok_or(ConfigError::UnknownMember(member))?;
                if *slot {
                    return Err(ConfigError::DuplicateMember(member));
                }
                *slot = true;
            }
        }

        match seen.iter().position(|&s| !s) {
            Some(seat) => Err(ConfigError::Unassigned(PlayerId::new(seat as u8))),
            None => Ok(()),
        }
    }
}

/// How strictly the engine checks its own invariants after each transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValidationMode {
    /// Skip structural checks.
    Off,
    /// Check after every transition and panic on violation.
    #[default]
    Strict,
}

/// Engine-level settings, independent of any one game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub validation: ValidationMode,
}

impl EngineConfig {
    /// Set the validation mode.
    #[must_use]
    pub fn with_validation(mut self, mode: ValidationMode) -> Self {
        self.validation = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair_teams() -> Vec<TeamConfig> {
        vec![
            TeamConfig::new(TeamId::new(0), [PlayerId::new(0), PlayerId::new(2)]),
            TeamConfig::new(TeamId::new(1), [PlayerId::new(1), PlayerId::new(3)]),
        ]
    }

    #[test]
    fn test_defaults_are_off() {
        let config = GameConfig::new(2);

        assert!(!config.options.double_dice);
        assert!(!config.options.kill_roll);
        assert!(!config.options.fast_track);
        assert!(!config.options.team_play);
        assert_eq!(config.options.dice_per_roll(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_player_count_bounds() {
        assert_eq!(
            GameConfig::new(1).validate(),
            Err(ConfigError::InvalidPlayerCount(1))
        );
        assert_eq!(
            GameConfig::new(9).validate(),
            Err(ConfigError::InvalidPlayerCount(9))
        );
        assert!(GameConfig::new(8).validate().is_ok());
    }

    #[test]
    fn test_team_lookup() {
        let config = GameConfig::new(4).with_teams(pair_teams());

        assert_eq!(config.team_of(PlayerId::new(2)).map(|t| t.id), Some(TeamId::new(0)));
        assert!(config.are_teammates(PlayerId::new(1), PlayerId::new(3)));
        assert!(!config.are_teammates(PlayerId::new(0), PlayerId::new(1)));
        assert!(!config.are_teammates(PlayerId::new(0), PlayerId::new(0)));
    }

    #[test]
    fn test_teams_ignored_without_team_play() {
        let mut config = GameConfig::new(4).with_teams(pair_teams());
        config.options.team_play = false;

        assert!(config.team_of(PlayerId::new(0)).is_none());
        assert!(!config.are_teammates(PlayerId::new(0), PlayerId::new(2)));
    }

    #[test]
    fn test_roster_validation() {
        let missing = GameConfig::new(4).with_teams(vec![]);
        assert_eq!(missing.validate(), Err(ConfigError::MissingRoster));

        let partial = GameConfig::new(4).with_teams(vec![TeamConfig::new(
            TeamId::new(0),
            [PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)],
        )]);
        assert_eq!(partial.validate(), Err(ConfigError::Unassigned(PlayerId::new(3))));

        let duplicate = GameConfig::new(2).with_teams(vec![
            TeamConfig::new(TeamId::new(0), [PlayerId::new(0), PlayerId::new(1)]),
            TeamConfig::new(TeamId::new(1), [PlayerId::new(1)]),
        ]);
        assert_eq!(duplicate.validate(), Err(ConfigError::DuplicateMember(PlayerId::new(1))));

        let unknown = GameConfig::new(2).with_teams(vec![TeamConfig::new(
            TeamId::new(0),
            [PlayerId::new(0), PlayerId::new(1), PlayerId::new(5)],
        )]);
        assert_eq!(unknown.validate(), Err(ConfigError::UnknownMember(PlayerId::new(5))));

        let empty = GameConfig::new(2).with_teams(vec![
            TeamConfig::new(TeamId::new(0), [PlayerId::new(0), PlayerId::new(1)]),
            TeamConfig::new(TeamId::new(1), []),
        ]);
        assert_eq!(empty.validate(), Err(ConfigError::EmptyTeam(TeamId::new(1))));
    }

    #[test]
    fn test_from_json() {
        let config = GameConfig::from_json(
            r#"{"playerCount": 3, "options": {"killRoll": true}}"#,
        )
        .unwrap();

        assert_eq!(config.player_count, 3);
        assert!(config.options.kill_roll);
        assert!(!config.options.double_dice);

        assert!(matches!(
            GameConfig::from_json(r#"{"playerCount": 12}"#),
            Err(ConfigError::InvalidPlayerCount(12))
        ));
        assert!(matches!(
            GameConfig::from_json("not json"),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_engine_config_default_is_strict() {
        assert_eq!(EngineConfig::default().validation, ValidationMode::Strict);
        let off = EngineConfig::default().with_validation(ValidationMode::Off);
        assert_eq!(off.validation, ValidationMode::Off);
    }
}
