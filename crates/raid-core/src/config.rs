//! Encounter configuration loaded from JSON.
//!
//! Every struct here uses `#[serde(default)]`, so a file only needs the
//! fields it changes. An empty object `{}` describes the built-in raid.
//!
//! ```
//! use raid_core::config::EncounterFile;
//!
//! let file = EncounterFile::from_json(r#"{
//!     "player": { "max_health": 80 },
//!     "rounds": [
//!         { "name": "Warmup", "enemies": ["slime"] },
//!         { "name": "Boss", "enemies": ["bat", "goblin"] }
//!     ],
//!     "bestiary": {
//!         "bat": { "name": "Bat", "max_health": 8, "attack": 3, "defense": 0, "luck": 4 }
//!     },
//!     "reward_rounds": [0]
//! }"#).unwrap();
//!
//! let setup = file.into_setup().unwrap();
//! assert_eq!(setup.rounds.len(), 2);
//! assert_eq!(setup.final_round, 1);
//! assert_eq!(setup.player.max_health, 80);
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::combatant::{ActionPoints, CombatantStats};
use crate::damage::DamageFormulaConfig;
use crate::encounter::{self, Bestiary, EncounterSetup, EnemySpawn, DEFAULT_SPAWN_SLOTS};
use crate::engine::Pacing;
use crate::error::ConfigError;
use crate::skill::{default_skills, Skill};

// =============================================================================
// Player
// =============================================================================

/// Player template, AP economy and skill list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSettings {
    /// Display name.
    pub name: String,
    /// Maximum health.
    pub max_health: i32,
    /// ATK.
    pub attack: i32,
    /// DEF.
    pub defense: i32,
    /// LCK.
    pub luck: i32,
    /// PWR. Skills carry their own power, so this is only informational.
    pub power: i32,
    /// AP cap.
    pub max_ap: u32,
    /// AP at encounter start. `None` means full.
    pub starting_ap: Option<u32>,
    /// AP restored at the start of every player turn.
    pub ap_regen: u32,
    /// Skills, addressed by index.
    pub skills: Vec<Skill>,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            max_health: 50,
            attack: 10,
            defense: 5,
            luck: 5,
            power: 0,
            max_ap: 50,
            starting_ap: None,
            ap_regen: 15,
            skills: default_skills(),
        }
    }
}

impl PlayerSettings {
    /// Stat template for the player combatant.
    #[must_use]
    pub fn stats(&self) -> CombatantStats {
        CombatantStats::new(
            &self.name,
            self.max_health,
            self.attack,
            self.defense,
            self.luck,
            self.power,
        )
    }

    /// Starting AP pool.
    #[must_use]
    pub fn action_points(&self) -> ActionPoints {
        ActionPoints::new(self.starting_ap.unwrap_or(self.max_ap), self.max_ap)
    }

    /// Checks stats and skills.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStats`], [`ConfigError::NoSkills`] or
    /// [`ConfigError::InvalidSkill`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.stats().validate()?;
        if self.skills.is_empty() {
            return Err(ConfigError::NoSkills);
        }
        for skill in &self.skills {
            skill.validate()?;
        }
        Ok(())
    }
}

// =============================================================================
// Pacing
// =============================================================================

/// Suggested real-time delays, in milliseconds, for each [`Pacing`] hint.
///
/// The engine never sleeps. These values are read by whatever drives
/// [`advance`](crate::engine::CombatEngine::advance).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingSettings {
    /// Pause between the hits of a multi-hit skill.
    pub hit_ms: u64,
    /// Pause before each enemy acts.
    pub enemy_action_ms: u64,
    /// Length of the reward interlude.
    pub reward_interlude_ms: u64,
    /// Pause before the next round spawns.
    pub round_transition_ms: u64,
}

impl Default for PacingSettings {
    fn default() -> Self {
        Self {
            hit_ms: 200,
            enemy_action_ms: 1000,
            reward_interlude_ms: 5000,
            round_transition_ms: 2000,
        }
    }
}

impl PacingSettings {
    /// All delays zero, for headless runs.
    #[must_use]
    pub const fn instant() -> Self {
        Self {
            hit_ms: 0,
            enemy_action_ms: 0,
            reward_interlude_ms: 0,
            round_transition_ms: 0,
        }
    }

    /// Delay to wait before running a step with the given hint.
    #[must_use]
    pub const fn delay(&self, pacing: Pacing) -> Duration {
        let ms = match pacing {
            Pacing::Immediate => 0,
            Pacing::Hit => self.hit_ms,
            Pacing::EnemyAction => self.enemy_action_ms,
            Pacing::RewardInterlude => self.reward_interlude_ms,
            Pacing::RoundTransition => self.round_transition_ms,
        };
        Duration::from_millis(ms)
    }
}

// =============================================================================
// Encounter file
// =============================================================================

/// A round in an encounter file: a name and bestiary keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundFile {
    /// Display name.
    pub name: String,
    /// Bestiary keys in spawn order.
    pub enemies: Vec<String>,
}

/// On-disk encounter description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterFile {
    /// Damage formula coefficients.
    pub formula: DamageFormulaConfig,
    /// Player settings.
    pub player: PlayerSettings,
    /// Presentation delays.
    pub pacing: PacingSettings,
    /// Additional or replacement enemy templates.
    pub bestiary: BTreeMap<String, EnemySpawn>,
    /// Rounds in play order.
    pub rounds: Vec<RoundFile>,
    /// Round indices followed by a reward interlude. When absent, the
    /// built-in reward indices that come before the final round are used.
    pub reward_rounds: Option<Vec<usize>>,
    /// Index whose completion wins. Defaults to the last round.
    pub final_round: Option<usize>,
    /// Maximum enemies per round.
    pub spawn_slots: usize,
}

impl Default for EncounterFile {
    fn default() -> Self {
        Self {
            formula: DamageFormulaConfig::default(),
            player: PlayerSettings::default(),
            pacing: PacingSettings::default(),
            bestiary: BTreeMap::new(),
            rounds: encounter::standard_round_keys()
                .map(|(name, keys)| RoundFile {
                    name: name.to_string(),
                    enemies: keys.iter().map(ToString::to_string).collect(),
                })
                .collect(),
            reward_rounds: None,
            final_round: None,
            spawn_slots: DEFAULT_SPAWN_SLOTS,
        }
    }
}

impl EncounterFile {
    /// Reads and parses a JSON encounter file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Parse`] if it is not valid JSON for this schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), bytes = text.len(), "read encounter file");
        Self::from_json(&text)
    }

    /// Parses an encounter from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] on malformed input.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Resolves bestiary keys and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEnemy`] for a key missing from both the
    /// built-in and the file bestiary, or any error from
    /// [`EncounterSetup::validate`].
    pub fn into_setup(self) -> Result<EncounterSetup, ConfigError> {
        let mut bestiary = Bestiary::standard();
        for (key, spawn) in self.bestiary {
            if bestiary.insert(&key, spawn).is_some() {
                debug!(key = %key, "bestiary entry overridden");
            }
        }

        let rounds = self
            .rounds
            .iter()
            .enumerate()
            .map(|(index, round)| bestiary.round(index, &round.name, round.enemies.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;

        let final_round = self
            .final_round
            .unwrap_or_else(|| rounds.len().saturating_sub(1));

        let setup = EncounterSetup {
            formula: self.formula,
            player: self.player,
            pacing: self.pacing,
            rounds,
            reward_rounds: match self.reward_rounds {
                Some(indices) => indices.into_iter().collect(),
                None => encounter::standard_reward_rounds()
                    .filter(|&index| index < final_round)
                    .collect(),
            },
            final_round,
            spawn_slots: self.spawn_slots,
        };
        setup.validate()?;
        Ok(setup)
    }
}
