//! Encounter definition: rounds, rosters and round progression.
//!
//! An [`EncounterSetup`] is the validated, read-only description of a whole
//! raid. The engine indexes into its rounds and asks it what happens when a
//! round is cleared ([`RoundCompletion`]).
//!
//! Enemy templates live in a [`Bestiary`] keyed by short names. Rounds in an
//! encounter file reference enemies by key; the built-in templates are
//! installed first and file entries override them.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::combatant::CombatantStats;
use crate::config::{PacingSettings, PlayerSettings};
use crate::damage::DamageFormulaConfig;
use crate::error::ConfigError;

/// Default number of enemy spawn slots.
pub const DEFAULT_SPAWN_SLOTS: usize = 3;

/// Rosters of the built-in raid, by bestiary key.
const STANDARD_ROUNDS: [(&str, &[&str]); 5] = [
    ("Slime Pit", &["slime", "slime"]),
    ("Goblin Scouts", &["goblin", "slime"]),
    ("Ooze Cellar", &["ooze", "slime", "slime"]),
    ("Goblin Warband", &["goblin", "goblin", "slime"]),
    ("Dragon's Antechamber", &["ooze", "goblin", "ooze"]),
];

/// Round indices followed by a reward interlude in the built-in raid.
const STANDARD_REWARD_ROUNDS: [usize; 2] = [0, 2];

// =============================================================================
// Enemy templates
// =============================================================================

/// One enemy in a round roster: stat template plus an opaque visual key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemySpawn {
    /// Stat template.
    #[serde(flatten)]
    pub stats: CombatantStats,
    /// Presentation key (sprite path, prefab name). Never read by the core.
    #[serde(default)]
    pub visual: Option<String>,
}

impl EnemySpawn {
    /// Creates a spawn descriptor without a visual.
    #[must_use]
    pub fn new(stats: CombatantStats) -> Self {
        Self { stats, visual: None }
    }

    /// Attaches a visual key.
    #[must_use]
    pub fn with_visual(mut self, visual: &str) -> Self {
        self.visual = Some(visual.to_string());
        self
    }

    /// Goblin: 30 HP, ATK 8, DEF 3, LCK 2, PWR 1.
    #[must_use]
    pub fn goblin() -> Self {
        Self::new(CombatantStats::new("Goblin", 30, 8, 3, 2, 1)).with_visual("enemies/goblin.png")
    }

    /// Slime: 20 HP, ATK 5, DEF 1, LCK 1, PWR 1.
    #[must_use]
    pub fn slime() -> Self {
        Self::new(CombatantStats::new("Slime", 20, 5, 1, 1, 1)).with_visual("enemies/slime.png")
    }

    /// Ooze: 35 HP, ATK 7, DEF 2, LCK 1, PWR 1.
    #[must_use]
    pub fn ooze() -> Self {
        Self::new(CombatantStats::new("Ooze", 35, 7, 2, 1, 1)).with_visual("enemies/ooze.png")
    }
}

/// Enemy templates by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bestiary {
    entries: BTreeMap<String, EnemySpawn>,
}

impl Bestiary {
    /// Empty bestiary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in templates: `goblin`, `slime`, `ooze`.
    #[must_use]
    pub fn standard() -> Self {
        let mut bestiary = Self::new();
        bestiary.insert("goblin", EnemySpawn::goblin());
        bestiary.insert("slime", EnemySpawn::slime());
        bestiary.insert("ooze", EnemySpawn::ooze());
        bestiary
    }

    /// Adds or replaces a template. Returns the previous one, if any.
    pub fn insert(&mut self, key: &str, spawn: EnemySpawn) -> Option<EnemySpawn> {
        self.entries.insert(key.to_string(), spawn)
    }

    /// Looks up a template.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&EnemySpawn> {
        self.entries.get(key)
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds a round from bestiary keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownEnemy`] for the first key that has no
    /// template. `round` is only used for the error.
    pub fn round(&self, round: usize, name: &str, keys: &[impl AsRef<str>]) -> Result<Round, ConfigError> {
        let enemies = keys
            .iter()
            .map(|key| {
                let key = key.as_ref();
                self.get(key).cloned().ok_or_else(|| ConfigError::UnknownEnemy {
                    round,
                    key: key.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Round::new(name, enemies))
    }
}

// =============================================================================
// Rounds
// =============================================================================

/// A named wave of enemies, spawned in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Display name.
    pub name: String,
    /// Roster in spawn order.
    pub enemies: Vec<EnemySpawn>,
}

impl Round {
    /// Creates a round.
    #[must_use]
    pub fn new(name: &str, enemies: Vec<EnemySpawn>) -> Self {
        Self {
            name: name.to_string(),
            enemies,
        }
    }
}

/// What follows the clearing of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundCompletion {
    /// The final round: reward interlude, then victory.
    Final,
    /// Reward interlude, then the next round.
    Reward,
    /// Straight on to the next round.
    Advance,
}

// =============================================================================
// EncounterSetup
// =============================================================================

/// Everything needed to run one encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterSetup {
    /// Damage formula coefficients, fixed for the whole encounter.
    pub formula: DamageFormulaConfig,
    /// Player template, AP economy and skills.
    pub player: PlayerSettings,
    /// Suggested delays for the presentation layer.
    pub pacing: PacingSettings,
    /// Rounds in play order.
    pub rounds: Vec<Round>,
    /// Indices followed by a reward interlude.
    pub reward_rounds: BTreeSet<usize>,
    /// Index whose completion wins the encounter.
    pub final_round: usize,
    /// Maximum enemies per round.
    pub spawn_slots: usize,
}

impl EncounterSetup {
    /// Creates a setup with default formula, player and pacing, no reward
    /// rounds, and the last round as the final one.
    #[must_use]
    pub fn new(rounds: Vec<Round>) -> Self {
        let final_round = rounds.len().saturating_sub(1);
        Self {
            formula: DamageFormulaConfig::default(),
            player: PlayerSettings::default(),
            pacing: PacingSettings::default(),
            rounds,
            reward_rounds: BTreeSet::new(),
            final_round,
            spawn_slots: DEFAULT_SPAWN_SLOTS,
        }
    }

    /// The built-in five-round raid: rewards after rounds 0 and 2, final
    /// round 4.
    #[must_use]
    pub fn standard() -> Self {
        let bestiary = Bestiary::standard();
        let rounds = STANDARD_ROUNDS
            .iter()
            .map(|(name, keys)| {
                Round::new(
                    name,
                    keys.iter().filter_map(|key| bestiary.get(key).cloned()).collect(),
                )
            })
            .collect();
        Self::new(rounds).with_reward_rounds(STANDARD_REWARD_ROUNDS)
    }

    /// Replaces the reward round set.
    #[must_use]
    pub fn with_reward_rounds(mut self, rounds: impl IntoIterator<Item = usize>) -> Self {
        self.reward_rounds = rounds.into_iter().collect();
        self
    }

    /// Sets the final round index.
    #[must_use]
    pub fn with_final_round(mut self, index: usize) -> Self {
        self.final_round = index;
        self
    }

    /// Replaces the damage formula.
    #[must_use]
    pub fn with_formula(mut self, formula: DamageFormulaConfig) -> Self {
        self.formula = formula;
        self
    }

    /// Replaces the player settings.
    #[must_use]
    pub fn with_player(mut self, player: PlayerSettings) -> Self {
        self.player = player;
        self
    }

    /// Sets the spawn slot count.
    #[must_use]
    pub fn with_spawn_slots(mut self, slots: usize) -> Self {
        self.spawn_slots = slots;
        self
    }

    /// Round at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::RoundOutOfRange`] past the last round.
    pub fn round(&self, index: usize) -> Result<&Round, ConfigError> {
        self.rounds.get(index).ok_or(ConfigError::RoundOutOfRange {
            index,
            len: self.rounds.len(),
        })
    }

    /// What follows clearing round `index`.
    #[must_use]
    pub fn completion(&self, index: usize) -> RoundCompletion {
        if index == self.final_round {
            RoundCompletion::Final
        } else if self.reward_rounds.contains(&index) {
            RoundCompletion::Reward
        } else {
            RoundCompletion::Advance
        }
    }

    /// Checks the whole setup.
    ///
    /// # Errors
    ///
    /// Returns the first problem found: no rounds, an empty or oversized
    /// roster, a bad stat block, a final or reward index past the end, or an
    /// invalid formula, player or skill.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rounds.is_empty() {
            return Err(ConfigError::NoRounds);
        }
        self.formula.validate()?;
        self.player.validate()?;

        for (index, round) in self.rounds.iter().enumerate() {
            if round.enemies.is_empty() {
                return Err(ConfigError::EmptyRound {
                    index,
                    name: round.name.clone(),
                });
            }
            if round.enemies.len() > self.spawn_slots {
                return Err(ConfigError::TooManyEnemies {
                    round: index,
                    count: round.enemies.len(),
                    slots: self.spawn_slots,
                });
            }
            for spawn in &round.enemies {
                spawn.stats.validate()?;
            }
        }

        let len = self.rounds.len();
        if self.final_round >= len {
            return Err(ConfigError::RoundOutOfRange {
                index: self.final_round,
                len,
            });
        }
        if let Some(&index) = self.reward_rounds.iter().find(|&&i| i >= len) {
            return Err(ConfigError::RoundOutOfRange { index, len });
        }

        if self.final_round + 1 < len {
            warn!(
                final_round = self.final_round,
                rounds = len,
                "rounds after the final round are unreachable"
            );
        }
        if self.reward_rounds.contains(&self.final_round) {
            warn!(final_round = self.final_round, "final round is also listed as a reward round");
        }
        Ok(())
    }
}

impl Default for EncounterSetup {
    fn default() -> Self {
        Self::standard()
    }
}

/// Built-in raid layout as bestiary keys, for encounter files.
pub(crate) fn standard_round_keys() -> impl Iterator<Item = (&'static str, &'static [&'static str])> {
    STANDARD_ROUNDS.iter().copied()
}

/// Built-in reward indices.
pub(crate) fn standard_reward_rounds() -> impl Iterator<Item = usize> {
    STANDARD_REWARD_ROUNDS.iter().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    mod bestiary_tests {
        use super::*;

        #[test]
        fn standard_has_three_templates() {
            let bestiary = Bestiary::standard();
            assert_eq!(bestiary.len(), 3);
            assert_eq!(bestiary.get("goblin").unwrap().stats.max_health, 30);
            assert_eq!(bestiary.get("slime").unwrap().stats.attack, 5);
            assert_eq!(bestiary.get("ooze").unwrap().stats.defense, 2);
        }

        #[test]
        fn round_from_keys() {
            let round = Bestiary::standard().round(0, "Pair", &["slime", "ooze"]).unwrap();
            assert_eq!(round.enemies.len(), 2);
            assert_eq!(round.enemies[1].stats.name, "Ooze");
        }

        #[test]
        fn unknown_key_is_reported() {
            let err = Bestiary::standard().round(3, "Bad", &["dragon"]).unwrap_err();
            assert!(matches!(err, ConfigError::UnknownEnemy { round: 3, ref key } if key == "dragon"));
        }

        #[test]
        fn spawn_flattens_stats() {
            let spawn: EnemySpawn = serde_json::from_str(
                r#"{ "name": "Bat", "max_health": 8, "attack": 3, "defense": 0, "luck": 4, "visual": "bat" }"#,
            )
            .unwrap();
            assert_eq!(spawn.stats.name, "Bat");
            assert_eq!(spawn.visual.as_deref(), Some("bat"));
        }
    }

    mod setup_tests {
        use super::*;

        #[test]
        fn standard_is_valid() {
            let setup = EncounterSetup::standard();
            assert!(setup.validate().is_ok());
            assert_eq!(setup.rounds.len(), 5);
            assert_eq!(setup.final_round, 4);
        }

        #[test]
        fn completion_policy() {
            let setup = EncounterSetup::standard();
            assert_eq!(setup.completion(0), RoundCompletion::Reward);
            assert_eq!(setup.completion(1), RoundCompletion::Advance);
            assert_eq!(setup.completion(2), RoundCompletion::Reward);
            assert_eq!(setup.completion(3), RoundCompletion::Advance);
            assert_eq!(setup.completion(4), RoundCompletion::Final);
        }

        #[test]
        fn no_rounds_rejected() {
            let setup = EncounterSetup::new(Vec::new());
            assert!(matches!(setup.validate(), Err(ConfigError::NoRounds)));
        }

        #[test]
        fn empty_round_rejected() {
            let setup = EncounterSetup::new(vec![Round::new("Nothing", Vec::new())]);
            assert!(matches!(setup.validate(), Err(ConfigError::EmptyRound { index: 0, .. })));
        }

        #[test]
        fn oversized_round_rejected() {
            let setup = EncounterSetup::new(vec![Round::new("Swarm", vec![EnemySpawn::slime(); 4])]);
            assert!(matches!(
                setup.validate(),
                Err(ConfigError::TooManyEnemies { count: 4, slots: 3, .. })
            ));
            assert!(setup.with_spawn_slots(4).validate().is_ok());
        }

        #[test]
        fn final_round_out_of_range() {
            let setup = EncounterSetup::new(vec![Round::new("One", vec![EnemySpawn::slime()])])
                .with_final_round(1);
            assert!(matches!(
                setup.validate(),
                Err(ConfigError::RoundOutOfRange { index: 1, len: 1 })
            ));
        }

        #[test]
        fn reward_round_out_of_range() {
            let setup = EncounterSetup::new(vec![Round::new("One", vec![EnemySpawn::slime()])])
                .with_reward_rounds([5]);
            assert!(matches!(
                setup.validate(),
                Err(ConfigError::RoundOutOfRange { index: 5, .. })
            ));
        }

        #[test]
        fn round_lookup() {
            let setup = EncounterSetup::standard();
            assert_eq!(setup.round(1).unwrap().name, "Goblin Scouts");
            assert!(setup.round(5).is_err());
        }
    }
}
