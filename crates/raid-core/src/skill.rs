//! Player skills.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Index of a skill in the player's skill list.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SkillId(usize);

impl SkillId {
    /// Creates a skill id from a list index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the list index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for SkillId {
    fn from(index: usize) -> Self {
        Self::new(index)
    }
}

/// What a skill does when committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillKind {
    /// Damages the current target `hit_count` times.
    #[default]
    Attack,
    /// Restores a quarter of the player's max health. Needs no target.
    Heal,
}

/// A player skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    /// Display name.
    pub name: String,
    /// Attack or heal.
    #[serde(default)]
    pub kind: SkillKind,
    /// AP spent when the skill is committed.
    #[serde(default)]
    pub ap_cost: u32,
    /// Number of discrete damage applications.
    #[serde(default = "default_hit_count")]
    pub hit_count: u32,
    /// Base power of each hit.
    #[serde(default)]
    pub power: i32,
    /// Multiplier applied to `power` for each hit.
    #[serde(default = "default_damage_multiplier")]
    pub damage_multiplier: f64,
}

fn default_hit_count() -> u32 {
    1
}

fn default_damage_multiplier() -> f64 {
    1.0
}

impl Skill {
    /// Creates a single-hit attack skill.
    #[must_use]
    pub fn attack(name: &str, power: i32, ap_cost: u32) -> Self {
        Self {
            name: name.to_string(),
            kind: SkillKind::Attack,
            ap_cost,
            hit_count: 1,
            power,
            damage_multiplier: 1.0,
        }
    }

    /// Creates a heal skill.
    #[must_use]
    pub fn heal(name: &str, ap_cost: u32) -> Self {
        Self {
            name: name.to_string(),
            kind: SkillKind::Heal,
            ap_cost,
            hit_count: 1,
            power: 0,
            damage_multiplier: 1.0,
        }
    }

    /// Sets the hit count.
    #[must_use]
    pub fn with_hits(mut self, hit_count: u32) -> Self {
        self.hit_count = hit_count;
        self
    }

    /// Sets the per-hit damage multiplier.
    #[must_use]
    pub fn with_multiplier(mut self, damage_multiplier: f64) -> Self {
        self.damage_multiplier = damage_multiplier;
        self
    }

    /// PWR used for each hit: `floor(power * damage_multiplier)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn hit_power(&self) -> i32 {
        (f64::from(self.power) * self.damage_multiplier).floor() as i32
    }

    /// Checks the skill's invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSkill`] for an empty name, a zero hit
    /// count, negative power, or a negative/non-finite multiplier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidSkill {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.hit_count < 1 {
            return Err(invalid("hit_count must be at least 1"));
        }
        if self.power < 0 {
            return Err(invalid("power is negative"));
        }
        if !self.damage_multiplier.is_finite() || self.damage_multiplier < 0.0 {
            return Err(invalid("damage_multiplier must be a non-negative number"));
        }
        Ok(())
    }
}

/// Default player loadout: a free single strike, a three-hit combo, a heal.
#[must_use]
pub fn default_skills() -> Vec<Skill> {
    vec![
        Skill::attack("Strike", 10, 0),
        Skill::attack("Flurry", 6, 20).with_hits(3),
        Skill::heal("Heal", 15),
    ]
}
