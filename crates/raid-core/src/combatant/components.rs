//! Stat and runtime-state structs shared by the player and enemies.
//!
//! [`CombatantStats`] is the immutable template loaded from configuration.
//! [`CombatantState`] is the mutable copy a combatant carries through a fight.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Immutable stat template for a combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantStats {
    /// Display name.
    pub name: String,
    /// Maximum (and starting) health.
    pub max_health: i32,
    /// ATK.
    pub attack: i32,
    /// DEF.
    pub defense: i32,
    /// LCK, drives crit chance.
    pub luck: i32,
    /// PWR, drives the damage roll of a basic attack.
    #[serde(default)]
    pub power: i32,
}

impl CombatantStats {
    /// Creates a stat block.
    #[must_use]
    pub fn new(name: &str, max_health: i32, attack: i32, defense: i32, luck: i32, power: i32) -> Self {
        Self {
            name: name.to_string(),
            max_health,
            attack,
            defense,
            luck,
            power,
        }
    }

    /// Checks the stat block's invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidStats`] for an empty name, non-positive
    /// max health, or any negative stat.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidStats {
            name: self.name.clone(),
            reason,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name is empty".to_string()));
        }
        if self.max_health <= 0 {
            return Err(invalid(format!("max_health {} must be positive", self.max_health)));
        }
        for (stat, value) in [
            ("attack", self.attack),
            ("defense", self.defense),
            ("luck", self.luck),
            ("power", self.power),
        ] {
            if value < 0 {
                return Err(invalid(format!("{stat} {value} is negative")));
            }
        }
        Ok(())
    }
}

/// The player's action-point pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionPoints {
    current: u32,
    max: u32,
}

impl ActionPoints {
    /// Creates a pool, clamping `current` to `max`.
    #[must_use]
    pub fn new(current: u32, max: u32) -> Self {
        Self {
            current: current.min(max),
            max,
        }
    }

    /// Current AP.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Maximum AP.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Returns true if `cost` can be paid.
    #[must_use]
    pub const fn can_afford(&self, cost: u32) -> bool {
        self.current >= cost
    }

    /// Pays `cost`. Returns false and leaves the pool unchanged if it cannot.
    pub fn spend(&mut self, cost: u32) -> bool {
        if self.can_afford(cost) {
            self.current -= cost;
            true
        } else {
            false
        }
    }

    /// Adds `amount`, clamped to the maximum. Returns the new value.
    pub fn regenerate(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current
    }
}

/// Mutable per-fight state of a combatant.
///
/// The current stats start equal to the template and stay that way until
/// something modifies them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantState {
    /// Current health, always in `[0, max_health]`.
    pub(crate) health: i32,
    /// Current ATK.
    pub attack: i32,
    /// Current DEF.
    pub defense: i32,
    /// Current LCK.
    pub luck: i32,
    /// Current PWR.
    pub power: i32,
    /// AP pool (player only).
    pub action_points: Option<ActionPoints>,
}

impl CombatantState {
    /// Fresh state at full health with template stats.
    #[must_use]
    pub fn from_stats(stats: &CombatantStats) -> Self {
        Self {
            health: stats.max_health,
            attack: stats.attack,
            defense: stats.defense,
            luck: stats.luck,
            power: stats.power,
            action_points: None,
        }
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod stats_tests {
        use super::*;

        #[test]
        fn valid_stats_pass() {
            let stats = CombatantStats::new("Goblin", 30, 8, 3, 2, 1);
            assert!(stats.validate().is_ok());
        }

        #[test]
        fn zero_health_rejected() {
            let stats = CombatantStats::new("Ghost", 0, 8, 3, 2, 1);
            assert!(matches!(stats.validate(), Err(ConfigError::InvalidStats { .. })));
        }

        #[test]
        fn negative_stat_rejected() {
            let stats = CombatantStats::new("Cursed", 10, 8, -1, 2, 1);
            let err = stats.validate().unwrap_err();
            assert!(err.to_string().contains("defense"));
        }

        #[test]
        fn power_defaults_to_zero() {
            let stats: CombatantStats = serde_json::from_str(
                r#"{ "name": "Rat", "max_health": 5, "attack": 1, "defense": 1, "luck": 0 }"#,
            )
            .unwrap();
            assert_eq!(stats.power, 0);
        }
    }

    mod action_points_tests {
        use super::*;

        #[test]
        fn new_clamps_to_max() {
            let ap = ActionPoints::new(80, 50);
            assert_eq!(ap.current(), 50);
        }

        #[test]
        fn regenerate_clamps_to_max() {
            let mut ap = ActionPoints::new(45, 50);
            assert_eq!(ap.regenerate(15), 50);
            assert_eq!(ap.regenerate(u32::MAX), 50);
        }

        #[test]
        fn spend_rejects_overdraft() {
            let mut ap = ActionPoints::new(10, 50);
            assert!(!ap.spend(11));
            assert_eq!(ap.current(), 10);
            assert!(ap.spend(10));
            assert_eq!(ap.current(), 0);
        }
    }

    #[test]
    fn state_mirrors_template() {
        let stats = CombatantStats::new("Ooze", 35, 7, 2, 1, 1);
        let state = CombatantState::from_stats(&stats);
        assert_eq!(state.health(), 35);
        assert_eq!(state.attack, 7);
        assert_eq!(state.defense, 2);
        assert!(state.action_points.is_none());
    }
}
