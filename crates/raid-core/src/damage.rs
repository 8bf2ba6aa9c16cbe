//! Damage formula.
//!
//! The formula is a pure function of the attacker's ATK/LCK/PWR, the
//! defender's DEF, an immutable [`DamageFormulaConfig`] snapshot, and two
//! random draws. The draws are taken in a fixed order (spread first, crit
//! roll second) so a seeded generator reproduces every roll exactly.
//!
//! # Formula
//!
//! ```text
//! rand_value      = uniform(rand_min * PWR, rand_max * PWR)
//! main_multiplier = (ATK * attack_potency) / (max(DEF, 1) * divisor)
//! penalty         = DEF * defense_potency * penalty_multiplier * penalty_scalar * penalty_toggle
//! base            = floor(rand_value * (main_multiplier - penalty) + flat_bonus)
//! critical        = crit_roll < LCK * luck_to_crit          (crit_roll in [0, 100))
//! damage          = max(critical ? floor(base * crit_multiplier) : base, 1)
//! ```
//!
//! A `divisor` of zero is read as one for the computation. A DEF below one is
//! raised to one in the main multiplier only; the penalty term sees the raw
//! value.
//!
//! # Example
//!
//! ```
//! use raid_core::damage::{resolve_damage_with, AttackProfile, DamageDraws, DamageFormulaConfig};
//!
//! let config = DamageFormulaConfig { luck_to_crit: 0.0, ..DamageFormulaConfig::default() };
//! let attacker = AttackProfile::new(10, 0, 5);
//! let roll = resolve_damage_with(attacker, 5, &config, DamageDraws::new(0.0, 99.0));
//!
//! assert_eq!(roll.base_damage, 10);
//! assert_eq!(roll.damage, 10);
//! assert!(!roll.critical);
//! ```

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunable coefficients of the damage formula.
///
/// Set once when an encounter is built and read by every damage computation.
/// The engine only ever hands out shared references to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DamageFormulaConfig {
    /// Lower bound of the random spread, as a multiple of PWR.
    pub rand_min_multiplier: f64,
    /// Upper bound of the random spread, as a multiple of PWR.
    pub rand_max_multiplier: f64,
    /// Scales the attacker's ATK.
    pub attack_potency: f64,
    /// Scales the defender's DEF in the divisor. Zero is read as one.
    pub defense_divisor: f64,
    /// Scales DEF in the penalty term.
    pub defense_potency: f64,
    /// Penalty multiplier.
    pub defense_penalty_multiplier: f64,
    /// Penalty scalar.
    pub defense_penalty_scalar: f64,
    /// Penalty on/off switch (0 disables the penalty term).
    pub defense_penalty_toggle: f64,
    /// Added after the spread is applied.
    pub flat_damage_bonus: f64,
    /// Crit chance (out of 100) per point of LCK.
    pub luck_to_crit: f64,
    /// Damage multiplier on a critical hit.
    pub crit_damage_multiplier: f64,
}

impl Default for DamageFormulaConfig {
    fn default() -> Self {
        Self {
            rand_min_multiplier: 1.0,
            rand_max_multiplier: 1.0,
            attack_potency: 1.0,
            defense_divisor: 1.0,
            defense_potency: 1.0,
            defense_penalty_multiplier: 1.0,
            defense_penalty_scalar: 1.0,
            defense_penalty_toggle: 0.0,
            flat_damage_bonus: 0.0,
            luck_to_crit: 0.5,
            crit_damage_multiplier: 1.5,
        }
    }
}

impl DamageFormulaConfig {
    /// Checks that every coefficient is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidFormula`] for non-finite coefficients, a
    /// negative or inverted random range, a negative crit rate, or a crit
    /// multiplier below one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let coefficients = [
            ("rand_min_multiplier", self.rand_min_multiplier),
            ("rand_max_multiplier", self.rand_max_multiplier),
            ("attack_potency", self.attack_potency),
            ("defense_divisor", self.defense_divisor),
            ("defense_potency", self.defense_potency),
            ("defense_penalty_multiplier", self.defense_penalty_multiplier),
            ("defense_penalty_scalar", self.defense_penalty_scalar),
            ("defense_penalty_toggle", self.defense_penalty_toggle),
            ("flat_damage_bonus", self.flat_damage_bonus),
            ("luck_to_crit", self.luck_to_crit),
            ("crit_damage_multiplier", self.crit_damage_multiplier),
        ];
        if let Some((name, _)) = coefficients.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::InvalidFormula(format!("{name} is not finite")));
        }
        if self.rand_min_multiplier < 0.0 {
            return Err(ConfigError::InvalidFormula(
                "rand_min_multiplier is negative".to_string(),
            ));
        }
        if self.rand_min_multiplier > self.rand_max_multiplier {
            return Err(ConfigError::InvalidFormula(format!(
                "rand_min_multiplier {} exceeds rand_max_multiplier {}",
                self.rand_min_multiplier, self.rand_max_multiplier
            )));
        }
        if self.luck_to_crit < 0.0 {
            return Err(ConfigError::InvalidFormula("luck_to_crit is negative".to_string()));
        }
        if self.crit_damage_multiplier < 1.0 {
            return Err(ConfigError::InvalidFormula(format!(
                "crit_damage_multiplier {} is below 1",
                self.crit_damage_multiplier
            )));
        }
        Ok(())
    }

    /// Divisor actually used by the formula.
    #[must_use]
    pub fn effective_divisor(&self) -> f64 {
        if self.defense_divisor == 0.0 {
            1.0
        } else {
            self.defense_divisor
        }
    }
}

/// Attacker-side stats fed into one damage application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackProfile {
    /// ATK.
    pub attack: i32,
    /// LCK.
    pub luck: i32,
    /// PWR for this hit.
    pub power: i32,
}

impl AttackProfile {
    /// Creates an attack profile.
    #[must_use]
    pub const fn new(attack: i32, luck: i32, power: i32) -> Self {
        Self {
            attack,
            luck,
            power,
        }
    }
}

/// The two random inputs of one damage computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageDraws {
    /// Position inside the spread range, in `[0, 1)`.
    pub spread: f64,
    /// Crit roll, in `[0, 100)`.
    pub crit_roll: f64,
}

impl DamageDraws {
    /// Creates draws from explicit values.
    #[must_use]
    pub const fn new(spread: f64, crit_roll: f64) -> Self {
        Self { spread, crit_roll }
    }

    /// Draws spread then crit roll from `rng`.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let spread = rng.gen::<f64>();
        let crit_roll = rng.gen::<f64>() * 100.0;
        Self { spread, crit_roll }
    }
}

/// Full breakdown of one damage computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageRoll {
    /// Spread value drawn from the PWR range.
    pub rand_value: f64,
    /// ATK/DEF ratio term.
    pub main_multiplier: f64,
    /// Defense penalty term.
    pub penalty: f64,
    /// Damage before the crit multiplier and the minimum clamp.
    pub base_damage: i32,
    /// Crit chance out of 100.
    pub crit_chance: f64,
    /// Whether the hit was critical.
    pub critical: bool,
    /// Final damage, never below 1.
    pub damage: i32,
}

/// Resolves damage drawing both random values from `rng`.
pub fn resolve_damage<R: Rng + ?Sized>(
    attacker: AttackProfile,
    defense: i32,
    config: &DamageFormulaConfig,
    rng: &mut R,
) -> DamageRoll {
    resolve_damage_with(attacker, defense, config, DamageDraws::sample(rng))
}

/// Resolves damage from explicit draws.
#[must_use]
pub fn resolve_damage_with(
    attacker: AttackProfile,
    defense: i32,
    config: &DamageFormulaConfig,
    draws: DamageDraws,
) -> DamageRoll {
    let atk = f64::from(attacker.attack);
    let pwr = f64::from(attacker.power);
    let def = f64::from(defense);

    let low = config.rand_min_multiplier * pwr;
    let high = config.rand_max_multiplier * pwr;
    let rand_value = low + draws.spread * (high - low);

    let main_multiplier =
        (atk * config.attack_potency) / (f64::from(defense.max(1)) * config.effective_divisor());
    let penalty = def
        * config.defense_potency
        * config.defense_penalty_multiplier
        * config.defense_penalty_scalar
        * config.defense_penalty_toggle;

    let base_damage =
        floor_to_i32(rand_value * (main_multiplier - penalty) + config.flat_damage_bonus);

    let crit_chance = f64::from(attacker.luck) * config.luck_to_crit;
    let critical = draws.crit_roll < crit_chance;

    let damage = if critical {
        floor_to_i32(f64::from(base_damage) * config.crit_damage_multiplier)
    } else {
        base_damage
    };

    DamageRoll {
        rand_value,
        main_multiplier,
        penalty,
        base_damage,
        crit_chance,
        critical,
        damage: damage.max(1),
    }
}

// Saturating; NaN maps to 0 and is then lifted by the minimum clamp.
#[allow(clippy::cast_possible_truncation)]
fn floor_to_i32(value: f64) -> i32 {
    value.floor() as i32
}
