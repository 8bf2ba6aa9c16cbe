//! Combatant module: the player and the enemies share one representation.
//!
//! - [`CombatantId`]: unique identifier inside an arena
//! - [`CombatantKind`]: player or enemy
//! - [`Combatant`]: template stats plus the mutable fight state
//!
//! # Health
//!
//! Health is clamped into `[0, max_health]` on every mutation. A combatant is
//! dead once health reaches zero, and stays dead: healing a dead combatant
//! does nothing.
//!
//! # Example
//!
//! ```
//! use raid_core::combatant::{Combatant, CombatantId, CombatantKind};
//! use raid_core::combatant::components::CombatantStats;
//!
//! let mut goblin = Combatant::new(
//!     CombatantId::new(1),
//!     CombatantKind::Enemy,
//!     CombatantStats::new("Goblin", 30, 8, 3, 2, 1),
//! );
//!
//! let change = goblin.apply_damage(12);
//! assert_eq!(change.health_after, 18);
//! assert!(goblin.is_alive());
//!
//! assert!(goblin.force_kill());
//! assert!(goblin.is_dead());
//! ```

pub mod components;

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::damage::{resolve_damage, AttackProfile, DamageFormulaConfig, DamageRoll};

pub use components::{ActionPoints, CombatantState, CombatantStats};

/// Unique identifier for a combatant.
///
/// Ids are assigned monotonically by the arena and never reused within an
/// encounter, so an id held by presentation stays unambiguous after the
/// combatant dies.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CombatantId(u64);

impl CombatantId {
    /// Creates a new `CombatantId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CombatantId({})", self.0)
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CombatantId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<CombatantId> for u64 {
    fn from(id: CombatantId) -> Self {
        id.0
    }
}

/// Which side a combatant fights on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    /// The player character. Exactly one per encounter.
    Player,
    /// A member of a round's roster.
    Enemy,
}

impl fmt::Display for CombatantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "Player"),
            Self::Enemy => write!(f, "Enemy"),
        }
    }
}

/// Health before and after one mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthChange {
    /// Health before.
    pub health_before: i32,
    /// Health after, clamped.
    pub health_after: i32,
    /// True if this change moved the combatant from alive to dead.
    pub died: bool,
}

/// Result of [`Combatant::take_damage`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    /// Formula breakdown.
    pub roll: DamageRoll,
    /// Health change caused by the roll.
    pub change: HealthChange,
}

/// A fighter in the arena.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    id: CombatantId,
    kind: CombatantKind,
    stats: CombatantStats,
    state: CombatantState,
    /// Opaque presentation key (sprite/prefab), never read by the core.
    visual: Option<String>,
}

impl Combatant {
    /// Creates a combatant at full health.
    #[must_use]
    pub fn new(id: CombatantId, kind: CombatantKind, stats: CombatantStats) -> Self {
        let state = CombatantState::from_stats(&stats);
        Self {
            id,
            kind,
            stats,
            state,
            visual: None,
        }
    }

    /// Attaches a presentation key.
    #[must_use]
    pub fn with_visual(mut self, visual: impl Into<String>) -> Self {
        self.visual = Some(visual.into());
        self
    }

    /// Gives the combatant an AP pool.
    #[must_use]
    pub fn with_action_points(mut self, action_points: ActionPoints) -> Self {
        self.state.action_points = Some(action_points);
        self
    }

    /// Returns the combatant's id.
    #[must_use]
    pub const fn id(&self) -> CombatantId {
        self.id
    }

    /// Returns the combatant's side.
    #[must_use]
    pub const fn kind(&self) -> CombatantKind {
        self.kind
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.stats.name
    }

    /// Returns the stat template.
    #[must_use]
    pub const fn stats(&self) -> &CombatantStats {
        &self.stats
    }

    /// Returns the runtime state.
    #[must_use]
    pub const fn state(&self) -> &CombatantState {
        &self.state
    }

    /// Returns the presentation key, if any.
    #[must_use]
    pub fn visual(&self) -> Option<&str> {
        self.visual.as_deref()
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.state.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.stats.max_health
    }

    /// True once health has reached zero.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.state.health <= 0
    }

    /// True while health is above zero.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        !self.is_dead()
    }

    /// AP pool, if this combatant has one.
    #[must_use]
    pub const fn action_points(&self) -> Option<&ActionPoints> {
        self.state.action_points.as_ref()
    }

    /// Mutable AP pool, if this combatant has one.
    pub fn action_points_mut(&mut self) -> Option<&mut ActionPoints> {
        self.state.action_points.as_mut()
    }

    /// Attack profile of a basic attack: current ATK, LCK and PWR.
    #[must_use]
    pub const fn basic_attack(&self) -> AttackProfile {
        AttackProfile::new(self.state.attack, self.state.luck, self.state.power)
    }

    /// Attack profile with an explicit PWR (skill hits).
    #[must_use]
    pub const fn attack_with_power(&self, power: i32) -> AttackProfile {
        AttackProfile::new(self.state.attack, self.state.luck, power)
    }

    /// Runs the damage formula with this combatant as defender and applies
    /// the result.
    pub fn take_damage<R: Rng + ?Sized>(
        &mut self,
        attacker: AttackProfile,
        config: &DamageFormulaConfig,
        rng: &mut R,
    ) -> DamageReport {
        let roll = resolve_damage(attacker, self.state.defense, config, rng);
        let change = self.apply_damage(roll.damage);
        debug!(
            target_name = %self.stats.name,
            damage = roll.damage,
            critical = roll.critical,
            health = change.health_after,
            "damage applied"
        );
        DamageReport { roll, change }
    }

    /// Subtracts `amount` from health, clamped at zero.
    pub fn apply_damage(&mut self, amount: i32) -> HealthChange {
        let health_before = self.state.health;
        let was_alive = self.is_alive();
        self.state.health = health_before
            .saturating_sub(amount.max(0))
            .min(self.stats.max_health)
            .max(0);
        HealthChange {
            health_before,
            health_after: self.state.health,
            died: was_alive && self.is_dead(),
        }
    }

    /// Restores `amount` health, capped at max. Dead combatants stay dead.
    pub fn heal(&mut self, amount: i32) -> HealthChange {
        let health_before = self.state.health;
        if self.is_alive() {
            self.state.health = health_before
                .saturating_add(amount.max(0))
                .min(self.stats.max_health);
        }
        HealthChange {
            health_before,
            health_after: self.state.health,
            died: false,
        }
    }

    /// Sets health to zero without consulting the formula.
    ///
    /// Returns true if the combatant was alive before the call.
    pub fn force_kill(&mut self) -> bool {
        let was_alive = self.is_alive();
        self.state.health = 0;
        was_alive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn goblin() -> Combatant {
        Combatant::new(
            CombatantId::new(3),
            CombatantKind::Enemy,
            CombatantStats::new("Goblin", 30, 8, 3, 2, 1),
        )
    }

    mod id_tests {
        use super::*;

        #[test]
        fn ids_order_numerically() {
            assert!(CombatantId::new(1) < CombatantId::new(2));
            assert_eq!(u64::from(CombatantId::new(9)), 9);
            assert_eq!(format!("{:?}", CombatantId::new(4)), "CombatantId(4)");
        }
    }

    mod health_tests {
        use super::*;

        #[test]
        fn damage_clamps_at_zero() {
            let mut enemy = goblin();
            let change = enemy.apply_damage(500);
            assert_eq!(change.health_after, 0);
            assert!(change.died);
            assert!(enemy.is_dead());
        }

        #[test]
        fn second_lethal_hit_does_not_die_again() {
            let mut enemy = goblin();
            enemy.apply_damage(30);
            let change = enemy.apply_damage(5);
            assert!(!change.died);
            assert_eq!(change.health_after, 0);
        }

        #[test]
        fn negative_damage_is_ignored() {
            let mut enemy = goblin();
            let change = enemy.apply_damage(-10);
            assert_eq!(change.health_after, 30);
        }

        #[test]
        fn heal_caps_at_max() {
            let mut enemy = goblin();
            enemy.apply_damage(5);
            let change = enemy.heal(100);
            assert_eq!(change.health_after, 30);
        }

        #[test]
        fn dead_cannot_be_healed() {
            let mut enemy = goblin();
            enemy.force_kill();
            enemy.heal(10);
            assert!(enemy.is_dead());
        }

        #[test]
        fn force_kill_reports_transition_once() {
            let mut enemy = goblin();
            assert!(enemy.force_kill());
            assert!(!enemy.force_kill());
            assert_eq!(enemy.health(), 0);
        }
    }

    mod take_damage_tests {
        use super::*;

        #[test]
        fn uses_own_defense() {
            let config = DamageFormulaConfig {
                luck_to_crit: 0.0,
                ..DamageFormulaConfig::default()
            };
            let mut rng = ChaCha8Rng::seed_from_u64(1);
            let mut enemy = goblin();

            // ATK 9 / DEF 3 = 3, PWR 4 -> 12
            let report = enemy.take_damage(AttackProfile::new(9, 0, 4), &config, &mut rng);
            assert_eq!(report.roll.damage, 12);
            assert_eq!(report.change.health_after, 18);
            assert!(!report.change.died);
        }

        #[test]
        fn lethal_roll_marks_death() {
            let config = DamageFormulaConfig::default();
            let mut rng = ChaCha8Rng::seed_from_u64(2);
            let mut enemy = goblin();

            let report = enemy.take_damage(AttackProfile::new(90, 0, 10), &config, &mut rng);
            assert!(report.change.died);
            assert_eq!(enemy.health(), 0);
        }
    }

    #[test]
    fn basic_attack_uses_current_stats() {
        let enemy = goblin();
        assert_eq!(enemy.basic_attack(), AttackProfile::new(8, 2, 1));
        assert_eq!(enemy.attack_with_power(12), AttackProfile::new(8, 2, 12));
    }
}
