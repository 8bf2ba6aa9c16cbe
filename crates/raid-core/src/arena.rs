//! Arena module: storage for everyone currently in the fight.
//!
//! The Arena owns the player and the active enemies. It provides:
//! - Combatant storage with deterministic iteration order (`BTreeMap`)
//! - The ordered active-enemy sequence that targeting indexes into
//! - Lifecycle management (spawn at round start, despawn on death)
//!
//! # Ordering
//!
//! Ids are assigned monotonically, and the active-enemy sequence keeps spawn
//! order. Removing an enemy preserves the relative order of the rest, so the
//! enemy phase and the target cursor both see a stable sequence.
//!
//! # Example
//!
//! ```
//! use raid_core::arena::Arena;
//! use raid_core::combatant::components::CombatantStats;
//!
//! let mut arena = Arena::new();
//! let slime = arena.spawn_enemy(CombatantStats::new("Slime", 20, 5, 1, 1, 1), None);
//! let ooze = arena.spawn_enemy(CombatantStats::new("Ooze", 35, 7, 2, 1, 1), None);
//!
//! assert_eq!(arena.active_enemies(), &[slime, ooze]);
//!
//! let (position, removed) = arena.despawn_enemy(slime).unwrap();
//! assert_eq!(position, 0);
//! assert_eq!(removed.name(), "Slime");
//! assert_eq!(arena.active_enemies(), &[ooze]);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::combatant::{ActionPoints, Combatant, CombatantId, CombatantKind, CombatantStats};

/// Container for every combatant in an encounter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing id counter.
    next_id: u64,
    /// Combatant storage with deterministic iteration order.
    combatants: BTreeMap<CombatantId, Combatant>,
    /// The player, once spawned.
    player: Option<CombatantId>,
    /// Living enemies in spawn order.
    active_enemies: Vec<CombatantId>,
}

impl Arena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> CombatantId {
        let id = CombatantId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Spawns the player with an AP pool.
    ///
    /// A second call replaces the previous player.
    pub fn spawn_player(&mut self, stats: CombatantStats, action_points: ActionPoints) -> CombatantId {
        if let Some(previous) = self.player.take() {
            self.combatants.remove(&previous);
        }
        let id = self.allocate_id();
        let player = Combatant::new(id, CombatantKind::Player, stats).with_action_points(action_points);
        self.combatants.insert(id, player);
        self.player = Some(id);
        id
    }

    /// Spawns an enemy at the end of the active sequence.
    pub fn spawn_enemy(&mut self, stats: CombatantStats, visual: Option<&str>) -> CombatantId {
        let id = self.allocate_id();
        let mut enemy = Combatant::new(id, CombatantKind::Enemy, stats);
        if let Some(visual) = visual {
            enemy = enemy.with_visual(visual);
        }
        self.combatants.insert(id, enemy);
        self.active_enemies.push(id);
        id
    }

    /// Removes an enemy from the active sequence and from storage.
    ///
    /// Returns its former position in the active sequence and the combatant,
    /// or `None` if the id is not an active enemy.
    pub fn despawn_enemy(&mut self, id: CombatantId) -> Option<(usize, Combatant)> {
        let position = self.position_of(id)?;
        self.active_enemies.remove(position);
        let combatant = self.combatants.remove(&id)?;
        Some((position, combatant))
    }

    /// Removes every enemy. The player is untouched.
    pub fn clear_enemies(&mut self) {
        for id in self.active_enemies.drain(..) {
            self.combatants.remove(&id);
        }
    }

    /// Returns a combatant by id.
    #[must_use]
    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(&id)
    }

    /// Returns a mutable combatant by id.
    #[must_use]
    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(&id)
    }

    /// The player's id, once spawned.
    #[must_use]
    pub const fn player_id(&self) -> Option<CombatantId> {
        self.player
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> Option<&Combatant> {
        self.player.and_then(|id| self.combatants.get(&id))
    }

    /// The player, mutably.
    #[must_use]
    pub fn player_mut(&mut self) -> Option<&mut Combatant> {
        let id = self.player?;
        self.combatants.get_mut(&id)
    }

    /// Active enemy ids in spawn order.
    #[must_use]
    pub fn active_enemies(&self) -> &[CombatantId] {
        &self.active_enemies
    }

    /// Active enemies in spawn order.
    pub fn enemies(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.active_enemies
            .iter()
            .filter_map(move |id| self.combatants.get(id))
    }

    /// Number of active enemies.
    #[must_use]
    pub fn enemy_count(&self) -> usize {
        self.active_enemies.len()
    }

    /// True if `id` is in the active enemy sequence.
    #[must_use]
    pub fn is_active_enemy(&self, id: CombatantId) -> bool {
        self.active_enemies.contains(&id)
    }

    /// Position of `id` in the active enemy sequence.
    #[must_use]
    pub fn position_of(&self, id: CombatantId) -> Option<usize> {
        self.active_enemies.iter().position(|e| *e == id)
    }

    /// Number of stored combatants (player included).
    #[must_use]
    pub fn combatant_count(&self) -> usize {
        self.combatants.len()
    }
}
