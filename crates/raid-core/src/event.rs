//! Combat events and the presentation seam.
//!
//! The engine records a [`CombatEvent`] for every state change presentation
//! may care about. Events accumulate in an [`EventLog`] until drained with
//! `take_events()`. They can be inspected directly or handed to a
//! [`Presenter`] with [`present`].
//!
//! Events carry values to display, never instructions on how to display
//! them.

use serde::{Deserialize, Serialize};

use crate::combatant::CombatantId;
use crate::skill::SkillId;

/// Snapshot of an enemy as it spawned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyDescriptor {
    /// Arena id.
    pub id: CombatantId,
    /// Display name.
    pub name: String,
    /// Health at spawn.
    pub health: i32,
    /// Maximum health.
    pub max_health: i32,
    /// Presentation key.
    pub visual: Option<String>,
}

/// Something that happened during combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// A round spawned its roster.
    RoundStarted {
        /// Round index.
        round_index: usize,
        /// Round name.
        name: String,
        /// Roster in spawn order.
        enemies: Vec<EnemyDescriptor>,
    },
    /// The player may act.
    PlayerTurnStarted {
        /// AP after regeneration.
        ap: u32,
        /// AP cap.
        max_ap: u32,
        /// Current target after the reset.
        target: Option<CombatantId>,
    },
    /// The player committed a skill.
    SkillUsed {
        /// Skill index.
        skill: SkillId,
        /// Skill name.
        name: String,
        /// AP left after paying.
        remaining_ap: u32,
    },
    /// An enemy took damage.
    EnemyDamaged {
        /// Enemy hit.
        enemy: CombatantId,
        /// Damage dealt.
        damage: i32,
        /// Health after the hit.
        health: i32,
        /// Maximum health.
        max_health: i32,
        /// Whether the hit was critical.
        critical: bool,
    },
    /// The player took damage.
    PlayerDamaged {
        /// Enemy that attacked.
        attacker: CombatantId,
        /// Damage dealt.
        damage: i32,
        /// Health after the hit.
        health: i32,
        /// Maximum health.
        max_health: i32,
        /// Whether the hit was critical.
        critical: bool,
    },
    /// The player recovered health.
    PlayerHealed {
        /// Health actually restored.
        amount: i32,
        /// Health after healing.
        health: i32,
        /// Maximum health.
        max_health: i32,
    },
    /// An enemy died and left the active set.
    EnemyDefeated {
        /// Dead enemy.
        enemy: CombatantId,
    },
    /// The current target changed.
    TargetChanged {
        /// New target.
        enemy: CombatantId,
    },
    /// Every enemy in the round is dead.
    RoundCompleted {
        /// Round index.
        round_index: usize,
        /// Round name.
        name: String,
    },
    /// A reward interlude began.
    RewardInterlude {
        /// True if victory follows.
        is_final: bool,
    },
    /// The final round was cleared.
    EncounterWon,
    /// The player died.
    EncounterLost,
}

/// Append-only record of events since the last drain.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events, oldest first.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Number of events in the log.
    #[must_use]
    pub fn event_count(&self) -> usize {
        self.events.len()
    }

    /// Returns true if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Discards all events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

/// Receiver for combat events. Every method defaults to doing nothing, so an
/// implementation only overrides what it displays.
#[allow(unused_variables)]
pub trait Presenter {
    /// A round spawned.
    fn on_round_started(&mut self, round_name: &str, enemies: &[EnemyDescriptor]) {}
    /// The action menu should be shown.
    fn on_player_turn_started(&mut self, ap: u32, max_ap: u32) {}
    /// A skill was committed.
    fn on_skill_used(&mut self, skill: SkillId, name: &str, remaining_ap: u32) {}
    /// An enemy's health changed.
    fn on_enemy_damaged(&mut self, enemy: CombatantId, health: i32, max_health: i32, was_critical: bool) {}
    /// The player's health went down.
    fn on_player_damaged(&mut self, health: i32, max_health: i32) {}
    /// The player's health went up.
    fn on_player_healed(&mut self, health: i32, max_health: i32) {}
    /// An enemy died.
    fn on_enemy_defeated(&mut self, enemy: CombatantId) {}
    /// The target highlight moved.
    fn on_target_changed(&mut self, enemy: CombatantId) {}
    /// A round was cleared.
    fn on_round_completed(&mut self, round_name: &str) {}
    /// The reward screen should be shown.
    fn on_reward_interlude(&mut self, is_final: bool) {}
    /// Victory.
    fn on_encounter_won(&mut self) {}
    /// Defeat.
    fn on_encounter_lost(&mut self) {}
}

/// Routes each event to the matching [`Presenter`] callback, in order.
///
/// A player turn start also reports its reset target through
/// [`Presenter::on_target_changed`], so target indicators follow the reset.
pub fn present<P: Presenter + ?Sized>(events: &[CombatEvent], presenter: &mut P) {
    for event in events {
        match event {
            CombatEvent::RoundStarted { name, enemies, .. } => presenter.on_round_started(name, enemies),
            CombatEvent::PlayerTurnStarted { ap, max_ap, target } => {
                presenter.on_player_turn_started(*ap, *max_ap);
                if let Some(enemy) = target {
                    presenter.on_target_changed(*enemy);
                }
            }
            CombatEvent::SkillUsed {
                skill,
                name,
                remaining_ap,
            } => presenter.on_skill_used(*skill, name, *remaining_ap),
            CombatEvent::EnemyDamaged {
                enemy,
                health,
                max_health,
                critical,
                ..
            } => presenter.on_enemy_damaged(*enemy, *health, *max_health, *critical),
            CombatEvent::PlayerDamaged { health, max_health, .. } => {
                presenter.on_player_damaged(*health, *max_health);
            }
            CombatEvent::PlayerHealed { health, max_health, .. } => {
                presenter.on_player_healed(*health, *max_health);
            }
            CombatEvent::EnemyDefeated { enemy } => presenter.on_enemy_defeated(*enemy),
            CombatEvent::TargetChanged { enemy } => presenter.on_target_changed(*enemy),
            CombatEvent::RoundCompleted { name, .. } => presenter.on_round_completed(name),
            CombatEvent::RewardInterlude { is_final } => presenter.on_reward_interlude(*is_final),
            CombatEvent::EncounterWon => presenter.on_encounter_won(),
            CombatEvent::EncounterLost => presenter.on_encounter_lost(),
        }
    }
}
