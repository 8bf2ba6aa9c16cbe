//! The turn and round state machine.
//!
//! [`CombatEngine`] owns the arena, the target cursor, the step queue and
//! the random source. It is driven from outside:
//!
//! 1. [`initialize`](CombatEngine::initialize) validates the encounter,
//!    spawns the player and queues the first round.
//! 2. The driver calls [`advance`](CombatEngine::advance) to run one queued
//!    step at a time, waiting [`next_pacing`](CombatEngine::next_pacing)
//!    between calls if it wants real-time pacing.
//! 3. Player input arrives through the `request_*` methods, which either
//!    commit an action (queuing its steps) or return an [`ActionRejected`]
//!    and change nothing.
//!
//! # States
//!
//! ```text
//! START ──round set up──▶ PLAYERTURN ──skill committed──▶ ENEMYTURN
//!   ▲                        ▲                               │
//!   │                        └──────enemy phase done─────────┘
//!   └──round cleared (interlude/transition)     player dies ──▶ LOSE
//!                       final round cleared, interlude ends ──▶ WIN
//! ```
//!
//! While steps are queued the engine is busy and player requests are
//! rejected. Administrative kills are accepted at any non-terminal time.
//!
//! # Determinism
//!
//! All randomness comes from the engine's generator and is only drawn by
//! damage resolution. Given the same setup, seed and request sequence, the
//! event stream is identical across runs.

mod step;

pub use step::{Pacing, Step};

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::arena::Arena;
use crate::combatant::{Combatant, CombatantId};
use crate::encounter::{EncounterSetup, RoundCompletion};
use crate::error::{ActionRejected, ConfigError};
use crate::event::{CombatEvent, EnemyDescriptor, EventLog};
use crate::skill::{Skill, SkillId, SkillKind};
use crate::targeting::Targeting;

// =============================================================================
// CombatState
// =============================================================================

/// Whose turn it is, or how the encounter ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatState {
    /// Setup, reward interlude or round transition.
    #[default]
    Start,
    /// The player may act.
    PlayerTurn,
    /// The player's action and the enemy phase are playing out.
    EnemyTurn,
    /// Terminal: the final round was cleared.
    Win,
    /// Terminal: the player died.
    Lose,
}

impl CombatState {
    /// True for `Win` and `Lose`.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Win | Self::Lose)
    }
}

impl fmt::Display for CombatState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "START",
            Self::PlayerTurn => "PLAYERTURN",
            Self::EnemyTurn => "ENEMYTURN",
            Self::Win => "WIN",
            Self::Lose => "LOSE",
        };
        f.write_str(name)
    }
}

// =============================================================================
// CombatEngine
// =============================================================================

/// Combat resolution engine for one encounter.
///
/// # Example
///
/// ```
/// use raid_core::encounter::EncounterSetup;
/// use raid_core::engine::{CombatEngine, CombatState};
/// use raid_core::skill::SkillId;
///
/// let mut engine = CombatEngine::new(EncounterSetup::standard(), 7);
/// engine.initialize().unwrap();
/// engine.run_until_idle();
/// assert_eq!(engine.state(), CombatState::PlayerTurn);
///
/// engine.request_player_skill(SkillId::new(0)).unwrap();
/// assert_eq!(engine.state(), CombatState::EnemyTurn);
/// assert!(engine.is_busy());
///
/// engine.run_until_idle();
/// assert!(matches!(engine.state(), CombatState::PlayerTurn | CombatState::Start | CombatState::Lose));
/// ```
pub struct CombatEngine<R: Rng = ChaCha8Rng> {
    /// Validated encounter, read-only after construction.
    setup: EncounterSetup,
    /// Player and active enemies.
    arena: Arena,
    state: CombatState,
    /// Index of the current round. Only ever increases.
    round_index: usize,
    targeting: Targeting,
    /// Steps waiting for `advance()`.
    queue: VecDeque<Step>,
    events: EventLog,
    rng: R,
}

impl<R: Rng> fmt::Debug for CombatEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatEngine")
            .field("state", &self.state)
            .field("round_index", &self.round_index)
            .field("targeting", &self.targeting)
            .field("arena", &self.arena)
            .field("queue", &self.queue)
            .field("pending_events", &self.events.event_count())
            .finish_non_exhaustive()
    }
}

impl CombatEngine<ChaCha8Rng> {
    /// Creates an engine with a seeded `ChaCha8` generator.
    ///
    /// The engine does nothing until [`initialize`](Self::initialize).
    #[must_use]
    pub fn new(setup: EncounterSetup, seed: u64) -> Self {
        Self::with_rng(setup, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> CombatEngine<R> {
    /// Creates an engine with a caller-supplied random source.
    #[must_use]
    pub fn with_rng(setup: EncounterSetup, rng: R) -> Self {
        Self {
            setup,
            arena: Arena::new(),
            state: CombatState::Start,
            round_index: 0,
            targeting: Targeting::new(),
            queue: VecDeque::new(),
            events: EventLog::new(),
            rng,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Validates the encounter, spawns the player and queues round 0.
    ///
    /// Calling it again restarts the encounter from scratch.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found in the setup. The engine is
    /// left untouched in that case.
    pub fn initialize(&mut self) -> Result<(), ConfigError> {
        self.setup.validate()?;

        self.arena = Arena::new();
        self.arena
            .spawn_player(self.setup.player.stats(), self.setup.player.action_points());
        self.state = CombatState::Start;
        self.round_index = 0;
        self.targeting.reset();
        self.queue.clear();
        self.events.clear();
        self.queue.push_back(Step::StartRound { index: 0 });

        info!(
            rounds = self.setup.rounds.len(),
            final_round = self.setup.final_round,
            "encounter initialized"
        );
        Ok(())
    }

    /// Runs the next queued step. Returns it, or `None` if the engine is
    /// idle.
    pub fn advance(&mut self) -> Option<Step> {
        let step = self.queue.pop_front()?;
        match step {
            Step::StartRound { index } => self.start_round(index),
            Step::PlayerHit {
                target,
                hit,
                of,
                power,
            } => self.player_hit(target, hit, of, power),
            Step::BeginEnemyPhase => self.begin_enemy_phase(),
            Step::EnemyAction { enemy } => self.enemy_action(enemy),
            Step::EndEnemyPhase => self.end_enemy_phase(),
            Step::FinishInterlude { is_final } => self.finish_interlude(is_final),
        }
        Some(step)
    }

    /// Runs queued steps until the engine is idle, ignoring pacing. Returns
    /// the number of steps run.
    pub fn run_until_idle(&mut self) -> usize {
        let mut count = 0;
        while self.advance().is_some() {
            count += 1;
        }
        count
    }

    /// Pacing hint of the next step.
    #[must_use]
    pub fn next_pacing(&self) -> Option<Pacing> {
        self.queue.front().map(Step::pacing)
    }

    /// Real-time delay before the next step, per the encounter's pacing
    /// settings.
    #[must_use]
    pub fn next_delay(&self) -> Option<Duration> {
        self.next_pacing().map(|pacing| self.setup.pacing.delay(pacing))
    }

    /// True while steps are queued.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        !self.queue.is_empty()
    }

    /// Queued steps, next first.
    pub fn pending_steps(&self) -> impl Iterator<Item = &Step> + '_ {
        self.queue.iter()
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Commits a player skill.
    ///
    /// AP is paid immediately and the state moves to `ENEMYTURN`. An attack
    /// queues one hit per `hit_count` against the current target, then the
    /// enemy phase. A heal resolves immediately, then queues the enemy
    /// phase.
    ///
    /// # Errors
    ///
    /// - [`ActionRejected::InvalidState`] outside an idle player turn
    /// - [`ActionRejected::UnknownSkill`] for an index past the skill list
    /// - [`ActionRejected::InsufficientResource`] if AP is short
    /// - [`ActionRejected::NoValidTarget`] for an attack with no living enemy
    pub fn request_player_skill(&mut self, skill: SkillId) -> Result<(), ActionRejected> {
        self.use_skill(skill).map_err(rejected)
    }

    /// Moves the target to the next enemy, wrapping. Returns the new target,
    /// or `None` if there are no enemies.
    ///
    /// # Errors
    ///
    /// [`ActionRejected::InvalidState`] outside an idle player turn.
    pub fn request_cycle_target(&mut self) -> Result<Option<CombatantId>, ActionRejected> {
        self.ensure_player_turn("cycle target").map_err(rejected)?;
        if self.targeting.cycle(self.arena.enemy_count()).is_none() {
            return Ok(None);
        }
        let target = self.current_target();
        if let Some(enemy) = target {
            self.events.push(CombatEvent::TargetChanged { enemy });
        }
        Ok(target)
    }

    /// Targets a specific enemy.
    ///
    /// # Errors
    ///
    /// [`ActionRejected::InvalidState`] outside an idle player turn, and
    /// [`ActionRejected::UnknownTarget`] if `enemy` is not active. Neither
    /// moves the cursor.
    pub fn request_set_target(&mut self, enemy: CombatantId) -> Result<(), ActionRejected> {
        self.ensure_player_turn("set target").map_err(rejected)?;
        let position = self
            .arena
            .position_of(enemy)
            .ok_or(ActionRejected::UnknownTarget(enemy))
            .map_err(rejected)?;
        self.targeting.select(position, self.arena.enemy_count());
        self.events.push(CombatEvent::TargetChanged { enemy });
        Ok(())
    }

    /// Kills one active enemy outright, through the normal death path.
    ///
    /// # Errors
    ///
    /// [`ActionRejected::InvalidState`] once the encounter is over, and
    /// [`ActionRejected::UnknownTarget`] if `enemy` is not active.
    pub fn request_force_kill(&mut self, enemy: CombatantId) -> Result<(), ActionRejected> {
        self.ensure_not_over("force kill").map_err(rejected)?;
        if !self.arena.is_active_enemy(enemy) {
            return Err(rejected(ActionRejected::UnknownTarget(enemy)));
        }
        self.force_kill(enemy);
        Ok(())
    }

    /// Kills every active enemy, in spawn order. The last death completes
    /// the round. Returns the number of enemies killed.
    ///
    /// # Errors
    ///
    /// [`ActionRejected::InvalidState`] once the encounter is over.
    pub fn request_force_kill_all(&mut self) -> Result<usize, ActionRejected> {
        self.ensure_not_over("force kill all").map_err(rejected)?;
        let snapshot = self.arena.active_enemies().to_vec();
        for &enemy in &snapshot {
            self.force_kill(enemy);
        }
        info!(killed = snapshot.len(), "force killed all enemies");
        Ok(snapshot.len())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> CombatState {
        self.state
    }

    /// Current round index.
    #[must_use]
    pub const fn round_index(&self) -> usize {
        self.round_index
    }

    /// Name of the current round.
    #[must_use]
    pub fn round_name(&self) -> Option<&str> {
        self.setup.rounds.get(self.round_index).map(|r| r.name.as_str())
    }

    /// The encounter definition.
    #[must_use]
    pub const fn setup(&self) -> &EncounterSetup {
        &self.setup
    }

    /// Player and active enemies.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The player, once initialized.
    #[must_use]
    pub fn player(&self) -> Option<&Combatant> {
        self.arena.player()
    }

    /// The player's skills.
    #[must_use]
    pub fn skills(&self) -> &[Skill] {
        &self.setup.player.skills
    }

    /// Active enemy ids in spawn order.
    #[must_use]
    pub fn active_enemies(&self) -> &[CombatantId] {
        self.arena.active_enemies()
    }

    /// An active enemy by id.
    #[must_use]
    pub fn enemy(&self, id: CombatantId) -> Option<&Combatant> {
        if self.arena.is_active_enemy(id) {
            self.arena.get(id)
        } else {
            None
        }
    }

    /// The enemy the next attack will hit.
    #[must_use]
    pub fn current_target(&self) -> Option<CombatantId> {
        self.targeting
            .current(self.arena.enemy_count())
            .and_then(|index| self.arena.active_enemies().get(index).copied())
    }

    /// Drains events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        self.events.take_events()
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[CombatEvent] {
        self.events.events()
    }

    // =========================================================================
    // Request helpers
    // =========================================================================

    fn ensure_player_turn(&self, action: &'static str) -> Result<(), ActionRejected> {
        if self.state == CombatState::PlayerTurn && !self.is_busy() {
            Ok(())
        } else {
            Err(ActionRejected::InvalidState {
                action,
                state: self.state,
            })
        }
    }

    fn ensure_not_over(&self, action: &'static str) -> Result<(), ActionRejected> {
        if self.state.is_terminal() {
            Err(ActionRejected::InvalidState {
                action,
                state: self.state,
            })
        } else {
            Ok(())
        }
    }

    fn player_ap(&self) -> u32 {
        self.arena
            .player()
            .and_then(Combatant::action_points)
            .map_or(0, |ap| ap.current())
    }

    fn use_skill(&mut self, id: SkillId) -> Result<(), ActionRejected> {
        self.ensure_player_turn("use skill")?;
        let skill = self
            .setup
            .player
            .skills
            .get(id.index())
            .cloned()
            .ok_or(ActionRejected::UnknownSkill(id))?;

        let available = self.player_ap();
        if available < skill.ap_cost {
            return Err(ActionRejected::InsufficientResource {
                skill: skill.name,
                cost: skill.ap_cost,
                available,
            });
        }
        let target = match skill.kind {
            SkillKind::Attack => Some(self.current_target().ok_or(ActionRejected::NoValidTarget)?),
            SkillKind::Heal => None,
        };

        // Commit: nothing below can fail.
        let remaining_ap = match self.arena.player_mut().and_then(Combatant::action_points_mut) {
            Some(pool) => {
                pool.spend(skill.ap_cost);
                pool.current()
            }
            None => 0,
        };
        self.state = CombatState::EnemyTurn;
        debug!(skill = %skill.name, cost = skill.ap_cost, remaining_ap, "skill committed");
        self.events.push(CombatEvent::SkillUsed {
            skill: id,
            name: skill.name.clone(),
            remaining_ap,
        });

        if let Some(target) = target {
            let power = skill.hit_power();
            for hit in 1..=skill.hit_count {
                self.queue.push_back(Step::PlayerHit {
                    target,
                    hit,
                    of: skill.hit_count,
                    power,
                });
            }
        } else {
            self.heal_player();
        }
        self.queue.push_back(Step::BeginEnemyPhase);
        Ok(())
    }

    fn force_kill(&mut self, enemy: CombatantId) {
        let killed = self.arena.get_mut(enemy).is_some_and(Combatant::force_kill);
        if killed {
            self.on_enemy_died(enemy);
        }
    }

    // =========================================================================
    // Steps
    // =========================================================================

    fn start_round(&mut self, index: usize) {
        let Some(round) = self.setup.rounds.get(index).cloned() else {
            warn!(index, "no such round, step ignored");
            return;
        };
        self.round_index = index;
        self.arena.clear_enemies();

        let enemies: Vec<EnemyDescriptor> = round
            .enemies
            .into_iter()
            .map(|spawn| {
                let id = self.arena.spawn_enemy(spawn.stats.clone(), spawn.visual.as_deref());
                EnemyDescriptor {
                    id,
                    name: spawn.stats.name,
                    health: spawn.stats.max_health,
                    max_health: spawn.stats.max_health,
                    visual: spawn.visual,
                }
            })
            .collect();

        info!(round = index, name = %round.name, enemies = enemies.len(), "round started");
        self.events.push(CombatEvent::RoundStarted {
            round_index: index,
            name: round.name,
            enemies,
        });
        self.begin_player_turn();
    }

    fn begin_player_turn(&mut self) {
        self.state = CombatState::PlayerTurn;
        self.targeting.reset();

        let regen = self.setup.player.ap_regen;
        let (ap, max_ap) = match self.arena.player_mut().and_then(Combatant::action_points_mut) {
            Some(pool) => {
                pool.regenerate(regen);
                (pool.current(), pool.max())
            }
            None => (0, 0),
        };
        debug!(ap, max_ap, "player turn");
        self.events.push(CombatEvent::PlayerTurnStarted {
            ap,
            max_ap,
            target: self.current_target(),
        });
    }

    fn heal_player(&mut self) {
        let Some(player) = self.arena.player_mut() else {
            return;
        };
        let change = player.heal(player.max_health() / 4);
        let max_health = player.max_health();
        debug!(health = change.health_after, "player healed");
        self.events.push(CombatEvent::PlayerHealed {
            amount: change.health_after - change.health_before,
            health: change.health_after,
            max_health,
        });
    }

    fn player_hit(&mut self, target: CombatantId, hit: u32, of: u32, power: i32) {
        if !self.arena.is_active_enemy(target) {
            debug!(hit, of, "target gone, hit skipped");
            return;
        }
        let Some(attack) = self.arena.player().map(|p| p.attack_with_power(power)) else {
            return;
        };
        let Some(enemy) = self.arena.get_mut(target) else {
            return;
        };
        let report = enemy.take_damage(attack, &self.setup.formula, &mut self.rng);
        let max_health = enemy.max_health();
        debug!(hit, of, damage = report.roll.damage, critical = report.roll.critical, "player hit");
        self.events.push(CombatEvent::EnemyDamaged {
            enemy: target,
            damage: report.roll.damage,
            health: report.change.health_after,
            max_health,
            critical: report.roll.critical,
        });
        if report.change.died {
            self.on_enemy_died(target);
        }
    }

    fn begin_enemy_phase(&mut self) {
        let snapshot = self.arena.active_enemies().to_vec();
        debug!(enemies = snapshot.len(), "enemy phase");
        self.queue
            .extend(snapshot.into_iter().map(|enemy| Step::EnemyAction { enemy }));
        self.queue.push_back(Step::EndEnemyPhase);
    }

    fn enemy_action(&mut self, enemy: CombatantId) {
        if self.state != CombatState::EnemyTurn || !self.arena.is_active_enemy(enemy) {
            debug!(%enemy, "enemy no longer acts, skipped");
            return;
        }
        let Some(attack) = self.arena.get(enemy).map(Combatant::basic_attack) else {
            return;
        };
        let Some(player) = self.arena.player_mut() else {
            return;
        };
        let report = player.take_damage(attack, &self.setup.formula, &mut self.rng);
        self.events.push(CombatEvent::PlayerDamaged {
            attacker: enemy,
            damage: report.roll.damage,
            health: report.change.health_after,
            max_health: player.max_health(),
            critical: report.roll.critical,
        });
        if report.change.died {
            self.defeat();
        }
    }

    fn end_enemy_phase(&mut self) {
        if self.state == CombatState::EnemyTurn {
            self.begin_player_turn();
        }
    }

    fn finish_interlude(&mut self, is_final: bool) {
        if is_final {
            self.state = CombatState::Win;
            info!(round = self.round_index, "encounter won");
            self.events.push(CombatEvent::EncounterWon);
        } else {
            self.queue_next_round();
        }
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    fn on_enemy_died(&mut self, enemy: CombatantId) {
        let previous_target = self.current_target();
        let Some((position, dead)) = self.arena.despawn_enemy(enemy) else {
            return;
        };
        self.targeting.on_removed(position, self.arena.enemy_count());
        self.queue.retain(|step| step.subject() != Some(enemy));

        info!(enemy = %dead.name(), remaining = self.arena.enemy_count(), "enemy defeated");
        self.events.push(CombatEvent::EnemyDefeated { enemy });

        if self.arena.enemy_count() == 0 {
            self.complete_round();
            return;
        }
        if let Some(target) = self.current_target() {
            if Some(target) != previous_target {
                self.events.push(CombatEvent::TargetChanged { enemy: target });
            }
        }
    }

    fn complete_round(&mut self) {
        let index = self.round_index;
        let name = self.round_name().unwrap_or_default().to_string();
        // Outstanding hits and enemy actions have nothing left to act on.
        self.queue.clear();
        self.state = CombatState::Start;
        info!(round = index, name = %name, "round completed");
        self.events.push(CombatEvent::RoundCompleted {
            round_index: index,
            name,
        });

        match self.setup.completion(index) {
            RoundCompletion::Final => self.open_interlude(true),
            RoundCompletion::Reward => self.open_interlude(false),
            RoundCompletion::Advance => self.queue_next_round(),
        }
    }

    fn open_interlude(&mut self, is_final: bool) {
        debug!(is_final, "reward interlude");
        self.events.push(CombatEvent::RewardInterlude { is_final });
        self.queue.push_back(Step::FinishInterlude { is_final });
    }

    fn queue_next_round(&mut self) {
        self.round_index += 1;
        self.queue.push_back(Step::StartRound {
            index: self.round_index,
        });
    }

    fn defeat(&mut self) {
        self.state = CombatState::Lose;
        self.queue.clear();
        info!(round = self.round_index, "player defeated");
        self.events.push(CombatEvent::EncounterLost);
    }
}

fn rejected(err: ActionRejected) -> ActionRejected {
    debug!(reason = %err, "request rejected");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::CombatantStats;
    use crate::damage::DamageFormulaConfig;
    use crate::encounter::{EnemySpawn, Round};

    /// No spread, no crits: damage = floor(PWR * ATK / DEF), at least 1.
    fn flat_formula() -> DamageFormulaConfig {
        DamageFormulaConfig {
            luck_to_crit: 0.0,
            ..DamageFormulaConfig::default()
        }
    }

    fn dummy(name: &str, health: i32) -> EnemySpawn {
        EnemySpawn::new(CombatantStats::new(name, health, 1, 10, 0, 1))
    }

    fn engine_with(rounds: Vec<Round>) -> CombatEngine {
        let setup = EncounterSetup::new(rounds).with_formula(flat_formula());
        let mut engine = CombatEngine::new(setup, 1);
        engine.initialize().unwrap();
        engine.run_until_idle();
        engine
    }

    mod state_tests {
        use super::*;

        #[test]
        fn display_matches_state_names() {
            assert_eq!(CombatState::Start.to_string(), "START");
            assert_eq!(CombatState::PlayerTurn.to_string(), "PLAYERTURN");
            assert_eq!(CombatState::EnemyTurn.to_string(), "ENEMYTURN");
            assert_eq!(CombatState::Win.to_string(), "WIN");
            assert_eq!(CombatState::Lose.to_string(), "LOSE");
        }

        #[test]
        fn terminal_states() {
            assert!(CombatState::Win.is_terminal());
            assert!(CombatState::Lose.is_terminal());
            assert!(!CombatState::Start.is_terminal());
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn uninitialized_engine_rejects_skills() {
            let mut engine = CombatEngine::new(EncounterSetup::standard(), 1);
            let err = engine.request_player_skill(SkillId::new(0)).unwrap_err();
            assert!(matches!(err, ActionRejected::InvalidState { state: CombatState::Start, .. }));
        }

        #[test]
        fn initialize_queues_first_round() {
            let mut engine = CombatEngine::new(EncounterSetup::standard(), 1);
            engine.initialize().unwrap();
            assert!(engine.is_busy());
            assert_eq!(engine.next_pacing(), Some(Pacing::Immediate));
            assert_eq!(engine.advance(), Some(Step::StartRound { index: 0 }));
            assert_eq!(engine.state(), CombatState::PlayerTurn);
            assert_eq!(engine.active_enemies().len(), 2);
            assert!(!engine.is_busy());
        }

        #[test]
        fn invalid_setup_fails_initialize() {
            let mut engine = CombatEngine::new(EncounterSetup::new(Vec::new()), 1);
            assert!(matches!(engine.initialize(), Err(ConfigError::NoRounds)));
            assert!(engine.player().is_none());
            assert!(!engine.is_busy());
        }

        #[test]
        fn advance_when_idle_is_none() {
            let mut engine = engine_with(vec![Round::new("R", vec![dummy("A", 5)])]);
            assert_eq!(engine.advance(), None);
            assert_eq!(engine.next_delay(), None);
        }
    }

    mod skill_tests {
        use super::*;

        #[test]
        fn skill_pays_ap_before_hits() {
            let mut engine = engine_with(vec![Round::new("R", vec![dummy("A", 500)])]);
            engine.request_player_skill(SkillId::new(1)).unwrap();

            assert_eq!(engine.player().unwrap().action_points().unwrap().current(), 30);
            assert_eq!(engine.state(), CombatState::EnemyTurn);
            let hits = engine
                .pending_steps()
                .filter(|s| matches!(s, Step::PlayerHit { .. }))
                .count();
            assert_eq!(hits, 3);
        }

        #[test]
        fn insufficient_ap_rejected() {
            let mut setup = EncounterSetup::new(vec![Round::new("R", vec![dummy("A", 500)])]);
            setup.player.starting_ap = Some(0);
            setup.player.ap_regen = 0;
            let mut engine = CombatEngine::new(setup, 1);
            engine.initialize().unwrap();
            engine.run_until_idle();

            let err = engine.request_player_skill(SkillId::new(1)).unwrap_err();
            assert!(matches!(
                err,
                ActionRejected::InsufficientResource { cost: 20, available: 0, .. }
            ));
            assert_eq!(engine.state(), CombatState::PlayerTurn);
        }

        #[test]
        fn unknown_skill_rejected() {
            let mut engine = engine_with(vec![Round::new("R", vec![dummy("A", 5)])]);
            assert_eq!(
                engine.request_player_skill(SkillId::new(9)),
                Err(ActionRejected::UnknownSkill(SkillId::new(9)))
            );
        }

        #[test]
        fn heal_restores_quarter_of_max() {
            let mut engine = engine_with(vec![Round::new("R", vec![dummy("A", 500)])]);
            engine.arena.player_mut().unwrap().apply_damage(30);
            engine.take_events();

            engine.request_player_skill(SkillId::new(2)).unwrap();
            assert_eq!(engine.player().unwrap().health(), 32);
            assert!(engine.events().contains(&CombatEvent::PlayerHealed {
                amount: 12,
                health: 32,
                max_health: 50,
            }));
            assert_eq!(engine.pending_steps().next(), Some(&Step::BeginEnemyPhase));
        }

        #[test]
        fn requests_rejected_while_busy() {
            let mut engine = engine_with(vec![Round::new("R", vec![dummy("A", 500), dummy("B", 500)])]);
            engine.request_player_skill(SkillId::new(0)).unwrap();
            assert!(engine.request_cycle_target().is_err());
            assert!(engine.request_player_skill(SkillId::new(0)).is_err());
        }
    }

    mod targeting_tests {
        use super::*;

        #[test]
        fn cycle_wraps_and_reports() {
            let mut engine = engine_with(vec![Round::new("R", vec![dummy("A", 5), dummy("B", 5)])]);
            let ids = engine.active_enemies().to_vec();
            engine.take_events();

            assert_eq!(engine.request_cycle_target(), Ok(Some(ids[1])));
            assert_eq!(engine.request_cycle_target(), Ok(Some(ids[0])));
            assert_eq!(
                engine.take_events(),
                vec![
                    CombatEvent::TargetChanged { enemy: ids[1] },
                    CombatEvent::TargetChanged { enemy: ids[0] },
                ]
            );
        }

        #[test]
        fn set_target_unknown_is_rejected_without_change() {
            let mut engine = engine_with(vec![Round::new("R", vec![dummy("A", 5), dummy("B", 5)])]);
            let before = engine.current_target();
            let err = engine.request_set_target(CombatantId::new(99)).unwrap_err();
            assert_eq!(err, ActionRejected::UnknownTarget(CombatantId::new(99)));
            assert_eq!(engine.current_target(), before);
        }

        #[test]
        fn killing_earlier_enemy_keeps_target() {
            let mut engine = engine_with(vec![Round::new(
                "R",
                vec![dummy("A", 5), dummy("B", 5), dummy("C", 5)],
            )]);
            let ids = engine.active_enemies().to_vec();
            engine.request_set_target(ids[2]).unwrap();
            engine.request_force_kill(ids[0]).unwrap();
            assert_eq!(engine.current_target(), Some(ids[2]));
        }

        #[test]
        fn killing_last_target_wraps_to_first() {
            let mut engine = engine_with(vec![Round::new(
                "R",
                vec![dummy("A", 5), dummy("B", 5), dummy("C", 5)],
            )]);
            let ids = engine.active_enemies().to_vec();
            engine.request_set_target(ids[2]).unwrap();
            engine.take_events();
            engine.request_force_kill(ids[2]).unwrap();
            assert_eq!(engine.current_target(), Some(ids[0]));
            assert!(engine
                .events()
                .contains(&CombatEvent::TargetChanged { enemy: ids[0] }));
        }
    }

    mod force_kill_tests {
        use super::*;

        #[test]
        fn force_kill_unknown_rejected() {
            let mut engine = engine_with(vec![Round::new("R", vec![dummy("A", 5)])]);
            assert_eq!(
                engine.request_force_kill(CombatantId::new(77)),
                Err(ActionRejected::UnknownTarget(CombatantId::new(77)))
            );
        }

        #[test]
        fn force_kill_all_counts_and_completes() {
            let mut engine = engine_with(vec![
                Round::new("R1", vec![dummy("A", 5), dummy("B", 5)]),
                Round::new("R2", vec![dummy("C", 5)]),
            ]);
            assert_eq!(engine.request_force_kill_all(), Ok(2));
            assert_eq!(engine.state(), CombatState::Start);
            assert_eq!(engine.round_index(), 1);
            assert_eq!(engine.next_pacing(), Some(Pacing::RoundTransition));
        }

        #[test]
        fn force_kill_all_with_no_enemies_is_zero() {
            let mut engine = CombatEngine::new(EncounterSetup::standard(), 1);
            engine.initialize().unwrap();
            assert_eq!(engine.request_force_kill_all(), Ok(0));
        }
    }
}
