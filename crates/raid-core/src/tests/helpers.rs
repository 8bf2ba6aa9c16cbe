//! Test helpers for building encounters and inspecting events.

use rand::Rng;

use crate::combatant::{CombatantId, CombatantStats};
use crate::damage::DamageFormulaConfig;
use crate::encounter::{EncounterSetup, EnemySpawn, Round};
use crate::engine::{CombatEngine, CombatState};
use crate::event::CombatEvent;
use crate::skill::SkillId;

// =============================================================================
// Skill ids of the default loadout
// =============================================================================

/// Strike: 1 hit, PWR 10, free.
pub const STRIKE: SkillId = SkillId::new(0);
/// Flurry: 3 hits, PWR 6, 20 AP.
pub const FLURRY: SkillId = SkillId::new(1);
/// Heal: a quarter of max health, 15 AP.
pub const HEAL: SkillId = SkillId::new(2);

// =============================================================================
// Setup
// =============================================================================

/// Formula without spread or crits: damage is `floor(PWR * ATK / DEF)`,
/// at least 1.
pub fn flat_formula() -> DamageFormulaConfig {
    DamageFormulaConfig {
        luck_to_crit: 0.0,
        ..DamageFormulaConfig::default()
    }
}

/// Formula with a wide spread and frequent crits.
pub fn swingy_formula() -> DamageFormulaConfig {
    DamageFormulaConfig {
        rand_min_multiplier: 0.5,
        rand_max_multiplier: 1.5,
        luck_to_crit: 5.0,
        ..DamageFormulaConfig::default()
    }
}

/// Enemy with DEF 10 and ATK 1, so the player's hits deal exactly their PWR
/// under [`flat_formula`] and the enemy deals 1.
pub fn dummy(name: &str, health: i32) -> EnemySpawn {
    EnemySpawn::new(CombatantStats::new(name, health, 1, 10, 0, 1))
}

/// Enemy that kills a default player in one hit under [`flat_formula`].
pub fn brute(name: &str) -> EnemySpawn {
    EnemySpawn::new(CombatantStats::new(name, 500, 500, 10, 0, 1))
}

/// Setup with the flat formula and the given rounds. The last round is
/// final and there are no reward rounds.
pub fn flat_setup(rounds: Vec<Round>) -> EncounterSetup {
    EncounterSetup::new(rounds).with_formula(flat_formula())
}

/// Initializes an engine and runs it to the first player turn.
pub fn started_engine(setup: EncounterSetup, seed: u64) -> CombatEngine {
    let mut engine = CombatEngine::new(setup, seed);
    engine.initialize().expect("test setup should be valid");
    engine.run_until_idle();
    assert_eq!(engine.state(), CombatState::PlayerTurn);
    engine
}

/// Plays the encounter with a fixed policy until it ends: heal below a third
/// of max health when affordable, otherwise the first affordable attack.
/// Returns every event emitted.
pub fn autoplay<R: Rng>(engine: &mut CombatEngine<R>, max_turns: usize) -> Vec<CombatEvent> {
    let mut events = engine.take_events();
    for _ in 0..max_turns {
        if engine.state().is_terminal() {
            break;
        }
        let skill = choose_skill(engine);
        engine.request_player_skill(skill).expect("autoplay picks valid skills");
        engine.run_until_idle();
        events.extend(engine.take_events());
    }
    events
}

fn choose_skill<R: Rng>(engine: &CombatEngine<R>) -> SkillId {
    let player = engine.player().expect("initialized");
    let ap = player.action_points().map_or(0, |ap| ap.current());
    if player.health() * 3 < player.max_health() && ap >= engine.skills()[HEAL.index()].ap_cost {
        return HEAL;
    }
    if ap >= engine.skills()[FLURRY.index()].ap_cost {
        FLURRY
    } else {
        STRIKE
    }
}

// =============================================================================
// Event queries
// =============================================================================

/// Enemies damaged, in order.
pub fn damaged_enemies(events: &[CombatEvent]) -> Vec<CombatantId> {
    events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::EnemyDamaged { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .collect()
}

/// Enemies that attacked the player, in order.
pub fn attackers(events: &[CombatEvent]) -> Vec<CombatantId> {
    events
        .iter()
        .filter_map(|e| match e {
            CombatEvent::PlayerDamaged { attacker, .. } => Some(*attacker),
            _ => None,
        })
        .collect()
}

/// Number of events matching `pred`.
pub fn count_events(events: &[CombatEvent], pred: impl Fn(&CombatEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
