//! Skill selection for unattended runs.

use rand::Rng;
use raid_core::skill::SkillKind;
use raid_core::{CombatEngine, SkillId};

/// Picks the skill an unattended player commits this turn.
///
/// Heals when below a third of max health and a heal is affordable.
/// Otherwise takes the affordable attack with the most total power,
/// preferring the earlier skill on ties. Returns `None` if nothing is
/// affordable or there is no player.
pub fn choose_skill<R: Rng>(engine: &CombatEngine<R>) -> Option<SkillId> {
    let player = engine.player()?;
    let ap = player.action_points().map_or(0, |points| points.current());
    let affordable = || {
        engine
            .skills()
            .iter()
            .enumerate()
            .filter(move |(_, skill)| skill.ap_cost <= ap)
    };

    if player.health() * 3 < player.max_health() {
        if let Some((index, _)) = affordable().find(|(_, skill)| skill.kind == SkillKind::Heal) {
            return Some(SkillId::new(index));
        }
    }

    affordable()
        .filter(|(_, skill)| skill.kind == SkillKind::Attack)
        .map(|(index, skill)| (index, i64::from(skill.hit_power()) * i64::from(skill.hit_count)))
        .fold(None, |best: Option<(usize, i64)>, (index, total)| match best {
            Some((_, best_total)) if best_total >= total => best,
            _ => Some((index, total)),
        })
        .map(|(index, _)| SkillId::new(index))
}
