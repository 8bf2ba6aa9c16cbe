//! Plain-text presenter.

use std::collections::BTreeMap;

use raid_core::event::EnemyDescriptor;
use raid_core::presentation::progress_bar;
use raid_core::{CombatantId, Presenter, SkillId};

/// Turns combat callbacks into printable lines.
///
/// Lines accumulate until [`drain`](Self::drain) so the caller decides where
/// they go.
#[derive(Debug, Default)]
pub struct TextPresenter {
    names: BTreeMap<CombatantId, String>,
    lines: Vec<String>,
}

impl TextPresenter {
    /// Creates an empty presenter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the lines rendered so far.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    fn name(&self, enemy: CombatantId) -> String {
        self.names
            .get(&enemy)
            .cloned()
            .unwrap_or_else(|| format!("enemy {enemy}"))
    }
}

impl Presenter for TextPresenter {
    fn on_round_started(&mut self, round_name: &str, enemies: &[EnemyDescriptor]) {
        self.names.clear();
        self.lines.push(format!("=== {round_name} ==="));
        for enemy in enemies {
            self.names.insert(enemy.id, enemy.name.clone());
            self.lines.push(format!(
                "  {} {}",
                enemy.name,
                progress_bar("HP", enemy.health, enemy.max_health)
            ));
        }
    }

    fn on_player_turn_started(&mut self, ap: u32, max_ap: u32) {
        let ap = i32::try_from(ap).unwrap_or(i32::MAX);
        let max_ap = i32::try_from(max_ap).unwrap_or(i32::MAX);
        self.lines.push(format!("Your turn. {}", progress_bar("AP", ap, max_ap)));
    }

    fn on_skill_used(&mut self, _skill: SkillId, name: &str, remaining_ap: u32) {
        self.lines.push(format!("You use {name} ({remaining_ap} AP left)"));
    }

    fn on_enemy_damaged(&mut self, enemy: CombatantId, health: i32, max_health: i32, was_critical: bool) {
        let crit = if was_critical { " Critical!" } else { "" };
        let name = self.name(enemy);
        self.lines
            .push(format!("  {name} {}{crit}", progress_bar("HP", health, max_health)));
    }

    fn on_player_damaged(&mut self, health: i32, max_health: i32) {
        self.lines
            .push(format!("  You are hit. {}", progress_bar("HP", health, max_health)));
    }

    fn on_player_healed(&mut self, health: i32, max_health: i32) {
        self.lines
            .push(format!("  You recover. {}", progress_bar("HP", health, max_health)));
    }

    fn on_enemy_defeated(&mut self, enemy: CombatantId) {
        let name = self.name(enemy);
        self.lines.push(format!("  {name} is defeated."));
    }

    fn on_target_changed(&mut self, enemy: CombatantId) {
        let name = self.name(enemy);
        self.lines.push(format!("  Targeting {name}."));
    }

    fn on_round_completed(&mut self, round_name: &str) {
        self.lines.push(format!("{round_name} cleared."));
    }

    fn on_reward_interlude(&mut self, is_final: bool) {
        if is_final {
            self.lines.push("The raid is over. Claim your reward.".to_string());
        } else {
            self.lines.push("A reward awaits before the next round.".to_string());
        }
    }

    fn on_encounter_won(&mut self) {
        self.lines.push("Victory!".to_string());
    }

    fn on_encounter_lost(&mut self) {
        self.lines.push("Defeat.".to_string());
    }
}
