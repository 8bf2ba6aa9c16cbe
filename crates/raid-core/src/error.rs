//! Error types for combat requests and encounter setup.
//!
//! Two families exist and they never mix:
//!
//! - [`ActionRejected`]: returned by every `request_*` call on the engine.
//!   A rejection leaves combat state untouched; the caller may correct the
//!   request and resubmit it.
//! - [`ConfigError`]: raised while building an encounter. Setup aborts on the
//!   first error instead of starting combat with a partial roster.

use std::path::PathBuf;

use thiserror::Error;

use crate::combatant::CombatantId;
use crate::engine::CombatState;
use crate::skill::SkillId;

/// Reason a combat request was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionRejected {
    /// The request is not valid in the current state (or a sequence is
    /// still being played out).
    #[error("{action} is not allowed during {state}")]
    InvalidState {
        /// Short name of the rejected request.
        action: &'static str,
        /// State the engine was in.
        state: CombatState,
    },

    /// The player cannot pay the skill's AP cost.
    #[error("not enough AP for {skill}: costs {cost}, {available} available")]
    InsufficientResource {
        /// Skill name.
        skill: String,
        /// AP cost of the skill.
        cost: u32,
        /// AP the player currently has.
        available: u32,
    },

    /// An attack was requested but no enemy is alive.
    #[error("no living enemy to target")]
    NoValidTarget,

    /// The skill id does not exist in the player's skill list.
    #[error("unknown skill {0}")]
    UnknownSkill(SkillId),

    /// The combatant is not in the active enemy set.
    #[error("combatant {0} is not an active enemy")]
    UnknownTarget(CombatantId),
}

/// Fatal problem with encounter configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The encounter has no rounds.
    #[error("encounter has no rounds")]
    NoRounds,

    /// A round has an empty roster.
    #[error("round {index} ({name}) has no enemies")]
    EmptyRound {
        /// Round index.
        index: usize,
        /// Round name.
        name: String,
    },

    /// A round index refers past the end of the round list.
    #[error("round index {index} out of range (encounter has {len} rounds)")]
    RoundOutOfRange {
        /// Offending index.
        index: usize,
        /// Number of rounds.
        len: usize,
    },

    /// A round references an enemy key missing from the bestiary.
    #[error("round {round} references unknown enemy '{key}'")]
    UnknownEnemy {
        /// Round index.
        round: usize,
        /// Bestiary key.
        key: String,
    },

    /// A round spawns more enemies than there are spawn slots.
    #[error("round {round} spawns {count} enemies but only {slots} slots exist")]
    TooManyEnemies {
        /// Round index.
        round: usize,
        /// Roster size.
        count: usize,
        /// Available slots.
        slots: usize,
    },

    /// Stat block failed validation.
    #[error("invalid stats for '{name}': {reason}")]
    InvalidStats {
        /// Combatant name.
        name: String,
        /// What is wrong.
        reason: String,
    },

    /// Skill failed validation.
    #[error("invalid skill '{name}': {reason}")]
    InvalidSkill {
        /// Skill name.
        name: String,
        /// What is wrong.
        reason: String,
    },

    /// The player has an empty skill list.
    #[error("player has no skills")]
    NoSkills,

    /// A damage formula coefficient is unusable.
    #[error("invalid damage formula: {0}")]
    InvalidFormula(String),

    /// The encounter file is not valid JSON for the expected schema.
    #[error("failed to parse encounter: {0}")]
    Parse(#[from] serde_json::Error),

    /// The encounter file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_messages_are_readable() {
        let err = ActionRejected::InvalidState {
            action: "use skill",
            state: CombatState::EnemyTurn,
        };
        assert_eq!(err.to_string(), "use skill is not allowed during ENEMYTURN");

        let err = ActionRejected::InsufficientResource {
            skill: "Flurry".to_string(),
            cost: 20,
            available: 5,
        };
        assert_eq!(err.to_string(), "not enough AP for Flurry: costs 20, 5 available");
    }

    #[test]
    fn parse_error_converts() {
        let err: ConfigError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
