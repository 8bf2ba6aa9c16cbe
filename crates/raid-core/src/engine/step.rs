//! Scheduled sub-steps of a combat sequence.
//!
//! A player action or a round transition is not resolved in one call. The
//! engine queues [`Step`]s and the driver runs them one at a time with
//! [`CombatEngine::advance`](super::CombatEngine::advance), waiting in between
//! for as long as the step's [`Pacing`] hint suggests. State only changes
//! inside a step, never during the wait.

use serde::{Deserialize, Serialize};

use crate::combatant::CombatantId;

/// How long presentation should wait before running a step.
///
/// Mapped to real time by [`PacingSettings`](crate::config::PacingSettings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pacing {
    /// Run right away.
    Immediate,
    /// Short pause between the hits of one skill.
    Hit,
    /// Pause before an enemy acts.
    EnemyAction,
    /// The reward screen.
    RewardInterlude,
    /// Pause before the next round spawns.
    RoundTransition,
}

/// One unit of scheduled combat work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Spawn the roster of round `index` and start the player turn.
    StartRound {
        /// Round index.
        index: usize,
    },
    /// One damage application of a player skill.
    PlayerHit {
        /// Target captured when the skill was committed.
        target: CombatantId,
        /// 1-based hit number.
        hit: u32,
        /// Total hits of the skill.
        of: u32,
        /// PWR of this hit.
        power: i32,
    },
    /// Snapshot the living enemies and queue one action each.
    BeginEnemyPhase,
    /// One enemy's basic attack against the player.
    EnemyAction {
        /// Acting enemy.
        enemy: CombatantId,
    },
    /// Hand the turn back to the player.
    EndEnemyPhase,
    /// Close the reward screen.
    FinishInterlude {
        /// True if victory follows.
        is_final: bool,
    },
}

impl Step {
    /// Wait suggested before this step runs.
    #[must_use]
    pub const fn pacing(&self) -> Pacing {
        match self {
            Self::StartRound { index: 0 } | Self::PlayerHit { hit: 1, .. } => Pacing::Immediate,
            Self::StartRound { .. } => Pacing::RoundTransition,
            Self::PlayerHit { .. } => Pacing::Hit,
            Self::BeginEnemyPhase | Self::EndEnemyPhase => Pacing::Immediate,
            Self::EnemyAction { .. } => Pacing::EnemyAction,
            Self::FinishInterlude { .. } => Pacing::RewardInterlude,
        }
    }

    /// Combatant the step acts on or with, if any.
    #[must_use]
    pub const fn subject(&self) -> Option<CombatantId> {
        match self {
            Self::PlayerHit { target, .. } => Some(*target),
            Self::EnemyAction { enemy } => Some(*enemy),
            _ => None,
        }
    }
}
