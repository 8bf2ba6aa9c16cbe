//! # Raid Core
//!
//! Combat resolution engine for Raid, a turn-based dungeon raid.
//!
//! This crate decides *what* happens in a fight: damage, deaths, turn order,
//! round progression and victory or defeat. It never decides *how* any of it
//! is shown. Presentation reads [`event::CombatEvent`]s and paces the
//! engine's scheduled [`engine::Step`]s however it likes.
//!
//! ## Layout
//!
//! - **Damage**: the formula and its coefficients ([`damage`])
//! - **Combatants**: stats, health, AP ([`combatant`]) stored in an [`arena`]
//! - **Targeting**: cursor over the living enemies ([`targeting`])
//! - **Encounter**: rounds, bestiary, round progression ([`encounter`],
//!   loaded from JSON by [`config`])
//! - **Engine**: the turn/round state machine ([`engine`])
//!
//! ## Usage
//!
//! ```
//! use raid_core::{CombatEngine, CombatState, EncounterSetup, SkillId};
//!
//! let mut engine = CombatEngine::new(EncounterSetup::standard(), 42);
//! engine.initialize()?;
//! engine.run_until_idle();
//!
//! while engine.state() == CombatState::PlayerTurn {
//!     engine.request_player_skill(SkillId::new(0))?;
//!     engine.run_until_idle();
//! }
//! assert!(engine.state().is_terminal());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
pub mod combatant;
pub mod config;
pub mod console;
pub mod damage;
pub mod encounter;
pub mod engine;
pub mod error;
pub mod event;
pub mod presentation;
pub mod skill;
pub mod targeting;

pub use combatant::{Combatant, CombatantId, CombatantKind};
pub use config::{EncounterFile, PacingSettings, PlayerSettings};
pub use damage::{resolve_damage, DamageFormulaConfig};
pub use encounter::EncounterSetup;
pub use engine::{CombatEngine, CombatState, Pacing, Step};
pub use error::{ActionRejected, ConfigError};
pub use event::{CombatEvent, Presenter};
pub use skill::{Skill, SkillId};

#[cfg(test)]
mod tests;
