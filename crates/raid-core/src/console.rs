//! Developer console commands.
//!
//! Input is trimmed and matched case-insensitively. Output is a list of
//! lines for whatever text widget hosts the console.

use rand::Rng;
use tracing::debug;

use crate::engine::CombatEngine;

/// Help text listing every command.
pub const HELP_TEXT: &str = "Commands: help | killall (aliases: kill all, kill_enemies, slay)";

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// `help` or `?`.
    Help,
    /// `killall`, `kill all`, `kill_enemies` or `slay`.
    KillAll,
    /// Anything else, kept verbatim.
    Unknown(String),
}

impl ConsoleCommand {
    /// Parses a line. Blank input yields `None`.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        let command = match trimmed.to_lowercase().as_str() {
            "help" | "?" => Self::Help,
            "killall" | "kill all" | "kill_enemies" | "slay" => Self::KillAll,
            _ => Self::Unknown(raw.to_string()),
        };
        Some(command)
    }
}

/// Parses and runs one console line against the engine.
///
/// Returns the lines to echo, starting with `"> <input>"`. Blank input
/// returns nothing.
pub fn execute<R: Rng>(engine: &mut CombatEngine<R>, raw: &str) -> Vec<String> {
    let Some(command) = ConsoleCommand::parse(raw) else {
        return Vec::new();
    };
    debug!(?command, "console command");

    let mut output = vec![format!("> {raw}")];
    match command {
        ConsoleCommand::Help => output.push(HELP_TEXT.to_string()),
        ConsoleCommand::KillAll => match engine.request_force_kill_all() {
            Ok(0) => output.push("No enemies to eliminate.".to_string()),
            Ok(_) => output.push("All enemies eliminated.".to_string()),
            Err(err) => output.push(format!("Cannot kill enemies: {err}")),
        },
        ConsoleCommand::Unknown(text) => output.push(format!("Unknown command: {text}")),
    }
    output
}
