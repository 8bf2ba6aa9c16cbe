//! Headless Raid runner.
//!
//! Plays an encounter with the autopilot and prints every event as text.
//!
//! ```text
//! raid-sim                          # standard raid, seed 0, real pacing
//! raid-sim my_raid.json --seed 7 --fast
//! ```

mod autopilot;
mod render;

use std::path::PathBuf;
use std::thread;

use anyhow::{bail, Context, Result};
use clap::Parser;
use raid_core::event::present;
use raid_core::{CombatEngine, CombatState, EncounterFile, EncounterSetup};
use tracing::{debug, info, Level};
use tracing_subscriber::EnvFilter;

use crate::autopilot::choose_skill;
use crate::render::TextPresenter;

#[derive(Parser, Debug)]
#[command(name = "raid-sim", about = "Play a Raid encounter on autopilot")]
struct Cli {
    /// Encounter file (JSON). Uses the standard raid when omitted.
    encounter: Option<PathBuf>,

    /// Seed for the combat random source.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Skip pacing delays.
    #[arg(long)]
    fast: bool,

    /// Give up after this many player turns.
    #[arg(long, default_value_t = 1000)]
    max_turns: usize,

    /// Dev console command to run on the first player turn (e.g. `killall`).
    #[arg(long)]
    console: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let setup = match &cli.encounter {
        Some(path) => EncounterFile::load(path)
            .and_then(EncounterFile::into_setup)
            .with_context(|| format!("failed to load encounter {}", path.display()))?,
        None => EncounterSetup::standard(),
    };
    info!(rounds = setup.rounds.len(), seed = cli.seed, "starting raid");

    let mut engine = CombatEngine::new(setup, cli.seed);
    engine.initialize().context("invalid encounter")?;

    let mut presenter = TextPresenter::new();
    let mut console = cli.console.clone();
    let mut turns = 0;

    loop {
        while let Some(delay) = engine.next_delay() {
            if !cli.fast && !delay.is_zero() {
                thread::sleep(delay);
            }
            engine.advance();
            flush(&mut engine, &mut presenter);
        }

        match engine.state() {
            CombatState::Win | CombatState::Lose => break,
            CombatState::PlayerTurn => {}
            state => bail!("engine idle in unexpected state {state}"),
        }

        if let Some(command) = console.take() {
            for line in raid_core::console::execute(&mut engine, &command) {
                println!("{line}");
            }
            flush(&mut engine, &mut presenter);
            continue;
        }

        if turns >= cli.max_turns {
            bail!("no result after {turns} player turns");
        }
        turns += 1;

        let Some(skill) = choose_skill(&engine) else {
            bail!("no affordable skill on turn {turns}");
        };
        debug!(turn = turns, skill = skill.index(), "autopilot");
        engine
            .request_player_skill(skill)
            .with_context(|| format!("autopilot skill rejected on turn {turns}"))?;
        flush(&mut engine, &mut presenter);
    }

    info!(
        state = %engine.state(),
        round = engine.round_index(),
        turns,
        "raid finished"
    );
    println!("Result: {} after {turns} turns", engine.state());
    Ok(())
}

fn flush(engine: &mut CombatEngine, presenter: &mut TextPresenter) {
    present(&engine.take_events(), presenter);
    for line in presenter.drain() {
        println!("{line}");
    }
}
