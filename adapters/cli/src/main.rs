#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless, scripted Lane Defence battle.
//!
//! A fixed build order stands in for a player: the runner places defenders
//! as energy allows, collects every pickup the moment it drops, and narrates
//! wave progress until the battle ends or the step budget runs out.

use std::time::Duration;

use anyhow::{ensure, Result};
use clap::Parser;
use lane_defence_core::{
    catalog::{ARC, BULWARK, SPROUT, TORRENT},
    ArchetypeId, CommandError, Event, GridCell, TerminalState, WELCOME_BANNER,
};
use lane_defence_engine::Engine;

/// Simulated time advanced per step.
const STEP: Duration = Duration::from_millis(16);

#[derive(Debug, Parser)]
#[command(name = "lane-defence", about = "Headless Lane Defence battle runner")]
struct Args {
    /// Seed driving the deterministic spawn director.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Maximum number of 16 ms simulation steps before giving up.
    #[arg(long, default_value_t = 25_000)]
    max_steps: u64,
}

/// Entry point for the Lane Defence command-line runner.
fn main() -> Result<()> {
    run(Args::parse())
}

fn run(args: Args) -> Result<()> {
    ensure!(args.max_steps > 0, "--max-steps must be positive");

    println!("{WELCOME_BANNER}");
    println!("seed {}", args.seed);

    let mut engine = Engine::new(args.seed);
    let plan = build_plan();
    let mut next_build = 0;

    for event in engine.start_game() {
        narrate(Duration::ZERO, &event);
    }

    let mut now = Duration::ZERO;
    for _ in 0..args.max_steps {
        now += STEP;
        let report = engine.tick(now, STEP);
        for event in &report.events {
            narrate(now, event);
            if let Event::PickupDropped { position, .. } = event {
                if let Ok(value) = engine.collect_pickup(*position) {
                    println!("[{:7.1}s] collected {} energy", now.as_secs_f32(), value.get());
                }
            }
        }
        advance_build(&mut engine, now, &plan, &mut next_build);
        if report.snapshot.terminal.is_terminal() {
            break;
        }
    }

    let snapshot = engine.snapshot();
    println!(
        "finished at {:.1}s: wave {}, {} defenders standing, {} energy banked",
        now.as_secs_f32(),
        snapshot.wave,
        snapshot.defenders.len(),
        snapshot.energy.get()
    );
    match snapshot.terminal {
        TerminalState::Victory => println!("outcome: victory"),
        TerminalState::Defeat => println!("outcome: defeat"),
        TerminalState::None => println!("outcome: undecided after step budget"),
    }
    Ok(())
}

/// Fixed placement script: an economy opener, an arc line, a bulwark wall,
/// then slowing torrents behind it.
fn build_plan() -> Vec<(ArchetypeId, GridCell)> {
    let mut plan = vec![(SPROUT, GridCell::new(2, 0))];
    for row in 0..5 {
        plan.push((ARC, GridCell::new(row, 1)));
    }
    for row in 0..5 {
        plan.push((BULWARK, GridCell::new(row, 6)));
    }
    for row in 0..5 {
        plan.push((TORRENT, GridCell::new(row, 2)));
    }
    plan
}

fn advance_build(
    engine: &mut Engine,
    now: Duration,
    plan: &[(ArchetypeId, GridCell)],
    next: &mut usize,
) {
    while let Some((archetype, cell)) = plan.get(*next).copied() {
        match engine.place_defender(archetype, cell) {
            Ok(_) => {
                println!(
                    "[{:7.1}s] placed {} at row {} column {}",
                    now.as_secs_f32(),
                    archetype,
                    cell.row(),
                    cell.column()
                );
                *next += 1;
            }
            Err(CommandError::InsufficientResources) => break,
            Err(reason) => {
                println!(
                    "[{:7.1}s] skipping {} at row {} column {}: {}",
                    now.as_secs_f32(),
                    archetype,
                    cell.row(),
                    cell.column(),
                    reason
                );
                *next += 1;
            }
        }
    }
}

fn narrate(now: Duration, event: &Event) {
    let stamp = now.as_secs_f32();
    match event {
        Event::GameStarted => println!("[{stamp:7.1}s] battle started"),
        Event::WaveStarted { wave } => println!("[{stamp:7.1}s] wave {wave} incoming"),
        Event::WaveCleared { wave } => println!("[{stamp:7.1}s] wave {wave} cleared"),
        Event::EnemySpawned { archetype, row, .. } => {
            println!("[{stamp:7.1}s] {archetype} entered lane {row}");
        }
        Event::DefenderKilled { cell, .. } => {
            println!(
                "[{stamp:7.1}s] defender lost at row {} column {}",
                cell.row(),
                cell.column()
            );
        }
        Event::BattleEnded { outcome } => match outcome {
            TerminalState::Victory => println!("[{stamp:7.1}s] every wave repelled"),
            TerminalState::Defeat => println!("[{stamp:7.1}s] the line is breached"),
            TerminalState::None => {}
        },
        _ => {}
    }
}
