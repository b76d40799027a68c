//! Facade-level behaviour and determinism tests.

use std::time::Duration;

use lane_defence_core::{
    catalog::{ARC, SPROUT},
    CommandError, DefenderId, Energy, Event, GridCell, TerminalState, WorldPoint, INITIAL_ENERGY,
};
use lane_defence_engine::Engine;

const STEP: Duration = Duration::from_millis(100);

fn run_for(engine: &mut Engine, from: Duration, until: Duration) -> (Vec<Event>, Duration) {
    let mut events = Vec::new();
    let mut now = from;
    while now < until {
        now += STEP;
        events.extend(engine.tick(now, STEP).events);
    }
    (events, now)
}

#[test]
fn player_commands_before_start_are_rejected() {
    let mut engine = Engine::new(1);
    assert_eq!(
        engine.place_defender(SPROUT, GridCell::new(0, 0)),
        Err(CommandError::InvalidState)
    );
    assert_eq!(
        engine.collect_pickup(WorldPoint::new(100.0, 100.0)),
        Err(CommandError::InvalidState)
    );
}

#[test]
fn placement_reports_funding_failures() {
    let mut engine = Engine::new(1);
    let events = engine.start_game();
    assert!(events.contains(&Event::GameStarted));

    // The seed balance covers a sprout but not an arc.
    assert_eq!(
        engine.place_defender(ARC, GridCell::new(0, 0)),
        Err(CommandError::InsufficientResources)
    );
    assert_eq!(
        engine.place_defender(SPROUT, GridCell::new(0, 0)),
        Ok(DefenderId::new(0))
    );
    assert_eq!(engine.snapshot().energy, Energy::new(0));
}

#[test]
fn catalog_exposes_the_placement_costs() {
    let engine = Engine::new(1);
    let arc = engine.catalog().defender(ARC).expect("arc is registered");
    assert!(arc.cost() > INITIAL_ENERGY);
}

#[test]
fn reset_restores_the_initial_snapshot() {
    let mut engine = Engine::new(7);
    let _ = engine.start_game();
    let _ = engine.place_defender(SPROUT, GridCell::new(2, 2)).expect("affordable");
    let _ = run_for(&mut engine, Duration::ZERO, Duration::from_secs(20));

    let events = engine.reset();
    assert_eq!(events, vec![Event::GameReset]);
    assert_eq!(engine.snapshot(), Engine::new(7).snapshot());
    assert!(!engine.wave_view().running);
}

#[test]
fn tick_report_snapshot_matches_engine_state() {
    let mut engine = Engine::new(3);
    let _ = engine.start_game();
    let report = engine.tick(STEP, STEP);
    assert_eq!(report.snapshot, engine.snapshot());
    assert!(report.events.contains(&Event::TimeAdvanced { dt: STEP }));
}

#[test]
fn sky_pickups_are_collectable_through_the_facade() {
    let mut engine = Engine::new(5);
    let _ = engine.start_game();

    let mut now = Duration::ZERO;
    let mut drop_position = None;
    while drop_position.is_none() && now < Duration::from_secs(15) {
        now += STEP;
        for event in engine.tick(now, STEP).events {
            if let Event::PickupDropped { position, .. } = event {
                drop_position = Some(position);
            }
        }
    }

    let position = drop_position.expect("director drops a pickup within 15s");
    let collected = engine.collect_pickup(position).expect("pickup under point");
    assert_eq!(collected, Energy::new(25));
}

#[test]
fn identical_seeds_replay_identical_sessions() {
    let script = |seed: u64| {
        let mut engine = Engine::new(seed);
        let mut events = engine.start_game();
        let _ = engine.place_defender(SPROUT, GridCell::new(1, 1)).expect("affordable");
        let (run_events, _) = run_for(&mut engine, Duration::ZERO, Duration::from_secs(60));
        events.extend(run_events);
        (events, engine.snapshot())
    };

    let (first_events, first_snapshot) = script(42);
    let (second_events, second_snapshot) = script(42);
    assert_eq!(first_events, second_events);
    assert_eq!(first_snapshot, second_snapshot);

    let (divergent_events, _) = script(43);
    assert_ne!(first_events, divergent_events);
}

#[test]
fn unattended_battles_end_in_defeat() {
    let mut engine = Engine::new(11);
    let _ = engine.start_game();

    // With no defenders the first spawns walk the field unopposed; the first
    // crossing happens within 8s + 43s of travel.
    let mut now = Duration::ZERO;
    let mut ended = false;
    while !ended && now < Duration::from_secs(120) {
        now += STEP;
        ended = engine.tick(now, STEP).events.contains(&Event::BattleEnded {
            outcome: TerminalState::Defeat,
        });
    }
    assert!(ended);
    assert_eq!(engine.snapshot().terminal, TerminalState::Defeat);
}
