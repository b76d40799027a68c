//! Behavioural tests for the spawn director.

use std::time::Duration;

use lane_defence_core::{
    catalog::SHAMBLER, layout, Catalog, Command, Event, TerminalState, WaveView,
};
use lane_defence_system_spawning::{spawn_interval, Config, Spawning};
use lane_defence_world::{apply, query, World};

fn running_view(wave: u32, spawned: u32, quota: u32) -> WaveView {
    WaveView {
        wave,
        spawned,
        quota,
        enemies_alive: 0,
        running: true,
        terminal: TerminalState::None,
    }
}

fn time_advanced(total: Duration, step: Duration) -> Vec<Event> {
    let mut events = Vec::new();
    let mut elapsed = Duration::ZERO;
    while elapsed < total {
        elapsed += step;
        events.push(Event::TimeAdvanced { dt: step });
    }
    events
}

fn spawn_commands(commands: &[Command]) -> Vec<&Command> {
    commands
        .iter()
        .filter(|command| matches!(command, Command::SpawnEnemy { .. }))
        .collect()
}

fn drop_commands(commands: &[Command]) -> Vec<&Command> {
    commands
        .iter()
        .filter(|command| matches!(command, Command::DropPickup { .. }))
        .collect()
}

#[test]
fn idle_outside_a_running_battle() {
    let mut spawning = Spawning::new(Config::new(7));
    let mut out = Vec::new();

    let mut idle = running_view(1, 0, 10);
    idle.running = false;
    let events = time_advanced(Duration::from_secs(60), Duration::from_secs(1));
    spawning.handle(&events, idle, &mut out);
    assert!(out.is_empty());

    // Time observed while idle must not count toward the next battle.
    let events = time_advanced(Duration::from_secs(7), Duration::from_secs(1));
    spawning.handle(&events, running_view(1, 0, 10), &mut out);
    assert!(spawn_commands(&out).is_empty());
}

#[test]
fn terminal_battles_silence_the_director() {
    let mut spawning = Spawning::new(Config::new(7));
    let mut out = Vec::new();
    let mut view = running_view(1, 3, 10);
    view.terminal = TerminalState::Defeat;

    let events = time_advanced(Duration::from_secs(60), Duration::from_secs(1));
    spawning.handle(&events, view, &mut out);
    assert!(out.is_empty());
}

#[test]
fn large_steps_emit_every_owed_command() {
    let mut spawning = Spawning::new(Config::new(11));
    let mut out = Vec::new();

    // 17 seconds at wave one owes two enemy spawns and one sky drop.
    let events = time_advanced(Duration::from_secs(17), Duration::from_secs(17));
    spawning.handle(&events, running_view(1, 0, 10), &mut out);

    assert_eq!(spawn_commands(&out).len(), 2);
    assert_eq!(drop_commands(&out).len(), 1);
}

#[test]
fn wave_one_spawns_only_the_baseline_enemy_in_valid_lanes() {
    let mut spawning = Spawning::new(Config::new(3));
    let mut out = Vec::new();
    let events = time_advanced(Duration::from_secs(100), Duration::from_secs(1));
    spawning.handle(&events, running_view(1, 0, 100), &mut out);

    let spawns = spawn_commands(&out);
    assert!(!spawns.is_empty());
    for command in spawns {
        let Command::SpawnEnemy { archetype, row } = command else {
            unreachable!();
        };
        assert_eq!(*archetype, SHAMBLER);
        assert!(*row < layout::GRID_ROWS);
    }
}

#[test]
fn later_waves_draw_from_the_unlocked_roster() {
    let mut spawning = Spawning::new(Config::new(5));
    let mut out = Vec::new();
    let events = time_advanced(Duration::from_secs(200), Duration::from_secs(1));
    spawning.handle(&events, running_view(3, 0, 100), &mut out);

    let catalog = Catalog::builtin();
    let mut seen = Vec::new();
    for command in spawn_commands(&out) {
        let Command::SpawnEnemy { archetype, .. } = command else {
            unreachable!();
        };
        let template = catalog.enemy(*archetype).expect("spawned archetype exists");
        assert!(template.unlock_wave() <= 3);
        if !seen.contains(archetype) {
            seen.push(*archetype);
        }
    }
    assert!(seen.len() > 1, "wave three should mix archetypes: {seen:?}");
}

#[test]
fn met_quota_stops_enemy_spawns_but_not_drops() {
    let mut spawning = Spawning::new(Config::new(13));
    let mut out = Vec::new();
    let events = time_advanced(Duration::from_secs(20), Duration::from_secs(1));
    spawning.handle(&events, running_view(1, 10, 10), &mut out);

    assert!(spawn_commands(&out).is_empty());
    assert_eq!(drop_commands(&out).len(), 2);
}

#[test]
fn an_owed_spawn_fires_the_moment_a_new_wave_opens() {
    let mut spawning = Spawning::new(Config::new(23));
    let mut out = Vec::new();

    // Wave one's quota is already met: time accrues but nothing spawns.
    let events = time_advanced(Duration::from_secs(30), Duration::from_secs(1));
    spawning.handle(&events, running_view(1, 10, 10), &mut out);
    assert!(spawn_commands(&out).is_empty());

    // The first step after the turnover spawns immediately instead of
    // waiting out a fresh interval.
    let events = vec![
        Event::WaveCleared { wave: 1 },
        Event::WaveStarted { wave: 2 },
        Event::TimeAdvanced {
            dt: Duration::from_millis(100),
        },
    ];
    spawning.handle(&events, running_view(2, 0, 15), &mut out);
    assert_eq!(spawn_commands(&out).len(), 1);
}

#[test]
fn drops_land_inside_the_field_margins() {
    let mut spawning = Spawning::new(Config::new(17));
    let mut out = Vec::new();
    let events = time_advanced(Duration::from_secs(300), Duration::from_secs(1));
    spawning.handle(&events, running_view(1, 10, 10), &mut out);

    let drops = drop_commands(&out);
    assert!(!drops.is_empty());
    for command in drops {
        let Command::DropPickup { x } = command else {
            unreachable!();
        };
        assert!(*x >= 50.0 && *x <= layout::PLAYFIELD_WIDTH - 50.0, "x = {x}");
    }
}

#[test]
fn identical_seeds_replay_identical_battles() {
    let mut first = Spawning::new(Config::new(99));
    let mut second = Spawning::new(Config::new(99));
    let mut divergent = Spawning::new(Config::new(100));

    let mut first_out = Vec::new();
    let mut second_out = Vec::new();
    let mut divergent_out = Vec::new();
    let mut view = running_view(1, 0, 50);
    for round in 0..20u32 {
        let events = time_advanced(Duration::from_secs(5), Duration::from_secs(1));
        view.wave = 1 + round / 8;
        first.handle(&events, view, &mut first_out);
        second.handle(&events, view, &mut second_out);
        divergent.handle(&events, view, &mut divergent_out);
    }

    assert_eq!(first_out, second_out);
    assert_ne!(first_out, divergent_out);
}

#[test]
fn director_and_world_advance_a_battle_together() {
    let mut world = World::new();
    let mut spawning = Spawning::new(Config::new(1));
    let mut events = Vec::new();
    apply(&mut world, Command::StartGame, &mut events);

    let step = Duration::from_millis(100);
    let mut now = Duration::ZERO;
    let mut commands = Vec::new();
    while now < Duration::from_secs(20) {
        now += step;
        commands.clear();
        spawning.handle(&events, query::wave_view(&world), &mut commands);
        events.clear();
        for command in commands.drain(..) {
            apply(&mut world, command, &mut events);
        }
        apply(&mut world, Command::Tick { now, dt: step }, &mut events);
    }

    // Twenty seconds at the wave-one cadence puts two shamblers on the field,
    // nowhere near the boundary yet.
    let view = query::wave_view(&world);
    assert_eq!(view.spawned, 2);
    assert_eq!(view.enemies_alive, 2);
    assert_eq!(view.terminal, TerminalState::None);
    for enemy in query::frame_snapshot(&world).enemies {
        assert!(enemy.row < layout::GRID_ROWS);
        assert!(enemy.x > 0.0);
    }
}

#[test]
fn game_start_resets_the_pacing_clocks() {
    let mut spawning = Spawning::new(Config::new(21));
    let mut out = Vec::new();

    let events = time_advanced(Duration::from_secs(7), Duration::from_secs(1));
    spawning.handle(&events, running_view(1, 0, 10), &mut out);
    assert!(spawn_commands(&out).is_empty());

    spawning.handle(&[Event::GameStarted], running_view(1, 0, 10), &mut out);

    // A fresh battle owes nothing until a full interval elapses again.
    let events = time_advanced(Duration::from_secs(7), Duration::from_secs(1));
    spawning.handle(&events, running_view(1, 0, 10), &mut out);
    assert!(spawn_commands(&out).is_empty());
    assert_eq!(spawn_interval(1), Duration::from_millis(8000));
}
