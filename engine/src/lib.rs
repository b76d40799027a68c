#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Single-entry facade wiring the world and the spawn director together.
//!
//! Adapters drive the simulation exclusively through [`Engine`]: player
//! intents become commands, director commands are generated and applied
//! ahead of each tick, and every call returns the events the world emitted
//! so callers can narrate or assert on them.

use std::time::Duration;

use lane_defence_core::{
    ArchetypeId, Catalog, Command, CommandError, DefenderId, Energy, Event, FrameSnapshot,
    GridCell, WaveView, WorldPoint,
};
use lane_defence_system_spawning::{Config, Spawning};
use lane_defence_world::{apply, query, World};

/// Everything produced by one simulation step.
#[derive(Clone, Debug)]
pub struct TickReport {
    /// Events emitted while applying director commands and advancing time.
    pub events: Vec<Event>,
    /// Rendering snapshot taken after the step completed.
    pub snapshot: FrameSnapshot,
}

/// Deterministic simulation façade owning the world and the spawn director.
#[derive(Debug)]
pub struct Engine {
    world: World,
    spawning: Spawning,
    seed: u64,
    pending: Vec<Event>,
}

impl Engine {
    /// Creates an engine whose battles replay identically for a given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            world: World::new(),
            spawning: Spawning::new(Config::new(seed)),
            seed,
            pending: Vec::new(),
        }
    }

    /// Seed the engine was constructed with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Archetype catalog the world validates commands against.
    #[must_use]
    pub fn catalog(&self) -> Catalog {
        query::catalog(&self.world)
    }

    /// Starts a fresh battle at wave one.
    pub fn start_game(&mut self) -> Vec<Event> {
        self.execute(Command::StartGame)
    }

    /// Returns all state to its initial configuration without starting.
    pub fn reset(&mut self) -> Vec<Event> {
        self.spawning = Spawning::new(Config::new(self.seed));
        self.pending.clear();
        let mut events = Vec::new();
        apply(&mut self.world, Command::Reset, &mut events);
        events
    }

    /// Requests placement of a defender, reporting the assigned identifier.
    pub fn place_defender(
        &mut self,
        archetype: ArchetypeId,
        cell: GridCell,
    ) -> Result<DefenderId, CommandError> {
        let events = self.execute(Command::PlaceDefender { archetype, cell });
        for event in &events {
            match event {
                Event::DefenderPlaced { defender, .. } => return Ok(*defender),
                Event::PlacementRejected { reason, .. } => return Err(*reason),
                _ => {}
            }
        }
        Err(CommandError::InvalidState)
    }

    /// Requests collection of the pickup under the provided point.
    pub fn collect_pickup(&mut self, point: WorldPoint) -> Result<Energy, CommandError> {
        let events = self.execute(Command::CollectPickup { point });
        for event in &events {
            match event {
                Event::PickupCollected { value, .. } => return Ok(*value),
                Event::CollectRejected { reason, .. } => return Err(*reason),
                _ => {}
            }
        }
        Err(CommandError::InvalidState)
    }

    /// Advances the simulation one step.
    ///
    /// Director commands derived from the previous step's events are applied
    /// before time advances, so a spawn owed at an interval boundary lands on
    /// the very next tick.
    pub fn tick(&mut self, now: Duration, dt: Duration) -> TickReport {
        let mut commands = Vec::new();
        self.spawning
            .handle(&self.pending, query::wave_view(&self.world), &mut commands);
        self.pending.clear();

        let mut events = Vec::new();
        for command in commands {
            apply(&mut self.world, command, &mut events);
        }
        apply(&mut self.world, Command::Tick { now, dt }, &mut events);

        self.pending.extend(events.iter().cloned());
        TickReport {
            events,
            snapshot: query::frame_snapshot(&self.world),
        }
    }

    /// Rendering snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> FrameSnapshot {
        query::frame_snapshot(&self.world)
    }

    /// Wave-progress view of the current state.
    #[must_use]
    pub fn wave_view(&self) -> WaveView {
        query::wave_view(&self.world)
    }

    fn execute(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        apply(&mut self.world, command, &mut events);
        self.pending.extend(events.iter().cloned());
        events
    }
}
