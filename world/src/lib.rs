#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for Lane Defence.
//!
//! The world owns every mutable gameplay fact: the placement grid, live
//! defenders and enemies, projectiles in flight, uncollected pickups, the
//! energy balance, and wave progress. State changes only through
//! [`apply`], which executes one [`Command`] and appends the resulting
//! [`Event`]s. Commands that violate a rule are rejected with an event and
//! leave the world untouched.
//!
//! The simulation clock restarts at zero whenever a battle starts; the
//! external driver supplies monotonic `now` values from that point on.

use std::time::Duration;

use lane_defence_core::{
    layout, ArchetypeId, Catalog, Command, CommandError, DefenderId, Energy, EnemyId, Event,
    GridCell, PickupId, ProjectileId, TerminalState, WorldPoint, INITIAL_ENERGY, WAVE_QUOTAS,
};

use crate::entities::{Defender, DefenderAction, Enemy, Pickup, Projectile};
use crate::grid::PlacementGrid;

mod combat;
mod entities;
mod grid;

/// Energy value of a sky-dropped pickup.
const SKY_DROP_VALUE: Energy = Energy::new(25);

/// Vertical position at which sky pickups enter the field.
const SKY_DROP_START_Y: f32 = -20.0;

/// Rest position sky pickups drift down to.
const SKY_DROP_TARGET_Y: f32 = 250.0;

/// Vertical offset above a producer at which its pickups appear.
const PRODUCED_PICKUP_RISE: f32 = 20.0;

/// Vertical offset below a producer's center where its pickups settle.
const PRODUCED_PICKUP_SETTLE: f32 = 10.0;

/// Horizontal offset of the projectile muzzle from a defender's center.
const MUZZLE_OFFSET_X: f32 = 30.0;

/// Authoritative simulation state.
#[derive(Clone, Debug)]
pub struct World {
    catalog: Catalog,
    grid: PlacementGrid,
    defenders: Vec<Defender>,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,
    pickups: Vec<Pickup>,
    energy: Energy,
    wave: u32,
    spawned: u32,
    terminal: TerminalState,
    running: bool,
    now: Duration,
    next_defender: u32,
    next_enemy: u32,
    next_projectile: u32,
    next_pickup: u32,
}

impl World {
    /// Creates a world in its initial, not-yet-running configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            catalog: Catalog::builtin(),
            grid: PlacementGrid::new(),
            defenders: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            pickups: Vec::new(),
            energy: INITIAL_ENERGY,
            wave: 1,
            spawned: 0,
            terminal: TerminalState::None,
            running: false,
            now: Duration::ZERO,
            next_defender: 0,
            next_enemy: 0,
            next_projectile: 0,
            next_pickup: 0,
        }
    }

    fn reset_state(&mut self) {
        self.grid.clear();
        self.defenders.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.pickups.clear();
        self.energy = INITIAL_ENERGY;
        self.wave = 1;
        self.spawned = 0;
        self.terminal = TerminalState::None;
        self.now = Duration::ZERO;
        self.next_defender = 0;
        self.next_enemy = 0;
        self.next_projectile = 0;
        self.next_pickup = 0;
    }

    fn quota(&self) -> u32 {
        WAVE_QUOTAS[(self.wave as usize - 1).min(WAVE_QUOTAS.len() - 1)]
    }

    fn in_battle(&self) -> bool {
        self.running && !self.terminal.is_terminal()
    }

    fn start_game(&mut self, events: &mut Vec<Event>) {
        self.reset_state();
        self.running = true;
        events.push(Event::GameStarted);
        events.push(Event::WaveStarted { wave: self.wave });
    }

    fn reset(&mut self, events: &mut Vec<Event>) {
        self.reset_state();
        self.running = false;
        events.push(Event::GameReset);
    }

    fn place_defender(&mut self, archetype: ArchetypeId, cell: GridCell, events: &mut Vec<Event>) {
        let reject = |events: &mut Vec<Event>, reason: CommandError| {
            events.push(Event::PlacementRejected {
                archetype,
                cell,
                reason,
            });
        };
        if !self.in_battle() {
            return reject(events, CommandError::InvalidState);
        }
        let Ok(template) = self.catalog.defender(archetype) else {
            return reject(events, CommandError::UnknownArchetype);
        };
        if let Some(reason) = self.grid.placement_error(cell) {
            return reject(events, reason);
        }
        let Some(remaining) = self.energy.checked_sub(template.cost()) else {
            return reject(events, CommandError::InsufficientResources);
        };

        self.energy = remaining;
        let id = DefenderId::new(self.next_defender);
        self.next_defender += 1;
        self.grid.occupy(id, cell);
        self.defenders.push(Defender::new(id, template, cell, self.now));
        events.push(Event::DefenderPlaced {
            defender: id,
            archetype,
            cell,
        });
    }

    fn collect_pickup(&mut self, point: WorldPoint, events: &mut Vec<Event>) {
        if !self.in_battle() {
            events.push(Event::CollectRejected {
                point,
                reason: CommandError::InvalidState,
            });
            return;
        }
        // Scan back to front so the most recently dropped pickup wins when
        // several overlap the point.
        let Some(index) = self.pickups.iter().rposition(|pickup| pickup.contains(point)) else {
            events.push(Event::CollectRejected {
                point,
                reason: CommandError::NoPickupAtPoint,
            });
            return;
        };
        let pickup = self.pickups.remove(index);
        self.energy = self.energy.saturating_add(pickup.value);
        events.push(Event::PickupCollected {
            pickup: pickup.id,
            value: pickup.value,
        });
    }

    fn spawn_enemy(&mut self, archetype: ArchetypeId, row: u32, events: &mut Vec<Event>) {
        // Director commands are advisory: anything stale or out of bounds is
        // dropped without an event.
        if !self.in_battle() || row >= layout::GRID_ROWS || self.spawned >= self.quota() {
            return;
        }
        let Ok(template) = self.catalog.enemy(archetype) else {
            debug_assert!(false, "spawn director referenced unknown archetype {archetype}");
            return;
        };
        let id = EnemyId::new(self.next_enemy);
        self.next_enemy += 1;
        self.enemies.push(Enemy::new(id, template, row));
        self.spawned += 1;
        events.push(Event::EnemySpawned {
            enemy: id,
            archetype,
            row,
        });
    }

    fn drop_pickup(&mut self, x: f32, events: &mut Vec<Event>) {
        if !self.in_battle() {
            return;
        }
        let position = WorldPoint::new(x, SKY_DROP_START_Y);
        self.spawn_pickup(position, SKY_DROP_TARGET_Y, SKY_DROP_VALUE, events);
    }

    fn spawn_pickup(
        &mut self,
        position: WorldPoint,
        target_y: f32,
        value: Energy,
        events: &mut Vec<Event>,
    ) {
        let id = PickupId::new(self.next_pickup);
        self.next_pickup += 1;
        self.pickups
            .push(Pickup::new(id, position, target_y, value, self.now));
        events.push(Event::PickupDropped {
            pickup: id,
            position,
            value,
        });
    }

    fn tick(&mut self, now: Duration, dt: Duration, events: &mut Vec<Event>) {
        if !self.in_battle() {
            return;
        }
        self.now = now;
        events.push(Event::TimeAdvanced { dt });

        self.update_defenders(now, events);
        if self.update_enemies(now, dt, events) {
            events.push(Event::BattleEnded {
                outcome: TerminalState::Defeat,
            });
            return;
        }
        for projectile in &mut self.projectiles {
            projectile.advance(dt);
        }
        self.projectiles.retain(|projectile| !projectile.is_off_field());
        combat::resolve(now, &mut self.projectiles, &mut self.enemies, events);
        self.update_pickups(now, dt, events);
        self.check_wave_completion(events);
    }

    fn update_defenders(&mut self, now: Duration, events: &mut Vec<Event>) {
        let mut actions: Vec<(usize, DefenderAction)> = Vec::new();
        for (index, defender) in self.defenders.iter_mut().enumerate() {
            let enemy_ahead = self.enemies.iter().any(|enemy| {
                enemy.row == defender.cell.row() && enemy.x > defender.position.x()
            });
            if let Some(action) = defender.update(now, enemy_ahead) {
                actions.push((index, action));
            }
        }
        for (index, action) in actions {
            let (position, row, archetype) = {
                let defender = &self.defenders[index];
                (defender.position, defender.cell.row(), defender.archetype)
            };
            match action {
                DefenderAction::Produce(amount) => {
                    let spawn =
                        WorldPoint::new(position.x(), position.y() - PRODUCED_PICKUP_RISE);
                    let target_y = position.y() + PRODUCED_PICKUP_SETTLE;
                    self.spawn_pickup(spawn, target_y, amount, events);
                }
                DefenderAction::Fire => {
                    let id = ProjectileId::new(self.next_projectile);
                    self.next_projectile += 1;
                    self.projectiles.push(Projectile::new(
                        id,
                        row,
                        position.x() + MUZZLE_OFFSET_X,
                        archetype,
                    ));
                    events.push(Event::ProjectileFired {
                        projectile: id,
                        source: archetype.id(),
                        row,
                    });
                }
            }
        }
    }

    /// Advances or melees every enemy; returns true when one crossed the
    /// defense boundary and the battle is lost.
    fn update_enemies(&mut self, now: Duration, dt: Duration, events: &mut Vec<Event>) -> bool {
        let mut index = 0;
        while index < self.enemies.len() {
            let (row, x) = (self.enemies[index].row, self.enemies[index].x);
            // A defender blocks once the enemy is within one cell width.
            let blocked = self.defenders.iter().position(|defender| {
                defender.cell.row() == row
                    && x > defender.position.x()
                    && x - defender.position.x() <= layout::CELL_WIDTH
            });
            match blocked {
                Some(defender_index) => {
                    self.enemies[index].attacking = true;
                    if self.enemies[index].try_strike(now) {
                        let damage = self.enemies[index].archetype.contact_damage();
                        let defender = &mut self.defenders[defender_index];
                        defender.health = defender.health.saturating_damage(damage);
                        if defender.health.is_depleted() {
                            let dead = self.defenders.swap_remove(defender_index);
                            self.grid.vacate(dead.cell);
                            events.push(Event::DefenderKilled {
                                defender: dead.id,
                                cell: dead.cell,
                            });
                        }
                    }
                }
                None => {
                    self.enemies[index].attacking = false;
                    self.enemies[index].advance(now, dt);
                    if self.enemies[index].x < 0.0 {
                        self.terminal = TerminalState::Defeat;
                        return true;
                    }
                }
            }
            index += 1;
        }
        false
    }

    fn update_pickups(&mut self, now: Duration, dt: Duration, events: &mut Vec<Event>) {
        for pickup in &self.pickups {
            if pickup.is_expired(now) {
                events.push(Event::PickupExpired { pickup: pickup.id });
            }
        }
        self.pickups.retain(|pickup| !pickup.is_expired(now));
        for pickup in &mut self.pickups {
            pickup.drift(dt);
        }
    }

    fn check_wave_completion(&mut self, events: &mut Vec<Event>) {
        if self.spawned < self.quota() || !self.enemies.is_empty() {
            return;
        }
        events.push(Event::WaveCleared { wave: self.wave });
        if self.wave as usize >= WAVE_QUOTAS.len() {
            self.terminal = TerminalState::Victory;
            events.push(Event::BattleEnded {
                outcome: TerminalState::Victory,
            });
        } else {
            self.wave += 1;
            self.spawned = 0;
            events.push(Event::WaveStarted { wave: self.wave });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Executes a single command against the world, appending resulting events.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartGame => world.start_game(out_events),
        Command::Reset => world.reset(out_events),
        Command::Tick { now, dt } => world.tick(now, dt, out_events),
        Command::PlaceDefender { archetype, cell } => {
            world.place_defender(archetype, cell, out_events);
        }
        Command::CollectPickup { point } => world.collect_pickup(point, out_events),
        Command::SpawnEnemy { archetype, row } => world.spawn_enemy(archetype, row, out_events),
        Command::DropPickup { x } => world.drop_pickup(x, out_events),
    }
}

/// Read-only views over the world consumed by systems and adapters.
pub mod query {
    use lane_defence_core::{
        Catalog, DefenderSnapshot, EnemySnapshot, FrameSnapshot, PickupSnapshot,
        ProjectileSnapshot, WaveView,
    };

    use super::World;

    /// Builds the complete per-tick rendering snapshot.
    #[must_use]
    pub fn frame_snapshot(world: &World) -> FrameSnapshot {
        let defenders = world
            .defenders
            .iter()
            .map(|defender| DefenderSnapshot {
                id: defender.id,
                archetype: defender.archetype.id(),
                cell: defender.cell,
                position: defender.position,
                health: defender.health,
                health_fraction: defender.health.fraction_of(defender.archetype.max_health()),
                attacking: defender.attacking,
            })
            .collect();
        let enemies = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                archetype: enemy.archetype.id(),
                row: enemy.row,
                x: enemy.x,
                health_fraction: enemy.health.fraction_of(enemy.archetype.max_health()),
                attacking: enemy.attacking,
                slowed: enemy.is_slowed(world.now),
            })
            .collect();
        let projectiles = world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                row: projectile.row,
                position: projectile.position(),
                source: projectile.source,
            })
            .collect();
        let pickups = world
            .pickups
            .iter()
            .map(|pickup| PickupSnapshot {
                id: pickup.id,
                position: pickup.position,
                value: pickup.value,
                near_expiry: pickup.is_near_expiry(world.now),
            })
            .collect();
        FrameSnapshot {
            defenders,
            enemies,
            projectiles,
            pickups,
            energy: world.energy,
            wave: world.wave,
            terminal: world.terminal,
        }
    }

    /// Builds the wave-progress view consumed by the spawn director.
    #[must_use]
    pub fn wave_view(world: &World) -> WaveView {
        WaveView {
            wave: world.wave,
            spawned: world.spawned,
            quota: world.quota(),
            enemies_alive: world.enemies.len() as u32,
            running: world.running,
            terminal: world.terminal,
        }
    }

    /// Retrieves the archetype catalog the world validates against.
    #[must_use]
    pub fn catalog(world: &World) -> Catalog {
        world.catalog
    }
}
