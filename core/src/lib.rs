#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Rendering adapters consume the
//! per-tick [`FrameSnapshot`] and never touch world state directly.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod catalog;

pub use catalog::{
    ArchetypeId, BehaviorKind, Catalog, CrowdControl, DefenderArchetype, DisplayColor,
    EnemyArchetype, Production, UnknownArchetype,
};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Lane Defence.";

/// Energy balance granted when a battle starts.
pub const INITIAL_ENERGY: Energy = Energy::new(50);

/// Enemy quota for each configured wave, indexed by zero-based wave number.
pub const WAVE_QUOTAS: [u32; 3] = [10, 15, 25];

/// Playfield geometry shared by the world, the spawn director and adapters.
pub mod layout {
    use super::{GridCell, WorldPoint};

    /// Number of defensive lanes (grid rows).
    pub const GRID_ROWS: u32 = 5;

    /// Number of grid columns, including the reserved danger column.
    pub const GRID_COLUMNS: u32 = 9;

    /// Rightmost column, reserved as the danger zone and never placeable.
    pub const DANGER_COLUMN: u32 = GRID_COLUMNS - 1;

    /// Width of a single grid cell in world units.
    pub const CELL_WIDTH: f32 = 80.0;

    /// Height of a single grid cell in world units.
    pub const CELL_HEIGHT: f32 = 100.0;

    /// Total playfield width in world units.
    pub const PLAYFIELD_WIDTH: f32 = GRID_COLUMNS as f32 * CELL_WIDTH;

    /// Horizontal position at which newly spawned enemies enter the field.
    pub const ENEMY_SPAWN_X: f32 = PLAYFIELD_WIDTH + 50.0;

    /// Maximum projectile-to-enemy distance that still counts as a hit.
    pub const HIT_THRESHOLD: f32 = 30.0;

    /// Collision radius of a resource pickup.
    pub const PICKUP_RADIUS: f32 = 18.0;

    /// Extra tolerance granted to pickup collection hit-tests.
    pub const PICKUP_TOLERANCE: f32 = 10.0;

    /// Computes the world-space center of a grid cell.
    #[must_use]
    pub fn cell_center(cell: GridCell) -> WorldPoint {
        WorldPoint::new(
            cell.column() as f32 * CELL_WIDTH + CELL_WIDTH / 2.0,
            cell.row() as f32 * CELL_HEIGHT + CELL_HEIGHT / 2.0,
        )
    }

    /// Computes the vertical center of a lane.
    #[must_use]
    pub fn lane_center_y(row: u32) -> f32 {
        row as f32 * CELL_HEIGHT + CELL_HEIGHT / 2.0
    }
}

/// Unique identifier assigned to a placed defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefenderId(u32);

impl DefenderId {
    /// Creates a new defender identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a spawned enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a fired projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a resource pickup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PickupId(u32);

impl PickupId {
    /// Creates a new pickup identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as row and column coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridCell {
    row: u32,
    column: u32,
}

impl GridCell {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row (lane) index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Continuous position expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate in world units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate in world units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }
}

/// Hit points carried by a defender or an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the remaining hit points.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the health remaining after absorbing the provided damage.
    #[must_use]
    pub const fn saturating_damage(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }

    /// Remaining health expressed as a fraction of the provided maximum.
    ///
    /// A zero maximum yields zero so callers never observe NaN.
    #[must_use]
    pub fn fraction_of(&self, max: Health) -> f32 {
        if max.0 == 0 {
            return 0.0;
        }
        self.0 as f32 / max.0 as f32
    }
}

/// Quantity of the spendable resource that buys defenders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Energy(u32);

impl Energy {
    /// Creates a new energy amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds the provided amount, saturating at the numeric maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Energy) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts the provided cost, or reports `None` when unaffordable.
    #[must_use]
    pub const fn checked_sub(self, cost: Energy) -> Option<Self> {
        match self.0.checked_sub(cost.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

/// Terminal condition of the battle, sticky once reached.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerminalState {
    /// The battle has not ended.
    #[default]
    None,
    /// An enemy crossed the defense boundary.
    Defeat,
    /// Every configured wave was cleared.
    Victory,
}

impl TerminalState {
    /// Reports whether the battle has reached a terminal condition.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Reasons a player command may be rejected by the world.
///
/// Every variant is a recoverable, caller-facing outcome; rejected commands
/// leave the world completely untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum CommandError {
    /// The target cell lies outside the grid or inside the danger column.
    #[error("target cell is outside the placeable grid")]
    InvalidCell,
    /// The target cell already holds a defender.
    #[error("target cell is already occupied")]
    CellOccupied,
    /// The energy balance cannot cover the archetype's cost.
    #[error("energy balance cannot cover the placement cost")]
    InsufficientResources,
    /// No pickup's hit-test matched the provided point.
    #[error("no pickup at the requested point")]
    NoPickupAtPoint,
    /// The referenced archetype is not registered in the catalog.
    #[error("unknown archetype")]
    UnknownArchetype,
    /// The command arrived before the battle started or after it ended.
    #[error("command issued outside an active battle")]
    InvalidState,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Resets all state and begins a fresh battle at wave one.
    StartGame,
    /// Reinitializes all state without starting a battle.
    Reset,
    /// Advances the simulation clock.
    Tick {
        /// Monotonic timestamp supplied by the external driver.
        now: Duration,
        /// Simulated time elapsed since the previous tick; zero is tolerated.
        dt: Duration,
    },
    /// Requests placement of a defender at the provided grid cell.
    PlaceDefender {
        /// Catalog archetype of the defender to place.
        archetype: ArchetypeId,
        /// Target grid cell.
        cell: GridCell,
    },
    /// Requests collection of the pickup covering the provided point.
    CollectPickup {
        /// World-space point supplied by the player.
        point: WorldPoint,
    },
    /// Requests that an enemy enter the field at the right edge of a lane.
    SpawnEnemy {
        /// Catalog archetype of the enemy to spawn.
        archetype: ArchetypeId,
        /// Lane the enemy advances along.
        row: u32,
    },
    /// Requests that a sky pickup drop at the provided horizontal position.
    DropPickup {
        /// Horizontal drop position in world units.
        x: f32,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a fresh battle began.
    GameStarted,
    /// Confirms that all state returned to its initial configuration.
    GameReset,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that a defender was placed and its cost deducted.
    DefenderPlaced {
        /// Identifier assigned to the defender by the world.
        defender: DefenderId,
        /// Archetype of the placed defender.
        archetype: ArchetypeId,
        /// Cell the defender occupies.
        cell: GridCell,
    },
    /// Reports that a placement request was rejected with no state change.
    PlacementRejected {
        /// Archetype provided in the placement request.
        archetype: ArchetypeId,
        /// Cell provided in the placement request.
        cell: GridCell,
        /// Specific reason the placement failed.
        reason: CommandError,
    },
    /// Confirms that a pickup was collected and its value credited.
    PickupCollected {
        /// Identifier of the collected pickup.
        pickup: PickupId,
        /// Energy credited to the balance.
        value: Energy,
    },
    /// Reports that a collection request matched no pickup.
    CollectRejected {
        /// Point provided in the collection request.
        point: WorldPoint,
        /// Specific reason the collection failed.
        reason: CommandError,
    },
    /// Confirms that an enemy entered the field.
    EnemySpawned {
        /// Identifier assigned to the enemy by the world.
        enemy: EnemyId,
        /// Archetype of the spawned enemy.
        archetype: ArchetypeId,
        /// Lane the enemy advances along.
        row: u32,
    },
    /// Confirms that a resource pickup appeared on the field.
    PickupDropped {
        /// Identifier assigned to the pickup by the world.
        pickup: PickupId,
        /// Position at which the pickup appeared.
        position: WorldPoint,
        /// Energy the pickup is worth.
        value: Energy,
    },
    /// Confirms that an attacking defender fired a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile by the world.
        projectile: ProjectileId,
        /// Archetype of the firing defender.
        source: ArchetypeId,
        /// Lane the projectile travels along.
        row: u32,
    },
    /// Reports that an enemy's health reached zero and it was removed.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
    },
    /// Reports that a defender's health reached zero and it was removed.
    DefenderKilled {
        /// Identifier of the destroyed defender.
        defender: DefenderId,
        /// Cell the defender vacated.
        cell: GridCell,
    },
    /// Reports that a pickup expired uncollected and was removed.
    PickupExpired {
        /// Identifier of the expired pickup.
        pickup: PickupId,
    },
    /// Reports that a wave's quota was spawned and its enemies destroyed.
    WaveCleared {
        /// One-based number of the cleared wave.
        wave: u32,
    },
    /// Announces that a new wave became active.
    WaveStarted {
        /// One-based number of the wave that began.
        wave: u32,
    },
    /// Announces that the battle reached a terminal state.
    BattleEnded {
        /// Outcome that ended the battle.
        outcome: TerminalState,
    },
}

/// Immutable representation of a placed defender used for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderSnapshot {
    /// Identifier assigned to the defender.
    pub id: DefenderId,
    /// Catalog archetype of the defender.
    pub archetype: ArchetypeId,
    /// Grid cell the defender occupies.
    pub cell: GridCell,
    /// World-space center of the defender.
    pub position: WorldPoint,
    /// Remaining hit points.
    pub health: Health,
    /// Remaining health as a fraction of the archetype maximum.
    pub health_fraction: f32,
    /// Indicates whether the defender fired during the captured tick.
    pub attacking: bool,
}

/// Immutable representation of a live enemy used for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier assigned to the enemy.
    pub id: EnemyId,
    /// Catalog archetype of the enemy.
    pub archetype: ArchetypeId,
    /// Lane the enemy advances along.
    pub row: u32,
    /// Continuous horizontal position in world units.
    pub x: f32,
    /// Remaining health as a fraction of the archetype maximum.
    pub health_fraction: f32,
    /// Indicates whether the enemy is attacking a blocking defender.
    pub attacking: bool,
    /// Indicates whether a crowd-control slow is in effect.
    pub slowed: bool,
}

/// Immutable representation of a projectile in flight used for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Lane the projectile travels along.
    pub row: u32,
    /// World-space position of the projectile.
    pub position: WorldPoint,
    /// Archetype of the defender that fired the projectile.
    pub source: ArchetypeId,
}

/// Immutable representation of an uncollected pickup used for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickupSnapshot {
    /// Identifier assigned to the pickup.
    pub id: PickupId,
    /// World-space position of the pickup.
    pub position: WorldPoint,
    /// Energy the pickup is worth.
    pub value: Energy,
    /// Indicates that the pickup is close to expiring uncollected.
    pub near_expiry: bool,
}

/// Complete read-only view of the simulation produced once per tick.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    /// Defenders currently placed on the grid.
    pub defenders: Vec<DefenderSnapshot>,
    /// Enemies currently advancing on the field.
    pub enemies: Vec<EnemySnapshot>,
    /// Projectiles currently in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Pickups currently awaiting collection.
    pub pickups: Vec<PickupSnapshot>,
    /// Current spendable energy balance.
    pub energy: Energy,
    /// One-based number of the active wave.
    pub wave: u32,
    /// Terminal condition of the battle, if any.
    pub terminal: TerminalState,
}

/// Read-only view of wave progress consumed by the spawn director.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveView {
    /// One-based number of the active wave.
    pub wave: u32,
    /// Enemies spawned so far during the active wave.
    pub spawned: u32,
    /// Spawn quota of the active wave.
    pub quota: u32,
    /// Number of enemies currently alive on the field.
    pub enemies_alive: u32,
    /// Indicates whether a battle is in progress.
    pub running: bool,
    /// Terminal condition of the battle, if any.
    pub terminal: TerminalState,
}
