//! Immutable entity catalog listing defender and enemy archetypes.
//!
//! The catalog is the single source of costs and combat attributes: the
//! world consults it when applying commands and adapters consult the same
//! tables when rendering selection cards, so affordability checks can never
//! drift apart.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::{Energy, Health};

/// Identifier of a catalog archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArchetypeId(&'static str);

impl ArchetypeId {
    /// Creates an archetype identifier from its canonical name.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Retrieves the canonical name of the archetype.
    #[must_use]
    pub const fn get(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ArchetypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Rapid-fire attacker with a cheap bolt.
pub const ARC: ArchetypeId = ArchetypeId::new("arc");
/// Energy-producing defender.
pub const SPROUT: ArchetypeId = ArchetypeId::new("sprout");
/// Heavy-hitting attacker with a slow cadence.
pub const EMBER: ArchetypeId = ArchetypeId::new("ember");
/// Attacker whose projectiles slow the struck enemy.
pub const TORRENT: ArchetypeId = ArchetypeId::new("torrent");
/// High-health blocker that never attacks.
pub const BULWARK: ArchetypeId = ArchetypeId::new("bulwark");
/// Very fast attacker trading damage per shot for cadence.
pub const GATLING: ArchetypeId = ArchetypeId::new("gatling");

/// Baseline enemy available from the first wave.
pub const SHAMBLER: ArchetypeId = ArchetypeId::new("shambler");
/// Armored enemy unlocked at wave two.
pub const HELMED: ArchetypeId = ArchetypeId::new("helmed");
/// Fast, fragile enemy unlocked at wave two.
pub const SPRINTER: ArchetypeId = ArchetypeId::new("sprinter");
/// Heavily armored enemy unlocked at wave three.
pub const JUGGERNAUT: ArchetypeId = ArchetypeId::new("juggernaut");

/// Behavior class branched on by the defender update.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BehaviorKind {
    /// Fires projectiles down its lane when an enemy is ahead.
    Attacker,
    /// Periodically emits energy pickups.
    Producer,
    /// Absorbs damage; takes no update-time action.
    Blocker,
}

/// Display color carried by archetypes for rendering adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisplayColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl DisplayColor {
    /// Creates a display color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Crowd-control payload applied by a projectile on hit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrowdControl {
    slow_factor: f32,
    duration: Duration,
}

impl CrowdControl {
    /// Creates a crowd-control payload.
    ///
    /// The slow factor must lie within `0.0..=1.0`.
    #[must_use]
    pub const fn new(slow_factor: f32, duration: Duration) -> Self {
        Self {
            slow_factor,
            duration,
        }
    }

    /// Fraction of base speed removed while the slow is in effect.
    #[must_use]
    pub const fn slow_factor(&self) -> f32 {
        self.slow_factor
    }

    /// Duration the slow remains in effect after application.
    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }
}

/// Energy production parameters of a producer defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Production {
    amount: Energy,
    interval: Duration,
}

impl Production {
    /// Creates a production descriptor.
    #[must_use]
    pub const fn new(amount: Energy, interval: Duration) -> Self {
        Self { amount, interval }
    }

    /// Energy emitted per production cycle.
    #[must_use]
    pub const fn amount(&self) -> Energy {
        self.amount
    }

    /// Simulated time between production cycles.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

/// Immutable template describing one defender type.
///
/// Invariant: all numeric fields are non-negative by construction; attackers
/// carry a positive attack interval and projectile speed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DefenderArchetype {
    id: ArchetypeId,
    name: &'static str,
    glyph: char,
    color: DisplayColor,
    cost: Energy,
    max_health: Health,
    damage: u32,
    attack_interval: Duration,
    projectile_speed: f32,
    control: Option<CrowdControl>,
    production: Option<Production>,
    behavior: BehaviorKind,
}

impl DefenderArchetype {
    /// Identifier of the archetype.
    #[must_use]
    pub const fn id(&self) -> ArchetypeId {
        self.id
    }

    /// Human-readable display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Single-character glyph used by text adapters.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.glyph
    }

    /// Display color used by rendering adapters.
    #[must_use]
    pub const fn color(&self) -> DisplayColor {
        self.color
    }

    /// Energy cost deducted on placement.
    #[must_use]
    pub const fn cost(&self) -> Energy {
        self.cost
    }

    /// Hit points granted at placement.
    #[must_use]
    pub const fn max_health(&self) -> Health {
        self.max_health
    }

    /// Damage carried by each fired projectile.
    #[must_use]
    pub const fn damage(&self) -> u32 {
        self.damage
    }

    /// Minimum simulated time between successive shots.
    #[must_use]
    pub const fn attack_interval(&self) -> Duration {
        self.attack_interval
    }

    /// Projectile travel speed in world units per second.
    #[must_use]
    pub const fn projectile_speed(&self) -> f32 {
        self.projectile_speed
    }

    /// Crowd-control payload attached to fired projectiles, if any.
    #[must_use]
    pub const fn control(&self) -> Option<CrowdControl> {
        self.control
    }

    /// Energy production parameters, present for producers only.
    #[must_use]
    pub const fn production(&self) -> Option<Production> {
        self.production
    }

    /// Behavior class branched on by the defender update.
    #[must_use]
    pub const fn behavior(&self) -> BehaviorKind {
        self.behavior
    }
}

/// Immutable template describing one enemy type.
///
/// Invariant: all numeric fields are non-negative by construction; speed is
/// expressed in world units per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyArchetype {
    id: ArchetypeId,
    name: &'static str,
    glyph: char,
    color: DisplayColor,
    max_health: Health,
    contact_damage: u32,
    attack_interval: Duration,
    speed: f32,
    unlock_wave: u32,
}

impl EnemyArchetype {
    /// Identifier of the archetype.
    #[must_use]
    pub const fn id(&self) -> ArchetypeId {
        self.id
    }

    /// Human-readable display name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Single-character glyph used by text adapters.
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.glyph
    }

    /// Display color used by rendering adapters.
    #[must_use]
    pub const fn color(&self) -> DisplayColor {
        self.color
    }

    /// Hit points granted at spawn.
    #[must_use]
    pub const fn max_health(&self) -> Health {
        self.max_health
    }

    /// Damage dealt per melee strike against a blocking defender.
    #[must_use]
    pub const fn contact_damage(&self) -> u32 {
        self.contact_damage
    }

    /// Minimum simulated time between successive melee strikes.
    #[must_use]
    pub const fn attack_interval(&self) -> Duration {
        self.attack_interval
    }

    /// Base movement speed in world units per second.
    #[must_use]
    pub const fn speed(&self) -> f32 {
        self.speed
    }

    /// First wave at which the spawn director may select this archetype.
    #[must_use]
    pub const fn unlock_wave(&self) -> u32 {
        self.unlock_wave
    }
}

/// Lookup failure raised when an archetype id is not registered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("unknown archetype `{0}`")]
pub struct UnknownArchetype(pub ArchetypeId);

const DEFENDERS: [DefenderArchetype; 6] = [
    DefenderArchetype {
        id: ARC,
        name: "Arc",
        glyph: 'A',
        color: DisplayColor::from_rgb(0xff, 0xe1, 0x35),
        cost: Energy::new(100),
        max_health: Health::new(100),
        damage: 20,
        attack_interval: Duration::from_millis(1500),
        projectile_speed: 300.0,
        control: None,
        production: None,
        behavior: BehaviorKind::Attacker,
    },
    DefenderArchetype {
        id: SPROUT,
        name: "Sprout",
        glyph: 'S',
        color: DisplayColor::from_rgb(0x78, 0xc8, 0x50),
        cost: Energy::new(50),
        max_health: Health::new(80),
        damage: 0,
        attack_interval: Duration::ZERO,
        projectile_speed: 0.0,
        control: None,
        production: Some(Production::new(
            Energy::new(25),
            Duration::from_millis(5000),
        )),
        behavior: BehaviorKind::Producer,
    },
    DefenderArchetype {
        id: EMBER,
        name: "Ember",
        glyph: 'E',
        color: DisplayColor::from_rgb(0xf0, 0x80, 0x30),
        cost: Energy::new(175),
        max_health: Health::new(100),
        damage: 40,
        attack_interval: Duration::from_millis(2000),
        projectile_speed: 240.0,
        control: None,
        production: None,
        behavior: BehaviorKind::Attacker,
    },
    DefenderArchetype {
        id: TORRENT,
        name: "Torrent",
        glyph: 'T',
        color: DisplayColor::from_rgb(0x68, 0x90, 0xf0),
        cost: Energy::new(125),
        max_health: Health::new(100),
        damage: 15,
        attack_interval: Duration::from_millis(1200),
        projectile_speed: 360.0,
        control: Some(CrowdControl::new(0.5, Duration::from_millis(2000))),
        production: None,
        behavior: BehaviorKind::Attacker,
    },
    DefenderArchetype {
        id: BULWARK,
        name: "Bulwark",
        glyph: 'B',
        color: DisplayColor::from_rgb(0xa8, 0xa8, 0x78),
        cost: Energy::new(50),
        max_health: Health::new(400),
        damage: 0,
        attack_interval: Duration::ZERO,
        projectile_speed: 0.0,
        control: None,
        production: None,
        behavior: BehaviorKind::Blocker,
    },
    DefenderArchetype {
        id: GATLING,
        name: "Gatling",
        glyph: 'G',
        color: DisplayColor::from_rgb(0x50, 0x50, 0x50),
        cost: Energy::new(200),
        max_health: Health::new(80),
        damage: 8,
        attack_interval: Duration::from_millis(200),
        projectile_speed: 600.0,
        control: None,
        production: None,
        behavior: BehaviorKind::Attacker,
    },
];

const ENEMIES: [EnemyArchetype; 4] = [
    EnemyArchetype {
        id: SHAMBLER,
        name: "Shambler",
        glyph: 'z',
        color: DisplayColor::from_rgb(0x55, 0x6b, 0x2f),
        max_health: Health::new(100),
        contact_damage: 20,
        attack_interval: Duration::from_millis(1000),
        speed: 18.0,
        unlock_wave: 1,
    },
    EnemyArchetype {
        id: HELMED,
        name: "Helmed",
        glyph: 'c',
        color: DisplayColor::from_rgb(0x8b, 0x45, 0x13),
        max_health: Health::new(200),
        contact_damage: 20,
        attack_interval: Duration::from_millis(1000),
        speed: 18.0,
        unlock_wave: 2,
    },
    EnemyArchetype {
        id: SPRINTER,
        name: "Sprinter",
        glyph: 'f',
        color: DisplayColor::from_rgb(0x8b, 0x00, 0x00),
        max_health: Health::new(80),
        contact_damage: 15,
        attack_interval: Duration::from_millis(800),
        speed: 36.0,
        unlock_wave: 2,
    },
    EnemyArchetype {
        id: JUGGERNAUT,
        name: "Juggernaut",
        glyph: 'k',
        color: DisplayColor::from_rgb(0x69, 0x69, 0x69),
        max_health: Health::new(400),
        contact_damage: 25,
        attack_interval: Duration::from_millis(1000),
        speed: 15.0,
        unlock_wave: 3,
    },
];

/// Pure lookup over the registered archetype tables.
#[derive(Clone, Copy, Debug)]
pub struct Catalog {
    defenders: &'static [DefenderArchetype],
    enemies: &'static [EnemyArchetype],
}

impl Catalog {
    /// Retrieves the catalog of built-in archetypes.
    #[must_use]
    pub const fn builtin() -> Self {
        Self {
            defenders: &DEFENDERS,
            enemies: &ENEMIES,
        }
    }

    /// All registered defender archetypes in canonical order.
    #[must_use]
    pub const fn defenders(&self) -> &'static [DefenderArchetype] {
        self.defenders
    }

    /// All registered enemy archetypes in canonical order.
    #[must_use]
    pub const fn enemies(&self) -> &'static [EnemyArchetype] {
        self.enemies
    }

    /// Looks up a defender archetype by identifier.
    pub fn defender(&self, id: ArchetypeId) -> Result<&'static DefenderArchetype, UnknownArchetype> {
        self.defenders
            .iter()
            .find(|archetype| archetype.id() == id)
            .ok_or(UnknownArchetype(id))
    }

    /// Looks up an enemy archetype by identifier.
    pub fn enemy(&self, id: ArchetypeId) -> Result<&'static EnemyArchetype, UnknownArchetype> {
        self.enemies
            .iter()
            .find(|archetype| archetype.id() == id)
            .ok_or(UnknownArchetype(id))
    }

    /// Enemy archetypes whose unlock wave has been reached.
    #[must_use]
    pub fn enemies_unlocked_at(&self, wave: u32) -> Vec<&'static EnemyArchetype> {
        self.enemies
            .iter()
            .filter(|archetype| archetype.unlock_wave() <= wave)
            .collect()
    }
}
