//! Live entity records owned by the world.
//!
//! These types are internal: adapters only ever observe them through the
//! snapshot structs produced by the query module.

use std::time::Duration;

use lane_defence_core::{
    layout, ArchetypeId, BehaviorKind, CrowdControl, DefenderArchetype, DefenderId, Energy,
    EnemyArchetype, EnemyId, GridCell, Health, PickupId, ProjectileId, WorldPoint,
};

/// Simulated time a pickup survives before expiring uncollected.
const PICKUP_LIFETIME: Duration = Duration::from_millis(8000);

/// Fraction of the pickup lifetime after which it reports near expiry.
const NEAR_EXPIRY_FRACTION: f64 = 0.7;

/// Downward drift speed of a falling pickup in world units per second.
const PICKUP_DRIFT_SPEED: f32 = 60.0;

/// Action a defender requests from the world during its update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum DefenderAction {
    /// Emit an energy pickup worth the carried amount.
    Produce(Energy),
    /// Fire a projectile down the defender's lane.
    Fire,
}

/// A placed defender.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Defender {
    pub(crate) id: DefenderId,
    pub(crate) archetype: &'static DefenderArchetype,
    pub(crate) cell: GridCell,
    pub(crate) position: WorldPoint,
    pub(crate) health: Health,
    pub(crate) attacking: bool,
    last_attack: Option<Duration>,
    last_production: Duration,
}

impl Defender {
    pub(crate) fn new(
        id: DefenderId,
        archetype: &'static DefenderArchetype,
        cell: GridCell,
        placed_at: Duration,
    ) -> Self {
        Self {
            id,
            archetype,
            cell,
            position: layout::cell_center(cell),
            health: archetype.max_health(),
            attacking: false,
            last_attack: None,
            last_production: placed_at,
        }
    }

    /// Advances the defender's timers and reports the action it takes.
    ///
    /// `enemy_ahead` tells an attacker whether any living enemy is further
    /// down its lane; producers and blockers ignore it.
    pub(crate) fn update(&mut self, now: Duration, enemy_ahead: bool) -> Option<DefenderAction> {
        match self.archetype.behavior() {
            BehaviorKind::Producer => {
                let production = self.archetype.production()?;
                if now.saturating_sub(self.last_production) >= production.interval() {
                    self.last_production = now;
                    return Some(DefenderAction::Produce(production.amount()));
                }
                None
            }
            BehaviorKind::Attacker => {
                self.attacking = enemy_ahead;
                if !enemy_ahead {
                    return None;
                }
                let ready = match self.last_attack {
                    None => true,
                    Some(last) => now.saturating_sub(last) >= self.archetype.attack_interval(),
                };
                if ready {
                    self.last_attack = Some(now);
                    return Some(DefenderAction::Fire);
                }
                None
            }
            BehaviorKind::Blocker => None,
        }
    }
}

/// Crowd-control slow currently applied to an enemy.
#[derive(Clone, Copy, Debug)]
struct SlowEffect {
    factor: f32,
    until: Duration,
}

/// A live enemy advancing along its lane.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) archetype: &'static EnemyArchetype,
    pub(crate) row: u32,
    pub(crate) x: f32,
    pub(crate) health: Health,
    pub(crate) attacking: bool,
    last_attack: Option<Duration>,
    slow: Option<SlowEffect>,
}

impl Enemy {
    pub(crate) fn new(id: EnemyId, archetype: &'static EnemyArchetype, row: u32) -> Self {
        Self {
            id,
            archetype,
            row,
            x: layout::ENEMY_SPAWN_X,
            health: archetype.max_health(),
            attacking: false,
            last_attack: None,
            slow: None,
        }
    }

    /// Replaces any active slow with the provided payload.
    pub(crate) fn apply_slow(&mut self, now: Duration, control: CrowdControl) {
        self.slow = Some(SlowEffect {
            factor: control.slow_factor(),
            until: now + control.duration(),
        });
    }

    /// Reports whether a crowd-control slow is currently in effect.
    pub(crate) fn is_slowed(&self, now: Duration) -> bool {
        matches!(self.slow, Some(effect) if now < effect.until)
    }

    /// Moves the enemy toward the defense boundary.
    pub(crate) fn advance(&mut self, now: Duration, dt: Duration) {
        let mut speed = self.archetype.speed();
        if let Some(effect) = self.slow {
            if now < effect.until {
                speed *= 1.0 - effect.factor;
            } else {
                self.slow = None;
            }
        }
        self.x -= speed * dt.as_secs_f32();
    }

    /// Attempts a melee strike, honoring the archetype's attack interval.
    pub(crate) fn try_strike(&mut self, now: Duration) -> bool {
        let ready = match self.last_attack {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.archetype.attack_interval(),
        };
        if ready {
            self.last_attack = Some(now);
        }
        ready
    }
}

/// A projectile in flight along a lane.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) row: u32,
    pub(crate) x: f32,
    pub(crate) source: ArchetypeId,
    pub(crate) damage: u32,
    pub(crate) control: Option<CrowdControl>,
    pub(crate) spent: bool,
    speed: f32,
}

impl Projectile {
    pub(crate) fn new(
        id: ProjectileId,
        row: u32,
        x: f32,
        archetype: &'static DefenderArchetype,
    ) -> Self {
        Self {
            id,
            row,
            x,
            source: archetype.id(),
            damage: archetype.damage(),
            control: archetype.control(),
            spent: false,
            speed: archetype.projectile_speed(),
        }
    }

    /// Moves the projectile toward the right edge of the field.
    pub(crate) fn advance(&mut self, dt: Duration) {
        self.x += self.speed * dt.as_secs_f32();
    }

    /// Reports whether the projectile left the playfield without a hit.
    pub(crate) fn is_off_field(&self) -> bool {
        self.x > layout::PLAYFIELD_WIDTH
    }

    /// World-space position of the projectile.
    pub(crate) fn position(&self) -> WorldPoint {
        WorldPoint::new(self.x, layout::lane_center_y(self.row))
    }
}

/// An uncollected energy pickup, possibly still falling toward its rest
/// position.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Pickup {
    pub(crate) id: PickupId,
    pub(crate) position: WorldPoint,
    pub(crate) value: Energy,
    target_y: f32,
    spawned_at: Duration,
}

impl Pickup {
    pub(crate) fn new(
        id: PickupId,
        position: WorldPoint,
        target_y: f32,
        value: Energy,
        spawned_at: Duration,
    ) -> Self {
        Self {
            id,
            position,
            value,
            target_y,
            spawned_at,
        }
    }

    /// Drifts the pickup downward until it reaches its rest position.
    pub(crate) fn drift(&mut self, dt: Duration) {
        if self.position.y() < self.target_y {
            let y = (self.position.y() + PICKUP_DRIFT_SPEED * dt.as_secs_f32()).min(self.target_y);
            self.position = WorldPoint::new(self.position.x(), y);
        }
    }

    /// Reports whether the pickup's lifetime has elapsed.
    pub(crate) fn is_expired(&self, now: Duration) -> bool {
        now.saturating_sub(self.spawned_at) >= PICKUP_LIFETIME
    }

    /// Reports whether the pickup is close to expiring uncollected.
    pub(crate) fn is_near_expiry(&self, now: Duration) -> bool {
        now.saturating_sub(self.spawned_at) >= PICKUP_LIFETIME.mul_f64(NEAR_EXPIRY_FRACTION)
    }

    /// Hit-tests the pickup against a player-supplied point.
    pub(crate) fn contains(&self, point: WorldPoint) -> bool {
        let dx = point.x() - self.position.x();
        let dy = point.y() - self.position.y();
        let reach = layout::PICKUP_RADIUS + layout::PICKUP_TOLERANCE;
        dx * dx + dy * dy <= reach * reach
    }
}
