//! Projectile-versus-enemy hit resolution.

use std::time::Duration;

use lane_defence_core::{layout, Event};

use crate::entities::{Enemy, Projectile};

/// Resolves projectile hits for one tick.
///
/// Each projectile strikes at most one enemy: the first one in existence
/// order sharing its lane within the hit threshold. Spent projectiles and
/// destroyed enemies are removed, with an [`Event::EnemyKilled`] emitted
/// per destroyed enemy.
pub(crate) fn resolve(
    now: Duration,
    projectiles: &mut Vec<Projectile>,
    enemies: &mut Vec<Enemy>,
    events: &mut Vec<Event>,
) {
    for projectile in projectiles.iter_mut() {
        if projectile.spent {
            continue;
        }
        let Some(index) = enemies.iter().position(|enemy| {
            enemy.row == projectile.row
                && !enemy.health.is_depleted()
                && (enemy.x - projectile.x).abs() <= layout::HIT_THRESHOLD
        }) else {
            continue;
        };
        let enemy = &mut enemies[index];
        enemy.health = enemy.health.saturating_damage(projectile.damage);
        if let Some(control) = projectile.control {
            enemy.apply_slow(now, control);
        }
        projectile.spent = true;
    }

    projectiles.retain(|projectile| !projectile.spent);

    for enemy in enemies.iter() {
        if enemy.health.is_depleted() {
            events.push(Event::EnemyKilled { enemy: enemy.id });
        }
    }
    enemies.retain(|enemy| !enemy.health.is_depleted());
}
