#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn director emitting enemy and sky-pickup commands.
//!
//! The director is a pure system: it consumes the events and the wave view
//! produced by the world and emits [`Command::SpawnEnemy`] and
//! [`Command::DropPickup`] requests. All randomness flows from a single
//! configured seed through labeled streams, so replaying the same event
//! stream with the same seed reproduces the same battle.

use std::time::Duration;

use lane_defence_core::{layout, ArchetypeId, Catalog, Command, Event, WaveView};
use sha2::{Digest, Sha256};

const RNG_STREAM_LANE: &str = "lane";
const RNG_STREAM_ARCHETYPE: &str = "archetype";
const RNG_STREAM_DROP: &str = "drop";

/// Enemy spawn interval at wave one, in milliseconds.
const BASE_SPAWN_INTERVAL_MS: u64 = 8000;

/// Interval reduction applied per wave beyond the first, in milliseconds.
const SPAWN_INTERVAL_STEP_MS: u64 = 1500;

/// Floor below which the spawn interval never drops, in milliseconds.
const MIN_SPAWN_INTERVAL_MS: u64 = 3000;

/// Interval between sky pickup drops.
const DROP_INTERVAL: Duration = Duration::from_millis(10_000);

/// Horizontal margin kept between a sky drop and the field edges.
const DROP_MARGIN: u32 = 50;

/// Configuration parameters required to construct the spawn director.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that paces enemy spawns and sky pickup drops.
#[derive(Debug)]
pub struct Spawning {
    seed: u64,
    catalog: Catalog,
    enemy_accumulator: Duration,
    drop_accumulator: Duration,
    lane_rng: SplitMix64,
    archetype_rng: SplitMix64,
    drop_rng: SplitMix64,
}

impl Spawning {
    /// Creates a new director using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut spawning = Self {
            seed: config.rng_seed,
            catalog: Catalog::builtin(),
            enemy_accumulator: Duration::ZERO,
            drop_accumulator: Duration::ZERO,
            lane_rng: SplitMix64::new(0),
            archetype_rng: SplitMix64::new(0),
            drop_rng: SplitMix64::new(0),
        };
        spawning.reseed();
        spawning
    }

    /// Consumes world events and the wave view to emit pacing commands.
    pub fn handle(&mut self, events: &[Event], view: WaveView, out: &mut Vec<Command>) {
        if events
            .iter()
            .any(|event| matches!(event, Event::GameStarted | Event::GameReset))
        {
            self.reseed();
        }

        if !view.running || view.terminal.is_terminal() {
            self.enemy_accumulator = Duration::ZERO;
            self.drop_accumulator = Duration::ZERO;
            return;
        }

        let mut accumulated = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                accumulated = accumulated.saturating_add(*dt);
            }
        }
        if accumulated.is_zero() {
            return;
        }

        self.enemy_accumulator = self.enemy_accumulator.saturating_add(accumulated);
        self.drop_accumulator = self.drop_accumulator.saturating_add(accumulated);

        self.emit_enemy_spawns(view, out);
        self.emit_pickup_drops(out);
    }

    fn reseed(&mut self) {
        self.enemy_accumulator = Duration::ZERO;
        self.drop_accumulator = Duration::ZERO;
        self.lane_rng = SplitMix64::new(derive_labeled_seed(self.seed, RNG_STREAM_LANE));
        self.archetype_rng = SplitMix64::new(derive_labeled_seed(self.seed, RNG_STREAM_ARCHETYPE));
        self.drop_rng = SplitMix64::new(derive_labeled_seed(self.seed, RNG_STREAM_DROP));
    }

    fn emit_enemy_spawns(&mut self, view: WaveView, out: &mut Vec<Command>) {
        let interval = spawn_interval(view.wave);
        let mut spawned = view.spawned;
        while self.enemy_accumulator >= interval && spawned < view.quota {
            self.enemy_accumulator -= interval;
            let archetype = self.select_archetype(view.wave);
            let row = (self.lane_rng.next_u64() % u64::from(layout::GRID_ROWS)) as u32;
            out.push(Command::SpawnEnemy { archetype, row });
            spawned += 1;
        }
        // While the quota is met the timer idles at one owed interval, so
        // the next wave's first enemy spawns the moment the wave opens.
        if self.enemy_accumulator > interval {
            self.enemy_accumulator = interval;
        }
    }

    fn emit_pickup_drops(&mut self, out: &mut Vec<Command>) {
        while self.drop_accumulator >= DROP_INTERVAL {
            self.drop_accumulator -= DROP_INTERVAL;
            let max = layout::PLAYFIELD_WIDTH as u32 - DROP_MARGIN;
            let x = sample_uniform_inclusive(&mut self.drop_rng, DROP_MARGIN, max);
            out.push(Command::DropPickup { x: x as f32 });
        }
    }

    fn select_archetype(&mut self, wave: u32) -> ArchetypeId {
        let unlocked = self.catalog.enemies_unlocked_at(wave);
        debug_assert!(!unlocked.is_empty(), "wave {wave} unlocks no enemies");
        let index = (self.archetype_rng.next_u64() % unlocked.len() as u64) as usize;
        unlocked[index].id()
    }
}

/// Enemy spawn interval for the given wave, shrinking as waves advance.
#[must_use]
pub fn spawn_interval(wave: u32) -> Duration {
    let reduction = u64::from(wave.saturating_sub(1)).saturating_mul(SPAWN_INTERVAL_STEP_MS);
    let interval = BASE_SPAWN_INTERVAL_MS
        .saturating_sub(reduction)
        .max(MIN_SPAWN_INTERVAL_MS);
    Duration::from_millis(interval)
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

fn sample_uniform_inclusive(rng: &mut SplitMix64, min: u32, max: u32) -> u32 {
    if min == max {
        return min;
    }
    let range = u64::from(max.saturating_sub(min)) + 1;
    let offset = rng.next_u64() % range;
    min.saturating_add(offset as u32)
}

#[derive(Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e3779b97f4a7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e3779b97f4a7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
        z ^ (z >> 31)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_interval_shrinks_to_its_floor() {
        assert_eq!(spawn_interval(1), Duration::from_millis(8000));
        assert_eq!(spawn_interval(2), Duration::from_millis(6500));
        assert_eq!(spawn_interval(3), Duration::from_millis(5000));
        assert_eq!(spawn_interval(10), Duration::from_millis(3000));
    }

    #[test]
    fn labeled_streams_diverge() {
        let lane = derive_labeled_seed(42, RNG_STREAM_LANE);
        let drop = derive_labeled_seed(42, RNG_STREAM_DROP);
        assert_ne!(lane, drop);
    }
}
