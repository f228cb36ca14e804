#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic difficulty director that derives per-species wave parameters.
//!
//! [`compute_spawn_specs`] is a pure function of the stage and the difficulty.
//! Tiers one and two share the [`base_progression`] ramp at different stage
//! offsets, later tiers use fixed bases, and every result is scaled by the
//! [`DifficultyFactors`] before being clamped into the legal range.
//! [`SpawnClock`] owns the per-species frame counters that turn a
//! [`SpawnTable`] into [`Event::SpawnWave`] events while a stage is running.

use std::{collections::BTreeMap, ops::RangeInclusive};

use ledgejump_core::{
    Difficulty, Event, SpawnSpec, SpawnTable, Species, Stage, Tier, MIN_SPAWN_INTERVAL_FRAMES,
};
use tracing::debug;

/// Stage offset that maps tier two onto the tier one ramp.
const TIER_TWO_LEVEL_OFFSET: u32 = 10;
const METEOR_STAGES: RangeInclusive<u32> = 16..=19;
const FIREBALL_FIRST_STAGE: u32 = 36;

const RAMP_INTERVAL_START: f64 = 300.0;
const RAMP_INTERVAL_STEP: f64 = 10.0;
const RAMP_INTERVAL_PLATEAU: f64 = 180.0;

const WRAITH_BASE: BaseSpawn = BaseSpawn::new(2.0, 150.0);
const GOLEM_BASE: BaseSpawn = BaseSpawn::new(2.5, 120.0);
const DRAGON_BASE: BaseSpawn = BaseSpawn::new(3.0, 90.0);
const METEOR_BASE: BaseSpawn = BaseSpawn::new(1.5, 240.0);
const FIREBALL_BASE: BaseSpawn = BaseSpawn::new(1.0, 300.0);

/// Multipliers applied to base wave parameters for a difficulty.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyFactors {
    /// Scales the number of instances per wave.
    pub quantity: f64,
    /// Scales the number of frames between waves.
    pub interval: f64,
}

impl DifficultyFactors {
    /// Factors associated with the provided difficulty.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                quantity: 0.7,
                interval: 1.5,
            },
            Difficulty::Normal => Self {
                quantity: 1.0,
                interval: 1.0,
            },
            Difficulty::Hard => Self {
                quantity: 1.4,
                interval: 0.7,
            },
        }
    }
}

/// Unscaled wave parameters before difficulty factors and clamping apply.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BaseSpawn {
    /// Instances per wave.
    pub quantity: f64,
    /// Frames between waves.
    pub interval_frames: f64,
}

impl BaseSpawn {
    /// Creates a new base descriptor.
    #[must_use]
    pub const fn new(quantity: f64, interval_frames: f64) -> Self {
        Self {
            quantity,
            interval_frames,
        }
    }
}

/// Early-campaign ramp shared by the first two tiers.
///
/// Quantity steps up every five levels. The interval shrinks by ten frames per
/// level until it reaches a plateau of 180 frames.
#[must_use]
pub fn base_progression(level: u32) -> BaseSpawn {
    let quantity = match level {
        0..=5 => 1.0,
        6..=10 => 1.5,
        11..=15 => 2.0,
        _ => 2.5,
    };
    let decayed = RAMP_INTERVAL_START - RAMP_INTERVAL_STEP * f64::from(level.saturating_sub(1));
    BaseSpawn::new(quantity, decayed.max(RAMP_INTERVAL_PLATEAU))
}

/// Computes the spawn specification of every species active in the stage.
#[must_use]
pub fn compute_spawn_specs(stage: Stage, difficulty: Difficulty) -> SpawnTable {
    let factors = DifficultyFactors::for_difficulty(difficulty);
    let tier = stage.tier();
    let primary = tier.primary_species();

    let mut table = SpawnTable::new();
    table.set(primary, apply_factors(primary, primary_base(tier, stage), factors));
    for (species, base) in secondary_bases(stage) {
        table.set(species, apply_factors(species, base, factors));
    }

    debug!(
        stage = stage.get(),
        ?tier,
        %difficulty,
        species = table.len(),
        "computed spawn table"
    );
    table
}

fn primary_base(tier: Tier, stage: Stage) -> BaseSpawn {
    match tier {
        Tier::One => base_progression(stage.get()),
        Tier::Two => base_progression(stage.get().saturating_sub(TIER_TWO_LEVEL_OFFSET)),
        Tier::Three => WRAITH_BASE,
        Tier::Four => GOLEM_BASE,
        Tier::Five | Tier::Six => DRAGON_BASE,
    }
}

fn secondary_bases(stage: Stage) -> impl Iterator<Item = (Species, BaseSpawn)> {
    let value = stage.get();
    let meteor = METEOR_STAGES
        .contains(&value)
        .then_some((Species::Meteor, METEOR_BASE));
    let fireball = (value >= FIREBALL_FIRST_STAGE).then_some((Species::Fireball, FIREBALL_BASE));
    meteor.into_iter().chain(fireball)
}

fn apply_factors(species: Species, base: BaseSpawn, factors: DifficultyFactors) -> SpawnSpec {
    let ceiling = f64::from(species.quantity_ceiling());
    let quantity = (base.quantity * factors.quantity).round().clamp(1.0, ceiling);
    let interval = (base.interval_frames * factors.interval)
        .round()
        .max(f64::from(MIN_SPAWN_INTERVAL_FRAMES));
    SpawnSpec::new(quantity as u32, interval as u32)
}

/// Per-species frame counters that pace waves for the running stage.
#[derive(Debug, Default)]
pub struct SpawnClock {
    table: SpawnTable,
    elapsed: BTreeMap<Species, u32>,
}

impl SpawnClock {
    /// Creates an idle clock with no active species.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the active table and restarts every counter.
    pub fn load(&mut self, table: SpawnTable) {
        self.elapsed.clear();
        self.table = table;
    }

    /// Advances every counter and emits one wave per elapsed interval.
    pub fn tick(&mut self, frames: u32, out: &mut Vec<Event>) {
        if frames == 0 {
            return;
        }

        for (species, spec) in self.table.iter() {
            if spec.interval_frames == 0 {
                continue;
            }

            let counter = self.elapsed.entry(species).or_insert(0);
            *counter = counter.saturating_add(frames);
            while *counter >= spec.interval_frames {
                *counter -= spec.interval_frames;
                out.push(Event::SpawnWave {
                    species,
                    quantity: spec.quantity_per_spawn,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_decays_then_flattens() {
        assert_eq!(base_progression(1).interval_frames, 300.0);
        assert_eq!(base_progression(13).interval_frames, 180.0);
        assert_eq!(base_progression(20).interval_frames, 180.0);
    }

    #[test]
    fn ramp_quantity_steps_by_band() {
        assert_eq!(base_progression(5).quantity, 1.0);
        assert_eq!(base_progression(6).quantity, 1.5);
        assert_eq!(base_progression(11).quantity, 2.0);
        assert_eq!(base_progression(20).quantity, 2.5);
    }

    #[test]
    fn extreme_factors_are_clamped() {
        let spec = apply_factors(
            Species::Slime,
            BaseSpawn::new(50.0, 1.0),
            DifficultyFactors {
                quantity: 10.0,
                interval: 0.01,
            },
        );
        assert_eq!(spec, SpawnSpec::new(3, MIN_SPAWN_INTERVAL_FRAMES));

        let spec = apply_factors(
            Species::Dragon,
            BaseSpawn::new(0.01, 90.0),
            DifficultyFactors {
                quantity: 0.0,
                interval: 1.0,
            },
        );
        assert_eq!(spec.quantity_per_spawn, 1);
    }

    #[test]
    fn zero_interval_entries_never_fire() {
        let mut table = SpawnTable::new();
        table.set(Species::Slime, SpawnSpec::new(1, 0));
        let mut clock = SpawnClock::new();
        clock.load(table);
        let mut events = Vec::new();
        clock.tick(1_000, &mut events);
        assert!(events.is_empty());
    }
}
