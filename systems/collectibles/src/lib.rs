#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic collectible placement derived from gaps in the platform layout.
//!
//! Items hover above the gap between two platforms so the player has to jump
//! for them. The extra life takes the widest comfortable gap closest to the
//! middle of the layout. Power-ups then look for gaps far enough from every
//! item placed so far, relaxing that distance step by step before giving up
//! and stacking next to the unconstrained spot.

pub mod gaps;
pub mod schedule;

use ledgejump_core::{
    CollectibleKind, Difficulty, PlacedItem, Platform, Position, Stage, ITEM_WIDTH,
};
use serde::Deserialize;
use tracing::debug;

pub use gaps::{Exclusion, Gap, GapIndex};
pub use schedule::schedule_for_stage;

/// Numeric knobs that shape where collectibles end up.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlacementTuning {
    /// Minimum gap widths tried in order. A zero rung accepts any open gap.
    pub width_ladder: Vec<f32>,
    /// Base height of an item above the anchoring platform.
    pub base_lift: f32,
    /// Share of the gap width added on top of the base lift.
    pub lift_gap_share: f32,
    /// Upper bound of the width-dependent extra lift.
    pub lift_gap_cap: f32,
    /// Smallest y an item may take.
    pub min_item_y: f32,
    /// Clearance kept above the higher platform of a gap.
    pub gap_clearance: f32,
    /// Clearance kept above the middle platform when no gap is open.
    pub platform_clearance: f32,
    /// Multiplier turning the average platform spacing into a minimum item distance.
    pub spacing_multiplier: f32,
    /// Fractions of the minimum distance tried after the full distance fails.
    pub relaxation_steps: Vec<f32>,
    /// Horizontal shift applied per item when every relaxation fails.
    pub fallback_step_x: f32,
}

impl Default for PlacementTuning {
    fn default() -> Self {
        Self {
            width_ladder: vec![60.0, 40.0, 20.0, 0.0],
            base_lift: 140.0,
            lift_gap_share: 0.25,
            lift_gap_cap: 60.0,
            min_item_y: 80.0,
            gap_clearance: 120.0,
            platform_clearance: 100.0,
            spacing_multiplier: 8.0,
            relaxation_steps: vec![0.75, 0.60, 0.50, 0.35, 0.25, 0.10, 0.05],
            fallback_step_x: 96.0,
        }
    }
}

/// Places the extra life using the default tuning.
#[must_use]
pub fn place_extra_life(platforms: &[Platform]) -> Option<PlacedItem> {
    Placer::default().place_extra_life(platforms)
}

/// Places the stage's scheduled power-ups using the default tuning.
#[must_use]
pub fn place_powerups(
    platforms: &[Platform],
    difficulty: Difficulty,
    stage: Stage,
    extra_life: Option<&PlacedItem>,
) -> Vec<PlacedItem> {
    Placer::default().place_powerups(platforms, difficulty, stage, extra_life)
}

/// Pure system that positions collectibles for a stage.
#[derive(Clone, Debug, Default)]
pub struct Placer {
    tuning: PlacementTuning,
}

impl Placer {
    /// Creates a placer with the provided tuning.
    #[must_use]
    pub fn new(tuning: PlacementTuning) -> Self {
        Self { tuning }
    }

    /// Places the stage's single extra life. Returns `None` for an empty layout.
    #[must_use]
    pub fn place_extra_life(&self, platforms: &[Platform]) -> Option<PlacedItem> {
        let index = GapIndex::new(platforms)?;
        let position = self.unconstrained_spot(&index);
        debug!(x = position.x, y = position.y, "placed extra life");
        Some(PlacedItem::new(position, CollectibleKind::ExtraLife))
    }

    /// Places the power-ups scheduled for the stage and difficulty.
    #[must_use]
    pub fn place_powerups(
        &self,
        platforms: &[Platform],
        difficulty: Difficulty,
        stage: Stage,
        extra_life: Option<&PlacedItem>,
    ) -> Vec<PlacedItem> {
        let kinds = schedule_for_stage(stage, difficulty);
        self.place_scheduled(platforms, &kinds, extra_life)
    }

    /// Places the provided kinds in order, keeping them apart from each other
    /// and from the extra life.
    #[must_use]
    pub fn place_scheduled(
        &self,
        platforms: &[Platform],
        kinds: &[CollectibleKind],
        extra_life: Option<&PlacedItem>,
    ) -> Vec<PlacedItem> {
        let Some(index) = GapIndex::new(platforms) else {
            return Vec::new();
        };
        if kinds.is_empty() {
            return Vec::new();
        }

        let base_distance = self.dynamic_min_distance(&index);
        let mut points: Vec<f32> = extra_life
            .map(|item| item.position.center_x())
            .into_iter()
            .collect();
        let mut consumed: Vec<usize> = points
            .iter()
            .filter_map(|point| index.gap_centered_at(*point))
            .map(|gap| gap.left)
            .collect();

        let mut placed = Vec::with_capacity(kinds.len());
        for (item_index, kind) in kinds.iter().copied().enumerate() {
            let position = match self.spaced_gap(&index, &points, &consumed, base_distance) {
                Some(gap) => {
                    consumed.push(gap.left);
                    self.gap_position(gap)
                }
                None => {
                    let position = self.fallback_position(&index, &points, item_index);
                    debug!(?kind, x = position.x, "no spaced gap left, shifted unconstrained spot");
                    position
                }
            };
            points.push(position.center_x());
            placed.push(PlacedItem::new(position, kind));
        }
        placed
    }

    /// Minimum distance between item centers before any relaxation.
    #[must_use]
    pub fn dynamic_min_distance(&self, index: &GapIndex) -> f32 {
        index.average_spacing() * self.tuning.spacing_multiplier
    }

    fn spaced_gap<'a>(
        &self,
        index: &'a GapIndex,
        points: &[f32],
        consumed: &[usize],
        base_distance: f32,
    ) -> Option<&'a Gap> {
        std::iter::once(1.0)
            .chain(self.tuning.relaxation_steps.iter().copied())
            .find_map(|factor| {
                let exclusion = Exclusion {
                    points,
                    min_distance: base_distance * factor,
                    consumed,
                };
                self.search_ladder(|width| index.first_gap_excluding(width, &exclusion))
            })
    }

    /// Shifts the unconstrained spot right by whole steps, starting at
    /// `item_index + 1`, until its center is free of every placed item.
    fn fallback_position(&self, index: &GapIndex, points: &[f32], item_index: usize) -> Position {
        let spot = self.unconstrained_spot(index);
        let step = self.tuning.fallback_step_x;
        // Each placed center can block at most one step.
        let candidates = (item_index + 1..=item_index + 1 + points.len())
            .map(|steps| Position::new(spot.x + step * steps as f32, spot.y));
        let mut last = spot;
        for candidate in candidates {
            let center = candidate.center_x();
            if points.iter().all(|point| (point - center).abs() >= 0.5) {
                return candidate;
            }
            last = candidate;
        }
        last
    }

    fn unconstrained_spot(&self, index: &GapIndex) -> Position {
        match self.search_ladder(|width| index.first_gap_at_or_above(width)) {
            Some(gap) => self.gap_position(gap),
            None => self.platform_position(index.middle_platform()),
        }
    }

    fn search_ladder<'a>(&self, probe: impl FnMut(f32) -> Option<&'a Gap>) -> Option<&'a Gap> {
        self.tuning.width_ladder.iter().copied().find_map(probe)
    }

    fn gap_position(&self, gap: &Gap) -> Position {
        let tuning = &self.tuning;
        let lift = tuning.base_lift + (gap.width() * tuning.lift_gap_share).min(tuning.lift_gap_cap);
        let y = (gap.anchor_y - lift)
            .min(gap.anchor_y - tuning.gap_clearance)
            .max(tuning.min_item_y);
        Position::new(gap.center() - ITEM_WIDTH / 2.0, y)
    }

    // TODO: unify platform_clearance with gap_clearance once level design confirms which one is intended.
    fn platform_position(&self, platform: &Platform) -> Position {
        let tuning = &self.tuning;
        let y = (platform.y - tuning.base_lift)
            .min(platform.y - tuning.platform_clearance)
            .max(tuning.min_item_y);
        Position::new(platform.center_x() - ITEM_WIDTH / 2.0, y)
    }
}
