#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stage initialization flow and per-attempt session state.
//!
//! [`StageSetup`] runs the difficulty director and then the collectible placer
//! when a stage starts. [`Session`] owns everything that must survive between
//! frames (spawn counters, cheat windows, the input translator) so that two
//! sessions never share state.

use ledgejump_core::{CheatToken, Difficulty, Event, PlacedItem, Platform, SpawnTable, Stage};
use ledgejump_system_cheat_codes::{CheatSession, RawInput, TokenTranslator};
use ledgejump_system_collectibles::Placer;
use ledgejump_system_difficulty::{compute_spawn_specs, SpawnClock};
use serde::Serialize;
use tracing::info;

/// Everything computed for a stage when it starts.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StagePlan {
    /// Stage the plan was computed for.
    pub stage: Stage,
    /// Difficulty of the attempt.
    pub difficulty: Difficulty,
    /// Wave parameters of every active species.
    pub spawns: SpawnTable,
    /// The stage's extra life, if any.
    pub extra_life: Option<PlacedItem>,
    /// Scheduled power-ups in placement order.
    pub powerups: Vec<PlacedItem>,
}

impl StagePlan {
    /// Iterator over the extra life followed by the power-ups.
    pub fn items(&self) -> impl Iterator<Item = &PlacedItem> {
        self.extra_life.iter().chain(self.powerups.iter())
    }
}

/// Composes the balancing systems at stage start.
#[derive(Clone, Debug, Default)]
pub struct StageSetup {
    placer: Placer,
}

impl StageSetup {
    /// Creates a stage setup using the provided placer.
    #[must_use]
    pub fn new(placer: Placer) -> Self {
        Self { placer }
    }

    /// Computes spawns first, then collectibles, for the given layout.
    #[must_use]
    pub fn prepare(&self, stage: Stage, difficulty: Difficulty, platforms: &[Platform]) -> StagePlan {
        let spawns = compute_spawn_specs(stage, difficulty);
        let extra_life = self.placer.place_extra_life(platforms);
        let powerups = self
            .placer
            .place_powerups(platforms, difficulty, stage, extra_life.as_ref());

        info!(
            stage = stage.get(),
            %difficulty,
            platforms = platforms.len(),
            species = spawns.len(),
            extra_life = extra_life.is_some(),
            powerups = powerups.len(),
            "prepared stage"
        );

        StagePlan {
            stage,
            difficulty,
            spawns,
            extra_life,
            powerups,
        }
    }
}

/// State owned by a single playthrough attempt.
#[derive(Debug)]
pub struct Session {
    difficulty: Difficulty,
    setup: StageSetup,
    plan: Option<StagePlan>,
    clock: SpawnClock,
    translator: TokenTranslator,
    cheats: CheatSession,
}

impl Session {
    /// Starts a new attempt at the provided difficulty.
    #[must_use]
    pub fn new(difficulty: Difficulty, setup: StageSetup) -> Self {
        Self {
            difficulty,
            setup,
            plan: None,
            clock: SpawnClock::new(),
            translator: TokenTranslator::new(),
            cheats: CheatSession::default(),
        }
    }

    /// Difficulty chosen for the attempt.
    #[must_use]
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Plan of the running stage.
    #[must_use]
    pub fn plan(&self) -> Option<&StagePlan> {
        self.plan.as_ref()
    }

    /// Prepares the stage and restarts the spawn counters.
    pub fn enter_stage(&mut self, stage: Stage, platforms: &[Platform]) -> &StagePlan {
        let plan = self.setup.prepare(stage, self.difficulty, platforms);
        self.clock.load(plan.spawns.clone());
        self.plan.insert(plan)
    }

    /// Drops the running stage. Cheat windows survive restarts.
    pub fn restart(&mut self) {
        self.plan = None;
        self.clock.load(SpawnTable::new());
    }

    /// Advances the spawn counters of the running stage.
    pub fn tick(&mut self, frames: u32, out: &mut Vec<Event>) {
        self.clock.tick(frames, out);
    }

    /// Translates raw input and feeds the cheat matchers.
    ///
    /// The returned token has already been observed by every matcher, so UI
    /// transitions driven by it can never hide it from cheat recognition.
    pub fn handle_input(&mut self, input: RawInput, out: &mut Vec<Event>) -> Option<CheatToken> {
        let token = self.translator.translate(input)?;
        self.cheats.push_token(token, out);
        Some(token)
    }
}
