#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Ledgejump stage-balancing systems.
//!
//! This crate defines the vocabulary that connects the stage setup flow, the
//! pure balancing systems, and adapters. Systems read immutable inputs such as
//! the [`Stage`], the [`Difficulty`] and the externally generated [`Platform`]
//! layout, and answer with plain data ([`SpawnTable`], [`PlacedItem`]) or with
//! [`Event`] values pushed into caller-provided buffers.

use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Last stage of the campaign. It forms a tier of its own.
pub const FINAL_STAGE: u32 = 51;

/// Minimum number of frames between two waves of the same species.
pub const MIN_SPAWN_INTERVAL_FRAMES: u32 = 60;

/// Width of every collectible sprite measured in pixels.
pub const ITEM_WIDTH: f32 = 24.0;

/// Errors raised while constructing a [`Stage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StageError {
    /// Stage numbering starts at one.
    #[error("stage numbers start at 1, got {0}")]
    Zero(u32),
}

/// Error returned when a difficulty label is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown difficulty '{label}', expected easy, normal or hard")]
pub struct DifficultyParseError {
    label: String,
}

/// Error returned when a cheat token label is not recognised.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown cheat token '{label}'")]
pub struct CheatTokenParseError {
    label: String,
}

/// One-based stage number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Stage(u32);

impl Stage {
    /// Creates a stage, rejecting stage zero.
    pub const fn new(value: u32) -> Result<Self, StageError> {
        if value == 0 {
            return Err(StageError::Zero(value));
        }
        Ok(Self(value))
    }

    /// Final stage of the campaign.
    #[must_use]
    pub const fn final_stage() -> Self {
        Self(FINAL_STAGE)
    }

    /// Retrieves the numeric stage.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Tier the stage belongs to.
    #[must_use]
    pub const fn tier(&self) -> Tier {
        Tier::from_stage(*self)
    }

    /// Reports whether the stage is the last campaign stage or lies past it.
    #[must_use]
    pub const fn is_final(&self) -> bool {
        self.0 >= FINAL_STAGE
    }

    /// Iterator over every stage of the campaign in order.
    pub fn campaign() -> impl Iterator<Item = Stage> {
        (1..=FINAL_STAGE).map(Stage)
    }
}

impl TryFrom<u32> for Stage {
    type Error = StageError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Stage> for u32 {
    fn from(stage: Stage) -> Self {
        stage.0
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contiguous stage range that introduces its own hostile species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tier {
    /// Stages 1 through 20.
    One,
    /// Stages 21 through 30.
    Two,
    /// Stages 31 through 40.
    Three,
    /// Stages 41 through 50.
    Four,
    /// The final stage.
    Five,
    /// Stages past the end of the campaign.
    Six,
}

impl Tier {
    /// Resolves the tier that owns the provided stage.
    #[must_use]
    pub const fn from_stage(stage: Stage) -> Self {
        match stage.get() {
            0..=20 => Self::One,
            21..=30 => Self::Two,
            31..=40 => Self::Three,
            41..=50 => Self::Four,
            FINAL_STAGE => Self::Five,
            _ => Self::Six,
        }
    }

    /// Primary species introduced by the tier.
    #[must_use]
    pub const fn primary_species(self) -> Species {
        match self {
            Self::One => Species::Slime,
            Self::Two => Species::Bat,
            Self::Three => Species::Wraith,
            Self::Four => Species::Golem,
            Self::Five | Self::Six => Species::Dragon,
        }
    }
}

/// Difficulty selected for a playthrough attempt.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Fewer, slower hazards.
    Easy,
    /// Reference balancing.
    #[default]
    Normal,
    /// More, faster hazards.
    Hard,
}

impl Difficulty {
    /// All difficulties ordered from easiest to hardest.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Parses a label, treating anything unrecognised as [`Difficulty::Normal`].
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_else(|error: DifficultyParseError| {
            warn!(%error, "falling back to normal difficulty");
            Self::Normal
        })
    }

    /// Lowercase label used in configuration files and logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Normal => "normal",
            Self::Hard => "hard",
        }
    }
}

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "hard" => Ok(Self::Hard),
            _ => Err(DifficultyParseError {
                label: value.to_owned(),
            }),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Hostile species whose waves are parameterised per stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Ground walker introduced in tier one.
    Slime,
    /// Flyer introduced in tier two.
    Bat,
    /// Phasing enemy introduced in tier three.
    Wraith,
    /// Armoured enemy introduced in tier four.
    Golem,
    /// Boss species of the final stage.
    Dragon,
    /// Precipitation hazard falling from the top of the screen.
    Meteor,
    /// Late-game secondary hazard.
    Fireball,
}

impl Species {
    /// Largest number of instances allowed in a single wave.
    #[must_use]
    pub const fn quantity_ceiling(self) -> u32 {
        match self {
            Self::Dragon => 4,
            _ => 3,
        }
    }
}

/// Wave parameters for a single species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpawnSpec {
    /// Number of instances emitted per wave.
    pub quantity_per_spawn: u32,
    /// Frames elapsed between two waves.
    pub interval_frames: u32,
}

impl SpawnSpec {
    /// Creates a new spawn specification.
    #[must_use]
    pub const fn new(quantity_per_spawn: u32, interval_frames: u32) -> Self {
        Self {
            quantity_per_spawn,
            interval_frames,
        }
    }
}

/// Spawn specifications of every species active in a stage.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpawnTable {
    specs: BTreeMap<Species, SpawnSpec>,
}

impl SpawnTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the specification for a species, replacing any previous entry.
    pub fn set(&mut self, species: Species, spec: SpawnSpec) {
        let _ = self.specs.insert(species, spec);
    }

    /// Specification for the provided species, if it is active.
    #[must_use]
    pub fn get(&self, species: Species) -> Option<SpawnSpec> {
        self.specs.get(&species).copied()
    }

    /// Iterator over active species in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (Species, SpawnSpec)> + '_ {
        self.specs.iter().map(|(species, spec)| (*species, *spec))
    }

    /// Number of active species.
    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    /// Reports whether no species is active.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

/// Axis-aligned platform rectangle in screen space, y growing downward.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Horizontal extent.
    pub width: f32,
    /// Vertical extent.
    pub height: f32,
}

impl Platform {
    /// Creates a new platform rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge of the platform.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Horizontal center of the platform.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Screen-space anchor of a placed item. `x` is the item's left edge.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Left edge of the item.
    pub x: f32,
    /// Top edge of the item.
    pub y: f32,
}

impl Position {
    /// Creates a new position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal center of an item anchored at this position.
    #[must_use]
    pub fn center_x(&self) -> f32 {
        self.x + ITEM_WIDTH / 2.0
    }
}

/// Pickup items that can be placed into a stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectibleKind {
    /// Grants one additional life. At most one per stage.
    ExtraLife,
    /// Temporary immunity to damage.
    Invincibility,
    /// Enables a second jump while airborne.
    DoubleJump,
    /// Absorbs a single hit.
    Shield,
    /// Slows hostile movement for a while.
    Tempo,
    /// Upgrades the player's projectile.
    SuperShot,
}

impl CollectibleKind {
    /// Reports whether the kind is a power-up rather than the extra life.
    #[must_use]
    pub const fn is_powerup(self) -> bool {
        !matches!(self, Self::ExtraLife)
    }
}

/// Collectible anchored at a concrete position.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlacedItem {
    /// Where the item is drawn.
    pub position: Position,
    /// What the item grants.
    pub kind: CollectibleKind,
}

impl PlacedItem {
    /// Creates a new placed item.
    #[must_use]
    pub const fn new(position: Position, kind: CollectibleKind) -> Self {
        Self { position, kind }
    }
}

/// Abstract input symbol used for cheat-code recognition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CheatToken {
    /// Upward direction.
    Up,
    /// Downward direction.
    Down,
    /// Leftward direction.
    Left,
    /// Rightward direction.
    Right,
    /// Jump button.
    Jump,
    /// Shoot button.
    Shoot,
    /// Face button A.
    A,
    /// Face button B.
    B,
}

impl FromStr for CheatToken {
    type Err = CheatTokenParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "UP" => Ok(Self::Up),
            "DOWN" => Ok(Self::Down),
            "LEFT" => Ok(Self::Left),
            "RIGHT" => Ok(Self::Right),
            "JUMP" => Ok(Self::Jump),
            "SHOOT" => Ok(Self::Shoot),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            _ => Err(CheatTokenParseError {
                label: value.to_owned(),
            }),
        }
    }
}

/// Recognised cheat codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheatCode {
    /// Grants a large stock of lives at the cost of ranking eligibility.
    LifeBoost,
    /// Grants invincibility for the stage at the cost of score.
    PowerSurge,
}

/// Reward handed to the player when a cheat code completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reward {
    /// Adds the given number of lives.
    ExtraLives(u32),
    /// Keeps the player invincible until the stage ends.
    StageInvincibility,
}

/// Description of what the external effect applier must do for a cheat.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheatEffect {
    /// Reward granted to the player.
    pub reward: Reward,
    /// Points subtracted from the current score.
    pub score_penalty: u32,
    /// Whether the attempt becomes ineligible for the ranking table.
    pub disables_ranking: bool,
}

/// Events broadcast by systems for external collaborators to act on.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A species' spawn timer elapsed and a wave should be emitted.
    SpawnWave {
        /// Species to spawn.
        species: Species,
        /// Number of instances in the wave.
        quantity: u32,
    },
    /// A cheat sequence was just completed.
    CheatActivated {
        /// Code that matched.
        code: CheatCode,
        /// Effect to apply.
        effect: CheatEffect,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(value: u32) -> Stage {
        Stage::new(value).expect("valid stage")
    }

    #[test]
    fn stage_zero_is_rejected() {
        assert_eq!(Stage::new(0), Err(StageError::Zero(0)));
    }

    #[test]
    fn tiers_cover_campaign_boundaries() {
        assert_eq!(stage(1).tier(), Tier::One);
        assert_eq!(stage(20).tier(), Tier::One);
        assert_eq!(stage(21).tier(), Tier::Two);
        assert_eq!(stage(30).tier(), Tier::Two);
        assert_eq!(stage(31).tier(), Tier::Three);
        assert_eq!(stage(41).tier(), Tier::Four);
        assert_eq!(stage(50).tier(), Tier::Four);
        assert_eq!(stage(51).tier(), Tier::Five);
        assert_eq!(stage(52).tier(), Tier::Six);
        assert_eq!(stage(900).tier(), Tier::Six);
    }

    #[test]
    fn final_flag_covers_overflow_stages() {
        assert!(!stage(50).is_final());
        assert!(Stage::final_stage().is_final());
        assert!(stage(52).is_final());
    }

    #[test]
    fn campaign_visits_every_stage_once() {
        let stages: Vec<u32> = Stage::campaign().map(|stage| stage.get()).collect();
        assert_eq!(stages.len(), 51);
        assert_eq!(stages.first(), Some(&1));
        assert_eq!(stages.last(), Some(&FINAL_STAGE));
    }

    #[test]
    fn difficulty_parsing_is_case_insensitive() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn malformed_difficulty_label_falls_back_to_normal() {
        assert_eq!(Difficulty::from_label("nightmare"), Difficulty::Normal);
        assert_eq!(Difficulty::from_label(""), Difficulty::Normal);
        assert_eq!(Difficulty::from_label("Easy"), Difficulty::Easy);
    }

    #[test]
    fn dragon_has_the_larger_ceiling() {
        assert_eq!(Species::Dragon.quantity_ceiling(), 4);
        assert_eq!(Species::Slime.quantity_ceiling(), 3);
        assert_eq!(Species::Meteor.quantity_ceiling(), 3);
    }

    #[test]
    fn cheat_tokens_parse_from_labels() {
        assert_eq!("up".parse::<CheatToken>(), Ok(CheatToken::Up));
        assert_eq!("SHOOT".parse::<CheatToken>(), Ok(CheatToken::Shoot));
        assert!("start".parse::<CheatToken>().is_err());
    }

    #[test]
    fn platform_layout_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Layout {
            platforms: Vec<Platform>,
        }

        let layout: Layout = toml::from_str(
            r#"
            [[platforms]]
            x = 100.0
            y = 400.0
            width = 200.0
            height = 20.0
            "#,
        )
        .expect("layout parses");
        assert_eq!(layout.platforms, vec![Platform::new(100.0, 400.0, 200.0, 20.0)]);
        assert!((layout.platforms[0].right() - 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn stage_deserialization_rejects_zero() {
        assert!(serde_json::from_str::<Stage>("0").is_err());
        assert_eq!(serde_json::from_str::<Stage>("12").ok(), Some(stage(12)));
    }
}
