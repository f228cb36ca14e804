//! Translation of raw controller input into cheat tokens.

use ledgejump_core::CheatToken;
use serde::{Deserialize, Serialize};

/// Axis magnitude below which the stick counts as centred.
pub const AXIS_DEADZONE: f32 = 0.1;

/// Axis magnitude that fires a direction token.
pub const AXIS_TRIGGER: f32 = 0.5;

/// Physical buttons the translator understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Button {
    /// Directional pad up.
    DpadUp,
    /// Directional pad down.
    DpadDown,
    /// Directional pad left.
    DpadLeft,
    /// Directional pad right.
    DpadRight,
    /// Jump button.
    Jump,
    /// Shoot button.
    Shoot,
    /// Face button A.
    A,
    /// Face button B.
    B,
    /// Pause button. Has no token.
    Start,
}

impl Button {
    /// Token produced when the button is pressed.
    #[must_use]
    pub const fn token(self) -> Option<CheatToken> {
        match self {
            Self::DpadUp => Some(CheatToken::Up),
            Self::DpadDown => Some(CheatToken::Down),
            Self::DpadLeft => Some(CheatToken::Left),
            Self::DpadRight => Some(CheatToken::Right),
            Self::Jump => Some(CheatToken::Jump),
            Self::Shoot => Some(CheatToken::Shoot),
            Self::A => Some(CheatToken::A),
            Self::B => Some(CheatToken::B),
            Self::Start => None,
        }
    }
}

/// Analog stick axes. Positive values point right and down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Left to right.
    Horizontal,
    /// Top to bottom.
    Vertical,
}

impl Axis {
    const fn token(self, positive: bool) -> CheatToken {
        match (self, positive) {
            (Self::Horizontal, true) => CheatToken::Right,
            (Self::Horizontal, false) => CheatToken::Left,
            (Self::Vertical, true) => CheatToken::Down,
            (Self::Vertical, false) => CheatToken::Up,
        }
    }
}

/// Raw input event delivered by the platform layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RawInput {
    /// A button went down.
    Pressed {
        /// Button that changed.
        button: Button,
    },
    /// A button went up.
    Released {
        /// Button that changed.
        button: Button,
    },
    /// An analog axis reported a new value in `[-1, 1]`.
    Axis {
        /// Axis that moved.
        axis: Axis,
        /// New axis value.
        value: f32,
    },
}

/// Edge-triggered translator from raw input to cheat tokens.
#[derive(Clone, Debug, Default)]
pub struct TokenTranslator {
    horizontal: AxisLatch,
    vertical: AxisLatch,
}

impl TokenTranslator {
    /// Creates a translator with both axes centred.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translates one raw event, returning a token only on a fresh press or crossing.
    pub fn translate(&mut self, input: RawInput) -> Option<CheatToken> {
        match input {
            RawInput::Pressed { button } => button.token(),
            RawInput::Released { .. } => None,
            RawInput::Axis { axis, value } => {
                let latch = match axis {
                    Axis::Horizontal => &mut self.horizontal,
                    Axis::Vertical => &mut self.vertical,
                };
                latch.update(value).map(|positive| axis.token(positive))
            }
        }
    }
}

/// Remembers which direction already fired until the stick recentres.
///
/// Hysteresis: after firing, dipping below the trigger but staying outside the
/// deadzone does not re-arm, so 0.7 -> 0.3 -> 0.7 yields a single token.
#[derive(Clone, Copy, Debug, Default)]
struct AxisLatch {
    fired: Option<bool>,
}

impl AxisLatch {
    fn update(&mut self, value: f32) -> Option<bool> {
        let magnitude = value.abs();
        if !value.is_finite() || magnitude < AXIS_DEADZONE {
            self.fired = None;
            return None;
        }
        if magnitude < AXIS_TRIGGER {
            return None;
        }

        let positive = value > 0.0;
        if self.fired == Some(positive) {
            return None;
        }
        self.fired = Some(positive);
        Some(positive)
    }
}
