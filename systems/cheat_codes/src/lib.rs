#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Cheat-code recognition over the stream of abstract input tokens.
//!
//! A [`CheatMatcher`] keeps the last N tokens, N being the length of its target
//! sequence, and reports when they equal the target exactly. A
//! [`CheatSession`] runs one matcher per [`CheatCode`] over the same stream and
//! turns completions into [`Event::CheatActivated`]. Raw controller input
//! reaches the session through the [`TokenTranslator`].

pub mod translator;

use std::collections::VecDeque;

use ledgejump_core::{CheatCode, CheatEffect, CheatToken, Event, Reward};
use tracing::info;

pub use translator::{Axis, Button, RawInput, TokenTranslator, AXIS_DEADZONE, AXIS_TRIGGER};

const LIFE_BOOST_SEQUENCE: [CheatToken; 10] = [
    CheatToken::Up,
    CheatToken::Up,
    CheatToken::Down,
    CheatToken::Down,
    CheatToken::Left,
    CheatToken::Right,
    CheatToken::Left,
    CheatToken::Right,
    CheatToken::B,
    CheatToken::A,
];

const POWER_SURGE_SEQUENCE: [CheatToken; 10] = [
    CheatToken::Jump,
    CheatToken::Jump,
    CheatToken::Shoot,
    CheatToken::Shoot,
    CheatToken::Left,
    CheatToken::Right,
    CheatToken::Left,
    CheatToken::Right,
    CheatToken::A,
    CheatToken::B,
];

const LIFE_BOOST_LIVES: u32 = 30;
const POWER_SURGE_PENALTY: u32 = 5_000;

/// Token sequence that completes the provided code.
#[must_use]
pub const fn sequence(code: CheatCode) -> &'static [CheatToken] {
    match code {
        CheatCode::LifeBoost => &LIFE_BOOST_SEQUENCE,
        CheatCode::PowerSurge => &POWER_SURGE_SEQUENCE,
    }
}

/// Effect the applier must carry out when the code completes.
#[must_use]
pub const fn effect(code: CheatCode) -> CheatEffect {
    match code {
        CheatCode::LifeBoost => CheatEffect {
            reward: Reward::ExtraLives(LIFE_BOOST_LIVES),
            score_penalty: 0,
            disables_ranking: true,
        },
        CheatCode::PowerSurge => CheatEffect {
            reward: Reward::StageInvincibility,
            score_penalty: POWER_SURGE_PENALTY,
            disables_ranking: false,
        },
    }
}

/// Sliding-window matcher for a single target sequence.
#[derive(Clone, Debug)]
pub struct CheatMatcher {
    target: Vec<CheatToken>,
    buffer: VecDeque<CheatToken>,
}

impl CheatMatcher {
    /// Creates a matcher for the provided target sequence.
    #[must_use]
    pub fn new(target: Vec<CheatToken>) -> Self {
        let buffer = VecDeque::with_capacity(target.len());
        Self { target, buffer }
    }

    /// Creates a matcher for a known cheat code.
    #[must_use]
    pub fn for_code(code: CheatCode) -> Self {
        Self::new(sequence(code).to_vec())
    }

    /// Sequence the matcher waits for.
    #[must_use]
    pub fn target(&self) -> &[CheatToken] {
        &self.target
    }

    /// Appends a token and reports whether it just completed the target.
    ///
    /// The window is not cleared after a match, so tokens that happen to
    /// re-complete the sequence match again.
    pub fn push_token(&mut self, token: CheatToken) -> bool {
        if self.target.is_empty() {
            return false;
        }

        self.buffer.push_back(token);
        while self.buffer.len() > self.target.len() {
            let _ = self.buffer.pop_front();
        }

        self.buffer.len() == self.target.len() && self.buffer.iter().eq(self.target.iter())
    }
}

/// Every known cheat matcher, fed from one token stream.
#[derive(Clone, Debug)]
pub struct CheatSession {
    matchers: Vec<(CheatCode, CheatMatcher)>,
}

impl Default for CheatSession {
    fn default() -> Self {
        Self::new(&[CheatCode::LifeBoost, CheatCode::PowerSurge])
    }
}

impl CheatSession {
    /// Creates a session listening for the provided codes.
    #[must_use]
    pub fn new(codes: &[CheatCode]) -> Self {
        let matchers = codes
            .iter()
            .map(|code| (*code, CheatMatcher::for_code(*code)))
            .collect();
        Self { matchers }
    }

    /// Feeds the token to every matcher and emits one event per completion.
    pub fn push_token(&mut self, token: CheatToken, out: &mut Vec<Event>) {
        for (code, matcher) in &mut self.matchers {
            if matcher.push_token(token) {
                info!(?code, "cheat sequence completed");
                out.push(Event::CheatActivated {
                    code: *code,
                    effect: effect(*code),
                });
            }
        }
    }
}
