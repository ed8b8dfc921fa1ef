//! Listener reactions
//!
//! The last beat of every speaking unit shows a reaction on the listener,
//! drawn when the cue fires. The draw goes through [`ReactionSource`] so
//! tests can script it.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::emotion::Emotion;

/// Picks a listener reaction from a set of choices
pub trait ReactionSource: Send {
    /// Choose one of `choices` (never empty)
    fn pick(&mut self, choices: &[Emotion]) -> Emotion;
}

/// Uniform random reactions
#[derive(Debug)]
pub struct RandomReactions {
    rng: StdRng,
}

impl RandomReactions {
    /// Seeded from OS entropy
    #[must_use]
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic sequence for reproducible demos
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for RandomReactions {
    fn default() -> Self {
        Self::new()
    }
}

impl ReactionSource for RandomReactions {
    fn pick(&mut self, choices: &[Emotion]) -> Emotion {
        choices
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(Emotion::Pondering)
    }
}

/// Replays a fixed list of reactions, then falls back to the first choice
#[derive(Debug, Default, Clone)]
pub struct ScriptedReactions {
    script: VecDeque<Emotion>,
}

impl ScriptedReactions {
    /// Reactions returned in order
    pub fn new(script: impl IntoIterator<Item = Emotion>) -> Self {
        Self {
            script: script.into_iter().collect(),
        }
    }

    /// Reactions not yet drawn
    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl ReactionSource for ScriptedReactions {
    fn pick(&mut self, choices: &[Emotion]) -> Emotion {
        self.script
            .pop_front()
            .or_else(|| choices.first().copied())
            .unwrap_or(Emotion::Pondering)
    }
}
