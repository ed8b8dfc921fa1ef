//! Choreography
//!
//! Every exchange is an explicit, ordered list of [`Step`]s, each an offset
//! from the exchange start plus the [`Cue`] to apply when it comes due. The
//! lists are plain data. The [`Sequencer`](crate::sequencer::Sequencer)
//! schedules them and the conductor applies them, so nothing here touches
//! a clock.
//!
//! # Timelines
//!
//! ```text
//! Opening exchange              Response exchange
//!     0  both excited               0  user msg (applied on accept), thinking, typing
//!  1000  unit(Levin) + Active    1500  unit(Levin)
//!  4000  Levin opens, typing off 4500  Levin replies
//!  7000  unit(Barandes)          5500  unit(Barandes)
//! 10000  Barandes opens         8500  Barandes replies, typing off
//! 12000  WaitingForUser         10500 WaitingForUser
//! ```

use std::time::Duration;

use crate::emotion::Emotion;
use crate::persona::Persona;
use crate::responses::{opening_statement, reply_to};
use crate::session::{DebatePhase, EmotionStamp};

// Speaking unit, offsets from unit start
const UNIT_INSIGHT_AT: Duration = Duration::from_millis(1000);
const UNIT_SPEAKING_AT: Duration = Duration::from_millis(2000);
const UNIT_REACTION_AT: Duration = Duration::from_millis(4000);

const THINKING_HOLD: Duration = Duration::from_millis(2000);
const INSIGHT_HOLD: Duration = Duration::from_millis(1500);
const SPEAKING_HOLD: Duration = Duration::from_millis(3000);
const CONFUSED_HOLD: Duration = Duration::from_millis(2000);
const REACTION_HOLD: Duration = Duration::from_millis(2000);

// Opening exchange, offsets from topic choice
const OPENING_EXCITED_HOLD: Duration = Duration::from_millis(2000);
const OPENING_FIRST_UNIT_AT: Duration = Duration::from_millis(1000);
const OPENING_SECOND_UNIT_AT: Duration = Duration::from_millis(7000);
const OPENING_SETTLED_AT: Duration = Duration::from_millis(12000);
const PONDERING_HOLD: Duration = Duration::from_millis(4000);

// Response exchange, offsets from accepted submission
const RESPONSE_THINKING_HOLD: Duration = Duration::from_millis(3000);
const RESPONSE_FIRST_UNIT_AT: Duration = Duration::from_millis(1500);
const RESPONSE_SECOND_UNIT_AT: Duration = Duration::from_millis(5500);
const RESPONSE_SETTLED_AT: Duration = Duration::from_millis(10500);

/// A speaker's message lands this long after its unit starts
pub const MESSAGE_AFTER_UNIT_START: Duration = Duration::from_millis(3000);

/// How long the landing-page greeting smile lasts
pub const GREETING_HOLD: Duration = Duration::from_millis(2000);

/// One state mutation
#[derive(Clone, Debug, PartialEq)]
pub enum Cue {
    /// Show an emotion, then let it decay after `hold`
    Emotion {
        /// Whose face
        persona: Persona,
        /// Which emotion
        emotion: Emotion,
        /// How long it stays unless overwritten
        hold: Duration,
    },
    /// Listener reaction, drawn from the reaction source when the cue fires
    Reaction {
        /// The listener
        persona: Persona,
        /// How long it stays unless overwritten
        hold: Duration,
    },
    /// Clear an emotion if the assignment identified by `stamp` is still current
    Decay {
        /// Whose face
        persona: Persona,
        /// Stamp of the assignment to clear
        stamp: EmotionStamp,
    },
    /// Toggle the typing indicator
    Typing(bool),
    /// Enter a phase
    Phase(DebatePhase),
    /// Append a philosopher's statement
    Speak {
        /// Speaker
        persona: Persona,
        /// Statement text
        content: &'static str,
    },
}

impl Cue {
    fn scaled(self, speed: f64) -> Self {
        match self {
            Self::Emotion {
                persona,
                emotion,
                hold,
            } => Self::Emotion {
                persona,
                emotion,
                hold: scale(hold, speed),
            },
            Self::Reaction { persona, hold } => Self::Reaction {
                persona,
                hold: scale(hold, speed),
            },
            other => other,
        }
    }
}

/// A cue at an offset from the start of its exchange
#[derive(Clone, Debug, PartialEq)]
pub struct Step {
    /// Delay from exchange start
    pub offset: Duration,
    /// What happens
    pub cue: Cue,
}

impl Step {
    fn at(offset: Duration, cue: Cue) -> Self {
        Self { offset, cue }
    }

    fn emotion(offset: Duration, persona: Persona, emotion: Emotion, hold: Duration) -> Self {
        Self::at(
            offset,
            Cue::Emotion {
                persona,
                emotion,
                hold,
            },
        )
    }

    fn shifted(mut self, by: Duration) -> Self {
        self.offset += by;
        self
    }
}

/// "One persona speaks": the speaker's thinking-insight-speaking arc and
/// the listener's observing-focused-confused arc, ending in a reaction
#[must_use]
pub fn speaking_unit(speaker: Persona) -> Vec<Step> {
    let listener = speaker.counterpart();
    vec![
        Step::emotion(Duration::ZERO, speaker, Emotion::Thinking, THINKING_HOLD),
        Step::emotion(Duration::ZERO, listener, Emotion::Observing, THINKING_HOLD),
        Step::emotion(UNIT_INSIGHT_AT, speaker, Emotion::Insight, INSIGHT_HOLD),
        Step::emotion(UNIT_INSIGHT_AT, listener, Emotion::Focused, INSIGHT_HOLD),
        Step::emotion(UNIT_SPEAKING_AT, speaker, Emotion::Speaking, SPEAKING_HOLD),
        Step::emotion(UNIT_SPEAKING_AT, listener, Emotion::Confused, CONFUSED_HOLD),
        Step::at(
            UNIT_REACTION_AT,
            Cue::Reaction {
                persona: listener,
                hold: REACTION_HOLD,
            },
        ),
    ]
}

/// Steps for a freshly chosen topic. The session reset itself is applied
/// synchronously by the conductor before these are scheduled.
#[must_use]
pub fn opening_exchange(topic: &str) -> Vec<Step> {
    let first = Persona::FIRST;
    let second = first.counterpart();
    let first_says = OPENING_FIRST_UNIT_AT + MESSAGE_AFTER_UNIT_START;
    let second_says = OPENING_SECOND_UNIT_AT + MESSAGE_AFTER_UNIT_START;

    let mut steps = vec![
        Step::at(Duration::ZERO, Cue::Phase(DebatePhase::Opening)),
        Step::emotion(Duration::ZERO, first, Emotion::Excited, OPENING_EXCITED_HOLD),
        Step::emotion(Duration::ZERO, second, Emotion::Excited, OPENING_EXCITED_HOLD),
    ];
    steps.extend(unit_at(first, OPENING_FIRST_UNIT_AT));
    steps.push(Step::at(OPENING_FIRST_UNIT_AT, Cue::Typing(true)));
    steps.push(Step::at(
        OPENING_FIRST_UNIT_AT,
        Cue::Phase(DebatePhase::Active),
    ));
    steps.push(Step::at(
        first_says,
        Cue::Speak {
            persona: first,
            content: opening_statement(topic, first),
        },
    ));
    steps.push(Step::at(first_says, Cue::Typing(false)));
    steps.extend(unit_at(second, OPENING_SECOND_UNIT_AT));
    steps.push(Step::at(OPENING_SECOND_UNIT_AT, Cue::Typing(true)));
    steps.push(Step::at(
        second_says,
        Cue::Speak {
            persona: second,
            content: opening_statement(topic, second),
        },
    ));
    steps.push(Step::at(second_says, Cue::Typing(false)));
    steps.push(Step::at(
        OPENING_SETTLED_AT,
        Cue::Phase(DebatePhase::WaitingForUser),
    ));
    steps.push(Step::emotion(
        OPENING_SETTLED_AT,
        first,
        Emotion::Pondering,
        PONDERING_HOLD,
    ));
    steps.push(Step::emotion(
        OPENING_SETTLED_AT,
        second,
        Emotion::Pondering,
        PONDERING_HOLD,
    ));
    steps
}

/// Steps following an accepted remark. The remark itself is appended by
/// the session reducer on acceptance.
#[must_use]
pub fn response_exchange(remark: &str) -> Vec<Step> {
    let first = Persona::FIRST;
    let second = first.counterpart();
    let first_says = RESPONSE_FIRST_UNIT_AT + MESSAGE_AFTER_UNIT_START;
    let second_says = RESPONSE_SECOND_UNIT_AT + MESSAGE_AFTER_UNIT_START;

    let mut steps = vec![
        Step::emotion(Duration::ZERO, first, Emotion::Thinking, RESPONSE_THINKING_HOLD),
        Step::emotion(Duration::ZERO, second, Emotion::Thinking, RESPONSE_THINKING_HOLD),
        Step::at(Duration::ZERO, Cue::Typing(true)),
    ];
    steps.extend(unit_at(first, RESPONSE_FIRST_UNIT_AT));
    steps.push(Step::at(
        first_says,
        Cue::Speak {
            persona: first,
            content: reply_to(remark, first),
        },
    ));
    steps.extend(unit_at(second, RESPONSE_SECOND_UNIT_AT));
    steps.push(Step::at(
        second_says,
        Cue::Speak {
            persona: second,
            content: reply_to(remark, second),
        },
    ));
    steps.push(Step::at(second_says, Cue::Typing(false)));
    steps.push(Step::at(
        RESPONSE_SETTLED_AT,
        Cue::Phase(DebatePhase::WaitingForUser),
    ));
    steps
}

/// A persona card was focused on the topic screen
#[must_use]
pub fn greeting(persona: Persona) -> Vec<Step> {
    vec![Step::emotion(
        Duration::ZERO,
        persona,
        Emotion::Smiling,
        GREETING_HOLD,
    )]
}

/// Divide every offset and hold by `speed`
///
/// Non-finite or non-positive speeds leave the steps untouched; config
/// validation rejects them before they get here.
#[must_use]
pub fn scaled(steps: Vec<Step>, speed: f64) -> Vec<Step> {
    if !speed.is_finite() || speed <= 0.0 || (speed - 1.0).abs() < f64::EPSILON {
        return steps;
    }
    steps
        .into_iter()
        .map(|s| Step {
            offset: scale(s.offset, speed),
            cue: s.cue.scaled(speed),
        })
        .collect()
}

fn unit_at(speaker: Persona, start: Duration) -> impl Iterator<Item = Step> {
    speaking_unit(speaker)
        .into_iter()
        .map(move |s| s.shifted(start))
}

/// Longest offset or hold a scaled step may carry
pub const MAX_SCALED_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

fn scale(d: Duration, speed: f64) -> Duration {
    Duration::try_from_secs_f64(d.as_secs_f64() / speed)
        .map_or(MAX_SCALED_DELAY, |scaled| scaled.min(MAX_SCALED_DELAY))
}
