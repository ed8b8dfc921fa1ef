//! Emotions - Surface-Agnostic Indicator Tables
//!
//! Each persona shows at most one emotion at a time. This module defines the
//! closed set of emotion tags and the three lookup tables every surface uses
//! to render them:
//!
//! - [`Emotion::icon`]: the glyph drawn in the indicator bubble
//! - [`Emotion::color`]: the indicator colour
//! - [`Emotion::animation`]: how the glyph moves
//!
//! Surfaces translate these into their native rendering; the TUI draws
//! glyphs with ratatui styles.
//!
//! ```text
//! Conductor (owns EmotionState per persona)
//!     │  ConductorMessage::Emotion { persona, emotion }
//!     ▼
//! Surface (looks up icon / color / animation, restarts frame 0 on change)
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Emotion tags a persona can display
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Emotion {
    /// Working something out
    Thinking,
    /// Eager about a new topic
    Excited,
    /// Not following the other side
    Confused,
    /// Nodding along
    Agreeing,
    /// Shaking head
    Disagreeing,
    /// A lightbulb moment
    Insight,
    /// Watching the speaker
    Observing,
    /// Delivering a statement
    Speaking,
    /// Friendly
    Smiling,
    /// Amused
    Laughing,
    /// Caught off guard
    Surprised,
    /// Quietly mulling
    Contemplating,
    /// Looking for the right idea
    Searching,
    /// Sudden breakthrough
    Eureka,
    /// Concentrating hard
    Focused,
    /// Taking the argument apart
    Analyzing,
    /// Turning an idea over
    Pondering,
}

impl Emotion {
    /// Every emotion, in declaration order
    pub const ALL: [Emotion; 17] = [
        Emotion::Thinking,
        Emotion::Excited,
        Emotion::Confused,
        Emotion::Agreeing,
        Emotion::Disagreeing,
        Emotion::Insight,
        Emotion::Observing,
        Emotion::Speaking,
        Emotion::Smiling,
        Emotion::Laughing,
        Emotion::Surprised,
        Emotion::Contemplating,
        Emotion::Searching,
        Emotion::Eureka,
        Emotion::Focused,
        Emotion::Analyzing,
        Emotion::Pondering,
    ];

    /// Reactions a listener may show once the speaker has finished
    pub const LISTENER_REACTIONS: [Emotion; 3] =
        [Emotion::Agreeing, Emotion::Pondering, Emotion::Surprised];

    /// Lowercase tag name
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Thinking => "thinking",
            Self::Excited => "excited",
            Self::Confused => "confused",
            Self::Agreeing => "agreeing",
            Self::Disagreeing => "disagreeing",
            Self::Insight => "insight",
            Self::Observing => "observing",
            Self::Speaking => "speaking",
            Self::Smiling => "smiling",
            Self::Laughing => "laughing",
            Self::Surprised => "surprised",
            Self::Contemplating => "contemplating",
            Self::Searching => "searching",
            Self::Eureka => "eureka",
            Self::Focused => "focused",
            Self::Analyzing => "analyzing",
            Self::Pondering => "pondering",
        }
    }

    /// Indicator glyph (single terminal cell wide)
    #[must_use]
    pub fn icon(self) -> char {
        match self {
            // Pondering reuses the thinking glyph
            Self::Thinking | Self::Pondering => '∴',
            Self::Excited => '✦',
            Self::Confused => '?',
            Self::Agreeing => '✓',
            Self::Disagreeing => '✗',
            Self::Insight => '✧',
            Self::Observing => '◉',
            Self::Speaking => '❝',
            Self::Smiling => '☺',
            Self::Laughing => '☻',
            Self::Surprised => '!',
            Self::Contemplating => '≈',
            Self::Searching => '⌕',
            Self::Eureka => 'ϟ',
            Self::Focused => '◎',
            Self::Analyzing => '⌖',
        }
    }

    /// Indicator colour
    #[must_use]
    pub fn color(self) -> EmotionColor {
        match self {
            Self::Thinking | Self::Speaking => EmotionColor::Blue,
            Self::Excited => EmotionColor::Yellow,
            Self::Confused => EmotionColor::Orange,
            Self::Agreeing => EmotionColor::Green,
            Self::Disagreeing | Self::Focused => EmotionColor::Red,
            Self::Insight => EmotionColor::Purple,
            Self::Observing => EmotionColor::Gray,
            Self::Smiling => EmotionColor::LightGreen,
            Self::Laughing => EmotionColor::LightYellow,
            Self::Surprised => EmotionColor::LightOrange,
            Self::Contemplating => EmotionColor::Amber,
            Self::Searching => EmotionColor::Indigo,
            Self::Eureka => EmotionColor::DeepYellow,
            Self::Analyzing => EmotionColor::Violet,
            Self::Pondering => EmotionColor::Slate,
        }
    }

    /// Indicator animation
    #[must_use]
    pub fn animation(self) -> EmotionAnimation {
        match self {
            Self::Thinking
            | Self::Agreeing
            | Self::Observing
            | Self::Speaking
            | Self::Contemplating
            | Self::Focused
            | Self::Pondering => EmotionAnimation::Pulse,
            Self::Excited | Self::Laughing | Self::Eureka => EmotionAnimation::Bounce,
            Self::Confused | Self::Insight | Self::Surprised => EmotionAnimation::Ping,
            Self::Disagreeing => EmotionAnimation::Shake,
            Self::Searching | Self::Analyzing => EmotionAnimation::Spin,
            Self::Smiling => EmotionAnimation::Still,
        }
    }

    /// How the avatar badge itself reacts to this emotion
    #[must_use]
    pub fn avatar_scale(self) -> AvatarScale {
        match self {
            Self::Excited => AvatarScale::Enlarged,
            Self::Confused => AvatarScale::Shrunk,
            Self::Surprised => AvatarScale::Startled,
            _ => AvatarScale::Normal,
        }
    }

    /// Extra decoration drawn around the avatar badge
    #[must_use]
    pub fn avatar_overlay(self) -> Option<AvatarOverlay> {
        match self {
            Self::Eureka => Some(AvatarOverlay::Ring),
            Self::Excited => Some(AvatarOverlay::Glow),
            _ => None,
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Indicator palette
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmotionColor {
    /// Calm blue
    Blue,
    /// Bright yellow
    Yellow,
    /// Warning orange
    Orange,
    /// Approving green
    Green,
    /// Intense red
    Red,
    /// Insight purple
    Purple,
    /// Neutral gray
    Gray,
    /// Soft green
    LightGreen,
    /// Soft yellow
    LightYellow,
    /// Soft orange
    LightOrange,
    /// Coffee amber
    Amber,
    /// Deep indigo
    Indigo,
    /// Saturated yellow
    DeepYellow,
    /// Violet
    Violet,
    /// Muted slate
    Slate,
}

impl EmotionColor {
    /// RGB value of this colour
    #[must_use]
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Blue => [0x3b, 0x82, 0xf6],
            Self::Yellow => [0xea, 0xb3, 0x08],
            Self::Orange => [0xf9, 0x73, 0x16],
            Self::Green => [0x22, 0xc5, 0x5e],
            Self::Red => [0xef, 0x44, 0x44],
            Self::Purple => [0xa8, 0x55, 0xf7],
            Self::Gray => [0x6b, 0x72, 0x80],
            Self::LightGreen => [0x4a, 0xde, 0x80],
            Self::LightYellow => [0xfa, 0xcc, 0x15],
            Self::LightOrange => [0xfb, 0x92, 0x3c],
            Self::Amber => [0xd9, 0x77, 0x06],
            Self::Indigo => [0x63, 0x66, 0xf1],
            Self::DeepYellow => [0xca, 0x8a, 0x04],
            Self::Violet => [0x8b, 0x5c, 0xf6],
            Self::Slate => [0x64, 0x74, 0x8b],
        }
    }
}

/// Looping motion applied to an indicator glyph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmotionAnimation {
    /// Fade between bright and dim
    Pulse,
    /// Hop up and down
    Bounce,
    /// Expanding ripple
    Ping,
    /// Side-to-side jitter
    Shake,
    /// Rotation
    Spin,
    /// No motion
    Still,
}

impl EmotionAnimation {
    /// Number of distinct frames in one cycle
    #[must_use]
    pub fn frame_count(self) -> usize {
        match self {
            Self::Pulse | Self::Bounce => 2,
            Self::Ping => 3,
            Self::Shake | Self::Spin => 4,
            Self::Still => 1,
        }
    }

    /// Duration of one full cycle
    #[must_use]
    pub fn cycle(self) -> Duration {
        match self {
            Self::Shake => Duration::from_millis(500),
            Self::Pulse => Duration::from_millis(2000),
            Self::Bounce | Self::Ping | Self::Spin | Self::Still => Duration::from_millis(1000),
        }
    }

    /// Frame index after `elapsed` time since the animation (re)started
    #[must_use]
    pub fn frame_at(self, elapsed: Duration) -> usize {
        let frames = self.frame_count();
        if frames <= 1 {
            return 0;
        }
        let cycle_ms = self.cycle().as_millis().max(1);
        let into_cycle = elapsed.as_millis() % cycle_ms;
        let frame_ms = cycle_ms / frames as u128;
        ((into_cycle / frame_ms.max(1)) as usize).min(frames - 1)
    }
}

/// Size hint for the avatar badge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AvatarScale {
    /// Unchanged
    #[default]
    Normal,
    /// Slightly larger (excited)
    Enlarged,
    /// Slightly smaller (confused)
    Shrunk,
    /// Noticeably larger (surprised)
    Startled,
}

/// Decoration drawn around the avatar badge
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvatarOverlay {
    /// Blinking ring (eureka)
    Ring,
    /// Soft glow (excited)
    Glow,
}

/// Indicator size
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IndicatorSize {
    /// Inline next to compact labels
    Small,
    /// Message headers
    #[default]
    Medium,
    /// Persona profile cards
    Large,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_contains_every_variant_once() {
        let mut labels: Vec<_> = Emotion::ALL.iter().map(|e| e.label()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 17);
    }

    #[test]
    fn test_pondering_shares_thinking_icon() {
        assert_eq!(Emotion::Pondering.icon(), Emotion::Thinking.icon());
        assert_ne!(Emotion::Pondering.color(), Emotion::Thinking.color());
    }

    #[test]
    fn test_smiling_is_the_only_still_emotion() {
        let still: Vec<_> = Emotion::ALL
            .iter()
            .filter(|e| e.animation() == EmotionAnimation::Still)
            .collect();
        assert_eq!(still, vec![&Emotion::Smiling]);
    }

    #[test]
    fn test_listener_reactions() {
        assert_eq!(
            Emotion::LISTENER_REACTIONS,
            [Emotion::Agreeing, Emotion::Pondering, Emotion::Surprised]
        );
    }

    #[test]
    fn test_frame_at_starts_at_zero_and_wraps() {
        for anim in [
            EmotionAnimation::Pulse,
            EmotionAnimation::Bounce,
            EmotionAnimation::Ping,
            EmotionAnimation::Shake,
            EmotionAnimation::Spin,
            EmotionAnimation::Still,
        ] {
            assert_eq!(anim.frame_at(Duration::ZERO), 0);
            assert_eq!(anim.frame_at(anim.cycle()), 0);
            assert!(anim.frame_at(Duration::from_millis(1234)) < anim.frame_count());
        }
    }

    #[test]
    fn test_spin_advances_each_quarter() {
        let spin = EmotionAnimation::Spin;
        assert_eq!(spin.frame_at(Duration::from_millis(0)), 0);
        assert_eq!(spin.frame_at(Duration::from_millis(250)), 1);
        assert_eq!(spin.frame_at(Duration::from_millis(500)), 2);
        assert_eq!(spin.frame_at(Duration::from_millis(999)), 3);
    }

    #[test]
    fn test_avatar_effects() {
        assert_eq!(Emotion::Excited.avatar_scale(), AvatarScale::Enlarged);
        assert_eq!(Emotion::Confused.avatar_scale(), AvatarScale::Shrunk);
        assert_eq!(Emotion::Surprised.avatar_scale(), AvatarScale::Startled);
        assert_eq!(Emotion::Eureka.avatar_overlay(), Some(AvatarOverlay::Ring));
        assert_eq!(Emotion::Excited.avatar_overlay(), Some(AvatarOverlay::Glow));
        assert_eq!(Emotion::Thinking.avatar_overlay(), None);
    }
}
