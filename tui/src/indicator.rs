//! Emotion Indicator
//!
//! Renders a persona's emotion as a glyph with colour and a looping motion,
//! plus the avatar badge that reacts to the same emotion. Both are pure
//! functions of (emotion, size, time since the emotion appeared), so a
//! change of emotion restarts the animation simply by resetting the clock.

use std::time::Duration;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;
use unicode_width::UnicodeWidthStr;

use duel_core::{
    AvatarOverlay, AvatarScale, Emotion, EmotionAnimation, EmotionColor, IndicatorSize, Persona,
};

use crate::theme::{dimmed, emotion_color, persona_color, ACCENT_AMBER};

/// Ripple rings drawn around a pinging glyph, one per frame
const PING_RINGS: [(&str, &str); 3] = [("", ""), ("·", "·"), ("∘", "∘")];

/// Spinner drawn beside a spinning glyph, one per frame
const SPIN_FRAMES: [char; 4] = ['◐', '◓', '◑', '◒'];

/// Horizontal padding per shake frame (left, right)
const SHAKE_PADDING: [(usize, usize); 4] = [(1, 1), (2, 0), (1, 1), (0, 2)];

/// One animation frame of an indicator
#[derive(Clone, Debug, PartialEq)]
pub struct IndicatorFrame {
    /// What to draw
    pub line: Line<'static>,
    /// Rows the glyph is lifted (bounce)
    pub lift: u16,
}

/// Compute the frame shown `elapsed` after `emotion` appeared
///
/// Returns `None` when there is no emotion; nothing is drawn.
pub fn indicator_frame(
    emotion: Option<Emotion>,
    size: IndicatorSize,
    elapsed: Duration,
) -> Option<IndicatorFrame> {
    let emotion = emotion?;
    let animation = emotion.animation();
    let frame = animation.frame_at(elapsed);
    let base = emotion_color(emotion.color());

    let mut glyph_style = Style::default().fg(base);
    if size != IndicatorSize::Small {
        glyph_style = glyph_style.add_modifier(Modifier::BOLD);
    }

    let glyph = emotion.icon().to_string();
    let mut spans = Vec::new();
    let mut lift = 0;

    match animation {
        EmotionAnimation::Pulse => {
            if frame == 1 {
                glyph_style = glyph_style.fg(dimmed(base));
            }
            spans.push(Span::styled(glyph, glyph_style));
        }
        EmotionAnimation::Bounce => {
            lift = u16::try_from(frame).unwrap_or(0);
            spans.push(Span::styled(glyph, glyph_style));
        }
        EmotionAnimation::Ping => {
            let (left, right) = PING_RINGS[frame % PING_RINGS.len()];
            let ring = Style::default().fg(dimmed(base));
            spans.push(Span::styled(format!("{left:>1}"), ring));
            spans.push(Span::styled(glyph, glyph_style));
            spans.push(Span::styled(format!("{right:<1}"), ring));
        }
        EmotionAnimation::Shake => {
            let (left, right) = SHAKE_PADDING[frame % SHAKE_PADDING.len()];
            spans.push(Span::raw(" ".repeat(left)));
            spans.push(Span::styled(glyph, glyph_style));
            spans.push(Span::raw(" ".repeat(right)));
        }
        EmotionAnimation::Spin => {
            spans.push(Span::styled(glyph, glyph_style));
            spans.push(Span::styled(
                SPIN_FRAMES[frame % SPIN_FRAMES.len()].to_string(),
                Style::default().fg(base),
            ));
        }
        EmotionAnimation::Still => {
            spans.push(Span::styled(glyph, glyph_style));
        }
    }

    match size {
        IndicatorSize::Small => {}
        IndicatorSize::Medium => {
            spans.push(Span::styled(
                format!(" {}", emotion.label()),
                Style::default().fg(base),
            ));
        }
        IndicatorSize::Large => {
            spans.insert(0, Span::styled("[ ", Style::default().fg(base)));
            spans.push(Span::styled(
                format!(" {} ]", emotion.label()),
                Style::default().fg(base),
            ));
        }
    }

    Some(IndicatorFrame {
        line: Line::from(spans),
        lift,
    })
}

/// The persona badge (initials) with the emotion's scale and overlay applied
pub fn badge_line(persona: Persona, emotion: Option<Emotion>, elapsed: Duration) -> Line<'static> {
    let mut style = Style::default()
        .fg(persona_color(persona))
        .add_modifier(Modifier::BOLD);

    let scale = emotion.map_or(AvatarScale::Normal, Emotion::avatar_scale);
    style = match scale {
        AvatarScale::Normal => style,
        AvatarScale::Enlarged => style.add_modifier(Modifier::REVERSED),
        AvatarScale::Shrunk => style.remove_modifier(Modifier::BOLD).add_modifier(Modifier::DIM),
        AvatarScale::Startled => style.add_modifier(Modifier::REVERSED | Modifier::UNDERLINED),
    };

    let initials = Span::styled(format!(" {} ", persona.initials()), style);
    match emotion.and_then(Emotion::avatar_overlay) {
        None => Line::from(vec![Span::raw(" "), initials, Span::raw(" ")]),
        Some(AvatarOverlay::Ring) => {
            // Ring blinks on the emotion's own animation clock
            let lit = emotion.map_or(0, |e| e.animation().frame_at(elapsed)) == 0;
            let ring = if lit {
                Style::default().fg(ACCENT_AMBER).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(dimmed(ACCENT_AMBER))
            };
            Line::from(vec![
                Span::styled("(", ring),
                initials,
                Span::styled(")", ring),
            ])
        }
        Some(AvatarOverlay::Glow) => {
            let glow = Style::default().fg(emotion_color(
                emotion.map_or(EmotionColor::Yellow, Emotion::color),
            ));
            Line::from(vec![
                Span::styled("✦", glow),
                initials,
                Span::styled("✦", glow),
            ])
        }
    }
}

/// Widget: a persona badge followed by its emotion indicator
pub struct EmotionIndicator {
    persona: Persona,
    emotion: Option<Emotion>,
    size: IndicatorSize,
    elapsed: Duration,
}

impl EmotionIndicator {
    /// Indicator for `persona` showing `emotion`, `elapsed` into its animation
    pub fn new(persona: Persona, emotion: Option<Emotion>, elapsed: Duration) -> Self {
        Self {
            persona,
            emotion,
            size: IndicatorSize::default(),
            elapsed,
        }
    }

    /// Choose the indicator size
    #[must_use]
    pub fn size(mut self, size: IndicatorSize) -> Self {
        self.size = size;
        self
    }
}

impl Widget for EmotionIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Bounce needs a spare row above the resting line
        let rest_y = if area.height >= 2 { area.y + 1 } else { area.y };

        let badge = badge_line(self.persona, self.emotion, self.elapsed);
        let badge_width = u16::try_from(badge.width()).unwrap_or(u16::MAX);
        buf.set_line(area.x, rest_y, &badge, area.width);

        let Some(frame) = indicator_frame(self.emotion, self.size, self.elapsed) else {
            return;
        };
        let x = area.x.saturating_add(badge_width).saturating_add(1);
        if x >= area.right() {
            return;
        }
        let y = rest_y.saturating_sub(frame.lift).max(area.y);
        buf.set_line(x, y, &frame.line, area.right() - x);
    }
}

/// Width in cells of a rendered line
pub fn line_width(line: &Line<'_>) -> usize {
    line.spans.iter().map(|s| s.content.as_ref().width()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_no_emotion_renders_nothing() {
        assert_eq!(
            indicator_frame(None, IndicatorSize::Medium, Duration::ZERO),
            None
        );
    }

    #[test]
    fn test_small_indicator_is_glyph_only() {
        let frame =
            indicator_frame(Some(Emotion::Smiling), IndicatorSize::Small, Duration::ZERO).unwrap();
        assert_eq!(text(&frame.line), "☺");
        assert_eq!(frame.lift, 0);
    }

    #[test]
    fn test_medium_and_large_add_label() {
        let medium = indicator_frame(
            Some(Emotion::Smiling),
            IndicatorSize::Medium,
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(text(&medium.line), "☺ smiling");

        let large =
            indicator_frame(Some(Emotion::Smiling), IndicatorSize::Large, Duration::ZERO).unwrap();
        assert_eq!(text(&large.line), "[ ☺ smiling ]");
    }

    #[test]
    fn test_pondering_shares_glyph_but_not_colour() {
        let thinking = indicator_frame(
            Some(Emotion::Thinking),
            IndicatorSize::Small,
            Duration::ZERO,
        )
        .unwrap();
        let pondering = indicator_frame(
            Some(Emotion::Pondering),
            IndicatorSize::Small,
            Duration::ZERO,
        )
        .unwrap();
        assert_eq!(text(&thinking.line), text(&pondering.line));
        assert_ne!(thinking.line.spans[0].style, pondering.line.spans[0].style);
    }

    #[test]
    fn test_bounce_lifts_on_second_frame() {
        let rest =
            indicator_frame(Some(Emotion::Excited), IndicatorSize::Small, Duration::ZERO).unwrap();
        let up = indicator_frame(
            Some(Emotion::Excited),
            IndicatorSize::Small,
            Duration::from_millis(600),
        )
        .unwrap();
        assert_eq!(rest.lift, 0);
        assert_eq!(up.lift, 1);
    }

    #[test]
    fn test_shake_keeps_constant_width() {
        let widths: Vec<usize> = (0..4)
            .map(|i| {
                let frame = indicator_frame(
                    Some(Emotion::Disagreeing),
                    IndicatorSize::Small,
                    Duration::from_millis(i * 125),
                )
                .unwrap();
                line_width(&frame.line)
            })
            .collect();
        assert_eq!(widths, vec![3, 3, 3, 3]);
    }

    #[test]
    fn test_pulse_dims_second_half() {
        let bright = indicator_frame(
            Some(Emotion::Thinking),
            IndicatorSize::Small,
            Duration::ZERO,
        )
        .unwrap();
        let dim = indicator_frame(
            Some(Emotion::Thinking),
            IndicatorSize::Small,
            Duration::from_millis(1500),
        )
        .unwrap();
        assert_ne!(bright.line.spans[0].style, dim.line.spans[0].style);
    }

    #[test]
    fn test_badge_overlays() {
        assert_eq!(text(&badge_line(Persona::Levin, None, Duration::ZERO)), "  ML  ");
        assert_eq!(
            text(&badge_line(
                Persona::Levin,
                Some(Emotion::Eureka),
                Duration::ZERO
            )),
            "( ML )"
        );
        assert_eq!(
            text(&badge_line(
                Persona::Barandes,
                Some(Emotion::Excited),
                Duration::ZERO
            )),
            "✦ JB ✦"
        );
    }

    #[test]
    fn test_badge_scale_modifiers() {
        let startled = badge_line(Persona::Levin, Some(Emotion::Surprised), Duration::ZERO);
        assert!(startled.spans[1]
            .style
            .add_modifier
            .contains(Modifier::UNDERLINED));

        let shrunk = badge_line(Persona::Levin, Some(Emotion::Confused), Duration::ZERO);
        assert!(shrunk.spans[1].style.add_modifier.contains(Modifier::DIM));
    }

    #[test]
    fn test_widget_renders_badge_and_glyph() {
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        EmotionIndicator::new(Persona::Levin, Some(Emotion::Smiling), Duration::ZERO)
            .size(IndicatorSize::Small)
            .render(area, &mut buf);

        let row: String = (0..area.width)
            .map(|x| buf[(x, 1)].symbol().to_string())
            .collect();
        assert!(row.starts_with("  ML   ☺"), "row was {row:?}");
    }
}
