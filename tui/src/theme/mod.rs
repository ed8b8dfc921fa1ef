//! Theme and Colors
//!
//! The duel palette: one signature colour per philosopher, the emotion
//! indicator colours, and a handful of UI accents.

use ratatui::style::Color;

use duel_core::{EmotionColor, NotifyLevel, Persona};

// ============================================================================
// Persona Colors
// ============================================================================

/// Levin's signature emerald
pub const LEVIN_EMERALD: Color = Color::Rgb(16, 185, 129);

/// Barandes' signature blue
pub const BARANDES_BLUE: Color = Color::Rgb(59, 130, 246);

/// Signature colour of a persona
pub fn persona_color(persona: Persona) -> Color {
    match persona {
        Persona::Levin => LEVIN_EMERALD,
        Persona::Barandes => BARANDES_BLUE,
    }
}

// ============================================================================
// Emotion Colors
// ============================================================================

/// Indicator colour for the terminal
pub fn emotion_color(color: EmotionColor) -> Color {
    rgb(color.rgb())
}

/// A dimmed variant used on the off-frames of a pulse
pub fn dimmed(color: Color) -> Color {
    match color {
        Color::Rgb(r, g, b) => Color::Rgb(r / 2, g / 2, b / 2),
        other => other,
    }
}

/// Convert an RGB triple
pub fn rgb([r, g, b]: [u8; 3]) -> Color {
    Color::Rgb(r, g, b)
}

// ============================================================================
// UI Colors
// ============================================================================

/// User remarks
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Highlighted selection
pub const ACCENT_AMBER: Color = Color::Rgb(245, 158, 11);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Warning orange
pub const WARNING_ORANGE: Color = Color::Rgb(251, 146, 60);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Whiteboard paper
pub const PAPER_WHITE: Color = Color::Rgb(255, 255, 255);

/// Status line colour for a notification level
pub fn notify_color(level: NotifyLevel) -> Color {
    match level {
        NotifyLevel::Info => DIM_GRAY,
        NotifyLevel::Warning => WARNING_ORANGE,
        NotifyLevel::Error => ERROR_RED,
        NotifyLevel::Success => SUCCESS_GREEN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persona_colors_match_signature_rgb() {
        for persona in Persona::ALL {
            assert_eq!(persona_color(persona), rgb(persona.signature_rgb()));
        }
    }

    #[test]
    fn test_dimmed_halves_rgb() {
        assert_eq!(dimmed(Color::Rgb(200, 100, 51)), Color::Rgb(100, 50, 25));
        assert_eq!(dimmed(Color::Magenta), Color::Magenta);
    }
}
