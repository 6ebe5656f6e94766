//! Theme and Colors
//!
//! Token Masq's terminal palette: phosphor green on black, with a dim gray
//! for chrome and a muted red for errors.

use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Base Palette
// ============================================================================

/// Screen background
pub const BACKGROUND: Color = Color::Rgb(0, 0, 0);

/// Phosphor green (input and results)
pub const PHOSPHOR: Color = Color::Rgb(80, 250, 123);

/// Bright text (title)
pub const BRIGHT: Color = Color::Rgb(235, 235, 235);

/// Accent for in-progress status
pub const ACCENT: Color = Color::Rgb(139, 233, 253);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 85, 85);

// ============================================================================
// Styles
// ============================================================================

/// Title banner
pub fn title_style() -> Style {
    Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD)
}

/// Text typed by the user
pub fn input_style() -> Style {
    Style::default().fg(PHOSPHOR)
}

/// Placeholder shown in an empty input
pub fn placeholder_style() -> Style {
    Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC)
}

/// Conversion result
pub fn output_style() -> Style {
    Style::default().fg(PHOSPHOR).add_modifier(Modifier::BOLD)
}

/// Borders and hints
pub fn chrome_style() -> Style {
    Style::default().fg(DIM_GRAY)
}

/// Error messages
pub fn error_style() -> Style {
    Style::default().fg(ERROR_RED)
}

/// Processing indicator
pub fn progress_style() -> Style {
    Style::default().fg(ACCENT)
}

/// Blend `color` towards the background by `opacity` (0.0 = background, 1.0 = color)
///
/// Non-RGB colors cannot be blended and snap between dark gray and themselves.
#[must_use]
pub fn fade(color: Color, opacity: f32) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    match (color, BACKGROUND) {
        (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => Color::Rgb(
            mix(br, r, opacity),
            mix(bg, g, opacity),
            mix(bb, b, opacity),
        ),
        _ if opacity < 0.5 => Color::DarkGray,
        _ => color,
    }
}

fn mix(from: u8, to: u8, t: f32) -> u8 {
    (f32::from(from) + (f32::from(to) - f32::from(from)) * t).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_endpoints() {
        assert_eq!(fade(PHOSPHOR, 1.0), PHOSPHOR);
        assert_eq!(fade(PHOSPHOR, 0.0), BACKGROUND);
        assert_eq!(fade(PHOSPHOR, 7.0), PHOSPHOR);
    }

    #[test]
    fn test_fade_midpoint() {
        assert_eq!(fade(Color::Rgb(200, 100, 0), 0.5), Color::Rgb(100, 50, 0));
    }

    #[test]
    fn test_fade_named_color() {
        assert_eq!(fade(Color::Green, 0.2), Color::DarkGray);
        assert_eq!(fade(Color::Green, 0.8), Color::Green);
    }
}
