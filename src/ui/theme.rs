use crate::core::presentation::{emotion_color, ProgressBand};
use ratatui::style::{Color, Modifier, Style};

/// Styles shared by every screen.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub accent: Style,
    pub muted: Style,
    pub error: Style,
    pub success: Style,
    pub selection: Style,
    pub user_text: Style,
    pub assistant_text: Style,
    pub input_border: Style,
    pub input_border_focused: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Rgb(0xC4, 0xB5, 0xFD))
                .add_modifier(Modifier::BOLD),
            accent: Style::default().fg(Color::Rgb(0xA7, 0x8B, 0xFA)),
            muted: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::LightRed),
            success: Style::default().fg(Color::LightGreen),
            selection: Style::default()
                .bg(Color::Rgb(0x4C, 0x1D, 0x95))
                .add_modifier(Modifier::BOLD),
            user_text: Style::default().fg(Color::Cyan),
            assistant_text: Style::default().fg(Color::White),
            input_border: Style::default().fg(Color::DarkGray),
            input_border_focused: Style::default().fg(Color::Rgb(0xA7, 0x8B, 0xFA)),
        }
    }
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        3 => Some(Color::Rgb(
            channel(&hex[0..1].repeat(2))?,
            channel(&hex[1..2].repeat(2))?,
            channel(&hex[2..3].repeat(2))?,
        )),
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        _ => None,
    }
}

pub fn emotion_style(emotion: &str) -> Style {
    Style::default().fg(parse_hex_color(emotion_color(emotion)).unwrap_or(Color::Gray))
}

pub fn band_style(level: f64) -> Style {
    let band = ProgressBand::for_level(level);
    Style::default().fg(parse_hex_color(band.hex()).unwrap_or(Color::Gray))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_hex() {
        assert_eq!(parse_hex_color("#FFD700"), Some(Color::Rgb(0xFF, 0xD7, 0x00)));
        assert_eq!(parse_hex_color("#abc"), Some(Color::Rgb(0xAA, 0xBB, 0xCC)));
        assert_eq!(parse_hex_color("FFD700"), None);
        assert_eq!(parse_hex_color("#12345"), None);
    }

    #[test]
    fn emotions_use_their_palette_colour() {
        assert_eq!(
            emotion_style("sadness").fg,
            Some(Color::Rgb(0x41, 0x69, 0xE1))
        );
        assert_eq!(emotion_style("unknown").fg, Some(Color::Rgb(0x80, 0x80, 0x80)));
    }
}
