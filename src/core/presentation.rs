//! Formatting rules shared by every screen.

use crate::api::EmotionPoint;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const NEUTRAL_EMOTION_COLOR: &str = "#808080";

/// Hex colour used to draw an emotion. Unknown emotions are grey.
pub fn emotion_color(emotion: &str) -> &'static str {
    match emotion.trim().to_ascii_lowercase().as_str() {
        "joy" => "#FFD700",
        "sadness" => "#4169E1",
        "anger" => "#DC143C",
        "fear" => "#9932CC",
        "surprise" => "#00CED1",
        "disgust" => "#32CD32",
        "trust" => "#FF69B4",
        "anticipation" => "#FF8C00",
        _ => NEUTRAL_EMOTION_COLOR,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressBand {
    Green,
    Yellow,
    Orange,
    Red,
}

impl ProgressBand {
    /// Band for a 0-100 level.
    pub fn for_level(level: f64) -> Self {
        if level >= 80.0 {
            ProgressBand::Green
        } else if level >= 60.0 {
            ProgressBand::Yellow
        } else if level >= 40.0 {
            ProgressBand::Orange
        } else {
            ProgressBand::Red
        }
    }

    pub fn hex(self) -> &'static str {
        match self {
            ProgressBand::Green => "#22C55E",
            ProgressBand::Yellow => "#EAB308",
            ProgressBand::Orange => "#F97316",
            ProgressBand::Red => "#EF4444",
        }
    }
}

pub fn wellbeing_level(spiritual_level: i64) -> &'static str {
    match spiritual_level {
        90.. => "Thriving",
        80..=89 => "Flourishing",
        70..=79 => "Growing",
        60..=69 => "Developing",
        40..=59 => "Building",
        _ => "Beginning",
    }
}

pub fn initials(full_name: &str) -> String {
    let letters: String = full_name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    if letters.is_empty() {
        "U".to_string()
    } else {
        letters
    }
}

/// `"Jan 5"` style date. Timestamps that do not parse are returned as given.
pub fn format_short_date(timestamp: &str) -> String {
    const SHORT: &str = "%b %-d";
    let raw = timestamp.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format(SHORT).to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format(SHORT).to_string();
    }
    if let Ok(parsed) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return parsed.format(SHORT).to_string();
    }
    timestamp.to_string()
}

/// `HH:MM` for chat bubbles, falling back to the raw text.
pub fn format_time_of_day(timestamp: &str) -> String {
    let raw = timestamp.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%H:%M").to_string();
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%H:%M").to_string();
    }
    timestamp.to_string()
}

pub fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Most recent value of a series as a whole percent, 0 when empty.
pub fn latest_value(points: &[EmotionPoint]) -> i64 {
    points
        .last()
        .map(|point| point.value.round() as i64)
        .unwrap_or(0)
}
