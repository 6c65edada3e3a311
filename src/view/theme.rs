use ratatui::style::Color;

use crate::protocol::FeedbackKind;

pub struct Theme {
    pub fg: Color,
    pub accent: Color,    // Blue
    pub success: Color,   // Green
    pub warning: Color,   // Yellow
    pub error: Color,     // Red
    pub info: Color,      // Cyan
    pub muted: Color,     // Grey
    pub border_focused: Color,
    pub border_normal: Color,
    pub gutter: Color,
    pub selection_bg: Color,
    pub bar_bg: Color,
    pub key_bg: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(171, 178, 191),
    accent: Color::Rgb(97, 175, 239),
    success: Color::Rgb(152, 195, 121),
    warning: Color::Rgb(229, 192, 123),
    error: Color::Rgb(224, 108, 117),
    info: Color::Rgb(86, 182, 194),
    muted: Color::Rgb(92, 99, 112),
    border_focused: Color::Rgb(97, 175, 239),
    border_normal: Color::Rgb(92, 99, 112),
    gutter: Color::Rgb(73, 81, 98),
    selection_bg: Color::Rgb(62, 68, 81),
    bar_bg: Color::Rgb(44, 49, 58),
    key_bg: Color::Rgb(92, 99, 112),
};

/// Gauge and verdict color for a score, one per verdict band.
pub fn score_color(score: f64) -> Color {
    if score >= 90.0 {
        DEFAULT_THEME.success
    } else if score >= 70.0 {
        DEFAULT_THEME.accent
    } else if score >= 50.0 {
        DEFAULT_THEME.warning
    } else if score >= 30.0 {
        Color::Rgb(209, 154, 102) // Orange, between warning and error
    } else {
        DEFAULT_THEME.error
    }
}

pub fn feedback_color(kind: FeedbackKind) -> Color {
    match kind {
        FeedbackKind::Error => DEFAULT_THEME.error,
        FeedbackKind::Warning => DEFAULT_THEME.warning,
        FeedbackKind::Success => DEFAULT_THEME.success,
        FeedbackKind::Info => DEFAULT_THEME.info,
    }
}

pub fn feedback_marker(kind: FeedbackKind) -> &'static str {
    match kind {
        FeedbackKind::Error => "✗",
        FeedbackKind::Warning => "⚠",
        FeedbackKind::Success => "✓",
        FeedbackKind::Info => "ℹ",
    }
}
