use ratatui::style::{Color, Modifier, Style};

use waqt::models::PrayerStatus;

pub const BG: Color = Color::Rgb(18, 16, 14);
pub const SURFACE: Color = Color::Rgb(28, 25, 20);
pub const BORDER: Color = Color::Rgb(55, 48, 36);
pub const TEXT: Color = Color::Rgb(230, 218, 196);
pub const TEXT_DIM: Color = Color::Rgb(130, 118, 96);
pub const GOLD: Color = Color::Rgb(196, 160, 68);
pub const GREEN: Color = Color::Rgb(92, 148, 92);
pub const AMBER: Color = Color::Rgb(210, 138, 60);
pub const EMPTY: Color = Color::Rgb(38, 34, 26);

pub fn base() -> Style {
    Style::default().fg(TEXT).bg(BG)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

pub fn gold() -> Style {
    Style::default().fg(GOLD)
}

pub fn green() -> Style {
    Style::default().fg(GREEN)
}

pub fn amber() -> Style {
    Style::default().fg(AMBER)
}

pub fn bold() -> Style {
    Style::default().fg(TEXT).add_modifier(Modifier::BOLD)
}

pub fn surface() -> Style {
    Style::default().fg(TEXT).bg(SURFACE)
}

pub fn border() -> Style {
    Style::default().fg(BORDER)
}

/// Gauge fill over the empty track colour.
pub fn gauge() -> Style {
    Style::default().fg(GOLD).bg(EMPTY)
}

/// Icon and style for a waypoint row.
pub fn status_marker(status: PrayerStatus) -> (&'static str, Style) {
    match status {
        PrayerStatus::Completed => ("●", green()),
        PrayerStatus::Next => ("▶", amber().add_modifier(Modifier::BOLD)),
        PrayerStatus::Pending => ("○", dim()),
    }
}
