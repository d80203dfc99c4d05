//! Shared UI theme constants.

use ratatui::style::Color;

pub const ACCENT: Color = Color::Rgb(235, 130, 32);
pub const USED: Color = Color::Rgb(235, 130, 32);
pub const MUTED: Color = Color::Rgb(170, 170, 180);

// Line colors, cycled per series key
pub const SERIES: [Color; 8] = [
    Color::Cyan,
    Color::Magenta,
    Color::Green,
    Color::Yellow,
    Color::LightBlue,
    Color::LightRed,
    Color::White,
    Color::Rgb(235, 130, 32),
];

pub fn series_color(i: usize) -> Color {
    SERIES[i % SERIES.len()]
}
