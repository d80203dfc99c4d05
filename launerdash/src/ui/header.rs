//! Top header with backend address and session countdown.

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders},
};

use crate::ui::util::fmt_remaining;

pub fn draw_header(f: &mut ratatui::Frame<'_>, area: Rect, base: &str, remaining_ms: Option<i64>) {
    let session = remaining_ms
        .map(|ms| format!("session: {}", fmt_remaining(ms)))
        .unwrap_or_else(|| "session: expired".into());
    let title = format!(
        "launerdash — {base} | {session}  ('r' real-time, 'l' logout, 'q' quit)"
    );
    f.render_widget(Block::default().title(title).borders(Borders::BOTTOM), area);
}
