use apkguard_core::format_count;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::{AppState, ViewMode};

use super::progress::progress_indicator;
use super::theme::Theme;

/// Header widget showing title, current view, and status or error
pub struct Header<'a> {
    state: &'a AppState,
    theme: &'a Theme,
}

impl<'a> Header<'a> {
    pub fn new(state: &'a AppState, theme: &'a Theme) -> Self {
        Self { state, theme }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        // Title
        let title = "APKGUARD";
        let title_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);
        buf.set_string(area.x + 1, area.y, title, title_style);

        // Separator
        buf.set_string(
            area.x + 10,
            area.y,
            "─",
            Style::default().fg(self.theme.border),
        );

        let view = match self.state.view_mode {
            ViewMode::Uploads => "Uploads",
            ViewMode::Dashboard => "Threat Dashboard",
        };
        buf.set_string(area.x + 12, area.y, view, Style::default().fg(self.theme.fg));

        // Status (right-aligned); an error takes the slot
        let (status, status_style) = if let Some(err) = &self.state.error_message {
            (
                format!("✗ {err}"),
                Style::default()
                    .fg(self.theme.red)
                    .add_modifier(Modifier::BOLD),
            )
        } else if let Some(session) = &self.state.scan {
            (
                progress_indicator(session, self.state.spinner_frame),
                Style::default().fg(self.theme.yellow),
            )
        } else {
            let scanned = self.state.history.len() as u64;
            (
                format!(
                    "{} files, {} scanned",
                    format_count(self.state.queue.len() as u64),
                    format_count(scanned)
                ),
                Style::default().fg(self.theme.fg_dim),
            )
        };

        let left_edge = area.x + 12 + view.len() as u16 + 2;
        let max_len = (area.x + area.width).saturating_sub(left_edge + 2) as usize;
        let status: String = status.chars().take(max_len).collect();
        let status_x = area.x + area.width - status.chars().count() as u16 - 2;
        buf.set_string(status_x, area.y, &status, status_style);
    }
}
