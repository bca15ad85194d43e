use apkguard_core::{FileStatus, UploadedFile, format_file_size};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Borders, Widget},
};

use super::theme::Theme;

/// Upload list: one row per accepted APK with status and risk
pub struct UploadListView<'a> {
    files: &'a [UploadedFile],
    selected_index: usize,
    scroll_offset: usize,
    theme: &'a Theme,
}

impl<'a> UploadListView<'a> {
    pub fn new(
        files: &'a [UploadedFile],
        selected_index: usize,
        scroll_offset: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            files,
            selected_index,
            scroll_offset,
            theme,
        }
    }
}

impl Widget for UploadListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!(" Uploaded Files ({}) ", self.files.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 || inner.width < 30 {
            return;
        }

        if self.files.is_empty() {
            let lines = ["No APK files yet", "press a to add one"];
            for (i, msg) in lines.iter().enumerate() {
                let x = inner.x + inner.width.saturating_sub(msg.len() as u16) / 2;
                let y = inner.y + inner.height / 2 + i as u16;
                if y < inner.y + inner.height {
                    buf.set_string(x, y, *msg, Style::default().fg(self.theme.fg_dim));
                }
            }
            return;
        }

        let status_width: usize = 10;
        let size_width: usize = 10;
        let risk_width: usize = 5;
        let name_width =
            (inner.width as usize).saturating_sub(status_width + size_width + risk_width + 5);

        for (i, file) in self
            .files
            .iter()
            .skip(self.scroll_offset)
            .take(inner.height as usize)
            .enumerate()
        {
            let y = inner.y + i as u16;
            let is_cursor = i + self.scroll_offset == self.selected_index;

            let row_style = if is_cursor {
                Style::default()
                    .bg(self.theme.selection_bg)
                    .fg(self.theme.selection_fg)
            } else {
                Style::default().fg(self.theme.fg).bg(self.theme.bg)
            };
            let cell_style = |color: Color| {
                if is_cursor {
                    row_style
                } else {
                    Style::default().fg(color).bg(self.theme.bg)
                }
            };

            // Clear the row
            buf.set_string(inner.x, y, " ".repeat(inner.width as usize), row_style);

            // Name (truncated with trailing ... if too long)
            let name = if file.name.chars().count() > name_width {
                let keep: String = file.name.chars().take(name_width.saturating_sub(3)).collect();
                format!("{keep}...")
            } else {
                file.name.clone()
            };
            buf.set_string(inner.x + 1, y, &name, row_style);

            let right_x = inner.x + inner.width - (status_width + size_width + risk_width + 3) as u16;

            // Status
            let status = match file.status {
                FileStatus::Scanning => "scanning…",
                other => other.label(),
            };
            buf.set_string(
                right_x,
                y,
                format!("{:<width$}", status, width = status_width),
                cell_style(self.theme.status_color(file.status)),
            );

            // Size
            buf.set_string(
                right_x + status_width as u16 + 1,
                y,
                format!("{:>width$}", format_file_size(file.size_bytes), width = size_width),
                cell_style(self.theme.fg_muted),
            );

            // Risk score once scanned
            if let Some(result) = &file.result {
                buf.set_string(
                    right_x + (status_width + size_width) as u16 + 2,
                    y,
                    format!("{:>3}", result.risk_score),
                    cell_style(self.theme.threat_color(result.threat_level)),
                );
            }
        }
    }
}
