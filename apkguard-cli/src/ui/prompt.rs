use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, Padding, Widget},
};

use super::layout::centered_rect;
use super::theme::Theme;

/// Add-file dialog with a single-line path input
pub struct AddFilePrompt<'a> {
    input: &'a str,
    theme: &'a Theme,
}

impl<'a> AddFilePrompt<'a> {
    pub fn new(input: &'a str, theme: &'a Theme) -> Self {
        Self { input, theme }
    }
}

impl Widget for AddFilePrompt<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = centered_rect(60, 8, area);

        // Clear the area
        Clear.render(dialog_area, buf);

        let block = Block::default()
            .title(" Add APK ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.blue))
            .style(Style::default().bg(self.theme.bg_surface))
            .padding(Padding::uniform(1));

        let inner = block.inner(dialog_area);
        block.render(dialog_area, buf);

        if inner.height < 2 || inner.width < 10 {
            return;
        }

        let text_style = Style::default().fg(self.theme.fg);
        let input_style = Style::default()
            .fg(self.theme.yellow)
            .add_modifier(Modifier::BOLD);
        let key_style = Style::default()
            .fg(self.theme.green)
            .add_modifier(Modifier::BOLD);

        buf.set_string(inner.x, inner.y, "Path to an .apk file:", text_style);

        // Keep the tail of long paths visible, cursor included
        let max_len = (inner.width as usize).saturating_sub(1);
        let count = self.input.chars().count();
        let shown: String = if count > max_len {
            self.input.chars().skip(count - max_len).collect()
        } else {
            self.input.to_string()
        };
        buf.set_string(inner.x, inner.y + 1, format!("{shown}▏"), input_style);

        // Action hints
        let hints_y = inner.y + inner.height.saturating_sub(1);
        buf.set_string(inner.x, hints_y, "[Enter]", key_style);
        buf.set_string(inner.x + 8, hints_y, "Add", text_style);
        buf.set_string(inner.x + 13, hints_y, "[Esc]", key_style);
        buf.set_string(inner.x + 19, hints_y, "Cancel", text_style);
    }
}
