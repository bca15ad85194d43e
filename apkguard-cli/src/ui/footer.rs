use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::app::{AppMode, ViewMode};

use super::theme::Theme;

/// Footer widget showing keyboard hints
pub struct Footer<'a> {
    mode: AppMode,
    view_mode: ViewMode,
    scanning: bool,
    theme: &'a Theme,
}

impl<'a> Footer<'a> {
    pub fn new(mode: AppMode, view_mode: ViewMode, scanning: bool, theme: &'a Theme) -> Self {
        Self {
            mode,
            view_mode,
            scanning,
            theme,
        }
    }
}

impl Widget for Footer<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 20 || area.height < 1 {
            return;
        }

        let hints: Vec<(&str, &str)> = match self.mode {
            AppMode::Browsing => match self.view_mode {
                ViewMode::Uploads => {
                    let mut hints = vec![("Tab", "Dashboard"), ("↑↓", "Navigate")];
                    if self.scanning {
                        hints.push(("x", "Cancel scan"));
                    } else {
                        hints.push(("Enter", "Scan"));
                    }
                    hints.extend([
                        ("a", "Add"),
                        ("d", "Remove"),
                        ("C", "Clear"),
                        ("?", "Help"),
                        ("q", "Quit"),
                    ]);
                    hints
                }
                ViewMode::Dashboard => vec![("Tab", "Uploads"), ("?", "Help"), ("q", "Quit")],
            },
            AppMode::Help => vec![("Esc", "Close help")],
            AppMode::AddFile => vec![("Enter", "Add"), ("Esc", "Cancel")],
        };

        let key_style = Style::default()
            .fg(self.theme.fg)
            .add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(self.theme.fg_dim);
        let sep_style = Style::default().fg(self.theme.border);

        let mut x = area.x + 1;
        for (i, (key, desc)) in hints.iter().enumerate() {
            buf.set_string(x, area.y, *key, key_style);
            x += key.chars().count() as u16 + 1;

            buf.set_string(x, area.y, *desc, desc_style);
            x += desc.len() as u16;

            if i < hints.len() - 1 {
                buf.set_string(x, area.y, "  │  ", sep_style);
                x += 5;
            }

            if x >= area.x + area.width - 5 {
                break;
            }
        }
    }
}
