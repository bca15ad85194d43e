use apkguard_core::{PhaseTable, format_percent};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};

use crate::app::ScanSession;

use super::bar_chart::render_bar;
use super::theme::Theme;

/// Braille spinner characters
const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Scan progress panel: current phase, bar, and the phase checklist
pub struct ProgressView<'a> {
    session: &'a ScanSession,
    phases: &'a PhaseTable,
    spinner_frame: usize,
    theme: &'a Theme,
}

impl<'a> ProgressView<'a> {
    pub fn new(
        session: &'a ScanSession,
        phases: &'a PhaseTable,
        spinner_frame: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            session,
            phases,
            spinner_frame,
            theme,
        }
    }
}

impl Widget for ProgressView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Scanning ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .padding(Padding::horizontal(1));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 4 || inner.width < 20 {
            return;
        }

        // Spinner
        let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
        let spinner_style = Style::default()
            .fg(self.theme.blue)
            .add_modifier(Modifier::BOLD);
        buf.set_string(inner.x, inner.y, spinner.to_string(), spinner_style);

        let max_name = inner.width.saturating_sub(2) as usize;
        let name: String = self.session.file_name.chars().take(max_name).collect();
        buf.set_string(
            inner.x + 2,
            inner.y,
            &name,
            Style::default()
                .fg(self.theme.fg)
                .add_modifier(Modifier::BOLD),
        );

        let progress = self.session.progress;
        let phase_line = format!(
            "Phase {}/{}: {}",
            progress.phase_index + 1,
            self.phases.len(),
            self.session.phase_name
        );
        buf.set_string(
            inner.x,
            inner.y + 1,
            &phase_line,
            Style::default().fg(self.theme.fg_dim),
        );

        // Bar + percentage
        let pct = format_percent(progress.percent);
        let bar_width = (inner.width as usize).saturating_sub(pct.len() + 1);
        let (bar, color) = render_bar(progress.percent, bar_width, self.theme.blue);
        buf.set_string(inner.x, inner.y + 2, &bar, Style::default().fg(color));
        buf.set_string(
            inner.x + bar_width as u16 + 1,
            inner.y + 2,
            &pct,
            Style::default().fg(self.theme.fg),
        );

        // Phase checklist
        for (i, phase) in self.phases.phases().iter().enumerate() {
            let y = inner.y + 4 + i as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let (marker, style) = if i < progress.phase_index || progress.is_complete() {
                ("✓", Style::default().fg(self.theme.green))
            } else if i == progress.phase_index {
                ("▸", Style::default().fg(self.theme.yellow))
            } else {
                ("·", Style::default().fg(self.theme.fg_muted))
            };
            buf.set_string(inner.x, y, marker, style);
            buf.set_string(inner.x + 2, y, &phase.name, style);
        }
    }
}

/// Compact progress indicator for the header
pub fn progress_indicator(session: &ScanSession, spinner_frame: usize) -> String {
    let spinner = SPINNER[spinner_frame % SPINNER.len()];
    format!(
        "{} {} {}",
        spinner,
        session.file_name,
        format_percent(session.progress.percent)
    )
}
