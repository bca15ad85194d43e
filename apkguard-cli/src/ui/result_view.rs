use apkguard_core::{ScanResult, format_file_size, risk_label};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};

use super::bar_chart::render_bar;
use super::theme::Theme;

/// Detail panel for a finished scan
pub struct ResultView<'a> {
    result: &'a ScanResult,
    theme: &'a Theme,
}

impl<'a> ResultView<'a> {
    pub fn new(result: &'a ScanResult, theme: &'a Theme) -> Self {
        Self { result, theme }
    }
}

impl Widget for ResultView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let level_color = self.theme.threat_color(self.result.threat_level);
        let block = Block::default()
            .title(format!(" {} ", self.result.file_name))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(level_color))
            .padding(Padding::horizontal(1));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 || inner.width < 30 {
            return;
        }

        let label_style = Style::default().fg(self.theme.fg_dim);
        let value_style = Style::default().fg(self.theme.fg);
        let bold = Style::default()
            .fg(level_color)
            .add_modifier(Modifier::BOLD);

        let mut lines: Vec<Line> = vec![
            Line::pair(
                "Threat",
                format!(
                    "{} ({})",
                    self.result.threat_level.label(),
                    self.result.status.label()
                ),
                bold,
            ),
            Line::Bar {
                label: "Risk",
                value: self.result.risk_score,
                suffix: format!("{} {}", self.result.risk_score, risk_label(self.result.risk_score)),
            },
            Line::pair(
                "Size",
                format_file_size(self.result.file_size),
                value_style,
            ),
            Line::pair(
                "Scanned",
                self.result
                    .scan_time
                    .with_timezone(&chrono::Local)
                    .format("%H:%M:%S")
                    .to_string(),
                value_style,
            ),
            Line::Blank,
            Line::Section("Findings"),
        ];

        if self.result.findings.is_empty() {
            lines.push(Line::Text(
                "No risk factors found".to_string(),
                Style::default().fg(self.theme.green),
            ));
        } else {
            for finding in &self.result.findings {
                lines.push(Line::Text(format!("• {finding}"), value_style));
            }
        }

        let metrics = &self.result.metrics;
        lines.extend([
            Line::Blank,
            Line::Section("Security metrics"),
            Line::pair(
                "Certificate",
                if metrics.certificate_valid { "valid" } else { "INVALID" }.to_string(),
                if metrics.certificate_valid {
                    Style::default().fg(self.theme.green)
                } else {
                    Style::default().fg(self.theme.red)
                },
            ),
            Line::score("Code integrity", metrics.code_integrity),
            Line::score("Permissions", metrics.permission_score),
            Line::score("Network", metrics.network_security),
            Line::score("Data protection", metrics.data_protection),
            Line::Blank,
            Line::Section("Quantum analysis"),
            Line::pair(
                "Signature",
                self.result.quantum.quantum_signature.clone(),
                value_style,
            ),
            Line::score("Entropy", self.result.quantum.entropy_score),
            Line::pair(
                "Resistant",
                if self.result.quantum.quantum_resistant { "yes" } else { "no" }.to_string(),
                value_style,
            ),
        ]);

        let label_width: u16 = 17;
        let bar_width = inner.width.saturating_sub(label_width + 18) as usize;

        for (i, line) in lines.iter().enumerate() {
            if i >= inner.height as usize {
                break;
            }
            let y = inner.y + i as u16;

            match line {
                Line::Blank => {}
                Line::Section(title) => {
                    buf.set_string(
                        inner.x,
                        y,
                        *title,
                        Style::default()
                            .fg(self.theme.blue)
                            .add_modifier(Modifier::BOLD),
                    );
                }
                Line::Text(text, style) => {
                    let text: String = text.chars().take(inner.width as usize).collect();
                    buf.set_string(inner.x, y, &text, *style);
                }
                Line::Pair { label, value, style } => {
                    buf.set_string(inner.x, y, *label, label_style);
                    buf.set_string(inner.x + label_width, y, value, *style);
                }
                Line::Bar {
                    label,
                    value,
                    suffix,
                } => {
                    // Risk bars go red as they fill; score bars go red as they empty
                    let color = if *label == "Risk" {
                        self.theme.risk_color(f64::from(*value))
                    } else {
                        self.theme.risk_color(100.0 - f64::from(*value))
                    };
                    let (bar, color) = render_bar(f64::from(*value), bar_width, color);
                    buf.set_string(inner.x, y, *label, label_style);
                    buf.set_string(inner.x + label_width, y, &bar, Style::default().fg(color));
                    buf.set_string(
                        inner.x + label_width + bar_width as u16 + 1,
                        y,
                        suffix,
                        value_style,
                    );
                }
            }
        }
    }
}

enum Line {
    Blank,
    Section(&'static str),
    Text(String, Style),
    Pair {
        label: &'static str,
        value: String,
        style: Style,
    },
    Bar {
        label: &'static str,
        value: u8,
        suffix: String,
    },
}

impl Line {
    fn pair(label: &'static str, value: String, style: Style) -> Self {
        Line::Pair {
            label,
            value,
            style,
        }
    }

    fn score(label: &'static str, value: u8) -> Self {
        Line::Bar {
            label,
            value,
            suffix: format!("{value:>3}"),
        }
    }
}
