use apkguard_core::{DashboardSnapshot, ScanHistory, format_count, format_percent};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Padding, Widget},
};

use super::bar_chart::{render_bar, render_columns};
use super::theme::Theme;

/// Live metrics, activity chart, threat feed and scan history
pub struct DashboardView<'a> {
    snapshot: Option<&'a DashboardSnapshot>,
    history: &'a ScanHistory,
    theme: &'a Theme,
}

impl<'a> DashboardView<'a> {
    pub fn new(
        snapshot: Option<&'a DashboardSnapshot>,
        history: &'a ScanHistory,
        theme: &'a Theme,
    ) -> Self {
        Self {
            snapshot,
            history,
            theme,
        }
    }

    fn panel(&self, title: &'static str) -> Block<'static> {
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border))
            .padding(Padding::horizontal(1))
    }

    fn render_metrics(&self, snapshot: &DashboardSnapshot, area: Rect, buf: &mut Buffer) {
        let block = self.panel(" System ");
        let inner = block.inner(area);
        block.render(area, buf);

        let m = &snapshot.metrics;
        let bar_width = inner.width.saturating_sub(22) as usize;
        let rows = [
            ("CPU", m.cpu_usage),
            ("Memory", m.memory_usage),
            ("Disk", m.disk_usage),
            ("Quantum", m.quantum_efficiency),
        ];

        for (i, (label, value)) in rows.iter().enumerate() {
            let y = inner.y + i as u16;
            if y >= inner.y + inner.height {
                return;
            }
            let (bar, color) = render_bar(*value, bar_width, self.theme.risk_color(*value));
            buf.set_string(inner.x, y, *label, Style::default().fg(self.theme.fg_dim));
            buf.set_string(inner.x + 9, y, &bar, Style::default().fg(color));
            buf.set_string(
                inner.x + 10 + bar_width as u16,
                y,
                format_percent(*value),
                Style::default().fg(self.theme.fg),
            );
        }

        let extras = [
            format!("Latency       {:.1} ms", m.network_latency),
            format!("Scan speed    {:.1} s", m.scan_speed),
            format!("Blocked       {}", format_count(m.threats_blocked)),
        ];
        for (i, line) in extras.iter().enumerate() {
            let y = inner.y + rows.len() as u16 + 1 + i as u16;
            if y >= inner.y + inner.height {
                return;
            }
            buf.set_string(inner.x, y, line, Style::default().fg(self.theme.fg));
        }
    }

    fn render_live(&self, snapshot: &DashboardSnapshot, area: Rect, buf: &mut Buffer) {
        let block = self.panel(" Threat Intelligence ");
        let inner = block.inner(area);
        block.render(area, buf);

        let live = snapshot.live;
        let threat = snapshot.threat();
        let severity = Style::default()
            .fg(self.theme.threat_color(threat.severity))
            .add_modifier(Modifier::BOLD);
        let value = Style::default().fg(self.theme.fg);
        let dim = Style::default().fg(self.theme.fg_dim);

        let lines: [(String, Style); 8] = [
            (format!("Scans today        {}", format_count(live.scans_today)), value),
            (format!("Threats blocked    {}", format_count(live.threats_blocked)), value),
            (
                format!("Quantum detections {}", format_count(live.quantum_detections)),
                value,
            ),
            (String::new(), value),
            (format!("{} [{}]", threat.name, threat.severity.label()), severity),
            (threat.kind.to_string(), value),
            (threat.description.to_string(), dim),
            (
                format!("{} apps affected · {}", format_count(threat.affected_apps.into()), threat.origin),
                dim,
            ),
        ];

        for (i, (text, style)) in lines.iter().enumerate() {
            if i >= inner.height as usize {
                break;
            }
            let text: String = text.chars().take(inner.width as usize).collect();
            buf.set_string(inner.x, inner.y + i as u16, &text, *style);
        }
    }

    fn render_activity(&self, snapshot: &DashboardSnapshot, area: Rect, buf: &mut Buffer) {
        let block = self.panel(" Network Activity (24 samples) ");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 3 || inner.width < 12 {
            return;
        }

        let series: [(&str, Vec<u32>, _); 3] = [
            (
                "threats",
                snapshot.activity.iter().map(|s| s.threats).collect(),
                self.theme.red,
            ),
            (
                "scans",
                snapshot.activity.iter().map(|s| s.scans).collect(),
                self.theme.blue,
            ),
            (
                "blocked",
                snapshot.activity.iter().map(|s| s.blocked).collect(),
                self.theme.green,
            ),
        ];

        for (i, (label, values, color)) in series.iter().enumerate() {
            let y = inner.y + i as u16;
            buf.set_string(inner.x, y, *label, Style::default().fg(self.theme.fg_dim));
            let chart: String = render_columns(values)
                .chars()
                .take(inner.width.saturating_sub(9) as usize)
                .collect();
            buf.set_string(inner.x + 9, y, &chart, Style::default().fg(*color));
        }

        if let (Some(first), Some(last)) = (snapshot.activity.first(), snapshot.activity.last())
            && inner.height > 3
        {
            let span = format!("{} → {}", first.label, last.label);
            buf.set_string(
                inner.x + 9,
                inner.y + 3,
                &span,
                Style::default().fg(self.theme.fg_muted),
            );
        }
    }

    fn render_history(&self, area: Rect, buf: &mut Buffer) {
        let block = self.panel(" Scan History ");
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 1 {
            return;
        }

        let summary = self.history.summary();
        let header = format!(
            "{} scans · {} clean · {} suspicious · {} malicious · avg risk {:.1}",
            summary.total, summary.clean, summary.suspicious, summary.malicious, summary.average_risk
        );
        let header: String = header.chars().take(inner.width as usize).collect();
        buf.set_string(inner.x, inner.y, &header, Style::default().fg(self.theme.fg));

        for (i, entry) in self.history.entries().iter().enumerate() {
            let y = inner.y + 1 + i as u16;
            if y >= inner.y + inner.height {
                break;
            }
            let when = entry
                .scan_time
                .with_timezone(&chrono::Local)
                .format("%H:%M")
                .to_string();
            buf.set_string(inner.x, y, &when, Style::default().fg(self.theme.fg_muted));
            buf.set_string(
                inner.x + 7,
                y,
                format!("{:>3}", entry.risk_score),
                Style::default().fg(self.theme.threat_color(entry.threat_level)),
            );
            buf.set_string(
                inner.x + 11,
                y,
                format!("{:<10}", entry.status.label()),
                Style::default().fg(self.theme.threat_color(entry.threat_level)),
            );
            let name: String = entry
                .file_name
                .chars()
                .take(inner.width.saturating_sub(22) as usize)
                .collect();
            buf.set_string(inner.x + 22, y, &name, Style::default().fg(self.theme.fg));
        }
    }
}

impl Widget for DashboardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let Some(snapshot) = self.snapshot else {
            let msg = "Waiting for metrics…";
            let x = area.x + area.width.saturating_sub(msg.chars().count() as u16) / 2;
            buf.set_string(x, area.y + area.height / 2, msg, Style::default().fg(self.theme.fg_dim));
            return;
        };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(10),
                Constraint::Length(6),
                Constraint::Min(3),
            ])
            .split(area);
        let top = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(rows[0]);

        self.render_metrics(snapshot, top[0], buf);
        self.render_live(snapshot, top[1], buf);
        self.render_activity(snapshot, rows[1], buf);
        self.render_history(rows[2], buf);
    }
}
