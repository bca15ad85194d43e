use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Main application layout
pub struct AppLayout {
    pub header: Rect,
    pub scan_bar: Rect,
    pub body: Rect,
    pub footer: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(1), // Scan progress bar
                Constraint::Min(5),    // Body
                Constraint::Length(1), // Footer
            ])
            .split(area);

        Self {
            header: chunks[0],
            scan_bar: chunks[1],
            body: chunks[2],
            footer: chunks[3],
        }
    }

    /// Upload list on the left, detail panel on the right
    pub fn split_body(&self) -> (Rect, Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(self.body);
        (chunks[0], chunks[1])
    }
}

/// Fixed-size rectangle centered in `area`, shrunk to fit
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;

    Rect::new(x, y, width, height)
}
