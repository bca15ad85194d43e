use ratatui::style::Color;

/// Unicode partial block characters for smooth bars
const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Vertical block characters for column charts
const COLUMNS: [char; 9] = [' ', '▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a horizontal bar using partial block characters
pub fn render_bar(percentage: f64, width: usize, color: Color) -> (String, Color) {
    if width == 0 {
        return (String::new(), color);
    }

    let percentage = percentage.clamp(0.0, 100.0);
    let filled_width = (percentage / 100.0) * width as f64;
    let full_blocks = filled_width.floor() as usize;
    let partial = ((filled_width - full_blocks as f64) * 8.0).round() as usize;

    let mut bar = String::with_capacity(width * 3); // Unicode chars can be multi-byte

    // Full blocks
    for _ in 0..full_blocks.min(width) {
        bar.push(BLOCKS[8]);
    }

    // Partial block
    if full_blocks < width && partial > 0 {
        bar.push(BLOCKS[partial]);
    }

    // Pad to width
    let current_len = bar.chars().count();
    for _ in current_len..width {
        bar.push(' ');
    }

    (bar, color)
}

/// One character per value, scaled against the largest value
pub fn render_columns(values: &[u32]) -> String {
    let max = values.iter().copied().max().unwrap_or(0);
    if max == 0 {
        return " ".repeat(values.len());
    }

    values
        .iter()
        .map(|&v| {
            let level = ((v as f64 / max as f64) * 8.0).round() as usize;
            COLUMNS[level.clamp(1, 8)]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bar_empty() {
        let (bar, _) = render_bar(0.0, 10, Color::Green);
        assert_eq!(bar.chars().count(), 10);
        assert!(bar.chars().all(|c| c == ' '));
    }

    #[test]
    fn test_render_bar_full() {
        let (bar, _) = render_bar(100.0, 10, Color::Green);
        assert_eq!(bar.chars().count(), 10);
        assert!(bar.chars().all(|c| c == '█'));
    }

    #[test]
    fn test_render_bar_half() {
        let (bar, _) = render_bar(50.0, 10, Color::Green);
        assert_eq!(bar.chars().count(), 10);
        assert_eq!(bar.chars().filter(|&c| c == '█').count(), 5);
    }

    #[test]
    fn test_render_columns() {
        let chart = render_columns(&[10, 40, 80]);
        assert_eq!(chart.chars().count(), 3);
        assert_eq!(chart.chars().last(), Some('█'));
        assert_eq!(chart.chars().next(), Some('▁'));

        assert_eq!(render_columns(&[0, 0]), "  ");
        assert_eq!(render_columns(&[]), "");
    }
}
