/// Format bytes into a human-readable string (e.g. "1.5 KB", "9.54 MB")
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    const K: f64 = 1024.0;

    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= K && unit < UNITS.len() - 1 {
        value /= K;
        unit += 1;
    }

    // Two decimals at most, trailing zeros dropped
    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Format a number with thousand separators (e.g., 1,234,567)
pub fn format_count(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }

    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);

    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    result
}

/// Format a progress percentage with one decimal
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent.clamp(0.0, 100.0))
}

/// Coarse risk label for a 0-100 risk score
pub fn risk_label(score: u8) -> &'static str {
    if score <= 30 {
        "LOW RISK"
    } else if score <= 60 {
        "MEDIUM RISK"
    } else {
        "HIGH RISK"
    }
}
