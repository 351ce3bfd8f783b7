//! Human-readable rendering shared by every analysis.

const SIZE_UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

/// Format a byte count with base-1024 units and one decimal place.
///
/// Zero renders as `"0B"`; anything past the gigabyte range stays in GB.
pub fn format_size(bytes: f64) -> String {
    if bytes == 0.0 {
        return "0B".to_string();
    }

    let mut size = bytes;
    let mut unit = 0;
    while size.abs() >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    format!("{:.1}{}", size, SIZE_UNITS[unit])
}

/// Format a duration in milliseconds with two decimals, e.g. `"12.50ms"`
pub fn format_ms(ms: f64) -> String {
    format!("{:.2}ms", ms)
}

/// Format `part / total` as a percentage with one decimal; `"0%"` when
/// there is nothing to divide by.
pub fn format_percent(part: usize, total: usize) -> String {
    if total == 0 {
        return "0%".to_string();
    }
    format!("{:.1}%", part as f64 / total as f64 * 100.0)
}

/// Format a span in seconds with one decimal, e.g. `"1.5s"`
pub fn format_seconds(seconds: f64) -> String {
    format!("{:.1}s", seconds)
}

/// Keep the first `limit` characters of `text`, appending `...` when
/// anything was cut.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
