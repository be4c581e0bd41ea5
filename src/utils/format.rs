/// Format a duration in seconds to "Xh Ym" or "Ym" string
pub fn format_duration_secs(secs: u32) -> String {
    if secs == 0 {
        return "now".to_string();
    }
    let hours = secs / 3600;
    let minutes = (secs % 3600).div_ceil(60);
    match (hours, minutes) {
        (h, 60) => format!("{}h 0m", h + 1),
        (0, m) => format!("{}m", m),
        (h, m) => format!("{}h {}m", h, m),
    }
}

/// Percentage label for a `[0, 1]` fraction.
pub fn format_percent(fraction: f64) -> String {
    format!("{:.0}%", (fraction.clamp(0.0, 1.0) * 100.0).round())
}

/// Create a simple ASCII progress bar from a `[0, 1]` fraction
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let ratio = fraction.clamp(0.0, 1.0);
    let filled_count = (ratio * width as f64).round() as usize;
    let empty_count = width.saturating_sub(filled_count);
    format!("{}{}", "█".repeat(filled_count), "░".repeat(empty_count))
}
