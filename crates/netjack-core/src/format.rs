//! Formatting utilities for terminal output

use chrono::{DateTime, Local};

pub const RED: &str = "\x1b[0;31m";
pub const GREEN: &str = "\x1b[0;32m";
pub const YELLOW: &str = "\x1b[0;33m";
pub const CYAN: &str = "\x1b[0;36m";
pub const MAGENTA: &str = "\x1b[0;35m";
pub const BOLD: &str = "\x1b[1m";
pub const NC: &str = "\x1b[0m";

/// Check if stdout is a TTY and colors should be used
pub fn use_colors() -> bool {
    std::io::IsTerminal::is_terminal(&std::io::stdout())
}

/// Conditionally apply color
pub fn color(code: &str, text: &str) -> String {
    if use_colors() {
        format!("{}{}{}", code, text, NC)
    } else {
        text.to_string()
    }
}

/// Format a millisecond duration in human-readable form
pub fn duration_ms(ms: i64) -> String {
    let seconds = ms.max(0) / 1000;
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    }
}

/// Format a timestamp as HH:MM:SS
pub fn time(dt: DateTime<Local>) -> String {
    dt.format("%H:%M:%S").to_string()
}

/// Render a fixed-width bar for a 0-100 percentage
pub fn bar(percent: f64, width: usize) -> String {
    let clamped = percent.clamp(0.0, 100.0);
    let filled = ((width as f64) * clamped / 100.0).round() as usize;
    let filled = filled.min(width);
    format!(
        "{}{}",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(width - filled)
    )
}

/// Truncate a string to max characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_ms() {
        assert_eq!(duration_ms(999), "0s");
        assert_eq!(duration_ms(45_000), "45s");
        assert_eq!(duration_ms(300_000), "5m 0s");
        assert_eq!(duration_ms(3_660_000), "1h 1m");
        assert_eq!(duration_ms(-5), "0s");
    }

    #[test]
    fn test_bar_width() {
        assert_eq!(bar(0.0, 10).chars().count(), 10);
        assert_eq!(bar(100.0, 10), "\u{2588}".repeat(10));
        assert_eq!(bar(150.0, 4), "\u{2588}".repeat(4));
        assert_eq!(bar(50.0, 4), format!("{}{}", "\u{2588}".repeat(2), "\u{2591}".repeat(2)));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("scan", 10), "scan");
        assert_eq!(truncate("bruteforce mainframe", 10), "brutefo...");
        assert_eq!(truncate("abcdef", 2), "...");
    }

    #[test]
    fn test_color_contains_text() {
        let result = color(RED, "test");
        assert!(result.contains("test"));
    }
}
