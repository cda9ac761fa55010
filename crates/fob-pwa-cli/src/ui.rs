//! Status messages for terminal output.
//!
//! Messages go to stderr so stdout stays usable for the `config` command's JSON.

use owo_colors::OwoColorize;
use std::path::Path;
use std::time::Duration;

/// Print a success message to stderr
pub fn success(message: &str) {
    eprintln!("{} {}", "✓".green().bold(), message);
}

/// Print an info message to stderr
pub fn info(message: &str) {
    eprintln!("{} {}", "ℹ".blue().bold(), message);
}

/// Print one written file, relative to the output directory when possible
pub fn written(path: &Path, root: &Path) {
    let shown = path.strip_prefix(root).unwrap_or(path);
    eprintln!("  {}", shown.display().dimmed());
}

/// Format a duration as milliseconds or seconds
pub fn format_duration(duration: Duration) -> String {
    let ms = duration.as_millis();
    if ms < 1000 {
        format!("{ms}ms")
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(42)), "42ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
    }
}
