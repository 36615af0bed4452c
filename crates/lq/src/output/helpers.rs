//! Common helper functions for output formatting.

use owo_colors::OwoColorize;

/// Truncates a string to a maximum number of characters.
///
/// Counts characters rather than bytes so multi-byte text is never split.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    } else {
        s.to_string()
    }
}

/// Formats a signed amount with two decimals, right-aligned to `width`.
///
/// Debits are red and credits green when colors are enabled.
pub fn format_amount(amount: f64, width: usize, use_colors: bool) -> String {
    let text = format!("{amount:>width$.2}");
    if !use_colors {
        return text;
    }
    if amount < 0.0 {
        text.red().to_string()
    } else {
        text.green().to_string()
    }
}

/// Formats tags for display.
pub fn format_tags(tags: &[String], max_len: usize) -> String {
    if tags.is_empty() {
        return String::new();
    }

    let formatted: Vec<String> = tags.iter().map(|t| format!("#{t}")).collect();
    truncate_str(&formatted.join(" "), max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_str_long() {
        assert_eq!(truncate_str("hello world", 8), "hello...");
    }

    #[test]
    fn test_truncate_str_multibyte() {
        assert_eq!(truncate_str("café crème brûlée", 8), "café ...");
    }

    #[test]
    fn test_format_amount_plain() {
        assert_eq!(format_amount(-120.5, 10, false), "   -120.50");
        assert_eq!(format_amount(3000.0, 8, false), " 3000.00");
    }

    #[test]
    fn test_format_amount_colored_keeps_digits() {
        let colored = format_amount(-4.2, 6, true);
        assert!(colored.contains(" -4.20"));
        assert_ne!(colored, " -4.20");
    }

    #[test]
    fn test_format_tags() {
        assert_eq!(format_tags(&[], 20), "");
        assert_eq!(
            format_tags(&["groceries".to_string(), "weekly".to_string()], 30),
            "#groceries #weekly"
        );
        assert_eq!(
            format_tags(&["groceries".to_string(), "weekly".to_string()], 12),
            "#grocerie..."
        );
    }
}
