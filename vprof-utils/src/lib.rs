//! Shared utility functions for vprof crates.

/// Cell parsing for spreadsheet exports
pub mod cells {
    /// Tokens that spreadsheet exports use for an empty cell.
    pub const NULL_TOKENS: [&str; 9] = ["", "nan", "null", "na", "n/a", "none", "-", "---", "#n/a"];

    /// Check whether a raw cell holds one of the null tokens (case-insensitive)
    pub fn is_null(cell: &str) -> bool {
        let lowered = cell.trim().to_lowercase();
        NULL_TOKENS.contains(&lowered.as_str())
    }

    /// Parse a nullable float cell.
    ///
    /// Null tokens and non-numeric text both map to `None`, as do
    /// non-finite values.
    pub fn parse_f64(cell: &str) -> Option<f64> {
        if is_null(cell) {
            return None;
        }
        cell.trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }

    /// Parse a nullable 0/1 flag cell
    pub fn parse_flag(cell: &str) -> Option<bool> {
        let lowered = cell.trim().to_lowercase();
        match lowered.as_str() {
            "1" | "true" | "yes" | "y" => Some(true),
            "0" | "false" | "no" | "n" => Some(false),
            s => match parse_f64(s) {
                Some(v) if v == 1.0 => Some(true),
                Some(v) if v == 0.0 => Some(false),
                _ => None,
            },
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_null_tokens() {
            assert!(is_null(""));
            assert!(is_null("  NaN "));
            assert!(is_null("N/A"));
            assert!(is_null("---"));
            assert!(!is_null("0"));
        }

        #[test]
        fn test_parse_f64() {
            assert_eq!(parse_f64("12.5"), Some(12.5));
            assert_eq!(parse_f64(" -3 "), Some(-3.0));
            assert_eq!(parse_f64("null"), None);
            assert_eq!(parse_f64("abc"), None);
            assert_eq!(parse_f64("inf"), None);
        }

        #[test]
        fn test_parse_flag() {
            assert_eq!(parse_flag("1"), Some(true));
            assert_eq!(parse_flag("1.0"), Some(true));
            assert_eq!(parse_flag("0"), Some(false));
            assert_eq!(parse_flag("TRUE"), Some(true));
            assert_eq!(parse_flag(""), None);
            assert_eq!(parse_flag("2"), None);
        }
    }
}

/// Identifier canonicalisation
pub mod ids {
    use crate::cells;

    /// Canonical string form of a station or sheet identifier.
    ///
    /// Identifiers are trimmed. Numeric text is rendered as the shortest
    /// decimal that round-trips, so `2.750` becomes `2.75` and `12.0`
    /// becomes `12`. Text with a leading zero in its integer part (`007`,
    /// `01`) is a code, not a number, and is kept as written. Returns
    /// `None` for null cells.
    pub fn canonical_id(cell: &str) -> Option<String> {
        if cells::is_null(cell) {
            return None;
        }
        let trimmed = cell.trim();
        if has_leading_zero(trimmed) {
            return Some(trimmed.to_string());
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Some(format!("{}", v)),
            _ => Some(trimmed.to_string()),
        }
    }

    fn has_leading_zero(text: &str) -> bool {
        let digits = text.strip_prefix(['-', '+']).unwrap_or(text).as_bytes();
        matches!(digits, [b'0', next, ..] if next.is_ascii_digit())
    }

}
