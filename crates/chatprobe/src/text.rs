//! Text normalization for rendered element text.

/// Collapse every whitespace run to a single space and trim the ends.
#[must_use]
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into trimmed, non-empty lines.
#[must_use]
pub fn lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_collapses_runs() {
        assert_eq!(normalize("  View \n\t Product  "), "View Product");
    }

    #[test]
    fn test_normalize_empty() {
        assert_eq!(normalize(" \n\t "), "");
    }

    #[test]
    fn test_lines_drops_blank() {
        let text = "\n  Widget \n\n   $19.99\n  ";
        assert_eq!(lines(text), vec!["Widget", "$19.99"]);
    }
}
