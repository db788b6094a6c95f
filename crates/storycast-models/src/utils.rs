//! Filename helpers shared across the pipeline.

/// Convert a video title into a safe filename stem.
///
/// Alphanumerics, spaces, dashes and underscores pass through; everything
/// else becomes an underscore. Leading/trailing whitespace is trimmed so
/// titles never produce names that differ only by padding.
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == ' ' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Extract the first decimal number embedded in a filename.
///
/// Used to pair `output_3.jpg` with `output_3.wav`; names without a number
/// return `None` and sort after all numbered names.
pub fn extract_index(name: &str) -> Option<u64> {
    let digits: String = name
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_passthrough() {
        assert_eq!(sanitize_title("Black Holes - Part_1"), "Black Holes - Part_1");
    }

    #[test]
    fn test_sanitize_replaces_punctuation() {
        assert_eq!(sanitize_title("What's next? (2024)"), "What_s next_ _2024_");
    }

    #[test]
    fn test_sanitize_trims_edges() {
        assert_eq!(sanitize_title("  padded  "), "padded");
    }

    #[test]
    fn test_extract_index() {
        assert_eq!(extract_index("output_12.wav"), Some(12));
        assert_eq!(extract_index("clip_0.mp4"), Some(0));
        assert_eq!(extract_index("no-number.jpg"), None);
    }

    #[test]
    fn test_extract_index_takes_first_number() {
        assert_eq!(extract_index("line_3_seg_7.wav"), Some(3));
    }
}
