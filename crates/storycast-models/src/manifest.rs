//! Plan manifest parsing and rendering.
//!
//! The manifest (`plan.txt`) is the single source of truth for which
//! videos exist. One line per video, `title | script_filename`,
//! order-significant.

use serde::{Deserialize, Serialize};

/// One manifest line: a video title and its script filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub title: String,
    pub script_filename: String,
}

impl ManifestEntry {
    pub fn new(title: impl Into<String>, script_filename: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            script_filename: script_filename.into(),
        }
    }

    /// Render the entry as a manifest line.
    pub fn to_line(&self) -> String {
        format!("{} | {}", self.title, self.script_filename)
    }
}

/// Parse manifest text into ordered entries.
///
/// Blank lines are ignored; lines without exactly one `|` separator are
/// skipped rather than treated as errors.
pub fn parse_manifest(text: &str) -> Vec<ManifestEntry> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut parts = line.split('|');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(title), Some(filename), None) => {
                    let title = title.trim();
                    let filename = filename.trim();
                    if title.is_empty() || filename.is_empty() {
                        None
                    } else {
                        Some(ManifestEntry::new(title, filename))
                    }
                }
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let text = "Black Holes | Black Holes.txt\nZeno | Zeno.txt\n";
        let entries = parse_manifest(text);

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Black Holes");
        assert_eq!(entries[0].script_filename, "Black Holes.txt");
        assert_eq!(entries[1].title, "Zeno");
    }

    #[test]
    fn test_parse_skips_blank_and_malformed_lines() {
        let text = "\n  \nonly title\nA | a.txt | extra\nB | b.txt\n | c.txt\n";
        let entries = parse_manifest(text);

        assert_eq!(entries, vec![ManifestEntry::new("B", "b.txt")]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let entries = parse_manifest("  Spaced Title  |  spaced.txt  ");
        assert_eq!(entries[0].title, "Spaced Title");
        assert_eq!(entries[0].script_filename, "spaced.txt");
    }

    #[test]
    fn test_order_is_preserved() {
        let text = "C | c.txt\nA | a.txt\nB | b.txt";
        let titles: Vec<_> = parse_manifest(text).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_line_roundtrip() {
        let entry = ManifestEntry::new("My Video", "My Video.txt");
        let parsed = parse_manifest(&entry.to_line());
        assert_eq!(parsed, vec![entry]);
    }
}
