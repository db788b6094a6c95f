//! Generated-content parsing.
//!
//! The content generator writes repeating blocks of `Mytitle: <title>`
//! followed by narration lines. The plan builder turns those blocks into
//! per-video script files.

use serde::{Deserialize, Serialize};

/// Marker that opens a new block in the generated content file.
pub const TITLE_MARKER: &str = "Mytitle:";

/// One generated video script: a title and its narration lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub title: String,
    pub lines: Vec<String>,
}

impl ContentBlock {
    /// Join narration lines into the script file body.
    pub fn body(&self) -> String {
        self.lines.join("\n")
    }
}

/// Parse content text into title blocks.
///
/// Blank lines are skipped. Narration lines before the first title marker
/// have no block to belong to and are dropped. A title with no narration
/// lines yields no block.
pub fn parse_content(text: &str) -> Vec<ContentBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<ContentBlock> = None;

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            continue;
        }

        if let Some(title) = line.strip_prefix(TITLE_MARKER) {
            if let Some(block) = current.take() {
                if !block.lines.is_empty() {
                    blocks.push(block);
                }
            }
            current = Some(ContentBlock {
                title: title.trim().to_string(),
                lines: Vec::new(),
            });
        } else if let Some(block) = current.as_mut() {
            block.lines.push(line.to_string());
        }
    }

    if let Some(block) = current {
        if !block.lines.is_empty() {
            blocks.push(block);
        }
    }

    blocks
}
