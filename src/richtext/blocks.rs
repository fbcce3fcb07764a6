use super::chunk::{chunk, TextSegment};
use crate::error::ChunkError;
use serde::{Deserialize, Serialize};

/// Workspace block types produced from markdown lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Bullet,
    ToDo,
    Paragraph,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentBlock {
    pub kind: BlockKind,
    pub segments: Vec<TextSegment>,
}

// Longest prefix first: "- [ ] " must win over "- "
const LINE_MARKERS: &[(&str, BlockKind)] = &[
    ("### ", BlockKind::Heading3),
    ("## ", BlockKind::Heading2),
    ("# ", BlockKind::Heading1),
    ("- [ ] ", BlockKind::ToDo),
    ("- ", BlockKind::Bullet),
];

fn classify(line: &str) -> (BlockKind, &str) {
    LINE_MARKERS
        .iter()
        .find_map(|(marker, kind)| line.strip_prefix(marker).map(|rest| (*kind, rest)))
        .unwrap_or((BlockKind::Paragraph, line))
}

/// Split a markdown document into one block per non-blank line
pub fn markdown_to_blocks(markdown: &str, max_size: usize) -> Result<Vec<DocumentBlock>, ChunkError> {
    if max_size == 0 {
        return Err(ChunkError::InvalidChunkSize);
    }

    let mut blocks = Vec::new();

    for line in markdown.lines() {
        let (kind, text) = classify(line);
        if text.trim().is_empty() {
            continue;
        }

        let segments = chunk(text.trim_end(), max_size)?;

        blocks.push(DocumentBlock { kind, segments });
    }

    Ok(blocks)
}
