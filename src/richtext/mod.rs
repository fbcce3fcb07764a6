//! Markdown-subset to rich-text conversion
//!
//! - `chunk` turns text with `[label](url)` links into size-bounded segments
//! - `markdown_to_blocks` maps markdown lines to workspace blocks built from those segments

mod blocks;
mod chunk;

pub use blocks::{markdown_to_blocks, BlockKind, DocumentBlock};
pub use chunk::{chunk, TextSegment};
