use crate::error::ChunkError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A unit of rich text accepted by the workspace write API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextSegment {
    Plain { content: String },
    Link { content: String, url: String },
}

impl TextSegment {
    pub fn plain(content: impl Into<String>) -> Self {
        TextSegment::Plain {
            content: content.into(),
        }
    }

    pub fn link(content: impl Into<String>, url: impl Into<String>) -> Self {
        TextSegment::Link {
            content: content.into(),
            url: url.into(),
        }
    }

    pub fn content(&self) -> &str {
        match self {
            TextSegment::Plain { content } | TextSegment::Link { content, .. } => content,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            TextSegment::Plain { .. } => None,
            TextSegment::Link { url, .. } => Some(url),
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, TextSegment::Link { .. })
    }
}

fn link_pattern() -> &'static Regex {
    static LINK_PATTERN: OnceLock<Regex> = OnceLock::new();
    LINK_PATTERN.get_or_init(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap())
}

/// Split `text` into plain and link candidates, before any size limit applies
fn scan_links(text: &str) -> Vec<TextSegment> {
    let mut parts = Vec::new();
    let mut last_end = 0;

    for caps in link_pattern().captures_iter(text) {
        let whole = caps.get(0).map(|m| (m.start(), m.end()));
        let (start, end) = match whole {
            Some(range) => range,
            None => continue,
        };

        if start > last_end {
            parts.push(TextSegment::plain(&text[last_end..start]));
        }
        parts.push(TextSegment::link(&caps[1], &caps[2]));
        last_end = end;
    }

    if last_end < text.len() {
        parts.push(TextSegment::plain(&text[last_end..]));
    }

    parts
}

/// Packs plain text into chunks of at most `max_size` characters.
///
/// Links never touch the open chunk: plain text pending before a link stays in the
/// accumulator and is emitted after it, together with the text that follows.
struct ChunkPacker {
    max_size: usize,
    current: String,
    used: usize,
    segments: Vec<TextSegment>,
}

impl ChunkPacker {
    fn new(max_size: usize) -> Self {
        Self {
            max_size,
            current: String::new(),
            used: 0,
            segments: Vec::new(),
        }
    }

    fn push_plain(&mut self, text: &str) {
        let mut rest = text;

        while !rest.is_empty() {
            let room = self.max_size - self.used;
            let split_at = rest
                .char_indices()
                .nth(room)
                .map(|(idx, _)| idx)
                .unwrap_or(rest.len());
            let (take, remainder) = rest.split_at(split_at);

            self.current.push_str(take);
            self.used += take.chars().count();
            rest = remainder;

            // Close a full chunk immediately
            if self.used >= self.max_size {
                self.flush();
                self.used = 0;
            }
        }
    }

    fn push_link(&mut self, content: String, url: String) {
        self.segments.push(TextSegment::Link { content, url });
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            let content = std::mem::take(&mut self.current);
            self.segments.push(TextSegment::Plain { content });
        }
    }

    fn finish(mut self) -> Vec<TextSegment> {
        self.flush();
        self.segments
    }
}

/// Convert markdown-subset text (plain text plus `[label](url)` links) into rich-text
/// segments.
///
/// Plain segments hold at most `max_size` characters. Links are emitted whole, even
/// when the label is longer than `max_size`, and are placed after every chunk completed
/// before them. A partially filled chunk is not closed by a link, so its text can land
/// after the link.
pub fn chunk(text: &str, max_size: usize) -> Result<Vec<TextSegment>, ChunkError> {
    if max_size == 0 {
        return Err(ChunkError::InvalidChunkSize);
    }

    let mut packer = ChunkPacker::new(max_size);

    for part in scan_links(text) {
        match part {
            TextSegment::Plain { content } => packer.push_plain(&content),
            TextSegment::Link { content, url } => packer.push_link(content, url),
        }
    }

    Ok(packer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concat(segments: &[TextSegment]) -> String {
        segments.iter().map(|s| s.content()).collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(chunk("", 10).unwrap().is_empty());
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert_eq!(chunk("anything", 0), Err(ChunkError::InvalidChunkSize));
        assert_eq!(chunk("", 0), Err(ChunkError::InvalidChunkSize));
    }

    #[test]
    fn test_plain_text_splits_into_ceil_segments() {
        let text = "abcdefghijklmnopqrstuvw"; // 23 chars
        for size in 1..=30 {
            let segments = chunk(text, size).unwrap();
            let expected = text.len().div_ceil(size);

            assert_eq!(segments.len(), expected, "size {}", size);
            assert!(segments.iter().all(|s| !s.is_link()));
            assert!(segments.iter().all(|s| s.content().chars().count() <= size));
            assert_eq!(concat(&segments), text);
        }
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let text = "ação é ótima";
        let segments = chunk(text, 4).unwrap();

        assert_eq!(
            segments,
            vec![
                TextSegment::plain("ação"),
                TextSegment::plain(" é ó"),
                TextSegment::plain("tima"),
            ]
        );
    }

    #[test]
    fn test_link_between_plain_text() {
        let segments = chunk("Hello [world](http://x.com) bye", 5).unwrap();

        // The space after "Hello" opens the second chunk, which " bye" then fills
        assert_eq!(
            segments,
            vec![
                TextSegment::plain("Hello"),
                TextSegment::link("world", "http://x.com"),
                TextSegment::plain("  bye"),
            ]
        );
    }

    #[test]
    fn test_link_does_not_close_open_chunk() {
        let segments = chunk("ab[x](u)cdef", 4).unwrap();

        assert_eq!(
            segments,
            vec![
                TextSegment::link("x", "u"),
                TextSegment::plain("abcd"),
                TextSegment::plain("ef"),
            ]
        );
    }

    #[test]
    fn test_long_link_is_not_split() {
        let label = "a very long link label";
        let text = format!("see [{}](https://example.com/page)", label);
        let segments = chunk(&text, 5).unwrap();

        let links: Vec<_> = segments.iter().filter(|s| s.is_link()).collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].content(), label);
        assert_eq!(links[0].url(), Some("https://example.com/page"));
    }

    #[test]
    fn test_adjacent_links() {
        let segments = chunk("[a](http://a)[b](http://b)", 10).unwrap();

        assert_eq!(
            segments,
            vec![
                TextSegment::link("a", "http://a"),
                TextSegment::link("b", "http://b"),
            ]
        );
    }

    #[test]
    fn test_single_link_is_kept_whole_and_plain_order_survives() {
        let text = "before text [label](https://u.example/x?y=1) after text";
        for size in 1..=20 {
            let segments = chunk(text, size).unwrap();
            let links: Vec<_> = segments.iter().filter(|s| s.is_link()).collect();
            let plain: Vec<_> = segments.iter().filter(|s| !s.is_link()).cloned().collect();

            assert_eq!(links, vec![&TextSegment::link("label", "https://u.example/x?y=1")]);
            assert_eq!(concat(&plain), "before text  after text", "size {}", size);
            assert!(plain.iter().all(|s| s.content().chars().count() <= size));
            assert!(segments.iter().all(|s| !s.content().is_empty()));
        }
    }

    #[test]
    fn test_link_follows_completed_chunks() {
        // "before text " is 12 chars, so at size 4 three full chunks precede the link
        let segments = chunk("before text [label](https://u.example/x?y=1) after text", 4).unwrap();

        assert_eq!(segments[3], TextSegment::link("label", "https://u.example/x?y=1"));
        assert_eq!(concat(&segments[..3]), "before text ");
    }

    #[test]
    fn test_rechunking_plain_output_is_stable() {
        let text = "The quick brown fox jumps over the lazy dog, twice over.";
        let first = chunk(text, 7).unwrap();
        let rejoined = concat(&first);
        let second = chunk(&rejoined, 7).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_incomplete_link_syntax_stays_plain() {
        let text = "[label] (x) and [](empty) and [open(";
        let segments = chunk(text, 100).unwrap();

        assert_eq!(segments, vec![TextSegment::plain(text)]);
    }

    #[test]
    fn test_link_is_case_sensitive_and_literal() {
        let segments = chunk("go [Docs](HTTP://X.COM)!", 100).unwrap();

        assert_eq!(
            segments,
            vec![
                TextSegment::link("Docs", "HTTP://X.COM"),
                TextSegment::plain("go !"),
            ]
        );
    }
}
