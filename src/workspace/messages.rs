use crate::richtext::{BlockKind, DocumentBlock, TextSegment};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::warn;

/// Rich-text arrays longer than this are rejected by the workspace API
pub const MAX_RICH_TEXT_ITEMS: usize = 100;

/// Children per create/append request
pub const MAX_BLOCKS_PER_REQUEST: usize = 100;

/// One element of a workspace rich-text array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: TextContent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkTarget>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkTarget {
    pub url: String,
}

impl From<&TextSegment> for RichText {
    fn from(segment: &TextSegment) -> Self {
        RichText {
            kind: "text".to_string(),
            text: TextContent {
                content: segment.content().to_string(),
                link: segment.url().map(|url| LinkTarget {
                    url: url.to_string(),
                }),
            },
        }
    }
}

/// Convert segments to the wire format, dropping anything past the API limit
pub fn rich_text(segments: &[TextSegment]) -> Vec<RichText> {
    if segments.len() > MAX_RICH_TEXT_ITEMS {
        warn!(
            "Rich text has {} segments, truncating to {}",
            segments.len(),
            MAX_RICH_TEXT_ITEMS
        );
    }

    segments
        .iter()
        .take(MAX_RICH_TEXT_ITEMS)
        .map(RichText::from)
        .collect()
}

fn block_type(kind: BlockKind) -> &'static str {
    match kind {
        BlockKind::Heading1 => "heading_1",
        BlockKind::Heading2 => "heading_2",
        BlockKind::Heading3 => "heading_3",
        BlockKind::Bullet => "bulleted_list_item",
        BlockKind::ToDo => "to_do",
        BlockKind::Paragraph => "paragraph",
    }
}

/// Workspace block object for a document line
pub fn block_json(block: &DocumentBlock) -> Value {
    let kind = block_type(block.kind);

    let mut body = Map::new();
    body.insert("rich_text".to_string(), json!(rich_text(&block.segments)));
    if block.kind == BlockKind::ToDo {
        body.insert("checked".to_string(), Value::Bool(false));
    }

    let mut object = Map::new();
    object.insert("object".to_string(), json!("block"));
    object.insert("type".to_string(), json!(kind));
    object.insert(kind.to_string(), Value::Object(body));
    Value::Object(object)
}

#[derive(Debug, Serialize)]
pub struct QueryRequest<'a> {
    pub filter: EmailFilter<'a>,
    pub page_size: u32,
}

#[derive(Debug, Serialize)]
pub struct EmailFilter<'a> {
    pub property: &'a str,
    pub email: EmailEquals<'a>,
}

#[derive(Debug, Serialize)]
pub struct EmailEquals<'a> {
    pub equals: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<PageObject>,
}

#[derive(Debug, Deserialize)]
pub struct PageObject {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl PageObject {
    /// Text of a formula, rich_text or title property
    pub fn property_text(&self, name: &str) -> Option<String> {
        let property = self.properties.get(name)?;

        if let Some(text) = property
            .get("formula")
            .and_then(|f| f.get("string"))
            .and_then(Value::as_str)
        {
            return Some(text.to_string()).filter(|t| !t.trim().is_empty());
        }

        let parts = property
            .get("rich_text")
            .or_else(|| property.get("title"))
            .and_then(Value::as_array)?;
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("plain_text").and_then(Value::as_str))
            .collect();

        Some(text).filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatedPage {
    pub id: String,
}
