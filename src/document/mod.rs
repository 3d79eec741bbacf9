use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub type Props = serde_json::Map<String, serde_json::Value>;

/// Block types the widget inspects. Any other type is still a valid block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::EnumString, strum::AsRefStr, strum::Display)]
#[strum(serialize_all = "camelCase")]
pub enum BlockKind {
    Paragraph,
    Heading,
    Quote,
    BulletListItem,
    NumberedListItem,
    CheckListItem,
    CodeBlock,
    Table,
    Image,
    Video,
    Audio,
    File,
}

impl BlockKind {
    /// Block types a cursor can be placed into for typing.
    pub fn is_text_entry(self) -> bool {
        matches!(
            self,
            BlockKind::Paragraph
                | BlockKind::Heading
                | BlockKind::BulletListItem
                | BlockKind::CheckListItem
        )
    }
}

/// One inline node (usually styled text) inside a block.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct InlineContent {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default)]
    pub styles: Props,

    /// Links and custom inline nodes carry extra fields we pass through.
    #[serde(flatten)]
    pub extra: Props,
}

impl InlineContent {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: Some(text.into()),
            styles: Props::new(),
            extra: Props::new(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum BlockContent {
    Inline(Vec<InlineContent>),
    /// Table content and other non-inline payloads, kept opaque.
    Structured(serde_json::Value),
}

/// A node of the host editor's document tree.
///
/// The schema belongs to the host editor; this type only mirrors its JSON so
/// blocks can be counted, sliced, inspected and handed back unchanged.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ContentBlock {
    #[serde(default)]
    pub id: String,

    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub props: Props,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<BlockContent>,

    #[serde(default)]
    pub children: Vec<ContentBlock>,
}

impl ContentBlock {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            props: Props::new(),
            content: None,
            children: vec![],
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.content = Some(BlockContent::Inline(vec![InlineContent::text(text)]));
        self
    }

    pub fn with_prop(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn block_kind(&self) -> Option<BlockKind> {
        BlockKind::from_str(&self.kind).ok()
    }

    pub fn inline_content(&self) -> Option<&[InlineContent]> {
        match &self.content {
            Some(BlockContent::Inline(items)) => Some(items),
            _ => None,
        }
    }

    /// No content at all, or an empty inline list.
    pub fn has_no_content(&self) -> bool {
        match &self.content {
            None => true,
            Some(BlockContent::Inline(items)) => items.is_empty(),
            Some(BlockContent::Structured(v)) => v.is_null(),
        }
    }

    /// Concatenated text of this block's inline text nodes (children excluded).
    pub fn plain_text(&self) -> String {
        self.inline_content()
            .unwrap_or_default()
            .iter()
            .filter(|c| c.kind == "text")
            .filter_map(|c| c.text.as_deref())
            .collect()
    }

    pub fn url(&self) -> Option<&str> {
        self.props.get("url").and_then(|v| v.as_str())
    }
}

/// Parse the initial document rendered next to the form field.
///
/// Anything other than a non-empty block array yields an empty document.
pub fn parse_initial_content(text: &str) -> Vec<ContentBlock> {
    if text.trim().is_empty() {
        return vec![];
    }
    match serde_json::from_str::<Vec<ContentBlock>>(text) {
        Ok(blocks) => blocks,
        Err(e) => {
            log::warn!("ignoring unparsable initial content: {e}");
            vec![]
        }
    }
}

/// Plain-text rendition of a document, one line per top-level block.
pub fn fallback_text(blocks: &[ContentBlock]) -> String {
    blocks
        .iter()
        .map(ContentBlock::plain_text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Every image URL in the document, depth-first in document order.
pub fn image_urls(blocks: &[ContentBlock]) -> Vec<String> {
    fn walk(blocks: &[ContentBlock], out: &mut Vec<String>) {
        for b in blocks {
            if b.block_kind() == Some(BlockKind::Image) {
                if let Some(url) = b.url().filter(|u| !u.is_empty()) {
                    out.push(url.to_string());
                }
            }
            walk(&b.children, out);
        }
    }

    let mut out = Vec::new();
    walk(blocks, &mut out);
    out
}

/// Image URLs referenced by `previous` but no longer by `current`.
pub fn find_removed_images(previous: &[ContentBlock], current: &[ContentBlock]) -> Vec<String> {
    let now = image_urls(current);
    image_urls(previous)
        .into_iter()
        .filter(|u| !now.contains(u))
        .collect()
}
