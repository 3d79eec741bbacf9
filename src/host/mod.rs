//! The boundary to the third-party block editor.
//!
//! The widget never owns the document. It reads and mutates it through an
//! [`EditorHandle`], which the browser binding implements on top of the JS
//! editor object and tests implement with an in-memory recorder.

use crate::document::ContentBlock;
use crate::menu::SuggestionItem;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("editor call `{op}` failed: {message}")]
    Call { op: &'static str, message: String },

    #[error("no block under the text cursor")]
    NoCursorBlock,

    #[error("block payload could not be converted: {0}")]
    Payload(String),
}

impl EditorError {
    pub fn call(op: &'static str, message: impl std::fmt::Display) -> Self {
        Self::Call {
            op,
            message: message.to_string(),
        }
    }
}

pub type EditorResult<T> = Result<T, EditorError>;

/// Reference to a live block, by id.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockRef(pub String);

impl BlockRef {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&ContentBlock> for BlockRef {
    fn from(b: &ContentBlock) -> Self {
        Self(b.id.clone())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum InsertMode {
    Replace,
    After,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum CursorEdge {
    Start,
    End,
}

/// Capabilities the widget needs from the host editor.
///
/// All methods take `&self`: the host is a shared, single-threaded object that
/// mutates itself internally, the same way the JS editor behaves.
pub trait EditorHandle {
    fn cursor_block(&self) -> EditorResult<BlockRef>;

    fn set_cursor(&self, block: &BlockRef, edge: CursorEdge) -> EditorResult<()>;

    fn insert_blocks(
        &self,
        blocks: &[ContentBlock],
        at: &BlockRef,
        mode: InsertMode,
    ) -> EditorResult<()>;

    /// Top-level blocks, each with its nested children.
    fn document(&self) -> EditorResult<Vec<ContentBlock>>;

    /// The host's own slash menu entries (block types).
    fn default_suggestion_items(&self) -> Vec<SuggestionItem>;

    /// Run the host's native insertion for one of its default items.
    fn apply_default_item(&self, item: &SuggestionItem) -> EditorResult<()>;
}
