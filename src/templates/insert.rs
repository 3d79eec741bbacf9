use super::errors::{insertion_error_blocks, size_error_blocks};
use crate::config::{MenuTimings, TemplateConfig};
use crate::document::ContentBlock;
use crate::host::{BlockRef, CursorEdge, EditorError, EditorHandle, EditorResult, InsertMode};
use crate::scheduler::Scheduler;
use std::rc::{Rc, Weak};

/// Writes template content into the live document.
///
/// Small templates go in with one call. Larger ones are split into chunks
/// spaced by `chunk_delay` so the host editor can run its update cycle between
/// them. Nothing here returns an error: failures are logged and the document
/// is left as far as insertion got.
#[derive(Clone)]
pub struct TemplateInserter {
    editor: Weak<dyn EditorHandle>,
    scheduler: Rc<dyn Scheduler>,
    timings: MenuTimings,
}

impl TemplateInserter {
    pub fn new(
        editor: &Rc<dyn EditorHandle>,
        scheduler: Rc<dyn Scheduler>,
        timings: MenuTimings,
    ) -> Self {
        Self {
            editor: Rc::downgrade(editor),
            scheduler,
            timings,
        }
    }

    pub fn insert_template(&self, blocks: Vec<ContentBlock>, config: &TemplateConfig) {
        self.insert_titled("template", blocks, config);
    }

    /// Same as [`insert_template`](Self::insert_template); `title` only shows up
    /// in logs and failure notices.
    pub fn insert_titled(&self, title: &str, blocks: Vec<ContentBlock>, config: &TemplateConfig) {
        log::debug!("template insertion started: {} blocks", blocks.len());
        if blocks.is_empty() {
            return;
        }

        let Some(editor) = self.editor.upgrade() else {
            log::warn!("template \"{title}\" dropped: editor is gone");
            return;
        };

        if blocks.len() > config.max_blocks {
            log::warn!(
                "template exceeds maximum size of {} blocks ({} blocks)",
                config.max_blocks,
                blocks.len()
            );
            let notice = size_error_blocks(blocks.len(), config.max_blocks, self.scheduler.now_ms());
            if let Err(e) = replace_cursor_block(editor.as_ref(), &notice) {
                log::error!("could not insert template size notice: {e}");
            }
            return;
        }

        let job = ChunkJob {
            editor: self.editor.clone(),
            scheduler: self.scheduler.clone(),
            timings: self.timings,
            title: title.to_string(),
            blocks: Rc::from(blocks),
            chunk_size: config.chunk_size.max(1),
            report_failures: config.report_insertion_failures,
            inserted: 0,
        };
        drop(editor);
        job.step();
    }
}

fn replace_cursor_block(editor: &dyn EditorHandle, blocks: &[ContentBlock]) -> EditorResult<()> {
    let at = editor.cursor_block()?;
    editor.insert_blocks(blocks, &at, InsertMode::Replace)
}

/// One template insertion in progress.
///
/// Each step inserts a chunk and schedules the next one; the cursor is read
/// fresh every time because the previous insertion moved it.
struct ChunkJob {
    editor: Weak<dyn EditorHandle>,
    scheduler: Rc<dyn Scheduler>,
    timings: MenuTimings,
    title: String,
    blocks: Rc<[ContentBlock]>,
    chunk_size: usize,
    report_failures: bool,
    inserted: usize,
}

impl ChunkJob {
    fn step(mut self) {
        let total = self.blocks.len();
        let Some(editor) = self.editor.upgrade() else {
            // No rollback: whatever went in before the editor closed stays.
            log::warn!(
                "template \"{}\" abandoned after {} of {} blocks: editor is gone",
                self.title,
                self.inserted,
                total
            );
            return;
        };

        let end = (self.inserted + self.chunk_size).min(total);
        let mode = if self.inserted == 0 {
            InsertMode::Replace
        } else {
            InsertMode::After
        };
        let result = editor
            .cursor_block()
            .and_then(|at| editor.insert_blocks(&self.blocks[self.inserted..end], &at, mode));

        if let Err(e) = result {
            log::error!(
                "template \"{}\" insertion failed after {} of {} blocks: {e}",
                self.title,
                self.inserted,
                total
            );
            if self.report_failures {
                self.report_failure(editor.as_ref(), &e);
            }
            return;
        }
        self.inserted = end;
        drop(editor);

        let scheduler = self.scheduler.clone();
        if self.inserted < total {
            let delay = self.timings.chunk_delay;
            scheduler.set_timeout(delay, Box::new(move || self.step()));
        } else {
            log::debug!("template \"{}\" inserted ({} blocks)", self.title, total);
            let editor = self.editor.clone();
            scheduler.set_timeout(
                self.timings.cursor_delay,
                Box::new(move || {
                    let Some(editor) = editor.upgrade() else {
                        return;
                    };
                    if let Err(e) = move_cursor_to_first_editable(editor.as_ref()) {
                        log::warn!("error positioning cursor: {e}");
                    }
                }),
            );
        }
    }

    fn report_failure(&self, editor: &dyn EditorHandle, error: &EditorError) {
        let notice = insertion_error_blocks(
            &self.title,
            self.inserted,
            self.blocks.len(),
            &error.to_string(),
            self.scheduler.now_ms(),
        );
        let placed = editor.cursor_block().and_then(|at| {
            let mode = if self.inserted == 0 {
                InsertMode::Replace
            } else {
                InsertMode::After
            };
            editor.insert_blocks(&notice, &at, mode)
        });
        if let Err(e) = placed {
            log::error!("could not insert template failure notice: {e}");
        }
    }
}

fn looks_like_placeholder(text: &str) -> bool {
    text.is_empty() || text.contains(':') || text.contains("Date")
}

fn is_editable_target(block: &ContentBlock) -> bool {
    if !block.block_kind().is_some_and(|k| k.is_text_entry()) {
        return false;
    }
    if block.has_no_content() {
        return true;
    }
    block.inline_content().is_some_and(|items| {
        items
            .iter()
            .any(|c| c.text.as_deref().is_some_and(looks_like_placeholder))
    })
}

/// Put the cursor where the user most likely wants to type next: the first
/// empty or placeholder-looking text block, else the end of the first block.
pub fn move_cursor_to_first_editable(editor: &dyn EditorHandle) -> EditorResult<()> {
    let doc = editor.document()?;

    if let Some((i, b)) = doc.iter().enumerate().find(|(_, b)| is_editable_target(b)) {
        log::debug!("moving cursor to block {i} ({})", b.kind);
        return editor.set_cursor(&BlockRef::from(b), CursorEdge::End);
    }

    match doc.first() {
        Some(first) => editor.set_cursor(&BlockRef::from(first), CursorEdge::End),
        None => Ok(()),
    }
}
