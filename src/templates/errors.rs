//! In-document notices written in place of a template that could not be
//! inserted.

use crate::document::{BlockContent, ContentBlock, InlineContent, Props};
use serde_json::json;

fn base_props(text_color: &str) -> Props {
    let mut props = Props::new();
    props.insert("textColor".to_string(), json!(text_color));
    props.insert("backgroundColor".to_string(), json!("default"));
    props.insert("textAlignment".to_string(), json!("left"));
    props
}

fn block(id: String, kind: &str, props: Props, text: String) -> ContentBlock {
    ContentBlock {
        id,
        kind: kind.to_string(),
        props,
        content: Some(BlockContent::Inline(vec![InlineContent::text(text)])),
        children: vec![],
    }
}

fn heading(id: String, level: u8, color: &str, text: &str) -> ContentBlock {
    let mut props = base_props(color);
    props.insert("level".to_string(), json!(level));
    block(id, "heading", props, text.to_string())
}

fn paragraph(id: String, color: &str, text: String) -> ContentBlock {
    block(id, "paragraph", base_props(color), text)
}

fn bullet(id: String, text: &str) -> ContentBlock {
    block(id, "bulletListItem", base_props("default"), text.to_string())
}

/// Notice for a template longer than `maxBlocks`.
pub fn size_error_blocks(template_len: usize, max_blocks: usize, now_ms: i64) -> Vec<ContentBlock> {
    vec![
        heading(format!("error-header-{now_ms}"), 2, "red", "⚠️ Template Too Large"),
        paragraph(
            format!("error-desc-{now_ms}"),
            "default",
            format!(
                "This template contains {template_len} blocks, which exceeds the maximum limit of {max_blocks} blocks."
            ),
        ),
        heading(
            format!("error-solutions-header-{now_ms}"),
            3,
            "default",
            "Suggested Solutions:",
        ),
        bullet(
            format!("error-solution-1-{now_ms}"),
            "Break this template into smaller, more focused templates",
        ),
        bullet(
            format!("error-solution-2-{now_ms}"),
            "Remove unnecessary formatting or empty blocks",
        ),
        bullet(
            format!("error-solution-3-{now_ms}"),
            "Contact your administrator to increase the template size limit",
        ),
    ]
}

/// Notice for a template the editor rejected part-way through.
pub fn insertion_error_blocks(
    template_title: &str,
    inserted: usize,
    total: usize,
    message: &str,
    now_ms: i64,
) -> Vec<ContentBlock> {
    let mut details = paragraph(
        format!("insertion-error-technical-{now_ms}"),
        "gray",
        format!("Technical details: {message}"),
    );
    if let Some(BlockContent::Inline(items)) = details.content.as_mut() {
        for item in items.iter_mut() {
            item.styles.insert("italic".to_string(), json!(true));
        }
    }

    vec![
        heading(
            format!("insertion-error-header-{now_ms}"),
            2,
            "red",
            "⚠️ Template Insertion Failed",
        ),
        paragraph(
            format!("insertion-error-desc-{now_ms}"),
            "default",
            format!(
                "Failed to insert template \"{template_title}\". Successfully inserted {inserted} of {total} blocks before encountering an error."
            ),
        ),
        details,
        heading(
            format!("insertion-error-solutions-header-{now_ms}"),
            3,
            "default",
            "What you can do:",
        ),
        bullet(
            format!("insertion-error-solution-1-{now_ms}"),
            "Try inserting the template again",
        ),
        bullet(
            format!("insertion-error-solution-2-{now_ms}"),
            "Refresh the page and try again",
        ),
        bullet(
            format!("insertion-error-solution-3-{now_ms}"),
            "Check if the template data is properly formatted",
        ),
        bullet(
            format!("insertion-error-solution-4-{now_ms}"),
            "Contact support if the problem persists",
        ),
    ]
}
