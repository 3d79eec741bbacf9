//! Pre-authored documents offered under the "Templates" menu.

mod errors;
mod insert;

pub use errors::{insertion_error_blocks, size_error_blocks};
pub use insert::{move_cursor_to_first_editable, TemplateInserter};

use crate::document::ContentBlock;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Catalog entry. The catalog loader owns structural validation; content is
/// taken as-is.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DocumentTemplate {
    pub id: String,
    pub title: String,

    #[serde(default)]
    pub subtext: String,

    #[serde(default)]
    pub aliases: Vec<String>,

    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// Parse the catalog JSON array. A broken catalog yields no templates.
pub fn parse_catalog(text: &str) -> Vec<DocumentTemplate> {
    if text.trim().is_empty() {
        return vec![];
    }
    match serde_json::from_str::<Vec<DocumentTemplate>>(text) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("ignoring unparsable template catalog: {e}");
            vec![]
        }
    }
}

/// Icon keys a catalog entry may name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::EnumString, strum::AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum TemplateIcon {
    Document,
    #[default]
    Template,
    Report,
    Letter,
    Meeting,
    Checklist,
    Calendar,
    Book,
    Chart,
    Calculator,
    Currency,
    Bank,
    Receipt,
    Trend,
    Briefcase,
    Scale,
    Eye,
    Presentation,
    Spreadsheet,
    Contract,
    Clock,
    Bookmark,
}

impl TemplateIcon {
    /// Unknown keys fall back to the generic template icon.
    pub fn resolve(key: &str) -> Self {
        Self::from_str(key.trim()).unwrap_or_default()
    }

    /// Outline icon name the host renders.
    pub fn icon_name(self) -> &'static str {
        match self {
            TemplateIcon::Document => "document",
            TemplateIcon::Template => "template",
            TemplateIcon::Report | TemplateIcon::Chart => "chart-bar",
            TemplateIcon::Letter => "mail",
            TemplateIcon::Meeting => "users",
            TemplateIcon::Checklist => "clipboard-list",
            TemplateIcon::Calendar => "calendar",
            TemplateIcon::Book => "book-open",
            TemplateIcon::Calculator => "calculator",
            TemplateIcon::Currency => "currency-dollar",
            TemplateIcon::Bank => "office-building",
            TemplateIcon::Receipt => "receipt-tax",
            TemplateIcon::Trend => "trending-up",
            TemplateIcon::Briefcase => "briefcase",
            TemplateIcon::Scale => "scale",
            TemplateIcon::Eye => "eye",
            TemplateIcon::Presentation => "desktop-computer",
            TemplateIcon::Spreadsheet => "table",
            TemplateIcon::Contract => "clipboard-check",
            TemplateIcon::Clock => "clock",
            TemplateIcon::Bookmark => "bookmark",
        }
    }
}
