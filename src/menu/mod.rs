//! The slash menu: a category selector in front of the block and template lists.

mod controller;
mod fuzzy;
mod providers;

pub use controller::{parse_query, Activation, MenuState, ParsedQuery, SlashMenuController};
pub use fuzzy::{score_and_rank, score_item};
pub use providers::{block_items, placeholder_item, selector_items, template_items};

use serde::{Deserialize, Serialize};

/// Character that opens the menu.
pub const TRIGGER_CHARACTER: char = '/';

/// What happens when an item is picked.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SuggestionAction {
    /// Inert entry (transition placeholder).
    #[default]
    None,

    #[serde(rename_all = "camelCase")]
    OpenCategory { key: char },

    #[serde(rename_all = "camelCase")]
    InsertTemplate { template_id: String },

    /// One of the host editor's own items; `index` is its position in the
    /// host's default list.
    #[serde(rename_all = "camelCase")]
    HostDefault { index: usize },
}

/// A row of the suggestion list. Built fresh for every query.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionItem {
    pub title: String,

    #[serde(default)]
    pub subtext: String,

    #[serde(default)]
    pub group: String,

    #[serde(default)]
    pub icon: String,

    #[serde(default)]
    pub aliases: Vec<String>,

    /// Host item key, e.g. `heading_2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Keyboard hint shown next to the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,

    #[serde(default)]
    pub action: SuggestionAction,
}

impl SuggestionItem {
    pub fn is_placeholder(&self) -> bool {
        self.action == SuggestionAction::None
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MenuCategory {
    pub key: char,
    pub label: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    pub shortcut: char,
}

const BLOCKS: MenuCategory = MenuCategory {
    key: 'b',
    label: "Blocks",
    description: "Add basic content blocks",
    icon: "🧱",
    shortcut: 'b',
};

const TEMPLATES: MenuCategory = MenuCategory {
    key: 't',
    label: "Templates",
    description: "Insert document templates",
    icon: "📋",
    shortcut: 't',
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Category {
    Blocks,
    Templates,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::Blocks, Category::Templates];

    pub fn info(self) -> &'static MenuCategory {
        match self {
            Category::Blocks => &BLOCKS,
            Category::Templates => &TEMPLATES,
        }
    }

    pub fn key(self) -> char {
        self.info().key
    }

    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Case-insensitive lookup by key character.
    pub fn from_key(c: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|cat| cat.key().eq_ignore_ascii_case(&c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_lookup_ignores_case() {
        assert_eq!(Category::from_key('t'), Some(Category::Templates));
        assert_eq!(Category::from_key('B'), Some(Category::Blocks));
        assert_eq!(Category::from_key('x'), None);
    }

    #[test]
    fn test_item_serializes_for_the_host() {
        let item = SuggestionItem {
            title: "Weekly report".to_string(),
            action: SuggestionAction::InsertTemplate {
                template_id: "weekly".to_string(),
            },
            ..Default::default()
        };
        let v = serde_json::to_value(&item).expect("should serialize");
        assert_eq!(v["action"]["kind"], "insertTemplate");
        assert_eq!(v["action"]["templateId"], "weekly");
        assert!(v.get("badge").is_none());

        let back: SuggestionItem = serde_json::from_value(v).expect("should deserialize");
        assert_eq!(back, item);
    }
}
