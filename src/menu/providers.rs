use super::{Category, SuggestionAction, SuggestionItem};
use crate::config::SlashMenuConfig;
use crate::templates::{DocumentTemplate, TemplateIcon};

/// One entry per category; picking one opens that category.
pub fn selector_items() -> Vec<SuggestionItem> {
    Category::ALL
        .into_iter()
        .map(|cat| {
            let info = cat.info();
            let mut aliases = vec![info.key.to_string()];
            if info.shortcut != info.key {
                aliases.push(info.shortcut.to_string());
            }
            SuggestionItem {
                title: info.label.to_string(),
                subtext: format!("{} • Type \"{}\" to navigate", info.description, info.shortcut),
                group: "Menus".to_string(),
                icon: info.icon.to_string(),
                aliases,
                key: Some(info.key.to_string()),
                badge: Some(info.shortcut.to_string()),
                action: SuggestionAction::OpenCategory { key: info.key },
            }
        })
        .collect()
}

fn is_disabled(item: &SuggestionItem, disabled: &[String]) -> bool {
    let title = item.title.to_lowercase();
    disabled.iter().any(|d| {
        let d_norm = d.to_lowercase();
        item.key.as_deref().is_some_and(|k| k.contains(d.as_str()))
            || title.contains(&d_norm)
            || item
                .aliases
                .iter()
                .any(|a| a.to_lowercase().contains(&d_norm))
    })
}

/// The host's own block items, minus anything the field configuration disables.
pub fn block_items(defaults: Vec<SuggestionItem>, config: &SlashMenuConfig) -> Vec<SuggestionItem> {
    let Some(disabled) = config.active_filter() else {
        return defaults;
    };
    let before = defaults.len();
    let kept: Vec<SuggestionItem> = defaults
        .into_iter()
        .filter(|item| !is_disabled(item, disabled))
        .collect();
    log::debug!("slash menu filter kept {} of {} block items", kept.len(), before);
    kept
}

pub fn template_items(templates: &[DocumentTemplate]) -> Vec<SuggestionItem> {
    templates
        .iter()
        .map(|t| SuggestionItem {
            title: t.title.clone(),
            subtext: t.subtext.clone(),
            group: t.group.clone(),
            icon: TemplateIcon::resolve(&t.icon).icon_name().to_string(),
            aliases: t.aliases.clone(),
            key: Some(t.id.clone()),
            badge: None,
            action: SuggestionAction::InsertTemplate {
                template_id: t.id.clone(),
            },
        })
        .collect()
}

/// Inert row shown while the menu switches lists, so it never flashes empty.
pub fn placeholder_item(target: Option<Category>) -> SuggestionItem {
    let title = match target {
        Some(cat) => format!("Loading {}...", cat.label()),
        None => "Loading...".to_string(),
    };
    SuggestionItem {
        title,
        subtext: "Please wait...".to_string(),
        group: "System".to_string(),
        icon: "⏳".to_string(),
        aliases: vec![],
        key: None,
        badge: None,
        action: SuggestionAction::None,
    }
}
