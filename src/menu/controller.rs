use super::fuzzy::score_and_rank;
use super::providers::{block_items, placeholder_item, selector_items, template_items};
use super::{Category, SuggestionAction, SuggestionItem, TRIGGER_CHARACTER};
use crate::config::{MenuTimings, SlashMenuConfig, TemplateConfig, WidgetConfig};
use crate::host::EditorHandle;
use crate::scheduler::{Scheduler, TimerId};
use crate::templates::{DocumentTemplate, TemplateInserter};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Which list the menu is showing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuState {
    /// Category list.
    Selector,
    /// Switching lists; `target` is `None` on the way back to the selector.
    Transitioning { target: Option<Category> },
    /// One category's items.
    Fuzzy(Category),
}

/// What the host should do after an item was activated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Activation {
    /// Insertion happened (or was handed to the host); close the menu.
    Closed,
    /// A category was opened. The host may rewrite the query to this text so
    /// the next `get_items` lands in the category.
    Requery(String),
    /// Nothing to do (placeholder or stale item).
    Ignored,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedQuery {
    pub category: Option<Category>,
    pub search_query: String,
}

impl ParsedQuery {
    pub fn shows_selector(&self) -> bool {
        self.category.is_none()
    }
}

/// Split the text typed after the trigger into a category and a search.
///
/// `"t"` opens templates, `"t budget"` (or `"tbudget"`) searches them, and
/// anything else filters the category list itself.
pub fn parse_query(raw: &str) -> ParsedQuery {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();

    let Some(first) = chars.next() else {
        return ParsedQuery {
            category: None,
            search_query: String::new(),
        };
    };

    if let Some(cat) = Category::from_key(first) {
        let rest = chars.as_str();
        return ParsedQuery {
            category: Some(cat),
            search_query: rest.trim().to_string(),
        };
    }

    ParsedQuery {
        category: None,
        search_query: trimmed.to_string(),
    }
}

#[derive(Default)]
struct Debounce {
    value: Option<String>,
    generation: u64,
    timer: Option<TimerId>,
}

struct MenuInner {
    state: MenuState,
    debounce: Debounce,
    transition_timer: Option<TimerId>,
    refresh: Option<Rc<dyn Fn()>>,
}

impl MenuInner {
    /// Every state change invalidates the pending debounce, so a query typed
    /// for the old list can never be applied to the new one.
    fn enter(&mut self, next: MenuState, scheduler: &dyn Scheduler) {
        if self.state == next {
            return;
        }
        log::debug!("slash menu {:?} -> {:?}", self.state, next);
        self.state = next;
        if let Some(t) = self.debounce.timer.take() {
            scheduler.clear_timeout(t);
        }
        self.debounce.generation += 1;
        self.debounce.value = None;
    }
}

/// Slash menu state machine for one editor.
///
/// The host calls [`get_items`](Self::get_items) on every keystroke after the
/// trigger character and [`on_item_activated`](Self::on_item_activated) when
/// the user picks an entry. Neither ever fails; the worst case is a
/// placeholder or an unfiltered list.
pub struct SlashMenuController {
    inner: Rc<RefCell<MenuInner>>,
    editor: Rc<dyn EditorHandle>,
    scheduler: Rc<dyn Scheduler>,
    templates: Vec<DocumentTemplate>,
    menu_config: SlashMenuConfig,
    template_config: TemplateConfig,
    timings: MenuTimings,
    inserter: TemplateInserter,
}

impl SlashMenuController {
    pub fn new(
        editor: Rc<dyn EditorHandle>,
        scheduler: Rc<dyn Scheduler>,
        templates: Vec<DocumentTemplate>,
        config: &WidgetConfig,
    ) -> Self {
        let inserter = TemplateInserter::new(&editor, scheduler.clone(), config.timings);
        Self {
            inner: Rc::new(RefCell::new(MenuInner {
                state: MenuState::Selector,
                debounce: Debounce::default(),
                transition_timer: None,
                refresh: None,
            })),
            editor,
            scheduler,
            templates,
            menu_config: config.slash_menu_config.clone(),
            template_config: config.template_config.clone(),
            timings: config.timings,
            inserter,
        }
    }

    pub fn trigger_character(&self) -> char {
        TRIGGER_CHARACTER
    }

    pub fn state(&self) -> MenuState {
        self.inner.borrow().state
    }

    /// Called after a debounced query lands or a transition settles, i.e. when
    /// `get_items` would now answer differently for the same text.
    pub fn set_refresh_listener(&self, listener: impl Fn() + 'static) {
        self.inner.borrow_mut().refresh = Some(Rc::new(listener));
    }

    pub fn get_items(&self, query: &str) -> Vec<SuggestionItem> {
        let items = self.resolve(query);
        // Delay depends on the state this query left us in.
        self.schedule_debounce(query);
        items
    }

    pub fn on_item_activated(&self, item: &SuggestionItem) -> Activation {
        match &item.action {
            SuggestionAction::None => Activation::Ignored,
            SuggestionAction::OpenCategory { key } => match Category::from_key(*key) {
                Some(cat) => {
                    self.select_category(cat);
                    Activation::Requery(cat.key().to_string())
                }
                None => {
                    log::warn!("slash menu: unknown category key {key:?}");
                    Activation::Ignored
                }
            },
            SuggestionAction::InsertTemplate { template_id } => {
                let Some(t) = self.templates.iter().find(|t| &t.id == template_id) else {
                    log::warn!("slash menu: template {template_id:?} is not in the catalog");
                    return Activation::Ignored;
                };
                self.inserter
                    .insert_titled(&t.title, t.content.clone(), &self.template_config);
                self.reset();
                Activation::Closed
            }
            SuggestionAction::HostDefault { .. } => {
                if let Err(e) = self.editor.apply_default_item(item) {
                    log::error!("slash menu: host item {:?} failed: {e}", item.title);
                }
                self.reset();
                Activation::Closed
            }
        }
    }

    /// Selector -> Transitioning -> Fuzzy(cat).
    pub fn select_category(&self, cat: Category) {
        self.begin_transition(Some(cat));
    }

    /// Fuzzy -> Transitioning -> Selector.
    pub fn navigate_back(&self) {
        if self.state() == MenuState::Selector {
            return;
        }
        self.begin_transition(None);
    }

    /// Back to a fresh selector for the next time the menu opens. Call when
    /// the menu closes without an insertion.
    pub fn reset(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(t) = inner.transition_timer.take() {
            self.scheduler.clear_timeout(t);
        }
        if let Some(t) = inner.debounce.timer.take() {
            self.scheduler.clear_timeout(t);
        }
        inner.debounce.generation += 1;
        inner.debounce.value = None;
        inner.state = MenuState::Selector;
    }

    /// Cancel pending timers. Also runs on drop.
    pub fn dispose(&self) {
        let mut inner = self.inner.borrow_mut();
        if let Some(t) = inner.debounce.timer.take() {
            self.scheduler.clear_timeout(t);
        }
        if let Some(t) = inner.transition_timer.take() {
            self.scheduler.clear_timeout(t);
        }
        inner.debounce.generation += 1;
        inner.refresh = None;
    }

    fn resolve(&self, query: &str) -> Vec<SuggestionItem> {
        let (state, debounced) = {
            let inner = self.inner.borrow();
            (inner.state, inner.debounce.value.clone())
        };

        if let MenuState::Transitioning { target } = state {
            return vec![placeholder_item(target)];
        }

        let effective = debounced
            .filter(|q| !q.is_empty())
            .unwrap_or_else(|| query.to_string());
        let parsed = parse_query(&effective);
        log::debug!("slash menu query {query:?} (using {effective:?}) -> {parsed:?} in {state:?}");

        let Some(cat) = parsed.category else {
            self.enter(MenuState::Selector);
            return score_and_rank(selector_items(), &parsed.search_query);
        };

        match state {
            MenuState::Fuzzy(_) => {
                self.enter(MenuState::Fuzzy(cat));
                self.category_items(cat, &parsed.search_query)
            }
            _ if !parsed.search_query.is_empty() => {
                // "<key><text>" skips the transition.
                self.enter(MenuState::Fuzzy(cat));
                self.category_items(cat, &parsed.search_query)
            }
            _ => {
                self.begin_transition(Some(cat));
                vec![placeholder_item(Some(cat))]
            }
        }
    }

    fn category_items(&self, cat: Category, search: &str) -> Vec<SuggestionItem> {
        let items = match cat {
            Category::Blocks => block_items(self.editor.default_suggestion_items(), &self.menu_config),
            Category::Templates => template_items(&self.templates),
        };
        score_and_rank(items, search)
    }

    fn enter(&self, next: MenuState) {
        self.inner.borrow_mut().enter(next, self.scheduler.as_ref());
    }

    fn schedule_debounce(&self, query: &str) {
        let mut inner = self.inner.borrow_mut();
        let delay = match inner.state {
            MenuState::Transitioning { .. } => self.timings.transition_debounce,
            _ => self.timings.debounce,
        };

        if let Some(t) = inner.debounce.timer.take() {
            self.scheduler.clear_timeout(t);
        }
        inner.debounce.generation += 1;
        let generation = inner.debounce.generation;

        let weak = Rc::downgrade(&self.inner);
        let query = query.to_string();
        let id = self.scheduler.set_timeout(
            delay,
            Box::new(move || {
                let listener = {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    let mut st = inner.borrow_mut();
                    if st.debounce.generation != generation {
                        return;
                    }
                    st.debounce.timer = None;
                    if st.debounce.value.as_deref() == Some(query.as_str()) {
                        return;
                    }
                    st.debounce.value = Some(query);
                    st.refresh.clone()
                };
                notify(listener);
            }),
        );
        inner.debounce.timer = Some(id);
    }

    fn begin_transition(&self, target: Option<Category>) {
        let settled = match target {
            Some(cat) => MenuState::Fuzzy(cat),
            None => MenuState::Selector,
        };

        {
            let mut inner = self.inner.borrow_mut();
            if let Some(t) = inner.transition_timer.take() {
                self.scheduler.clear_timeout(t);
            }
            inner.enter(MenuState::Transitioning { target }, self.scheduler.as_ref());
        }

        let weak: Weak<RefCell<MenuInner>> = Rc::downgrade(&self.inner);
        let scheduler = self.scheduler.clone();
        let id = self.scheduler.set_timeout(
            self.timings.transition,
            Box::new(move || {
                let listener = {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    let mut st = inner.borrow_mut();
                    st.transition_timer = None;
                    st.enter(settled, scheduler.as_ref());
                    st.refresh.clone()
                };
                notify(listener);
            }),
        );
        self.inner.borrow_mut().transition_timer = Some(id);
    }
}

impl Drop for SlashMenuController {
    fn drop(&mut self) {
        self.dispose();
    }
}

// Listeners may call back into the controller, so never hold the state borrow.
fn notify(listener: Option<Rc<dyn Fn()>>) {
    if let Some(l) = listener {
        l();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ContentBlock;
    use crate::host::testing::{numbered_blocks, RecordingEditor};
    use crate::host::InsertMode;
    use crate::scheduler::ManualScheduler;
    use std::cell::Cell;

    struct Fixture {
        editor: Rc<RecordingEditor>,
        scheduler: Rc<ManualScheduler>,
        menu: SlashMenuController,
    }

    fn host_item(key: &str, title: &str, aliases: &[&str], index: usize) -> SuggestionItem {
        SuggestionItem {
            title: title.to_string(),
            group: "Basic blocks".to_string(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            key: Some(key.to_string()),
            action: SuggestionAction::HostDefault { index },
            ..Default::default()
        }
    }

    fn template(id: &str, title: &str, aliases: &[&str], content: Vec<ContentBlock>) -> DocumentTemplate {
        DocumentTemplate {
            id: id.to_string(),
            title: title.to_string(),
            subtext: String::new(),
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
            group: "Templates".to_string(),
            icon: "document".to_string(),
            content,
        }
    }

    fn fixture() -> Fixture {
        let editor = Rc::new(RecordingEditor {
            defaults: vec![
                host_item("heading", "Heading 1", &["h", "h1"], 0),
                host_item("quote", "Quote", &["bq"], 1),
                host_item("video", "Video", &["media"], 2),
            ],
            ..RecordingEditor::with_empty_paragraph()
        });
        let handle: Rc<dyn EditorHandle> = editor.clone();
        let scheduler = Rc::new(ManualScheduler::new(0));
        let templates = vec![
            template("budget", "Monthly Budget", &["finance"], numbered_blocks(3)),
            template("meeting", "Meeting Notes", &["agenda"], numbered_blocks(2)),
            template("huge", "Huge", &[], numbered_blocks(40)),
        ];
        let mut config = WidgetConfig::default();
        config.template_config = TemplateConfig::new(30, 10);
        let menu = SlashMenuController::new(handle, scheduler.clone(), templates, &config);
        Fixture {
            editor,
            scheduler,
            menu,
        }
    }

    fn titles(items: &[SuggestionItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_parse_query_rules() {
        let p = parse_query("   ");
        assert!(p.shows_selector());
        assert_eq!(p.search_query, "");

        let p = parse_query(" T ");
        assert_eq!(p.category, Some(Category::Templates));
        assert_eq!(p.search_query, "");

        let p = parse_query("t  budget ");
        assert_eq!(p.category, Some(Category::Templates));
        assert_eq!(p.search_query, "budget");

        let p = parse_query("bq");
        assert_eq!(p.category, Some(Category::Blocks));
        assert_eq!(p.search_query, "q");

        let p = parse_query("xyz");
        assert!(p.shows_selector());
        assert_eq!(p.search_query, "xyz");
    }

    #[test]
    fn test_empty_query_shows_selector() {
        let f = fixture();
        let items = f.menu.get_items("");
        assert_eq!(titles(&items), vec!["Blocks", "Templates"]);
        assert_eq!(f.menu.state(), MenuState::Selector);
        assert_eq!(f.menu.trigger_character(), '/');
    }

    #[test]
    fn test_free_text_filters_the_selector() {
        let f = fixture();
        let items = f.menu.get_items("emp");
        assert_eq!(titles(&items), vec!["Templates"]);
        assert_eq!(f.menu.state(), MenuState::Selector);
    }

    #[test]
    fn test_category_key_goes_through_transition() {
        let f = fixture();

        let items = f.menu.get_items("t");
        assert_eq!(titles(&items), vec!["Loading Templates..."]);
        assert_eq!(
            f.menu.state(),
            MenuState::Transitioning {
                target: Some(Category::Templates)
            }
        );

        // Never empty while switching.
        let items = f.menu.get_items("t");
        assert_eq!(items.len(), 1);
        assert!(items[0].is_placeholder());

        f.scheduler.advance(150);
        assert_eq!(f.menu.state(), MenuState::Fuzzy(Category::Templates));

        let items = f.menu.get_items("t");
        assert_eq!(titles(&items), vec!["Monthly Budget", "Meeting Notes", "Huge"]);
    }

    #[test]
    fn test_key_with_search_skips_transition() {
        let f = fixture();
        let seen = Rc::new(RefCell::new(vec![]));

        let items = f.menu.get_items("t budget");
        seen.borrow_mut().push(f.menu.state());
        assert_eq!(titles(&items), vec!["Monthly Budget"]);
        assert_eq!(f.menu.state(), MenuState::Fuzzy(Category::Templates));

        f.scheduler.advance(500);
        seen.borrow_mut().push(f.menu.state());
        assert!(seen
            .borrow()
            .iter()
            .all(|s| !matches!(s, MenuState::Transitioning { .. })));
    }

    #[test]
    fn test_block_category_uses_host_items_and_search() {
        let f = fixture();
        let items = f.menu.get_items("b h1");
        assert_eq!(titles(&items), vec!["Heading 1"]);
        assert_eq!(f.menu.state(), MenuState::Fuzzy(Category::Blocks));
    }

    #[test]
    fn test_block_filter_config_applies() {
        let editor = Rc::new(RecordingEditor {
            defaults: vec![
                host_item("quote", "Quote", &["bq"], 0),
                host_item("video", "Video", &["media"], 1),
            ],
            ..RecordingEditor::with_empty_paragraph()
        });
        let handle: Rc<dyn EditorHandle> = editor.clone();
        let scheduler = Rc::new(ManualScheduler::default());
        let config = WidgetConfig::from_json(
            r#"{"slashMenuConfig": {"mode": "filtered", "disabled_items": ["media"]}}"#,
        )
        .expect("config should parse");
        let menu = SlashMenuController::new(handle, scheduler, vec![], &config);

        let items = menu.get_items("b q");
        assert_eq!(titles(&items), vec!["Quote"]);
        let items = menu.get_items("b vid");
        assert!(items.is_empty());
    }

    #[test]
    fn test_clearing_query_returns_to_selector() {
        let f = fixture();
        f.menu.get_items("t budget");
        assert_eq!(f.menu.state(), MenuState::Fuzzy(Category::Templates));

        let items = f.menu.get_items("");
        assert_eq!(titles(&items), vec!["Blocks", "Templates"]);
        assert_eq!(f.menu.state(), MenuState::Selector);
    }

    #[test]
    fn test_switching_category_from_fuzzy_is_direct() {
        let f = fixture();
        f.menu.get_items("t budget");
        let items = f.menu.get_items("b");
        assert_eq!(f.menu.state(), MenuState::Fuzzy(Category::Blocks));
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_debounced_query_lags_and_then_refreshes() {
        let f = fixture();
        let refreshes = Rc::new(Cell::new(0));
        let r2 = refreshes.clone();
        f.menu.set_refresh_listener(move || r2.set(r2.get() + 1));

        f.menu.get_items("t budget");
        f.scheduler.advance(200);
        assert_eq!(refreshes.get(), 1);

        // The settled value is used until the next one lands.
        let items = f.menu.get_items("t meet");
        assert_eq!(titles(&items), vec!["Monthly Budget"]);

        f.scheduler.advance(199);
        assert_eq!(refreshes.get(), 1);
        f.scheduler.advance(1);
        assert_eq!(refreshes.get(), 2);
        let items = f.menu.get_items("t meet");
        assert_eq!(titles(&items), vec!["Meeting Notes"]);

        // Same text again settles without another refresh.
        f.scheduler.advance(200);
        assert_eq!(refreshes.get(), 2);
    }

    #[test]
    fn test_new_keystroke_cancels_pending_debounce() {
        let f = fixture();
        let refreshes = Rc::new(Cell::new(0));
        let r2 = refreshes.clone();
        f.menu.set_refresh_listener(move || r2.set(r2.get() + 1));

        f.menu.get_items("xa");
        f.scheduler.advance(150);
        f.menu.get_items("xab");
        f.scheduler.advance(150);
        assert_eq!(refreshes.get(), 0);
        f.scheduler.advance(50);
        assert_eq!(refreshes.get(), 1);
        assert_eq!(f.scheduler.pending_count(), 0);
    }

    #[test]
    fn test_cleared_query_lands_after_debounce() {
        let f = fixture();
        f.menu.get_items("t budget");
        f.scheduler.advance(200);

        // Until "" settles the last settled query still applies.
        f.menu.get_items("");
        assert_eq!(f.menu.state(), MenuState::Fuzzy(Category::Templates));
        f.scheduler.advance(200);
        let items = f.menu.get_items("");
        assert_eq!(titles(&items), vec!["Blocks", "Templates"]);
        assert_eq!(f.menu.state(), MenuState::Selector);
    }

    #[test]
    fn test_state_change_discards_stale_debounce() {
        let f = fixture();
        f.menu.get_items("t budget");
        // Pending "t budget" would drag the selector back into templates.
        f.menu.navigate_back();
        f.scheduler.advance(250);
        assert_eq!(f.scheduler.pending_count(), 0);
        assert_eq!(f.menu.state(), MenuState::Selector);

        let items = f.menu.get_items("");
        assert_eq!(titles(&items), vec!["Blocks", "Templates"]);
    }

    #[test]
    fn test_transition_uses_short_debounce_and_notifies() {
        let f = fixture();
        let refreshes = Rc::new(Cell::new(0));
        let r2 = refreshes.clone();
        f.menu.set_refresh_listener(move || r2.set(r2.get() + 1));

        f.menu.get_items("t");
        // Keystroke during the transition: debounce is 100 here.
        f.menu.get_items("t");
        f.scheduler.advance(100);
        assert_eq!(refreshes.get(), 1);
        f.scheduler.advance(50);
        assert_eq!(refreshes.get(), 2);
        assert_eq!(f.menu.state(), MenuState::Fuzzy(Category::Templates));
    }

    #[test]
    fn test_refresh_listener_may_reenter() {
        let f = fixture();
        let menu = Rc::new(f.menu);
        let seen = Rc::new(RefCell::new(vec![]));

        let weak = Rc::downgrade(&menu);
        let s2 = seen.clone();
        menu.set_refresh_listener(move || {
            if let Some(m) = weak.upgrade() {
                let items = m.get_items("t");
                s2.borrow_mut().push(items.len());
            }
        });

        menu.get_items("t");
        f.scheduler.run_all();
        assert_eq!(menu.state(), MenuState::Fuzzy(Category::Templates));
        // Debounce lands mid-transition (placeholder), then the list settles.
        assert_eq!(*seen.borrow(), vec![1, 3, 3]);
    }

    #[test]
    fn test_selector_item_opens_category() {
        let f = fixture();
        let items = f.menu.get_items("");
        let templates = items
            .iter()
            .find(|i| i.title == "Templates")
            .expect("templates entry");

        assert_eq!(f.menu.on_item_activated(templates), Activation::Requery("t".to_string()));
        assert_eq!(
            f.menu.state(),
            MenuState::Transitioning {
                target: Some(Category::Templates)
            }
        );
        f.scheduler.advance(150);
        assert_eq!(f.menu.state(), MenuState::Fuzzy(Category::Templates));
    }

    #[test]
    fn test_navigate_back_goes_through_transition() {
        let f = fixture();
        f.menu.get_items("t budget");
        f.menu.navigate_back();
        assert_eq!(f.menu.state(), MenuState::Transitioning { target: None });
        assert_eq!(titles(&f.menu.get_items("t budget")), vec!["Loading..."]);
        f.scheduler.advance(150);
        assert_eq!(f.menu.state(), MenuState::Selector);

        f.menu.navigate_back();
        assert_eq!(f.menu.state(), MenuState::Selector);
    }

    #[test]
    fn test_template_item_inserts_template() {
        let f = fixture();
        let items = f.menu.get_items("t budget");
        assert_eq!(f.menu.on_item_activated(&items[0]), Activation::Closed);
        assert_eq!(f.editor.inserted_ids(), vec!["blk-0", "blk-1", "blk-2"]);
        assert_eq!(f.editor.modes(), vec![InsertMode::Replace]);
    }

    #[test]
    fn test_oversized_template_item_inserts_notice() {
        let f = fixture();
        let items = f.menu.get_items("t huge");
        assert_eq!(items[0].title, "Huge");
        f.menu.on_item_activated(&items[0]);
        f.scheduler.run_all();

        let inserts = f.editor.inserts.borrow();
        assert_eq!(inserts.len(), 1);
        assert!(inserts[0].0[0].id.starts_with("error-header-"));
    }

    #[test]
    fn test_menu_resets_after_insertion() {
        let f = fixture();
        let items = f.menu.get_items("t budget");
        f.scheduler.advance(200);
        assert_eq!(f.menu.on_item_activated(&items[0]), Activation::Closed);
        assert_eq!(f.menu.state(), MenuState::Selector);
        f.scheduler.run_all();

        // Reopening with "/" must not replay "t budget".
        let items = f.menu.get_items("");
        assert_eq!(titles(&items), vec!["Blocks", "Templates"]);
        assert_eq!(f.menu.state(), MenuState::Selector);
    }

    #[test]
    fn test_reset_on_dismiss_cancels_transition() {
        let f = fixture();
        let refreshes = Rc::new(Cell::new(0));
        let r2 = refreshes.clone();
        f.menu.set_refresh_listener(move || r2.set(r2.get() + 1));

        f.menu.get_items("t");
        f.menu.reset();
        assert_eq!(f.scheduler.pending_count(), 0);
        f.scheduler.run_all();
        assert_eq!(refreshes.get(), 0);
        assert_eq!(f.menu.state(), MenuState::Selector);

        // Listener survives the reset.
        f.menu.get_items("t");
        f.scheduler.run_all();
        assert!(refreshes.get() > 0);
    }

    #[test]
    fn test_host_item_is_delegated() {
        let f = fixture();
        let items = f.menu.get_items("b quote");
        assert_eq!(f.menu.on_item_activated(&items[0]), Activation::Closed);
        assert_eq!(*f.editor.applied.borrow(), vec!["Quote"]);
        assert!(f.editor.inserts.borrow().is_empty());
    }

    #[test]
    fn test_placeholder_and_unknown_items_are_ignored() {
        let f = fixture();
        let placeholder = f.menu.get_items("t").remove(0);
        assert_eq!(f.menu.on_item_activated(&placeholder), Activation::Ignored);

        let stale = SuggestionItem {
            title: "Gone".to_string(),
            action: SuggestionAction::InsertTemplate {
                template_id: "deleted".to_string(),
            },
            ..Default::default()
        };
        assert_eq!(f.menu.on_item_activated(&stale), Activation::Ignored);
    }

    #[test]
    fn test_drop_cancels_timers() {
        let f = fixture();
        f.menu.get_items("t");
        assert_eq!(f.scheduler.pending_count(), 2);
        let scheduler = f.scheduler.clone();
        drop(f);
        assert_eq!(scheduler.pending_count(), 0);
    }
}
