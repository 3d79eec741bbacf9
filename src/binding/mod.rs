//! `wasm-bindgen` surface handed to the page script that mounts the editor.

use crate::config::{ConfigError, WidgetConfig};
use crate::document::{parse_initial_content, ContentBlock};
use crate::field_sync::DocumentSync;
use crate::host::{BlockRef, CursorEdge, EditorError, EditorHandle, EditorResult, InsertMode};
use crate::menu::{Activation, SlashMenuController, SuggestionAction, SuggestionItem};
use crate::scheduler::{BrowserScheduler, Scheduler};
use crate::templates::DocumentTemplate;
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

#[derive(Debug, Error)]
pub enum BindingError {
    #[error("could not convert {what}: {message}")]
    Conversion { what: &'static str, message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Editor(#[from] EditorError),
}

impl BindingError {
    fn conversion(what: &'static str, e: impl std::fmt::Display) -> Self {
        Self::Conversion {
            what,
            message: e.to_string(),
        }
    }
}

impl From<BindingError> for JsValue {
    fn from(e: BindingError) -> Self {
        js_sys::Error::new(&e.to_string()).into()
    }
}

fn js_message(v: &JsValue) -> String {
    if let Some(err) = v.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    v.as_string().unwrap_or_else(|| format!("{v:?}"))
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    // Plain objects, not `Map`s: the editor expects JSON-shaped props.
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

fn get(target: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    js_sys::Reflect::get(target, &JsValue::from_str(key))
}

/// Fields of a host slash-menu item we care about. Icons and handlers stay on
/// the JS side.
#[derive(Deserialize, Default)]
#[serde(default)]
struct HostItem {
    title: String,
    subtext: Option<String>,
    group: Option<String>,
    aliases: Vec<String>,
    key: Option<String>,
    badge: Option<String>,
}

/// [`EditorHandle`] over the JS editor object.
pub struct JsEditorHandle {
    editor: JsValue,
    defaults: js_sys::Array,
}

impl JsEditorHandle {
    pub fn new(editor: JsValue, defaults: js_sys::Array) -> Self {
        Self { editor, defaults }
    }

    fn method(&self, op: &'static str) -> EditorResult<js_sys::Function> {
        get(&self.editor, op)
            .map_err(|e| EditorError::call(op, js_message(&e)))?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| EditorError::call(op, "not a function"))
    }
}

impl EditorHandle for JsEditorHandle {
    fn cursor_block(&self) -> EditorResult<BlockRef> {
        let op = "getTextCursorPosition";
        let pos = self
            .method(op)?
            .call0(&self.editor)
            .map_err(|e| EditorError::call(op, js_message(&e)))?;
        let id = get(&pos, "block")
            .and_then(|block| get(&block, "id"))
            .ok()
            .and_then(|id| id.as_string())
            .ok_or(EditorError::NoCursorBlock)?;
        Ok(BlockRef(id))
    }

    fn set_cursor(&self, block: &BlockRef, edge: CursorEdge) -> EditorResult<()> {
        let op = "setTextCursorPosition";
        self.method(op)?
            .call2(
                &self.editor,
                &JsValue::from_str(block.as_str()),
                &JsValue::from_str(edge.as_ref()),
            )
            .map_err(|e| EditorError::call(op, js_message(&e)))?;
        Ok(())
    }

    fn insert_blocks(
        &self,
        blocks: &[ContentBlock],
        at: &BlockRef,
        mode: InsertMode,
    ) -> EditorResult<()> {
        let op = "insertBlocks";
        let payload = to_js(blocks).map_err(|e| EditorError::Payload(e.to_string()))?;
        self.method(op)?
            .call3(
                &self.editor,
                &payload,
                &JsValue::from_str(at.as_str()),
                &JsValue::from_str(mode.as_ref()),
            )
            .map_err(|e| EditorError::call(op, js_message(&e)))?;
        Ok(())
    }

    fn document(&self) -> EditorResult<Vec<ContentBlock>> {
        let doc = get(&self.editor, "document").map_err(|e| EditorError::call("document", js_message(&e)))?;
        serde_wasm_bindgen::from_value(doc).map_err(|e| EditorError::Payload(e.to_string()))
    }

    fn default_suggestion_items(&self) -> Vec<SuggestionItem> {
        self.defaults
            .iter()
            .enumerate()
            .filter_map(|(index, raw)| match serde_wasm_bindgen::from_value::<HostItem>(raw) {
                Ok(h) => Some(SuggestionItem {
                    title: h.title,
                    subtext: h.subtext.unwrap_or_default(),
                    group: h.group.unwrap_or_default(),
                    icon: String::new(),
                    aliases: h.aliases,
                    key: h.key,
                    badge: h.badge,
                    action: SuggestionAction::HostDefault { index },
                }),
                Err(e) => {
                    log::warn!("skipping host menu item {index}: {e}");
                    None
                }
            })
            .collect()
    }

    fn apply_default_item(&self, item: &SuggestionItem) -> EditorResult<()> {
        let op = "onItemClick";
        let SuggestionAction::HostDefault { index } = item.action else {
            return Err(EditorError::Payload(format!("{:?} is not a host item", item.title)));
        };
        let index = u32::try_from(index).map_err(|e| EditorError::Payload(e.to_string()))?;
        let raw = self.defaults.get(index);
        if raw.is_undefined() {
            return Err(EditorError::call(op, format!("no host item at {index}")));
        }
        get(&raw, op)
            .map_err(|e| EditorError::call(op, js_message(&e)))?
            .dyn_into::<js_sys::Function>()
            .map_err(|_| EditorError::call(op, "not a function"))?
            .call1(&raw, &self.editor)
            .map_err(|e| EditorError::call(op, js_message(&e)))?;
        Ok(())
    }
}

fn activation_to_js(a: &Activation) -> JsValue {
    let out = js_sys::Object::new();
    let (kind, query) = match a {
        Activation::Closed => ("closed", None),
        Activation::Requery(q) => ("requery", Some(q.as_str())),
        Activation::Ignored => ("ignored", None),
    };
    // Setting properties on a fresh plain object cannot throw.
    let _ = js_sys::Reflect::set(&out, &"kind".into(), &kind.into());
    if let Some(q) = query {
        let _ = js_sys::Reflect::set(&out, &"query".into(), &q.into());
    }
    out.into()
}

/// Slash menu for one mounted editor.
#[wasm_bindgen]
pub struct SlashMenuBinding {
    controller: SlashMenuController,
}

#[wasm_bindgen]
impl SlashMenuBinding {
    /// `templates` is the catalog array, `config` the widget configuration
    /// object (`undefined` for defaults).
    #[wasm_bindgen(constructor)]
    pub fn new(
        editor: JsValue,
        default_items: js_sys::Array,
        templates: JsValue,
        config: JsValue,
    ) -> Result<SlashMenuBinding, JsValue> {
        Ok(Self::build(editor, default_items, templates, config)?)
    }

    #[wasm_bindgen(js_name = triggerCharacter)]
    pub fn trigger_character(&self) -> String {
        self.controller.trigger_character().to_string()
    }

    /// Resolves to the item list for `query`. Never rejects.
    #[wasm_bindgen(js_name = getItems)]
    pub fn get_items(&self, query: &str) -> js_sys::Promise {
        let items = self.controller.get_items(query);
        let value = to_js(&items).unwrap_or_else(|e| {
            log::error!("could not convert menu items: {e}");
            js_sys::Array::new().into()
        });
        js_sys::Promise::resolve(&value)
    }

    /// Returns `{kind: "closed" | "requery" | "ignored", query?}`. Never
    /// throws; items this menu did not produce are ignored.
    #[wasm_bindgen(js_name = onItemClick)]
    pub fn on_item_click(&self, item: JsValue) -> JsValue {
        let activation = match serde_wasm_bindgen::from_value::<SuggestionItem>(item) {
            Ok(item) => self.controller.on_item_activated(&item),
            Err(e) => {
                log::warn!("{}", BindingError::conversion("menu item", e));
                Activation::Ignored
            }
        };
        activation_to_js(&activation)
    }

    /// The host dismissed the menu; the next `/` starts from the selector.
    #[wasm_bindgen(js_name = onMenuClosed)]
    pub fn on_menu_closed(&self) {
        self.controller.reset();
    }

    #[wasm_bindgen(js_name = setRefreshListener)]
    pub fn set_refresh_listener(&self, listener: js_sys::Function) {
        self.controller.set_refresh_listener(move || {
            if let Err(e) = listener.call0(&JsValue::NULL) {
                log::warn!("slash menu refresh listener threw: {}", js_message(&e));
            }
        });
    }

    #[wasm_bindgen(js_name = navigateBack)]
    pub fn navigate_back(&self) {
        self.controller.navigate_back();
    }

    pub fn dispose(&self) {
        self.controller.dispose();
    }
}

impl SlashMenuBinding {
    fn build(
        editor: JsValue,
        default_items: js_sys::Array,
        templates: JsValue,
        config: JsValue,
    ) -> Result<Self, BindingError> {
        let config: WidgetConfig = if config.is_undefined() || config.is_null() {
            WidgetConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| BindingError::conversion("widget config", e))?
        };
        config.template_config.validate()?;

        let templates: Vec<DocumentTemplate> = if templates.is_undefined() || templates.is_null() {
            vec![]
        } else {
            serde_wasm_bindgen::from_value(templates)
                .map_err(|e| BindingError::conversion("template catalog", e))?
        };
        log::info!("slash menu ready with {} templates", templates.len());

        let handle: Rc<dyn EditorHandle> = Rc::new(JsEditorHandle::new(editor, default_items));
        let scheduler: Rc<dyn Scheduler> = Rc::new(BrowserScheduler);
        Ok(Self {
            controller: SlashMenuController::new(handle, scheduler, templates, &config),
        })
    }
}

/// Keeps the hidden textarea in step with the editor document.
#[wasm_bindgen]
pub struct FieldSyncBinding {
    sync: DocumentSync<web_sys::HtmlTextAreaElement>,
}

#[wasm_bindgen]
impl FieldSyncBinding {
    /// `initial` is the JSON the server rendered for the field.
    #[wasm_bindgen(constructor)]
    pub fn new(field: web_sys::HtmlTextAreaElement, initial: &str, editable: bool) -> FieldSyncBinding {
        Self {
            sync: DocumentSync::new(field, parse_initial_content(initial), editable),
        }
    }

    /// Call from the editor's change handler with `editor.document`. Returns
    /// the URLs of images that were removed.
    #[wasm_bindgen(js_name = onChange)]
    pub fn on_change(&mut self, document: JsValue) -> Result<Vec<String>, JsValue> {
        let blocks: Vec<ContentBlock> = serde_wasm_bindgen::from_value(document)
            .map_err(|e| BindingError::conversion("document", e))?;
        Ok(self.sync.on_document_changed(blocks))
    }
}
