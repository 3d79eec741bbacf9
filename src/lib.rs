//! Slash menu and template insertion for the BlockNote form widget.
//!
//! The core (menu state machine, fuzzy matching, chunked insertion, document
//! model) is plain Rust behind the [`host::EditorHandle`] and
//! [`scheduler::Scheduler`] traits. [`binding`] wires it to the JS editor.

pub mod binding;
pub mod config;
pub mod document;
pub mod field_sync;
pub mod host;
pub mod logging;
pub mod menu;
pub mod scheduler;
pub mod templates;

pub use config::{MenuTimings, SlashMenuConfig, TemplateConfig, WidgetConfig};
pub use document::ContentBlock;
pub use host::{EditorError, EditorHandle};
pub use menu::{Activation, MenuState, SlashMenuController, SuggestionItem};
pub use templates::{DocumentTemplate, TemplateInserter};

// Needed for `#[wasm_bindgen(start)]` on the wasm entrypoint.
#[cfg(all(target_arch = "wasm32", not(test)))]
use wasm_bindgen::prelude::wasm_bindgen;

#[cfg_attr(all(target_arch = "wasm32", not(test)), wasm_bindgen(start))]
pub fn main() {
    console_error_panic_hook::set_once();
    logging::init_logging(log::LevelFilter::Info);
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::binding::{JsEditorHandle, SlashMenuBinding};
    use super::host::{BlockRef, EditorHandle};
    use super::menu::SuggestionAction;
    use wasm_bindgen::{JsCast, JsValue};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn fake_editor() -> JsValue {
        let make = js_sys::Function::new_no_args(
            r#"
            const doc = [{id: "b1", type: "paragraph", props: {}, content: [], children: []}];
            return {
                document: doc,
                cursor: "b1",
                calls: [],
                getTextCursorPosition() { return { block: { id: this.cursor } }; },
                setTextCursorPosition(id, edge) { this.cursor = id; this.calls.push(["cursor", id, edge]); },
                insertBlocks(blocks, id, mode) {
                    this.calls.push(["insert", blocks.length, id, mode]);
                    this.cursor = blocks[blocks.length - 1].id;
                },
            };
            "#,
        );
        make.call0(&JsValue::NULL).expect("fake editor")
    }

    fn host_defaults() -> js_sys::Array {
        let make = js_sys::Function::new_no_args(
            r#"
            return [{
                title: "Quote",
                aliases: ["bq"],
                group: "Basic blocks",
                key: "quote",
                icon: {},
                onItemClick(editor) { editor.quoted = true; },
            }];
            "#,
        );
        make.call0(&JsValue::NULL).expect("defaults").unchecked_into()
    }

    #[wasm_bindgen_test]
    fn test_js_editor_cursor_and_document() {
        let handle = JsEditorHandle::new(fake_editor(), js_sys::Array::new());
        assert_eq!(handle.cursor_block().expect("cursor"), BlockRef("b1".to_string()));
        let doc = handle.document().expect("document");
        assert_eq!(doc.len(), 1);
        assert_eq!(doc[0].kind, "paragraph");
    }

    #[wasm_bindgen_test]
    fn test_js_host_items_and_activation() {
        let editor = fake_editor();
        let handle = JsEditorHandle::new(editor.clone(), host_defaults());
        let items = handle.default_suggestion_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Quote");
        assert_eq!(items[0].action, SuggestionAction::HostDefault { index: 0 });

        handle.apply_default_item(&items[0]).expect("host click");
        let quoted = js_sys::Reflect::get(&editor, &"quoted".into()).expect("flag");
        assert_eq!(quoted.as_bool(), Some(true));
    }

    #[wasm_bindgen_test]
    fn test_binding_trigger_and_items() {
        let binding = SlashMenuBinding::new(
            fake_editor(),
            host_defaults(),
            JsValue::UNDEFINED,
            JsValue::UNDEFINED,
        )
        .expect("binding");
        assert_eq!(binding.trigger_character(), "/");
        let promise = binding.get_items("");
        assert!(promise.is_instance_of::<js_sys::Promise>());
        binding.on_menu_closed();
        binding.dispose();
    }

    #[wasm_bindgen_test]
    fn test_binding_ignores_malformed_items() {
        let binding = SlashMenuBinding::new(
            fake_editor(),
            host_defaults(),
            JsValue::UNDEFINED,
            JsValue::UNDEFINED,
        )
        .expect("binding");
        let malformed = js_sys::Function::new_no_args("return {title: 3};")
            .call0(&JsValue::NULL)
            .expect("item");

        for item in [malformed, JsValue::UNDEFINED] {
            let out = binding.on_item_click(item);
            let kind = js_sys::Reflect::get(&out, &"kind".into()).expect("kind");
            assert_eq!(kind.as_string().as_deref(), Some("ignored"));
        }
    }
}
