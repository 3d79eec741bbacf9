//! Mirrors the editor document into the hidden form field the server reads.

use crate::document::{find_removed_images, ContentBlock};

/// The form control that carries the document on submit.
pub trait FormField {
    fn set_value(&self, value: &str);

    /// Let form listeners know the value moved.
    fn notify_change(&self);
}

impl FormField for web_sys::HtmlTextAreaElement {
    fn set_value(&self, value: &str) {
        web_sys::HtmlTextAreaElement::set_value(self, value);
    }

    fn notify_change(&self) {
        let init = web_sys::EventInit::new();
        init.set_bubbles(true);
        match web_sys::Event::new_with_event_init_dict("change", &init) {
            Ok(ev) => {
                if let Err(e) = self.dispatch_event(&ev) {
                    log::warn!("change event dispatch failed: {e:?}");
                }
            }
            Err(e) => log::warn!("could not create change event: {e:?}"),
        }
    }
}

pub struct DocumentSync<F: FormField> {
    field: F,
    previous: Vec<ContentBlock>,
    editable: bool,
}

impl<F: FormField> DocumentSync<F> {
    pub fn new(field: F, initial: Vec<ContentBlock>, editable: bool) -> Self {
        Self {
            field,
            previous: initial,
            editable,
        }
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Write `current` into the field and return image URLs that disappeared
    /// since the last call. Readonly widgets never touch the field.
    pub fn on_document_changed(&mut self, current: Vec<ContentBlock>) -> Vec<String> {
        if !self.editable {
            return vec![];
        }

        match serde_json::to_string(&current) {
            Ok(json) => {
                self.field.set_value(&json);
                self.field.notify_change();
            }
            Err(e) => log::error!("could not serialise document for the form field: {e}"),
        }

        let removed = find_removed_images(&self.previous, &current);
        if !removed.is_empty() {
            log::info!("{} image(s) removed from document: {:?}", removed.len(), removed);
        }
        self.previous = current;
        removed
    }
}
