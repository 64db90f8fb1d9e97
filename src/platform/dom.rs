//! DOM helpers
//!
//! Every lookup is by element id and does nothing when the element is absent,
//! so a page can leave out any part of the HUD.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

pub fn document() -> Option<Document> {
    web_sys::window()?.document()
}

pub fn element(id: &str) -> Option<Element> {
    document()?.get_element_by_id(id)
}

/// Replace the text of an element
pub fn set_text(id: &str, text: &str) {
    if let Some(el) = element(id) {
        if el.text_content().as_deref() != Some(text) {
            el.set_text_content(Some(text));
        }
    }
}

/// Add or remove one CSS class
pub fn toggle_class(id: &str, class: &str, on: bool) {
    if let Some(el) = element(id) {
        let list = el.class_list();
        let _ = if on { list.add_1(class) } else { list.remove_1(class) };
    }
}

/// Run `handler` on every click of element `id`; returns false if it is missing
pub fn on_click<F>(id: &str, mut handler: F) -> bool
where
    F: FnMut() + 'static,
{
    let Some(el) = element(id) else {
        log::warn!("No #{} element, skipping click handler", id);
        return false;
    };
    let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
    let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
    closure.forget();
    true
}
