//! Page Event Utilities
//!
//! Thin helpers for enhancing an already-rendered page: element lookup,
//! class toggling and page-lifetime event listeners.

use std::fmt;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, EventTarget, Window};

/// Errors raised while locating or wiring page elements
#[derive(Debug, Clone, PartialEq)]
pub enum DomError {
    /// No browser window (e.g. running outside a page)
    NoWindow,
    /// Window has no document
    NoDocument,
    /// Nothing matched the id or selector
    Missing(String),
    /// Element exists but is not the expected type
    WrongType(String),
    /// JS exception text
    Js(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::NoWindow => write!(f, "no window available"),
            DomError::NoDocument => write!(f, "window has no document"),
            DomError::Missing(what) => write!(f, "element not found: {}", what),
            DomError::WrongType(what) => write!(f, "element has unexpected type: {}", what),
            DomError::Js(msg) => write!(f, "js error: {}", msg),
        }
    }
}

impl std::error::Error for DomError {}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

pub type DomResult<T> = Result<T, DomError>;

pub fn window() -> DomResult<Window> {
    web_sys::window().ok_or(DomError::NoWindow)
}

pub fn document(window: &Window) -> DomResult<Document> {
    window.document().ok_or(DomError::NoDocument)
}

/// Look up an element by id and cast it to the wanted element type
pub fn by_id<T: JsCast>(doc: &Document, id: &str) -> DomResult<T> {
    doc.get_element_by_id(id)
        .ok_or_else(|| DomError::Missing(format!("#{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| DomError::WrongType(format!("#{}", id)))
}

/// First element matching `selector` inside `doc`
pub fn query<T: JsCast>(doc: &Document, selector: &str) -> DomResult<T> {
    doc.query_selector(selector)?
        .ok_or_else(|| DomError::Missing(selector.to_string()))?
        .dyn_into::<T>()
        .map_err(|_| DomError::WrongType(selector.to_string()))
}

/// All elements matching `selector` in document order
pub fn query_all(doc: &Document, selector: &str) -> DomResult<Vec<Element>> {
    Ok(collect_elements(&doc.query_selector_all(selector)?))
}

/// All elements matching `selector` below `root`, in document order
pub fn query_all_in(root: &Element, selector: &str) -> DomResult<Vec<Element>> {
    Ok(collect_elements(&root.query_selector_all(selector)?))
}

fn collect_elements(list: &web_sys::NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.get(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn has_class(el: &Element, class: &str) -> bool {
    el.class_list().contains(class)
}

/// Add or remove `class` so its presence matches `on`
pub fn set_class(el: &Element, class: &str, on: bool) {
    let list = el.class_list();
    let _ = if on { list.add_1(class) } else { list.remove_1(class) };
}

/// True when both handles point at the same JS object
pub fn same_node(a: &impl AsRef<JsValue>, b: &impl AsRef<JsValue>) -> bool {
    a.as_ref() == b.as_ref()
}

/// Register `handler` for `event` on `target` for the rest of the page lifetime
pub fn listen<F>(target: &impl AsRef<EventTarget>, event: &str, handler: F) -> DomResult<()>
where
    F: FnMut(web_sys::Event) + 'static,
{
    let cb = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
    target
        .as_ref()
        .add_event_listener_with_callback(event, cb.as_ref().unchecked_ref())?;
    cb.forget();
    Ok(())
}

/// Register the same handler factory on every element in `targets`
pub fn listen_each<F, H>(targets: &[Element], event: &str, mut make_handler: F) -> DomResult<()>
where
    F: FnMut(&Element) -> H,
    H: FnMut(web_sys::Event) + 'static,
{
    for target in targets {
        listen(target, event, make_handler(target))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(DomError::Missing("#navbar".into()).to_string(), "element not found: #navbar");
        assert_eq!(DomError::WrongType(".x".into()).to_string(), "element has unexpected type: .x");
        assert_eq!(DomError::NoWindow.to_string(), "no window available");
    }
}
