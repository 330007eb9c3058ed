//! Portfolio Modal
//!
//! Fills the details overlay from the project table and handles the three
//! ways of closing it (close button, backdrop click, Escape).

use std::rc::Rc;

use leptos::prelude::{GetUntracked, RwSignal, Set};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlImageElement, KeyboardEvent};

use crate::context::PageContext;
use crate::error::SetupResult;
use crate::models::{Catalog, ProjectRecord};

const MODAL_ID: &str = "portfolio-modal";
const CLOSE_SELECTOR: &str = ".close-modal";
const VIEW_DETAILS_SELECTOR: &str = ".view-details";
const PROJECT_ATTR: &str = "data-project";
const IMAGE_SLOT_ID: &str = "modal-image";
const SHOW_CLASS: &str = "show";

/// How the modal was asked to close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseTrigger {
    CloseButton,
    Backdrop,
    Escape,
}

/// Which project (if any) the overlay is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModalState {
    showing: Option<u32>,
}

impl ModalState {
    pub fn is_visible(&self) -> bool {
        self.showing.is_some()
    }

    pub fn showing(&self) -> Option<u32> {
        self.showing
    }

    /// Show `id` if the catalog has it; an unknown id leaves the modal as is
    pub fn open<'a>(&mut self, catalog: &'a Catalog, id: u32) -> Option<&'a ProjectRecord> {
        let record = catalog.get(id)?;
        self.showing = Some(id);
        Some(record)
    }

    /// Returns whether the modal should be hidden for this trigger.
    /// Escape only acts while the modal is visible.
    pub fn close(&mut self, trigger: CloseTrigger) -> bool {
        if trigger == CloseTrigger::Escape && !self.is_visible() {
            return false;
        }
        self.showing = None;
        true
    }

    /// `overflow` value for `<body>`: scroll is locked while visible
    pub fn body_overflow(&self) -> &'static str {
        if self.is_visible() { "hidden" } else { "auto" }
    }
}

/// Text slots of the overlay, paired with the record field they show
pub fn text_slots(record: &ProjectRecord) -> [(&'static str, &str); 5] {
    [
        ("modal-title", record.title.as_str()),
        ("modal-description", record.description.as_str()),
        ("modal-client", record.client.as_str()),
        ("modal-year", record.year.as_str()),
        ("modal-category", record.category.as_str()),
    ]
}

pub fn parse_project_id(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse().ok()
}

fn fill_overlay(doc: &Document, record: &ProjectRecord) {
    if let Ok(img) = page_events::by_id::<HtmlImageElement>(doc, IMAGE_SLOT_ID) {
        img.set_src(&record.image_url);
    }
    for (slot, text) in text_slots(record) {
        match doc.get_element_by_id(slot) {
            Some(el) => el.set_text_content(Some(text)),
            None => log::warn!("[Modal] missing slot #{}", slot),
        }
    }
}

/// Mirror the state onto the overlay class and body scroll lock
fn render(doc: &Document, modal: &Element, state: ModalState) {
    page_events::set_class(modal, SHOW_CLASS, state.is_visible());
    if let Some(body) = doc.body() {
        let _ = HtmlElement::style(&body).set_property("overflow", state.body_overflow());
    }
}

fn close_with(doc: &Document, modal: &Element, state: RwSignal<ModalState>, trigger: CloseTrigger) {
    let mut next = state.get_untracked();
    if next.close(trigger) {
        state.set(next);
        render(doc, modal, next);
        log::debug!("[Modal] closed via {:?}", trigger);
    }
}

pub fn init(ctx: &PageContext) -> SetupResult<()> {
    let catalog = Rc::new(Catalog::builtin()?);
    let doc = ctx.document.clone();
    let modal: Element = page_events::by_id(&doc, MODAL_ID)?;
    let close: HtmlElement = page_events::query(&doc, CLOSE_SELECTOR)?;
    let buttons = page_events::query_all(&doc, VIEW_DETAILS_SELECTOR)?;
    let state = RwSignal::new(ModalState::default());

    page_events::listen_each(&buttons, "click", |button| {
        let (doc, modal, catalog) = (doc.clone(), modal.clone(), Rc::clone(&catalog));
        let raw_id = button.get_attribute(PROJECT_ATTR);
        move |ev: web_sys::Event| {
            ev.stop_propagation();
            let Some(id) = parse_project_id(raw_id.as_deref()) else {
                log::warn!("[Modal] button has no usable {}: {:?}", PROJECT_ATTR, raw_id);
                return;
            };
            let mut next = state.get_untracked();
            match next.open(&catalog, id) {
                Some(record) => {
                    fill_overlay(&doc, record);
                    state.set(next);
                    render(&doc, &modal, next);
                    log::debug!("[Modal] showing project {:?}", next.showing());
                }
                None => log::warn!("[Modal] no project with id {}", id),
            }
        }
    })?;

    {
        let (doc, modal) = (doc.clone(), modal.clone());
        page_events::listen(&close, "click", move |_| {
            close_with(&doc, &modal, state, CloseTrigger::CloseButton);
        })?;
    }

    {
        let (doc, backdrop) = (doc.clone(), modal.clone());
        page_events::listen(&modal, "click", move |ev| {
            let on_backdrop = ev.target().map_or(false, |t| page_events::same_node(&t, &backdrop));
            if on_backdrop {
                close_with(&doc, &backdrop, state, CloseTrigger::Backdrop);
            }
        })?;
    }

    let key_doc = doc.clone();
    page_events::listen(&doc, "keydown", move |ev| {
        let is_escape = ev
            .dyn_ref::<KeyboardEvent>()
            .map_or(false, |k| k.key() == "Escape");
        if is_escape {
            close_with(&key_doc, &modal, state, CloseTrigger::Escape);
        }
    })?;

    log::info!("[Modal] {} projects, {} detail buttons", catalog.len(), buttons.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::builtin().unwrap()
    }

    #[test]
    fn test_open_mirrors_record_fields() {
        let catalog = catalog();
        let mut state = ModalState::default();
        let record = state.open(&catalog, 2).unwrap().clone();

        assert!(state.is_visible());
        assert_eq!(state.showing(), Some(2));
        assert_eq!(state.body_overflow(), "hidden");

        let slots = text_slots(&record);
        assert_eq!(slots[0], ("modal-title", "TechFlow UI/UX Design"));
        assert_eq!(slots[1].1, record.description);
        assert_eq!(slots[2], ("modal-client", "TechFlow Solutions"));
        assert_eq!(slots[3], ("modal-year", "2024"));
        assert_eq!(slots[4], ("modal-category", "Digital Design"));
        assert_eq!(record.image_url, catalog.get(2).unwrap().image_url);
    }

    #[test]
    fn test_each_close_trigger_hides_and_unlocks() {
        let catalog = catalog();
        for trigger in [CloseTrigger::CloseButton, CloseTrigger::Backdrop, CloseTrigger::Escape] {
            let mut state = ModalState::default();
            state.open(&catalog, 1).unwrap();
            assert!(state.close(trigger));
            assert!(!state.is_visible());
            assert_eq!(state.body_overflow(), "auto");
        }
    }

    #[test]
    fn test_escape_ignored_while_hidden() {
        let mut state = ModalState::default();
        assert!(!state.close(CloseTrigger::Escape));
        assert!(state.close(CloseTrigger::CloseButton));
    }

    #[test]
    fn test_unknown_project_keeps_modal_closed() {
        let catalog = catalog();
        let mut state = ModalState::default();
        assert!(state.open(&catalog, 42).is_none());
        assert!(!state.is_visible());
    }

    #[test]
    fn test_parse_project_id() {
        assert_eq!(parse_project_id(Some("3")), Some(3));
        assert_eq!(parse_project_id(Some("x")), None);
        assert_eq!(parse_project_id(None), None);
    }
}
