//! Theme Controller
//!
//! Resolves the light/dark theme (stored choice > system setting > light),
//! applies it to `<html data-theme>` and keeps it in sync with the toggle
//! button and the system color-scheme setting.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, MediaQueryListEvent, Storage};

use crate::context::PageContext;
use crate::error::SetupResult;

const TOGGLE_ID: &str = "theme-toggle";
const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

/// Color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark { Theme::Dark } else { Theme::Light }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Accessible label for the toggle, describing what a click will do
    pub fn toggle_label(self) -> &'static str {
        match self {
            Theme::Dark => "Switch to light mode",
            Theme::Light => "Switch to dark mode",
        }
    }
}

/// Theme cascade: stored choice, then system setting, then light
pub fn resolve_theme(stored: Option<Theme>, prefers_dark: bool) -> Theme {
    stored.unwrap_or_else(|| Theme::from_system(prefers_dark))
}

/// Durable storage for the user's theme choice
pub trait PreferenceStore {
    /// Stored choice, `None` when the user never picked one
    fn load(&self) -> Option<Theme>;
    fn save(&self, theme: Theme);
}

/// `localStorage`-backed preference
pub struct BrowserStorage {
    storage: Option<Storage>,
    key: &'static str,
}

impl BrowserStorage {
    pub fn new(ctx: &PageContext) -> Self {
        let storage = ctx.window.local_storage().ok().flatten();
        if storage.is_none() {
            log::warn!("[Theme] localStorage unavailable, choice will not persist");
        }
        Self { storage, key: ctx.config.theme_storage_key }
    }
}

impl PreferenceStore for BrowserStorage {
    fn load(&self) -> Option<Theme> {
        let raw = self.storage.as_ref()?.get_item(self.key).ok().flatten()?;
        let theme = Theme::parse(&raw);
        if theme.is_none() {
            log::debug!("[Theme] ignoring stored value {:?}", raw);
        }
        theme
    }

    fn save(&self, theme: Theme) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(self.key, theme.as_str()) {
                log::warn!("[Theme] failed to persist theme: {:?}", e);
            }
        }
    }
}

/// Current theme plus the store it is persisted to
pub struct ThemeController<S: PreferenceStore> {
    store: S,
    current: Theme,
}

impl<S: PreferenceStore> ThemeController<S> {
    pub fn new(store: S, prefers_dark: bool) -> Self {
        let current = resolve_theme(store.load(), prefers_dark);
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }

    /// Flip the theme and remember the choice
    pub fn toggle(&mut self) -> Theme {
        let next = self.current.toggled();
        self.store.save(next);
        self.current = next;
        next
    }

    /// Follow a system color-scheme change unless the user picked a theme.
    /// Returns the theme to apply, if it should change.
    pub fn system_changed(&mut self, prefers_dark: bool) -> Option<Theme> {
        if self.store.load().is_some() {
            return None;
        }
        self.current = Theme::from_system(prefers_dark);
        Some(self.current)
    }
}

/// Write the theme onto the document and refresh the toggle label
pub fn apply_theme(doc: &Document, theme: Theme) {
    if let Some(root) = doc.document_element() {
        let _ = root.set_attribute("data-theme", theme.as_str());
    }
    if let Some(toggle) = doc.get_element_by_id(TOGGLE_ID) {
        let _ = toggle.set_attribute("aria-label", theme.toggle_label());
    }
}

/// Apply the resolved theme immediately and bind toggle + system listeners
pub fn init(ctx: &PageContext) -> SetupResult<()> {
    let media = ctx.window.match_media(DARK_QUERY)?;
    let prefers_dark = media.as_ref().map_or(false, |mq| mq.matches());

    let controller = ThemeController::new(BrowserStorage::new(ctx), prefers_dark);
    apply_theme(&ctx.document, controller.current());
    log::info!("[Theme] initial theme: {}", controller.current().as_str());

    let controller = Rc::new(RefCell::new(controller));

    // The toggle is optional on some pages
    if let Some(toggle) = ctx.document.get_element_by_id(TOGGLE_ID) {
        let controller = Rc::clone(&controller);
        let doc = ctx.document.clone();
        page_events::listen(&toggle, "click", move |_| {
            let theme = controller.borrow_mut().toggle();
            log::debug!("[Theme] toggled to {}", theme.as_str());
            apply_theme(&doc, theme);
        })?;
    }

    if let Some(media) = media {
        let doc = ctx.document.clone();
        page_events::listen(&media, "change", move |ev| {
            let Some(ev) = ev.dyn_ref::<MediaQueryListEvent>() else { return };
            if let Some(theme) = controller.borrow_mut().system_changed(ev.matches()) {
                log::debug!("[Theme] following system: {}", theme.as_str());
                apply_theme(&doc, theme);
            }
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct MemoryStore {
        value: Cell<Option<Theme>>,
    }

    impl MemoryStore {
        fn with(theme: Theme) -> Self {
            Self { value: Cell::new(Some(theme)) }
        }

        fn clear(&self) {
            self.value.set(None);
        }
    }

    impl PreferenceStore for MemoryStore {
        fn load(&self) -> Option<Theme> {
            self.value.get()
        }

        fn save(&self, theme: Theme) {
            self.value.set(Some(theme));
        }
    }

    #[test]
    fn test_stored_choice_wins_over_system() {
        for stored in [Theme::Light, Theme::Dark] {
            for prefers_dark in [false, true] {
                let ctrl = ThemeController::new(MemoryStore::with(stored), prefers_dark);
                assert_eq!(ctrl.current(), stored);
            }
        }
    }

    #[test]
    fn test_system_setting_used_without_stored_choice() {
        assert_eq!(ThemeController::new(MemoryStore::default(), true).current(), Theme::Dark);
        assert_eq!(ThemeController::new(MemoryStore::default(), false).current(), Theme::Light);
    }

    #[test]
    fn test_system_change_tracked_only_without_stored_choice() {
        let mut ctrl = ThemeController::new(MemoryStore::default(), false);
        assert_eq!(ctrl.system_changed(true), Some(Theme::Dark));
        assert_eq!(ctrl.current(), Theme::Dark);
        assert_eq!(ctrl.system_changed(false), Some(Theme::Light));

        let mut pinned = ThemeController::new(MemoryStore::with(Theme::Dark), false);
        assert_eq!(pinned.system_changed(false), None);
        assert_eq!(pinned.current(), Theme::Dark);

        // Clearing the stored choice re-enables system tracking
        pinned.store().clear();
        assert_eq!(pinned.system_changed(false), Some(Theme::Light));
    }

    #[test]
    fn test_toggle_persists_and_double_toggle_restores() {
        let mut ctrl = ThemeController::new(MemoryStore::with(Theme::Light), true);
        assert_eq!(ctrl.toggle(), Theme::Dark);
        assert_eq!(ctrl.store().load(), Some(Theme::Dark));
        assert_eq!(ctrl.toggle(), Theme::Light);
        assert_eq!(ctrl.current(), Theme::Light);
        assert_eq!(ctrl.store().load(), Some(Theme::Light));
    }

    #[test]
    fn test_toggle_pins_theme_against_system_changes() {
        let mut ctrl = ThemeController::new(MemoryStore::default(), false);
        ctrl.toggle();
        assert_eq!(ctrl.system_changed(false), None);
        assert_eq!(ctrl.current(), Theme::Dark);
    }

    #[test]
    fn test_toggle_label_describes_next_state() {
        assert_eq!(Theme::Dark.toggle_label(), "Switch to light mode");
        assert_eq!(Theme::Light.toggle_label(), "Switch to dark mode");
    }

    #[test]
    fn test_parse_rejects_unknown_values() {
        assert_eq!(Theme::parse("dark"), Some(Theme::Dark));
        assert_eq!(Theme::parse("light"), Some(Theme::Light));
        assert_eq!(Theme::parse("blue"), None);
        assert_eq!(resolve_theme(None, false), Theme::Light);
    }
}
