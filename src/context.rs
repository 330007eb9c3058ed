//! Page Context
//!
//! Handles every feature module needs, captured by its event handlers.

use web_sys::{Document, Window};

use crate::config::PageConfig;
use crate::error::SetupResult;

/// Window, document and config, resolved once at startup
#[derive(Clone)]
pub struct PageContext {
    pub window: Window,
    pub document: Document,
    pub config: PageConfig,
}

impl PageContext {
    pub fn new(config: PageConfig) -> SetupResult<Self> {
        let window = page_events::window()?;
        let document = page_events::document(&window)?;
        Ok(Self { window, document, config })
    }

    /// Current vertical scroll position
    pub fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    pub fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|h| h.as_f64())
            .unwrap_or(0.0)
    }
}
