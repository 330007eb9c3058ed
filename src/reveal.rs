//! Scroll & Reveal
//!
//! Smooth scrolling for in-page anchors, and a one-way fade-in for
//! portfolio and skill items as they enter the viewport.

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Element, HtmlElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, ScrollBehavior, ScrollToOptions,
};

use crate::config::PageConfig;
use crate::context::PageContext;
use crate::error::SetupResult;

const ANCHOR_SELECTOR: &str = "a[href^=\"#\"]";
/// Item kinds that fade in; each kind staggers by its own index
const REVEAL_GROUPS: [&str; 2] = [".portfolio-item", ".skill-item"];

/// Selector for an in-page link target, `None` for a bare `#`
pub fn fragment_selector(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty()).map(|_| href)
}

/// Scroll position that puts `offset_top` just below the sticky header
pub fn scroll_target(offset_top: f64, header_offset: f64) -> f64 {
    offset_top - header_offset
}

/// Seconds as CSS text without float noise (0.30000000000000004 -> "0.3")
fn css_seconds(secs: f64) -> String {
    format!("{}s", (secs * 1000.0).round() / 1000.0)
}

/// Inline style values for a reveal item
#[derive(Debug, Clone, PartialEq)]
pub struct RevealStyle {
    pub opacity: &'static str,
    pub transform: String,
    pub transition: Option<String>,
}

impl RevealStyle {
    /// Starting style for the `index`-th item of its kind
    pub fn hidden(index: usize, config: &PageConfig) -> Self {
        let delay = index as f64 * config.reveal_stagger_s;
        Self {
            opacity: "0",
            transform: format!("translateY({}px)", config.reveal_shift_px),
            transition: Some(format!(
                "all {} ease {}",
                css_seconds(config.reveal_duration_s),
                css_seconds(delay)
            )),
        }
    }

    pub fn shown() -> Self {
        Self {
            opacity: "1",
            transform: "translateY(0)".to_string(),
            transition: None,
        }
    }

    fn apply(&self, el: &HtmlElement) {
        let style = el.style();
        let _ = style.set_property("opacity", self.opacity);
        let _ = style.set_property("transform", &self.transform);
        if let Some(transition) = &self.transition {
            let _ = style.set_property("transition", transition);
        }
    }
}

fn bind_smooth_scroll(ctx: &PageContext) -> SetupResult<()> {
    let anchors = page_events::query_all(&ctx.document, ANCHOR_SELECTOR)?;
    page_events::listen_each(&anchors, "click", |anchor| {
        let ctx = ctx.clone();
        let href = anchor.get_attribute("href").unwrap_or_default();
        move |ev: web_sys::Event| {
            ev.prevent_default();
            let Some(selector) = fragment_selector(&href) else { return };
            let target = ctx
                .document
                .query_selector(selector)
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok());
            if let Some(target) = target {
                let opts = ScrollToOptions::new();
                opts.set_top(scroll_target(f64::from(target.offset_top()), ctx.config.header_offset));
                opts.set_behavior(ScrollBehavior::Smooth);
                ctx.window.scroll_to_with_scroll_to_options(&opts);
            }
        }
    })?;
    log::debug!("[Reveal] smooth scroll on {} anchors", anchors.len());
    Ok(())
}

fn reveal_observer(config: &PageConfig) -> SetupResult<IntersectionObserver> {
    let on_entries = Closure::<dyn FnMut(Array, IntersectionObserver)>::new(
        move |entries: Array, observer: IntersectionObserver| {
            for entry in entries.iter() {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                if !entry.is_intersecting() {
                    continue;
                }
                let target = entry.target();
                if let Some(el) = target.dyn_ref::<HtmlElement>() {
                    RevealStyle::shown().apply(el);
                }
                // Revealed items stay revealed
                observer.unobserve(&target);
            }
        },
    );

    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(config.reveal_threshold));
    init.set_root_margin(config.reveal_root_margin);
    let observer = IntersectionObserver::new_with_options(on_entries.as_ref().unchecked_ref(), &init)?;
    on_entries.forget();
    Ok(observer)
}

fn prepare_group(items: Vec<Element>, observer: &IntersectionObserver, config: &PageConfig) -> usize {
    let mut count = 0;
    for (index, item) in items.into_iter().enumerate() {
        if let Some(el) = item.dyn_ref::<HtmlElement>() {
            RevealStyle::hidden(index, config).apply(el);
            observer.observe(&item);
            count += 1;
        }
    }
    count
}

pub fn init(ctx: &PageContext) -> SetupResult<()> {
    bind_smooth_scroll(ctx)?;

    let observer = reveal_observer(&ctx.config)?;
    for selector in REVEAL_GROUPS {
        let items = page_events::query_all(&ctx.document, selector)?;
        let count = prepare_group(items, &observer, &ctx.config);
        log::debug!("[Reveal] watching {} {}", count, selector);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_style_staggers_by_index() {
        let config = PageConfig::default();
        let first = RevealStyle::hidden(0, &config);
        assert_eq!(first.opacity, "0");
        assert_eq!(first.transform, "translateY(30px)");
        assert_eq!(first.transition.as_deref(), Some("all 0.6s ease 0s"));

        let fourth = RevealStyle::hidden(3, &config);
        assert_eq!(fourth.transition.as_deref(), Some("all 0.6s ease 0.3s"));
        let eleventh = RevealStyle::hidden(10, &config);
        assert_eq!(eleventh.transition.as_deref(), Some("all 0.6s ease 1s"));
    }

    #[test]
    fn test_shown_style() {
        let shown = RevealStyle::shown();
        assert_eq!(shown.opacity, "1");
        assert_eq!(shown.transform, "translateY(0)");
        assert!(shown.transition.is_none());
    }

    #[test]
    fn test_scroll_target_compensates_for_header() {
        assert_eq!(scroll_target(1000.0, 80.0), 920.0);
        assert_eq!(scroll_target(40.0, 80.0), -40.0);
    }

    #[test]
    fn test_fragment_selector() {
        assert_eq!(fragment_selector("#contact"), Some("#contact"));
        assert_eq!(fragment_selector("#"), None);
        assert_eq!(fragment_selector("about.html"), None);
    }
}
