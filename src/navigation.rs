//! Navigation Controller
//!
//! Mobile menu toggle, active-section highlighting and the navbar
//! "scrolled" style.

use leptos::prelude::{GetUntracked, RwSignal, Set, Update};
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::context::PageContext;
use crate::error::SetupResult;

const HAMBURGER_ID: &str = "hamburger";
const NAV_MENU_ID: &str = "nav-menu";
const NAVBAR_ID: &str = "navbar";
const NAV_LINK_SELECTOR: &str = ".nav-link";
const SECTION_SELECTOR: &str = "section";

const ACTIVE_CLASS: &str = "active";
const SCROLLED_CLASS: &str = "scrolled";

/// Pick the last section (in document order) whose top is at or above
/// `scroll_y + offset`. Empty when none qualify.
pub fn active_section<'a, I>(sections: I, scroll_y: f64, offset: f64) -> &'a str
where
    I: IntoIterator<Item = (&'a str, f64)>,
{
    sections
        .into_iter()
        .filter(|(_, top)| scroll_y >= top - offset)
        .last()
        .map_or("", |(id, _)| id)
}

/// Fragment a nav link points at (`"#about"` -> `"about"`)
pub fn link_fragment(href: &str) -> &str {
    href.strip_prefix('#').unwrap_or(href)
}

/// Whether a link with `href` should be highlighted for `active_id`.
/// With no active section the id is empty, which a bare `#` link matches.
pub fn is_link_active(href: &str, active_id: &str) -> bool {
    link_fragment(href) == active_id
}

pub fn is_scrolled(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Menu open/closed flag shared by the nav handlers
#[derive(Clone, Copy)]
pub struct NavSignals {
    pub menu_open: RwSignal<bool>,
}

impl NavSignals {
    pub fn new() -> Self {
        Self { menu_open: RwSignal::new(false) }
    }

    pub fn toggle_menu(&self) -> bool {
        self.menu_open.update(|open| *open = !*open);
        self.menu_open.get_untracked()
    }

    pub fn close_menu(&self) {
        self.menu_open.set(false);
    }
}

fn mirror_menu(hamburger: &Element, menu: &Element, open: bool) {
    page_events::set_class(hamburger, ACTIVE_CLASS, open);
    page_events::set_class(menu, ACTIVE_CLASS, open);
}

fn section_tops(ctx: &PageContext) -> Vec<(String, f64)> {
    page_events::query_all(&ctx.document, SECTION_SELECTOR)
        .unwrap_or_default()
        .into_iter()
        .map(|section| {
            let top = section
                .dyn_ref::<HtmlElement>()
                .map_or(0.0, |el| f64::from(el.offset_top()));
            (section.id(), top)
        })
        .collect()
}

fn highlight_links(links: &[Element], active_id: &str) {
    for link in links {
        let href = link.get_attribute("href").unwrap_or_default();
        page_events::set_class(link, ACTIVE_CLASS, is_link_active(&href, active_id));
    }
}

/// Bind the hamburger, nav links and the scroll handler
pub fn init(ctx: &PageContext) -> SetupResult<()> {
    let hamburger: Element = page_events::by_id(&ctx.document, HAMBURGER_ID)?;
    let menu: Element = page_events::by_id(&ctx.document, NAV_MENU_ID)?;
    let navbar: Element = page_events::by_id(&ctx.document, NAVBAR_ID)?;
    let links = page_events::query_all(&ctx.document, NAV_LINK_SELECTOR)?;
    let link_count = links.len();
    let nav = NavSignals::new();

    {
        let (h, m) = (hamburger.clone(), menu.clone());
        page_events::listen(&hamburger, "click", move |_| {
            let open = nav.toggle_menu();
            mirror_menu(&h, &m, open);
        })?;
    }

    page_events::listen_each(&links, "click", |_| {
        let (h, m) = (hamburger.clone(), menu.clone());
        move |_: web_sys::Event| {
            nav.close_menu();
            mirror_menu(&h, &m, false);
        }
    })?;

    let scroll_ctx = ctx.clone();
    page_events::listen(&ctx.window, "scroll", move |_| {
        let config = scroll_ctx.config;
        let scroll_y = scroll_ctx.scroll_y();
        let sections = section_tops(&scroll_ctx);
        let current = active_section(
            sections.iter().map(|(id, top)| (id.as_str(), *top)),
            scroll_y,
            config.nav_activation_offset,
        );
        highlight_links(&links, current);
        page_events::set_class(
            &navbar,
            SCROLLED_CLASS,
            is_scrolled(scroll_y, config.navbar_scrolled_threshold),
        );
    })?;

    log::debug!("[Nav] bound {} nav links", link_count);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTIONS: [(&str, f64); 4] = [
        ("home", 0.0),
        ("about", 800.0),
        ("portfolio", 1600.0),
        ("contact", 2400.0),
    ];

    #[test]
    fn test_exact_threshold_activates_section() {
        // about's threshold is 800 - 200
        assert_eq!(active_section(SECTIONS, 600.0, 200.0), "about");
        assert_eq!(active_section(SECTIONS, 599.0, 200.0), "home");
    }

    #[test]
    fn test_latest_qualifying_section_wins() {
        assert_eq!(active_section(SECTIONS, 5000.0, 200.0), "contact");
        let overlapping = [("a", 100.0), ("b", 100.0)];
        assert_eq!(active_section(overlapping, 0.0, 200.0), "b");
    }

    #[test]
    fn test_no_section_qualifies() {
        let late = [("late", 900.0)];
        assert_eq!(active_section(late, 0.0, 200.0), "");
        assert_eq!(active_section(std::iter::empty(), 300.0, 200.0), "");
    }

    #[test]
    fn test_only_matching_link_is_active() {
        let current = active_section(SECTIONS, 600.0, 200.0);
        let hrefs = ["#home", "#about", "#portfolio", "#contact"];
        let active: Vec<_> = hrefs.iter().filter(|h| is_link_active(h, current)).collect();
        assert_eq!(active, vec![&"#about"]);
    }

    #[test]
    fn test_bare_hash_link_active_only_without_section() {
        let late = [("about", 900.0), ("contact", 1800.0)];
        let hrefs = ["#", "#about", "#contact"];

        let none = active_section(late, 0.0, 200.0);
        let active: Vec<_> = hrefs.iter().filter(|h| is_link_active(h, none)).collect();
        assert_eq!(active, vec![&"#"]);

        let about = active_section(late, 700.0, 200.0);
        let active: Vec<_> = hrefs.iter().filter(|h| is_link_active(h, about)).collect();
        assert_eq!(active, vec![&"#about"]);
    }

    #[test]
    fn test_scrolled_threshold_is_strict() {
        assert!(!is_scrolled(100.0, 100.0));
        assert!(is_scrolled(100.5, 100.0));
        assert!(!is_scrolled(0.0, 100.0));
    }
}
