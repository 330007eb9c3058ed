//! Page Configuration
//!
//! Tunables shared by every feature module. Built once at startup and
//! copied into each handler.

/// Fixed tunables for the page enhancements
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageConfig {
    /// localStorage key holding the theme choice
    pub theme_storage_key: &'static str,
    /// A section becomes active once scrolled within this distance of its top
    pub nav_activation_offset: f64,
    /// Navbar gets its "scrolled" style past this scroll position
    pub navbar_scrolled_threshold: f64,
    /// Stats start counting once their top crosses this share of the viewport
    pub counter_trigger_ratio: f64,
    /// Number of increments from zero to the target
    pub counter_steps: u32,
    pub counter_tick_ms: u32,
    /// Delay before the contact form comes back after a successful submit
    pub success_reset_ms: u32,
    /// Sticky header height subtracted from smooth-scroll targets
    pub header_offset: f64,
    pub reveal_threshold: f64,
    pub reveal_root_margin: &'static str,
    pub reveal_shift_px: u32,
    pub reveal_duration_s: f64,
    pub reveal_stagger_s: f64,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            theme_storage_key: "theme",
            nav_activation_offset: 200.0,
            navbar_scrolled_threshold: 100.0,
            counter_trigger_ratio: 0.75,
            counter_steps: 50,
            counter_tick_ms: 30,
            success_reset_ms: 5000,
            header_offset: 80.0,
            reveal_threshold: 0.1,
            reveal_root_margin: "0px 0px -100px 0px",
            reveal_shift_px: 30,
            reveal_duration_s: 0.6,
            reveal_stagger_s: 0.1,
        }
    }
}
