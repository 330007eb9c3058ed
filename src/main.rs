//! Folio UI Entry Point

mod app;
mod config;
mod contact;
mod context;
mod counter;
mod error;
mod models;
mod navigation;
mod portfolio;
mod reveal;
mod theme;

use config::PageConfig;

fn log_level() -> log::Level {
    if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

fn main() {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) keeps the existing logger
    let _ = console_log::init_with_level(log_level());
    app::enhance(PageConfig::default());
}
