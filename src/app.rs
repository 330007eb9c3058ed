//! Folio Page Enhancements
//!
//! Wires every feature module onto the already-rendered page. Modules are
//! independent: one failing to attach is logged and the rest still run.

use crate::config::PageConfig;
use crate::context::PageContext;
use crate::error::SetupResult;
use crate::{contact, counter, navigation, portfolio, reveal, theme};

type ModuleInit = fn(&PageContext) -> SetupResult<()>;

/// Feature modules in setup order; theme goes first so it lands before paint
const MODULES: &[(&str, ModuleInit)] = &[
    ("theme", theme::init),
    ("navigation", navigation::init),
    ("counter", counter::init),
    ("portfolio", portfolio::init),
    ("contact", contact::init),
    ("reveal", reveal::init),
];

pub fn enhance(config: PageConfig) {
    let ctx = match PageContext::new(config) {
        Ok(ctx) => ctx,
        Err(e) => {
            log::error!("[App] cannot access page: {}", e);
            return;
        }
    };

    let mut failed = 0;
    for (name, init) in MODULES {
        if let Err(e) = init(&ctx) {
            failed += 1;
            log::error!("[App] {} setup failed: {}", name, e);
        }
    }
    log::info!("[App] {} of {} modules attached", MODULES.len() - failed, MODULES.len());
}
