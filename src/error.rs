//! Setup Errors
//!
//! Failures while wiring a feature module to the page.

use page_events::DomError;

pub type SetupResult<T> = Result<T, SetupError>;

/// Reasons a feature module could not attach to the page
#[derive(Debug)]
pub enum SetupError {
    /// Element lookup or listener registration failed
    Dom(DomError),
    /// Embedded project table failed to parse
    Catalog(serde_json::Error),
}

impl std::fmt::Display for SetupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SetupError::Dom(err) => write!(f, "page wiring failed: {}", err),
            SetupError::Catalog(err) => write!(f, "project table is invalid: {}", err),
        }
    }
}

impl std::error::Error for SetupError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SetupError::Dom(err) => Some(err),
            SetupError::Catalog(err) => Some(err),
        }
    }
}

impl From<DomError> for SetupError {
    fn from(err: DomError) -> Self {
        SetupError::Dom(err)
    }
}

impl From<wasm_bindgen::JsValue> for SetupError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        SetupError::Dom(DomError::from(value))
    }
}

impl From<serde_json::Error> for SetupError {
    fn from(err: serde_json::Error) -> Self {
        SetupError::Catalog(err)
    }
}
