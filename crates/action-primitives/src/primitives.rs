//! Page driver seam
//!
//! Everything the placement flow does to a page goes through [`PageDriver`].
//! Composite helpers built on top of it live in the submodules:
//! 1. click - wait for clickability, then click
//! 2. type_text - replace a field's content, or type it one character at a time
//! 3. read - scrape numbers and readonly state from form fields

mod click;
mod read;
mod type_text;

pub use click::*;
pub use read::*;
pub use type_text::*;

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use crate::{errors::ActionError, locator::Locator};

/// One browser page inside one exclusively owned session.
///
/// Element operations act on the first match unless stated otherwise.
/// Implementations report a missing element as [`ActionError::ElementNotFound`].
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Load `url` in the current tab
    async fn navigate(&self, url: &str) -> Result<(), ActionError>;

    /// Number of elements matching `locator` (0 when absent)
    async fn count(&self, locator: &Locator) -> Result<usize, ActionError>;

    /// Whether the first match is displayed and enabled (false when absent)
    async fn is_clickable(&self, locator: &Locator) -> Result<bool, ActionError>;

    /// Native click on the first match
    async fn click(&self, locator: &Locator) -> Result<(), ActionError>;

    /// Script-dispatched click on the `index`-th match; bypasses overlays
    async fn script_click(&self, locator: &Locator, index: usize) -> Result<(), ActionError>;

    async fn clear(&self, locator: &Locator) -> Result<(), ActionError>;

    /// Send `text` as keystrokes to the first match
    async fn type_text(&self, locator: &Locator, text: &str) -> Result<(), ActionError>;

    async fn press_enter(&self, locator: &Locator) -> Result<(), ActionError>;

    async fn scroll_into_view(&self, locator: &Locator) -> Result<(), ActionError>;

    async fn attribute(&self, locator: &Locator, name: &str)
        -> Result<Option<String>, ActionError>;

    /// Current `value` property of the first match
    async fn value(&self, locator: &Locator) -> Result<Option<String>, ActionError>;

    /// Visible text of every match, in document order
    async fn texts(&self, locator: &Locator) -> Result<Vec<String>, ActionError>;

    /// Text of the open modal dialog, `None` when no dialog is showing
    async fn dialog_text(&self) -> Result<Option<String>, ActionError>;

    /// Accept (OK) the open modal dialog
    async fn accept_dialog(&self) -> Result<(), ActionError>;

    async fn current_url(&self) -> Result<String, ActionError>;

    /// Write a PNG screenshot of the viewport to `path`
    async fn screenshot(&self, path: &Path) -> Result<(), ActionError>;

    /// Release the browser session. Calling it twice is a no-op.
    async fn close(&self) -> Result<(), ActionError>;
}

/// Opens one fresh browser session per run.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Arc<dyn PageDriver>, ActionError>;
}
