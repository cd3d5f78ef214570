//! Type text primitive - fill input fields

use crate::{errors::ActionError, locator::Locator, primitives::PageDriver};
use std::time::Duration;
use tokio::time::sleep;

/// Clear the field and type `text` in one burst.
pub async fn replace_text(
    page: &dyn PageDriver,
    locator: &Locator,
    text: &str,
) -> Result<(), ActionError> {
    page.clear(locator).await?;
    page.type_text(locator, text).await
}

/// Type `text` one character at a time with `delay` after each keystroke.
///
/// Autocomplete widgets on the portal only refresh their suggestion list on
/// individual key events.
pub async fn type_per_character(
    page: &dyn PageDriver,
    locator: &Locator,
    text: &str,
    delay: Duration,
) -> Result<(), ActionError> {
    let mut buf = [0u8; 4];
    for ch in text.chars() {
        page.type_text(locator, ch.encode_utf8(&mut buf)).await?;
        if !delay.is_zero() {
            sleep(delay).await;
        }
    }
    Ok(())
}
