//! Driver selection through the license autocomplete.
//!
//! Options render as `"<NAME>-<LICENSE>"`; the requested driver is the option
//! whose license ends in the requested four characters. Each word of the
//! driver name is tried as a three-letter prefix until an option matches.

use crate::locators;
use crate::types::DriverSelection;
use action_primitives::{
    is_readonly, type_per_character, wait_for_element, ActionError, ElementState, PageDriver,
    Timings,
};
use tokio::time::sleep;
use tracing::{debug, info, warn};

const PREFIX_LEN: usize = 3;

/// License fragment of an option: text after the last `-`, if long enough.
pub fn license_suffix(option_text: &str) -> Option<String> {
    let (_, license) = option_text.trim().rsplit_once('-')?;
    let chars: Vec<char> = license.trim().chars().collect();
    if chars.len() < 4 {
        return None;
    }
    Some(chars[chars.len() - 4..].iter().collect())
}

/// Index of the first option whose license ends in `license_last4`.
pub fn match_suggestion<S: AsRef<str>>(options: &[S], license_last4: &str) -> Option<usize> {
    options
        .iter()
        .position(|option| license_suffix(option.as_ref()).as_deref() == Some(license_last4))
}

/// First three characters of a name word, upper-cased.
pub fn typed_prefix(word: &str) -> String {
    word.chars().take(PREFIX_LEN).collect::<String>().to_uppercase()
}

pub async fn select_driver(
    page: &dyn PageDriver,
    timings: &Timings,
    driver_name: &str,
    license_last4: &str,
) -> Result<DriverSelection, ActionError> {
    let field = locators::driver_field();

    let prefilled = page.value(&field).await?.unwrap_or_default();
    if is_readonly(page, &field).await? && !prefilled.trim().is_empty() {
        let license_matches = prefilled.contains(license_last4);
        if license_matches {
            info!(value = %prefilled, "driver field prefilled by portal");
        } else {
            warn!(
                value = %prefilled,
                license = license_last4,
                "prefilled driver does not carry the requested license, keeping it"
            );
        }
        return Ok(DriverSelection::Prefilled {
            value: prefilled,
            license_matches,
        });
    }

    if !wait_for_element(
        page,
        &field,
        ElementState::Clickable,
        timings.step_timeout(),
        timings.poll_interval(),
    )
    .await
    {
        return Err(ActionError::NotClickable(field.to_string()));
    }

    let options_locator = locators::driver_options();
    for word in driver_name.split_whitespace() {
        let typed = typed_prefix(word);
        page.clear(&field).await?;
        sleep(timings.clear_pause()).await;
        type_per_character(page, &field, &typed, timings.keystroke_delay()).await?;

        if !wait_for_element(
            page,
            &locators::driver_suggestions(),
            ElementState::Present,
            timings.lookup_timeout(),
            timings.poll_interval(),
        )
        .await
        {
            debug!(word, typed = %typed, "no suggestion list");
            continue;
        }

        let options = page.texts(&options_locator).await?;
        debug!(word, typed = %typed, options = options.len(), "driver suggestions");
        if let Some(index) = match_suggestion(&options, license_last4) {
            page.script_click(&options_locator, index).await?;
            let option = options[index].trim().to_string();
            info!(option = %option, "selected driver suggestion");
            return Ok(DriverSelection::Suggestion {
                word: word.to_string(),
                typed,
                option,
                index,
            });
        }
    }

    Err(ActionError::ConditionNotMet(format!(
        "Driver with LICENSE_NUM {} not found in dropdown",
        license_last4
    )))
}
