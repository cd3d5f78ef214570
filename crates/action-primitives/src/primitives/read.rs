use crate::{errors::ActionError, locator::Locator, primitives::PageDriver};

/// Read a numeric form field, preferring its `value` over its text.
pub async fn read_number(page: &dyn PageDriver, locator: &Locator) -> Result<f64, ActionError> {
    let raw = match page.value(locator).await? {
        Some(value) if !value.trim().is_empty() => value,
        _ => page
            .texts(locator)
            .await?
            .into_iter()
            .next()
            .unwrap_or_default(),
    };
    parse_number(&raw).ok_or_else(|| {
        ActionError::ConditionNotMet(format!("{} does not hold a number: {:?}", locator, raw))
    })
}

/// Parse a number as rendered by the portal (`"1,250.50"`, `" 12 "`).
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace() && *ch != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Whether the field carries a `readonly` attribute.
pub async fn is_readonly(page: &dyn PageDriver, locator: &Locator) -> Result<bool, ActionError> {
    Ok(page
        .attribute(locator, "readonly")
        .await?
        .map(|value| !value.eq_ignore_ascii_case("false"))
        .unwrap_or(false))
}
