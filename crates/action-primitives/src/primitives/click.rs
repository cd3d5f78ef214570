//! Click primitive - wait for the element, then click it

use crate::{
    errors::ActionError, locator::Locator, primitives::PageDriver, types::ElementState,
    waiting::wait_for_element,
};
use std::time::Duration;
use tracing::debug;

/// Wait up to `timeout` for `locator` to become clickable, then click it.
pub async fn click_when_clickable(
    page: &dyn PageDriver,
    locator: &Locator,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ActionError> {
    if !wait_for_element(page, locator, ElementState::Clickable, timeout, interval).await {
        return Err(ActionError::WaitTimeout(format!(
            "{} not clickable after {}ms",
            locator,
            timeout.as_millis()
        )));
    }
    debug!(locator = %locator, "clicking");
    page.click(locator).await
}

/// Click the first match natively; fall back to a script click when the
/// native click is intercepted.
pub async fn click_with_fallback(
    page: &dyn PageDriver,
    locator: &Locator,
) -> Result<(), ActionError> {
    match page.click(locator).await {
        Ok(()) => Ok(()),
        Err(ActionError::NotClickable(reason)) => {
            debug!(locator = %locator, %reason, "native click intercepted, using script click");
            page.script_click(locator, 0).await
        }
        Err(err) => Err(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::{PageEvent, ScriptedElement, ScriptedPage};

    #[tokio::test]
    async fn click_waits_for_element() {
        let page = ScriptedPage::new().with_element(Locator::id("go"), ScriptedElement::new());
        let (timeout, interval) = (Duration::from_millis(10), Duration::from_millis(1));
        click_when_clickable(&page, &Locator::id("go"), timeout, interval)
            .await
            .unwrap();
        assert_eq!(page.events(), vec![PageEvent::Click(Locator::id("go"))]);
    }

    #[tokio::test]
    async fn click_times_out_on_absent_element() {
        let page = ScriptedPage::new();
        let (timeout, interval) = (Duration::from_millis(5), Duration::from_millis(1));
        let err = click_when_clickable(&page, &Locator::id("go"), timeout, interval)
            .await
            .unwrap_err();
        assert!(matches!(err, ActionError::WaitTimeout(_)));
    }

    #[tokio::test]
    async fn intercepted_click_falls_back_to_script() {
        let page = ScriptedPage::new().with_element(
            Locator::id("covered"),
            ScriptedElement::new().intercepts_clicks(),
        );
        click_with_fallback(&page, &Locator::id("covered")).await.unwrap();
        assert_eq!(
            page.events(),
            vec![PageEvent::ScriptClick(Locator::id("covered"), 0)]
        );
    }
}
