//! Bounded polling waits

use crate::{primitives::PageDriver, types::ElementState, Locator};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Run `check` until it yields a value or `timeout` elapses.
///
/// The check always runs at least once, so a zero timeout is a single check.
pub async fn poll_until<T, F, Fut>(timeout: Duration, interval: Duration, mut check: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(value) = check().await {
            return Some(value);
        }
        let now = Instant::now();
        if now >= deadline {
            return None;
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Wait until `locator` reaches `state`. Lookup errors count as "not yet".
pub async fn wait_for_element(
    page: &dyn PageDriver,
    locator: &Locator,
    state: ElementState,
    timeout: Duration,
    interval: Duration,
) -> bool {
    let found = poll_until(timeout, interval, move || async move {
        let ready = match state {
            ElementState::Present => page.count(locator).await.map(|n| n > 0),
            ElementState::Clickable => page.is_clickable(locator).await,
        };
        match ready {
            Ok(true) => Some(()),
            Ok(false) => None,
            Err(err) => {
                debug!(locator = %locator, error = %err, "element lookup failed");
                None
            }
        }
    })
    .await
    .is_some();

    if !found {
        debug!(
            locator = %locator,
            state = ?state,
            timeout_ms = timeout.as_millis() as u64,
            "element wait expired"
        );
    }
    found
}

/// Wait for a modal dialog and return its text without accepting it.
pub async fn wait_for_dialog(
    page: &dyn PageDriver,
    timeout: Duration,
    interval: Duration,
) -> Option<String> {
    poll_until(timeout, interval, move || async move {
        match page.dialog_text().await {
            Ok(text) => text,
            Err(err) => {
                debug!(error = %err, "dialog lookup failed");
                None
            }
        }
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scripted::{ScriptedElement, ScriptedPage};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn poll_until_returns_first_value() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let check = move || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            (n == 3).then_some(n)
        };
        let value = poll_until(Duration::from_millis(200), Duration::from_millis(1), check).await;
        assert_eq!(value, Some(3));
    }

    #[tokio::test]
    async fn zero_timeout_checks_once() {
        let counter = AtomicUsize::new(0);
        let calls = &counter;
        let check = move || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            None::<()>
        };
        let value = poll_until(Duration::ZERO, Duration::from_millis(1), check).await;
        assert!(value.is_none());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn element_wait_respects_clickability() {
        let page = ScriptedPage::new()
            .with_element(Locator::id("ready"), ScriptedElement::new())
            .with_element(Locator::id("disabled"), ScriptedElement::new().not_clickable());

        let timeout = Duration::from_millis(20);
        let interval = Duration::from_millis(1);
        let reaches = |id: &'static str, state: ElementState| {
            let page = &page;
            async move {
                wait_for_element(page, &Locator::id(id), state, timeout, interval).await
            }
        };
        assert!(reaches("ready", ElementState::Clickable).await);
        assert!(reaches("disabled", ElementState::Present).await);
        assert!(!reaches("disabled", ElementState::Clickable).await);
        assert!(!reaches("missing", ElementState::Present).await);
    }

    #[tokio::test]
    async fn dialog_wait_does_not_accept() {
        let page = ScriptedPage::new();
        assert!(wait_for_dialog(&page, Duration::from_millis(10), Duration::from_millis(1))
            .await
            .is_none());

        page.push_dialog("Confirm to Allocate Vehicle For This Order");
        let text =
            wait_for_dialog(&page, Duration::from_millis(10), Duration::from_millis(1)).await;
        assert_eq!(text.as_deref(), Some("Confirm to Allocate Vehicle For This Order"));
        assert_eq!(page.pending_dialogs(), 1);
    }
}
