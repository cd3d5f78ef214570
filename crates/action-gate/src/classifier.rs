//! Dialog classification

use crate::conditions::{match_order, PhraseRule};
use crate::errors::GateError;
use crate::types::{DialogExpectation, DialogKind, DialogVerdict, OrderMatch};
use tracing::debug;

pub const COMMIT_SUCCESS_PHRASE: &str = "MESSAGE: ORDER COMMIT SUCCESS";
pub const REFRESH_NOTICE_PHRASE: &str = "kindly refresh page once";
pub const ALLOCATION_CONFIRM_PHRASE: &str = "Confirm to Allocate Vehicle For This Order";

impl DialogExpectation {
    /// Built-in rules for each dialog the portal raises.
    pub fn for_kind(kind: DialogKind) -> Self {
        match kind {
            DialogKind::CommitConfirmation => DialogExpectation::new(kind)
                .with_phrase(PhraseRule::any_of([
                    "do you want to commit",
                    "commit these order",
                    "confirm",
                ]))
                .with_order_pattern(r"{order}[_-]\d+[_-]\d+(?:[_-]\d+)?"),
            DialogKind::CommitSuccess => DialogExpectation::new(kind)
                .with_phrase(PhraseRule::Exact(COMMIT_SUCCESS_PHRASE.to_string()))
                .with_order_pattern(r"ORDER NO:\s*({order}[_-]\d+[_-]\d+)")
                .with_order_pattern(r"ORDER NO:\s*({order}[_\-\d]*)")
                .with_order_pattern(r"{order}[_-]\d+[_-]\d+"),
            DialogKind::RefreshNotice => DialogExpectation::new(kind)
                .with_phrase(PhraseRule::any_of([REFRESH_NOTICE_PHRASE])),
            DialogKind::AllocationConfirmation => DialogExpectation::new(kind)
                .with_phrase(PhraseRule::Exact(ALLOCATION_CONFIRM_PHRASE.to_string())),
        }
    }
}

/// Classify `text` against the built-in rules for `kind`.
pub fn classify(
    kind: DialogKind,
    text: &str,
    order_id: Option<&str>,
) -> Result<DialogVerdict, GateError> {
    classify_with(&DialogExpectation::for_kind(kind), text, order_id)
}

/// Classify `text` against an explicit expectation.
///
/// Recognized means the phrase rule (if any) holds and, when the kind carries
/// an order number and one was supplied, the order id was found.
pub fn classify_with(
    expectation: &DialogExpectation,
    text: &str,
    order_id: Option<&str>,
) -> Result<DialogVerdict, GateError> {
    let phrase_found = expectation
        .phrase
        .as_ref()
        .map(|rule| rule.matches(text))
        .unwrap_or(true);

    let order = match order_id.map(str::trim).filter(|id| !id.is_empty()) {
        Some(id) if expectation.expects_order() => {
            match_order(text, id, &expectation.order_patterns)?
        }
        _ => OrderMatch::NotRequired,
    };

    let recognized = phrase_found && order.is_satisfied();
    debug!(
        kind = %expectation.kind,
        recognized,
        phrase_found,
        order = ?order,
        "classified dialog"
    );

    Ok(DialogVerdict {
        kind: expectation.kind,
        text: text.to_string(),
        recognized,
        phrase_found,
        order,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: &str = "2200123456";

    #[test]
    fn commit_success_with_order_number() {
        let text = "MESSAGE: ORDER COMMIT SUCCESS\nORDER NO: 2200123456_1_1";
        let verdict = classify(DialogKind::CommitSuccess, text, Some(ORDER)).unwrap();
        assert!(verdict.recognized);
        assert!(verdict.phrase_found);
        assert_eq!(verdict.token(), Some("2200123456_1_1"));
        assert!(matches!(verdict.order, OrderMatch::Pattern { index: 0, .. }));
    }

    #[test]
    fn commit_success_with_bare_order_id() {
        let text = "MESSAGE: ORDER COMMIT SUCCESS for 2200123456";
        let verdict = classify(DialogKind::CommitSuccess, text, Some(ORDER)).unwrap();
        assert!(verdict.recognized);
        assert_eq!(verdict.order, OrderMatch::Substring { token: ORDER.into() });
    }

    #[test]
    fn commit_success_prefix_pattern_accepts_short_suffix() {
        let text = "MESSAGE: ORDER COMMIT SUCCESS ORDER NO: 2200123456_7";
        let verdict = classify(DialogKind::CommitSuccess, text, Some(ORDER)).unwrap();
        assert_eq!(verdict.token(), Some("2200123456_7"));
        assert!(matches!(verdict.order, OrderMatch::Pattern { index: 1, .. }));
    }

    #[test]
    fn success_phrase_is_case_sensitive() {
        let text = "message: order commit success 2200123456_1_1";
        let verdict = classify(DialogKind::CommitSuccess, text, Some(ORDER)).unwrap();
        assert!(!verdict.phrase_found);
        assert!(!verdict.recognized);
        assert_eq!(verdict.token(), Some("2200123456_1_1"));
    }

    #[test]
    fn commit_confirmation_keywords_and_token() {
        let text = "Do you want to commit these orders? 2200123456_10_1_3";
        let verdict = classify(DialogKind::CommitConfirmation, text, Some(ORDER)).unwrap();
        assert!(verdict.recognized);
        assert_eq!(verdict.token(), Some("2200123456_10_1_3"));
    }

    #[test]
    fn confirmation_for_other_order_is_not_recognized() {
        let text = "Do you want to commit these orders? 2200999999_1_1";
        let verdict = classify(DialogKind::CommitConfirmation, text, Some(ORDER)).unwrap();
        assert!(verdict.phrase_found);
        assert_eq!(verdict.order, OrderMatch::Unmatched);
        assert!(!verdict.recognized);
    }

    #[test]
    fn refresh_notice_ignores_case() {
        let verdict = classify(
            DialogKind::RefreshNotice,
            "Kindly Refresh Page Once and try again",
            None,
        )
        .unwrap();
        assert!(verdict.recognized);
        assert_eq!(verdict.order, OrderMatch::NotRequired);
    }

    #[test]
    fn allocation_confirmation_requires_exact_phrase() {
        let ok = classify(
            DialogKind::AllocationConfirmation,
            "Confirm to Allocate Vehicle For This Order?",
            Some(ORDER),
        )
        .unwrap();
        assert!(ok.recognized);
        assert_eq!(ok.order, OrderMatch::NotRequired);

        let other = classify(DialogKind::AllocationConfirmation, "Vehicle already placed", None)
            .unwrap();
        assert!(!other.recognized);
    }

    #[test]
    fn verdict_serializes_with_kind_label() {
        let verdict =
            classify(DialogKind::RefreshNotice, "kindly refresh page once", None).unwrap();
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(value["kind"], "refresh_notice");
        assert_eq!(value["order"]["by"], "not_required");
    }
}
