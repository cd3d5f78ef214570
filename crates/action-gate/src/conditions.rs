//! Phrase rules and order-number patterns

use crate::errors::GateError;
use crate::types::OrderMatch;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Placeholder replaced by the escaped order id in pattern templates.
pub const ORDER_PLACEHOLDER: &str = "{order}";

/// What text a dialog must contain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseRule {
    /// Case-sensitive substring
    Exact(String),
    /// Any keyword, case-insensitive
    AnyOf(Vec<String>),
}

impl PhraseRule {
    pub fn any_of<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PhraseRule::AnyOf(keywords.into_iter().map(Into::into).collect())
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            PhraseRule::Exact(phrase) => text.contains(phrase.as_str()),
            PhraseRule::AnyOf(keywords) => {
                let lowered = text.to_lowercase();
                keywords
                    .iter()
                    .any(|keyword| lowered.contains(&keyword.to_lowercase()))
            }
        }
    }
}

/// Build the regex for one template, escaping the order id.
pub fn compile_order_pattern(template: &str, order_id: &str) -> Result<Regex, GateError> {
    let pattern = template.replace(ORDER_PLACEHOLDER, &regex::escape(order_id));
    Regex::new(&pattern).map_err(|e| GateError::InvalidPattern {
        pattern,
        reason: e.to_string(),
    })
}

/// Locate `order_id` in `text`: each template in order, then a bare substring.
///
/// A template's first capture group is the token when present, otherwise the
/// whole match.
pub fn match_order(
    text: &str,
    order_id: &str,
    templates: &[String],
) -> Result<OrderMatch, GateError> {
    for (index, template) in templates.iter().enumerate() {
        let regex = compile_order_pattern(template, order_id)?;
        if let Some(captures) = regex.captures(text) {
            let token = captures
                .get(1)
                .or_else(|| captures.get(0))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default();
            return Ok(OrderMatch::Pattern { index, token });
        }
    }

    if text.contains(order_id) {
        return Ok(OrderMatch::Substring {
            token: order_id.to_string(),
        });
    }

    Ok(OrderMatch::Unmatched)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_phrase_is_case_sensitive() {
        let rule = PhraseRule::Exact("Confirm to Allocate Vehicle For This Order".into());
        assert!(rule.matches("Confirm to Allocate Vehicle For This Order ?"));
        assert!(!rule.matches("confirm to allocate vehicle for this order"));
    }

    #[test]
    fn any_of_ignores_case() {
        let rule = PhraseRule::any_of(["do you want to commit", "confirm"]);
        assert!(rule.matches("DO YOU WANT TO COMMIT these orders?"));
        assert!(rule.matches("Please Confirm"));
        assert!(!rule.matches("Session expired"));
    }

    #[test]
    fn first_matching_template_wins() {
        let templates = vec![
            r"ORDER NO:\s*({order}[_-]\d+[_-]\d+)".to_string(),
            r"{order}[_-]\d+".to_string(),
        ];
        let found = match_order("ORDER NO: 2200123456_1_2", "2200123456", &templates).unwrap();
        assert_eq!(
            found,
            OrderMatch::Pattern {
                index: 0,
                token: "2200123456_1_2".into()
            }
        );

        let found = match_order("ref 2200123456-7", "2200123456", &templates).unwrap();
        assert_eq!(
            found,
            OrderMatch::Pattern {
                index: 1,
                token: "2200123456-7".into()
            }
        );
    }

    #[test]
    fn substring_fallback_then_unmatched() {
        let templates = vec![r"{order}[_-]\d+[_-]\d+".to_string()];
        assert_eq!(
            match_order("Order 2200123456 committed", "2200123456", &templates).unwrap(),
            OrderMatch::Substring {
                token: "2200123456".into()
            }
        );
        assert_eq!(
            match_order("Order committed", "2200123456", &templates).unwrap(),
            OrderMatch::Unmatched
        );
    }

    #[test]
    fn order_id_is_escaped() {
        let regex = compile_order_pattern(r"^{order}$", "22.00+1").unwrap();
        assert!(regex.is_match("22.00+1"));
        assert!(!regex.is_match("22x00+1"));
    }
}
