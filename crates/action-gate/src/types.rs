//! Core types for dialog classification

use crate::conditions::PhraseRule;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Dialogs the placement workflow knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    /// "Do you want to commit these orders?" after pressing commit
    CommitConfirmation,
    /// "MESSAGE: ORDER COMMIT SUCCESS" follow-up
    CommitSuccess,
    /// Optional "kindly refresh page once" notice after place-vehicle
    RefreshNotice,
    /// Final "Confirm to Allocate Vehicle For This Order"
    AllocationConfirmation,
}

impl DialogKind {
    pub fn label(&self) -> &'static str {
        match self {
            DialogKind::CommitConfirmation => "commit_confirmation",
            DialogKind::CommitSuccess => "commit_success",
            DialogKind::RefreshNotice => "refresh_notice",
            DialogKind::AllocationConfirmation => "allocation_confirmation",
        }
    }
}

impl fmt::Display for DialogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rules a dialog of one kind is checked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogExpectation {
    pub kind: DialogKind,

    /// Required phrase; `None` means any text passes
    pub phrase: Option<PhraseRule>,

    /// Order-number regex templates with an `{order}` placeholder, tried in
    /// order. Empty means the dialog carries no order number.
    pub order_patterns: Vec<String>,
}

impl DialogExpectation {
    pub fn new(kind: DialogKind) -> Self {
        Self {
            kind,
            phrase: None,
            order_patterns: Vec::new(),
        }
    }

    pub fn with_phrase(mut self, phrase: PhraseRule) -> Self {
        self.phrase = Some(phrase);
        self
    }

    pub fn with_order_pattern(mut self, template: impl Into<String>) -> Self {
        self.order_patterns.push(template.into());
        self
    }

    pub fn expects_order(&self) -> bool {
        !self.order_patterns.is_empty()
    }
}

/// How the order number was found in a dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum OrderMatch {
    /// The `index`-th pattern matched
    Pattern { index: usize, token: String },
    /// No pattern matched but the bare order id occurs in the text
    Substring { token: String },
    /// The order id does not occur at all
    Unmatched,
    /// The dialog kind carries no order number, or none was supplied
    NotRequired,
}

impl OrderMatch {
    pub fn token(&self) -> Option<&str> {
        match self {
            OrderMatch::Pattern { token, .. } | OrderMatch::Substring { token } => Some(token),
            OrderMatch::Unmatched | OrderMatch::NotRequired => None,
        }
    }

    pub fn is_satisfied(&self) -> bool {
        !matches!(self, OrderMatch::Unmatched)
    }
}

/// Classification result for one dialog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DialogVerdict {
    pub kind: DialogKind,
    pub text: String,
    pub recognized: bool,
    pub phrase_found: bool,
    pub order: OrderMatch,
}

impl DialogVerdict {
    pub fn token(&self) -> Option<&str> {
        self.order.token()
    }
}
