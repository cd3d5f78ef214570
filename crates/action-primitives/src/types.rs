//! Core types for action primitives

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Element condition a wait can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementState {
    /// At least one matching element is attached
    Present,
    /// The first matching element is displayed and enabled
    Clickable,
}

/// Wait and pacing budget for one run (all values in milliseconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Per-step precondition timeout
    pub step_timeout_ms: u64,

    /// Short wait for optional things: the refresh notice, autocomplete lists
    pub lookup_timeout_ms: u64,

    /// Wait for the final allocation confirmation
    pub final_dialog_timeout_ms: u64,

    /// Fixed pause after searches and submissions
    pub settle_ms: u64,

    /// Pause between the two commit dialogs
    pub dialog_gap_ms: u64,

    /// Poll interval inside bounded waits
    pub poll_interval_ms: u64,

    /// Delay between characters typed into the driver autocomplete
    pub keystroke_delay_ms: u64,

    /// Pause after clearing the driver field
    pub clear_pause_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            step_timeout_ms: 10_000,
            lookup_timeout_ms: 3_000,
            final_dialog_timeout_ms: 5_000,
            settle_ms: 2_000,
            dialog_gap_ms: 1_000,
            poll_interval_ms: 250,
            keystroke_delay_ms: 300,
            clear_pause_ms: 500,
        }
    }
}

impl Timings {
    /// Every wait bounded by `wait_ms`, no fixed pauses, 1ms polling.
    pub fn uniform(wait_ms: u64) -> Self {
        Self {
            step_timeout_ms: wait_ms,
            lookup_timeout_ms: wait_ms,
            final_dialog_timeout_ms: wait_ms,
            settle_ms: 0,
            dialog_gap_ms: 0,
            poll_interval_ms: 1,
            keystroke_delay_ms: 0,
            clear_pause_ms: 0,
        }
    }

    pub fn step_timeout(&self) -> Duration {
        Duration::from_millis(self.step_timeout_ms)
    }

    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_millis(self.lookup_timeout_ms)
    }

    pub fn final_dialog_timeout(&self) -> Duration {
        Duration::from_millis(self.final_dialog_timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }

    pub fn dialog_gap(&self) -> Duration {
        Duration::from_millis(self.dialog_gap_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn keystroke_delay(&self) -> Duration {
        Duration::from_millis(self.keystroke_delay_ms)
    }

    pub fn clear_pause(&self) -> Duration {
        Duration::from_millis(self.clear_pause_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timings() {
        let timings = Timings::default();
        assert_eq!(timings.step_timeout(), Duration::from_secs(10));
        assert_eq!(timings.final_dialog_timeout(), Duration::from_secs(5));
        assert_eq!(timings.lookup_timeout(), Duration::from_secs(3));
        assert_eq!(timings.settle(), Duration::from_secs(2));
    }

    #[test]
    fn poll_interval_never_zero() {
        let mut timings = Timings::uniform(10);
        timings.poll_interval_ms = 0;
        assert_eq!(timings.poll_interval(), Duration::from_millis(1));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let timings: Timings = serde_json::from_str(r#"{"settle_ms": 500}"#).unwrap();
        assert_eq!(timings.settle_ms, 500);
        assert_eq!(timings.step_timeout_ms, 10_000);
    }
}
