//! Dialog classifier
//!
//! Decides whether a modal dialog raised by the portal is the one a step
//! expects:
//! - phrase rules (exact, or any-of case-insensitive keywords)
//! - order-number patterns tried in order, with a plain substring fallback
//! - extraction of the embedded order token (e.g. `2200123456_1_1`)
//!
//! Classification never fails a run on its own; callers decide what an
//! unrecognized dialog means.

pub mod classifier;
pub mod conditions;
pub mod errors;
pub mod types;

pub use classifier::*;
pub use conditions::*;
pub use errors::*;
pub use types::*;
