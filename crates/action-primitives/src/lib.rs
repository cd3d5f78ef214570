//! Action primitives for portal automation
//!
//! This crate provides the building blocks the placement flow is made of:
//! - [`PageDriver`]: the browser seam (element lookups, clicks, typing, dialogs)
//! - [`Locator`]: how elements are addressed on the portal
//! - bounded polling waits for elements and dialogs
//! - a WebDriver implementation over `thirtyfour` and a scripted in-memory page

pub mod errors;
mod locator;
mod primitives;
pub mod scripted;
pub mod types;
mod waiting;
pub mod webdriver;

pub use errors::*;
pub use locator::*;
pub use primitives::*;
pub use types::*;
pub use waiting::*;
