//! Autoplant placement automation
//!
//! Drives the transporter portal's vehicle placement form for one order per
//! request, behind a small HTTP API and CLI.

pub mod cli;
pub mod config;
pub mod errors;
pub mod parsers;
pub mod runner;
pub mod server;

pub use config::Config;
pub use errors::ServiceError;
pub use runner::PlacementRunner;
