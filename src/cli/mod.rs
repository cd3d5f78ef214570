pub mod app;
pub mod commands;
pub mod config;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod extract;
pub mod run;
pub mod runtime;
pub mod serve;

pub use app::run;
