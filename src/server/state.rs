use std::sync::Arc;

use serde::Serialize;

use crate::runner::PlacementRunner;

#[derive(Clone)]
pub struct ServeState {
    runner: Arc<PlacementRunner>,
}

impl ServeState {
    pub fn new(runner: Arc<PlacementRunner>) -> Self {
        Self { runner }
    }

    pub(crate) fn runner(&self) -> &PlacementRunner {
        &self.runner
    }

    pub fn health_snapshot(&self) -> ServeHealth {
        ServeHealth {
            status: "ok",
            busy: self.runner.is_busy(),
            runs_started: self.runner.runs_started(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ServeHealth {
    pub status: &'static str,
    pub busy: bool,
    pub runs_started: u64,
    pub version: &'static str,
}
