//! One placement run: validate, open a session, drive the flow, release.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use action_flow::{
    build_placement_flow, DefaultFlowExecutor, FlowExecutor, PortalAccess, RunContext,
};
use action_primitives::webdriver::WebDriverSessionFactory;
use action_primitives::{PageDriver, SessionFactory, Timings};
use autoplant_core_types::{PlacementRequest, RunId, RunOutcome};
use chrono::Local;
use tokio::sync::Mutex;
use tracing::{error, info, instrument, warn};

use crate::config::{ArtifactsConfig, Config};

pub const FAILURE_PREFIX: &str = "An error occurred during script execution";

pub fn failure_message(detail: impl std::fmt::Display) -> String {
    format!("{}: {}", FAILURE_PREFIX, detail)
}

/// Runs placements one at a time against fresh browser sessions.
pub struct PlacementRunner {
    sessions: Arc<dyn SessionFactory>,
    access: PortalAccess,
    timings: Timings,
    artifacts: ArtifactsConfig,
    gate: Mutex<()>,
    busy: AtomicBool,
    runs_started: AtomicU64,
}

impl PlacementRunner {
    pub fn new(
        sessions: Arc<dyn SessionFactory>,
        access: PortalAccess,
        timings: Timings,
        artifacts: ArtifactsConfig,
    ) -> Self {
        Self {
            sessions,
            access,
            timings,
            artifacts,
            gate: Mutex::new(()),
            busy: AtomicBool::new(false),
            runs_started: AtomicU64::new(0),
        }
    }

    /// Runner backed by the configured WebDriver endpoint
    pub fn from_config(config: &Config) -> Self {
        let sessions = Arc::new(WebDriverSessionFactory::new(config.webdriver.clone()));
        Self::new(
            sessions,
            config.portal.access(),
            config.timing.clone(),
            config.artifacts.clone(),
        )
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn runs_started(&self) -> u64 {
        self.runs_started.load(Ordering::SeqCst)
    }

    /// Process one request. Concurrent callers queue behind the run gate.
    pub async fn process(&self, request: PlacementRequest) -> RunOutcome {
        let run_id = RunId::new();
        let _permit = self.gate.lock().await;
        let _busy = BusyFlag::raise(&self.busy);
        self.runs_started.fetch_add(1, Ordering::SeqCst);

        self.run(&run_id, request).await
    }

    #[instrument(name = "autoplant.run", skip(self, request), fields(run_id = %run_id))]
    async fn run(&self, run_id: &RunId, request: PlacementRequest) -> RunOutcome {
        let order = match request.validate() {
            Ok(order) => order,
            Err(err) => {
                warn!(error = %err, "rejecting request before opening a browser");
                return RunOutcome::Failure {
                    message: failure_message(err),
                };
            }
        };
        info!(
            order = %order.order_id,
            vehicle = %order.vehicle_number,
            driver = %order.driver_name,
            weight = order.weight,
            "starting placement run"
        );

        let session = match self.sessions.open().await {
            Ok(page) => SessionGuard::new(page),
            Err(err) => {
                error!(error = %err, "could not start browser session");
                return RunOutcome::Failure {
                    message: failure_message(err),
                };
            }
        };

        let label = artifact_label(run_id);
        let checkpoint = self
            .artifacts
            .checkpoint
            .then(|| self.artifact_path("details", &label));
        if checkpoint.is_some() {
            self.ensure_artifacts_dir().await;
        }

        let flow = build_placement_flow(&self.access, &order, &self.timings, checkpoint);
        let executor = DefaultFlowExecutor::new(Arc::clone(session.page()), self.timings.clone());
        let mut ctx = RunContext::new();
        let result = executor.execute(&flow, &mut ctx).await;

        let outcome = match result {
            Ok(flow_result) => {
                for warning in &ctx.warnings {
                    warn!(step = %warning.step, kind = %warning.kind, "{}", warning.message);
                }
                info!(
                    order = %order.order_id,
                    steps = flow_result.completed(),
                    skipped = flow_result.skipped().len(),
                    commit_receipt = ctx.commit_receipt.as_deref().unwrap_or("-"),
                    quantity = ctx.quantity.unwrap_or_default(),
                    final_url = ctx.final_url.as_deref().unwrap_or("-"),
                    elapsed_ms = flow_result.elapsed_ms,
                    "all steps completed"
                );
                RunOutcome::Success {
                    request,
                    final_url: ctx.final_url.clone(),
                }
            }
            Err(err) => {
                error!(
                    order = %order.order_id,
                    step = err.step().unwrap_or("-"),
                    kind = %err.kind(),
                    "{}",
                    err
                );
                self.save_error_screenshot(session.page().as_ref(), &label).await;
                RunOutcome::Failure {
                    message: failure_message(err),
                }
            }
        };

        session.release().await;
        outcome
    }

    fn artifact_path(&self, kind: &str, label: &str) -> PathBuf {
        self.artifacts.dir.join(format!("{}-{}.png", kind, label))
    }

    async fn ensure_artifacts_dir(&self) {
        if let Err(err) = tokio::fs::create_dir_all(&self.artifacts.dir).await {
            warn!(dir = %self.artifacts.dir.display(), error = %err, "cannot create artifacts dir");
        }
    }

    async fn save_error_screenshot(&self, page: &dyn PageDriver, label: &str) {
        self.ensure_artifacts_dir().await;
        let path = self.artifact_path("error", label);
        match page.screenshot(&path).await {
            Ok(()) => info!(path = %path.display(), "error screenshot saved"),
            Err(err) => warn!(error = %err, "could not save error screenshot"),
        }
    }
}

/// Holds `busy` up for as long as the run future lives.
struct BusyFlag<'a>(&'a AtomicBool);

impl<'a> BusyFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for BusyFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Browser session owned by one run.
///
/// `release` closes it in line. A run future dropped before that point (client
/// disconnect, aborted task) closes it from a spawned task instead.
struct SessionGuard {
    page: Arc<dyn PageDriver>,
    released: bool,
}

impl SessionGuard {
    fn new(page: Arc<dyn PageDriver>) -> Self {
        Self {
            page,
            released: false,
        }
    }

    fn page(&self) -> &Arc<dyn PageDriver> {
        &self.page
    }

    async fn release(mut self) {
        close_session(self.page.as_ref()).await;
        self.released = true;
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let page = Arc::clone(&self.page);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                warn!("run dropped before completion, releasing browser session");
                handle.spawn(async move { close_session(page.as_ref()).await });
            }
            Err(_) => error!("run dropped outside the runtime, browser session leaked"),
        }
    }
}

async fn close_session(page: &dyn PageDriver) {
    if let Err(err) = page.close().await {
        warn!(error = %err, "browser session did not close cleanly");
    }
}

/// `<local timestamp>-<short run id>`, unique and sortable
fn artifact_label(run_id: &RunId) -> String {
    format!("{}-{}", Local::now().format("%Y%m%d-%H%M%S"), run_id.short())
}
