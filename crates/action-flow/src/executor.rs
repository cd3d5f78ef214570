//! Flow executor implementation

use crate::dialogs::accept_and_classify;
use crate::driver_select::select_driver;
use crate::errors::FlowError;
use crate::locators;
use crate::quantity::enter_quantity;
use crate::strategies::{DefaultFailureHandler, FailureDecision, FailureHandler};
use crate::types::*;
use action_gate::DialogKind;
use action_primitives::{
    click_when_clickable, click_with_fallback, is_readonly, replace_text, wait_for_dialog,
    wait_for_element, ActionError, ElementState, PageDriver, Timings,
};
use async_recursion::async_recursion;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

/// Flow executor trait
#[async_trait]
pub trait FlowExecutor: Send + Sync {
    /// Execute a flow, accumulating results into `ctx`
    async fn execute(&self, flow: &Flow, ctx: &mut RunContext) -> Result<FlowResult, FlowError>;

    /// Validate flow structure
    fn validate_flow(&self, flow: &Flow) -> Result<(), FlowError>;
}

/// Default flow executor implementation
pub struct DefaultFlowExecutor {
    page: Arc<dyn PageDriver>,
    timings: Timings,
    failure_handler: Arc<dyn FailureHandler>,
}

impl DefaultFlowExecutor {
    /// Create a new flow executor
    pub fn new(page: Arc<dyn PageDriver>, timings: Timings) -> Self {
        Self {
            page,
            timings,
            failure_handler: Arc::new(DefaultFailureHandler::new()),
        }
    }

    pub fn with_failure_handler(mut self, handler: Arc<dyn FailureHandler>) -> Self {
        self.failure_handler = handler;
        self
    }

    fn page(&self) -> &dyn PageDriver {
        self.page.as_ref()
    }

    /// Execute a flow node
    #[async_recursion]
    async fn execute_node(
        &self,
        node: &FlowNode,
        ctx: &mut RunContext,
        records: &mut Vec<StepRecord>,
    ) -> Result<(), FlowError> {
        match node {
            FlowNode::Sequence { steps } => {
                debug!("Executing sequence with {} nodes", steps.len());
                for step in steps {
                    self.execute_node(step, ctx, records).await?;
                }
                Ok(())
            }

            FlowNode::Conditional {
                condition,
                then_branch,
                else_branch,
            } => {
                let holds = self.evaluate_condition(condition, ctx).await;
                let (taken, skipped) = if holds {
                    (Some(then_branch.as_ref()), else_branch.as_deref())
                } else {
                    (else_branch.as_deref(), Some(then_branch.as_ref()))
                };
                if let Some(branch) = skipped {
                    let mut names = Vec::new();
                    branch.collect_steps(&mut names);
                    for step in names {
                        debug!(step = %step.name, "branch not taken, skipping");
                        records.push(StepRecord {
                            name: step.name.clone(),
                            status: StepStatus::Skipped,
                            elapsed_ms: 0,
                        });
                    }
                }
                match taken {
                    Some(branch) => self.execute_node(branch, ctx, records).await,
                    None => Ok(()),
                }
            }

            FlowNode::Step(step) => self.execute_step(step, ctx, records).await,
        }
    }

    async fn evaluate_condition(&self, condition: &FlowCondition, ctx: &mut RunContext) -> bool {
        match condition {
            FlowCondition::OrderListed { order_id } => {
                let listed = self.order_listed(order_id).await;
                info!(order = %order_id, listed, "order listing checked");
                ctx.order_listed = Some(listed);
                listed
            }
            FlowCondition::ElementExists(locator) => self
                .page()
                .count(locator)
                .await
                .map(|n| n > 0)
                .unwrap_or(false),
        }
    }

    /// Listed when an order checkbox exists, or when a result row mentions
    /// the order. Lookup errors mean "not listed".
    async fn order_listed(&self, order_id: &str) -> bool {
        match self.page().count(&locators::order_checkbox(order_id)).await {
            Ok(n) if n > 0 => return true,
            Ok(_) => {}
            Err(err) => {
                warn!(order = %order_id, error = %err, "checkbox lookup failed");
                return false;
            }
        }
        match self.page().texts(&locators::result_rows()).await {
            Ok(rows) => rows.iter().any(|row| row.contains(order_id)),
            Err(err) => {
                warn!(order = %order_id, error = %err, "result row lookup failed");
                false
            }
        }
    }

    async fn execute_step(
        &self,
        step: &Step,
        ctx: &mut RunContext,
        records: &mut Vec<StepRecord>,
    ) -> Result<(), FlowError> {
        let started = Instant::now();
        if !step.delay.is_zero() {
            sleep(step.delay).await;
        }
        debug!(step = %step.name, "running step");

        let outcome = match self.await_precondition(step).await {
            Ok(observed) => self.perform(step, observed, ctx).await,
            Err(err) => Err(err),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match outcome {
            Ok(()) => {
                info!(step = %step.name, elapsed_ms, "step completed");
                records.push(StepRecord {
                    name: step.name.clone(),
                    status: StepStatus::Completed,
                    elapsed_ms,
                });
                Ok(())
            }
            Err(err) => match self.failure_handler.handle_failure(step, &err) {
                FailureDecision::Continue(reason) => {
                    ctx.warn(&step.name, step.kind, reason.clone());
                    records.push(StepRecord {
                        name: step.name.clone(),
                        status: StepStatus::Tolerated { reason },
                        elapsed_ms,
                    });
                    Ok(())
                }
                FailureDecision::Abort(flow_err) => Err(flow_err),
            },
        }
    }

    /// Wait for the step's precondition; a dialog precondition yields its text.
    async fn await_precondition(&self, step: &Step) -> Result<Option<String>, ActionError> {
        let interval = self.timings.poll_interval();
        let (locator, state) = match &step.precondition {
            Precondition::None => return Ok(None),
            Precondition::Dialog => {
                return wait_for_dialog(self.page(), step.timeout, interval)
                    .await
                    .map(Some)
                    .ok_or_else(|| {
                        ActionError::DialogMissing(format!(
                            "no dialog within {}ms",
                            step.timeout.as_millis()
                        ))
                    });
            }
            Precondition::Present(locator) => (locator, ElementState::Present),
            Precondition::Clickable(locator) => (locator, ElementState::Clickable),
        };

        if wait_for_element(self.page(), locator, state, step.timeout, interval).await {
            Ok(None)
        } else {
            Err(ActionError::WaitTimeout(format!(
                "{} not {:?} after {}ms",
                locator,
                state,
                step.timeout.as_millis()
            )))
        }
    }

    async fn perform(
        &self,
        step: &Step,
        observed: Option<String>,
        ctx: &mut RunContext,
    ) -> Result<(), ActionError> {
        let page = self.page();
        match &step.action {
            StepAction::Navigate { url } => page.navigate(url).await,

            StepAction::Login { username, password } => {
                let user_field = locators::username_field();
                let pass_field = locators::password_field();
                replace_text(page, &user_field, username).await?;
                replace_text(page, &pass_field, password).await?;
                page.press_enter(&pass_field).await
            }

            StepAction::ScrollIntoView(locator) => page.scroll_into_view(locator).await,

            StepAction::Click(locator) => click_with_fallback(page, locator).await,

            StepAction::Search { order_id } => {
                let search = locators::search_box();
                replace_text(page, &search, order_id).await?;
                page.press_enter(&search).await?;
                sleep(self.timings.settle()).await;
                Ok(())
            }

            StepAction::AcceptDialog { kind, order_id } => {
                let text = match observed {
                    Some(text) => text,
                    None => page
                        .dialog_text()
                        .await?
                        .ok_or_else(|| ActionError::DialogMissing(kind.to_string()))?,
                };
                accept_and_classify(page, ctx, &step.name, *kind, &text, order_id.as_deref())
                    .await
                    .map(|_| ())
            }

            StepAction::SelectSplitOrder { order_id } => {
                let radio = locators::split_order_radio(order_id);
                let value = page.value(&radio).await?.unwrap_or_default();
                if !value.starts_with(order_id.as_str()) {
                    return Err(ActionError::ConditionNotMet(format!(
                        "split order value {:?} does not start with {}",
                        value, order_id
                    )));
                }
                info!(order = %order_id, split = %value, "selecting split order");
                click_with_fallback(page, &radio).await
            }

            StepAction::DismissRefreshNotice => {
                let interval = self.timings.poll_interval();
                let Some(text) = wait_for_dialog(page, self.timings.lookup_timeout(), interval).await
                else {
                    debug!("no refresh notice");
                    return Ok(());
                };
                let verdict = accept_and_classify(
                    page,
                    ctx,
                    &step.name,
                    DialogKind::RefreshNotice,
                    &text,
                    None,
                )
                .await?;
                if verdict.recognized {
                    info!("refresh notice accepted, clicking place vehicle again");
                    click_when_clickable(
                        page,
                        &locators::place_vehicle_button(),
                        self.timings.step_timeout(),
                        interval,
                    )
                    .await?;
                }
                Ok(())
            }

            StepAction::ChooseVehicle { vehicle_number } => {
                page.type_text(&locators::vehicle_field(), vehicle_number)
                    .await?;
                click_when_clickable(
                    page,
                    &locators::vehicle_suggestion(vehicle_number),
                    step.timeout,
                    self.timings.poll_interval(),
                )
                .await
            }

            StepAction::SelectDriver {
                driver_name,
                license_last4,
            } => {
                let selection =
                    select_driver(page, &self.timings, driver_name, license_last4).await?;
                if let DriverSelection::Prefilled {
                    value,
                    license_matches: false,
                } = &selection
                {
                    ctx.warn(
                        &step.name,
                        FailureKind::ConditionNotMet,
                        format!(
                            "prefilled driver {:?} does not contain license {}",
                            value, license_last4
                        ),
                    );
                }
                ctx.driver = Some(selection);
                Ok(())
            }

            StepAction::EnterMobile { phone_number } => {
                let field = locators::mobile_field();
                let current = page.value(&field).await?.unwrap_or_default();
                if is_readonly(page, &field).await? && !current.trim().is_empty() {
                    info!(mobile = %current, "mobile number prefilled by portal");
                    return Ok(());
                }
                replace_text(page, &field, phone_number).await
            }

            StepAction::EnterQuantity { weight } => {
                let (readout, quantity) = enter_quantity(page, *weight).await?;
                ctx.capacity = Some(readout);
                ctx.quantity = Some(quantity);
                Ok(())
            }

            StepAction::SetEta => {
                page.click(&locators::eta_field()).await?;
                click_with_fallback(page, &locators::page_body()).await
            }

            StepAction::Checkpoint { path } => {
                page.screenshot(path).await?;
                info!(path = %path.display(), "checkpoint screenshot saved");
                Ok(())
            }

            StepAction::RecordFinalUrl => {
                let url = page.current_url().await?;
                info!(url = %url, "final page reached");
                ctx.final_url = Some(url);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl FlowExecutor for DefaultFlowExecutor {
    async fn execute(&self, flow: &Flow, ctx: &mut RunContext) -> Result<FlowResult, FlowError> {
        self.validate_flow(flow)?;
        let started = Instant::now();
        info!(
            flow_id = %flow.id,
            flow = %flow.name,
            steps = flow.steps().len(),
            "executing flow"
        );

        let mut records = Vec::new();
        self.execute_node(&flow.root, ctx, &mut records).await?;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(flow_id = %flow.id, elapsed_ms, warnings = ctx.warnings.len(), "flow completed");
        Ok(FlowResult {
            flow_id: flow.id.clone(),
            steps: records,
            elapsed_ms,
        })
    }

    fn validate_flow(&self, flow: &Flow) -> Result<(), FlowError> {
        let steps = flow.steps();
        if steps.is_empty() {
            return Err(FlowError::InvalidStructure(format!(
                "flow {} has no steps",
                flow.id
            )));
        }
        let mut seen = HashSet::new();
        for step in steps {
            if !seen.insert(step.name.as_str()) {
                return Err(FlowError::InvalidStructure(format!(
                    "duplicate step name {}",
                    step.name
                )));
            }
        }
        Ok(())
    }
}
