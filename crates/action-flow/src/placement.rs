//! The vehicle placement flow on the transporter report portal.

use crate::locators;
use crate::types::*;
use action_gate::DialogKind;
use action_primitives::Timings;
use autoplant_core_types::PlacementOrder;
use std::fmt;
use std::path::PathBuf;

/// Planned-orders report; unauthenticated visits land on the login form.
pub const PORTAL_REPORT_URL: &str =
    "https://dfpcl.autoplant.in/AutoplantVC/transporter_report.do?method=getTransporterReport&status=planned";

/// Where and as whom the flow logs in
#[derive(Clone)]
pub struct PortalAccess {
    pub report_url: String,
    pub username: String,
    pub password: String,
}

impl PortalAccess {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            report_url: PORTAL_REPORT_URL.to_string(),
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn with_report_url(mut self, url: impl Into<String>) -> Self {
        self.report_url = url.into();
        self
    }
}

impl fmt::Debug for PortalAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalAccess")
            .field("report_url", &self.report_url)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn click_step(name: &str, locator: action_primitives::Locator, timings: &Timings) -> Step {
    Step::new(name, StepAction::Click(locator.clone()))
        .when(Precondition::Clickable(locator))
        .within(timings.step_timeout())
}

fn search_step(name: &str, order_id: &str, timings: &Timings) -> Step {
    Step::new(
        name,
        StepAction::Search {
            order_id: order_id.to_string(),
        },
    )
    .when(Precondition::Present(locators::search_box()))
    .within(timings.step_timeout())
    .fails_with(FailureKind::ElementNotFound, "Could not find search box")
}

/// Build the full placement flow for one order.
///
/// `checkpoint` is where the best-effort "details" screenshot goes; `None`
/// leaves the step out.
pub fn build_placement_flow(
    access: &PortalAccess,
    order: &PlacementOrder,
    timings: &Timings,
    checkpoint: Option<PathBuf>,
) -> Flow {
    let so = order.order_id.as_str();
    let wait = timings.step_timeout();

    let commit_branch = FlowNode::sequence(vec![
        click_step("select_order_checkbox", locators::order_checkbox(so), timings)
            .fails_with(
                FailureKind::ElementNotFound,
                format!("Could not find checkbox for SO_NO = {}", so),
            )
            .into(),
        click_step("commit_order", locators::commit_button(), timings)
            .fails_with(
                FailureKind::ElementNotFound,
                "Could not find or click the Commit button",
            )
            .into(),
        Step::new(
            "commit_confirmation",
            StepAction::AcceptDialog {
                kind: DialogKind::CommitConfirmation,
                order_id: Some(so.to_string()),
            },
        )
        .when(Precondition::Dialog)
        .within(wait)
        .fails_with(
            FailureKind::ConditionNotMet,
            "Error handling first popup after committing",
        )
        .into(),
        Step::new(
            "commit_success",
            StepAction::AcceptDialog {
                kind: DialogKind::CommitSuccess,
                order_id: Some(so.to_string()),
            },
        )
        .after(timings.dialog_gap())
        .when(Precondition::Dialog)
        .within(wait)
        .fails_with(
            FailureKind::DialogMismatch,
            "Error handling second popup after committing",
        )
        .tolerated()
        .into(),
    ]);

    let mut nodes: Vec<FlowNode> = vec![
        Step::new(
            "open_report",
            StepAction::Navigate {
                url: access.report_url.clone(),
            },
        )
        .fails_with(FailureKind::Navigation, "Could not open login page")
        .into(),
        Step::new(
            "login",
            StepAction::Login {
                username: access.username.clone(),
                password: access.password.clone(),
            },
        )
        .when(Precondition::Present(locators::username_field()))
        .within(wait)
        .fails_with(
            FailureKind::Auth,
            "Could not log in, Wrong Username or Password",
        )
        .into(),
        Step::new(
            "sidebar_toggle",
            StepAction::ScrollIntoView(locators::sidebar_toggle()),
        )
        .when(Precondition::Present(locators::sidebar_toggle()))
        .within(wait)
        .fails_with(
            FailureKind::Auth,
            "Could not find sidebar toggle (Username or password might be wrong)",
        )
        .into(),
        click_step(
            "vendor_collaboration",
            locators::vendor_collaboration_link(),
            timings,
        )
        .fails_with(
            FailureKind::ElementNotFound,
            "Could not click 'Vendor Collaboration' dropdown",
        )
        .into(),
        click_step(
            "available_orders_report",
            locators::available_orders_link(),
            timings,
        )
        .fails_with(
            FailureKind::ElementNotFound,
            "Could not click 'Available Orders Report'",
        )
        .into(),
        search_step("search_order", so, timings).into(),
        FlowNode::when(
            FlowCondition::OrderListed {
                order_id: so.to_string(),
            },
            commit_branch,
        ),
        click_step("total_orders", locators::total_orders_toggle(), timings)
            .fails_with(FailureKind::ElementNotFound, "Could not go to TOTAL ORDERS page")
            .into(),
        click_step(
            "committed_orders",
            locators::committed_orders_toggle(),
            timings,
        )
        .fails_with(
            FailureKind::ElementNotFound,
            "Could not go to COMMIT/ALLOCATED ORDERS page",
        )
        .into(),
        search_step("search_committed", so, timings).into(),
        Step::new(
            "select_split_order",
            StepAction::SelectSplitOrder {
                order_id: so.to_string(),
            },
        )
        .when(Precondition::Present(locators::split_order_radio(so)))
        .within(wait)
        .fails_with(
            FailureKind::ConditionNotMet,
            format!("Failed: S.O. number {} not found", so),
        )
        .into(),
        click_step("place_vehicle", locators::place_vehicle_button(), timings)
            .fails_with(
                FailureKind::ElementNotFound,
                "Could not find or click Place Vehicle button",
            )
            .into(),
        Step::new("refresh_notice", StepAction::DismissRefreshNotice)
            .after(timings.settle())
            .fails_with(FailureKind::Unhandled, "Could not handle refresh popup")
            .into(),
        Step::new(
            "vehicle_number",
            StepAction::ChooseVehicle {
                vehicle_number: order.vehicle_number.clone(),
            },
        )
        .when(Precondition::Clickable(locators::vehicle_field()))
        .within(wait)
        .fails_with(
            FailureKind::ElementNotFound,
            format!(
                "Could not find or input vehicle number: {}",
                order.vehicle_number
            ),
        )
        .into(),
        Step::new(
            "driver",
            StepAction::SelectDriver {
                driver_name: order.driver_name.clone(),
                license_last4: order.license_last4.clone(),
            },
        )
        .when(Precondition::Present(locators::driver_field()))
        .within(wait)
        .fails_with(FailureKind::ConditionNotMet, "Could not find driver")
        .into(),
        Step::new(
            "mobile_number",
            StepAction::EnterMobile {
                phone_number: order.phone_number.clone(),
            },
        )
        .when(Precondition::Present(locators::mobile_field()))
        .within(wait)
        .fails_with(
            FailureKind::ElementNotFound,
            "Could not find or input mobile number",
        )
        .into(),
        Step::new(
            "quantity",
            StepAction::EnterQuantity {
                weight: order.weight,
            },
        )
        .when(Precondition::Clickable(locators::quantity_field()))
        .within(wait)
        .fails_with(FailureKind::ConditionNotMet, "Could not input quantity")
        .into(),
        Step::new("eta", StepAction::SetEta)
            .when(Precondition::Clickable(locators::eta_field()))
            .within(wait)
            .fails_with(
                FailureKind::ElementNotFound,
                "Could not find or click eta button",
            )
            .tolerated()
            .into(),
    ];

    if let Some(path) = checkpoint {
        nodes.push(
            Step::new("details_checkpoint", StepAction::Checkpoint { path })
                .fails_with(FailureKind::Unhandled, "Could not save details screenshot")
                .tolerated()
                .into(),
        );
    }

    nodes.extend([
        click_step(
            "submit_details",
            locators::submit_details_button(),
            timings,
        )
        .fails_with(
            FailureKind::ElementNotFound,
            "Could not find or click 2nd submit button for placing vehicle",
        )
        .into(),
        Step::new(
            "confirm_allocation",
            StepAction::AcceptDialog {
                kind: DialogKind::AllocationConfirmation,
                order_id: None,
            },
        )
        .after(timings.settle())
        .when(Precondition::Dialog)
        .within(timings.final_dialog_timeout())
        .fails_with(
            FailureKind::ConditionNotMet,
            "Could not handle final confirmation popup",
        )
        .into(),
        Step::new("record_final_url", StepAction::RecordFinalUrl)
            .after(timings.settle())
            .fails_with(FailureKind::Unhandled, "Could not read final page URL")
            .tolerated()
            .into(),
    ]);

    Flow::new(
        format!("placement-{}", so),
        "vehicle placement",
        FlowNode::sequence(nodes),
    )
}
