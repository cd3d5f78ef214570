//! Core types for flow orchestration

use action_gate::{DialogKind, DialogVerdict};
use action_primitives::Locator;
use autoplant_core_types::CapacityReadout;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Flow definition - an ordered tree of steps
#[derive(Debug, Clone)]
pub struct Flow {
    /// Flow identifier
    pub id: String,

    /// Flow name
    pub name: String,

    /// Root node of the flow
    pub root: FlowNode,
}

impl Flow {
    /// Create a new flow
    pub fn new(id: impl Into<String>, name: impl Into<String>, root: FlowNode) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            root,
        }
    }

    /// Every step in document order, branches included
    pub fn steps(&self) -> Vec<&Step> {
        let mut steps = Vec::new();
        self.root.collect_steps(&mut steps);
        steps
    }
}

/// Flow node - a step or a control structure
#[derive(Debug, Clone)]
pub enum FlowNode {
    /// Execute nodes in order
    Sequence { steps: Vec<FlowNode> },

    /// Execute a branch depending on page state
    Conditional {
        condition: FlowCondition,
        then_branch: Box<FlowNode>,
        else_branch: Option<Box<FlowNode>>,
    },

    /// Single step
    Step(Step),
}

impl FlowNode {
    pub fn sequence(steps: Vec<FlowNode>) -> Self {
        FlowNode::Sequence { steps }
    }

    pub fn when(condition: FlowCondition, then_branch: FlowNode) -> Self {
        FlowNode::Conditional {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: None,
        }
    }

    pub(crate) fn collect_steps<'a>(&'a self, out: &mut Vec<&'a Step>) {
        match self {
            FlowNode::Sequence { steps } => steps.iter().for_each(|node| node.collect_steps(out)),
            FlowNode::Conditional {
                then_branch,
                else_branch,
                ..
            } => {
                then_branch.collect_steps(out);
                if let Some(branch) = else_branch {
                    branch.collect_steps(out);
                }
            }
            FlowNode::Step(step) => out.push(step),
        }
    }
}

impl From<Step> for FlowNode {
    fn from(step: Step) -> Self {
        FlowNode::Step(step)
    }
}

/// Branch conditions evaluated against the live page
#[derive(Debug, Clone, PartialEq)]
pub enum FlowCondition {
    /// The order appears in the current search results
    OrderListed { order_id: String },

    /// At least one element matches
    ElementExists(Locator),
}

/// What must hold before a step acts
#[derive(Debug, Clone, PartialEq)]
pub enum Precondition {
    None,
    Present(Locator),
    Clickable(Locator),
    /// A modal dialog is open; its text is handed to the action
    Dialog,
}

/// Failure strategy for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStrategy {
    /// Stop the flow and report the step's failure message
    Abort,
    /// Record a warning and move on
    Continue,
}

/// Failure taxonomy reported with every step failure or warning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Navigation,
    Auth,
    ElementNotFound,
    /// Dialog text differed from what was expected; never fatal
    DialogMismatch,
    ConditionNotMet,
    Unhandled,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Navigation => "navigation",
            FailureKind::Auth => "auth",
            FailureKind::ElementNotFound => "element_not_found",
            FailureKind::DialogMismatch => "dialog_mismatch",
            FailureKind::ConditionNotMet => "condition_not_met",
            FailureKind::Unhandled => "unhandled",
        };
        f.write_str(label)
    }
}

/// What a step does once its precondition holds
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    Navigate { url: String },
    Login { username: String, password: String },
    ScrollIntoView(Locator),
    Click(Locator),
    /// Clear the global search box, type the order id, press Enter, settle
    Search { order_id: String },
    /// Accept the open dialog and classify its text
    AcceptDialog {
        kind: DialogKind,
        order_id: Option<String>,
    },
    /// Pick the split-order radio whose value starts with the order id
    SelectSplitOrder { order_id: String },
    /// Handle the optional refresh notice after place-vehicle
    DismissRefreshNotice,
    ChooseVehicle { vehicle_number: String },
    SelectDriver {
        driver_name: String,
        license_last4: String,
    },
    EnterMobile { phone_number: String },
    EnterQuantity { weight: f64 },
    SetEta,
    Checkpoint { path: PathBuf },
    RecordFinalUrl,
}

/// One step descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub name: String,
    pub precondition: Precondition,
    pub action: StepAction,
    /// Human-readable message reported when the step aborts the run
    pub failure_message: String,
    pub kind: FailureKind,
    pub timeout: Duration,
    /// Fixed pause before the precondition is checked
    pub delay: Duration,
    pub strategy: FailureStrategy,
}

impl Step {
    pub fn new(name: impl Into<String>, action: StepAction) -> Self {
        let name = name.into();
        Self {
            failure_message: format!("Step {} failed", name),
            name,
            precondition: Precondition::None,
            action,
            kind: FailureKind::Unhandled,
            timeout: Duration::from_secs(10),
            delay: Duration::ZERO,
            strategy: FailureStrategy::Abort,
        }
    }

    pub fn when(mut self, precondition: Precondition) -> Self {
        self.precondition = precondition;
        self
    }

    pub fn fails_with(mut self, kind: FailureKind, message: impl Into<String>) -> Self {
        self.kind = kind;
        self.failure_message = message.into();
        self
    }

    pub fn within(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Failures become warnings
    pub fn tolerated(mut self) -> Self {
        self.strategy = FailureStrategy::Continue;
        self
    }
}

/// How the driver field ended up filled
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "via", rename_all = "snake_case")]
pub enum DriverSelection {
    /// Read-only field already filled by the portal
    Prefilled {
        value: String,
        license_matches: bool,
    },
    /// Chosen from the autocomplete list
    Suggestion {
        word: String,
        typed: String,
        option: String,
        index: usize,
    },
}

/// Non-fatal problem noticed during a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunWarning {
    pub step: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Accumulator threaded through the step loop
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub order_listed: Option<bool>,
    pub commit_receipt: Option<String>,
    pub dialogs: Vec<DialogVerdict>,
    pub driver: Option<DriverSelection>,
    pub capacity: Option<CapacityReadout>,
    pub quantity: Option<i64>,
    pub final_url: Option<String>,
    pub warnings: Vec<RunWarning>,
}

impl RunContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, step: &str, kind: FailureKind, message: impl Into<String>) {
        self.warnings.push(RunWarning {
            step: step.to_string(),
            kind,
            message: message.into(),
        });
    }
}

/// Step outcome as recorded in the flow result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    /// Branch not taken
    Skipped,
    /// Failed under the Continue strategy
    Tolerated { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub name: String,
    #[serde(flatten)]
    pub status: StepStatus,
    pub elapsed_ms: u64,
}

/// Flow execution result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowResult {
    pub flow_id: String,
    pub steps: Vec<StepRecord>,
    pub elapsed_ms: u64,
}

impl FlowResult {
    pub fn completed(&self) -> usize {
        self.steps
            .iter()
            .filter(|record| record.status == StepStatus::Completed)
            .count()
    }

    pub fn skipped(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|record| record.status == StepStatus::Skipped)
            .map(|record| record.name.as_str())
            .collect()
    }
}
