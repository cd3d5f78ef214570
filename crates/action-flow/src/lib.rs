//! Flow Orchestration Layer
//!
//! Runs the vehicle placement walkthrough as a tree of gated steps: each step
//! waits for its precondition, acts on the page and either completes or fails
//! with its own message. Optional branches and tolerated steps are expressed
//! in the flow itself.

pub mod dialogs;
pub mod driver_select;
pub mod errors;
pub mod executor;
pub mod locators;
pub mod placement;
pub mod quantity;
pub mod strategies;
pub mod types;

pub use errors::FlowError;
pub use executor::{DefaultFlowExecutor, FlowExecutor};
pub use placement::{build_placement_flow, PortalAccess, PORTAL_REPORT_URL};
pub use quantity::{compute_entry_quantity, QuantityShortfall, WEIGHT_TOLERANCE};
pub use strategies::{DefaultFailureHandler, FailureDecision, FailureHandler};
pub use types::{
    DriverSelection, FailureKind, FailureStrategy, Flow, FlowCondition, FlowNode, FlowResult,
    Precondition, RunContext, RunWarning, Step, StepAction, StepRecord, StepStatus,
};
