mod common;

use std::sync::Arc;

use action_flow::{
    build_placement_flow, locators, DefaultFlowExecutor, DriverSelection, FailureKind,
    FlowExecutor, PortalAccess, RunContext, StepStatus,
};
use action_gate::DialogKind;
use action_primitives::scripted::{PageEvent, Reaction, ScriptedElement};
use action_primitives::Timings;
use autoplant_cli::runner::failure_message;
use autoplant_core_types::{PlacementRequest, ProcessResponse, RunOutcome};
use common::{portal, request_json, runner, PortalScript, FINAL_URL, SO_NO};

fn request() -> PlacementRequest {
    serde_json::from_value(request_json()).unwrap()
}

#[tokio::test]
async fn successful_run_echoes_request() {
    let artifacts = tempfile::tempdir().unwrap();
    let (runner, sessions) = runner(portal(PortalScript::default()), artifacts.path());

    let outcome = runner.process(request()).await;

    assert_eq!(
        outcome,
        RunOutcome::Success {
            request: request(),
            final_url: Some(FINAL_URL.to_string()),
        }
    );
    let response = serde_json::to_value(ProcessResponse::from(outcome)).unwrap();
    assert_eq!(response["status"], "success");
    assert_eq!(response["message"], "Data processed successfully");
    assert_eq!(response["processed_data"], request_json());

    let page = sessions.page();
    assert_eq!(page.close_count(), 1);
    assert_eq!(page.value_of(&locators::quantity_field()).as_deref(), Some("24"));
    assert_eq!(
        page.value_of(&locators::mobile_field()).as_deref(),
        Some("9876543210")
    );
    assert_eq!(page.accepted_dialogs().len(), 3);

    let details: Vec<_> = std::fs::read_dir(artifacts.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(details.len(), 1);
    assert!(details[0].starts_with("details-"));
}

#[tokio::test]
async fn readonly_prefilled_mobile_is_kept() {
    let artifacts = tempfile::tempdir().unwrap();
    let page = portal(PortalScript::default());
    page.remove_element(&locators::mobile_field());
    page.add_element(
        locators::mobile_field(),
        ScriptedElement::new().readonly().with_value("9000000001"),
    );
    let (runner, sessions) = runner(page, artifacts.path());

    let outcome = runner.process(request()).await;

    assert!(outcome.is_success());
    assert_eq!(
        sessions.page().value_of(&locators::mobile_field()).as_deref(),
        Some("9000000001")
    );
}

#[tokio::test]
async fn missing_final_dialog_fails_and_releases_session_once() {
    let artifacts = tempfile::tempdir().unwrap();
    let script = PortalScript {
        final_dialog: false,
        ..PortalScript::default()
    };
    let (runner, sessions) = runner(portal(script), artifacts.path());

    let outcome = runner.process(request()).await;

    assert_eq!(
        outcome,
        RunOutcome::Failure {
            message: failure_message("Could not handle final confirmation popup"),
        }
    );
    assert_eq!(sessions.sessions_opened(), 1);
    assert_eq!(sessions.page().close_count(), 1);
    assert!(std::fs::read_dir(artifacts.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .any(|entry| entry.file_name().to_string_lossy().starts_with("error-")));
}

#[tokio::test]
async fn unlisted_order_skips_commit_and_reaches_total_orders() {
    let page = portal(PortalScript {
        order_listed: false,
        ..PortalScript::default()
    });
    let order = request().validate().unwrap();
    let flow = build_placement_flow(
        &PortalAccess::new("606724", "secret"),
        &order,
        &Timings::uniform(20),
        None,
    );
    let executor = DefaultFlowExecutor::new(Arc::new(page.clone()), Timings::uniform(20));
    let mut ctx = RunContext::new();

    let result = executor.execute(&flow, &mut ctx).await.unwrap();

    assert_eq!(ctx.order_listed, Some(false));
    assert_eq!(
        result.skipped(),
        vec![
            "select_order_checkbox",
            "commit_order",
            "commit_confirmation",
            "commit_success"
        ]
    );
    assert!(ctx.commit_receipt.is_none());
    assert_eq!(page.clicked(&locators::total_orders_toggle()), 1);
    assert_eq!(page.accepted_dialogs().len(), 1);
}

#[tokio::test]
async fn listed_order_is_committed_with_receipt() {
    let page = portal(PortalScript::default());
    let order = request().validate().unwrap();
    let flow = build_placement_flow(
        &PortalAccess::new("606724", "secret"),
        &order,
        &Timings::uniform(20),
        None,
    );
    let executor = DefaultFlowExecutor::new(Arc::new(page.clone()), Timings::uniform(20));
    let mut ctx = RunContext::new();

    executor.execute(&flow, &mut ctx).await.unwrap();

    assert_eq!(ctx.order_listed, Some(true));
    assert_eq!(ctx.commit_receipt.as_deref(), Some("2200123456_1_1"));
    assert!(ctx.warnings.is_empty(), "warnings: {:?}", ctx.warnings);
    let kinds: Vec<DialogKind> = ctx.dialogs.iter().map(|verdict| verdict.kind).collect();
    assert_eq!(
        kinds,
        vec![
            DialogKind::CommitConfirmation,
            DialogKind::CommitSuccess,
            DialogKind::AllocationConfirmation
        ]
    );
    assert!(matches!(
        ctx.driver,
        Some(DriverSelection::Suggestion { index: 0, .. })
    ));
    assert_eq!(ctx.quantity, Some(24));
    assert!(page
        .events()
        .contains(&PageEvent::Click(locators::order_checkbox(SO_NO))));
}

#[tokio::test]
async fn refresh_notice_triggers_second_place_vehicle_click() {
    let page = portal(PortalScript {
        refresh_notice: true,
        ..PortalScript::default()
    });
    let order = request().validate().unwrap();
    let flow = build_placement_flow(
        &PortalAccess::new("606724", "secret"),
        &order,
        &Timings::uniform(20),
        None,
    );
    let executor = DefaultFlowExecutor::new(Arc::new(page.clone()), Timings::uniform(20));
    let mut ctx = RunContext::new();

    executor.execute(&flow, &mut ctx).await.unwrap();

    assert_eq!(page.clicked(&locators::place_vehicle_button()), 2);
    assert!(ctx
        .dialogs
        .iter()
        .any(|verdict| verdict.kind == DialogKind::RefreshNotice && verdict.recognized));
}

#[tokio::test]
async fn missing_commit_success_dialog_is_only_a_warning() {
    let artifacts = tempfile::tempdir().unwrap();
    let page = portal(PortalScript {
        commit_success_dialog: false,
        ..PortalScript::default()
    });
    let (runner, sessions) = runner(page.clone(), artifacts.path());

    let outcome = runner.process(request()).await;
    assert!(outcome.is_success(), "outcome: {:?}", outcome);
    assert_eq!(sessions.page().close_count(), 1);

    let order = request().validate().unwrap();
    let flow = build_placement_flow(
        &PortalAccess::new("606724", "secret"),
        &order,
        &Timings::uniform(20),
        None,
    );
    let page = portal(PortalScript {
        commit_success_dialog: false,
        ..PortalScript::default()
    });
    let executor = DefaultFlowExecutor::new(Arc::new(page.clone()), Timings::uniform(20));
    let mut ctx = RunContext::new();

    let result = executor.execute(&flow, &mut ctx).await.unwrap();

    let commit_success = result
        .steps
        .iter()
        .find(|record| record.name == "commit_success")
        .unwrap();
    assert!(matches!(commit_success.status, StepStatus::Tolerated { .. }));
    assert_eq!(ctx.warnings.len(), 1);
    assert_eq!(ctx.warnings[0].step, "commit_success");
    assert_eq!(ctx.warnings[0].kind, FailureKind::DialogMismatch);
    assert_eq!(ctx.quantity, Some(24));
    assert_eq!(page.clicked(&locators::submit_details_button()), 1);
}

#[tokio::test]
async fn unrelated_dialog_after_place_vehicle_is_accepted_without_reclick() {
    let page = portal(PortalScript::default()).on_click(
        locators::place_vehicle_button(),
        Reaction::new().dialog("Session will expire in 5 minutes"),
    );
    let order = request().validate().unwrap();
    let flow = build_placement_flow(
        &PortalAccess::new("606724", "secret"),
        &order,
        &Timings::uniform(20),
        None,
    );
    let executor = DefaultFlowExecutor::new(Arc::new(page.clone()), Timings::uniform(20));
    let mut ctx = RunContext::new();

    executor.execute(&flow, &mut ctx).await.unwrap();

    assert_eq!(page.clicked(&locators::place_vehicle_button()), 1);
    assert!(page
        .accepted_dialogs()
        .contains(&"Session will expire in 5 minutes".to_string()));
    let refresh = ctx
        .dialogs
        .iter()
        .find(|verdict| verdict.kind == DialogKind::RefreshNotice)
        .unwrap();
    assert!(!refresh.recognized);
    assert_eq!(ctx.final_url.as_deref(), Some(FINAL_URL));
}

#[tokio::test]
async fn unexpected_final_dialog_text_is_only_a_warning() {
    let page = portal(PortalScript {
        final_dialog: false,
        ..PortalScript::default()
    })
    .on_click(
        locators::submit_details_button(),
        Reaction::new().dialog("Vehicle already placed"),
    );
    let order = request().validate().unwrap();
    let flow = build_placement_flow(
        &PortalAccess::new("606724", "secret"),
        &order,
        &Timings::uniform(20),
        None,
    );
    let executor = DefaultFlowExecutor::new(Arc::new(page.clone()), Timings::uniform(20));
    let mut ctx = RunContext::new();

    executor.execute(&flow, &mut ctx).await.unwrap();

    assert_eq!(ctx.warnings.len(), 1);
    assert_eq!(ctx.warnings[0].step, "confirm_allocation");
    assert_eq!(page.pending_dialogs(), 0);
}
