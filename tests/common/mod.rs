//! Scripted transporter portal shared by the integration tests.
#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use action_flow::{locators, PortalAccess};
use action_primitives::scripted::{
    Reaction, ScriptedElement, ScriptedPage, ScriptedSessionFactory,
};
use action_primitives::Timings;
use autoplant_cli::config::ArtifactsConfig;
use autoplant_cli::PlacementRunner;
use serde_json::{json, Value};

pub const SO_NO: &str = "2200123456";
pub const VEHICLE: &str = "MH12AB1234";
pub const FINAL_URL: &str =
    "https://dfpcl.autoplant.in/AutoplantVC/transporter_report.do?method=placed";

pub fn request_json() -> Value {
    json!({
        "driver_name": "shahzad kha",
        "driver_license": "MH0420110019471",
        "vehicle_num": VEHICLE,
        "destination": "Nagpur Depot",
        "weight": 25,
        "so_no": SO_NO,
        "phone_num": "9876543210"
    })
}

#[derive(Clone, Copy)]
pub struct PortalScript {
    /// The order shows up in the available-orders search
    pub order_listed: bool,
    /// The final allocation confirmation appears after submit
    pub final_dialog: bool,
    /// Place-vehicle first answers with the refresh notice
    pub refresh_notice: bool,
    /// Committing raises the success message after the confirmation
    pub commit_success_dialog: bool,
}

impl Default for PortalScript {
    fn default() -> Self {
        Self {
            order_listed: true,
            final_dialog: true,
            refresh_notice: false,
            commit_success_dialog: true,
        }
    }
}

pub fn portal(script: PortalScript) -> ScriptedPage {
    let mut page = ScriptedPage::new()
        .with_element(locators::username_field(), ScriptedElement::new())
        .with_element(locators::password_field(), ScriptedElement::new())
        .with_element(locators::sidebar_toggle(), ScriptedElement::new())
        .with_element(locators::vendor_collaboration_link(), ScriptedElement::new())
        .with_element(locators::available_orders_link(), ScriptedElement::new())
        .with_element(locators::search_box(), ScriptedElement::new())
        .with_element(locators::total_orders_toggle(), ScriptedElement::new())
        .with_element(locators::committed_orders_toggle(), ScriptedElement::new())
        .with_element(
            locators::split_order_radio(SO_NO),
            ScriptedElement::new().with_value(format!("{}_1_1", SO_NO)),
        )
        .with_element(locators::place_vehicle_button(), ScriptedElement::new())
        .with_element(locators::vehicle_field(), ScriptedElement::new())
        .on_input(
            locators::vehicle_field(),
            VEHICLE,
            Reaction::new().reveal(locators::vehicle_suggestion(VEHICLE), ScriptedElement::new()),
        )
        .with_element(locators::driver_field(), ScriptedElement::new())
        .on_input(
            locators::driver_field(),
            "SHA",
            Reaction::new()
                .reveal(locators::driver_suggestions(), ScriptedElement::new())
                .reveal(
                    locators::driver_options(),
                    ScriptedElement::new().with_text("SHAHZAD ALI-XY1234-9471"),
                )
                .reveal(
                    locators::driver_options(),
                    ScriptedElement::new().with_text("SHAHZAD RAO-AB0000-0000"),
                ),
        )
        .with_element(locators::mobile_field(), ScriptedElement::new())
        .with_element(
            locators::remaining_capacity_field(),
            ScriptedElement::new().with_text("24.5"),
        )
        .with_element(
            locators::remaining_quantity_field(),
            ScriptedElement::new().with_text("30"),
        )
        .with_element(locators::quantity_field(), ScriptedElement::new())
        .with_element(locators::eta_field(), ScriptedElement::new())
        .with_element(locators::page_body(), ScriptedElement::new())
        .with_element(locators::submit_details_button(), ScriptedElement::new());

    if script.order_listed {
        let mut commit = Reaction::new()
            .dialog(format!("Do you want to commit these order(s)? {}_1_1", SO_NO));
        if script.commit_success_dialog {
            commit = commit.dialog(format!(
                "MESSAGE: ORDER COMMIT SUCCESS ORDER NO: {}_1_1",
                SO_NO
            ));
        }
        page = page
            .with_element(locators::order_checkbox(SO_NO), ScriptedElement::new())
            .with_element(locators::commit_button(), ScriptedElement::new())
            .on_click(locators::commit_button(), commit);
    }

    if script.refresh_notice {
        page = page.on_click(
            locators::place_vehicle_button(),
            Reaction::new().dialog("Kindly refresh page once and try again"),
        );
    }

    if script.final_dialog {
        page = page.on_click(
            locators::submit_details_button(),
            Reaction::new()
                .dialog("Confirm to Allocate Vehicle For This Order")
                .navigate(FINAL_URL),
        );
    }

    page
}

pub fn runner(
    page: ScriptedPage,
    artifacts: &Path,
) -> (PlacementRunner, Arc<ScriptedSessionFactory>) {
    let sessions = Arc::new(ScriptedSessionFactory::new(page));
    let runner = PlacementRunner::new(
        sessions.clone(),
        PortalAccess::new("606724", "secret"),
        Timings::uniform(20),
        ArtifactsConfig {
            dir: artifacts.to_path_buf(),
            checkpoint: true,
        },
    );
    (runner, sessions)
}
