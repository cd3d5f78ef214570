//! Element locators on the transporter report pages.

use action_primitives::{xpath_literal, Locator};

pub fn username_field() -> Locator {
    Locator::name("username")
}

pub fn password_field() -> Locator {
    Locator::name("password")
}

pub fn sidebar_toggle() -> Locator {
    Locator::class_name("sidebar-toggle")
}

pub fn vendor_collaboration_link() -> Locator {
    Locator::link_text("Vendor Collaboration")
}

pub fn available_orders_link() -> Locator {
    Locator::link_text("Available Orders Report")
}

pub fn search_box() -> Locator {
    Locator::id("jqgid_globalSearch")
}

pub fn order_checkbox(order_id: &str) -> Locator {
    Locator::xpath(format!(
        "//input[starts-with(@id, {})]",
        xpath_literal(&format!("OrderNo_{}_", order_id))
    ))
}

/// Data rows of the results grid
pub fn result_rows() -> Locator {
    Locator::xpath("//tr[contains(@class, 'jqgrow')]")
}

pub fn commit_button() -> Locator {
    Locator::id("commitBtnTOO")
}

pub fn total_orders_toggle() -> Locator {
    Locator::id("totalOrders")
}

pub fn committed_orders_toggle() -> Locator {
    Locator::id("commit_allocated")
}

pub fn split_order_radio(order_id: &str) -> Locator {
    Locator::xpath(format!(
        "//input[@name='SplitOrder' and starts-with(@value, {})]",
        xpath_literal(&format!("{}_", order_id))
    ))
}

pub fn place_vehicle_button() -> Locator {
    Locator::id("placeVehicleBtn")
}

pub fn vehicle_field() -> Locator {
    Locator::id("vehicle_noo")
}

pub fn vehicle_suggestion(vehicle_number: &str) -> Locator {
    Locator::xpath(format!(
        "//div[@id='vehicle_nooautocomplete-list']//div[strong[text()={}]]",
        xpath_literal(vehicle_number)
    ))
}

pub fn driver_field() -> Locator {
    Locator::id("driverLicId")
}

pub fn driver_suggestions() -> Locator {
    Locator::id("driverLicIdautocomplete-list")
}

/// Option rows inside the driver suggestion list
pub fn driver_options() -> Locator {
    Locator::xpath("//div[@id='driverLicIdautocomplete-list']//div[input[@type='hidden']]")
}

pub fn mobile_field() -> Locator {
    Locator::id("mobile_no")
}

pub fn remaining_capacity_field() -> Locator {
    Locator::id("remVehCC")
}

pub fn remaining_quantity_field() -> Locator {
    Locator::id("remQty")
}

pub fn quantity_field() -> Locator {
    Locator::id("qty")
}

pub fn eta_field() -> Locator {
    Locator::id("ETADateTime")
}

pub fn page_body() -> Locator {
    Locator::tag("body")
}

pub fn submit_details_button() -> Locator {
    Locator::id("sublitLRDetails")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_scoped_locators() {
        assert_eq!(
            order_checkbox("2200123456"),
            Locator::xpath("//input[starts-with(@id, 'OrderNo_2200123456_')]")
        );
        assert_eq!(
            split_order_radio("2200123456"),
            Locator::xpath(
                "//input[@name='SplitOrder' and starts-with(@value, '2200123456_')]"
            )
        );
        assert_eq!(
            vehicle_suggestion("MH12AB1234").value(),
            "//div[@id='vehicle_nooautocomplete-list']//div[strong[text()='MH12AB1234']]"
        );
    }
}
