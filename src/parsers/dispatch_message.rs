//! Placement fields from a dispatch chat message.
//!
//! A dispatcher posts the vehicle, order, phone and load in free text; the
//! transporter replies with `ap kara` and the driver on the next line.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use autoplant_core_types::{FieldValue, PlacementRequest};

use crate::parsers::helpers::{
    content_lines, first_capture, first_match, non_blank, normalize_whitespace,
};

const SO_PREFIX: &str = "2200";
pub const REPLY_COMMAND: &str = "ap kara";

static VEHICLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Za-z]{2}\d{1,2}[A-Za-z]{1,2}\d{3,4}\b").unwrap());
static SO_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b2200\d{6}\b").unwrap());
static TEN_DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{10}\b").unwrap());
static WEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(\d+(?:\.\d+)?)\s*MT\b").unwrap());
static DESTINATION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(.*?)\s+\d+(?:\.\d+)?\s*MT\b").unwrap());
static LICENSE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\d{4}\b").unwrap());

/// Order fields found in a message; all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchFields {
    pub vehicle_num: Option<String>,
    pub destination: Option<String>,
    pub weight: Option<String>,
    pub so_no: Option<String>,
    pub phone_num: Option<String>,
}

impl DispatchFields {
    pub fn is_empty(&self) -> bool {
        self.vehicle_num.is_none()
            && self.destination.is_none()
            && self.weight.is_none()
            && self.so_no.is_none()
            && self.phone_num.is_none()
    }

    /// Keep own values, fill gaps from `fallback`.
    pub fn or(self, fallback: DispatchFields) -> DispatchFields {
        DispatchFields {
            vehicle_num: self.vehicle_num.or(fallback.vehicle_num),
            destination: self.destination.or(fallback.destination),
            weight: self.weight.or(fallback.weight),
            so_no: self.so_no.or(fallback.so_no),
            phone_num: self.phone_num.or(fallback.phone_num),
        }
    }

    /// Replace own values with whatever `newer` found.
    pub fn overlay(&mut self, newer: &DispatchFields) {
        let fields = [
            (&mut self.vehicle_num, &newer.vehicle_num),
            (&mut self.destination, &newer.destination),
            (&mut self.weight, &newer.weight),
            (&mut self.so_no, &newer.so_no),
            (&mut self.phone_num, &newer.phone_num),
        ];
        for (current, update) in fields {
            if update.is_some() {
                *current = update.clone();
            }
        }
    }
}

/// Driver line of an `ap kara` reply.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DriverReply {
    pub driver_name: Option<String>,
    pub driver_license: Option<String>,
    /// Fields restated after the license digits or on later lines
    pub overrides: DispatchFields,
}

impl DriverReply {
    pub fn has_driver(&self) -> bool {
        self.driver_name.is_some() || self.driver_license.is_some()
    }
}

/// First ten-digit number that is not an SO number.
fn phone_number(text: &str) -> Option<String> {
    TEN_DIGITS_RE
        .find_iter(text)
        .map(|m| m.as_str())
        .find(|digits| !digits.starts_with(SO_PREFIX))
        .map(str::to_string)
}

/// Text before the load on a weight line, minus a leading vehicle number.
fn destination_on_line(line: &str) -> Option<String> {
    let before = first_capture(&DESTINATION_RE, line, 1)?;
    let mut destination = before.trim().to_string();
    if let Some(vehicle) = first_match(&VEHICLE_RE, &destination) {
        destination = destination.replacen(&vehicle, "", 1);
    }
    non_blank(&normalize_whitespace(&destination))
}

/// Pattern-based extraction over the whole message.
pub fn extract_fields(text: &str) -> DispatchFields {
    let destination = text
        .lines()
        .filter(|line| WEIGHT_RE.is_match(line))
        .find_map(destination_on_line);

    DispatchFields {
        vehicle_num: first_match(&VEHICLE_RE, text),
        destination,
        weight: first_capture(&WEIGHT_RE, text, 1),
        so_no: first_match(&SO_RE, text),
        phone_num: phone_number(text),
    }
}

/// Line-by-line extraction; the first line carrying a field wins.
pub fn extract_by_lines(text: &str) -> DispatchFields {
    let mut fields = DispatchFields::default();
    for line in content_lines(text) {
        if fields.vehicle_num.is_none() {
            fields.vehicle_num = first_match(&VEHICLE_RE, line);
        }
        if fields.phone_num.is_none() {
            fields.phone_num = phone_number(line);
        }
        if fields.so_no.is_none() {
            fields.so_no = first_match(&SO_RE, line);
        }
        if fields.weight.is_none() {
            if let Some(weight) = first_capture(&WEIGHT_RE, line, 1) {
                fields.weight = Some(weight);
                fields.destination = destination_on_line(line);
            }
        }
    }
    fields
}

/// Pattern-based extraction with the line-based pass filling the gaps.
pub fn extract_message(text: &str) -> DispatchFields {
    extract_fields(text).or(extract_by_lines(text))
}

pub fn is_reply_command(text: &str) -> bool {
    text.trim().to_lowercase().starts_with(REPLY_COMMAND)
}

/// Parse the driver line (second line) of an `ap kara` reply.
///
/// `<name>[-] <4 digits> [more fields]`: the name is everything before the
/// digits, the license is the digits.
pub fn parse_reply_command(text: &str) -> DriverReply {
    let lines = content_lines(text);
    let Some(driver_line) = lines.get(1) else {
        return DriverReply::default();
    };
    let Some(license) = LICENSE_RE.find(driver_line) else {
        return DriverReply::default();
    };

    let name = driver_line[..license.start()].trim();
    let name = name.strip_suffix('-').unwrap_or(name);

    let mut additional = driver_line[license.end()..].trim().to_string();
    for line in lines.iter().skip(2) {
        additional.push('\n');
        additional.push_str(line);
    }
    let overrides = if additional.trim().is_empty() {
        DispatchFields::default()
    } else {
        extract_fields(&additional)
    };

    DriverReply {
        driver_name: non_blank(name),
        driver_license: Some(license.as_str().to_string()),
        overrides,
    }
}

/// Build a placement request from a dispatch message and an optional reply.
pub fn build_request(message: &str, reply: Option<&str>) -> PlacementRequest {
    let mut fields = extract_message(message);
    let mut request = PlacementRequest::default();

    if let Some(reply) = reply {
        let driver = parse_reply_command(reply);
        if driver.has_driver() {
            fields.overlay(&driver.overrides);
            request.driver_name = driver.driver_name.map(FieldValue::Text);
            request.driver_license = driver.driver_license.map(FieldValue::Text);
        }
    }

    request.vehicle_num = fields.vehicle_num.map(FieldValue::Text);
    request.destination = fields.destination.map(FieldValue::Text);
    request.weight = fields.weight.map(FieldValue::Text);
    request.so_no = fields.so_no.map(FieldValue::Text);
    request.phone_num = fields.phone_num.map(FieldValue::Text);
    request
}
