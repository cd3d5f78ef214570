//! Shared data model for the vehicle placement automation.
//!
//! The HTTP layer, the CLI and the flow sequencer all speak in terms of these
//! types: the loosely typed [`PlacementRequest`] accepted on the wire, the
//! validated [`PlacementOrder`] driven through the portal, and the
//! [`RunOutcome`] / [`ProcessResponse`] pair reported back.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Validation errors raised before a run starts.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },
}

/// Identifier attached to one automation run (logs and artifact names).
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct RunId(pub String);

impl RunId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// First uuid segment, short enough for file names.
    pub fn short(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A request field as received: either a JSON string or a JSON number.
///
/// The original representation is kept so the response can echo it unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Value rendered as the text that would be typed into the page.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Text(text) => text.trim().to_string(),
            FieldValue::Number(number) => number.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, FieldValue::Text(text) if text.trim().is_empty())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(number) => number.as_f64(),
            FieldValue::Text(text) => {
                let trimmed = text.trim();
                let numeric = trimmed
                    .strip_suffix("MT")
                    .or_else(|| trimmed.strip_suffix("mt"))
                    .or_else(|| trimmed.strip_suffix("Mt"))
                    .unwrap_or(trimmed)
                    .trim();
                numeric.parse::<f64>().ok()
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Vehicle placement request as accepted over HTTP or from a JSON file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementRequest {
    pub driver_name: Option<FieldValue>,
    pub driver_license: Option<FieldValue>,
    pub vehicle_num: Option<FieldValue>,
    pub destination: Option<FieldValue>,
    pub weight: Option<FieldValue>,
    pub so_no: Option<FieldValue>,
    pub phone_num: Option<FieldValue>,
}

impl PlacementRequest {
    /// Validate presence and shape of the fields the portal workflow needs.
    ///
    /// `destination` is carried for the echo only and may be absent.
    pub fn validate(&self) -> Result<PlacementOrder, CoreError> {
        let order_id = required_text("so_no", &self.so_no)?;
        let vehicle_number = required_text("vehicle_num", &self.vehicle_num)?;
        let driver_name = required_text("driver_name", &self.driver_name)?;
        let license = required_text("driver_license", &self.driver_license)?;
        let phone_number = required_text("phone_num", &self.phone_num)?;

        let weight_field = self
            .weight
            .as_ref()
            .filter(|value| !value.is_blank())
            .ok_or(CoreError::MissingField { field: "weight" })?;
        let weight = weight_field
            .as_f64()
            .filter(|value| value.is_finite())
            .ok_or_else(|| CoreError::InvalidField {
                field: "weight",
                value: weight_field.as_text(),
                reason: "not a number".to_string(),
            })?;

        let license_chars: Vec<char> = license.chars().collect();
        if license_chars.len() < 4 {
            return Err(CoreError::InvalidField {
                field: "driver_license",
                value: license,
                reason: "expected at least 4 characters".to_string(),
            });
        }
        let license_last4: String = license_chars[license_chars.len() - 4..].iter().collect();

        Ok(PlacementOrder {
            order_id,
            vehicle_number,
            driver_name,
            license_last4,
            phone_number,
            weight,
            destination: self
                .destination
                .as_ref()
                .filter(|value| !value.is_blank())
                .map(FieldValue::as_text),
        })
    }
}

fn required_text(field: &'static str, value: &Option<FieldValue>) -> Result<String, CoreError> {
    match value {
        Some(value) if !value.is_blank() => Ok(value.as_text()),
        _ => Err(CoreError::MissingField { field }),
    }
}

/// Validated, typed view of a [`PlacementRequest`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlacementOrder {
    pub order_id: String,
    pub vehicle_number: String,
    pub driver_name: String,
    pub license_last4: String,
    pub phone_number: String,
    pub weight: f64,
    pub destination: Option<String>,
}

/// Remaining quantity and vehicle capacity scraped from the placement form.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CapacityReadout {
    pub remaining_qty: f64,
    pub remaining_capacity: f64,
}

impl CapacityReadout {
    pub fn limiting(&self) -> f64 {
        self.remaining_qty.min(self.remaining_capacity)
    }
}

/// Result of exactly one automation run.
#[derive(Clone, Debug, PartialEq)]
pub enum RunOutcome {
    Success {
        request: PlacementRequest,
        final_url: Option<String>,
    },
    Failure {
        message: String,
    },
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Success { .. })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Success,
    Error,
}

/// JSON envelope returned by `/process-data` and printed by `autoplant run`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub status: ResponseStatus,
    pub message: String,
    pub processed_data: Option<PlacementRequest>,
}

pub const SUCCESS_MESSAGE: &str = "Data processed successfully";

impl ProcessResponse {
    pub fn success(request: PlacementRequest) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: SUCCESS_MESSAGE.to_string(),
            processed_data: Some(request),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            message: message.into(),
            processed_data: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }
}

impl From<RunOutcome> for ProcessResponse {
    fn from(outcome: RunOutcome) -> Self {
        match outcome {
            RunOutcome::Success { request, .. } => ProcessResponse::success(request),
            RunOutcome::Failure { message } => ProcessResponse::error(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> PlacementRequest {
        serde_json::from_value(json!({
            "driver_name": "shahzad kha",
            "driver_license": "9471",
            "vehicle_num": "MH12AB1234",
            "destination": "Nagpur",
            "weight": 25,
            "so_no": 2200123456u64,
            "phone_num": "9876543210"
        }))
        .unwrap()
    }

    #[test]
    fn numbers_and_strings_echo_unchanged() {
        let request = sample();
        let echoed = serde_json::to_value(&request).unwrap();
        assert_eq!(echoed["weight"], json!(25));
        assert_eq!(echoed["so_no"], json!(2200123456u64));
        assert_eq!(echoed["phone_num"], json!("9876543210"));
    }

    #[test]
    fn validate_normalizes_fields() {
        let order = sample().validate().unwrap();
        assert_eq!(order.order_id, "2200123456");
        assert_eq!(order.weight, 25.0);
        assert_eq!(order.license_last4, "9471");
        assert_eq!(order.destination.as_deref(), Some("Nagpur"));
    }

    #[test]
    fn long_license_keeps_last_four() {
        let mut request = sample();
        request.driver_license = Some("MH-0420110012345".into());
        assert_eq!(request.validate().unwrap().license_last4, "2345");
    }

    #[test]
    fn missing_and_blank_fields_are_rejected() {
        let mut request = sample();
        request.so_no = None;
        assert_eq!(
            request.validate(),
            Err(CoreError::MissingField { field: "so_no" })
        );

        let mut request = sample();
        request.vehicle_num = Some("   ".into());
        assert_eq!(
            request.validate(),
            Err(CoreError::MissingField {
                field: "vehicle_num"
            })
        );
    }

    #[test]
    fn weight_accepts_text_with_unit() {
        let mut request = sample();
        request.weight = Some("26.5 MT".into());
        assert_eq!(request.validate().unwrap().weight, 26.5);

        request.weight = Some("heavy".into());
        assert!(matches!(
            request.validate(),
            Err(CoreError::InvalidField { field: "weight", .. })
        ));
    }

    #[test]
    fn destination_is_optional() {
        let mut request = sample();
        request.destination = None;
        assert!(request.validate().unwrap().destination.is_none());
    }

    #[test]
    fn error_envelope_serializes_null_data() {
        let response = ProcessResponse::error("boom");
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(value["processed_data"], serde_json::Value::Null);
    }

    #[test]
    fn run_id_short_form() {
        let id = RunId("1234abcd-0000-0000-0000-000000000000".to_string());
        assert_eq!(id.short(), "1234abcd");
    }
}
