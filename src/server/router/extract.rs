use axum::{
    extract::rejection::JsonRejection,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use autoplant_core_types::PlacementRequest;

use crate::errors::ServiceError;
use crate::parsers::build_request;
use crate::server::ServeState;

pub(crate) fn router() -> Router<ServeState> {
    Router::new().route("/extract", post(extract_handler))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExtractRequest {
    /// The dispatch message being replied to
    message: String,
    /// The `ap kara` reply carrying the driver
    #[serde(default)]
    reply: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExtractResponse {
    processed_data: PlacementRequest,
    /// Whether the request would pass validation for a run
    complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    missing: Option<String>,
}

async fn extract_handler(payload: Result<Json<ExtractRequest>, JsonRejection>) -> Response {
    let Json(payload) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return ServiceError::from(rejection).into_response(),
    };

    let request = build_request(&payload.message, payload.reply.as_deref());
    if request == PlacementRequest::default() {
        return ServiceError::Unprocessable("no placement fields found in message".into())
            .into_response();
    }

    let validation = request.validate();
    debug!(complete = validation.is_ok(), "extracted placement fields");
    Json(ExtractResponse {
        complete: validation.is_ok(),
        missing: validation.err().map(|err| err.to_string()),
        processed_data: request,
    })
    .into_response()
}
