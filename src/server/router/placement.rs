use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use autoplant_core_types::{PlacementRequest, ProcessResponse};

use crate::errors::ServiceError;
use crate::server::ServeState;

pub(crate) fn router() -> Router<ServeState> {
    Router::new().route("/process-data", post(process_data_handler))
}

#[instrument(name = "autoplant.process_data", skip(state, payload))]
async fn process_data_handler(
    State(state): State<ServeState>,
    payload: Result<Json<PlacementRequest>, JsonRejection>,
) -> Response {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!(error = %rejection.body_text(), "rejecting malformed placement body");
            return ServiceError::from(rejection).into_response();
        }
    };

    info!(
        so_no = ?request.so_no,
        vehicle = ?request.vehicle_num,
        "received placement request"
    );
    let response = ProcessResponse::from(state.runner().process(request).await);
    let status = if response.is_success() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(response)).into_response()
}
