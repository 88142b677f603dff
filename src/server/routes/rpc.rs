//! RPC mirror of the batch endpoint
//!
//! The decoded body is held to the same cap as the batch endpoint.
//! Outcomes are reported in the response envelope; the HTTP status is 200
//! unless the envelope itself cannot be parsed.

use crate::core::rpc::{BatchRequest, MetricResponse};
use crate::server::state::AppState;
use crate::utils::error::MetricsError;
use actix_web::{HttpResponse, Result as ActixResult, web};

/// `POST /rpc/metrics.MetricsService/BatchUpdate`
pub async fn batch_update(
    state: web::Data<AppState>,
    request: web::Json<BatchRequest>,
) -> ActixResult<HttpResponse> {
    let request = request.into_inner();

    let result = match request.body() {
        Ok(body) if body.len() > state.max_body_size => Err(MetricsError::PayloadTooLarge {
            limit: state.max_body_size,
        }),
        Ok(body) => state.ingest(&body, true, request.signature()).await,
        Err(e) => Err(e),
    };

    let reply = match result {
        Ok(outcome) => {
            state
                .logger
                .debug(&format!("Stored RPC batch of {} metrics", outcome.stored));
            MetricResponse::ok(format!("stored {} metrics", outcome.stored))
        }
        Err(e) => {
            state.logger.warn(&format!("Rejected RPC batch: {}", e));
            MetricResponse::failed(e.to_string())
        }
    };

    Ok(HttpResponse::Ok().json(reply))
}
