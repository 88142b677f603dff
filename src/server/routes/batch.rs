//! Batch endpoint

use crate::core::codec::SIGNATURE_HEADER;
use crate::server::state::AppState;
use crate::utils::error::MetricsError;
use actix_web::http::header::{CONTENT_ENCODING, ContentType};
use actix_web::web::BytesMut;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use futures::StreamExt;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// `POST /updates/`: decode, verify and persist a whole batch
pub async fn update_batch(
    req: HttpRequest,
    payload: web::Payload,
    state: web::Data<AppState>,
) -> ActixResult<HttpResponse> {
    let body = read_capped(payload, state.max_body_size).await?;

    // bodies already inflated upstream skip the gzip step
    let compressed = declares_gzip(&req) && body.starts_with(&GZIP_MAGIC);
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    let outcome = match state.ingest(&body, compressed, signature).await {
        Ok(outcome) => outcome,
        Err(e) => {
            state.logger.warn(&format!("Rejected batch: {}", e));
            return Err(e.into());
        }
    };
    state
        .logger
        .debug(&format!("Stored batch of {} metrics", outcome.stored));

    let mut response = HttpResponse::Ok();
    response.content_type(ContentType::json());
    if let Some(signature) = outcome.signature {
        response.insert_header((SIGNATURE_HEADER, signature));
    }
    Ok(response.body(outcome.body))
}

/// Read the raw body, failing as soon as it grows past `limit`
pub(crate) async fn read_capped(
    mut payload: web::Payload,
    limit: usize,
) -> Result<BytesMut, MetricsError> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| MetricsError::bad_request(format!("Invalid body: {}", e)))?;
        if body.len() + chunk.len() > limit {
            return Err(MetricsError::PayloadTooLarge { limit });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn declares_gzip(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_ENCODING)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("gzip"))
}
