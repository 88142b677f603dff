//! Storage health probe

use crate::server::state::AppState;
use crate::storage::MetricStorage;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, web};

/// `GET /ping` and `GET /health`
pub async fn ping(state: web::Data<AppState>) -> HttpResponse {
    match state.store.lock().await.check_storage().await {
        Ok(()) => HttpResponse::Ok()
            .content_type(ContentType::plaintext())
            .body("Status OK"),
        Err(e) => {
            state.logger.error(&format!("Storage health check failed: {}", e));
            HttpResponse::InternalServerError()
                .content_type(ContentType::plaintext())
                .body(format!("Storage unavailable: {}", e))
        }
    }
}
