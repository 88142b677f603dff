//! Single-metric endpoints and the HTML overview

use crate::core::metric::{Metric, MetricKind, MetricQuery};
use crate::server::state::AppState;
use crate::storage::MetricStorage;
use crate::utils::error::MetricsError;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, Result as ActixResult, web};
use std::fmt::Write as _;
use std::str::FromStr;
use tracing::debug;

/// HTML table of the full snapshot
pub async fn index(state: web::Data<AppState>) -> ActixResult<HttpResponse> {
    let snapshot = state.store.lock().await.list().await?;

    let mut html = String::from(
        "<!DOCTYPE html>\n<html><head><title>Metrics</title></head><body>\n\
         <table>\n<tr><th>Name</th><th>Type</th><th>Value</th></tr>\n",
    );
    for metric in snapshot.values() {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape_html(&metric.id),
            metric.kind(),
            metric.value
        );
    }
    html.push_str("</table>\n</body></html>\n");

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(html))
}

/// `GET /value/{type}/{name}`: plain-text value
pub async fn value_path(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (kind, name) = path.into_inner();
    let kind = MetricKind::from_str(&kind)?;
    let metric = lookup(&state, &name, kind).await?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(metric.value.to_string()))
}

/// `POST /value/`: persisted metric as JSON
pub async fn value_json(
    state: web::Data<AppState>,
    query: web::Json<MetricQuery>,
) -> ActixResult<HttpResponse> {
    let query = query.into_inner();
    let metric = lookup(&state, &query.id, query.kind).await?;
    Ok(HttpResponse::Ok().json(metric))
}

/// `POST /update/`: save one metric and answer with its stored state
pub async fn update_json(
    state: web::Data<AppState>,
    metric: web::Json<Metric>,
) -> ActixResult<HttpResponse> {
    let metric = metric.into_inner();
    let id = metric.id.clone();

    let mut store = state.store.lock().await;
    store.save(metric).await?;
    let stored = store.get(&id).await?;
    drop(store);

    debug!("Updated metric {} via JSON", id);
    Ok(HttpResponse::Ok().json(stored))
}

/// `POST /update/{type}/{name}/{value}`
pub async fn update_path(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> ActixResult<HttpResponse> {
    let (kind, name, raw) = path.into_inner();
    let metric = Metric::parse(&kind, &name, &raw)?;

    state.store.lock().await.save(metric).await?;

    debug!("Updated metric {} via path", name);
    Ok(HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body("OK"))
}

/// `POST /update/{type}/` without a name
pub async fn missing_name() -> ActixResult<HttpResponse> {
    Err(MetricsError::not_found("metric name is missing").into())
}

/// Fetch `id` and require it to be of `kind`
async fn lookup(state: &AppState, id: &str, kind: MetricKind) -> Result<Metric, MetricsError> {
    let metric = state.store.lock().await.get(id).await?;
    if metric.kind() != kind {
        return Err(MetricsError::not_found(format!(
            "metric {} is a {}, not a {}",
            id,
            metric.kind(),
            kind
        )));
    }
    Ok(metric)
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
