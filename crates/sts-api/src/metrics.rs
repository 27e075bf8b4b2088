//! Prometheus metrics for request traffic and study-group activity.

use std::{sync::LazyLock, time::Instant};

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use regex::Regex;

static NUMERIC_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/\d+").expect("numeric segment pattern is valid"));

/// Install the Prometheus recorder and return the handle `/metrics` renders from
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Middleware recording request count and latency per route shape
pub async fn track_metrics(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);

    histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path,
        "status" => status
    )
    .record(duration);

    response
}

/// Collapse numeric ids so every group or deck does not get its own series
fn normalize_path(path: &str) -> String {
    NUMERIC_SEGMENT.replace_all(path, "/:id").into_owned()
}

pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> impl IntoResponse {
    (StatusCode::OK, handle.render())
}

fn outcome(success: bool) -> &'static str {
    if success { "success" } else { "failure" }
}

pub fn record_auth_event(event_type: &'static str, success: bool) {
    counter!(
        "auth_events_total",
        "type" => event_type,
        "status" => outcome(success)
    )
    .increment(1);
}

/// `outcome` is one of `joined`, `requested`, `accepted` or `rejected`
pub fn record_join_event(outcome: &'static str) {
    counter!("join_events_total", "outcome" => outcome).increment(1);
}

pub fn record_contribution(kind: &'static str) {
    counter!("contributions_total", "kind" => kind).increment(1);
}

pub fn record_notifications_created(kind: &'static str, count: u64) {
    counter!("notifications_created_total", "kind" => kind).increment(count);
}

pub fn set_relay_connections(count: usize) {
    gauge!("relay_connections").set(count as f64);
}
