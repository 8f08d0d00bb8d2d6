use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::Context;
use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
    routing::get,
};
use edudesk_config::ServerConfig;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};

static METRICS_ENABLED: OnceLock<bool> = OnceLock::new();

/// Fixes the metrics switch for the process. Later calls are ignored.
pub fn set_metrics_enabled(enabled: bool) {
    let _ = METRICS_ENABLED.set(enabled);
}

/// Falls back to `METRICS_ENABLED` when [`set_metrics_enabled`] was never called.
pub fn is_metrics_enabled() -> bool {
    *METRICS_ENABLED.get_or_init(|| ServerConfig::from_env().metrics_enabled)
}

/// Installs the Prometheus recorder and its upkeep task.
/// Returns `None` when metrics are disabled.
pub fn init_metrics() -> anyhow::Result<Option<PrometheusHandle>> {
    if !is_metrics_enabled() {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full("http_request_duration_seconds".to_string()),
            &[
                0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
            ],
        )
        .context("Failed to configure histogram buckets")?
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let upkeep_handle = handle.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            upkeep_handle.run_upkeep();
        }
    });

    Ok(Some(handle))
}

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    if !is_metrics_enabled() {
        return next.run(req).await;
    }

    let start = Instant::now();
    let method = req.method().as_str().to_owned();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    gauge!("http_requests_active").increment(1.0);

    let response = next.run(req).await;

    let latency = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    counter!("http_requests_total", "method" => method.clone(), "path" => path.clone(), "status" => status)
        .increment(1);
    histogram!("http_request_duration_seconds", "method" => method, "path" => path).record(latency);

    gauge!("http_requests_active").decrement(1.0);

    response
}

/// `GET /metrics` rendering the Prometheus text exposition.
pub fn metrics_router<S>(handle: PrometheusHandle) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/metrics", get(move || async move { handle.render() }))
}

pub fn track_login_success(role: &str) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => role.to_string(), "status" => "success").increment(1);
}

pub fn track_login_failure(reason: &'static str) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("user_logins_total", "role" => "unknown", "status" => "failure", "reason" => reason)
        .increment(1);
}

pub fn track_user_created(role: &str) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("users_created_total", "role" => role.to_string()).increment(1);
}

/// Payments are counted and their minor-unit amounts summed.
pub fn track_payment_recorded(amount: i64) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("fee_payments_total").increment(1);
    counter!("fee_payments_amount_total").increment(amount.max(0) as u64);
}

pub fn track_attendance_marked(count: usize) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("attendance_records_marked_total").increment(count as u64);
}

pub fn track_admission_decision(decision: &'static str) {
    if !is_metrics_enabled() {
        return;
    }
    counter!("admission_decisions_total", "decision" => decision).increment(1);
}
