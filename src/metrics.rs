//! Metrics for observability.
//!
//! Exports Prometheus-compatible metrics for:
//! - Raw-history fetch volume and latency
//! - Apply volume and outcomes
//! - Run-chain traversal shape (runs per call, backward re-anchors)
//! - Errors by type
//!
//! All metrics are prefixed with `rereplication_` and follow Prometheus
//! conventions: counters end in `_total`, histograms track distributions.
//! Labels are kept low-cardinality (operation names and error kinds, never
//! workflow or run IDs).

use metrics::{counter, histogram};
use std::time::Duration;

/// Record one raw-history fetch. `operation` is `"page"` for the main fetch
/// loop or `"peek"` for single-batch run-link discovery.
pub fn record_fetch(operation: &'static str, batches: usize, duration: Duration) {
    counter!("rereplication_fetch_total", "operation" => operation).increment(1);
    counter!("rereplication_fetch_batches_total", "operation" => operation)
        .increment(batches as u64);
    histogram!("rereplication_fetch_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());
}

/// Record one apply attempt.
pub fn record_apply(success: bool, duration: Duration) {
    let status = if success { "success" } else { "failure" };
    counter!("rereplication_apply_total", "status" => status).increment(1);
    histogram!("rereplication_apply_duration_seconds").record(duration.as_secs_f64());
}

/// Record a fully sent run.
pub fn record_run_sent() {
    counter!("rereplication_runs_sent_total").increment(1);
}

/// Record a backward re-anchor after a break in the continue-as-new chain.
pub fn record_rechain() {
    counter!("rereplication_rechain_total").increment(1);
}

/// Record a completed multi-run call with the number of runs it visited.
pub fn record_span_sent(runs: usize) {
    counter!("rereplication_spans_sent_total").increment(1);
    histogram!("rereplication_span_runs").record(runs as f64);
}

/// Record errors by type.
pub fn record_error(error_kind: &'static str) {
    counter!("rereplication_errors_total", "error_kind" => error_kind).increment(1);
}
