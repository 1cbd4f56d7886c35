//! Prometheus metrics for record changes and store latency.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Members created counter metric name.
pub const METRIC_MEMBERS_CREATED: &str = "members_created_total";
/// Member status updates counter metric name.
pub const METRIC_MEMBER_STATUS_UPDATES: &str = "member_status_updates_total";
/// Committee upserts counter metric name.
pub const METRIC_COMMITTEES_UPSERTED: &str = "committees_upserted_total";
/// Funding requests created counter metric name.
pub const METRIC_REQUESTS_CREATED: &str = "funding_requests_created_total";
/// Funding requests processed counter metric name.
pub const METRIC_REQUESTS_PROCESSED: &str = "funding_requests_processed_total";
/// Declined funding requests purged counter metric name.
pub const METRIC_REQUESTS_PURGED: &str = "funding_requests_purged_total";
/// Store operation latency metric name.
pub const METRIC_STORE_LATENCY: &str = "store_operation_latency_ms";

/// Install the Prometheus recorder and register metric descriptions.
/// Call this once at startup.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(METRIC_MEMBERS_CREATED, "Total number of members created");
    describe_counter!(
        METRIC_MEMBER_STATUS_UPDATES,
        "Total number of member dues status changes"
    );
    describe_counter!(
        METRIC_COMMITTEES_UPSERTED,
        "Total number of committee budgets added or replaced"
    );
    describe_counter!(
        METRIC_REQUESTS_CREATED,
        "Total number of funding requests submitted"
    );
    describe_counter!(
        METRIC_REQUESTS_PROCESSED,
        "Total number of funding request status changes"
    );
    describe_counter!(
        METRIC_REQUESTS_PURGED,
        "Total number of declined funding requests deleted after listing"
    );
    describe_histogram!(
        METRIC_STORE_LATENCY,
        "Document store operation latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Record document store operation latency.
pub fn record_store_latency(operation: &'static str, start: Instant) {
    histogram!(METRIC_STORE_LATENCY, "operation" => operation).record(elapsed_ms(start));
}

/// Increment members created counter.
pub fn inc_members_created() {
    counter!(METRIC_MEMBERS_CREATED).increment(1);
}

/// Increment member status updates counter.
pub fn inc_member_status_updates() {
    counter!(METRIC_MEMBER_STATUS_UPDATES).increment(1);
}

/// Increment committee upserts counter.
pub fn inc_committees_upserted() {
    counter!(METRIC_COMMITTEES_UPSERTED).increment(1);
}

/// Increment funding requests created counter.
pub fn inc_requests_created() {
    counter!(METRIC_REQUESTS_CREATED).increment(1);
}

/// Increment funding requests processed counter.
pub fn inc_requests_processed() {
    counter!(METRIC_REQUESTS_PROCESSED).increment(1);
}

/// Add to the purged declined requests counter.
pub fn add_requests_purged(count: u64) {
    counter!(METRIC_REQUESTS_PURGED).increment(count);
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
