//! Metrics collection and exposition.
//!
//! # Metrics
//! - `requests_total` (counter): requests that produced a body, by `proto`
//! - `request_duration_seconds` (histogram): handling time, by `proto`
//!
//! A sample is taken once the response body has been fully streamed.
//! Requests that end in the plain "not found" response, or whose body fails
//! mid-stream, are not recorded.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::http::Version;
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

pub const REQUESTS_TOTAL: &str = "requests_total";
pub const REQUEST_DURATION_SECONDS: &str = "request_duration_seconds";

const DURATION_BUCKETS: &[f64] = &[
    0.001, 0.003, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// One observation for a finished request.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    /// Protocol version as `major.minor`.
    pub proto: String,
    pub duration: Duration,
}

impl MetricSample {
    pub fn new(version: Version, duration: Duration) -> Self {
        Self {
            proto: format_protocol(version).to_string(),
            duration,
        }
    }
}

/// Sink for per-request samples.
pub trait RequestRecorder: Send + Sync {
    fn record(&self, sample: &MetricSample);
}

/// Measures one request from creation until [`RequestTimer::finish`].
///
/// Dropping the timer without finishing records nothing.
pub struct RequestTimer {
    recorder: Arc<dyn RequestRecorder>,
    version: Version,
    start: Instant,
}

impl RequestTimer {
    pub fn start(recorder: Arc<dyn RequestRecorder>, version: Version) -> Self {
        Self {
            recorder,
            version,
            start: Instant::now(),
        }
    }

    pub fn finish(self) {
        self.recorder
            .record(&MetricSample::new(self.version, self.start.elapsed()));
    }
}

/// Records through the global `metrics` recorder.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsRecorder;

impl RequestRecorder for MetricsRecorder {
    fn record(&self, sample: &MetricSample) {
        metrics::counter!(REQUESTS_TOTAL, "proto" => sample.proto.clone()).increment(1);
        metrics::histogram!(REQUEST_DURATION_SECONDS, "proto" => sample.proto.clone())
            .record(sample.duration.as_secs_f64());
    }
}

/// Discards every sample.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRecorder;

impl RequestRecorder for NoopRecorder {
    fn record(&self, _sample: &MetricSample) {}
}

/// `major.minor` form of an HTTP version.
pub fn format_protocol(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_11 => "1.1",
        Version::HTTP_2 => "2.0",
        Version::HTTP_3 => "3.0",
        _ => "1.1",
    }
}

fn builder() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(Matcher::Full(REQUEST_DURATION_SECONDS.to_string()), DURATION_BUCKETS)
}

fn describe() {
    metrics::describe_counter!(REQUESTS_TOTAL, "Counter of HTTP requests made.");
    metrics::describe_histogram!(
        REQUEST_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Histogram of the time (in seconds) each request took."
    );
}

/// Install the Prometheus recorder globally and return the handle used to
/// render `/metrics`.
pub fn install_exporter() -> Result<PrometheusHandle, BuildError> {
    let handle = builder()?.install_recorder()?;
    describe();
    tracing::info!("Prometheus recorder installed");
    Ok(handle)
}
