//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (request counter + duration histogram)
//!
//! Consumers:
//!     → stdout (text or JSON)
//!     → /metrics (Prometheus scrape)
//! ```

pub mod logging;
pub mod metrics;

pub use self::metrics::{MetricSample, MetricsRecorder, NoopRecorder, RequestRecorder, RequestTimer};
