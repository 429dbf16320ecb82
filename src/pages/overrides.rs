//! Maintenance overrides.
//!
//! Requests whose `X-Service-Name` equals the configured sentinel can be
//! answered with alternate content instead of the regular error page:
//!
//! - a route whose environment variable is non-empty supplies the body
//!   literally. This is checked for every route, whatever the URI, and the
//!   last such route in declaration order wins;
//! - otherwise a route whose match key is a substring of the original URI
//!   selects its fixed file.
//!
//! Literal content always takes precedence over a selected file.

use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};

use crate::config::{EnvLookup, MaintenanceConfig, OverrideRoute};
use crate::pages::classifier::IncomingSignal;

/// Content type sent on every overridden response.
pub const OVERRIDE_CONTENT_TYPE: &str = "application/vnd.api+json; charset=utf-8";

/// Status sent when an override supplies the body.
pub const OVERRIDE_STATUS: StatusCode = StatusCode::OK;

/// Body chosen by an override.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverrideBody {
    /// Literal content from a route's environment variable.
    Content(String),
    /// File name relative to the error files root.
    File(String),
}

/// Result of running the resolver on a sentinel request.
#[derive(Debug, Clone)]
pub struct Override {
    /// Headers applied whether or not a route matched.
    pub headers: HeaderMap,
    /// Replacement body, `None` when no route triggered.
    pub body: Option<OverrideBody>,
}

/// Decides whether a request is answered by a maintenance route.
pub struct OverrideResolver {
    service_name: String,
    routes: Vec<OverrideRoute>,
    fixed_headers: HeaderMap,
    env: Arc<dyn EnvLookup>,
}

impl OverrideResolver {
    pub fn new(config: &MaintenanceConfig, env: Arc<dyn EnvLookup>) -> Self {
        let mut fixed_headers = HeaderMap::new();
        fixed_headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(OVERRIDE_CONTENT_TYPE),
        );
        fixed_headers.insert(
            header::ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );

        Self {
            service_name: config.service_name.clone(),
            routes: config.routes.clone(),
            fixed_headers,
            env,
        }
    }

    /// Whether this request is subject to overrides at all.
    pub fn applies_to(&self, signal: &IncomingSignal) -> bool {
        signal.service_name == self.service_name
    }

    /// Resolve the override for a request.
    ///
    /// Returns `None` unless the service name matches the sentinel. `origin`
    /// is mirrored into `Access-Control-Allow-Origin` (empty when absent).
    pub fn resolve(&self, signal: &IncomingSignal, origin: Option<&HeaderValue>) -> Option<Override> {
        if !self.applies_to(signal) {
            return None;
        }

        tracing::info!(service = %signal.service_name, "Detected maintenance request, mocking response");

        let mut headers = self.fixed_headers.clone();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_ORIGIN,
            origin.cloned().unwrap_or_else(|| HeaderValue::from_static("")),
        );

        let mut content = None;
        let mut file = None;
        for route in &self.routes {
            if let Some(value) = self.env.non_empty(&route.env) {
                tracing::debug!(env = %route.env, "Maintenance content set");
                content = Some(value);
            } else if signal.original_uri.contains(route.match_key.as_str()) {
                tracing::debug!(route = %route.match_key, file = %route.file, "Maintenance route matched");
                file = Some(route.file.clone());
            }
        }

        let body = content.map(OverrideBody::Content).or(file.map(OverrideBody::File));
        Some(Override { headers, body })
    }
}
