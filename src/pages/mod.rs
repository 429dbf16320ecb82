//! Error page selection.
//!
//! # Data Flow
//! ```text
//! request headers
//!     → classifier.rs (format → extension, X-Code → status)
//!     → overrides.rs  (maintenance routes, sentinel service only)
//!     → emit.rs       (exact file → class file → not found)
//!     → metrics sample (once a served body has fully streamed)
//! ```

pub mod classifier;
pub mod emit;
pub mod headers;
pub mod media;
pub mod overrides;

use std::path::PathBuf;
use std::sync::Arc;

use axum::http::{header, HeaderMap, HeaderValue, Version};
use axum::response::Response;

use crate::config::{EnvLookup, ServerConfig};
use crate::observability::{RequestRecorder, RequestTimer};

pub use classifier::{classify, IncomingSignal};
pub use emit::{emit, BodySource, Emission, ResolvedResponse};
pub use overrides::{Override, OverrideBody, OverrideResolver, OVERRIDE_STATUS};

/// Environment variable that turns on debug header echo.
pub const DEBUG_VAR: &str = "DEBUG";

/// The error page responder.
pub struct ErrorPages {
    root: PathBuf,
    debug: bool,
    resolver: OverrideResolver,
    env: Arc<dyn EnvLookup>,
    recorder: Arc<dyn RequestRecorder>,
}

impl ErrorPages {
    pub fn new(
        config: &ServerConfig,
        env: Arc<dyn EnvLookup>,
        recorder: Arc<dyn RequestRecorder>,
    ) -> Self {
        Self {
            root: config.pages.error_files_path.clone(),
            debug: config.pages.debug,
            resolver: OverrideResolver::new(&config.maintenance, env.clone()),
            env,
            recorder,
        }
    }

    /// Decide what to send for a classified request.
    pub fn resolve(&self, signal: &IncomingSignal, origin: Option<&HeaderValue>) -> ResolvedResponse {
        let default = ResolvedResponse {
            source: BodySource::File(self.root.join(signal.status_file())),
            status: signal.status,
            headers: HeaderMap::new(),
        };

        let Some(Override { headers, body }) = self.resolver.resolve(signal, origin) else {
            return default;
        };

        match body {
            Some(OverrideBody::Content(content)) => ResolvedResponse {
                source: BodySource::Literal(content),
                status: OVERRIDE_STATUS,
                headers,
            },
            Some(OverrideBody::File(file)) => ResolvedResponse {
                source: BodySource::File(self.root.join(file)),
                status: OVERRIDE_STATUS,
                headers,
            },
            None => ResolvedResponse { headers, ..default },
        }
    }

    /// Handle one request end to end.
    pub async fn respond(&self, version: Version, request_headers: &HeaderMap) -> Response {
        let timer = RequestTimer::start(self.recorder.clone(), version);
        let mut headers = HeaderMap::new();

        if self.debug_enabled() {
            echo_debug_headers(request_headers, &mut headers);
        }

        let signal = classify(request_headers);
        let content_type = HeaderValue::from_str(&signal.format)
            .unwrap_or_else(|_| HeaderValue::from_static(classifier::DEFAULT_FORMAT));
        headers.insert(header::CONTENT_TYPE, content_type);

        let resolved = self.resolve(&signal, request_headers.get(header::ORIGIN));

        let emission = emit(&self.root, &signal, resolved, headers, timer).await;
        if !emission.is_served() {
            tracing::debug!(code = signal.status.as_u16(), "No error page available");
        }
        emission.into_response()
    }

    fn debug_enabled(&self) -> bool {
        self.debug || self.env.non_empty(DEBUG_VAR).is_some()
    }
}

fn echo_debug_headers(request: &HeaderMap, response: &mut HeaderMap) {
    for name in headers::DEBUG_ECHO {
        let value = request
            .get(&name)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(""));
        response.insert(name, value);
    }
}
