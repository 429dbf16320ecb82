//! Header names exchanged with the ingress controller.

use axum::http::HeaderName;

/// Desired response media type.
pub const X_FORMAT: HeaderName = HeaderName::from_static("x-format");
/// Upstream HTTP status code.
pub const X_CODE: HeaderName = HeaderName::from_static("x-code");
/// Original request URI as seen by the ingress.
pub const X_ORIGINAL_URI: HeaderName = HeaderName::from_static("x-original-uri");
/// Namespace of the matched Ingress.
pub const X_NAMESPACE: HeaderName = HeaderName::from_static("x-namespace");
/// Name of the matched Ingress.
pub const X_INGRESS_NAME: HeaderName = HeaderName::from_static("x-ingress-name");
/// Service the Ingress routed to.
pub const X_SERVICE_NAME: HeaderName = HeaderName::from_static("x-service-name");
/// Port of that Service.
pub const X_SERVICE_PORT: HeaderName = HeaderName::from_static("x-service-port");
/// Request ID shared with the backend.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Headers copied verbatim onto the response in debug mode.
pub const DEBUG_ECHO: [HeaderName; 9] = [
    X_FORMAT,
    X_CODE,
    axum::http::header::CONTENT_TYPE,
    X_ORIGINAL_URI,
    X_NAMESPACE,
    X_INGRESS_NAME,
    X_SERVICE_NAME,
    X_SERVICE_PORT,
    X_REQUEST_ID,
];
