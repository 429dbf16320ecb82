//! Request classification.
//!
//! Turns the metadata headers the ingress attaches into an
//! [`IncomingSignal`]. Missing or malformed values never fail the request;
//! they are replaced by defaults and logged.

use axum::http::{HeaderMap, HeaderName, StatusCode};

use crate::pages::headers::{X_CODE, X_FORMAT, X_ORIGINAL_URI, X_SERVICE_NAME};
use crate::pages::media::{extensions_by_type, normalize_extension};

/// Media type assumed when `X-Format` is absent or malformed.
pub const DEFAULT_FORMAT: &str = "text/html";
/// Extension used when the format maps to no known extension.
pub const DEFAULT_EXTENSION: &str = ".html";
/// Status assumed when `X-Code` is absent or not a valid status code.
pub const DEFAULT_STATUS: StatusCode = StatusCode::NOT_FOUND;

/// Routing-relevant view of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncomingSignal {
    /// Value for the outgoing `Content-Type`.
    pub format: String,
    /// File extension with its leading dot, e.g. `.html`.
    pub extension: String,
    /// Status reported by the upstream.
    pub status: StatusCode,
    pub original_uri: String,
    pub service_name: String,
}

impl IncomingSignal {
    /// File name for the exact status, e.g. `503.json`.
    pub fn status_file(&self) -> String {
        format!("{}{}", self.status.as_u16(), self.extension)
    }

    /// Class-level fallback file name, e.g. `5xx.json`.
    pub fn class_file(&self) -> String {
        let code = self.status.as_u16().to_string();
        let digit = code.chars().next().unwrap_or('4');
        format!("{}xx{}", digit, self.extension)
    }
}

/// Classify a request from its headers.
pub fn classify(headers: &HeaderMap) -> IncomingSignal {
    let (format, extension) = resolve_format(header_str(headers, &X_FORMAT));
    let status = resolve_status(header_str(headers, &X_CODE));

    IncomingSignal {
        format,
        extension,
        status,
        original_uri: header_string(headers, &X_ORIGINAL_URI),
        service_name: header_string(headers, &X_SERVICE_NAME),
    }
}

fn resolve_format(raw: Option<&str>) -> (String, String) {
    let format = match raw.filter(|f| !f.is_empty()) {
        Some(f) => f.to_string(),
        None => {
            tracing::info!(format = DEFAULT_FORMAT, "Format not specified, using default");
            DEFAULT_FORMAT.to_string()
        }
    };

    match extensions_by_type(&format) {
        Err(e) => {
            tracing::warn!(
                format = %format,
                error = %e,
                extension = DEFAULT_EXTENSION,
                "Unexpected error reading media type extension"
            );
            (DEFAULT_FORMAT.to_string(), DEFAULT_EXTENSION.to_string())
        }
        Ok([]) => {
            tracing::info!(
                format = %format,
                extension = DEFAULT_EXTENSION,
                "No extension known for media type"
            );
            (format, DEFAULT_EXTENSION.to_string())
        }
        Ok([first, ..]) => {
            let extension = normalize_extension(first);
            (format, extension)
        }
    }
}

fn resolve_status(raw: Option<&str>) -> StatusCode {
    let parsed = raw
        .ok_or("missing")
        .and_then(|code| code.trim().parse::<u16>().map_err(|_| "not a number"))
        .and_then(|code| StatusCode::from_u16(code).map_err(|_| "out of range"));

    match parsed {
        Ok(status) => status,
        Err(reason) => {
            tracing::info!(
                code = raw.unwrap_or_default(),
                reason,
                default = DEFAULT_STATUS.as_u16(),
                "Unexpected error reading return code"
            );
            DEFAULT_STATUS
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn header_string(headers: &HeaderMap, name: &HeaderName) -> String {
    header_str(headers, name).unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert((*name).clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_defaults_for_empty_request() {
        let signal = classify(&HeaderMap::new());
        assert_eq!(signal.format, "text/html");
        assert_eq!(signal.extension, ".html");
        assert_eq!(signal.status, StatusCode::NOT_FOUND);
        assert_eq!(signal.original_uri, "");
        assert_eq!(signal.service_name, "");
    }

    #[test]
    fn test_json_format() {
        let signal = classify(&headers(&[(&X_FORMAT, "application/json"), (&X_CODE, "503")]));
        assert_eq!(signal.format, "application/json");
        assert_eq!(signal.extension, ".json");
        assert_eq!(signal.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(signal.status_file(), "503.json");
        assert_eq!(signal.class_file(), "5xx.json");
    }

    #[test]
    fn test_unknown_format_keeps_raw_content_type() {
        let signal = classify(&headers(&[(&X_FORMAT, "application/x-custom")]));
        assert_eq!(signal.format, "application/x-custom");
        assert_eq!(signal.extension, ".html");
    }

    #[test]
    fn test_malformed_format_resets_content_type() {
        let signal = classify(&headers(&[(&X_FORMAT, "text/")]));
        assert_eq!(signal.format, "text/html");
        assert_eq!(signal.extension, ".html");
    }

    #[test]
    fn test_format_parameters_are_preserved() {
        let signal = classify(&headers(&[(&X_FORMAT, "text/html; charset=utf-8")]));
        assert_eq!(signal.format, "text/html; charset=utf-8");
        assert_eq!(signal.extension, ".html");
    }

    #[test]
    fn test_non_numeric_code_defaults_to_404() {
        for code in ["abc", "", "5O3", "-1", "70000"] {
            let signal = classify(&headers(&[(&X_CODE, code)]));
            assert_eq!(signal.status, StatusCode::NOT_FOUND, "code {:?}", code);
        }
    }

    #[test]
    fn test_out_of_range_code_defaults_to_404() {
        let signal = classify(&headers(&[(&X_CODE, "42")]));
        assert_eq!(signal.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_routing_metadata() {
        let signal = classify(&headers(&[
            (&X_ORIGINAL_URI, "/api/version-checks/fresha?v=1"),
            (&X_SERVICE_NAME, "refresh"),
        ]));
        assert_eq!(signal.original_uri, "/api/version-checks/fresha?v=1");
        assert_eq!(signal.service_name, "refresh");
    }
}
