//! Media type to file extension mapping.
//!
//! The ingress sends the client's preferred media type in `X-Format`; the
//! extension picked here selects which file family (`404.html`,
//! `404.json`, ...) is served.

use mime::Mime;

/// `X-Format` could not be parsed as a media type.
#[derive(Debug, thiserror::Error)]
#[error("invalid media type `{format}`: {source}")]
pub struct MediaTypeError {
    format: String,
    #[source]
    source: mime::FromStrError,
}

/// Known extensions for a media type, most preferred first, without the
/// leading dot.
///
/// Parameters and case are ignored. Returns an empty slice for well-formed
/// types the table does not know.
///
/// # Examples
/// ```
/// use custom_error_pages::pages::media::extensions_by_type;
/// assert_eq!(extensions_by_type("Application/JSON; charset=utf-8").unwrap(), &["json"]);
/// assert!(extensions_by_type("text/").is_err());
/// ```
pub fn extensions_by_type(format: &str) -> Result<&'static [&'static str], MediaTypeError> {
    let media: Mime = format.trim().parse().map_err(|source| MediaTypeError {
        format: format.to_string(),
        source,
    })?;

    let exts: &'static [&'static str] = match media.essence_str() {
        // Text
        "text/html" => &["html", "htm"],
        "text/css" => &["css"],
        "text/plain" => &["txt"],
        "text/xml" | "application/xml" => &["xml"],
        "text/csv" => &["csv"],
        "text/markdown" => &["md"],

        // Scripts and data
        "text/javascript" | "application/javascript" => &["js", "mjs"],
        "application/json" | "application/vnd.api+json" => &["json"],
        "application/problem+json" => &["json"],
        "application/wasm" => &["wasm"],
        "application/pdf" => &["pdf"],

        // Images
        "image/png" => &["png"],
        "image/jpeg" => &["jpg", "jpeg"],
        "image/gif" => &["gif"],
        "image/svg+xml" => &["svg"],
        "image/webp" => &["webp"],
        "image/avif" => &["avif"],

        _ => &[],
    };
    Ok(exts)
}

/// Ensure an extension starts with exactly one `.`.
///
/// Idempotent: `normalize_extension(&normalize_extension(e)) == normalize_extension(e)`.
pub fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{}", ext)
    }
}
