//! Response emission.
//!
//! Streams the resolved body back to the client. File bodies fall back to
//! the class-level file (`4xx.html` for a 404) when the exact file cannot
//! be opened; when that fails too the request ends with a plain
//! "not found" response.
//!
//! Served bodies carry the request's [`RequestTimer`]; it is finished when
//! the body stream ends cleanly, so the metrics sample covers the transfer.

use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::Response,
};
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use tokio::fs::File;
use tokio_util::io::ReaderStream;

use crate::observability::RequestTimer;
use crate::pages::classifier::IncomingSignal;

/// Where the body comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodySource {
    File(PathBuf),
    Literal(String),
}

/// The final decision for one request.
#[derive(Debug, Clone)]
pub struct ResolvedResponse {
    pub source: BodySource,
    /// Status for the primary body. The class-level fallback always uses
    /// the upstream status instead.
    pub status: StatusCode,
    /// Headers applied on top of whatever the caller already set.
    pub headers: HeaderMap,
}

/// Outcome of [`emit`].
#[derive(Debug)]
pub enum Emission {
    /// A body was produced.
    Served(Response),
    /// Neither the primary nor the fallback file could be opened.
    NotFound(Response),
}

impl Emission {
    pub fn is_served(&self) -> bool {
        matches!(self, Emission::Served(_))
    }

    pub fn into_response(self) -> Response {
        match self {
            Emission::Served(r) | Emission::NotFound(r) => r,
        }
    }
}

/// Build the response for a resolved decision.
///
/// `headers` are the response headers accumulated so far; `resolved.headers`
/// are layered on top of them. `timer` is finished once a served body has
/// been fully streamed and dropped otherwise.
pub async fn emit(
    root: &Path,
    signal: &IncomingSignal,
    resolved: ResolvedResponse,
    mut headers: HeaderMap,
    timer: RequestTimer,
) -> Emission {
    headers.extend(resolved.headers);

    let path = match resolved.source {
        BodySource::Literal(content) => {
            tracing::info!(
                code = resolved.status.as_u16(),
                format = %signal.format,
                "Serving maintenance content"
            );
            let body = stream::iter([Ok::<_, io::Error>(Bytes::from(content))]).boxed();
            return Emission::Served(build(resolved.status, headers, timed(body, timer)));
        }
        BodySource::File(path) => path,
    };

    match File::open(&path).await {
        Ok(file) => {
            tracing::info!(
                code = signal.status.as_u16(),
                format = %signal.format,
                file = %path.display(),
                "Serving custom error response"
            );
            Emission::Served(build(resolved.status, headers, file_body(file, timer)))
        }
        Err(e) => {
            tracing::warn!(file = %path.display(), error = %e, "Unexpected error opening file");

            let fallback = root.join(signal.class_file());
            match File::open(&fallback).await {
                Ok(file) => {
                    tracing::info!(
                        code = signal.status.as_u16(),
                        format = %signal.format,
                        file = %fallback.display(),
                        "Serving custom error response"
                    );
                    Emission::Served(build(signal.status, headers, file_body(file, timer)))
                }
                Err(e) => {
                    tracing::warn!(file = %fallback.display(), error = %e, "Unexpected error opening file");
                    Emission::NotFound(not_found(headers))
                }
            }
        }
    }
}

/// Body stream that finishes the request timer at a clean end of stream.
struct TimedStream {
    inner: BoxStream<'static, io::Result<Bytes>>,
    timer: Option<RequestTimer>,
}

impl Stream for TimedStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let poll = self.inner.as_mut().poll_next(cx);
        match &poll {
            Poll::Ready(None) => {
                if let Some(timer) = self.timer.take() {
                    timer.finish();
                }
            }
            Poll::Ready(Some(Err(e))) => {
                tracing::warn!(error = %e, "Error streaming response body");
                self.timer = None;
            }
            _ => {}
        }
        poll
    }
}

fn timed(inner: BoxStream<'static, io::Result<Bytes>>, timer: RequestTimer) -> Body {
    Body::from_stream(TimedStream {
        inner,
        timer: Some(timer),
    })
}

fn file_body(file: File, timer: RequestTimer) -> Body {
    timed(ReaderStream::new(file).boxed(), timer)
}

fn build(status: StatusCode, headers: HeaderMap, body: Body) -> Response {
    let mut response = Response::new(body);
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}

fn not_found(mut headers: HeaderMap) -> Response {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    build(StatusCode::NOT_FOUND, headers, Body::from("404 page not found\n"))
}
