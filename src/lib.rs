//! Custom error page backend for ingress controllers.
//!
//! The ingress forwards failed requests here with `X-Code`, `X-Format` and
//! routing metadata attached; the responder answers with the matching error
//! page from disk, or with maintenance content for configured routes.

pub mod config;
pub mod http;
pub mod observability;
pub mod pages;

pub use config::ServerConfig;
pub use http::HttpServer;
pub use pages::ErrorPages;
