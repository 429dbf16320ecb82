//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → handlers.rs
//!         /healthz  → 200
//!         /metrics  → Prometheus text
//!         *         → pages::ErrorPages
//! ```

pub mod handlers;
pub mod server;

pub use server::{shutdown_signal, AppState, HttpServer};
