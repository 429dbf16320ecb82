//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults (schema.rs)
//!     → optional TOML file (loader.rs)
//!     → environment overrides (loader.rs, env.rs)
//!     → command line overrides (main.rs)
//!     → validation.rs (semantic checks, once, on the final result)
//!     → ServerConfig (validated, immutable)
//! ```
//!
//! Maintenance content is deliberately not part of `ServerConfig`: it is
//! read through [`EnvLookup`] on every request.

pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use env::{EnvLookup, ProcessEnv, StaticEnv};
pub use loader::{apply_env_overrides, load_config, resolve_config, ConfigError};
pub use schema::{
    ListenerConfig, LogFormat, MaintenanceConfig, ObservabilityConfig, OverrideRoute,
    PagesConfig, ServerConfig, TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
