//! xform - transform pipelines from configuration
//!
//! Loads a model transform chain and a projection from layered TOML/env
//! configuration and composes them with [`xform_math`].

pub mod config;
pub mod pipeline;

pub use config::{AppConfig, ConfigError};
pub use pipeline::Pipeline;
