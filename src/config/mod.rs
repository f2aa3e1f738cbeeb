//! Configuration module for botko.
//!
//! Loads TOML sections over built-in defaults, exposes typed access to the
//! `[main]` section and slash-joined string lookups for plugins.

mod types;
mod validation;

pub use types::{Config, ConfigError, MainConfig};
pub use validation::{ValidationError, validate};
