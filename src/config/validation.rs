//! Configuration validation.
//!
//! Problems found here are reported at startup as warnings; the bot still
//! tries to run with what it was given.

use super::Config;
use botko_proto::NickExt;
use botko_proto::chan::is_valid_join_params;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("main.nick contains invalid nickname(s): {0}")]
    InvalidNicknames(String),
    #[error("main.channels is not a valid JOIN parameter: {0:?}")]
    InvalidChannels(String),
    #[error("main.server is required")]
    MissingServer,
    #[error("main.port must be non-zero")]
    InvalidPort,
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let main = &config.main;

    let nicks = main.nick.trim_matches(',');
    if !nicks.is_valid_nick_list() {
        errors.push(ValidationError::InvalidNicknames(main.nick.clone()));
    }

    if !is_valid_join_params(&main.channels) {
        errors.push(ValidationError::InvalidChannels(main.channels.clone()));
    }

    if main.server.trim().is_empty() {
        errors.push(ValidationError::MissingServer);
    }

    if main.port == 0 {
        errors.push(ValidationError::InvalidPort);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
