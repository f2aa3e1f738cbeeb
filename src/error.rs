//! Unified error handling for botko.
//!
//! Failures local to one message or one handler are logged and absorbed;
//! only [`BotError`] ends the process.

use thiserror::Error;

use crate::config::ConfigError;

// ============================================================================
// Handler Errors (event handlers and periodic tasks)
// ============================================================================

/// Errors raised by an event handler.
///
/// The dispatcher logs these with the handler's identity and moves on to the
/// next handler bound to the same event.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Handler could not make sense of the message it was given.
    #[error("bad input: {0}")]
    BadInput(String),

    /// File or socket I/O failed inside the handler.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// The handler panicked; the panic was contained by the dispatcher.
    #[error("handler panicked: {0}")]
    Panicked(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadInput(_) => "bad_input",
            Self::Io(_) => "io_error",
            Self::Panicked(_) => "panicked",
            Self::Internal(_) => "internal_error",
        }
    }
}

impl From<PersistError> for HandlerError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::Io(io) => Self::Io(io),
            other => Self::Internal(other.to_string()),
        }
    }
}

// ============================================================================
// Persistence Errors (serializer plugin)
// ============================================================================

/// Failure to save or restore plugin state under the data directory.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
}

// ============================================================================
// Expectation Errors (reply queue)
// ============================================================================

/// Rejected registration with the reply expectation queue.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpectError {
    #[error("expectation needs at least one reply code")]
    EmptyCodes,

    #[error("reply code {0} is not a numeric reply (1-999)")]
    InvalidCode(u16),
}

// ============================================================================
// Handshake Failures (registration steps)
// ============================================================================

/// Why a registration step gave up. Logged, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandshakeFailure {
    #[error("no nickname accepted after {attempts} attempts (last reply {last_code})")]
    NicksExhausted { attempts: usize, last_code: u16 },

    #[error("no nickname candidates configured")]
    NoCandidates,

    #[error("could not join {channels} (reply {code})")]
    Join { channels: String, code: u16 },
}

// ============================================================================
// Dispatch Errors (event registration)
// ============================================================================

/// Rejected event handler registration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("invalid event handler name: {0}")]
    InvalidEventName(String),

    #[error("periodic interval must be positive: {0}")]
    ZeroInterval(String),
}

// ============================================================================
// Plugin Errors (plugin registry)
// ============================================================================

/// Plugin loading failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    #[error("plugin {plugin} depends on unknown plugin {dependency}")]
    MissingDependency { plugin: String, dependency: String },

    #[error("plugin {plugin} depends on disabled plugin {dependency}")]
    DisabledDependency { plugin: String, dependency: String },

    #[error("dependency cycle through plugin {0}")]
    DependencyCycle(String),

    #[error("plugin {0} registered twice")]
    Duplicate(String),
}

// ============================================================================
// Bot Errors (process level)
// ============================================================================

/// Fatal errors that stop the bot.
#[derive(Debug, Error)]
pub enum BotError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("plugin error: {0}")]
    Plugin(#[from] PluginError),

    #[error("transport failure: {0}")]
    Transport(#[from] std::io::Error),
}

impl BotError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Plugin(_) => "plugin_error",
            Self::Transport(_) => "transport_failure",
        }
    }
}

impl From<botko_proto::ProtocolError> for BotError {
    fn from(err: botko_proto::ProtocolError) -> Self {
        match err {
            botko_proto::ProtocolError::Io(io) => BotError::Transport(io),
            other => BotError::Transport(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                other.to_string(),
            )),
        }
    }
}
