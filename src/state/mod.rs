//! State management module.
//!
//! Contains the per-connection [`Session`] identity shared by handlers,
//! handshake steps and periodic tasks.

mod session;

pub use session::Session;
