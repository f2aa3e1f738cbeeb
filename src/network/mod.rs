//! Network module.
//!
//! Contains the server connection loop and the TCP connect helper.

mod connection;

pub use connection::{connect, run};
