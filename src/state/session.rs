//! Identity the bot acquires during registration.
//!
//! The nickname is empty until the server welcomes one of the candidates; the
//! channel list stays empty until the join step sees the end of the names
//! list. Periodic tasks park on [`Session::wait_joined`] until then.

use parking_lot::RwLock;
use tokio::sync::watch;

/// Current nickname, joined channels and the joined flag.
#[derive(Debug)]
pub struct Session {
    nick: RwLock<String>,
    channels: RwLock<Vec<String>>,
    joined: watch::Sender<bool>,
}

impl Session {
    pub fn new() -> Self {
        let (joined, _) = watch::channel(false);
        Self {
            nick: RwLock::new(String::new()),
            channels: RwLock::new(Vec::new()),
            joined,
        }
    }

    /// Active nickname, "" before registration succeeded.
    pub fn nick(&self) -> String {
        self.nick.read().clone()
    }

    pub fn set_nick(&self, nick: impl Into<String>) {
        *self.nick.write() = nick.into();
    }

    /// Channels joined by the handshake.
    pub fn channels(&self) -> Vec<String> {
        self.channels.read().clone()
    }

    /// Record a successful join and release anything waiting on it.
    pub fn mark_joined(&self, channels: Vec<String>) {
        *self.channels.write() = channels;
        self.joined.send_replace(true);
    }

    pub fn is_joined(&self) -> bool {
        *self.joined.borrow()
    }

    /// Resolve once the join step has succeeded.
    pub async fn wait_joined(&self) {
        let mut rx = self.joined.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|joined| *joined).await;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
