//! The bot runtime object.
//!
//! [`Bot`] owns everything that used to be process-wide: configuration,
//! the outbound write path, session identity, the reply queue and the event
//! dispatcher. It is a cheap handle; clones share the same state, and it is
//! what handlers, periodic tasks and plugins receive.

use crate::config::{Config, MainConfig};
use crate::error::DispatchError;
use crate::handlers::{
    Dispatcher, EventName, Handler, Interceptor, Outbound, WriterCommand,
};
use crate::handshake::{self, ReplyQueue, StepContext};
use crate::state::Session;
use botko_proto::Message;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

struct BotInner {
    config: Config,
    outbound: Outbound,
    session: Arc<Session>,
    replies: ReplyQueue,
    dispatcher: Dispatcher,
    routed: AtomicU64,
}

/// Shared handle to the running bot.
#[derive(Clone)]
pub struct Bot {
    inner: Arc<BotInner>,
}

impl Bot {
    /// Build a bot and the receiving end of its write queue.
    ///
    /// Hand the receiver to the connection once the transport is up; lines
    /// written before that are buffered.
    pub fn new(config: Config) -> (Self, mpsc::UnboundedReceiver<WriterCommand>) {
        let (outbound, rx) = Outbound::new();
        let bot = Self {
            inner: Arc::new(BotInner {
                config,
                outbound,
                session: Arc::new(Session::new()),
                replies: ReplyQueue::new(),
                dispatcher: Dispatcher::new(),
                routed: AtomicU64::new(0),
            }),
        };
        (bot, rx)
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn main(&self) -> &MainConfig {
        &self.inner.config.main
    }

    /// Slash-joined config lookup, "" when absent.
    pub fn lookup(&self, path: &str) -> String {
        self.inner.config.lookup(path)
    }

    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.inner.config.main.data_dir)
    }

    /// Current nickname, "" until one was accepted.
    pub fn nick(&self) -> String {
        self.inner.session.nick()
    }

    /// Channels joined during registration.
    pub fn channels(&self) -> Vec<String> {
        self.inner.session.channels()
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Owned session handle for interceptors, which must not hold the bot.
    pub fn session_handle(&self) -> Arc<Session> {
        Arc::clone(&self.inner.session)
    }

    pub fn outbound(&self) -> &Outbound {
        &self.inner.outbound
    }

    pub fn replies(&self) -> &ReplyQueue {
        &self.inner.replies
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.inner.dispatcher
    }

    pub fn privmsg(&self, target: &str, text: &str) {
        self.inner.outbound.privmsg(target, text);
    }

    pub fn notice(&self, target: &str, text: &str) {
        self.inner.outbound.notice(target, text);
    }

    /// Send a raw protocol line.
    pub fn write(&self, line: &str) {
        self.inner.outbound.write(line);
    }

    pub fn add_interceptor(&self, interceptor: Arc<dyn Interceptor>) {
        self.inner.outbound.add_interceptor(interceptor);
    }

    /// Bind a handler; see [`Dispatcher::add_handler`].
    ///
    /// A periodic handler added after the periodic tasks were launched is
    /// launched right away.
    pub fn add_handler(
        &self,
        handler_name: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<(), DispatchError> {
        self.inner.dispatcher.add_handler(handler_name, handler)?;
        if self.inner.dispatcher.periodic_launched() {
            self.inner.dispatcher.launch_periodic(self);
        }
        Ok(())
    }

    pub fn remove_handler(&self, handler_name: &str, handler: &Arc<dyn Handler>) -> bool {
        self.inner.dispatcher.remove_handler(handler_name, handler)
    }

    /// Call every handler bound to `event` (`"load"`, `"privmsg"`, `"366"`).
    pub async fn trigger_event(&self, event: &str, msg: Option<&Message>) -> usize {
        self.trigger(&EventName::new(event), msg).await
    }

    pub(crate) async fn trigger(&self, event: &EventName, msg: Option<&Message>) -> usize {
        self.inner.dispatcher.trigger(self, event, msg).await
    }

    /// Number of the inbound message being routed, 0 before the first.
    pub fn message_seq(&self) -> u64 {
        self.inner.routed.load(Ordering::Acquire)
    }

    pub(crate) fn next_message_seq(&self) -> u64 {
        self.inner.routed.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn step_context(&self) -> StepContext<'_> {
        StepContext::new(&self.inner.outbound, &self.inner.session)
    }

    /// Write `NICK`, `USER` and `JOIN` and register the handshake steps.
    pub fn start_handshake(&self) {
        handshake::start_handshake(&self.inner.replies, self.main(), &self.step_context());
    }

    /// Deliver a numeric reply to the steps waiting on it.
    pub fn fulfil(&self, code: u16) -> usize {
        self.inner.replies.fulfil(code, &self.step_context())
    }

    #[cfg(test)]
    pub(crate) fn for_tests() -> (Self, mpsc::UnboundedReceiver<WriterCommand>) {
        Self::with_config_str("")
    }

    #[cfg(test)]
    pub(crate) fn with_config_str(
        toml: &str,
    ) -> (Self, mpsc::UnboundedReceiver<WriterCommand>) {
        let config = Config::from_toml_str(toml).expect("test config");
        Self::new(config)
    }
}
