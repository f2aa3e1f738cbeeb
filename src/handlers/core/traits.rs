//! Event handler trait.
//!
//! Handlers receive the [`Bot`] and, for protocol events, the parsed
//! message. Lifecycle events (`load`, `unload`, `connect`) and periodic
//! ticks carry no message.

use crate::bot::Bot;
use crate::error::HandlerError;
use async_trait::async_trait;
use botko_proto::Message;
use std::future::Future;

/// What a handler asks of its caller.
///
/// Only periodic tasks act on it: [`Flow::Done`] ends the task. Event
/// dispatch always runs every bound handler.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Done,
}

pub type HandlerResult = Result<Flow, HandlerError>;

/// An event handler.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Identity used in logs.
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn call(&self, bot: &Bot, msg: Option<&Message>) -> HandlerResult;
}

/// Adapter turning an async closure into a [`Handler`].
///
/// The closure gets owned copies of the bot handle and message.
pub struct FnHandler<F> {
    name: String,
    f: F,
}

impl<F, Fut> FnHandler<F>
where
    F: Fn(Bot, Option<Message>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Bot, Option<Message>) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, bot: &Bot, msg: Option<&Message>) -> HandlerResult {
        (self.f)(bot.clone(), msg.cloned()).await
    }
}
