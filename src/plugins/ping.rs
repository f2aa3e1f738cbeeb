//! Answers server `PING`s.

use super::{Plugin, Registrar};
use crate::bot::Bot;
use crate::handlers::{Flow, Handler, HandlerResult};
use async_trait::async_trait;
use botko_proto::Message;
use std::sync::Arc;

pub struct PingPlugin;

impl Plugin for PingPlugin {
    fn name(&self) -> &str {
        "ping"
    }

    fn register(&self, reg: &mut Registrar<'_>) {
        reg.on("on_ping", Arc::new(Pong));
    }
}

/// `PONG` echoing whatever parameters and text the `PING` carried.
pub fn pong_line(msg: &Message) -> String {
    let mut line = String::from("PONG");
    if !msg.params.is_empty() {
        line.push(' ');
        line.push_str(&msg.params.join(" "));
    }
    if !msg.text().is_empty() {
        line.push_str(" :");
        line.push_str(msg.text());
    }
    line
}

struct Pong;

#[async_trait]
impl Handler for Pong {
    fn name(&self) -> &str {
        "ping.pong"
    }

    async fn call(&self, bot: &Bot, msg: Option<&Message>) -> HandlerResult {
        if let Some(msg) = msg {
            bot.write(&pong_line(msg));
        }
        Ok(Flow::Continue)
    }
}
