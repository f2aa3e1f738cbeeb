//! Replies to CTCP requests.
//!
//! - `VERSION`: answers with a client version, then asks the sender back
//! - `SOURCE`: points at the source repository
//! - `PING`: echoes the payload
//! - `TIME`: local time
//! - `ACTION` in a channel: joins in ("is too.") at most once per two hours
//!   per channel

use super::{Plugin, Registrar};
use crate::bot::Bot;
use crate::handlers::{Flow, Handler, HandlerResult};
use async_trait::async_trait;
use botko_proto::{ChannelExt, Ctcp, CtcpKind, Message};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

const VERSION_REPLY: &str = "mIRC v6.31 Khaled Mardam-Bey";
const SOURCE_URL: &str = "https://github.com/kernc/botko";
const ACTION_COOLDOWN: Duration = Duration::from_secs(2 * 60 * 60);

pub struct CtcpPlugin;

impl Plugin for CtcpPlugin {
    fn name(&self) -> &str {
        "ctcp"
    }

    fn register(&self, reg: &mut Registrar<'_>) {
        reg.on("on_ctcp", Arc::new(CtcpReply::default()));
    }
}

/// Verb to echo for an action verb, if the bot has an opinion on it.
fn echo_verb(verb: &str) -> Option<&str> {
    match verb {
        "is" | "has" | "did" | "will" | "could" | "should" => Some(verb),
        v if v.ends_with('s') => Some("does"),
        _ => None,
    }
}

#[derive(Default)]
struct CtcpReply {
    last_action: Mutex<HashMap<String, Instant>>,
}

impl CtcpReply {
    /// True, and the clock restarted, when the channel's cooldown has passed.
    fn action_allowed(&self, channel: &str, now: Instant) -> bool {
        let mut last = self.last_action.lock();
        match last.get(channel) {
            Some(at) if now.duration_since(*at) <= ACTION_COOLDOWN => false,
            _ => {
                last.insert(channel.to_owned(), now);
                true
            }
        }
    }

    fn on_action(&self, bot: &Bot, msg: &Message, text: &str) {
        let channel = &msg.params[0];
        if !channel.is_channel_target() || !self.action_allowed(channel, Instant::now()) {
            return;
        }
        let verb = text.split_whitespace().next().unwrap_or("");
        if let Some(verb) = echo_verb(verb) {
            let reply = format!("{verb} too.");
            bot.privmsg(channel, &Ctcp::action(&reply).to_string());
        }
    }
}

#[async_trait]
impl Handler for CtcpReply {
    fn name(&self) -> &str {
        "ctcp.reply"
    }

    async fn call(&self, bot: &Bot, msg: Option<&Message>) -> HandlerResult {
        let Some(msg) = msg else {
            return Ok(Flow::Continue);
        };
        let Some(request) = Ctcp::parse(msg.text()) else {
            return Ok(Flow::Continue);
        };
        let nick = msg.nick();

        match request.kind {
            CtcpKind::Action => self.on_action(bot, msg, request.params.unwrap_or("")),
            CtcpKind::Version => {
                bot.notice(nick, &Ctcp::new(CtcpKind::Version, Some(VERSION_REPLY)).to_string());
                // Ask back, so the reply shows up in the logs.
                bot.privmsg(nick, &Ctcp::new(CtcpKind::Version, None).to_string());
            }
            CtcpKind::Source => {
                bot.notice(nick, &Ctcp::new(CtcpKind::Source, Some(SOURCE_URL)).to_string());
            }
            CtcpKind::Ping => {
                bot.notice(nick, &Ctcp::new(CtcpKind::Ping, request.params).to_string());
            }
            CtcpKind::Time => {
                let now = chrono::Local::now().to_rfc2822();
                bot.notice(nick, &Ctcp::new(CtcpKind::Time, Some(now.as_str())).to_string());
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }
}
