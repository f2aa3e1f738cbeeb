//! Per-message event routing.
//!
//! For each parsed message, in order:
//!
//! 1. a numeric code fulfils the reply queue
//! 2. the welcome reply also fires `welcome`
//! 3. a `PRIVMSG` fires exactly one of `ctcp`, `chanmsg` or `privmsg`
//! 4. the command word (or numeric code) fires as its own event
//!
//! A direct `PRIVMSG` therefore reaches the `privmsg` handlers twice, once
//! through step 3 and once through step 4. Handlers that must act once per
//! message guard themselves with [`FirstDelivery`].

use super::core::EventName;
use crate::bot::Bot;
use crate::telemetry::spans;
use botko_proto::{ChannelExt, Message, Response};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::Instrument;

/// Derived event for a `PRIVMSG`, `None` for anything else.
pub fn derived_event(msg: &Message) -> Option<&'static str> {
    if msg.command_name() != "privmsg" {
        return None;
    }
    if msg.is_ctcp() {
        Some("ctcp")
    } else if msg.params[0].is_channel_target() {
        Some("chanmsg")
    } else {
        Some("privmsg")
    }
}

/// Tells a handler whether it already saw the message being routed.
pub struct FirstDelivery {
    last: AtomicU64,
}

impl FirstDelivery {
    pub fn new() -> Self {
        Self {
            last: AtomicU64::new(u64::MAX),
        }
    }

    /// True on the first call per routed message.
    pub fn first(&self, bot: &Bot) -> bool {
        let seq = bot.message_seq();
        self.last.swap(seq, Ordering::AcqRel) != seq
    }
}

impl Default for FirstDelivery {
    fn default() -> Self {
        Self::new()
    }
}

/// Route one parsed message.
pub async fn process_message(bot: &Bot, msg: &Message) {
    let source = if msg.server().is_empty() {
        msg.nick()
    } else {
        msg.server()
    };
    let span = spans::message(msg.command_name(), msg.code(), source);
    bot.next_message_seq();

    async {
        let code = msg.code();
        if code != 0 {
            bot.fulfil(code);
            if code == Response::RPL_WELCOME.code() {
                bot.trigger_event("welcome", Some(msg)).await;
            }
        }

        if let Some(event) = derived_event(msg) {
            bot.trigger_event(event, Some(msg)).await;
        }

        let event = match code {
            0 => EventName::Named(msg.command_name().to_owned()),
            code => EventName::Numeric(code),
        };
        bot.trigger(&event, Some(msg)).await;
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::testing::drain;
    use crate::handlers::{Flow, FnHandler, Handler, HandlerResult};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Tag {
        event: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait]
    impl Handler for Tag {
        async fn call(&self, _bot: &Bot, _msg: Option<&Message>) -> HandlerResult {
            self.log.lock().push(self.event);
            Ok(Flow::Continue)
        }
    }

    fn wire(bot: &Bot, events: &[&'static str]) -> Arc<Mutex<Vec<&'static str>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        for &event in events {
            let handler = Arc::new(Tag {
                event,
                log: Arc::clone(&log),
            });
            bot.add_handler(&format!("on_{event}"), handler).unwrap();
        }
        log
    }

    fn parse(line: &str) -> Message {
        line.parse().unwrap()
    }

    #[tokio::test]
    async fn test_channel_privmsg_fires_chanmsg_then_command() {
        let (bot, _rx) = Bot::for_tests();
        let log = wire(&bot, &["ctcp", "chanmsg", "privmsg"]);

        process_message(&bot, &parse(":nick!user@host PRIVMSG #chan :hello there")).await;
        assert_eq!(*log.lock(), vec!["chanmsg", "privmsg"]);
    }

    #[tokio::test]
    async fn test_ctcp_privmsg() {
        let (bot, _rx) = Bot::for_tests();
        let log = wire(&bot, &["ctcp", "chanmsg", "privmsg"]);

        process_message(&bot, &parse(":n!u@h PRIVMSG #chan :\x01ACTION waves\x01")).await;
        assert_eq!(*log.lock(), vec!["ctcp", "privmsg"]);
    }

    #[tokio::test]
    async fn test_direct_privmsg_fires_derived_and_command() {
        let (bot, _rx) = Bot::for_tests();
        let log = wire(&bot, &["ctcp", "chanmsg", "privmsg"]);

        process_message(&bot, &parse(":n!u@h PRIVMSG botko :hi")).await;
        assert_eq!(*log.lock(), vec!["privmsg", "privmsg"]);
    }

    #[tokio::test]
    async fn test_first_delivery_once_per_message() {
        let (bot, _rx) = Bot::for_tests();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let guard = Arc::new(FirstDelivery::new());
        let handler = {
            let seen = Arc::clone(&seen);
            FnHandler::new("once", move |bot: Bot, msg: Option<Message>| {
                let seen = Arc::clone(&seen);
                let guard = Arc::clone(&guard);
                async move {
                    if guard.first(&bot) {
                        seen.lock().push(msg.map(|m| m.text().to_owned()).unwrap_or_default());
                    }
                    Ok(Flow::Continue)
                }
            })
        };
        bot.add_handler("on_privmsg", Arc::new(handler)).unwrap();

        process_message(&bot, &parse(":n!u@h PRIVMSG botko :one")).await;
        process_message(&bot, &parse(":n!u@h PRIVMSG botko :one")).await;
        process_message(&bot, &parse(":n!u@h PRIVMSG #chan :two")).await;
        assert_eq!(*seen.lock(), vec!["one", "one", "two"]);
    }

    #[tokio::test]
    async fn test_welcome_fires_welcome_then_numeric() {
        let (bot, _rx) = Bot::for_tests();
        let log = wire(&bot, &["welcome", "1"]);

        process_message(&bot, &parse(":irc.example.net 001 botko :Welcome")).await;
        assert_eq!(*log.lock(), vec!["welcome", "1"]);
    }

    #[tokio::test]
    async fn test_numeric_fulfils_handshake_before_handlers() {
        let (bot, mut rx) = Bot::for_tests();
        bot.start_handshake();
        drain(&mut rx);

        process_message(&bot, &parse(":irc.example.net 433 * botko :Nickname is already in use")).await;
        assert_eq!(drain(&mut rx), vec!["NICK BOTK0"]);
        process_message(&bot, &parse(":irc.example.net 001 BOTK0 :Welcome")).await;
        assert_eq!(bot.nick(), "BOTK0");
    }

    #[test]
    fn test_derived_event() {
        assert_eq!(derived_event(&parse("PRIVMSG &local :x")), Some("chanmsg"));
        assert_eq!(derived_event(&parse("PRIVMSG !12345 :x")), Some("chanmsg"));
        assert_eq!(derived_event(&parse("PRIVMSG nick :x")), Some("privmsg"));
        assert_eq!(derived_event(&parse("NOTICE #a :x")), None);
        assert_eq!(derived_event(&parse("PING :x")), None);
    }
}
