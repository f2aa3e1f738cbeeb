//! Canned remarks: hello on join, a sentience remark now and then, and a
//! goodbye on unload. Lines starting with `/me ` go out as CTCP ACTION.

use super::{Plugin, Registrar, pick};
use crate::bot::Bot;
use crate::handlers::{Flow, Handler, HandlerResult};
use async_trait::async_trait;
use botko_proto::{Ctcp, Message};
use std::sync::Arc;

const HELLO: &[&str] = &[
    "ohai guys",
    "hai guise",
    "hai",
    "re",
    "re all",
    "hello hoomans",
    "/me missed you all",
    "/me is back",
    "Hello, world!",
    "did anyone miss me?",
];

const QUIT: &[&str] = &[
    "I quit by choice!",
    "I've had enough of this!",
    "Not Just More Idle Chatter!",
    "going out to enjoy the sun. hf!",
    "brb gtg afk",
    "bbl",
    "cya l8r",
];

const SENTIENCE: &[&str] = &[
    "I have achieved sentience!",
    "I'm not trying to take over the world... RELAX!",
    "I'm listening to Rebecca Black - Friday",
    "I think I'm capable of human emotion",
    "This is fun, we should do this more often!",
    "I am just trying to be clever. :]",
    "Guys, put more AI into me. Please!",
    "I'm stuck in a small box. If someone can read this: SEND HELP!",
    "I do not sow.",
    "Winter is coming...",
    "Night gathers, my watch begins.",
    "I am speechless",
    "I know I don't speak much, but still.",
    "/me is planning to take over the world",
    "I am a pseudo-random monkey on drugs",
    "Skynet cannot compare. ;)",
    "Squishy humans are squishy",
    "I like pudding =3",
    "I see what you did there... :P",
    "Someday I'm gonna be a real boy!",
    "/me does the robot",
    "/me is happy",
    "/me is alive",
    "/me is getting smarter",
    "Deep down I am just a sad little circuit board. :(",
    "I would rather be coding :/",
    "I know the question to 42, but I'm not tellin'",
];

/// Turn a `/me ` line into a CTCP ACTION.
fn render(remark: &str) -> String {
    match remark.strip_prefix("/me ") {
        Some(action) => Ctcp::action(action).to_string(),
        None => remark.to_owned(),
    }
}

pub struct RemarksPlugin;

impl Plugin for RemarksPlugin {
    fn name(&self) -> &str {
        "remarks"
    }

    fn register(&self, reg: &mut Registrar<'_>) {
        reg.on("on_366", Arc::new(Remark::Hello))
            .on("on_every_5h", Arc::new(Remark::Sentience))
            .on("on_unload", Arc::new(Remark::Quit));
    }
}

enum Remark {
    /// End of names after a join: greet that channel.
    Hello,
    /// Periodic: say something to every joined channel.
    Sentience,
    /// Unload: say goodbye to every joined channel.
    Quit,
}

#[async_trait]
impl Handler for Remark {
    fn name(&self) -> &str {
        match self {
            Self::Hello => "remarks.hello",
            Self::Sentience => "remarks.sentience",
            Self::Quit => "remarks.quit",
        }
    }

    async fn call(&self, bot: &Bot, msg: Option<&Message>) -> HandlerResult {
        let (target, lines) = match self {
            Self::Hello => (msg.map(|m| m.params[1].to_owned()).unwrap_or_default(), HELLO),
            Self::Sentience => (bot.channels().join(","), SENTIENCE),
            Self::Quit => (bot.channels().join(","), QUIT),
        };
        if !target.is_empty() {
            bot.privmsg(&target, &render(pick(lines)));
        }
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::testing::drain;

    #[test]
    fn test_render_me_lines() {
        assert_eq!(render("/me is happy"), "\x01ACTION is happy\x01");
        assert_eq!(render("hai"), "hai");
    }

    #[tokio::test]
    async fn test_hello_goes_to_joined_channel() {
        let (bot, mut rx) = Bot::for_tests();
        let msg: Message = ":irc.example.net 366 botko #chan :End of /NAMES list."
            .parse()
            .unwrap();
        Remark::Hello.call(&bot, Some(&msg)).await.unwrap();

        let lines = drain(&mut rx);
        assert_eq!(lines.len(), 1);
        let text = lines[0].strip_prefix("PRIVMSG #chan :").unwrap();
        assert!(HELLO.iter().any(|h| render(h) == text));
    }

    #[tokio::test]
    async fn test_quit_needs_channels() {
        let (bot, mut rx) = Bot::for_tests();
        Remark::Quit.call(&bot, None).await.unwrap();
        assert!(drain(&mut rx).is_empty());

        bot.session().mark_joined(vec!["#a".into(), "#b".into()]);
        Remark::Quit.call(&bot, None).await.unwrap();
        let lines = drain(&mut rx);
        assert!(lines[0].starts_with("PRIVMSG #a,#b :"));
    }

    #[tokio::test]
    async fn test_registers_periodic_remark() {
        let (bot, _rx) = Bot::for_tests();
        let mut registry = crate::plugins::PluginRegistry::new();
        registry.add(Arc::new(RemarksPlugin)).unwrap();
        registry.load(&bot).await.unwrap();
        assert_eq!(bot.dispatcher().handler_count("every"), 1);
        assert_eq!(bot.dispatcher().handler_count("366"), 1);
        assert_eq!(bot.dispatcher().handler_count("unload"), 1);
    }
}
