//! Repost detection.
//!
//! Remembers who first posted each link in a channel and calls out anyone
//! posting it again. History is per channel, oldest first, capped at
//! `reposts.maxlinks` by a daily trim. `reposts.channels` limits tracking to
//! a comma list; empty tracks every channel.
//!
//! The history is saved through the serializer on unload and restored on
//! load.

use super::{Plugin, Registrar, pick, serializer};
use crate::bot::Bot;
use crate::handlers::{Flow, Handler, HandlerResult};
use async_trait::async_trait;
use botko_proto::Message;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, LazyLock};
use tracing::{debug, info, warn};

const DEFAULT_MAX_LINKS: usize = 1000;

/// Serializer key for the saved history.
const STATE: &str = "reposts";

const REPOSTS: &[&str] = &[
    "I don't want to be rude {nick}, but {repostNick} has already posted this link!",
    "I am sorry, {nick}, but this link has already been posted by {repostNick}!",
    "You were too slow, {nick}, {repostNick} has already posted this link.",
    "{nick}, this link was already posted by {repostNick}.",
    "Strong with {nick} the force is not. Already posted by {repostNick} this link was.",
    "Hey {repostNick}, {nick} is reposting your stuff",
    "{nick}, maybe you weren't online then, but {repostNick} has already posted this link.",
    "I want to be rude, {nick}, so I'll point out that {repostNick} has already posted this link!",
    "In Soviet Russia {repostNick} reposts {nick}s links.",
    "{nick}, I've seen this link before. I think {repostNick} posted it.",
    "{nick}, my memory banks indicate that {repostNick} already posted this link.",
    "{nick}, you know what you did... and so does {repostNick}.",
];

const SELF_REPOSTS: &[&str] = &[
    "You really like that link, don't you, {nick}?",
    "Hey everyone, {nick} is reposting their own link, so it has to be good.",
    "I don't want to be rude {nick}, but you have already posted this link!",
    "I want to be rude, {nick}, so I'll point out that you have already posted this link!",
    "Silly {nick}, you have already posted this link.",
    "{nick}, why are you reposting your own links?",
    "{nick}, Y U repost you're own links?",
    "This link was already posted by {nick}... oh, that's you!",
    "You sir, are a self-reposter.",
    "You sir, are a self-reposting poster.",
    "{nick}, I'd like to congratulate you on your original link... but you've posted it here before.",
];

static LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(?:https?://|www\.)[\w-]+(?:\.[\w-]+)+(?:[\w\-.,@?!^=%&;:/~+#]*[\w\-@?^=%&;/~+#])?",
    )
    .expect("link pattern is valid")
});

/// Links in `text`, normalized to start with `http`.
fn links(text: &str) -> impl Iterator<Item = String> + '_ {
    LINK.find_iter(text).map(|m| {
        let link = m.as_str();
        if link.get(..4).is_some_and(|s| s.eq_ignore_ascii_case("http")) {
            link.to_owned()
        } else {
            format!("http://{link}")
        }
    })
}

fn render(template: &str, nick: &str, poster: &str) -> String {
    template
        .replace("{nick}", nick)
        .replace("{repostNick}", poster)
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Entry {
    poster: String,
    at: DateTime<Local>,
    times: u32,
}

/// Links of one channel with their first posting, oldest first.
type History = HashMap<String, VecDeque<(String, Entry)>>;

/// Per-channel link history.
struct Tracker {
    channels: Option<Vec<String>>,
    max_links: usize,
    history: Mutex<History>,
}

impl Tracker {
    fn tracks(&self, channel: &str) -> bool {
        self.channels
            .as_ref()
            .is_none_or(|list| list.iter().any(|c| c == channel))
    }

    /// Record `link` posted by `nick`. Returns the earlier entry when this
    /// is a repost; the link moves to the newest end either way.
    fn post(&self, channel: &str, link: String, nick: &str) -> Option<Entry> {
        let mut history = self.history.lock();
        let links = history.entry(channel.to_owned()).or_default();
        let earlier = links
            .iter()
            .position(|(l, _)| *l == link)
            .and_then(|i| links.remove(i))
            .map(|(_, entry)| entry);

        let entry = match &earlier {
            Some(seen) => Entry {
                times: seen.times + 1,
                ..seen.clone()
            },
            None => Entry {
                poster: nick.to_owned(),
                at: Local::now(),
                times: 1,
            },
        };
        links.push_back((link, entry));
        earlier
    }

    /// Drop untracked channels and the oldest links over the cap.
    fn trim(&self) {
        let mut history = self.history.lock();
        history.retain(|channel, _| self.tracks(channel));
        for (channel, links) in history.iter_mut() {
            let excess = links.len().saturating_sub(self.max_links);
            if excess > 0 {
                debug!(channel = %channel, dropped = excess, "trimming link history");
                links.drain(..excess);
            }
        }
    }

    fn snapshot(&self) -> History {
        self.history.lock().clone()
    }

    /// Replace the history with a saved one, trimmed to the current
    /// settings.
    fn restore(&self, saved: History) {
        *self.history.lock() = saved;
        self.trim();
    }

    #[cfg(test)]
    fn len(&self, channel: &str) -> usize {
        self.history.lock().get(channel).map_or(0, VecDeque::len)
    }
}

pub struct RepostsPlugin;

impl Plugin for RepostsPlugin {
    fn name(&self) -> &str {
        "reposts"
    }

    fn depends(&self) -> &[&str] {
        &["serializer"]
    }

    fn register(&self, reg: &mut Registrar<'_>) {
        let max_links = match reg.setting("maxlinks").trim() {
            "" => DEFAULT_MAX_LINKS,
            value => value.parse().unwrap_or_else(|_| {
                warn!(value = %value, "reposts.maxlinks is not a number, using default");
                DEFAULT_MAX_LINKS
            }),
        };
        let channels: Vec<String> = reg
            .setting("channels")
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned)
            .collect();

        let tracker = Arc::new(Tracker {
            channels: (!channels.is_empty()).then_some(channels),
            max_links,
            history: Mutex::new(HashMap::new()),
        });
        reg.on("on_chanmsg", Arc::new(Watch(Arc::clone(&tracker))))
            .on("on_every_1d", Arc::new(Trim(Arc::clone(&tracker))))
            .on("on_load", Arc::new(Restore(Arc::clone(&tracker))))
            .on("on_unload", Arc::new(Save(tracker)));
    }
}

struct Watch(Arc<Tracker>);

#[async_trait]
impl Handler for Watch {
    fn name(&self) -> &str {
        "reposts.watch"
    }

    async fn call(&self, bot: &Bot, msg: Option<&Message>) -> HandlerResult {
        let Some(msg) = msg else {
            return Ok(Flow::Continue);
        };
        let channel = &msg.params[0];
        if !self.0.tracks(channel) {
            return Ok(Flow::Continue);
        }

        let nick = msg.nick();
        for link in links(msg.text()) {
            if let Some(earlier) = self.0.post(channel, link, nick) {
                debug!(
                    channel = %channel,
                    poster = %earlier.poster,
                    first_posted = %earlier.at,
                    times = earlier.times,
                    "repost"
                );
                let lines = if earlier.poster == nick {
                    SELF_REPOSTS
                } else {
                    REPOSTS
                };
                bot.privmsg(channel, &render(pick(lines), nick, &earlier.poster));
            }
        }
        Ok(Flow::Continue)
    }
}

struct Trim(Arc<Tracker>);

#[async_trait]
impl Handler for Trim {
    fn name(&self) -> &str {
        "reposts.trim"
    }

    async fn call(&self, _bot: &Bot, _msg: Option<&Message>) -> HandlerResult {
        self.0.trim();
        Ok(Flow::Continue)
    }
}

struct Restore(Arc<Tracker>);

#[async_trait]
impl Handler for Restore {
    fn name(&self) -> &str {
        "reposts.restore"
    }

    async fn call(&self, bot: &Bot, _msg: Option<&Message>) -> HandlerResult {
        if let Some(saved) = serializer::load::<History>(bot, STATE).await? {
            self.0.restore(saved);
            info!(channels = self.0.history.lock().len(), "link history restored");
        }
        Ok(Flow::Continue)
    }
}

struct Save(Arc<Tracker>);

#[async_trait]
impl Handler for Save {
    fn name(&self) -> &str {
        "reposts.save"
    }

    async fn call(&self, bot: &Bot, _msg: Option<&Message>) -> HandlerResult {
        self.0.trim();
        serializer::dump(bot, STATE, &self.0.snapshot()).await?;
        Ok(Flow::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::testing::drain;
    use crate::handlers::{WriterCommand, process_message};
    use crate::plugins::{PluginRegistry, SerializerPlugin};
    use std::path::Path;
    use tokio::sync::mpsc;

    async fn loaded(dir: &Path, extra: &str) -> (Bot, mpsc::UnboundedReceiver<WriterCommand>) {
        let (bot, rx) = Bot::with_config_str(&format!(
            "[main]\ndata_dir = {:?}\n{extra}",
            dir.display().to_string()
        ));
        let mut registry = PluginRegistry::new();
        registry.add(Arc::new(RepostsPlugin)).unwrap();
        registry.add(Arc::new(SerializerPlugin)).unwrap();
        registry.load(&bot).await.unwrap();
        (bot, rx)
    }

    fn tracker(channels: Option<Vec<String>>, max_links: usize) -> Tracker {
        Tracker {
            channels,
            max_links,
            history: Mutex::new(HashMap::new()),
        }
    }

    fn replies(lines: &[&str], nick: &str, poster: &str) -> Vec<String> {
        lines.iter().map(|l| render(l, nick, poster)).collect()
    }

    #[test]
    fn test_link_extraction() {
        let found: Vec<String> =
            links("see www.example.com/a?b=1, and HTTPS://x.org/path. also foo.bar").collect();
        assert_eq!(found, vec!["http://www.example.com/a?b=1", "HTTPS://x.org/path"]);
    }

    #[test]
    fn test_post_counts_and_moves_to_end() {
        let t = tracker(None, 10);
        assert!(t.post("#a", "http://one".into(), "alice").is_none());
        assert!(t.post("#a", "http://two".into(), "bob").is_none());
        let earlier = t.post("#a", "http://one".into(), "bob").unwrap();
        assert_eq!(earlier.poster, "alice");
        assert_eq!(earlier.times, 1);
        assert_eq!(t.post("#a", "http://one".into(), "carol").unwrap().times, 2);

        let history = t.history.lock();
        let order: Vec<&str> = history["#a"].iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(order, vec!["http://two", "http://one"]);
    }

    #[test]
    fn test_trim_drops_oldest_and_untracked() {
        let t = tracker(Some(vec!["#a".into()]), 2);
        for link in ["http://1", "http://2", "http://3"] {
            t.post("#a", link.into(), "alice");
        }
        t.post("#b", "http://x".into(), "alice");
        t.trim();
        assert_eq!(t.len("#a"), 2);
        assert_eq!(t.len("#b"), 0);
        assert!(t.post("#a", "http://1".into(), "bob").is_none());
    }

    #[tokio::test]
    async fn test_repost_replies() {
        let tmp = tempfile::tempdir().unwrap();
        let (bot, mut rx) = loaded(tmp.path(), "[reposts]\nchannels = \"#a\"\n").await;

        let feed = |line: &str| line.parse::<Message>().unwrap();
        process_message(&bot, &feed(":alice!a@h PRIVMSG #a :look http://example.com/x")).await;
        process_message(&bot, &feed(":bob!b@h PRIVMSG #b :http://example.com/x")).await;
        assert!(drain(&mut rx).is_empty());

        process_message(&bot, &feed(":bob!b@h PRIVMSG #a :old: http://example.com/x")).await;
        let lines = drain(&mut rx);
        assert_eq!(lines.len(), 1);
        let text = lines[0].strip_prefix("PRIVMSG #a :").unwrap();
        assert!(replies(REPOSTS, "bob", "alice").contains(&text.to_owned()));

        process_message(&bot, &feed(":alice!a@h PRIVMSG #a :http://example.com/x")).await;
        let lines = drain(&mut rx);
        let text = lines[0].strip_prefix("PRIVMSG #a :").unwrap();
        assert!(replies(SELF_REPOSTS, "alice", "alice").contains(&text.to_owned()));
    }

    #[tokio::test]
    async fn test_handlers_registered() {
        let tmp = tempfile::tempdir().unwrap();
        let (bot, _rx) = loaded(tmp.path(), "").await;
        assert_eq!(bot.dispatcher().handler_count("chanmsg"), 1);
        assert_eq!(bot.dispatcher().handler_count("every"), 1);
        // serializer and reposts
        assert_eq!(bot.dispatcher().handler_count("load"), 2);
        assert_eq!(bot.dispatcher().handler_count("unload"), 1);
    }

    #[tokio::test]
    async fn test_history_survives_restart() {
        let tmp = tempfile::tempdir().unwrap();
        let settings = "[reposts]\nmaxlinks = 2\n";

        let (bot, mut rx) = loaded(tmp.path(), settings).await;
        let feed = |line: &str| line.parse::<Message>().unwrap();
        for link in ["http://one.example", "http://two.example", "http://three.example"] {
            process_message(&bot, &feed(&format!(":alice!a@h PRIVMSG #a :{link}"))).await;
        }
        bot.trigger_event("unload", None).await;
        assert!(drain(&mut rx).is_empty());
        assert!(tmp.path().join("reposts.msgpack").exists());

        let (bot, mut rx) = loaded(tmp.path(), settings).await;
        process_message(&bot, &feed(":bob!b@h PRIVMSG #a :http://three.example")).await;
        let lines = drain(&mut rx);
        assert_eq!(lines.len(), 1);
        let text = lines[0].strip_prefix("PRIVMSG #a :").unwrap();
        assert!(replies(REPOSTS, "bob", "alice").contains(&text.to_owned()));

        process_message(&bot, &feed(":bob!b@h PRIVMSG #a :http://one.example")).await;
        assert!(drain(&mut rx).is_empty());
    }
}
