//! Conversation logger.
//!
//! `logger.channels` and `logger.conversations` each take `all` or a comma
//! list. Matching lines are appended to
//! `<log_dir>/<server>/<target>/<YYYY-MM-DD>.txt`, where the target is the
//! channel, or the other party for private conversations. The bot's own
//! messages are picked up by an outbound interceptor.
//!
//! File I/O runs on one background task fed through a channel, so handlers
//! and the interceptor never block and lines land in order.

use super::{Plugin, Registrar};
use crate::bot::Bot;
use crate::handlers::{FirstDelivery, Flow, Handler, HandlerResult, Interceptor, Outgoing};
use crate::state::Session;
use async_trait::async_trait;
use botko_proto::{ChannelExt, Message};
use chrono::{DateTime, Local};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

/// Which targets get logged.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Targets {
    All,
    Only(Vec<String>),
}

impl Targets {
    fn parse(setting: &str) -> Self {
        if setting.trim().eq_ignore_ascii_case("all") {
            return Self::All;
        }
        Self::Only(
            setting
                .split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
                .collect(),
        )
    }

    fn matches(&self, target: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(list) => list.iter().any(|t| t == target),
        }
    }

    fn is_empty(&self) -> bool {
        matches!(self, Self::Only(list) if list.is_empty())
    }
}

enum LogCommand {
    Append { path: PathBuf, line: String },
    Flush(oneshot::Sender<()>),
}

/// Routing rules plus the queue to the file writer.
struct LogBook {
    channels: Targets,
    conversations: Targets,
    dir: PathBuf,
    tx: mpsc::UnboundedSender<LogCommand>,
}

impl LogBook {
    /// Log `text` said by `nick`. `target` is the message target; `partner`
    /// names the other party when the target is not a channel.
    fn record(&self, nick: &str, target: &str, partner: &str, text: &str, now: DateTime<Local>) {
        let file_target = if target.is_channel_target() {
            if !self.channels.matches(target) {
                return;
            }
            target
        } else {
            if !self.conversations.matches(partner) {
                return;
            }
            partner
        };

        let path = self
            .dir
            .join(file_target)
            .join(format!("{}.txt", now.format("%Y-%m-%d")));
        let line = format!("{} {}: {}\n", now.format("%Y-%m-%dT%H:%M:%S"), nick, text);
        if self.tx.send(LogCommand::Append { path, line }).is_err() {
            debug!("log writer gone, dropping line");
        }
    }

    /// Resolve once every line queued so far is on disk.
    async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(LogCommand::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

async fn append(files: &mut HashMap<PathBuf, File>, path: &Path, line: &str) -> std::io::Result<()> {
    if !files.contains_key(path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        debug!(path = %path.display(), "opening log file");
        let file = OpenOptions::new().create(true).append(true).open(path).await?;
        files.insert(path.to_owned(), file);
    }
    if let Some(file) = files.get_mut(path) {
        file.write_all(line.as_bytes()).await?;
    }
    Ok(())
}

async fn write_loop(mut rx: mpsc::UnboundedReceiver<LogCommand>) {
    let mut files: HashMap<PathBuf, File> = HashMap::new();
    while let Some(cmd) = rx.recv().await {
        match cmd {
            LogCommand::Append { path, line } => {
                if let Err(e) = append(&mut files, &path, &line).await {
                    warn!(path = %path.display(), error = %e, "could not write log line");
                    files.remove(&path);
                }
            }
            LogCommand::Flush(done) => {
                for file in files.values_mut() {
                    if let Err(e) = file.flush().await {
                        warn!(error = %e, "could not flush log file");
                    }
                }
                let _ = done.send(());
            }
        }
    }
}

pub struct LoggerPlugin;

impl Plugin for LoggerPlugin {
    fn name(&self) -> &str {
        "logger"
    }

    fn register(&self, reg: &mut Registrar<'_>) {
        let channels = Targets::parse(&reg.setting("channels"));
        let conversations = Targets::parse(&reg.setting("conversations"));
        if channels.is_empty() && conversations.is_empty() {
            info!("nothing to log");
            return;
        }
        info!(channels = ?channels, conversations = ?conversations, "logging");

        let main = reg.bot().main();
        let dir = main.log_dir().join(&main.server);
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(write_loop(rx));

        let book = Arc::new(LogBook {
            channels,
            conversations,
            dir,
            tx,
        });
        let session = reg.bot().session_handle();
        reg.intercept(Arc::new(OwnMessages {
            book: Arc::clone(&book),
            session,
        }))
        .on(
            "on_privmsg",
            Arc::new(Incoming {
                book: Arc::clone(&book),
                once: FirstDelivery::new(),
            }),
        )
        .on("on_unload", Arc::new(FlushOnUnload(book)));
    }
}

/// Logs every inbound `PRIVMSG`.
struct Incoming {
    book: Arc<LogBook>,
    once: FirstDelivery,
}

#[async_trait]
impl Handler for Incoming {
    fn name(&self) -> &str {
        "logger.incoming"
    }

    async fn call(&self, bot: &Bot, msg: Option<&Message>) -> HandlerResult {
        if let Some(msg) = msg.filter(|_| self.once.first(bot)) {
            self.book
                .record(msg.nick(), &msg.params[0], msg.nick(), msg.text(), Local::now());
        }
        Ok(Flow::Continue)
    }
}

struct FlushOnUnload(Arc<LogBook>);

#[async_trait]
impl Handler for FlushOnUnload {
    fn name(&self) -> &str {
        "logger.flush"
    }

    async fn call(&self, _bot: &Bot, _msg: Option<&Message>) -> HandlerResult {
        self.0.flush().await;
        Ok(Flow::Continue)
    }
}

/// Logs the bot's own `PRIVMSG`s on the way out.
struct OwnMessages {
    book: Arc<LogBook>,
    session: Arc<Session>,
}

impl Interceptor for OwnMessages {
    fn intercept(&self, outgoing: Outgoing) -> Option<Outgoing> {
        if let Outgoing::Privmsg { target, text } = &outgoing {
            let nick = self.session.nick();
            let now = Local::now();
            for t in target.split(',') {
                self.book.record(&nick, t, t, text, now);
            }
        }
        Some(outgoing)
    }
}
