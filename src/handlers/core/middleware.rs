//! Outbound write path.
//!
//! Every line the bot sends goes through [`Outbound`]: it is offered to the
//! interceptor chain in insertion order, stripped of embedded line breaks and
//! queued for the single writer task that owns the transport's write half.
//! One queue and one writer mean lines never interleave, whichever flow
//! (handler, periodic task, handshake step) produced them.
//!
//! The queue exists before the transport does, so lines written during
//! plugin loading are delivered as soon as the connection is up.

use botko_proto::LineCodec;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

/// A line on its way out, before serialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outgoing {
    Privmsg { target: String, text: String },
    Notice { target: String, text: String },
    /// A complete protocol line without terminator.
    Raw(String),
}

impl Outgoing {
    /// Serialize to a protocol line (no terminator).
    pub fn into_line(self) -> String {
        match self {
            Self::Privmsg { target, text } => format!("PRIVMSG {target} :{text}"),
            Self::Notice { target, text } => format!("NOTICE {target} :{text}"),
            Self::Raw(line) => line,
        }
    }
}

/// Observes, rewrites or drops outgoing lines.
///
/// Returning `None` drops the line; later interceptors never see it.
pub trait Interceptor: Send + Sync {
    fn intercept(&self, outgoing: Outgoing) -> Option<Outgoing>;
}

/// Commands consumed by the writer task.
#[derive(Debug, PartialEq, Eq)]
pub enum WriterCommand {
    /// Write one line (terminator is added by the codec).
    Line(String),
    /// Flush what is queued and shut the write half down.
    Shutdown,
}

/// Serialized write path shared by everything that talks to the server.
pub struct Outbound {
    tx: mpsc::UnboundedSender<WriterCommand>,
    interceptors: RwLock<Vec<Arc<dyn Interceptor>>>,
}

impl Outbound {
    /// Create the write path and the receiving end for the writer task.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<WriterCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let outbound = Self {
            tx,
            interceptors: RwLock::new(Vec::new()),
        };
        (outbound, rx)
    }

    /// Append an interceptor to the end of the chain.
    pub fn add_interceptor(&self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.write().push(interceptor);
    }

    pub fn interceptor_count(&self) -> usize {
        self.interceptors.read().len()
    }

    /// Run `outgoing` through the chain and queue the result.
    pub fn send(&self, outgoing: Outgoing) {
        // Snapshot the chain so an interceptor may register another one.
        let chain: Vec<Arc<dyn Interceptor>> = self.interceptors.read().clone();
        let mut outgoing = outgoing;
        for interceptor in chain {
            match interceptor.intercept(outgoing) {
                Some(next) => outgoing = next,
                None => return,
            }
        }

        let line = outgoing.into_line();
        let line = LineCodec::sanitize(&line);
        debug!(line = %line, "TX");
        if self.tx.send(WriterCommand::Line(line.to_owned())).is_err() {
            debug!(line = %line, "writer gone, dropping line");
        }
    }

    pub fn privmsg(&self, target: &str, text: &str) {
        self.send(Outgoing::Privmsg {
            target: target.to_owned(),
            text: text.to_owned(),
        });
    }

    pub fn notice(&self, target: &str, text: &str) {
        self.send(Outgoing::Notice {
            target: target.to_owned(),
            text: text.to_owned(),
        });
    }

    /// Send a raw protocol line.
    pub fn write(&self, line: &str) {
        self.send(Outgoing::Raw(line.to_owned()));
    }

    /// Ask the writer to flush queued lines and close the transport.
    pub fn close(&self) {
        let _ = self.tx.send(WriterCommand::Shutdown);
    }
}
