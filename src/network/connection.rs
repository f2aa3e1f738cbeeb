//! Connection - Runs the bot over one server connection.
//!
//! ```text
//!   transport ──► FramedRead<LineCodec> ──► parse ──► process_message
//!                                                        │
//!   transport ◄── FramedWrite<LineCodec> ◄── writer task ◄┘ (Outbound queue)
//! ```
//!
//! The read side is processed strictly in arrival order: all handlers for
//! one line finish before the next line is read. The write side is a single
//! task draining the outbound queue, so writes never interleave.

use crate::bot::Bot;
use crate::error::BotError;
use crate::handlers::{WriterCommand, process_message};
use crate::telemetry::spans;
use botko_proto::{LineCodec, Message};
use futures_util::{SinkExt, StreamExt};
use std::future::Future;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{Instrument, debug, error, info, warn};

/// Open the TCP connection named by `[main]`.
pub async fn connect(bot: &Bot) -> Result<TcpStream, BotError> {
    let main = bot.main();
    info!(server = %main.server, port = main.port, "connecting");
    let stream = TcpStream::connect((main.server.as_str(), main.port)).await?;
    Ok(stream)
}

/// Drain the outbound queue into the transport until told to stop.
async fn write_loop<W>(
    mut sink: FramedWrite<W, LineCodec>,
    mut outgoing: mpsc::UnboundedReceiver<WriterCommand>,
) -> Result<(), BotError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(cmd) = outgoing.recv().await {
        match cmd {
            WriterCommand::Line(line) => sink.send(line).await?,
            WriterCommand::Shutdown => break,
        }
    }
    sink.flush().await?;
    sink.close().await?;
    Ok(())
}

/// Warn about registration steps still pending after `after`.
fn spawn_watchdog(bot: Bot, after: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        tokio::time::sleep(after).await;
        let pending = bot.replies().pending_steps();
        if !pending.is_empty() {
            warn!(
                pending = ?pending,
                timeout_secs = after.as_secs(),
                "registration steps still waiting for server replies"
            );
        }
    })
}

async fn handle_line(bot: &Bot, line: &str) {
    if line.is_empty() {
        return;
    }
    debug!(line = %line, "RX");
    match line.parse::<Message>() {
        Ok(msg) => process_message(bot, &msg).await,
        Err(e) => warn!(line = %line, error = %e, "line does not match IRC grammar, ignored"),
    }
}

/// Run the bot over `stream` until EOF, a transport error or `shutdown`.
///
/// On connect: fire `connect`, write the handshake, arm the registration
/// watchdog and launch periodic tasks (they wait for the join). On the way
/// out: fire `unload`, stop periodic tasks, flush queued lines and close.
pub async fn run<S, F>(
    bot: &Bot,
    stream: S,
    outgoing: mpsc::UnboundedReceiver<WriterCommand>,
    shutdown: F,
) -> Result<(), BotError>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
    F: Future<Output = ()>,
{
    let span = spans::connection(&bot.main().server, bot.main().port);
    async move {
        let (read_half, write_half) = tokio::io::split(stream);
        let mut reader = FramedRead::new(read_half, LineCodec::new());
        let writer = tokio::spawn(
            write_loop(FramedWrite::new(write_half, LineCodec::new()), outgoing)
                .in_current_span(),
        );

        bot.trigger_event("connect", None).await;
        bot.start_handshake();
        let watchdog = bot
            .main()
            .registration_timeout()
            .map(|after| spawn_watchdog(bot.clone(), after));
        bot.dispatcher().launch_periodic(bot);

        tokio::pin!(shutdown);
        let result = loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("shutdown requested");
                    break Ok(());
                }
                frame = reader.next() => match frame {
                    Some(Ok(line)) => handle_line(bot, &line).await,
                    Some(Err(e)) => {
                        error!(error = %e, "read error");
                        break Err(BotError::from(e));
                    }
                    None => {
                        info!("server closed the connection");
                        break Ok(());
                    }
                },
            }
        };

        if let Some(watchdog) = watchdog {
            watchdog.abort();
        }
        info!("unloading plugins");
        bot.trigger_event("unload", None).await;
        bot.dispatcher().stop_periodic();

        info!("closing connection");
        bot.outbound().close();
        match writer.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(error = %e, "write side failed"),
            Err(e) => warn!(error = %e, "writer task failed"),
        }
        result
    }
    .instrument(span)
    .await
}
