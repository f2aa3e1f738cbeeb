//! Periodic (timer-driven) handlers.
//!
//! Each task runs on its own tokio task: it parks until the channel join
//! succeeds, then sleeps its interval and calls the handler, forever. A
//! handler returning [`Flow::Done`] ends its task; an error is logged and
//! the task keeps its schedule.

use super::traits::{Flow, Handler};
use crate::bot::Bot;
use crate::telemetry::spans;
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, error, info, warn};

/// A handler bound to an interval.
pub struct PeriodicTask {
    name: String,
    interval: Duration,
    handler: Arc<dyn Handler>,
    active: Arc<AtomicBool>,
    task: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    pub fn new(name: impl Into<String>, interval: Duration, handler: Arc<dyn Handler>) -> Self {
        Self {
            name: name.into(),
            interval,
            handler,
            active: Arc::new(AtomicBool::new(true)),
            task: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn is_launched(&self) -> bool {
        self.task.is_some()
    }

    /// Spawn the task. A second call is a no-op.
    pub fn launch(&mut self, bot: Bot) {
        if self.task.is_some() {
            return;
        }
        let span = spans::periodic(&self.name, self.interval.as_secs());
        let interval = self.interval;
        let handler = Arc::clone(&self.handler);
        let active = Arc::clone(&self.active);

        let task = async move {
            bot.session().wait_joined().await;
            debug!("periodic task running");
            loop {
                tokio::time::sleep(interval).await;
                if !active.load(Ordering::Acquire) {
                    break;
                }
                match AssertUnwindSafe(handler.call(&bot, None))
                    .catch_unwind()
                    .await
                {
                    Ok(Ok(Flow::Continue)) => {}
                    Ok(Ok(Flow::Done)) => {
                        info!("periodic task finished");
                        break;
                    }
                    Ok(Err(e)) => {
                        warn!(error = %e, code = e.error_code(), "periodic handler failed");
                    }
                    Err(_) => error!("periodic handler panicked"),
                }
            }
        };
        self.task = Some(tokio::spawn(task.instrument(span)));
    }

    /// Stop the task at its next wake-up.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    /// Stop the task now.
    pub fn abort(&mut self) {
        self.deactivate();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.deactivate();
    }
}
