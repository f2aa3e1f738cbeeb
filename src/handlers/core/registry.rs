//! Event dispatcher.
//!
//! Maps event names to ordered handler lists. Insertion order is call order.
//! Periodic handlers (`on_every_<N><unit>`) are not in the table: they become
//! [`PeriodicTask`]s, booked under the synthetic event `every`, and start
//! once the channel join succeeds.

use super::event::{EventName, HandlerEvent};
use super::periodic::PeriodicTask;
use super::traits::Handler;
use crate::bot::Bot;
use crate::error::DispatchError;
use crate::telemetry::spans;
use botko_proto::Message;
use dashmap::DashMap;
use futures_util::FutureExt;
use parking_lot::Mutex;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{Instrument, debug, error, warn};

/// Bookkeeping name of the periodic task list.
pub const PERIODIC_EVENT: &str = "every";

/// Event name to handler list, plus the periodic tasks.
#[derive(Default)]
pub struct Dispatcher {
    handlers: DashMap<EventName, Vec<Arc<dyn Handler>>>,
    periodic: Mutex<Vec<PeriodicTask>>,
    periodic_launched: AtomicBool,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `handler` under a handler name like `on_privmsg`, `on_366` or
    /// `on_every_30m`.
    ///
    /// Invalid names are logged and rejected; nothing is registered.
    pub fn add_handler(
        &self,
        handler_name: &str,
        handler: Arc<dyn Handler>,
    ) -> Result<(), DispatchError> {
        let event = HandlerEvent::parse(handler_name).inspect_err(|e| {
            error!(handler = handler.name(), error = %e, "invalid event or event handler");
        })?;

        match event {
            HandlerEvent::Event(event) => {
                debug!(event = %event, handler = handler.name(), "attached event handler");
                self.handlers.entry(event).or_default().push(handler);
            }
            HandlerEvent::Every(interval) => {
                let name = format!("{}.{}", handler.name(), handler_name);
                debug!(task = %name, interval_secs = interval.as_secs(), "attached periodic handler");
                self.periodic
                    .lock()
                    .push(PeriodicTask::new(name, interval, handler));
            }
        }
        Ok(())
    }

    /// Unbind one registration of `handler` under `handler_name`.
    ///
    /// Returns false, with a warning, when it was not bound. A removed
    /// periodic task stops at its next wake-up.
    pub fn remove_handler(&self, handler_name: &str, handler: &Arc<dyn Handler>) -> bool {
        let removed = match HandlerEvent::parse(handler_name) {
            Ok(HandlerEvent::Event(event)) => self
                .handlers
                .get_mut(&event)
                .and_then(|mut list| {
                    let pos = list.iter().position(|h| Arc::ptr_eq(h, handler))?;
                    list.remove(pos);
                    Some(())
                })
                .is_some(),
            Ok(HandlerEvent::Every(interval)) => {
                let mut periodic = self.periodic.lock();
                match periodic
                    .iter()
                    .position(|t| t.interval() == interval && Arc::ptr_eq(t.handler(), handler))
                {
                    Some(pos) => {
                        periodic.remove(pos).deactivate();
                        true
                    }
                    None => false,
                }
            }
            Err(_) => false,
        };

        if removed {
            debug!(event = handler_name, handler = handler.name(), "removed event handler");
        } else {
            warn!(event = handler_name, handler = handler.name(), "event handler not active");
        }
        removed
    }

    /// Number of handlers bound to `event`; `every` counts periodic tasks.
    pub fn handler_count(&self, event: &str) -> usize {
        if event == PERIODIC_EVENT {
            return self.periodic.lock().len();
        }
        self.handlers
            .get(&EventName::new(event))
            .map(|list| list.len())
            .unwrap_or(0)
    }

    /// Call every handler bound to `event`, in order.
    ///
    /// A failing or panicking handler is logged and the rest still run.
    /// Returns how many handlers were called.
    pub async fn trigger(&self, bot: &Bot, event: &EventName, msg: Option<&Message>) -> usize {
        // Clone the list so no map guard is held across an await.
        let handlers = match self.handlers.get(event) {
            Some(list) => list.clone(),
            None => return 0,
        };

        for handler in &handlers {
            let span = spans::handler(&event.to_string(), handler.name());
            let outcome = AssertUnwindSafe(handler.call(bot, msg))
                .catch_unwind()
                .instrument(span)
                .await;
            match outcome {
                Ok(Ok(_)) => {}
                Ok(Err(e)) => warn!(
                    event = %event,
                    handler = handler.name(),
                    error = %e,
                    code = e.error_code(),
                    "event handler failed"
                ),
                Err(_) => error!(event = %event, handler = handler.name(), "event handler panicked"),
            }
        }
        handlers.len()
    }

    /// Spawn every periodic task not yet running.
    ///
    /// The tasks themselves wait for the channel join. Tasks added later are
    /// spawned as they are added.
    pub fn launch_periodic(&self, bot: &Bot) {
        self.periodic_launched.store(true, Ordering::Release);
        let mut periodic = self.periodic.lock();
        let mut launched = 0;
        for task in periodic.iter_mut().filter(|t| !t.is_launched()) {
            task.launch(bot.clone());
            launched += 1;
        }
        if launched > 0 {
            debug!(count = launched, "launched periodic tasks");
        }
    }

    pub fn periodic_launched(&self) -> bool {
        self.periodic_launched.load(Ordering::Acquire)
    }

    /// Stop all periodic tasks.
    pub fn stop_periodic(&self) {
        self.periodic_launched.store(false, Ordering::Release);
        for task in self.periodic.lock().iter_mut() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use crate::handlers::core::traits::{Flow, HandlerResult};
    use async_trait::async_trait;

    struct Record {
        tag: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Handler for Record {
        fn name(&self) -> &str {
            self.tag
        }

        async fn call(&self, _bot: &Bot, msg: Option<&Message>) -> HandlerResult {
            let text = msg.map(|m| m.text().to_owned()).unwrap_or_default();
            self.log.lock().push(format!("{}:{}", self.tag, text));
            Ok(Flow::Continue)
        }
    }

    struct Fail;

    #[async_trait]
    impl Handler for Fail {
        async fn call(&self, _bot: &Bot, _msg: Option<&Message>) -> HandlerResult {
            Err(HandlerError::BadInput("nope".into()))
        }
    }

    struct Panic;

    #[async_trait]
    impl Handler for Panic {
        async fn call(&self, _bot: &Bot, _msg: Option<&Message>) -> HandlerResult {
            panic!("handler blew up");
        }
    }

    fn record(tag: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<dyn Handler> {
        Arc::new(Record {
            tag,
            log: Arc::clone(log),
        })
    }

    #[tokio::test]
    async fn test_trigger_in_registration_order() {
        let (bot, _rx) = Bot::for_tests();
        let log = Arc::new(Mutex::new(Vec::new()));
        let d = Dispatcher::new();
        d.add_handler("on_privmsg", record("a", &log)).unwrap();
        d.add_handler("on_privmsg", record("b", &log)).unwrap();

        let msg: Message = ":n!u@h PRIVMSG bot :hi".parse().unwrap();
        let called = d.trigger(&bot, &EventName::new("privmsg"), Some(&msg)).await;
        assert_eq!(called, 2);
        assert_eq!(*log.lock(), vec!["a:hi", "b:hi"]);
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_dispatch() {
        let (bot, _rx) = Bot::for_tests();
        let log = Arc::new(Mutex::new(Vec::new()));
        let d = Dispatcher::new();
        d.add_handler("on_load", Arc::new(Fail)).unwrap();
        d.add_handler("on_load", Arc::new(Panic)).unwrap();
        d.add_handler("on_load", record("after", &log)).unwrap();

        assert_eq!(d.trigger(&bot, &EventName::new("load"), None).await, 3);
        assert_eq!(*log.lock(), vec!["after:"]);
    }

    #[tokio::test]
    async fn test_unknown_event_is_noop() {
        let (bot, _rx) = Bot::for_tests();
        let d = Dispatcher::new();
        assert_eq!(d.trigger(&bot, &EventName::new("nothing"), None).await, 0);
    }

    #[test]
    fn test_invalid_names_rejected() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let d = Dispatcher::new();
        assert!(d.add_handler("on_foo!", record("x", &log)).is_err());
        assert!(d.add_handler("privmsg", record("x", &log)).is_err());
        assert_eq!(d.handler_count("foo!"), 0);
    }

    #[test]
    fn test_numeric_names_share_a_key() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let d = Dispatcher::new();
        d.add_handler("on_005", record("x", &log)).unwrap();
        d.add_handler("on_5", record("y", &log)).unwrap();
        assert_eq!(d.handler_count("5"), 2);
        assert_eq!(d.handler_count("005"), 2);
    }

    #[test]
    fn test_every_creates_one_periodic_task() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let d = Dispatcher::new();
        d.add_handler("on_every_30m", record("tick", &log)).unwrap();

        assert_eq!(d.handler_count(PERIODIC_EVENT), 1);
        let periodic = d.periodic.lock();
        assert_eq!(periodic[0].interval().as_secs(), 1800);
        assert_eq!(periodic[0].name(), "tick.on_every_30m");
    }

    #[test]
    fn test_remove_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let d = Dispatcher::new();
        let a = record("a", &log);
        let b = record("b", &log);
        d.add_handler("on_join", a.clone()).unwrap();
        d.add_handler("on_join", b.clone()).unwrap();

        assert!(d.remove_handler("on_join", &a));
        assert_eq!(d.handler_count("join"), 1);
        assert!(!d.remove_handler("on_join", &a));
        assert!(!d.remove_handler("on_part", &b));
    }

    #[test]
    fn test_remove_periodic_handler() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let d = Dispatcher::new();
        let tick = record("tick", &log);
        d.add_handler("on_every_5h", tick.clone()).unwrap();
        assert!(!d.remove_handler("on_every_1h", &tick));
        assert!(d.remove_handler("on_every_5h", &tick));
        assert_eq!(d.handler_count(PERIODIC_EVENT), 0);
    }
}
