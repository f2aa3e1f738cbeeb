//! Reply expectation queue.
//!
//! Correlates numeric replies with the registration steps waiting on them.
//! A step registers under a set of codes; every fulfilment of one of those
//! codes resumes it. A step that reports [`StepState::Finished`] is dropped
//! from every code it was registered under, exactly once.
//!
//! All mutation happens under one mutex with a logical clock. Each
//! registration is stamped with the clock, each fulfilment takes a fresh
//! tick, and a fulfilment asserts that every step it resumes was registered
//! before it began.

use super::{Step, StepContext, StepState};
use crate::error::ExpectError;
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

/// Highest valid numeric reply.
const MAX_CODE: u16 = 999;

/// Identifier of a registered step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StepId(u64);

struct Pending {
    step: Box<dyn Step>,
    codes: Vec<u16>,
    registered: u64,
}

#[derive(Default)]
struct Inner {
    clock: u64,
    next_id: u64,
    steps: HashMap<StepId, Pending>,
    /// Waiters per code, in registration order.
    by_code: HashMap<u16, Vec<StepId>>,
}

impl Inner {
    fn tick(&mut self) -> u64 {
        let now = self.clock;
        self.clock += 1;
        now
    }

    fn insert(&mut self, step: Box<dyn Step>, codes: Vec<u16>) -> StepId {
        let id = StepId(self.next_id);
        self.next_id += 1;
        let registered = self.tick();
        for &code in &codes {
            self.by_code.entry(code).or_default().push(id);
        }
        self.steps.insert(
            id,
            Pending {
                step,
                codes,
                registered,
            },
        );
        id
    }

    fn remove(&mut self, id: StepId) {
        let Some(pending) = self.steps.remove(&id) else {
            return;
        };
        for code in pending.codes {
            if let Some(waiters) = self.by_code.get_mut(&code) {
                waiters.retain(|w| *w != id);
                if waiters.is_empty() {
                    self.by_code.remove(&code);
                }
            }
        }
    }
}

/// Validate and normalize a code set.
fn check_codes(codes: &[u16]) -> Result<Vec<u16>, ExpectError> {
    if codes.is_empty() {
        return Err(ExpectError::EmptyCodes);
    }
    if let Some(&bad) = codes.iter().find(|&&c| c == 0 || c > MAX_CODE) {
        return Err(ExpectError::InvalidCode(bad));
    }
    Ok(codes.iter().copied().collect::<BTreeSet<_>>().into_iter().collect())
}

/// Serialized registry of steps awaiting numeric replies.
#[derive(Default)]
pub struct ReplyQueue {
    inner: Mutex<Inner>,
}

impl ReplyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `step` as waiting for any of `codes`.
    ///
    /// Rejects an empty set or a code outside 1..=999; nothing is enqueued
    /// in that case.
    pub fn expect(&self, step: Box<dyn Step>, codes: &[u16]) -> Result<StepId, ExpectError> {
        let codes = check_codes(codes)?;
        debug!(step = step.name(), codes = ?codes, "expecting replies");
        Ok(self.inner.lock().insert(step, codes))
    }

    /// Start `step` and, unless it finishes right away, register it.
    ///
    /// Starting and registering happen under the same lock, so no reply can
    /// slip in between the step's first write and its registration.
    pub fn begin(
        &self,
        mut step: Box<dyn Step>,
        codes: &[u16],
        ctx: &StepContext<'_>,
    ) -> Result<Option<StepId>, ExpectError> {
        let codes = check_codes(codes)?;
        let mut inner = self.inner.lock();
        match step.start(ctx) {
            StepState::Finished => Ok(None),
            StepState::Suspended => {
                debug!(step = step.name(), codes = ?codes, "expecting replies");
                Ok(Some(inner.insert(step, codes)))
            }
        }
    }

    /// Deliver `code` to every step waiting on it.
    ///
    /// Returns how many steps were resumed. Unknown codes are a no-op.
    pub fn fulfil(&self, code: u16, ctx: &StepContext<'_>) -> usize {
        let mut inner = self.inner.lock();
        let now = inner.tick();
        let Some(waiters) = inner.by_code.get(&code).cloned() else {
            return 0;
        };

        let mut resumed = 0;
        for id in waiters {
            // Removed earlier in this pass.
            let Some(pending) = inner.steps.get_mut(&id) else {
                continue;
            };
            assert!(
                pending.registered < now,
                "step {} resumed by a reply that began before it was registered",
                pending.step.name()
            );
            resumed += 1;
            if pending.step.resume(code, ctx) == StepState::Finished {
                debug!(step = pending.step.name(), code, "step finished");
                inner.remove(id);
            }
        }
        resumed
    }

    /// Names of steps still waiting, in registration order.
    pub fn pending_steps(&self) -> Vec<String> {
        let inner = self.inner.lock();
        let mut ids: Vec<&StepId> = inner.steps.keys().collect();
        ids.sort();
        ids.into_iter()
            .filter_map(|id| inner.steps.get(id))
            .map(|pending| pending.step.name().to_owned())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Outbound;
    use crate::state::Session;
    use std::sync::Arc;

    /// Records every delivered code; finishes on the first code in `finish_on`.
    struct Recorder {
        name: &'static str,
        seen: Arc<parking_lot::Mutex<Vec<u16>>>,
        finish_on: Vec<u16>,
    }

    impl Recorder {
        fn boxed(
            name: &'static str,
            finish_on: &[u16],
        ) -> (Box<dyn Step>, Arc<parking_lot::Mutex<Vec<u16>>>) {
            let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
            let recorder = Recorder {
                name,
                seen: seen.clone(),
                finish_on: finish_on.to_vec(),
            };
            (Box::new(recorder), seen)
        }
    }

    impl Step for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn start(&mut self, ctx: &StepContext<'_>) -> StepState {
            ctx.outbound.write(&format!("START {}", self.name));
            StepState::Suspended
        }

        fn resume(&mut self, code: u16, _ctx: &StepContext<'_>) -> StepState {
            self.seen.lock().push(code);
            if self.finish_on.contains(&code) {
                StepState::Finished
            } else {
                StepState::Suspended
            }
        }
    }

    fn fixture() -> (crate::handlers::Outbound, Session) {
        let (outbound, _rx) = Outbound::new();
        (outbound, Session::new())
    }

    #[test]
    fn test_expect_rejects_empty_codes() {
        let queue = ReplyQueue::new();
        let (step, _) = Recorder::boxed("empty", &[]);
        assert_eq!(queue.expect(step, &[]), Err(ExpectError::EmptyCodes));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_expect_rejects_out_of_range_codes() {
        let queue = ReplyQueue::new();
        let (step, _) = Recorder::boxed("zero", &[]);
        assert_eq!(queue.expect(step, &[1, 0]), Err(ExpectError::InvalidCode(0)));
        let (step, _) = Recorder::boxed("big", &[]);
        assert_eq!(
            queue.expect(step, &[1000]),
            Err(ExpectError::InvalidCode(1000))
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_finished_step_is_removed_from_all_codes() {
        let (outbound, session) = fixture();
        let ctx = StepContext::new(&outbound, &session);
        let queue = ReplyQueue::new();
        let (step, seen) = Recorder::boxed("a", &[10]);
        queue.expect(step, &[10, 20]).unwrap();

        assert_eq!(queue.fulfil(10, &ctx), 1);
        assert_eq!(queue.fulfil(20, &ctx), 0);
        assert_eq!(*seen.lock(), vec![10]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_suspended_step_stays_registered() {
        let (outbound, session) = fixture();
        let ctx = StepContext::new(&outbound, &session);
        let queue = ReplyQueue::new();
        let (step, seen) = Recorder::boxed("a", &[20]);
        queue.expect(step, &[10, 20]).unwrap();

        queue.fulfil(10, &ctx);
        queue.fulfil(10, &ctx);
        queue.fulfil(20, &ctx);
        queue.fulfil(10, &ctx);
        assert_eq!(*seen.lock(), vec![10, 10, 20]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_shared_code_reaches_every_waiter() {
        let (outbound, session) = fixture();
        let ctx = StepContext::new(&outbound, &session);
        let queue = ReplyQueue::new();
        let (first, first_seen) = Recorder::boxed("first", &[5]);
        let (second, second_seen) = Recorder::boxed("second", &[]);
        queue.expect(first, &[5]).unwrap();
        queue.expect(second, &[5, 6]).unwrap();

        assert_eq!(queue.fulfil(5, &ctx), 2);
        assert_eq!(*first_seen.lock(), vec![5]);
        assert_eq!(*second_seen.lock(), vec![5]);
        assert_eq!(queue.pending_steps(), vec!["second"]);

        assert_eq!(queue.fulfil(5, &ctx), 1);
        assert_eq!(*second_seen.lock(), vec![5, 5]);
    }

    #[test]
    fn test_duplicate_codes_deliver_once() {
        let (outbound, session) = fixture();
        let ctx = StepContext::new(&outbound, &session);
        let queue = ReplyQueue::new();
        let (step, seen) = Recorder::boxed("dup", &[]);
        queue.expect(step, &[7, 7, 7]).unwrap();
        assert_eq!(queue.fulfil(7, &ctx), 1);
        assert_eq!(*seen.lock(), vec![7]);
    }

    #[test]
    fn test_unknown_code_is_noop() {
        let (outbound, session) = fixture();
        let ctx = StepContext::new(&outbound, &session);
        let queue = ReplyQueue::new();
        assert_eq!(queue.fulfil(401, &ctx), 0);
    }

    #[test]
    fn test_begin_starts_then_registers() {
        let (outbound, mut rx) = Outbound::new();
        let session = Session::new();
        let ctx = StepContext::new(&outbound, &session);
        let queue = ReplyQueue::new();
        let (step, seen) = Recorder::boxed("begun", &[1]);

        let id = queue.begin(step, &[1], &ctx).unwrap();
        assert!(id.is_some());
        assert_eq!(
            rx.try_recv().ok(),
            Some(crate::handlers::WriterCommand::Line("START begun".into()))
        );
        queue.fulfil(1, &ctx);
        assert_eq!(*seen.lock(), vec![1]);
    }

    #[test]
    fn test_pending_steps_in_registration_order() {
        let queue = ReplyQueue::new();
        for name in ["nick", "user", "join"] {
            let (step, _) = Recorder::boxed(name, &[]);
            queue.expect(step, &[1]).unwrap();
        }
        assert_eq!(queue.pending_steps(), vec!["nick", "user", "join"]);
    }
}
