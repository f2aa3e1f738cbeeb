//! Registration handshake.
//!
//! Three independent steps run as explicit state machines driven by the
//! [`ReplyQueue`]:
//!
//! - [`NickStep`]: cycles nickname candidates until the server welcomes one
//! - [`UserStep`]: sends `USER` once, done on any of its replies
//! - [`JoinStep`]: sends `JOIN`, succeeds only on end-of-names
//!
//! [`start_handshake`] writes `NICK`, `USER` and `JOIN` in that order and
//! registers all three steps at once; none of them waits on another.

mod join;
mod nick;
mod queue;
mod user;

pub use join::JoinStep;
pub use nick::{NICK_SUFFIXES, NickStep};
pub use queue::{ReplyQueue, StepId};
pub use user::UserStep;

use crate::config::MainConfig;
use crate::handlers::Outbound;
use crate::state::Session;
use botko_proto::response::{self, JOIN_REPLIES, NICK_REPLIES, USER_REPLIES};
use tracing::error;

/// Outcome of starting or resuming a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    /// Still waiting for one of its replies.
    Suspended,
    /// Done, successfully or not. The queue forgets the step.
    Finished,
}

/// What a step may touch while it runs.
///
/// Steps run under the queue's lock, so they get the write path and the
/// session but never the queue itself.
pub struct StepContext<'a> {
    pub outbound: &'a Outbound,
    pub session: &'a Session,
}

impl<'a> StepContext<'a> {
    pub fn new(outbound: &'a Outbound, session: &'a Session) -> Self {
        Self { outbound, session }
    }
}

/// A resumable registration step.
pub trait Step: Send {
    /// Name used in logs and watchdog reports.
    fn name(&self) -> &str;

    /// Issue the step's first command.
    fn start(&mut self, ctx: &StepContext<'_>) -> StepState;

    /// React to one of the codes the step registered for.
    fn resume(&mut self, code: u16, ctx: &StepContext<'_>) -> StepState;
}

/// Write `NICK`, `USER` and `JOIN` and register the three steps.
pub fn start_handshake(queue: &ReplyQueue, main: &MainConfig, ctx: &StepContext<'_>) {
    let steps: [(Box<dyn Step>, &[response::Response]); 3] = [
        (Box::new(NickStep::new(main.nicks())), NICK_REPLIES),
        (
            Box::new(UserStep::new(&main.username, &main.server, &main.realname)),
            USER_REPLIES,
        ),
        (Box::new(JoinStep::new(&main.channels)), JOIN_REPLIES),
    ];

    for (step, replies) in steps {
        let name = step.name().to_owned();
        if let Err(e) = queue.begin(step, &response::codes(replies), ctx) {
            error!(step = %name, error = %e, "could not register handshake step");
        }
    }
}
