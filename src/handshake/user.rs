//! User registration.

use super::{Step, StepContext, StepState};
use tracing::info;

/// Sends `USER` once. Any of its replies ends the step.
///
/// "Need more params" and "already registered" both count as done: the
/// first is what some servers answer to the mixed RFC 1459/2812 form, the
/// second means registration already happened.
#[derive(Debug)]
pub struct UserStep {
    line: String,
}

impl UserStep {
    pub fn new(username: &str, server: &str, realname: &str) -> Self {
        Self {
            line: format!("USER {username} i {server} :{realname}"),
        }
    }
}

impl Step for UserStep {
    fn name(&self) -> &str {
        "user"
    }

    fn start(&mut self, ctx: &StepContext<'_>) -> StepState {
        ctx.outbound.write(&self.line);
        StepState::Suspended
    }

    fn resume(&mut self, code: u16, _ctx: &StepContext<'_>) -> StepState {
        info!(code, "user registration settled");
        StepState::Finished
    }
}
