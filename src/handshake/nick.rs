//! Nickname selection.

use super::{Step, StepContext, StepState};
use crate::error::HandshakeFailure;
use botko_proto::Response;
use tracing::{error, info};

/// Suffixes tried in turn; each one is applied to every candidate.
pub const NICK_SUFFIXES: [&str; 6] = ["", "1", "2", "3", "4", "5"];

/// Tries every candidate with every suffix until the server welcomes one.
///
/// Order is suffix-major: `a`, `b`, `a1`, `b1`, ... On exhaustion the
/// session nickname stays empty.
#[derive(Debug)]
pub struct NickStep {
    candidates: Vec<String>,
    attempt: usize,
}

impl NickStep {
    pub fn new(candidates: Vec<String>) -> Self {
        Self {
            candidates,
            attempt: 0,
        }
    }

    fn total(&self) -> usize {
        self.candidates.len() * NICK_SUFFIXES.len()
    }

    /// Nickname for attempt number `attempt`.
    fn candidate(&self, attempt: usize) -> String {
        let n = self.candidates.len();
        format!("{}{}", self.candidates[attempt % n], NICK_SUFFIXES[attempt / n])
    }

    fn send_current(&self, ctx: &StepContext<'_>) {
        ctx.outbound.write(&format!("NICK {}", self.candidate(self.attempt)));
    }
}

impl Step for NickStep {
    fn name(&self) -> &str {
        "nick"
    }

    fn start(&mut self, ctx: &StepContext<'_>) -> StepState {
        if self.candidates.is_empty() {
            error!(error = %HandshakeFailure::NoCandidates, "could not set a nickname");
            return StepState::Finished;
        }
        self.send_current(ctx);
        StepState::Suspended
    }

    fn resume(&mut self, code: u16, ctx: &StepContext<'_>) -> StepState {
        if code == Response::RPL_WELCOME.code() {
            let nick = self.candidate(self.attempt);
            info!(nick = %nick, "nickname accepted");
            ctx.session.set_nick(nick);
            return StepState::Finished;
        }

        self.attempt += 1;
        if self.attempt >= self.total() {
            let failure = HandshakeFailure::NicksExhausted {
                attempts: self.total(),
                last_code: code,
            };
            error!(error = %failure, "could not set a nickname");
            ctx.session.set_nick("");
            return StepState::Finished;
        }
        self.send_current(ctx);
        StepState::Suspended
    }
}
