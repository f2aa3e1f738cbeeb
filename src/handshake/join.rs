//! Channel join.

use super::{Step, StepContext, StepState};
use crate::error::HandshakeFailure;
use botko_proto::Response;
use tracing::{error, info};

/// Sends `JOIN` with the configured parameter string.
///
/// Only end-of-names counts as success. It records the channels of the first
/// parameter group and releases the periodic tasks.
#[derive(Debug)]
pub struct JoinStep {
    params: String,
}

impl JoinStep {
    pub fn new(params: &str) -> Self {
        Self {
            params: params.to_owned(),
        }
    }

    /// Channels named by the first space-separated group.
    fn channels(&self) -> Vec<String> {
        self.params
            .split(' ')
            .next()
            .unwrap_or("")
            .split(',')
            .filter(|c| !c.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

impl Step for JoinStep {
    fn name(&self) -> &str {
        "join"
    }

    fn start(&mut self, ctx: &StepContext<'_>) -> StepState {
        ctx.outbound.write(&format!("JOIN {}", self.params));
        StepState::Suspended
    }

    fn resume(&mut self, code: u16, ctx: &StepContext<'_>) -> StepState {
        if code == Response::RPL_ENDOFNAMES.code() {
            let channels = self.channels();
            info!(channels = ?channels, "joined channels, starting periodic tasks");
            ctx.session.mark_joined(channels);
        } else {
            let failure = HandshakeFailure::Join {
                channels: self.params.clone(),
                code,
            };
            error!(error = %failure, "could not join channels");
        }
        StepState::Finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::Outbound;
    use crate::state::Session;

    #[test]
    fn test_end_of_names_records_first_group() {
        let (outbound, _rx) = Outbound::new();
        let session = Session::new();
        let ctx = StepContext::new(&outbound, &session);
        let mut step = JoinStep::new("#a,#b keya,keyb");

        step.start(&ctx);
        assert_eq!(step.resume(366, &ctx), StepState::Finished);
        assert_eq!(session.channels(), vec!["#a", "#b"]);
        assert!(session.is_joined());
    }

    #[test]
    fn test_other_codes_fail() {
        let (outbound, _rx) = Outbound::new();
        let session = Session::new();
        let ctx = StepContext::new(&outbound, &session);

        for code in [474, 332, 403] {
            let mut step = JoinStep::new("#a");
            step.start(&ctx);
            assert_eq!(step.resume(code, &ctx), StepState::Finished);
        }
        assert!(!session.is_joined());
        assert!(session.channels().is_empty());
    }
}
