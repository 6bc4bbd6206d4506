//! Committer station: stable decisions in, commit actions out.

use crate::clock::Clock;
use crate::pipeline::committer::TokenCommitter;
use crate::pipeline::error::StationError;
use crate::pipeline::events::{EventSender, PipelineEvent};
use crate::pipeline::station::Station;
use crate::pipeline::types::{CommitAction, StableDecision};
use std::sync::Arc;

/// Station wrapping a [`TokenCommitter`]. Ignored decisions are filtered;
/// real commits are also published as `Commit` events.
pub struct CommitterStation {
    committer: TokenCommitter,
    clock: Arc<dyn Clock>,
    event_tx: Option<EventSender>,
}

impl CommitterStation {
    /// Creates a new committer station.
    pub fn new(committer: TokenCommitter, clock: Arc<dyn Clock>) -> Self {
        Self {
            committer,
            clock,
            event_tx: None,
        }
    }

    /// Publishes commits to subscribers.
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.event_tx = Some(tx);
        self
    }
}

impl Station for CommitterStation {
    type Input = StableDecision;
    type Output = CommitAction;

    fn name(&self) -> &'static str {
        "committer"
    }

    fn process(&mut self, decision: StableDecision) -> Result<Option<CommitAction>, StationError> {
        let now = self.clock.now();
        let action = self.committer.commit(&decision, now);
        if action == CommitAction::Ignore {
            return Ok(None);
        }
        if let Some(ref tx) = self.event_tx {
            tx.send(PipelineEvent::Commit(action));
        }
        Ok(Some(action))
    }
}
