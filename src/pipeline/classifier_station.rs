//! Classifier station: gated inference over cropped ROI frames.

use crate::classify::classifier::{Classifier, Prediction};
use crate::clock::Clock;
use crate::pipeline::error::StationError;
use crate::pipeline::events::{EventSender, PipelineEvent};
use crate::pipeline::gate::InferenceGate;
use crate::pipeline::station::Station;
use crate::video::frame::Frame;
use std::sync::Arc;

/// Station that runs the classifier on ROI frames at the inference rate.
///
/// Frames arriving between inference slots are consumed without output.
/// Classifier faults surface as `Error` events; the substituted "nothing"
/// prediction keeps flowing downstream.
pub struct ClassifierStation {
    gate: InferenceGate,
    classifier: Arc<dyn Classifier>,
    clock: Arc<dyn Clock>,
    event_tx: Option<EventSender>,
}

impl ClassifierStation {
    /// Creates a new classifier station.
    pub fn new(gate: InferenceGate, classifier: Arc<dyn Classifier>, clock: Arc<dyn Clock>) -> Self {
        Self {
            gate,
            classifier,
            clock,
            event_tx: None,
        }
    }

    /// Publishes predictions and classifier faults to subscribers.
    pub fn with_event_sender(mut self, tx: EventSender) -> Self {
        self.event_tx = Some(tx);
        self
    }
}

impl Station for ClassifierStation {
    type Input = Frame;
    type Output = Prediction;

    fn name(&self) -> &'static str {
        "classifier"
    }

    fn process(&mut self, roi_frame: Frame) -> Result<Option<Prediction>, StationError> {
        let now = self.clock.now();
        let outcome = self.gate.tick(&roi_frame, &self.classifier, now);

        if let Some(message) = outcome.classifier_error
            && let Some(ref tx) = self.event_tx
        {
            tx.send(PipelineEvent::Error(message));
        }

        match outcome.prediction {
            Some(prediction) => {
                if let Some(ref tx) = self.event_tx {
                    tx.send(PipelineEvent::Prediction(prediction.clone()));
                }
                Ok(Some(prediction))
            }
            None => Ok(None),
        }
    }
}
