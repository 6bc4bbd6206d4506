//! Inference gate: rate-decoupled classifier invocation.
//!
//! Frames arrive at the acquisition rate (default 30 Hz) but inference is
//! far more expensive than acquisition, so the classifier runs at its own
//! fixed rate (default 5 Hz). Running inference per frame would build an
//! unbounded backlog under load; periodic sampling caps worst-case latency
//! at the cost of missing very brief gestures.

use crate::classify::classifier::{Classifier, Prediction};
use crate::video::frame::Frame;
use std::time::{Duration, Instant};

/// Outcome of one gate tick.
#[derive(Debug)]
pub struct GateOutcome {
    /// The prediction, when inference ran this tick.
    pub prediction: Option<Prediction>,
    /// Classifier failure message, when the prediction was substituted.
    pub classifier_error: Option<String>,
}

/// Throttles classifier invocation to a fixed rate and absorbs classifier
/// faults into a neutral prediction.
pub struct InferenceGate {
    interval: Duration,
    last_inference: Option<Instant>,
}

impl InferenceGate {
    /// Creates a gate targeting the given inference rate.
    ///
    /// A zero rate disables throttling (every tick runs inference).
    pub fn new(target_inference_hz: u32) -> Self {
        let interval = if target_inference_hz == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs_f64(1.0 / f64::from(target_inference_hz))
        };
        Self {
            interval,
            last_inference: None,
        }
    }

    /// Runs one tick: invokes the classifier when the interval has elapsed.
    ///
    /// Returns no prediction between inference slots. A classifier failure
    /// never propagates: the outcome carries `Prediction("nothing", 0.0)`
    /// plus the error message for observability, and the loop continues.
    pub fn tick(
        &mut self,
        roi_frame: &Frame,
        classifier: &dyn Classifier,
        now: Instant,
    ) -> GateOutcome {
        let due = match self.last_inference {
            None => true,
            Some(last) => now.duration_since(last) >= self.interval,
        };
        if !due {
            return GateOutcome {
                prediction: None,
                classifier_error: None,
            };
        }

        self.last_inference = Some(now);
        match classifier.predict(roi_frame) {
            Ok(prediction) => GateOutcome {
                prediction: Some(prediction),
                classifier_error: None,
            },
            Err(error) => GateOutcome {
                prediction: Some(Prediction::nothing(now)),
                classifier_error: Some(error.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classifier::MockClassifier;

    fn roi() -> Frame {
        Frame::filled(4, 4, [0, 0, 0], Instant::now(), 0)
    }

    #[test]
    fn test_first_tick_runs_inference() {
        let mut gate = InferenceGate::new(5);
        let classifier = MockClassifier::new("m").with_response("A", 0.9);

        let outcome = gate.tick(&roi(), &classifier, Instant::now());
        assert_eq!(outcome.prediction.unwrap().label, "A");
        assert!(outcome.classifier_error.is_none());
    }

    #[test]
    fn test_ticks_inside_interval_are_skipped() {
        let mut gate = InferenceGate::new(5); // 200ms interval
        let classifier = MockClassifier::new("m").with_response("A", 0.9);
        let start = Instant::now();

        assert!(gate.tick(&roi(), &classifier, start).prediction.is_some());
        // 100ms later: inside the interval, no inference.
        let outcome = gate.tick(&roi(), &classifier, start + Duration::from_millis(100));
        assert!(outcome.prediction.is_none());
        // 200ms later: due again.
        let outcome = gate.tick(&roi(), &classifier, start + Duration::from_millis(200));
        assert!(outcome.prediction.is_some());
    }

    #[test]
    fn test_inference_rate_independent_of_frame_rate() {
        let mut gate = InferenceGate::new(5);
        let classifier = MockClassifier::new("m").with_response("A", 0.9);
        let start = Instant::now();

        // Simulate 30 frame ticks over one second; only ~5 should infer.
        let mut inferences = 0;
        for i in 0..30 {
            let now = start + Duration::from_millis(i * 33);
            if gate.tick(&roi(), &classifier, now).prediction.is_some() {
                inferences += 1;
            }
        }
        assert!((4..=6).contains(&inferences), "got {inferences}");
    }

    #[test]
    fn test_classifier_failure_substitutes_nothing() {
        let mut gate = InferenceGate::new(5);
        let classifier = MockClassifier::new("m").with_failure();
        let now = Instant::now();

        let outcome = gate.tick(&roi(), &classifier, now);
        let prediction = outcome.prediction.unwrap();
        assert!(prediction.is_nothing());
        assert_eq!(prediction.confidence, 0.0);
        assert_eq!(prediction.timestamp, now);
        assert!(
            outcome
                .classifier_error
                .unwrap()
                .contains("mock classification failure")
        );
    }

    #[test]
    fn test_failure_still_consumes_the_inference_slot() {
        let mut gate = InferenceGate::new(5);
        let classifier = MockClassifier::new("m").with_failure();
        let start = Instant::now();

        assert!(gate.tick(&roi(), &classifier, start).prediction.is_some());
        let outcome = gate.tick(&roi(), &classifier, start + Duration::from_millis(50));
        assert!(outcome.prediction.is_none());
    }

    #[test]
    fn test_zero_rate_disables_throttling() {
        let mut gate = InferenceGate::new(0);
        let classifier = MockClassifier::new("m").with_response("B", 0.8);
        let now = Instant::now();

        assert!(gate.tick(&roi(), &classifier, now).prediction.is_some());
        assert!(gate.tick(&roi(), &classifier, now).prediction.is_some());
    }
}
