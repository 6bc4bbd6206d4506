//! Classifier boundary.
//!
//! The model itself is an external collaborator; the pipeline only needs
//! something that maps an ROI frame to a labeled prediction. Implementations
//! are selected at startup through the registry, never discovered at runtime.

use crate::defaults;
use crate::error::{Result, SigntypeError};
use crate::video::frame::Frame;
use std::sync::Arc;
use std::time::Instant;

/// A single classification result.
///
/// `label` comes from the vocabulary `'A'..='Z'`, `"space"`, `"delete"`,
/// `"nothing"`; `confidence` is in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub label: String,
    pub confidence: f32,
    /// Timestamp of the observation this prediction was made from.
    pub timestamp: Instant,
}

impl Prediction {
    /// Creates a new prediction.
    pub fn new(label: impl Into<String>, confidence: f32, timestamp: Instant) -> Self {
        Self {
            label: label.into(),
            confidence,
            timestamp,
        }
    }

    /// The neutral prediction substituted when no gesture is present or the
    /// classifier failed.
    pub fn nothing(timestamp: Instant) -> Self {
        Self::new(defaults::NOTHING_LABEL, 0.0, timestamp)
    }

    /// Returns true for the neutral "nothing" label.
    pub fn is_nothing(&self) -> bool {
        self.label.eq_ignore_ascii_case(defaults::NOTHING_LABEL)
    }
}

/// The full label vocabulary: the alphabet plus the control tokens.
pub fn vocabulary() -> Vec<String> {
    let mut labels: Vec<String> = ('A'..='Z').map(|c| c.to_string()).collect();
    labels.push("space".to_string());
    labels.push("delete".to_string());
    labels.push(defaults::NOTHING_LABEL.to_string());
    labels
}

/// Trait for sign classifiers.
///
/// Must be safe to call repeatedly and rapidly from the inference thread.
pub trait Classifier: Send + Sync {
    /// Classify an ROI frame.
    ///
    /// # Arguments
    /// * `roi` - Cropped BGR frame containing the gesture region
    fn predict(&self, roi: &Frame) -> Result<Prediction>;

    /// Name of the classifier, for logs and the registry.
    fn name(&self) -> &str;

    /// Check if the classifier is ready to serve predictions.
    fn is_ready(&self) -> bool;
}

/// Implement Classifier for Arc<T> to allow sharing across threads.
impl<T: Classifier + ?Sized> Classifier for Arc<T> {
    fn predict(&self, roi: &Frame) -> Result<Prediction> {
        (**self).predict(roi)
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_ready(&self) -> bool {
        (**self).is_ready()
    }
}

/// Baseline classifier that always reports "nothing".
///
/// Useful for exercising the pipeline and UI without a model.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpClassifier;

impl Classifier for NoOpClassifier {
    fn predict(&self, _roi: &Frame) -> Result<Prediction> {
        Ok(Prediction::nothing(Instant::now()))
    }

    fn name(&self) -> &str {
        "noop"
    }

    fn is_ready(&self) -> bool {
        true
    }
}

/// Mock classifier for testing.
pub struct MockClassifier {
    name: String,
    response: (String, f32),
    sequence: Option<Vec<(String, f32)>>,
    position: std::sync::Mutex<usize>,
    should_fail: bool,
}

impl MockClassifier {
    /// Create a new mock classifier with default settings.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            response: (defaults::NOTHING_LABEL.to_string(), 0.0),
            sequence: None,
            position: std::sync::Mutex::new(0),
            should_fail: false,
        }
    }

    /// Configure the mock to return a fixed label and confidence.
    pub fn with_response(mut self, label: &str, confidence: f32) -> Self {
        self.response = (label.to_string(), confidence);
        self
    }

    /// Configure the mock to cycle through a sequence of responses.
    pub fn with_sequence(mut self, sequence: Vec<(&str, f32)>) -> Self {
        self.sequence = Some(
            sequence
                .into_iter()
                .map(|(label, conf)| (label.to_string(), conf))
                .collect(),
        );
        self
    }

    /// Configure the mock to fail on predict.
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

impl Classifier for MockClassifier {
    fn predict(&self, _roi: &Frame) -> Result<Prediction> {
        if self.should_fail {
            return Err(SigntypeError::Classifier {
                message: "mock classification failure".to_string(),
            });
        }

        let now = Instant::now();
        if let Some(ref sequence) = self.sequence
            && !sequence.is_empty()
        {
            let mut position = match self.position.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            let (label, confidence) = &sequence[*position % sequence.len()];
            *position += 1;
            return Ok(Prediction::new(label.clone(), *confidence, now));
        }

        let (label, confidence) = &self.response;
        Ok(Prediction::new(label.clone(), *confidence, now))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roi() -> Frame {
        Frame::filled(4, 4, [0, 0, 0], Instant::now(), 0)
    }

    #[test]
    fn test_prediction_nothing() {
        let now = Instant::now();
        let pred = Prediction::nothing(now);
        assert_eq!(pred.label, "nothing");
        assert_eq!(pred.confidence, 0.0);
        assert!(pred.is_nothing());
    }

    #[test]
    fn test_is_nothing_case_insensitive() {
        let pred = Prediction::new("Nothing", 0.4, Instant::now());
        assert!(pred.is_nothing());
        let pred = Prediction::new("A", 0.4, Instant::now());
        assert!(!pred.is_nothing());
    }

    #[test]
    fn test_vocabulary_contents() {
        let labels = vocabulary();
        assert_eq!(labels.len(), 29);
        assert_eq!(labels[0], "A");
        assert_eq!(labels[25], "Z");
        assert!(labels.contains(&"space".to_string()));
        assert!(labels.contains(&"delete".to_string()));
        assert!(labels.contains(&"nothing".to_string()));
    }

    #[test]
    fn test_noop_classifier_always_nothing() {
        let classifier = NoOpClassifier;
        assert!(classifier.is_ready());
        let pred = classifier.predict(&roi()).unwrap();
        assert!(pred.is_nothing());
    }

    #[test]
    fn test_mock_classifier_fixed_response() {
        let classifier = MockClassifier::new("test-model").with_response("A", 0.9);
        let pred = classifier.predict(&roi()).unwrap();
        assert_eq!(pred.label, "A");
        assert_eq!(pred.confidence, 0.9);
    }

    #[test]
    fn test_mock_classifier_sequence_cycles() {
        let classifier =
            MockClassifier::new("test-model").with_sequence(vec![("A", 0.8), ("B", 0.7)]);

        assert_eq!(classifier.predict(&roi()).unwrap().label, "A");
        assert_eq!(classifier.predict(&roi()).unwrap().label, "B");
        assert_eq!(classifier.predict(&roi()).unwrap().label, "A");
    }

    #[test]
    fn test_mock_classifier_failure() {
        let classifier = MockClassifier::new("test-model").with_failure();
        assert!(!classifier.is_ready());
        match classifier.predict(&roi()) {
            Err(SigntypeError::Classifier { message }) => {
                assert_eq!(message, "mock classification failure");
            }
            _ => panic!("Expected Classifier error"),
        }
    }

    #[test]
    fn test_classifier_trait_is_object_safe() {
        let classifier: Box<dyn Classifier> =
            Box::new(MockClassifier::new("boxed").with_response("C", 0.5));
        assert_eq!(classifier.name(), "boxed");
        assert_eq!(classifier.predict(&roi()).unwrap().label, "C");
    }

    #[test]
    fn test_arc_blanket_impl() {
        let classifier = Arc::new(NoOpClassifier);
        let shared: Arc<dyn Classifier> = classifier;
        assert_eq!(shared.name(), "noop");
        assert!(shared.predict(&roi()).unwrap().is_nothing());
    }
}
