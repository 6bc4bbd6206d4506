//! Sign classification: the classifier boundary and shipped implementations.

pub mod classifier;
pub mod registry;
pub mod scripted;

pub use classifier::{Classifier, MockClassifier, NoOpClassifier, Prediction, vocabulary};
pub use registry::{KNOWN_CLASSIFIERS, build_classifier};
pub use scripted::{ScriptStep, ScriptedClassifier};
