//! Classifier selection at startup.
//!
//! Implementations are chosen by explicit name, never discovered at runtime:
//! `noop`, `demo`, or `scripted:<path.json>`.

use crate::classify::classifier::{Classifier, NoOpClassifier};
use crate::classify::scripted::ScriptedClassifier;
use crate::error::{Result, SigntypeError};
use std::path::Path;
use std::sync::Arc;

/// Names understood by [`build_classifier`], for help text.
pub const KNOWN_CLASSIFIERS: &[&str] = &["noop", "demo", "scripted:<path.json>"];

/// Builds a classifier from its registry name.
pub fn build_classifier(name: &str) -> Result<Arc<dyn Classifier>> {
    match name {
        "noop" => Ok(Arc::new(NoOpClassifier)),
        "demo" => Ok(Arc::new(ScriptedClassifier::demo())),
        other => {
            if let Some(path) = other.strip_prefix("scripted:") {
                let classifier = ScriptedClassifier::from_json_file(Path::new(path))?;
                return Ok(Arc::new(classifier));
            }
            Err(SigntypeError::ClassifierNotFound {
                name: other.to_string(),
            })
        }
    }
}
