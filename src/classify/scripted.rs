//! Scripted classifier: a deterministic stand-in for a trained model.
//!
//! Cycles through a fixed sequence of (label, confidence) steps, optionally
//! loaded from a JSON script file. Deterministic on purpose so demos and
//! recordings replay identically.

use crate::classify::classifier::{Classifier, Prediction};
use crate::defaults;
use crate::error::{Result, SigntypeError};
use crate::video::frame::Frame;
use serde::Deserialize;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// One step of a classifier script.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScriptStep {
    pub label: String,
    pub confidence: f32,
    /// How many consecutive predictions this step covers.
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

/// Classifier that replays a scripted label sequence.
pub struct ScriptedClassifier {
    name: String,
    steps: Vec<ScriptStep>,
    cursor: Mutex<(usize, u32)>,
}

impl ScriptedClassifier {
    /// Creates a classifier from explicit script steps.
    pub fn from_steps(name: &str, steps: Vec<ScriptStep>) -> Result<Self> {
        if steps.is_empty() {
            return Err(SigntypeError::ClassifierScript {
                message: "script has no steps".to_string(),
            });
        }
        for step in &steps {
            if !(0.0..=1.0).contains(&step.confidence) {
                return Err(SigntypeError::ClassifierScript {
                    message: format!(
                        "confidence for '{}' must be in [0, 1], got {}",
                        step.label, step.confidence
                    ),
                });
            }
            if step.repeat == 0 {
                return Err(SigntypeError::ClassifierScript {
                    message: format!("repeat for '{}' must be at least 1", step.label),
                });
            }
        }
        Ok(Self {
            name: name.to_string(),
            steps,
            cursor: Mutex::new((0, 0)),
        })
    }

    /// Loads a script from a JSON file: an array of
    /// `{"label": "A", "confidence": 0.9, "repeat": 10}` objects
    /// (`repeat` optional, default 1).
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let steps: Vec<ScriptStep> =
            serde_json::from_str(&contents).map_err(|e| SigntypeError::ClassifierScript {
                message: format!("{}: {e}", path.display()),
            })?;
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("scripted")
            .to_string();
        Self::from_steps(&name, steps)
    }

    /// Built-in demo script that signs "HI" with idle gaps, tuned so the
    /// default smoothing and commit settings let both letters through.
    pub fn demo() -> Self {
        let mut steps = Vec::new();
        for letter in ["H", "I"] {
            steps.push(ScriptStep {
                label: letter.to_string(),
                confidence: 0.85,
                repeat: 14,
            });
            steps.push(ScriptStep {
                label: defaults::NOTHING_LABEL.to_string(),
                confidence: 0.3,
                repeat: 8,
            });
        }
        // Validated inputs above, so from_steps cannot fail here.
        match Self::from_steps("demo", steps) {
            Ok(classifier) => classifier,
            Err(_) => unreachable!("demo script is statically valid"),
        }
    }

    /// Total number of predictions in one pass of the script.
    pub fn script_len(&self) -> u64 {
        self.steps.iter().map(|s| s.repeat as u64).sum()
    }
}

impl Classifier for ScriptedClassifier {
    fn predict(&self, _roi: &Frame) -> Result<Prediction> {
        let mut cursor = match self.cursor.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (step_index, emitted) = *cursor;
        let step = &self.steps[step_index];

        let next_emitted = emitted + 1;
        *cursor = if next_emitted >= step.repeat {
            ((step_index + 1) % self.steps.len(), 0)
        } else {
            (step_index, next_emitted)
        };

        Ok(Prediction::new(
            step.label.clone(),
            step.confidence,
            Instant::now(),
        ))
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_ready(&self) -> bool {
        true
    }
}
