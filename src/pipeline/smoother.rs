//! Temporal smoothing: majority vote over a sliding prediction window.
//!
//! Robust to single-frame misclassifications without requiring the
//! classifier itself to be temporally aware.

use crate::classify::classifier::Prediction;
use crate::defaults;
use crate::pipeline::types::StableDecision;
use std::collections::VecDeque;

/// Configuration for temporal smoothing.
#[derive(Debug, Clone, Copy)]
pub struct SmootherConfig {
    /// Number of recent predictions kept (ring semantics).
    pub window_size: usize,
    /// Minimum count the winning label must reach within the window.
    pub min_count: usize,
    /// Minimum mean confidence of the winning label's entries (0.0 to 1.0).
    pub conf_threshold: f32,
}

impl Default for SmootherConfig {
    fn default() -> Self {
        Self {
            window_size: defaults::WINDOW_SIZE,
            min_count: defaults::MIN_COUNT,
            conf_threshold: defaults::CONF_THRESHOLD,
        }
    }
}

/// Emits a stable decision only when a recency window shows sufficient
/// agreement and confidence.
pub struct TemporalSmoother {
    config: SmootherConfig,
    window: VecDeque<Prediction>,
}

impl TemporalSmoother {
    /// Creates a smoother with the given configuration.
    pub fn new(config: SmootherConfig) -> Self {
        Self {
            window: VecDeque::with_capacity(config.window_size.max(1)),
            config,
        }
    }

    /// Records one prediction, evicting the oldest past capacity.
    pub fn observe(&mut self, prediction: Prediction) {
        if self.window.len() >= self.config.window_size.max(1) {
            self.window.pop_front();
        }
        self.window.push_back(prediction);
    }

    /// Returns the current stable decision, if any.
    ///
    /// Pure over the window snapshot: repeated calls without an intervening
    /// `observe` return the same result.
    ///
    /// The winner is the label with the highest count; ties go to the label
    /// observed most recently, favoring responsiveness. `None` when the top
    /// count is below `min_count` or the winner's mean confidence is below
    /// `conf_threshold`.
    pub fn stable(&self) -> Option<StableDecision> {
        if self.window.is_empty() {
            return None;
        }

        // Count per label, remembering each label's last occurrence index.
        let mut tallies: Vec<(&str, usize, usize)> = Vec::new();
        for (index, prediction) in self.window.iter().enumerate() {
            match tallies.iter_mut().find(|(label, ..)| *label == prediction.label) {
                Some(entry) => {
                    entry.1 += 1;
                    entry.2 = index;
                }
                None => tallies.push((prediction.label.as_str(), 1, index)),
            }
        }

        let (label, count, _) = tallies
            .into_iter()
            .max_by_key(|&(_, count, last_seen)| (count, last_seen))?;

        if count < self.config.min_count {
            return None;
        }

        let confidence_sum: f32 = self
            .window
            .iter()
            .filter(|p| p.label == label)
            .map(|p| p.confidence)
            .sum();
        let mean_confidence = confidence_sum / count as f32;

        if mean_confidence < self.config.conf_threshold {
            return None;
        }

        Some(StableDecision::new(label, mean_confidence))
    }

    /// Clears the window.
    pub fn reset(&mut self) {
        self.window.clear();
    }

    /// Number of predictions currently in the window.
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }
}
