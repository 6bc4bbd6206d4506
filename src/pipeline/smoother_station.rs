//! Smoother station: predictions in, stable decisions out.

use crate::classify::classifier::Prediction;
use crate::pipeline::error::StationError;
use crate::pipeline::smoother::TemporalSmoother;
use crate::pipeline::station::Station;
use crate::pipeline::types::StableDecision;

/// Station wrapping a [`TemporalSmoother`].
///
/// Every prediction is observed; a stable decision is forwarded whenever the
/// window currently agrees. A sustained gesture therefore produces a run of
/// identical decisions, which is exactly what the committer's consistency
/// streak counts.
pub struct SmootherStation {
    smoother: TemporalSmoother,
}

impl SmootherStation {
    /// Creates a new smoother station.
    pub fn new(smoother: TemporalSmoother) -> Self {
        Self { smoother }
    }
}

impl Station for SmootherStation {
    type Input = Prediction;
    type Output = StableDecision;

    fn name(&self) -> &'static str {
        "smoother"
    }

    fn process(&mut self, prediction: Prediction) -> Result<Option<StableDecision>, StationError> {
        self.smoother.observe(prediction);
        Ok(self.smoother.stable())
    }
}
