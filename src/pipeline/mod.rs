//! Recognition pipeline for sign typing.
//!
//! Implements a multi-station pipeline where each station runs in its own
//! thread, connected by bounded crossbeam channels for backpressure.

pub mod classifier_station;
pub mod committer;
pub mod committer_station;
pub mod controller;
pub mod error;
pub mod events;
pub mod gate;
pub mod sink;
pub mod smoother;
pub mod smoother_station;
pub mod station;
pub mod types;

pub use classifier_station::ClassifierStation;
pub use committer::{CommitterConfig, TokenCommitter};
pub use committer_station::CommitterStation;
pub use controller::{PipelineConfig, PipelineController, PipelineHandle};
pub use error::{ErrorReporter, LogReporter, StationError};
pub use events::{EventSender, PipelineEvent};
pub use gate::{GateOutcome, InferenceGate};
pub use sink::{CollectorSink, CommitSink, StdoutSink};
pub use smoother::{SmootherConfig, TemporalSmoother};
pub use smoother_station::SmootherStation;
pub use station::{Station, StationRunner};
pub use types::{CommitAction, StableDecision, TokenKind};
