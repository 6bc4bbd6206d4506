//! signtype - Sign-language typing from a live camera
//!
//! Turns a stream of video frames into committed text by classifying a
//! region of interest, smoothing the noisy label stream over time, and
//! applying token commit rules with cooldown control.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

#[cfg(feature = "cli")]
pub mod app;
pub mod buffer;
pub mod classify;
#[cfg(feature = "cli")]
pub mod cli;
pub mod clock;
pub mod config;
pub mod defaults;
pub mod error;
#[cfg(feature = "cli")]
pub mod output;
pub mod pipeline;
pub mod video;

// Core traits (source → classify → commit)
pub use classify::classifier::{Classifier, Prediction};
pub use pipeline::sink::{CollectorSink, CommitSink, StdoutSink};
pub use video::source::FrameSource;

// Pipeline
pub use pipeline::controller::{PipelineConfig, PipelineController, PipelineHandle};
pub use pipeline::events::PipelineEvent;
pub use pipeline::types::{CommitAction, StableDecision};

// Error handling
pub use error::{Result, SigntypeError};

// Config
pub use config::Config;

// Station framework (for advanced users)
pub use pipeline::error::{ErrorReporter, StationError};
pub use pipeline::station::Station;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
