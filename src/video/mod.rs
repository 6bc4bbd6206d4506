//! Video acquisition: frames, sources, and region-of-interest handling.

#[cfg(feature = "image-files")]
pub mod files;
pub mod frame;
pub mod roi;
pub mod source;

#[cfg(feature = "image-files")]
pub use files::ImageDirSource;
pub use frame::Frame;
pub use roi::{RegionOfInterest, SharedRoi, crop};
pub use source::{FramePhase, FrameSource, FrameSourceConfig, MockFrameSource, SyntheticFrameSource};
