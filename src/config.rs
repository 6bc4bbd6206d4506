use crate::defaults;
use crate::error::{Result, SigntypeError};
use crate::pipeline::committer::CommitterConfig;
use crate::pipeline::controller::PipelineConfig;
use crate::pipeline::smoother::SmootherConfig;
use crate::video::roi::RegionOfInterest;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub camera: CameraConfig,
    pub inference: InferenceConfig,
    pub smoothing: SmoothingConfig,
    pub commit: CommitConfig,
    pub roi: RoiConfig,
}

/// Camera capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    pub device_index: u32,
    pub width: u32,
    pub height: u32,
    pub frame_hz: u32,
}

/// Classifier selection and pacing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct InferenceConfig {
    /// Registry name: "noop", "demo", or "scripted:<path.json>"
    pub classifier: String,
    pub inference_hz: u32,
}

/// Temporal smoothing configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SmoothingConfig {
    pub window_size: usize,
    pub min_count: usize,
    pub conf_threshold: f32,
}

/// Commit gating configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CommitConfig {
    pub min_consistency: u32,
    pub cooldown_secs: f32,
}

/// Initial region of interest, normalized to [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RoiConfig {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device_index: defaults::CAMERA_INDEX,
            width: defaults::FRAME_WIDTH,
            height: defaults::FRAME_HEIGHT,
            frame_hz: defaults::TARGET_FRAME_HZ,
        }
    }
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            classifier: defaults::DEFAULT_CLASSIFIER.to_string(),
            inference_hz: defaults::TARGET_INFERENCE_HZ,
        }
    }
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window_size: defaults::WINDOW_SIZE,
            min_count: defaults::MIN_COUNT,
            conf_threshold: defaults::CONF_THRESHOLD,
        }
    }
}

impl Default for CommitConfig {
    fn default() -> Self {
        Self {
            min_consistency: defaults::MIN_CONSISTENCY,
            cooldown_secs: defaults::COOLDOWN_SECS,
        }
    }
}

impl Default for RoiConfig {
    fn default() -> Self {
        let (x, y, w, h) = defaults::DEFAULT_ROI;
        Self { x, y, w, h }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only falls back to defaults when the file is missing; invalid TOML is
    /// still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(SigntypeError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - SIGNTYPE_CLASSIFIER → inference.classifier
    /// - SIGNTYPE_CAMERA → camera.device_index
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(classifier) = std::env::var("SIGNTYPE_CLASSIFIER")
            && !classifier.is_empty()
        {
            self.inference.classifier = classifier;
        }

        if let Ok(camera) = std::env::var("SIGNTYPE_CAMERA")
            && let Ok(index) = camera.parse::<u32>()
        {
            self.camera.device_index = index;
        }

        self
    }

    /// Validate field ranges.
    ///
    /// Errors name the offending key; the caller keeps whatever valid
    /// configuration it already had.
    pub fn validate(&self) -> Result<()> {
        fn invalid(key: &str, message: impl Into<String>) -> SigntypeError {
            SigntypeError::ConfigInvalidValue {
                key: key.to_string(),
                message: message.into(),
            }
        }

        if self.camera.frame_hz == 0 {
            return Err(invalid("camera.frame_hz", "must be at least 1"));
        }
        if self.camera.width == 0 || self.camera.height == 0 {
            return Err(invalid("camera.width/height", "must be at least 1"));
        }
        if self.inference.inference_hz == 0 {
            return Err(invalid("inference.inference_hz", "must be at least 1"));
        }
        if self.smoothing.window_size == 0 {
            return Err(invalid("smoothing.window_size", "must be at least 1"));
        }
        if self.smoothing.min_count == 0 || self.smoothing.min_count > self.smoothing.window_size {
            return Err(invalid(
                "smoothing.min_count",
                format!("must be in [1, {}]", self.smoothing.window_size),
            ));
        }
        if !(0.0..=1.0).contains(&self.smoothing.conf_threshold) {
            return Err(invalid("smoothing.conf_threshold", "must be in [0, 1]"));
        }
        if self.commit.min_consistency == 0 {
            return Err(invalid("commit.min_consistency", "must be at least 1"));
        }
        if !self.commit.cooldown_secs.is_finite() || self.commit.cooldown_secs < 0.0 {
            return Err(invalid("commit.cooldown_secs", "must be non-negative"));
        }
        // ROI validation shares the constructor's rules.
        self.roi()?;
        Ok(())
    }

    /// The configured region of interest.
    pub fn roi(&self) -> Result<RegionOfInterest> {
        RegionOfInterest::new(self.roi.x, self.roi.y, self.roi.w, self.roi.h)
    }

    /// Builds the pipeline configuration, validating first.
    pub fn pipeline_config(&self) -> Result<PipelineConfig> {
        self.validate()?;
        Ok(PipelineConfig {
            target_frame_hz: self.camera.frame_hz,
            target_inference_hz: self.inference.inference_hz,
            smoother: SmootherConfig {
                window_size: self.smoothing.window_size,
                min_count: self.smoothing.min_count,
                conf_threshold: self.smoothing.conf_threshold,
            },
            committer: CommitterConfig {
                min_consistency: self.commit.min_consistency,
                cooldown: Duration::from_secs_f32(self.commit.cooldown_secs),
            },
            roi: self.roi()?,
            ..PipelineConfig::default()
        })
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/signtype/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("signtype").join("config.toml"))
    }
}
