//! Error types for signtype.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SigntypeError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    ConfigInvalidValue { key: String, message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Camera acquisition errors
    #[error("Camera device not found: {device}")]
    CameraDeviceNotFound { device: String },

    #[error("Failed to open camera: {message}")]
    CameraOpen { message: String },

    #[error("Camera disconnected: {message}")]
    CameraGone { message: String },

    #[error("Frame read failed: {message}")]
    FrameRead { message: String },

    // Classification errors
    #[error("Classifier inference failed: {message}")]
    Classifier { message: String },

    #[error("Unknown classifier: {name}")]
    ClassifierNotFound { name: String },

    #[error("Classifier script error: {message}")]
    ClassifierScript { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, SigntypeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_config_file_not_found_display() {
        let error = SigntypeError::ConfigFileNotFound {
            path: "/path/to/config.toml".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Configuration file not found at /path/to/config.toml"
        );
    }

    #[test]
    fn test_config_invalid_value_display() {
        let error = SigntypeError::ConfigInvalidValue {
            key: "smoothing.window_size".to_string(),
            message: "must be at least 1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid configuration value for smoothing.window_size: must be at least 1"
        );
    }

    #[test]
    fn test_camera_device_not_found_display() {
        let error = SigntypeError::CameraDeviceNotFound {
            device: "0".to_string(),
        };
        assert_eq!(error.to_string(), "Camera device not found: 0");
    }

    #[test]
    fn test_camera_gone_display() {
        let error = SigntypeError::CameraGone {
            message: "USB device removed".to_string(),
        };
        assert_eq!(error.to_string(), "Camera disconnected: USB device removed");
    }

    #[test]
    fn test_frame_read_display() {
        let error = SigntypeError::FrameRead {
            message: "short buffer".to_string(),
        };
        assert_eq!(error.to_string(), "Frame read failed: short buffer");
    }

    #[test]
    fn test_classifier_display() {
        let error = SigntypeError::Classifier {
            message: "tensor shape mismatch".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Classifier inference failed: tensor shape mismatch"
        );
    }

    #[test]
    fn test_classifier_not_found_display() {
        let error = SigntypeError::ClassifierNotFound {
            name: "resnet".to_string(),
        };
        assert_eq!(error.to_string(), "Unknown classifier: resnet");
    }

    #[test]
    fn test_other_display() {
        let error = SigntypeError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: SigntypeError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: SigntypeError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<SigntypeError>();
        assert_sync::<SigntypeError>();
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: SigntypeError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }
}
