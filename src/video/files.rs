//! File-backed frame source: plays a directory of still images as a video.
//!
//! Useful for tests, demos, and benchmarking the pipeline against recorded
//! footage without a camera attached.

use crate::error::{Result, SigntypeError};
use crate::video::frame::Frame;
use crate::video::source::FrameSource;
use std::path::{Path, PathBuf};
use std::time::Instant;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "bmp"];

/// Frame source that reads image files from a directory in sorted filename
/// order. Finite by default; `looped()` replays from the start forever.
pub struct ImageDirSource {
    files: Vec<PathBuf>,
    position: usize,
    looped: bool,
    sequence: u64,
}

impl ImageDirSource {
    /// Scans a directory for supported image files.
    ///
    /// Returns an error when the directory cannot be read or contains no
    /// supported images.
    pub fn open(dir: &Path) -> Result<Self> {
        let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();

        if files.is_empty() {
            return Err(SigntypeError::CameraOpen {
                message: format!("no image files found in {}", dir.display()),
            });
        }

        Ok(Self {
            files,
            position: 0,
            looped: false,
            sequence: 0,
        })
    }

    /// Replays the directory from the start once exhausted.
    pub fn looped(mut self) -> Self {
        self.looped = true;
        self
    }

    /// Number of image files found.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn decode(&self, path: &Path, sequence: u64) -> Result<Frame> {
        let rgb = image::open(path)
            .map_err(|e| SigntypeError::FrameRead {
                message: format!("{}: {e}", path.display()),
            })?
            .to_rgb8();
        let (width, height) = rgb.dimensions();

        // image decodes to RGB; frames carry BGR.
        let mut data = rgb.into_raw();
        for pixel in data.chunks_exact_mut(3) {
            pixel.swap(0, 2);
        }

        Ok(Frame::new(data, width, height, Instant::now(), sequence))
    }
}

impl FrameSource for ImageDirSource {
    fn start(&mut self) -> Result<()> {
        self.position = 0;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.position >= self.files.len() {
            if !self.looped {
                return Ok(None);
            }
            self.position = 0;
        }

        let path = self.files[self.position].clone();
        self.position += 1;
        let frame = self.decode(&path, self.sequence)?;
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn is_finite(&self) -> bool {
        !self.looped
    }
}
