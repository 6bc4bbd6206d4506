//! Region-of-interest handling: validated normalized rectangles, the shared
//! cell the UI mutates while the acquisition loop reads, and the crop itself.

use crate::defaults;
use crate::error::{Result, SigntypeError};
use crate::video::frame::Frame;
use std::sync::{Arc, RwLock};

/// Normalized sub-rectangle of a frame, each component in [0, 1].
///
/// Invariants enforced at construction: `x + w <= 1`, `y + h <= 1`, and both
/// extents at least [`defaults::MIN_ROI_EXTENT`]. An invalid rectangle cannot
/// be represented, so mutation sites keep their prior value simply by
/// propagating the constructor error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionOfInterest {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

impl RegionOfInterest {
    /// Creates a validated region of interest.
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Result<Self> {
        for (key, value) in [("x", x), ("y", y), ("w", w), ("h", h)] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(SigntypeError::ConfigInvalidValue {
                    key: format!("roi.{key}"),
                    message: format!("must be in [0, 1], got {value}"),
                });
            }
        }
        if w < defaults::MIN_ROI_EXTENT || h < defaults::MIN_ROI_EXTENT {
            return Err(SigntypeError::ConfigInvalidValue {
                key: "roi".to_string(),
                message: format!(
                    "extents must be at least {}, got {w}x{h}",
                    defaults::MIN_ROI_EXTENT
                ),
            });
        }
        if x + w > 1.0 || y + h > 1.0 {
            return Err(SigntypeError::ConfigInvalidValue {
                key: "roi".to_string(),
                message: "rectangle extends past the frame edge".to_string(),
            });
        }
        Ok(Self { x, y, w, h })
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn w(&self) -> f32 {
        self.w
    }

    pub fn h(&self) -> f32 {
        self.h
    }
}

impl Default for RegionOfInterest {
    fn default() -> Self {
        let (x, y, w, h) = defaults::DEFAULT_ROI;
        // The default constant is validated by a test in defaults.rs.
        Self { x, y, w, h }
    }
}

/// Thread-safe ROI cell shared between the consumer and the acquisition loop.
///
/// Writes replace the whole rectangle under a lock, so the loop never
/// observes components from two different writes.
#[derive(Debug, Clone)]
pub struct SharedRoi {
    inner: Arc<RwLock<RegionOfInterest>>,
}

impl SharedRoi {
    /// Creates a cell holding the given rectangle.
    pub fn new(roi: RegionOfInterest) -> Self {
        Self {
            inner: Arc::new(RwLock::new(roi)),
        }
    }

    /// Returns the current rectangle.
    pub fn get(&self) -> RegionOfInterest {
        match self.inner.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Replaces the rectangle. Visible to the next acquisition iteration.
    pub fn set(&self, roi: RegionOfInterest) {
        match self.inner.write() {
            Ok(mut guard) => *guard = roi,
            Err(poisoned) => *poisoned.into_inner() = roi,
        }
    }
}

impl Default for SharedRoi {
    fn default() -> Self {
        Self::new(RegionOfInterest::default())
    }
}

/// Crops a normalized region out of a frame.
///
/// Pure function. The normalized rectangle is clamped into the unit square,
/// converted to pixel coordinates by rounding, clamped to the frame bounds,
/// and widened to a 1-pixel minimum per dimension, so the result is never
/// empty for any frame of at least 1x1.
pub fn crop(frame: &Frame, roi: RegionOfInterest) -> Frame {
    let fw = frame.width as f64;
    let fh = frame.height as f64;

    let x = (roi.x() as f64).clamp(0.0, 1.0);
    let y = (roi.y() as f64).clamp(0.0, 1.0);
    let rw = (roi.w() as f64).clamp(0.0, 1.0 - x);
    let rh = (roi.h() as f64).clamp(0.0, 1.0 - y);

    let x0 = ((x * fw).round() as u32).min(frame.width.saturating_sub(1));
    let y0 = ((y * fh).round() as u32).min(frame.height.saturating_sub(1));
    let x1 = (((x + rw) * fw).round() as u32).clamp(x0 + 1, frame.width.max(x0 + 1));
    let y1 = (((y + rh) * fh).round() as u32).clamp(y0 + 1, frame.height.max(y0 + 1));

    let out_w = x1 - x0;
    let out_h = y1 - y0;
    let mut data = Vec::with_capacity(out_w as usize * out_h as usize * Frame::CHANNELS);
    for row in y0..y1 {
        let start = (row as usize * frame.width as usize + x0 as usize) * Frame::CHANNELS;
        let end = start + out_w as usize * Frame::CHANNELS;
        data.extend_from_slice(&frame.data[start..end]);
    }

    Frame::new(data, out_w, out_h, frame.timestamp, frame.sequence)
}
