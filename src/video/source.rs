//! Frame source devices.
//!
//! A frame source wraps a camera or prerecorded stream and hands frames to
//! the acquisition loop. The loop paces itself; sources are asked for a
//! target rate but never trusted to throttle.

use crate::error::{Result, SigntypeError};
use crate::video::frame::Frame;
use std::time::Instant;

/// Trait for frame source devices.
///
/// This trait allows swapping implementations (real camera vs mock vs
/// prerecorded frames).
pub trait FrameSource: Send {
    /// Start capturing frames from the source.
    fn start(&mut self) -> Result<()>;

    /// Stop capturing and release the device.
    fn stop(&mut self) -> Result<()>;

    /// Read the next frame.
    ///
    /// Returns `Ok(None)` when no frame is available this tick (bounded read
    /// timeout, device still warming up); callers skip the tick. A device
    /// failure is an `Err`; a finite source signals exhaustion with
    /// `Ok(None)` forever after.
    fn read_frame(&mut self) -> Result<Option<Frame>>;

    /// Returns true if the source ends on its own (prerecorded frames).
    ///
    /// A live source returning `Ok(None)` keeps being polled; a finite one
    /// stops the pipeline once exhausted.
    fn is_finite(&self) -> bool {
        false
    }
}

/// Configuration for frame source initialization.
#[derive(Debug, Clone)]
pub struct FrameSourceConfig {
    pub device_index: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for FrameSourceConfig {
    fn default() -> Self {
        Self {
            device_index: crate::defaults::CAMERA_INDEX,
            width: crate::defaults::FRAME_WIDTH,
            height: crate::defaults::FRAME_HEIGHT,
        }
    }
}

/// One phase of a mock frame sequence: `count` frames of a fixed fill color.
#[derive(Debug, Clone)]
pub struct FramePhase {
    /// BGR fill color for every frame in this phase.
    pub bgr: [u8; 3],
    /// Number of frames to emit before moving to the next phase.
    pub count: u32,
}

/// Mock frame source for testing.
#[derive(Debug, Clone)]
pub struct MockFrameSource {
    width: u32,
    height: u32,
    phases: Vec<FramePhase>,
    phase_index: usize,
    emitted_in_phase: u32,
    sequence: u64,
    is_started: bool,
    live: bool,
    should_fail_start: bool,
    should_fail_read: bool,
    error_message: String,
}

impl MockFrameSource {
    /// Creates a mock that emits an endless supply of 8x8 black frames.
    pub fn new() -> Self {
        Self {
            width: 8,
            height: 8,
            phases: Vec::new(),
            phase_index: 0,
            emitted_in_phase: 0,
            sequence: 0,
            is_started: false,
            live: false,
            should_fail_start: false,
            should_fail_read: false,
            error_message: "mock camera error".to_string(),
        }
    }

    /// Sets the emitted frame dimensions.
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Configures a finite phased frame sequence. Once all phases are
    /// exhausted the source returns `Ok(None)`.
    pub fn with_frame_sequence(mut self, phases: Vec<FramePhase>) -> Self {
        self.phases = phases;
        self
    }

    /// Marks the source as live: after the configured phases run out it
    /// keeps returning `Ok(None)` but reports `is_finite() == false`.
    pub fn as_live_source(mut self) -> Self {
        self.live = true;
        self
    }

    /// Configure the mock to fail on start.
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on every read.
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Configure the error message for failures.
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Check if the source is started.
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for MockFrameSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            Err(SigntypeError::CameraOpen {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if self.should_fail_read {
            return Err(SigntypeError::FrameRead {
                message: self.error_message.clone(),
            });
        }

        if self.phases.is_empty() {
            // Endless default frames.
            let frame = Frame::filled(self.width, self.height, [0, 0, 0], Instant::now(), self.sequence);
            self.sequence += 1;
            return Ok(Some(frame));
        }

        while let Some(phase) = self.phases.get(self.phase_index) {
            if self.emitted_in_phase < phase.count {
                let frame =
                    Frame::filled(self.width, self.height, phase.bgr, Instant::now(), self.sequence);
                self.sequence += 1;
                self.emitted_in_phase += 1;
                return Ok(Some(frame));
            }
            self.phase_index += 1;
            self.emitted_in_phase = 0;
        }

        Ok(None)
    }

    fn is_finite(&self) -> bool {
        !self.live && !self.phases.is_empty()
    }
}

/// Deterministic generated frame source for demos and benchmarks.
///
/// Emits frames whose fill color steps through a gradient, endlessly or for
/// a fixed frame count.
#[derive(Debug, Clone)]
pub struct SyntheticFrameSource {
    width: u32,
    height: u32,
    remaining: Option<u64>,
    sequence: u64,
    started: bool,
}

impl SyntheticFrameSource {
    /// Creates an endless synthetic source at the given resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            remaining: None,
            sequence: 0,
            started: false,
        }
    }

    /// Limits the source to a fixed number of frames.
    pub fn with_frame_count(mut self, count: u64) -> Self {
        self.remaining = Some(count);
        self
    }
}

impl FrameSource for SyntheticFrameSource {
    fn start(&mut self) -> Result<()> {
        self.started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.started = false;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<Frame>> {
        if let Some(remaining) = self.remaining {
            if remaining == 0 {
                return Ok(None);
            }
            self.remaining = Some(remaining - 1);
        }

        let shade = (self.sequence % 256) as u8;
        let frame = Frame::filled(
            self.width,
            self.height,
            [shade, shade, shade],
            Instant::now(),
            self.sequence,
        );
        self.sequence += 1;
        Ok(Some(frame))
    }

    fn is_finite(&self) -> bool {
        self.remaining.is_some()
    }
}
